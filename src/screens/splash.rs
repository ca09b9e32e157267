/// One-shot startup banner: white border, greeting and hostname centered

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::utils::{SPLASH_BORDER, SPLASH_GREETING};

fn text_width(font: &MonoFont<'_>, text: &str) -> i32 {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return 0;
    }
    (chars * font.character_size.width + (chars - 1) * font.character_spacing) as i32
}

/// Top-left corners for the two banner lines on a `size` display
pub fn banner_positions(
    size: Size,
    font: &MonoFont<'_>,
    greeting: &str,
    hostname: &str,
) -> (Point, Point) {
    let width = size.width as i32;
    let height = size.height as i32;
    let font_height = font.character_size.height as i32;
    let middle = (height - font_height).div_euclid(2);

    let greeting_at = Point::new(
        (width - text_width(font, greeting)).div_euclid(2),
        middle - font_height / 2,
    );
    let hostname_at = Point::new(
        (width - text_width(font, hostname)).div_euclid(2),
        middle + font_height / 2,
    );
    (greeting_at, hostname_at)
}

pub fn draw<D>(target: &mut D, font: &MonoFont<'_>, hostname: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor> + OriginDimensions,
{
    let size = target.size();

    Rectangle::new(Point::zero(), size)
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)?;

    let inset = SPLASH_BORDER;
    Rectangle::new(
        Point::new(inset as i32, inset as i32),
        Size::new(
            size.width.saturating_sub(2 * inset),
            size.height.saturating_sub(2 * inset),
        ),
    )
    .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
    .draw(target)?;

    let style = MonoTextStyle::new(font, BinaryColor::On);
    let (greeting_at, hostname_at) = banner_positions(size, font, SPLASH_GREETING, hostname);
    Text::with_baseline(SPLASH_GREETING, greeting_at, style, Baseline::Top).draw(target)?;
    Text::with_baseline(hostname, hostname_at, style, Baseline::Top).draw(target)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{font_by_name, Frame};

    #[test]
    fn test_banner_is_centered() {
        let font = font_by_name("6x10").unwrap();
        let (greeting, host) =
            banner_positions(Size::new(128, 64), font, "Hello!!", "raspberrypi");

        // 7 chars * 6 px = 42 px wide, 11 chars = 66 px wide
        assert_eq!(greeting, Point::new(43, 22));
        assert_eq!(host, Point::new(31, 32));
    }

    #[test]
    fn test_border_and_inner_area() {
        let font = font_by_name("6x10").unwrap();
        let mut frame = Frame::new(128, 64);
        draw(&mut frame, font, "pi").unwrap();

        // Border is lit on every edge
        for (x, y) in [(0, 0), (127, 0), (0, 63), (127, 63), (2, 30), (125, 30)] {
            assert!(frame.pixel(x, y), "border pixel ({x}, {y}) should be lit");
        }
        // Inner area away from the text stays dark
        assert!(!frame.pixel(3, 3));
        assert!(!frame.pixel(64, 8));
        assert!(!frame.pixel(124, 60));
    }
}
