/// Liveness heartbeat drawn in the top-right corner
///
/// Toggles on every render so a frozen process is visible even when the
/// metric values themselves do not change.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use crate::utils::TICK_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickIndicator {
    count: u32,
}

impl Default for TickIndicator {
    fn default() -> Self {
        // Odd start, so the first frame shows an empty indicator
        Self { count: 1 }
    }
}

impl TickIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step to the next state and return whether it is filled
    pub fn advance(&mut self) -> bool {
        self.count = self.count.wrapping_add(1);
        self.count & 1 == 1
    }

    /// Square in the top-right corner of a display `display_width` pixels wide
    pub fn area(display_width: u32) -> Rectangle {
        let x = display_width.saturating_sub(TICK_SIZE) as i32;
        Rectangle::new(Point::new(x, 0), Size::new(TICK_SIZE, TICK_SIZE))
    }

    pub fn draw<D>(filled: bool, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor> + OriginDimensions,
    {
        Self::area(target.size().width)
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::from(filled)))
            .draw(target)
    }
}
