/// Off-screen 1-bit frame buffer
///
/// Everything is drawn here with embedded-graphics first; the finished frame
/// is then handed to the display transport in one piece.

use std::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    /// Row-major, 8 pixels per byte, MSB first
    bits: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        let stride = Self::stride_for(width);
        Self {
            width,
            height,
            bits: vec![0; stride * height as usize],
        }
    }

    fn stride_for(width: u32) -> usize {
        (width as usize).div_ceil(8)
    }

    fn index(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let byte = y as usize * Self::stride_for(self.width) + x as usize / 8;
        let mask = 0x80 >> (x % 8);
        Some((byte, mask))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set every pixel on or off
    pub fn fill(&mut self, on: bool) {
        let value = if on { 0xFF } else { 0x00 };
        self.bits.iter_mut().for_each(|b| *b = value);
    }

    /// Pixels outside the frame read as off
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        self.index(x, y)
            .map(|(byte, mask)| self.bits[byte] & mask != 0)
            .unwrap_or(false)
    }

    /// Pixels outside the frame are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if let Some((byte, mask)) = self.index(x, y) {
            if on {
                self.bits[byte] |= mask;
            } else {
                self.bits[byte] &= !mask;
            }
        }
    }

    /// Coordinates of every lit pixel
    pub fn lit_points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width)
                .filter(move |&x| self.pixel(x, y))
                .map(move |x| Point::new(x as i32, y as i32))
        })
    }

    pub fn lit_count(&self) -> usize {
        self.lit_points().count()
    }

    pub fn is_blank(&self) -> bool {
        self.lit_points().next().is_none()
    }

    /// Lit pixels inside `area`, clipped to the frame
    pub fn lit_count_in(&self, area: &Rectangle) -> usize {
        area.points()
            .filter(|p| p.x >= 0 && p.y >= 0 && self.pixel(p.x as u32, p.y as u32))
            .count()
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.is_on());
        Ok(())
    }
}
