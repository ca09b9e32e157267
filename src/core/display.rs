/// SSD1306 OLED transport over Linux I2C
///
/// The renderer composes frames off-screen and only hands finished frames to
/// a `DisplayTransport`, which keeps all hardware I/O in this module.

use std::path::Path;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use linux_embedded_hal::I2cdev;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};
use tracing::{debug, info};

use crate::core::error::DisplayError;
use crate::utils::{OLED_HEIGHT, OLED_WIDTH};
use crate::widgets::Frame;

/// Sink for finished frames
pub trait DisplayTransport {
    /// Transfer a full frame to the panel
    fn push_frame(&mut self, frame: &Frame) -> Result<(), DisplayError>;

    /// Turn the panel off
    fn power_off(&mut self) -> Result<(), DisplayError>;
}

/// Push an all-off frame and switch the panel off
///
/// Needs no font or layout, so it works whatever the text settings are.
pub fn blank_and_power_off<T: DisplayTransport>(
    transport: &mut T,
    width: u32,
    height: u32,
) -> Result<(), DisplayError> {
    transport.push_frame(&Frame::new(width, height))?;
    transport.power_off()
}

type Oled = Ssd1306<
    I2CInterface<I2cdev>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

pub struct Ssd1306Transport {
    display: Oled,
}

impl Ssd1306Transport {
    /// Open the I2C bus and run the panel power-on sequence
    pub fn init(bus: &Path, width: u32, height: u32, address: u8) -> Result<Self, DisplayError> {
        if (width, height) != (OLED_WIDTH, OLED_HEIGHT) {
            return Err(DisplayError::UnsupportedSize { width, height });
        }

        let i2c = I2cdev::new(bus).map_err(|e| DisplayError::Bus {
            path: bus.display().to_string(),
            reason: e.to_string(),
        })?;

        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        display
            .init()
            .map_err(|e| DisplayError::Init(format!("{:?}", e)))?;

        info!(
            "SSD1306 {}x{} ready on {} at {:#04x}",
            width,
            height,
            bus.display(),
            address
        );

        Ok(Self { display })
    }
}

impl DisplayTransport for Ssd1306Transport {
    fn push_frame(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        self.display.clear_buffer();
        self.display
            .draw_iter(frame.lit_points().map(|p| Pixel(p, BinaryColor::On)))
            .map_err(|e| DisplayError::Transport(format!("{:?}", e)))?;
        self.display
            .flush()
            .map_err(|e| DisplayError::Transport(format!("{:?}", e)))
    }

    fn power_off(&mut self) -> Result<(), DisplayError> {
        debug!("Powering off display");
        self.display
            .set_display_on(false)
            .map_err(|e| DisplayError::Transport(format!("{:?}", e)))
    }
}
