//! Host telemetry on a small SSD1306 OLED
//!
//! Samples IP address, CPU load, temperature, memory and disk usage every few
//! seconds and renders them as fixed-width text on a 128x64 panel over I2C.

pub mod app;
pub mod cli;
pub mod core;
pub mod renderer;
pub mod screens;
pub mod utils;
pub mod widgets;

pub use app::{AgentContext, App, Scheduler};
pub use renderer::{FrameRenderer, RenderPhase};
