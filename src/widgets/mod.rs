// Drawing building blocks shared by the screens:
// - Frame: the off-screen bitmap every screen draws into
// - TickIndicator: liveness square in the top-right corner
// - font_by_name: built-in fonts selectable from the config

pub mod font;
pub mod frame;
pub mod tick;

pub use font::{font_by_name, FONT_NAMES};
pub use frame::Frame;
pub use tick::TickIndicator;
