/// Built-in fonts selectable from the config file
///
/// ISO-8859-1 variants so the degree sign on the CPU line renders.

use embedded_graphics::mono_font::{iso_8859_1, MonoFont};

pub const FONT_NAMES: &[&str] = &["5x8", "6x10", "6x12", "6x13", "7x13", "7x14", "8x13", "9x15"];

pub fn font_by_name(name: &str) -> Option<&'static MonoFont<'static>> {
    let font = match name {
        "5x8" => &iso_8859_1::FONT_5X8,
        "6x10" => &iso_8859_1::FONT_6X10,
        "6x12" => &iso_8859_1::FONT_6X12,
        "6x13" => &iso_8859_1::FONT_6X13,
        "7x13" => &iso_8859_1::FONT_7X13,
        "7x14" => &iso_8859_1::FONT_7X14,
        "8x13" => &iso_8859_1::FONT_8X13,
        "9x15" => &iso_8859_1::FONT_9X15,
        _ => return None,
    };
    Some(font)
}
