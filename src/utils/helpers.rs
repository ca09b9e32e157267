/// Helper utilities for laying out text on the OLED
///
/// The panel shows a fixed number of character columns, so every metric line
/// goes through one of the two alignment helpers below before it is drawn.

use crate::utils::{BYTES_PER_GIB, PLACEHOLDER};

/// Expand the placeholder in `template` so the line spans the display width
///
/// The fixed text (template minus the placeholder) is measured in characters.
/// When it is at least `width` long the placeholder is just removed and the
/// line is allowed to overflow. Otherwise the placeholder becomes
/// `width - fixed + 1` spaces, giving a line of `width + 1` characters.
pub fn aligned(template: &str, width: usize) -> String {
    let fixed = template.chars().filter(|c| *c != PLACEHOLDER).count();

    if fixed >= width {
        return template.replace(PLACEHOLDER, "");
    }

    let gap = " ".repeat(width - fixed + 1);
    template.replace(PLACEHOLDER, &gap)
}

/// Keep only the trailing `width` characters of `text`
///
/// Used for the IP line, where the end of the address is the useful part.
pub fn right_aligned(text: &str, width: usize) -> String {
    let length = text.chars().count();

    if length <= width {
        return text.to_string();
    }

    text.chars().skip(length - width).collect()
}

/// Fixed-width line formatter bound to a display width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aligner {
    display_length: usize,
}

impl Aligner {
    pub fn new(display_length: usize) -> Self {
        Self { display_length }
    }

    pub fn display_length(&self) -> usize {
        self.display_length
    }

    /// See [`aligned`]
    pub fn formatted(&self, template: &str) -> String {
        aligned(template, self.display_length)
    }

    /// See [`right_aligned`]
    pub fn right(&self, text: &str) -> String {
        right_aligned(text, self.display_length)
    }

    /// Column ruler for console output, e.g. `----+----+----+-` for 16 columns
    pub fn ruler(&self) -> String {
        (1..=self.display_length)
            .map(|col| if col % 5 == 0 { '+' } else { '-' })
            .collect()
    }
}

/// Convert a byte count to GiB
pub fn bytes_to_gib(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GIB
}

/// Whole-number percentage of `used / total`, `0` when `total` is not positive
pub fn usage_percent(used: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    (used / total * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_pads_to_width_plus_one() {
        let line = aligned("CPU:* 50%", 16);
        assert_eq!(line, format!("CPU:{} 50%", " ".repeat(9)));
        assert_eq!(line.chars().count(), 17);
    }

    #[test]
    fn test_aligned_length_for_all_short_templates() {
        for width in 1..=24 {
            for fixed in 0..width {
                let template = format!("{}*", "x".repeat(fixed));
                assert_eq!(aligned(&template, width).chars().count(), width + 1);
            }
        }
    }

    #[test]
    fn test_aligned_removes_marker_when_too_long() {
        assert_eq!(aligned("MEM:100%*1234.5GB", 16), "MEM:100%1234.5GB");
        assert_eq!(aligned("ABCDEFGHIJKLMNOPQRS*T", 16), "ABCDEFGHIJKLMNOPQRST");
        // Exactly at the width also drops the marker
        assert_eq!(aligned("0123456789*ABCDEF", 16), "0123456789ABCDEF");
    }

    #[test]
    fn test_aligned_counts_characters_not_bytes() {
        let line = aligned("CPU: 12%*45.1°c", 16);
        assert_eq!(line.chars().count(), 17);
        assert!(line.ends_with("45.1°c"));
    }

    #[test]
    fn test_right_aligned_keeps_short_text() {
        assert_eq!(right_aligned("IP:192.168.1.123", 16), "IP:192.168.1.123");
        assert_eq!(right_aligned("", 16), "");
    }

    #[test]
    fn test_right_aligned_keeps_tail() {
        let text = "IP:2001:db8::8a2e:370:7334";
        let line = right_aligned(text, 16);
        assert_eq!(line.chars().count(), 16);
        assert!(text.ends_with(&line));
        assert_eq!(line, "8::8a2e:370:7334");
    }

    #[test]
    fn test_ruler() {
        assert_eq!(Aligner::new(16).ruler(), "----+----+----+-");
        assert_eq!(Aligner::new(3).ruler(), "---");
    }

    #[test]
    fn test_bytes_to_gib() {
        assert_eq!(bytes_to_gib(1073741824), 1.0);
        assert_eq!(bytes_to_gib(0), 0.0);
    }

    #[test]
    fn test_usage_percent_guards_zero_total() {
        assert_eq!(usage_percent(10.0, 0.0), 0.0);
        assert_eq!(usage_percent(25.0, 100.0), 25.0);
    }
}
