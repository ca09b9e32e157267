/// Periodic metrics screen
///
/// Layout, top to bottom, one line per font row plus `LINE_SPACING`:
/// timestamp, IP, CPU + temperature, memory, disk.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::core::Stats;
use crate::utils::{usage_percent, Aligner, LINE_SPACING};

pub fn ip_line(stats: &Stats, aligner: &Aligner) -> String {
    aligner.right(&format!("IP:{}", stats.ip))
}

pub fn cpu_line(stats: &Stats, aligner: &Aligner) -> String {
    aligner.formatted(&format!(
        "CPU:{:>3.0}%*{:.1}°c",
        stats.cpu_percent, stats.temperature_c
    ))
}

pub fn mem_line(stats: &Stats, aligner: &Aligner) -> String {
    aligner.formatted(&format!(
        "MEM:{:>3.0}%*{:.1}GB",
        stats.used_mem_percent, stats.total_mem_gib
    ))
}

/// Shows `0%` when no disk space was reported
pub fn disk_line(stats: &Stats, aligner: &Aligner) -> String {
    let percent = usage_percent(stats.disk_used_gib, stats.disk_total_gib);
    aligner.formatted(&format!(
        "DSK:{:>4}*{:.0}GB",
        format!("{:.0}%", percent),
        stats.disk_total_gib
    ))
}

/// The four metric lines below the timestamp
pub fn metric_lines(stats: &Stats, aligner: &Aligner) -> [String; 4] {
    [
        ip_line(stats, aligner),
        cpu_line(stats, aligner),
        mem_line(stats, aligner),
        disk_line(stats, aligner),
    ]
}

/// Plain-text rendition for stdout, optionally headed by a column ruler
pub fn console_lines(stats: &Stats, aligner: &Aligner, ruler: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(5);
    if ruler {
        lines.push(aligner.ruler());
    }
    lines.extend(metric_lines(stats, aligner));
    lines
}

pub fn line_pitch(font: &MonoFont<'_>) -> i32 {
    (font.character_size.height + LINE_SPACING) as i32
}

/// Draw the timestamp and metric lines starting at the top-left corner
pub fn draw<D>(
    target: &mut D,
    font: &MonoFont<'_>,
    timestamp: &str,
    lines: &[String],
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(font, BinaryColor::On);
    let pitch = line_pitch(font);

    let rows = std::iter::once(timestamp).chain(lines.iter().map(String::as_str));
    for (row, text) in rows.enumerate() {
        Text::with_baseline(text, Point::new(0, row as i32 * pitch), style, Baseline::Top)
            .draw(target)?;
    }

    Ok(())
}
