//! Horizontal bar charts drawn with block characters.

use std::io::{self, Write};

/// Width of the longest bar.
pub const BAR_WIDTH: usize = 40;

const BAR_CHAR: char = '█';

/// Renders one bar per `(label, count)` pair, scaled to the largest count.
///
/// ```text
/// IHRA category │ Count
///             0 │ ████████████████████ 20
///             1 │ █████ 5
/// ```
pub fn render_bar_chart<W: Write>(
    out: &mut W,
    x_label: &str,
    y_label: &str,
    bars: &[(String, u64)],
) -> io::Result<()> {
    let label_width = bars
        .iter()
        .map(|(label, _)| label.chars().count())
        .chain(std::iter::once(x_label.chars().count()))
        .max()
        .unwrap_or_default();
    let max = bars.iter().map(|(_, count)| *count).max().unwrap_or_default();

    writeln!(out, "{:>width$} │ {}", x_label, y_label, width = label_width)?;
    for (label, count) in bars {
        let bar: String = std::iter::repeat_n(BAR_CHAR, bar_length(*count, max)).collect();
        if bar.is_empty() {
            writeln!(out, "{:>width$} │ {}", label, count, width = label_width)?;
        } else {
            writeln!(out, "{:>width$} │ {} {}", label, bar, count, width = label_width)?;
        }
    }
    Ok(())
}

/// Non-zero counts always get at least one block.
fn bar_length(count: u64, max: u64) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    let scaled = (count as u128 * BAR_WIDTH as u128 / max as u128) as usize;
    scaled.max(1)
}
