use flashbar_core::visual::SurfaceChange;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  ").trim_end());

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

pub fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

/// One-line description of a visual change, e.g. `top-bar on`.
pub fn describe(change: &SurfaceChange) -> String {
    match change {
        SurfaceChange::Flash { target, on } => format!("{target} {}", on_off(*on)),
        SurfaceChange::IndicatorVisible(true) => "indicator shown".to_string(),
        SurfaceChange::IndicatorVisible(false) => "indicator hidden".to_string(),
        SurfaceChange::ReminderActive(true) => "reminder enabled".to_string(),
        SurfaceChange::ReminderActive(false) => "reminder disabled".to_string(),
        SurfaceChange::FlashColor(color) => format!("color {color}"),
    }
}

/// Milliseconds as seconds with millisecond precision, e.g. `30.200s`.
pub fn format_secs(ms: u64) -> String {
    format!("{}.{:03}s", ms / 1000, ms % 1000)
}
