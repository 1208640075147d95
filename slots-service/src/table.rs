// SPDX-License-Identifier: GPL-3.0-only

use std::fmt::Write;

use slots_types::{Slot, bytes_to_pretty, format_temperature};

const HEADERS: [&str; 9] = [
    "SLOT",
    "DEVICE",
    "TYPE",
    "MODEL",
    "MANUFACTURER",
    "SERIAL",
    "CAPACITY",
    "TEMPERATURE",
    "HEALTH",
];

const NONE: &str = "-";

fn row(slot: &Slot) -> [String; 9] {
    let Some(drive) = &slot.drive else {
        let mut cells: [String; 9] = std::array::from_fn(|_| NONE.to_string());
        cells[0] = slot.slot_id.clone();
        cells[2] = "Empty".to_string();
        return cells;
    };

    let smart = drive.smart_info.as_ref();
    [
        slot.slot_id.clone(),
        drive.path.clone(),
        drive.kind().as_str().to_string(),
        drive.model.clone(),
        drive.manufacturer().to_string(),
        drive.serial.clone(),
        bytes_to_pretty(drive.capacity, false),
        smart
            .and_then(|info| info.temperature)
            .map(format_temperature)
            .unwrap_or_else(|| NONE.to_string()),
        smart
            .map(|info| info.health.as_str().to_string())
            .unwrap_or_else(|| NONE.to_string()),
    ]
}

/// Render slots as an aligned text table, one row per slot.
pub fn render(slots: &[Slot]) -> String {
    let rows: Vec<[String; 9]> = slots.iter().map(row).collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS, &widths);
    let rule = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    out.push_str(&"-".repeat(rule));
    out.push('\n');
    for cells in &rows {
        push_line(&mut out, cells, &widths);
    }
    out
}

fn push_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let mut line = String::new();
    for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if index > 0 {
            line.push_str("  ");
        }
        let _ = write!(line, "{:<width$}", cell.as_ref(), width = *width);
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
