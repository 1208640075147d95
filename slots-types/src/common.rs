// SPDX-License-Identifier: GPL-3.0-only

//! Formatting helpers for human-readable output

use num_format::{Locale, ToFormattedString};

const UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Convert bytes to a binary-unit string (e.g. "3.64 TiB"), optionally with
/// the exact byte count appended.
pub fn bytes_to_pretty(bytes: u64, add_bytes: bool) -> String {
    let mut steps = 0;
    let mut val = bytes as f64;

    while val >= 1024. && steps < UNITS.len() - 1 {
        val /= 1024.;
        steps += 1;
    }

    if add_bytes {
        format!(
            "{:.2} {} ({} bytes)",
            val,
            UNITS[steps],
            bytes.to_formatted_string(&Locale::en)
        )
    } else {
        format!("{:.2} {}", val, UNITS[steps])
    }
}

/// Celsius reading shown alongside Fahrenheit.
pub fn format_temperature(celsius: i64) -> String {
    let fahrenheit = celsius as f64 * 9. / 5. + 32.;
    format!("{celsius}°C / {fahrenheit}°F")
}
