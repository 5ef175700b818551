//! Human-readable formatting

const BINARY_UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];
const SI_UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Formats a byte count as e.g. `"34.5 MiB"`, or `"36.2 MB"` with SI units.
///
/// Values are rounded to one decimal; a trailing `.0` is dropped.
pub fn human_readable_bytes(bytes: u64, si: bool) -> String {
    let (base, units) = if si {
        (1000.0, &SI_UNITS)
    } else {
        (1024.0, &BINARY_UNITS)
    };

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= base && unit < units.len() - 1 {
        value /= base;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    // 1023.96 KiB rounds up to a full MiB
    if rounded >= base && unit < units.len() - 1 {
        return format!("1 {}", units[unit + 1]);
    }

    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, units[unit])
    } else {
        format!("{:.1} {}", rounded, units[unit])
    }
}
