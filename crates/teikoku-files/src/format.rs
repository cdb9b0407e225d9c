//! Human-readable byte counts

/// Units indexed by power of 1024. A 64-bit count never exceeds EB.
const UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Formats a signed byte count as a magnitude string such as `"2.5KB"`
///
/// The value is scaled by the largest power of 1024 not exceeding it and
/// rounded to one decimal place, ties to even. Whole values print without a
/// fractional part, negative counts keep their sign.
///
/// # Examples
///
/// ```
/// use teikoku_files::format::format_byte_count;
///
/// assert_eq!(format_byte_count(0), "0B");
/// assert_eq!(format_byte_count(2560), "2.5KB");
/// assert_eq!(format_byte_count(-2048), "-2KB");
/// ```
pub fn format_byte_count(byte_count: i64) -> String {
    render(byte_count < 0, byte_count.unsigned_abs())
}

/// Formats an unsigned byte count, see [`format_byte_count`]
pub fn format_unsigned(byte_count: u64) -> String {
    render(false, byte_count)
}

/// Index into the unit table for `bytes`, i.e. `floor(log_1024(bytes))`
pub fn magnitude(bytes: u64) -> usize {
    let mut rest = bytes;
    let mut place = 0;
    while rest >= 1024 && place < UNITS.len() - 1 {
        rest /= 1024;
        place += 1;
    }
    place
}

/// Unit suffix for a magnitude returned by [`magnitude`]
pub fn unit(magnitude: usize) -> &'static str {
    UNITS[magnitude.min(UNITS.len() - 1)]
}

fn render(negative: bool, bytes: u64) -> String {
    if bytes == 0 {
        return format!("0{}", UNITS[0]);
    }

    let place = magnitude(bytes);
    let scaled = bytes as f64 / 1024f64.powi(place as i32);
    let value = (scaled * 10.0).round_ties_even() / 10.0;
    let sign = if negative { "-" } else { "" };

    format!("{sign}{value}{}", UNITS[place])
}
