//! Units formatting and conversion utilities
//!
//! Human-readable sizes, durations and latencies, plus size parsing for
//! command line arguments.

use std::time::Duration;

/// Format bytes into human-readable size with appropriate units
///
/// # Examples
/// ```
/// use iolat::util::units::format_bytes;
///
/// assert_eq!(format_bytes(1024), "1.0 KiB");
/// assert_eq!(format_bytes(1048576), "1.0 MiB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Parse human-readable size string into bytes
///
/// Units are binary: B, K/KiB, M/MiB, G/GiB
///
/// # Examples
/// ```
/// use iolat::util::units::parse_bytes;
///
/// assert_eq!(parse_bytes("4096").unwrap(), 4096);
/// assert_eq!(parse_bytes("64KiB").unwrap(), 65536);
/// assert_eq!(parse_bytes("1 G").unwrap(), 1073741824);
/// ```
pub fn parse_bytes(input: &str) -> Result<u64, String> {
    let input = input.trim();

    let (number_part, unit_part) = if let Some(space_pos) = input.rfind(' ') {
        (&input[..space_pos], &input[space_pos + 1..])
    } else {
        let split_pos = input
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| i)
            .unwrap_or(input.len());
        (&input[..split_pos], &input[split_pos..])
    };

    let number: f64 = number_part
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {}", number_part))?;

    if number < 0.0 || !number.is_finite() {
        return Err("Size cannot be negative".to_string());
    }

    let multiplier = match unit_part.to_uppercase().as_str() {
        "" | "B" => 1u64,
        "K" | "KIB" => 1 << 10,
        "M" | "MIB" => 1 << 20,
        "G" | "GIB" => 1 << 30,
        _ => return Err(format!("Unknown unit: {}", unit_part)),
    };

    Ok((number * multiplier as f64) as u64)
}

/// Format duration into human-readable string
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use iolat::util::units::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 3600 {
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if total_secs >= 60 {
        format!("{}m {}s", total_secs / 60, total_secs % 60)
    } else if total_secs > 0 {
        if millis > 0 {
            format!("{}.{:02}s", total_secs, millis / 10)
        } else {
            format!("{}s", total_secs)
        }
    } else {
        format!("{}ms", millis)
    }
}

/// Throughput in MiB/s
pub fn calculate_throughput_mbps(bytes: u64, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 0.0;
    }
    bytes as f64 / 1_048_576.0 / duration.as_secs_f64()
}

/// Format a latency given in microseconds
///
/// # Examples
/// ```
/// use iolat::util::units::format_latency_us;
///
/// assert_eq!(format_latency_us(5681.04), "5.68ms");
/// assert_eq!(format_latency_us(512.5), "512.50us");
/// ```
pub fn format_latency_us(micros: f64) -> String {
    if micros >= 1000.0 {
        format!("{:.2}ms", micros / 1000.0)
    } else {
        format!("{:.2}us", micros)
    }
}
