//! Human-readable formatting for traffic figures.

/// Render a rate given in KB/s, switching to MB/s above 1000.
pub fn format_rate(kbps: u32) -> String {
    if kbps > 1000 {
        format!("{:.1} MB/s", f64::from(kbps) / 1000.0)
    } else {
        format!("{kbps} KB/s")
    }
}
