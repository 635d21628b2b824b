//! Display rounding for distances.
//!
//! Every distance that leaves the process (JSON, CLI output) goes through
//! [`round_km`]. The ranker never rounds.

/// Decimal places kept when a distance is shown.
pub const DISPLAY_DECIMALS: i32 = 2;

/// Round a distance for display, half away from zero.
pub fn round_km(km: f64) -> f64 {
    let scale = 10f64.powi(DISPLAY_DECIMALS);
    (km * scale).round() / scale
}

/// `"1153.24 km"`.
pub fn format_km(km: f64) -> String {
    format!("{:.*} km", DISPLAY_DECIMALS as usize, round_km(km))
}
