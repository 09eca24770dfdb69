pub const GAUGE_MIN: f64 = -10.0;
pub const GAUGE_MAX: f64 = 40.0;

/// Maps a temperature onto the 0-100 fill of the status gauge.
pub fn normalize(temperature: f64) -> f64 {
    let fraction = (temperature - GAUGE_MIN) / (GAUGE_MAX - GAUGE_MIN) * 100.0;
    fraction.clamp(0.0, 100.0)
}
