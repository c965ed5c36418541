//! Alert derivation
//!
//! Turns a weather snapshot into the title/body pair shown to the user.
//! Pure and deterministic given `(snapshot, now)`, so push, periodic and
//! manual triggers converge on identical notification text.

use chrono::{DateTime, Duration, Utc};
use domain::{Alert, HourlySample, WeatherSnapshot};
use tracing::debug;

/// Number of hourly samples considered for the rain outlook
pub const RAIN_WINDOW_SAMPLES: usize = 4;

/// Rain probability (percent) above which the body is attention-flagged
pub const RAIN_ALERT_THRESHOLD: u8 = 30;

/// Derive the alert for a snapshot at a given instant
#[must_use]
pub fn derive_alert(snapshot: &WeatherSnapshot, now: DateTime<Utc>) -> Alert {
    let temperature = round_temperature(snapshot.temperature);
    let condition = snapshot.weather_code.description();
    let rain = rain_probability(&snapshot.hourly, now);

    let title = format!("{temperature}°C - {condition}");
    let body = if rain > RAIN_ALERT_THRESHOLD {
        format!("⚠️ {rain}% chance of rain in the next 4 hours")
    } else {
        format!("Rain probability: {rain}% in next 4 hours")
    };

    Alert::new(title, body)
}

/// Maximum precipitation probability over the next few hourly samples
///
/// The window starts at the first sample strictly later than `now` and spans
/// up to [`RAIN_WINDOW_SAMPLES`] entries. Returns 0 when no sample lies in
/// the future.
#[must_use]
pub fn rain_probability(hourly: &[HourlySample], now: DateTime<Utc>) -> u8 {
    let Some(start) = hourly.iter().position(|sample| sample.time > now) else {
        return 0;
    };
    let window = &hourly[start..hourly.len().min(start + RAIN_WINDOW_SAMPLES)];

    if window
        .windows(2)
        .any(|pair| pair[1].time - pair[0].time != Duration::hours(1))
    {
        debug!(
            samples = window.len(),
            "Rain window samples are not hourly spaced"
        );
    }

    window
        .iter()
        .map(|sample| sample.precipitation_probability)
        .max()
        .unwrap_or(0)
}

/// Round half up to the nearest whole degree
///
/// `-0.5` rounds to `0`, never to a negative zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_temperature(celsius: f64) -> i64 {
    (celsius + 0.5).floor() as i64
}
