//! WMO weather interpretation codes
//!
//! Open-Meteo reports the current condition as a numeric WMO code.
//! See: <https://open-meteo.com/en/docs> for the code reference.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phrase used for any code missing from the lookup table
pub const UNKNOWN_CONDITION: &str = "Unknown";

/// A raw WMO weather code as reported by the forecast provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherCode(i32);

impl WeatherCode {
    /// Wrap a raw code
    #[must_use]
    pub const fn new(code: i32) -> Self {
        Self(code)
    }

    /// The raw numeric code
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Fixed human-readable phrase for this code
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self.0 {
            0 => "Clear sky",
            1 => "Mainly clear",
            2 => "Partly cloudy",
            3 => "Overcast",
            45 => "Foggy",
            48 => "Depositing rime fog",
            51 => "Light drizzle",
            53 => "Moderate drizzle",
            55 => "Dense drizzle",
            56 => "Light freezing drizzle",
            57 => "Dense freezing drizzle",
            61 => "Slight rain",
            63 => "Moderate rain",
            65 => "Heavy rain",
            66 => "Light freezing rain",
            67 => "Heavy freezing rain",
            71 => "Slight snow",
            73 => "Moderate snow",
            75 => "Heavy snow",
            77 => "Snow grains",
            80 => "Slight rain showers",
            81 => "Moderate rain showers",
            82 => "Violent rain showers",
            85 => "Slight snow showers",
            86 => "Heavy snow showers",
            95 => "Thunderstorm",
            96 => "Thunderstorm with slight hail",
            99 => "Thunderstorm with heavy hail",
            _ => UNKNOWN_CONDITION,
        }
    }

    /// Whether the code is part of the lookup table
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.description() != UNKNOWN_CONDITION
    }
}

impl From<i32> for WeatherCode {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl fmt::Display for WeatherCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
