//! Open-Meteo weather integration
//!
//! Client for the Open-Meteo forecast API (<https://open-meteo.com>).
//! Provides current conditions and the hourly precipitation outlook without
//! requiring an API key.

pub mod client;
mod models;

pub use client::{HOURLY_FIELDS, OpenMeteoClient, WeatherClient, WeatherConfig, WeatherError};
pub use models::{CurrentConditions, DailyForecast, Forecast, HourlyForecast};
