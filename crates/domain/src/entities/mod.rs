//! Domain entities - Values created and discarded within one trigger

mod alert;
mod notification;
mod weather_snapshot;

pub use alert::Alert;
pub use notification::{
    DEFAULT_ICON_PATH, DEFAULT_PUSH_BODY, DEFAULT_PUSH_TITLE, NotificationRequest,
    VIBRATION_PATTERN, WEATHER_NOTIFICATION_TAG,
};
pub use weather_snapshot::{DailySummary, HourlySample, WeatherSnapshot};
