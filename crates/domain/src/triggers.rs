//! Worker triggers - Strongly typed representations of worker events
//!
//! Messages from the foreground app arrive as JSON tagged by a `type`
//! string; they are converted into [`Trigger`] before dispatch so every
//! trigger kind is matched exhaustively.

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::Coordinates;

/// Periodic sync tag that produces weather notifications
pub const WEATHER_SYNC_TAG: &str = "weather-sync";

/// Messages the foreground app posts to the worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    /// Replace the stored coordinates
    SetCoordinates {
        /// Latitude in degrees
        lat: f64,
        /// Longitude in degrees
        lon: f64,
    },

    /// Run the fetch/derive/notify pipeline now
    ManualWeatherUpdate {
        /// Optional latitude; stored coordinates are used when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lat: Option<f64>,
        /// Optional longitude; stored coordinates are used when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lon: Option<f64>,
    },
}

impl WorkerMessage {
    /// Build a `SET_COORDINATES` message
    #[must_use]
    pub const fn set_coordinates(coordinates: Coordinates) -> Self {
        Self::SetCoordinates {
            lat: coordinates.latitude(),
            lon: coordinates.longitude(),
        }
    }

    /// Build a `MANUAL_WEATHER_UPDATE` message
    #[must_use]
    pub fn manual_update(coordinates: Option<Coordinates>) -> Self {
        Self::ManualWeatherUpdate {
            lat: coordinates.map(|c| c.latitude()),
            lon: coordinates.map(|c| c.longitude()),
        }
    }

    /// Parse a message from its JSON form
    ///
    /// # Errors
    ///
    /// Returns `InvalidMessage` for unknown `type` values or missing fields.
    pub fn from_json(value: serde_json::Value) -> Result<Self, DomainError> {
        serde_json::from_value(value).map_err(|e| DomainError::InvalidMessage(e.to_string()))
    }
}

/// Title/body carried by a push message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushContent {
    /// Explicit title
    #[serde(default)]
    pub title: Option<String>,
    /// Explicit body
    #[serde(default)]
    pub body: Option<String>,
}

impl PushContent {
    /// Non-empty title, if any
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Non-empty body, if any
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref().filter(|b| !b.is_empty())
    }

    /// Whether the push carries any explicit text to show verbatim
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.title().is_some() || self.body().is_some()
    }
}

/// Raw push data as delivered by the push service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushPayload {
    data: Option<Vec<u8>>,
}

impl PushPayload {
    /// A push without data
    #[must_use]
    pub const fn empty() -> Self {
        Self { data: None }
    }

    /// A push carrying raw bytes
    #[must_use]
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Some(data.into()),
        }
    }

    /// Whether any data was delivered
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Decode the payload as `{title?, body?}` JSON
    ///
    /// Returns `Ok(None)` when no data was delivered.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPushPayload` when data is present but is not a JSON
    /// object of the expected shape.
    pub fn content(&self) -> Result<Option<PushContent>, DomainError> {
        let Some(data) = &self.data else {
            return Ok(None);
        };
        serde_json::from_slice::<PushContent>(data)
            .map(Some)
            .map_err(|e| DomainError::MalformedPushPayload(e.to_string()))
    }
}

/// Every event the worker reacts to once it is ready
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Store new coordinates
    SetCoordinates(Coordinates),
    /// Foreground-requested update; falls back to stored coordinates
    ManualUpdate {
        /// Explicit coordinates from the message, if complete
        coordinates: Option<Coordinates>,
    },
    /// Push message from the server
    Push(PushPayload),
    /// Platform periodic sync wake-up
    PeriodicSync {
        /// Registered sync tag
        tag: String,
    },
    /// User clicked a notification
    NotificationClick {
        /// Tag of the clicked notification
        tag: String,
    },
}

impl Trigger {
    /// Short name used in logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SetCoordinates(_) => "set_coordinates",
            Self::ManualUpdate { .. } => "manual_update",
            Self::Push(_) => "push",
            Self::PeriodicSync { .. } => "periodic_sync",
            Self::NotificationClick { .. } => "notification_click",
        }
    }
}

impl TryFrom<WorkerMessage> for Trigger {
    type Error = DomainError;

    fn try_from(message: WorkerMessage) -> Result<Self, Self::Error> {
        match message {
            WorkerMessage::SetCoordinates { lat, lon } => {
                Ok(Self::SetCoordinates(Coordinates::new(lat, lon)?))
            },
            WorkerMessage::ManualWeatherUpdate {
                lat: Some(lat),
                lon: Some(lon),
            } => Ok(Self::ManualUpdate {
                coordinates: Some(Coordinates::new(lat, lon)?),
            }),
            WorkerMessage::ManualWeatherUpdate { .. } => Ok(Self::ManualUpdate { coordinates: None }),
        }
    }
}
