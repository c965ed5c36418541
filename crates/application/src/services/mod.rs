//! Application services
//!
//! The worker pipeline (derivation, coordinate store, trigger dispatch) and
//! the foreground bridge that drives it.

pub mod alert_deriver;
mod coordinate_store;
mod foreground_bridge;
mod trigger_dispatcher;

pub use alert_deriver::{RAIN_ALERT_THRESHOLD, RAIN_WINDOW_SAMPLES, derive_alert, rain_probability};
pub use coordinate_store::CoordinateStore;
pub use foreground_bridge::{
    BridgeConfig, DEFAULT_MANUAL_TRIGGER_DELAY, ForegroundBridge, ManualTrigger,
    WEATHER_SYNC_MIN_INTERVAL,
};
pub use trigger_dispatcher::{
    DEFAULT_CACHE_VERSION, DispatcherConfig, TriggerDispatcher, WorkerState,
};
