//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations: the
//! Open-Meteo client and the in-process platform surfaces the worker host
//! provides (notifications, caches, window clients, geolocation).

mod cache_storage;
mod geolocation;
mod notification_center;
mod weather_adapter;
mod window_clients;

pub use cache_storage::InMemoryCacheStorage;
pub use geolocation::StaticGeolocation;
pub use notification_center::InMemoryNotificationCenter;
pub use weather_adapter::WeatherAdapter;
pub use window_clients::InMemoryWindowClients;
