//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod cache_storage_port;
mod clients_port;
mod geolocation_port;
mod notification_port;
mod weather_port;
mod worker_container_port;

pub use cache_storage_port::CacheStoragePort;
#[cfg(test)]
pub use cache_storage_port::MockCacheStoragePort;
pub use clients_port::{ClientsPort, WindowClient};
#[cfg(test)]
pub use clients_port::MockClientsPort;
pub use geolocation_port::GeolocationPort;
#[cfg(test)]
pub use geolocation_port::MockGeolocationPort;
pub use notification_port::NotificationPort;
#[cfg(test)]
pub use notification_port::MockNotificationPort;
pub use weather_port::WeatherPort;
#[cfg(test)]
pub use weather_port::MockWeatherPort;
pub use worker_container_port::{WorkerContainerPort, WorkerRegistration};
#[cfg(test)]
pub use worker_container_port::MockWorkerContainerPort;
