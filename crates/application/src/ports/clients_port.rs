//! Window clients port
//!
//! Foreground pages the worker can see, focus, open and claim.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApplicationError;

/// An open foreground page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowClient {
    /// Client identifier assigned by the host
    pub id: String,
    /// Page URL, absolute or root-relative
    pub url: String,
    /// Whether the page currently has focus
    pub focused: bool,
    /// Whether the worker controls this page
    pub controlled: bool,
}

/// Base used to resolve root-relative page URLs
const RELATIVE_BASE: &str = "http://localhost/";

impl WindowClient {
    /// Path component of the page URL, without query or fragment
    ///
    /// Values that cannot be parsed at all are returned unchanged.
    #[must_use]
    pub fn path(&self) -> String {
        Url::parse(&self.url)
            .or_else(|_| Url::parse(RELATIVE_BASE).and_then(|base| base.join(&self.url)))
            .map_or_else(|_| self.url.clone(), |url| url.path().to_string())
    }
}

/// Port for the worker's view of open foreground pages
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClientsPort: Send + Sync {
    /// All open window clients, including uncontrolled ones
    async fn match_windows(&self) -> Result<Vec<WindowClient>, ApplicationError>;

    /// Bring a client to focus
    async fn focus(&self, id: &str) -> Result<WindowClient, ApplicationError>;

    /// Open a new page at the given URL
    async fn open_window(&self, url: &str) -> Result<WindowClient, ApplicationError>;

    /// Take control of every open page
    async fn claim(&self) -> Result<(), ApplicationError>;
}
