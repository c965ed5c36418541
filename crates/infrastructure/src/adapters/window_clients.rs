//! In-process window client registry
//!
//! Tracks the foreground pages the host knows about. Pages are added by the
//! host (e.g. when a UI connects) or by the worker through `open_window`.

use application::error::ApplicationError;
use application::ports::{ClientsPort, WindowClient};
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Window clients backed by memory
#[derive(Debug, Default)]
pub struct InMemoryWindowClients {
    clients: RwLock<Vec<WindowClient>>,
}

impl InMemoryWindowClients {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already open, unfocused and uncontrolled page
    pub fn add_page(&self, url: impl Into<String>) -> WindowClient {
        let client = WindowClient {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            focused: false,
            controlled: false,
        };
        self.clients.write().push(client.clone());
        debug!(id = %client.id, url = %client.url, "Page registered");
        client
    }

    /// Forget a page
    pub fn remove_page(&self, id: &str) -> bool {
        let mut clients = self.clients.write();
        let before = clients.len();
        clients.retain(|c| c.id != id);
        clients.len() != before
    }

    /// Snapshot of all known pages
    #[must_use]
    pub fn pages(&self) -> Vec<WindowClient> {
        self.clients.read().clone()
    }

    fn set_focus(clients: &mut [WindowClient], id: &str) -> Option<WindowClient> {
        let mut focused = None;
        for client in clients.iter_mut() {
            client.focused = client.id == id;
            if client.focused {
                focused = Some(client.clone());
            }
        }
        focused
    }
}

#[async_trait]
impl ClientsPort for InMemoryWindowClients {
    async fn match_windows(&self) -> Result<Vec<WindowClient>, ApplicationError> {
        Ok(self.pages())
    }

    async fn focus(&self, id: &str) -> Result<WindowClient, ApplicationError> {
        let focused = Self::set_focus(&mut self.clients.write(), id)
            .ok_or_else(|| ApplicationError::Internal(format!("Unknown window client: {id}")))?;
        info!(id, url = %focused.url, "Focused page");
        Ok(focused)
    }

    async fn open_window(&self, url: &str) -> Result<WindowClient, ApplicationError> {
        let id = Uuid::new_v4().to_string();
        let mut clients = self.clients.write();
        clients.push(WindowClient {
            id: id.clone(),
            url: url.to_string(),
            focused: false,
            controlled: true,
        });
        let opened = Self::set_focus(&mut clients, &id)
            .ok_or_else(|| ApplicationError::Internal("Opened page vanished".to_string()))?;
        info!(id = %opened.id, url, "Opened page");
        Ok(opened)
    }

    async fn claim(&self) -> Result<(), ApplicationError> {
        let mut clients = self.clients.write();
        for client in clients.iter_mut() {
            client.controlled = true;
        }
        debug!(count = clients.len(), "Claimed pages");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn claim_controls_every_page() {
        let clients = InMemoryWindowClients::new();
        clients.add_page("http://localhost:3000/");
        clients.add_page("http://localhost:3000/settings");

        clients.claim().await.unwrap();

        assert!(clients.pages().iter().all(|c| c.controlled));
    }

    #[tokio::test]
    async fn focus_is_exclusive() {
        let clients = InMemoryWindowClients::new();
        let first = clients.add_page("/");
        let second = clients.add_page("/about");

        clients.focus(&first.id).await.unwrap();
        let focused = clients.focus(&second.id).await.unwrap();

        assert!(focused.focused);
        let pages = clients.pages();
        assert_eq!(pages.iter().filter(|c| c.focused).count(), 1);
        assert!(pages.iter().any(|c| c.id == second.id && c.focused));
    }

    #[tokio::test]
    async fn focus_unknown_client_fails() {
        let clients = InMemoryWindowClients::new();
        assert!(clients.focus("missing").await.is_err());
    }

    #[tokio::test]
    async fn open_window_adds_focused_controlled_page() {
        let clients = InMemoryWindowClients::new();
        clients.add_page("/about");

        let opened = clients.open_window("/").await.unwrap();

        assert_eq!(opened.url, "/");
        assert!(opened.focused && opened.controlled);
        assert_eq!(clients.match_windows().await.unwrap().len(), 2);
    }

    #[test]
    fn remove_page() {
        let clients = InMemoryWindowClients::new();
        let page = clients.add_page("/");
        assert!(clients.remove_page(&page.id));
        assert!(!clients.remove_page(&page.id));
    }
}
