//! Navigation event sinks

use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;

use super::routes::Route;

/// Receives navigation requests issued outside the view layer, e.g. the
/// login redirect after the backend rejected the credential
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Forwards navigation events to a channel consumed by the UI loop
pub struct ChannelNavigator {
    sender: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        if self.sender.send(route).is_err() {
            log::debug!("Navigation to {} dropped, receiver closed", route);
        }
    }
}

/// Keeps every navigation in order
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<Route>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn current(&self) -> Option<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, route: Route) {
        log::debug!("Navigating to {}", route);
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}
