//! HTTP API for the conversation relay

mod handlers;
mod types;

pub use handlers::create_router;
pub use types::{ChatRequest, ChatResponse, ErrorResponse, VersionResponse};

use crate::relay::Relay;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

impl AppState {
    pub fn new(relay: Relay) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}
