//! Per-request handle to the Landmark state.
//!
//! [`LandmarkLayer`](crate::LandmarkLayer) creates one [`Tracker`] per request
//! and stores it in the request extensions. Clones share the same state, so
//! the middleware, the handler, and the template helper all see the same
//! calls, while concurrent requests each own a separate tracker.

use axum::response::Html;
use landmark_core::{render, Config, Properties, RequestState, Result};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// Shared handle to one request's [`RequestState`].
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    state: Arc<Mutex<RequestState>>,
}

impl Tracker {
    /// Create a tracker with empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identify the current user, replacing any earlier identification.
    pub fn identify(&self, user_id: impl Into<String>, traits: Properties) {
        let user_id = user_id.into();
        tracing::debug!(user_id = %user_id, "landmark identify");
        self.state.lock().identify(user_id, traits);
    }

    /// Identify the current user with serializable traits.
    ///
    /// # Errors
    ///
    /// Returns a contract violation if `traits` is not a JSON object.
    pub fn identify_with<T>(&self, user_id: impl Into<String>, traits: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let user_id = user_id.into();
        tracing::debug!(user_id = %user_id, "landmark identify");
        self.state.lock().identify_with(user_id, traits)
    }

    /// Track an action performed by the user.
    pub fn track(&self, action: impl Into<String>, properties: Properties) {
        let action = action.into();
        tracing::debug!(action = %action, "landmark track");
        self.state.lock().track(action, properties);
    }

    /// Track an action with serializable properties.
    ///
    /// # Errors
    ///
    /// Returns a contract violation if `properties` is not a JSON object.
    pub fn track_with<T>(&self, action: impl Into<String>, properties: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let action = action.into();
        tracing::debug!(action = %action, "landmark track");
        self.state.lock().track_with(action, properties)
    }

    /// Discard everything recorded so far.
    pub fn clear(&self) {
        self.state.lock().clear();
    }

    /// Read the state without copying it.
    pub fn with_state<R>(&self, f: impl FnOnce(&RequestState) -> R) -> R {
        f(&self.state.lock())
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> RequestState {
        self.with_state(Clone::clone)
    }

    /// Render the tracking script for the current state.
    #[must_use]
    pub fn render(&self, config: &Config) -> String {
        self.with_state(|state| render(state, config))
    }

    /// Render the tracking script as trusted HTML for a template.
    #[must_use]
    pub fn javascript_tag(&self, config: &Config) -> Html<String> {
        Html(self.render(config))
    }
}
