//! Extractor giving handlers access to the request's tracker.
//!
//! # Example
//!
//! ```ignore
//! use landmark_web::Landmark;
//!
//! async fn checkout(landmark: Landmark) -> Html<String> {
//!     landmark.tracker().track("Checked Out", Properties::new());
//!     Html(format!("<html><body>...{}</body></html>", landmark.javascript_tag().0))
//! }
//! ```

use crate::error::LandmarkRejection;
use crate::tracker::Tracker;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts, response::Html};
use landmark_core::Config;
use std::sync::Arc;

/// The current request's [`Tracker`] together with the process configuration.
///
/// Extraction fails with [`LandmarkRejection::MissingLayer`] when the router
/// does not use [`landmark_layer`](crate::landmark_layer).
#[derive(Debug, Clone)]
pub struct Landmark {
    tracker: Tracker,
    config: Arc<Config>,
}

impl Landmark {
    /// The request's tracker.
    #[must_use]
    pub const fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// The configuration the layer was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Render the tracking script for everything recorded so far.
    #[must_use]
    pub fn javascript_tag(&self) -> Html<String> {
        self.tracker.javascript_tag(&self.config)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Landmark
where
    S: Send + Sync,
{
    type Rejection = LandmarkRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tracker = parts
            .extensions
            .get::<Tracker>()
            .cloned()
            .ok_or(LandmarkRejection::MissingLayer)?;
        let config = parts
            .extensions
            .get::<Arc<Config>>()
            .cloned()
            .ok_or(LandmarkRejection::MissingLayer)?;

        Ok(Self { tracker, config })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;
    use landmark_core::Properties;

    #[tokio::test]
    async fn test_extracts_tracker_from_extensions() {
        let tracker = Tracker::new();
        let mut req = Request::builder().body(()).unwrap();
        req.extensions_mut().insert(tracker.clone());
        req.extensions_mut()
            .insert(Arc::new(Config::new().with_api_key("KEY")));

        let (mut parts, ()) = req.into_parts();
        let landmark = Landmark::from_request_parts(&mut parts, &()).await.unwrap();

        landmark.tracker().track("/", Properties::new());
        assert_eq!(tracker.with_state(|s| s.events().len()), 1);
        assert_eq!(landmark.config().api_key(), Some("KEY"));
    }

    #[tokio::test]
    async fn test_missing_layer_rejected() {
        let req = Request::builder().body(()).unwrap();
        let (mut parts, ()) = req.into_parts();

        let err = Landmark::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err, LandmarkRejection::MissingLayer);
    }
}
