//! Axum integration for Landmark request tracking.
//!
//! This crate binds a Landmark [`RequestState`](landmark_core::RequestState)
//! to every request handled by an axum router, so that concurrent requests
//! never observe each other's identify or track calls.
//!
//! # Request Flow
//!
//! 1. **Request arrives**: [`LandmarkLayer`] creates a fresh [`Tracker`]
//! 2. **Auto-track**: the (normalized) path of `GET` requests is tracked
//! 3. **Handler runs**: it records calls through the [`Landmark`] extractor
//! 4. **Identify**: an [`IdentityResolver`] names the user, if any
//! 5. **Render**: the script is rendered by a template via
//!    [`Landmark::javascript_tag`], or injected in place of
//!    [`SCRIPT_PLACEHOLDER`] in an HTML response
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, response::Html, routing::get};
//! use landmark_web::{landmark_layer, Landmark, SCRIPT_PLACEHOLDER};
//!
//! async fn signup(landmark: Landmark) -> Html<String> {
//!     landmark.tracker().track("Viewed Signup", Properties::new());
//!     Html(format!("<html><body>{SCRIPT_PLACEHOLDER}</body></html>"))
//! }
//!
//! let app = Router::new()
//!     .route("/signup", get(signup))
//!     .layer(landmark_layer(Arc::new(Config::from_env())));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod identity;
pub mod middleware;
pub mod tracker;

// Re-export key types for convenience
pub use error::LandmarkRejection;
pub use extractors::Landmark;
pub use identity::{ExtensionIdentity, Identity, IdentityResolver, RequestHead};
pub use middleware::{
    landmark_layer, LandmarkLayer, LandmarkMiddleware, MAX_INJECT_BYTES, SCRIPT_PLACEHOLDER,
};
pub use tracker::Tracker;
