//! # Landmark Core
//!
//! Request-scoped analytics state and the client-side script it renders to.
//!
//! During one request the application identifies the current user and
//! tracks the actions they perform. At response time the accumulated calls
//! are rendered into a `<script>` block that replays them against the
//! Landmark JavaScript client.
//!
//! ## Core Concepts
//!
//! - **[`RequestState`]**: identified user, traits, and ordered events for one request
//! - **[`ScriptRenderer`]**: deterministic `RequestState` + [`Config`] → script text
//! - **[`normalize_path`]**: collapses id segments of page paths to `-`
//! - **[`Config`]**: API key and normalization policy, loaded once per process
//!
//! This crate does no request handling of its own. `landmark-web` binds a
//! `RequestState` to each axum request.
//!
//! ## Example
//!
//! ```
//! use landmark_core::{render, Config, Properties, RequestState};
//!
//! let config = Config::new().with_api_key("KEY");
//! let mut state = RequestState::new();
//! state.track("/", Properties::new());
//!
//! assert_eq!(
//!     render(&state, &config),
//!     concat!(
//!         "<script>window.landmark=[];</script>\n",
//!         "<script src=\"https://landmark.io/landmark.js\"></script>\n",
//!         "<script>\n",
//!         "landmark.push(\"initialize\", \"KEY\");\n",
//!         "landmark.push(\"track\", \"/\", {});\n",
//!         "</script>\n",
//!     )
//! );
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod json;
pub mod path;
pub mod script;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfigError, LandmarkError, Result};
pub use event::{properties, Event, Properties};
pub use path::normalize_path;
pub use script::{render, ScriptRenderer};
pub use state::RequestState;
