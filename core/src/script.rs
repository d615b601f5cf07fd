//! Rendering of the client-side tracking script.
//!
//! The script is assembled from independent line-producing steps, always in
//! the same order:
//!
//! ```text
//! <script>window.landmark=[];</script>                       ← prologue
//! <script src="https://landmark.io/landmark.js"></script>    ← prologue
//! <script>
//! landmark.push("initialize", <api_key>);                    ← always
//! landmark.push("identify", <user_id>, <traits>);            ← if identified
//! landmark.push("track", <action>, <properties>);            ← one per event
//! </script>
//! ```
//!
//! Every value is encoded with [`json::encode`], which is the only place
//! escaping happens.

use crate::config::Config;
use crate::event::{Event, Properties};
use crate::json;
use crate::state::RequestState;

/// Fixed tags that create the client-side call queue and load the library.
pub const PROLOGUE: &str = concat!(
    "<script>window.landmark=[];</script>\n",
    "<script src=\"https://landmark.io/landmark.js\"></script>\n",
);

const OPEN_TAG: &str = "<script>\n";
const CLOSE_TAG: &str = "</script>\n";

/// Renders a [`RequestState`] against a fixed [`Config`].
///
/// # Example
///
/// ```
/// use landmark_core::{Config, Properties, RequestState, ScriptRenderer};
///
/// let config = Config::new().with_api_key("KEY");
/// let mut state = RequestState::new();
/// state.track("/", Properties::new());
///
/// let script = ScriptRenderer::new(&config).render(&state);
/// assert!(script.contains("landmark.push(\"track\", \"/\", {});\n"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScriptRenderer<'a> {
    config: &'a Config,
}

impl<'a> ScriptRenderer<'a> {
    /// Create a renderer for the given configuration.
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Render the complete script for `state`.
    #[must_use]
    pub fn render(&self, state: &RequestState) -> String {
        let mut out = String::from(PROLOGUE);
        out.push_str(OPEN_TAG);
        out.push_str(&self.initialize_line());
        if let Some(line) = identify_line(state) {
            out.push_str(&line);
        }
        for line in track_lines(state) {
            out.push_str(&line);
        }
        out.push_str(CLOSE_TAG);
        out
    }

    /// The `initialize` call carrying the API key (`null` when unset).
    #[must_use]
    pub fn initialize_line(&self) -> String {
        format!(
            "landmark.push(\"initialize\", {});\n",
            json::encode(&self.config.api_key())
        )
    }
}

/// Render `state` with `config`.
#[must_use]
pub fn render(state: &RequestState, config: &Config) -> String {
    ScriptRenderer::new(config).render(state)
}

/// The `identify` call, or `None` if no user was identified.
#[must_use]
pub fn identify_line(state: &RequestState) -> Option<String> {
    let user_id = state.user_id()?;
    let empty = Properties::new();
    let traits = state.traits().unwrap_or(&empty);
    Some(format!(
        "landmark.push(\"identify\", {}, {});\n",
        json::encode(user_id),
        json::encode(traits)
    ))
}

/// One `track` call per recorded event, in recording order.
pub fn track_lines(state: &RequestState) -> impl Iterator<Item = String> + '_ {
    state.events().iter().map(track_line)
}

fn track_line(event: &Event) -> String {
    format!(
        "landmark.push(\"track\", {}, {});\n",
        json::encode(event.action()),
        json::encode(event.properties())
    )
}
