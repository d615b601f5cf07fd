//! Identification and tracking state for a single request.

use crate::error::Result;
use crate::event::{properties, Event, Properties};
use serde::Serialize;

/// Everything recorded about the user during one request.
///
/// A fresh value is created (or [`clear`](Self::clear)ed) at the start of
/// every request and read once when the script is rendered. It is never
/// shared between requests.
///
/// # Example
///
/// ```
/// use landmark_core::{Properties, RequestState};
///
/// let mut state = RequestState::new();
/// state.identify("123", Properties::new());
/// state.track("/checkout", Properties::new());
///
/// assert_eq!(state.user_id(), Some("123"));
/// assert_eq!(state.events().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestState {
    user_id: Option<String>,
    traits: Option<Properties>,
    events: Vec<Event>,
}

impl RequestState {
    /// Create an empty state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            user_id: None,
            traits: None,
            events: Vec::new(),
        }
    }

    /// Identify the current user, replacing any earlier identification.
    pub fn identify(&mut self, user_id: impl Into<String>, traits: Properties) {
        self.user_id = Some(user_id.into());
        self.traits = Some(traits);
    }

    /// Identify the current user with traits taken from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns a contract violation if `traits` does not serialize to a JSON
    /// object. The state is left untouched in that case.
    pub fn identify_with<T>(&mut self, user_id: impl Into<String>, traits: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let traits = properties("identify", traits)?;
        self.identify(user_id, traits);
        Ok(())
    }

    /// Record an action performed by the user.
    pub fn track(&mut self, action: impl Into<String>, properties: Properties) {
        self.events.push(Event::new(action, properties));
    }

    /// Record an action with properties taken from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns a contract violation if `props` does not serialize to a JSON
    /// object. No event is recorded in that case.
    pub fn track_with<T>(&mut self, action: impl Into<String>, props: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let props = properties("track", props)?;
        self.track(action, props);
        Ok(())
    }

    /// Forget the user and every tracked event.
    pub fn clear(&mut self) {
        self.user_id = None;
        self.traits = None;
        self.events.clear();
    }

    /// The identified user, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Traits of the identified user, if any.
    #[must_use]
    pub const fn traits(&self) -> Option<&Properties> {
        self.traits.as_ref()
    }

    /// Tracked events in the order they were recorded.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Whether `identify` has been called since the last clear.
    #[must_use]
    pub const fn is_identified(&self) -> bool {
        self.user_id.is_some()
    }

    /// Whether nothing has been recorded since the last clear.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.events.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn props(value: serde_json::Value) -> Properties {
        properties("test", &value).unwrap()
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = RequestState::new();
        assert_eq!(state, RequestState::default());
        assert!(state.is_empty());
        assert!(!state.is_identified());
        assert_eq!(state.user_id(), None);
        assert_eq!(state.traits(), None);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_clear_restores_fresh_state() {
        let mut state = RequestState::new();
        state.identify("123", props(json!({"name": "Ada"})));
        state.track("/", Properties::new());

        state.clear();
        assert_eq!(state, RequestState::new());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut once = RequestState::new();
        once.track("/", Properties::new());
        once.clear();

        let mut twice = once.clone();
        twice.clear();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_identify_last_write_wins() {
        let mut state = RequestState::new();
        state.identify("1", props(json!({"plan": "free", "age": 30})));
        state.identify("2", props(json!({"plan": "pro"})));

        assert_eq!(state.user_id(), Some("2"));
        // Traits are replaced, not merged
        assert_eq!(state.traits(), Some(&props(json!({"plan": "pro"}))));
    }

    #[test]
    fn test_track_does_not_require_identify() {
        let mut state = RequestState::new();
        state.track("Signed Up", Properties::new());
        assert!(!state.is_identified());
        assert!(!state.is_empty());
    }

    #[test]
    fn test_track_leaves_identification_alone() {
        let mut state = RequestState::new();
        state.identify("123", Properties::new());
        state.track("/", props(json!({"ref": "home"})));

        assert_eq!(state.user_id(), Some("123"));
        assert_eq!(state.traits(), Some(&Properties::new()));
    }

    #[test]
    fn test_track_keeps_duplicates() {
        let mut state = RequestState::new();
        state.track("/", Properties::new());
        state.track("/", Properties::new());
        assert_eq!(state.events().len(), 2);
    }

    #[test]
    fn test_identify_with_rejects_non_object() {
        let mut state = RequestState::new();
        let err = state.identify_with("123", &json!(["admin"])).unwrap_err();
        assert!(err.to_string().starts_with("identify:"));
        assert!(state.is_empty());
    }

    #[test]
    fn test_track_with_rejects_non_object() {
        let mut state = RequestState::new();
        let err = state.track_with("/", &"not a map").unwrap_err();
        assert!(err.to_string().starts_with("track:"));
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_track_with_serializable() {
        let mut state = RequestState::new();
        state
            .track_with("Purchased", &json!({"sku": "A-1", "total": 9.5}))
            .unwrap();
        assert_eq!(state.events()[0].properties()["total"], 9.5);
    }

    proptest! {
        #[test]
        fn prop_track_preserves_order(actions in proptest::collection::vec(".*", 0..32)) {
            let mut state = RequestState::new();
            for action in &actions {
                state.track(action.clone(), Properties::new());
            }
            let recorded: Vec<&str> = state.events().iter().map(Event::action).collect();
            let expected: Vec<&str> = actions.iter().map(String::as_str).collect();
            prop_assert_eq!(recorded, expected);
        }
    }
}
