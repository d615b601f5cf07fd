//! Automatic identification after the handler runs.
//!
//! Once the handler has produced its response, [`LandmarkLayer`] asks an
//! [`IdentityResolver`] who the user is. Applications typically map their
//! authenticated-user extension to an [`Identity`]:
//!
//! ```ignore
//! let layer = landmark_layer(config).identify_with(|req: &RequestHead, _res: &Response| {
//!     req.extensions.get::<CurrentUser>().map(|user| Identity::new(user.id.to_string()))
//! });
//! ```
//!
//! [`LandmarkLayer`]: crate::LandmarkLayer

use axum::response::Response;
use http::{Extensions, HeaderMap, Method, Uri};
use landmark_core::Properties;

/// A user to identify, with their traits.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// Application user id
    pub user_id: String,
    /// Traits recorded with the identify call
    pub traits: Properties,
}

impl Identity {
    /// Identity without traits.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            traits: Properties::new(),
        }
    }

    /// Attach traits.
    #[must_use]
    pub fn with_traits(mut self, traits: Properties) -> Self {
        self.traits = traits;
        self
    }
}

/// The parts of the request still available after the handler consumed it.
#[derive(Debug, Clone)]
pub struct RequestHead {
    /// Request method
    pub method: Method,
    /// Request URI
    pub uri: Uri,
    /// Request headers
    pub headers: HeaderMap,
    /// Request extensions as they were before the handler ran
    pub extensions: Extensions,
}

/// Decides which user, if any, a finished request belongs to.
pub trait IdentityResolver: Send + Sync + 'static {
    /// Return the identity to record, or `None` to leave identification alone.
    fn resolve(&self, request: &RequestHead, response: &Response) -> Option<Identity>;
}

impl<F> IdentityResolver for F
where
    F: Fn(&RequestHead, &Response) -> Option<Identity> + Send + Sync + 'static,
{
    fn resolve(&self, request: &RequestHead, response: &Response) -> Option<Identity> {
        self(request, response)
    }
}

/// Default resolver: an [`Identity`] placed in the response extensions,
/// falling back to one placed in the request extensions.
///
/// Handlers attach one with `axum::Extension(identity)` in their response
/// tuple; authentication middleware can insert one into the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionIdentity;

impl IdentityResolver for ExtensionIdentity {
    fn resolve(&self, request: &RequestHead, response: &Response) -> Option<Identity> {
        response
            .extensions()
            .get::<Identity>()
            .or_else(|| request.extensions.get::<Identity>())
            .cloned()
    }
}
