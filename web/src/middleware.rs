//! Axum middleware binding Landmark state to each request.
//!
//! # Example
//!
//! ```ignore
//! use axum::Router;
//! use landmark_web::landmark_layer;
//!
//! let app = Router::new()
//!     .route("/", get(home))
//!     .layer(landmark_layer(Arc::new(Config::from_env())));
//! ```
//!
//! # Flow
//!
//! 1. **Clear**: create a fresh [`Tracker`] and store it, with the config, in
//!    the request extensions
//! 2. **Auto-track**: for `GET` requests, track the (normalized) request path
//! 3. **Handle**: run the inner service; handlers use [`Landmark`](crate::Landmark)
//! 4. **Identify**: ask the [`IdentityResolver`] who the user is
//! 5. **Inject**: replace [`SCRIPT_PLACEHOLDER`] in a complete HTML body of
//!    known length with the rendered script; streaming bodies pass through

use crate::identity::{ExtensionIdentity, IdentityResolver, RequestHead};
use crate::tracker::Tracker;
use axum::{
    body::{Body, HttpBody, to_bytes},
    extract::Request,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use landmark_core::{Config, Properties};
use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;

/// Marker in an HTML response body that is replaced with the rendered script.
pub const SCRIPT_PLACEHOLDER: &str = "<!-- landmark -->";

/// Create a layer that gives every request its own Landmark tracker.
#[must_use]
pub fn landmark_layer(config: Arc<Config>) -> LandmarkLayer {
    LandmarkLayer {
        config,
        auto_track: true,
        resolver: Arc::new(ExtensionIdentity),
    }
}

/// Layer for Landmark request tracking.
#[derive(Clone)]
pub struct LandmarkLayer {
    config: Arc<Config>,
    auto_track: bool,
    resolver: Arc<dyn IdentityResolver>,
}

impl LandmarkLayer {
    /// Enable or disable tracking of the request path for `GET` requests.
    #[must_use]
    pub const fn auto_track(mut self, enabled: bool) -> Self {
        self.auto_track = enabled;
        self
    }

    /// Replace the identity resolver run after the handler.
    #[must_use]
    pub fn identify_with(mut self, resolver: impl IdentityResolver) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }
}

impl fmt::Debug for LandmarkLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LandmarkLayer")
            .field("config", &self.config)
            .field("auto_track", &self.auto_track)
            .finish_non_exhaustive()
    }
}

impl<S> Layer<S> for LandmarkLayer {
    type Service = LandmarkMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LandmarkMiddleware {
            inner,
            layer: self.clone(),
        }
    }
}

/// Middleware service for Landmark request tracking.
#[derive(Clone, Debug)]
pub struct LandmarkMiddleware<S> {
    inner: S,
    layer: LandmarkLayer,
}

impl<S> Service<Request> for LandmarkMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let config = Arc::clone(&self.layer.config);
        let resolver = Arc::clone(&self.layer.resolver);

        // A new tracker per request is the request-start clear
        let tracker = Tracker::new();
        if self.layer.auto_track && req.method() == Method::GET {
            tracker.track(config.page_action(req.uri().path()), Properties::new());
        }

        let (mut parts, body) = req.into_parts();
        parts.extensions.insert(tracker.clone());
        parts.extensions.insert(Arc::clone(&config));
        let head = RequestHead {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            extensions: parts.extensions.clone(),
        };

        let span = tracing::debug_span!(
            "landmark",
            method = %head.method,
            path = %head.uri.path(),
        );

        let fut = self.inner.call(Request::from_parts(parts, body));

        Box::pin(
            async move {
                let response = fut.await?;

                if let Some(identity) = resolver.resolve(&head, &response) {
                    tracker.identify(identity.user_id, identity.traits);
                }

                Ok(inject_script(response, &tracker, &config).await)
            }
            .instrument(span),
        )
    }
}

/// Largest complete HTML body the middleware will buffer to inject the script.
pub const MAX_INJECT_BYTES: usize = 4 * 1024 * 1024;

/// Length of a body that is safe to buffer: exact and within the limit.
fn buffered_len(body: &Body) -> Option<usize> {
    let hint = body.size_hint();
    let upper = hint.upper()?;
    if hint.lower() != upper {
        return None;
    }
    usize::try_from(upper)
        .ok()
        .filter(|len| *len <= MAX_INJECT_BYTES)
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html"))
}

/// Replace the first [`SCRIPT_PLACEHOLDER`] in an HTML body with the script.
///
/// Only HTML bodies whose exact length is known up front and at most
/// [`MAX_INJECT_BYTES`] are buffered; streaming and oversized bodies pass
/// through without being polled. Non-UTF-8 bodies and bodies without the
/// placeholder keep their content unchanged.
async fn inject_script(response: Response, tracker: &Tracker, config: &Config) -> Response {
    if !is_html(&response) {
        return response;
    }
    let Some(len) = buffered_len(response.body()) else {
        return response;
    };

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, len).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(error = %err, "Failed to buffer response body for Landmark injection");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let html = match std::str::from_utf8(&bytes) {
        Ok(html) if html.contains(SCRIPT_PLACEHOLDER) => html,
        _ => return Response::from_parts(parts, Body::from(bytes)),
    };

    let script = tracker.render(config);
    let injected = html.replacen(SCRIPT_PLACEHOLDER, &script, 1);

    parts.headers.remove(header::CONTENT_LENGTH);
    if let Ok(len) = HeaderValue::from_str(&injected.len().to_string()) {
        parts.headers.insert(header::CONTENT_LENGTH, len);
    }

    Response::from_parts(parts, Body::from(injected))
}
