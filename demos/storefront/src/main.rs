//! Storefront demo binary
//!
//! Serves a few HTML pages through the Landmark layer. Every page ends with
//! the tracking script; requests carrying a `user_id` cookie are identified.
//!
//! ```text
//! LANDMARK_API_KEY=KEY cargo run -p storefront
//! curl localhost:3000/products/42-blue-mug
//! curl --cookie user_id=7 localhost:3000/account
//! ```

use axum::{
    Router,
    extract::Path,
    http::header,
    response::{Html, Response},
    routing::get,
};
use landmark_core::Config;
use landmark_web::{Identity, Landmark, RequestHead, SCRIPT_PLACEHOLDER, landmark_layer};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn page(title: &str, content: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html><head><title>{title}</title></head>\
         <body><h1>{title}</h1>{content}\n{SCRIPT_PLACEHOLDER}</body></html>\n"
    ))
}

async fn home() -> Html<String> {
    page("Storefront", "<a href=\"/products/42-blue-mug\">Blue mug</a>")
}

async fn product(Path(slug): Path<String>, landmark: Landmark) -> Html<String> {
    if let Err(err) = landmark
        .tracker()
        .track_with("Viewed Product", &json!({ "slug": slug }))
    {
        tracing::warn!(error = %err, "Could not track product view");
    }
    page("Product", &format!("<p>{}</p>", html_escape(&slug)))
}

async fn account() -> Html<String> {
    page("Account", "<p>Your orders</p>")
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Identify requests by their `user_id` cookie.
fn cookie_user(req: &RequestHead, _: &Response) -> Option<Identity> {
    req.headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| *name == "user_id")
        .map(|(_, id)| Identity::new(id))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=info,landmark_web=debug,landmark_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::global().clone());
    info!(
        has_api_key = config.api_key().is_some(),
        normalize_paths = config.normalize_paths(),
        "Landmark configured"
    );

    let app = Router::new()
        .route("/", get(home))
        .route("/products/:slug", get(product))
        .route("/account", get(account))
        .layer(landmark_layer(config).identify_with(cookie_user));

    let addr = std::env::var("STOREFRONT_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Storefront listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
