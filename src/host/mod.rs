//! SSR host: renders the app shell, serves the WASM bundle and forwards
//! `/api` to the backend so the browser sees a single origin.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only compiled with the `ssr` feature. The browser build never links it.

pub mod config;
pub mod proxy;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{any, get};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::app::{App, shell};
use config::HostConfig;
use proxy::ApiProxy;

/// API proxy + Leptos SSR routes + static bundle under `/pkg`.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded or the
/// upstream HTTP client cannot be built.
pub fn app(config: &HostConfig) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(App);

    let proxy = ApiProxy::new(config).map_err(|e| format!("api proxy: {e}"))?;
    let api_router = Router::new()
        .route(&format!("{}/{{*rest}}", config.api_prefix), any(proxy::forward))
        .with_state(proxy);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_router
        .merge(leptos_router)
        .route("/healthz", get(healthz))
        .nest_service("/pkg", ServeDir::new(site_root.join("pkg")))
        .layer(TraceLayer::new_for_http()))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
