//! # todo-client
//!
//! Leptos + WASM single-page client for the todo service: sign-in and
//! registration, session restore from a stored token, a todo list and a
//! profile view.
//!
//! The interesting parts live below the pages: a session store that keeps
//! `{user, token}`, durable storage and the default `Authorization` header
//! in step; a REST client that runs each call through an explicit stage
//! pipeline (bearer auth, duplicate suppression, forced logout, error
//! notifications); and a route guard that resolves a stored token before
//! deciding on protected routes.

pub mod app;
pub mod components;
pub mod config;
#[cfg(feature = "ssr")]
pub mod host;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_helpers;

/// Browser entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
