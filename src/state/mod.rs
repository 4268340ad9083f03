//! Application state stores.
//!
//! SYSTEM CONTEXT
//! ==============
//! Stores own plain state behind an [`observable::Observable`] and expose
//! async operations. The app shell mirrors each store into an `RwSignal`
//! for rendering.

pub mod observable;
pub mod profile;
pub mod session;
pub mod todos;
pub mod ui;
