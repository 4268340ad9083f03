//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page reads its store from context and owns the route-scoped
//! orchestration. Access control is left to the route guard.

pub mod home;
pub mod login;
pub mod profile;
pub mod register;
pub mod todos;
