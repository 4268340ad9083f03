//! Reusable UI component modules.

pub mod nav_bar;
pub mod toast_stack;
