//! Progress tracker for the Tilt workshop.
//!
//! The [`workshop`] module decides which step the user is on; everything
//! else feeds it (Tilt, the deployed app, the keyboard) or shows its result.

pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod persist;
pub mod probe;
pub mod provider;
pub mod render;
pub mod ui;
pub mod workshop;
