//! Personal blog home page server.
//!
//! Posts are loaded from a content directory ([`content_loader`]) and the
//! home page lists them as interactive rows ([`home`], [`row`]). Hover motion
//! on each row is a spring ([`spring`]) retargeted by the row's focus state.

pub mod config;
pub mod content_loader;
pub mod dates;
pub mod error;
pub mod home;
pub mod hot_reload;
pub mod layout;
pub mod link;
pub mod markdown;
pub mod models;
pub mod routes;
pub mod row;
pub mod spring;
pub mod state;

pub use error::{Error, Result};
