//! Data models

pub mod recommendation;

pub use recommendation::*;
