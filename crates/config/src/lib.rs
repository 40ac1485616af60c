//! Layered configuration for retag, built on [figment].

pub mod error;
mod settings;

pub use crate::settings::{ENV_PREFIX, Settings};
