//! Library exports for the sapin reticle renderer.
//!
//! Exposes the shape model and renderer alongside the configuration and
//! surface layers so that other hosts (overlay windows, configurators) can
//! share classification, validation and drawing code with the CLI.

pub mod config;
pub mod draw;
pub mod surface;

pub use config::{AppConfig, Config};
