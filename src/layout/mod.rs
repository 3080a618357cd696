//! Geometry core: character flow, label stacking, path routing
//!
//! This module computes where everything sits. It owns the glyph list, the
//! wrap-offset registry, and the label/path placements, and exposes them as
//! plain values for the reconciliation layer to render.

pub mod config;
pub mod engine;
pub mod error;
pub mod routing;
pub mod types;

pub use config::LayoutOptions;
pub use engine::LayoutEngine;
pub use error::LayoutError;
pub use types::*;
