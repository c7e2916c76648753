//! mapcenter - Attach representative center points and display names to
//! JSON datasets of SVG country outlines

pub mod config;
pub mod dataset;
pub mod domain;
pub mod geometry;
pub mod path;
pub mod pipeline;
