//! # svg-forge – SVG template → paginated PDF
//!
//! Converts a constrained subset of SVG (`text`, `rect`, `polygon`, `image`
//! and `switch`) into PDF documents. The pipeline stages are:
//!
//! 1. **Parse** – markup string → owned tree ([`dom`])
//! 2. **Build** – tree → [`document::Document`] of [`elements::Element`]s
//! 3. **Scale** – logical template units → page points ([`pdf`])
//! 4. **Paginate** – split the virtual canvas into pages ([`pagination`])
//! 5. **Render** – emit PDF bytes via printpdf ([`render`])
//!
//! [`pipeline::SvgPdf`] wires the stages together from a
//! [`config::PipelineConfig`].

pub mod attributes;
pub mod backend;
pub mod color;
pub mod config;
pub mod document;
pub mod dom;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod pagination;
pub mod pdf;
pub mod pipeline;
pub mod render;
pub mod templates;
pub mod width_probe;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use color::Color;
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use pipeline::{generate_pdf, SvgPdf};
pub use width_probe::WidthProbe;
