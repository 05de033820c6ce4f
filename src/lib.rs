//! Core entry point for the itinerary_pdf crate.
//!
//! Turns an [`model::ItineraryRequest`] into a styled A4 PDF document built
//! with `genpdf`.  See [`render::create_pdf`].

pub mod builder;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod model;
pub mod render;
pub mod schedule;
pub mod sections;
pub mod theme;

pub use error::RenderError;
pub use model::{ItineraryRequest, ItineraryResponse};
pub use render::{
    create_pdf, render_to_bytes, render_with_summary, FooterMode, LayoutSummary, RenderOptions,
};
