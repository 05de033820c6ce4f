//! Error type returned by the document renderer.

use std::io;
use std::path::PathBuf;

/// Failures while producing an itinerary document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No usable font family could be loaded.
    #[error("failed to load fonts")]
    Fonts(#[source] genpdf::error::Error),

    /// The logo exists on disk but could not be decoded.
    #[error("failed to load logo {path}")]
    Logo {
        path: PathBuf,
        #[source]
        source: genpdf::error::Error,
    },

    /// The output directory could not be created.
    #[error("failed to create output directory {path}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The rendered document could not be stored under its final name.
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Layout failed while rendering the document.
    #[error("failed to render document")]
    Render(#[source] genpdf::error::Error),
}
