//! HTTP front end for the itinerary_pdf renderer.

use std::error::Error;

pub mod config;
pub mod http;

/// Joins an error and its sources into one log line.
pub fn error_chain(err: &dyn Error) -> String {
    let mut line = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        line.push_str(": ");
        line.push_str(&cause.to_string());
        source = cause.source();
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug, thiserror::Error)]
    #[error("failed to write report")]
    struct WriteFailed(#[source] io::Error);

    #[test]
    fn error_chain_lists_every_source() {
        let err = WriteFailed(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert_eq!(error_chain(&err), "failed to write report: disk full");
    }
}
