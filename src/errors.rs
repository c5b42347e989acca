// Error types for rosterboard

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum RosterboardError {
    // Transport errors: the exchange with the server never completed
    #[snafu(display("Could not reach the activities server"))]
    Transport { source: reqwest::Error },
    #[snafu(display("Unexpected response from the activities server"))]
    UnexpectedResponse { source: serde_json::Error },

    // Application errors: the server answered with a structured rejection
    #[snafu(display("Server rejected the request ({status}): {}", detail.as_deref().unwrap_or("no detail provided")))]
    Rejected { status: u16, detail: Option<String> },

    // Server URL validation errors
    #[snafu(display("Invalid activities server URL: {url}"))]
    InvalidServerUrl {
        url: String,
        source: url::ParseError,
    },
    #[snafu(display("Activities server URL cannot carry request paths: {url}"))]
    UnsupportedServerUrl { url: String },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIo { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerialize { source: serde_json::Error },
}

impl RosterboardError {
    /// True for failures where the HTTP exchange never completed or the body
    /// could not be parsed, as opposed to a well-formed server rejection.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            RosterboardError::Transport { .. } | RosterboardError::UnexpectedResponse { .. }
        )
    }
}
