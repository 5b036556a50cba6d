//! Error types for fetching, parsing and rendering the crosspost graph.
//!
//! All three kinds are terminal for the view that hits them: they are caught at
//! the view boundary, turned into a user-visible message and never retried.

use thiserror::Error;

/// A data provider could not be reached or refused the request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connection, TLS, body read).
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status.
    #[error("API error: {status} from {url}")]
    Status { url: String, status: u16 },

    /// A local artefact could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A document was received but is unusable.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("graph document is empty")]
    Empty,

    /// The document is not well-formed XML.
    #[error("malformed XML: {source}")]
    Malformed {
        #[source]
        source: roxmltree::Error,
    },

    /// No `graphml` or `graph` element anywhere in the document.
    #[error("document is not a GraphML graph description")]
    NotGraphMl,

    /// The node at `position` (0-based, document order) has no usable `id`.
    #[error("node #{position} has no id attribute")]
    MissingNodeId { position: usize },

    /// A JSON envelope decoded fine but carried no graph document.
    #[error("invalid GraphML data received from {origin}")]
    MissingPayload { origin: String },

    #[error("malformed JSON from {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The render surface could not be mounted.
#[derive(Debug, Error)]
pub enum RenderInitError {
    /// The container the surface draws into does not exist.
    #[error("render container not found: {0}")]
    MissingContainer(String),

    /// The surface was already handed to a controller.
    #[error("render surface is already mounted")]
    AlreadyMounted,

    #[error("failed to write render output {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode graph data: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Any failure that puts a graph view into its terminal error state.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    RenderInit(#[from] RenderInitError),
}
