/// Errors raised while loading documents and configuration.
///
/// The layout engine and the router never fail; only the I/O and
/// deserialization edges of the crate do.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Conduit {conduit} references unknown zone {zone}")]
    UnknownZone { conduit: String, zone: String },
    #[error("Duplicate zone id: {0}")]
    DuplicateZone(String),
}
