use thiserror::Error;

/// Errors that cross the engine contract boundary.
///
/// Everything else (asset failures, unknown ids, unknown type tags, bad
/// colours) degrades visually inside the adapter instead of surfacing here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown engine type: {0}")]
    UnknownEngineType(String),
    #[error("invalid render surface {width}x{height}")]
    InvalidSurface { width: u32, height: u32 },
    #[error("scene root was discarded before it signalled `loaded`")]
    LoadSignalDropped,
}

/// Asset pipeline failures. Adapters log these and leave the asset unregistered.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("unsupported url scheme in `{0}`")]
    UnsupportedScheme(String),
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed data url")]
    InvalidDataUrl,
    #[error("base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image decode: {0}")]
    Image(#[from] image::ImageError),
    #[error("model decode: {0}")]
    Model(String),
    #[error("font decode: {0}")]
    Font(String),
    #[error("{0}")]
    Decode(String),
    #[error("{kind} assets are not supported by the {engine} back-end")]
    UnsupportedKind { kind: String, engine: &'static str },
}
