use std::fmt;

/// Failure to obtain or run a response encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// No encoder is registered for the requested media type.
    UnsupportedMediaType(String),
    /// An encoder was found but serialising the model failed.
    Encode(String),
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingError::UnsupportedMediaType(media_type) => {
                write!(f, "unsupported media type: {media_type:?}")
            }
            EncodingError::Encode(reason) => write!(f, "encoding failed: {reason}"),
        }
    }
}

impl std::error::Error for EncodingError {}

/// Failure to obtain or run a request body decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodingError {
    /// No decoder is registered for the request `Content-Type`.
    UnsupportedMediaType(String),
    /// A decoder was found but the body could not be parsed.
    Decode(String),
}

impl fmt::Display for DecodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodingError::UnsupportedMediaType(media_type) => {
                write!(f, "unsupported media type: {media_type:?}")
            }
            DecodingError::Decode(reason) => write!(f, "decoding failed: {reason}"),
        }
    }
}

impl std::error::Error for DecodingError {}

/// An `Accept` header entry that could not be parsed.
///
/// Ranking drops these silently; the type exists so that [`MediaType::parse`]
/// can report why a single entry was rejected.
///
/// [`MediaType::parse`]: super::MediaType::parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaTypeError {
    /// The `type/subtype` part is missing, empty or contains invalid characters.
    InvalidEssence(String),
    /// A `;name=value` parameter is malformed.
    InvalidParameter(String),
    /// The `q` parameter is not a number in `[0, 1]`.
    InvalidQuality(String),
}

impl fmt::Display for MediaTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaTypeError::InvalidEssence(raw) => write!(f, "invalid media type {raw:?}"),
            MediaTypeError::InvalidParameter(raw) => {
                write!(f, "invalid media type parameter {raw:?}")
            }
            MediaTypeError::InvalidQuality(raw) => write!(f, "invalid quality value {raw:?}"),
        }
    }
}

impl std::error::Error for MediaTypeError {}
