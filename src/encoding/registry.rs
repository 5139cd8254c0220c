use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use super::codecs::{JsonCodec, TomlCodec, YamlCodec};
use super::error::{DecodingError, EncodingError};
use super::media_type::essence_of;

/// Media type used when a router is built without explicit configuration.
pub const DEFAULT_MEDIA_TYPE: &str = "application/json";

/// Serialiser pre-bound to an output sink.
pub trait Encoder {
    fn encode(&mut self, model: &Value) -> Result<(), EncodingError>;
}

/// Deserialiser pre-bound to an input source.
pub trait Decoder {
    fn decode(&mut self) -> Result<Value, DecodingError>;
}

/// Factory for the encoder/decoder pair of a single media type.
pub trait Codec: Send + Sync {
    fn encoder<'w>(&self, sink: &'w mut dyn Write) -> Box<dyn Encoder + 'w>;
    fn decoder<'r>(&self, source: &'r mut dyn Read) -> Box<dyn Decoder + 'r>;
}

/// Lookup of encoders and decoders by media type.
///
/// Implementations perform no negotiation: the dispatch engine walks the
/// ranked `Accept` list and asks for one media type at a time.
pub trait EncoderEngine: Send + Sync {
    /// Encoder for `media_type` writing into `sink`.
    ///
    /// # Errors
    ///
    /// [`EncodingError::UnsupportedMediaType`] when nothing is registered.
    fn get_encoder<'w>(
        &self,
        sink: &'w mut dyn Write,
        media_type: &str,
    ) -> Result<Box<dyn Encoder + 'w>, EncodingError>;

    /// Decoder for the request `Content-Type` reading from `source`.
    ///
    /// # Errors
    ///
    /// [`DecodingError::UnsupportedMediaType`] when nothing is registered.
    fn get_decoder<'r>(
        &self,
        source: &'r mut dyn Read,
        content_type: &str,
    ) -> Result<Box<dyn Decoder + 'r>, DecodingError>;

    /// Media type substituted for `*/*`.
    fn default_media_type(&self) -> &str;
}

/// Standard [`EncoderEngine`]: a map from lowercased `type/subtype` to codec.
///
/// Built once during configuration and read-only afterwards; share it behind
/// an `Arc`.
#[derive(Clone)]
pub struct EncoderRegistry {
    default_media_type: String,
    codecs: HashMap<String, Arc<dyn Codec>>,
}

impl EncoderRegistry {
    /// Empty registry. Nothing can be encoded until codecs are registered.
    #[must_use]
    pub fn new(default_media_type: impl Into<String>) -> Self {
        Self {
            default_media_type: essence_of(&default_media_type.into()),
            codecs: HashMap::new(),
        }
    }

    /// Registry pre-populated with the JSON, YAML and TOML codecs.
    #[must_use]
    pub fn with_defaults(default_media_type: impl Into<String>) -> Self {
        let mut registry = Self::new(default_media_type);
        registry
            .register("application/json", JsonCodec)
            .register("application/yaml", YamlCodec)
            .register("text/yaml", YamlCodec)
            .register("application/toml", TomlCodec);
        info!(
            default_media_type = %registry.default_media_type,
            media_types = ?registry.media_types(),
            "Encoder registry initialised"
        );
        registry
    }

    /// Register (or replace) the codec for `media_type`. Parameters are ignored.
    pub fn register(&mut self, media_type: &str, codec: impl Codec + 'static) -> &mut Self {
        let key = essence_of(media_type);
        if self.codecs.insert(key.clone(), Arc::new(codec)).is_some() {
            debug!(media_type = %key, "Replaced codec registration");
        }
        self
    }

    /// Registered media types, sorted.
    #[must_use]
    pub fn media_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.codecs.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    fn codec(&self, media_type: &str) -> Option<&Arc<dyn Codec>> {
        self.codecs.get(&essence_of(media_type))
    }
}

impl Default for EncoderRegistry {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_MEDIA_TYPE)
    }
}

impl EncoderEngine for EncoderRegistry {
    fn get_encoder<'w>(
        &self,
        sink: &'w mut dyn Write,
        media_type: &str,
    ) -> Result<Box<dyn Encoder + 'w>, EncodingError> {
        self.codec(media_type)
            .map(|codec| codec.encoder(sink))
            .ok_or_else(|| EncodingError::UnsupportedMediaType(media_type.to_string()))
    }

    fn get_decoder<'r>(
        &self,
        source: &'r mut dyn Read,
        content_type: &str,
    ) -> Result<Box<dyn Decoder + 'r>, DecodingError> {
        self.codec(content_type)
            .map(|codec| codec.decoder(source))
            .ok_or_else(|| DecodingError::UnsupportedMediaType(content_type.to_string()))
    }

    fn default_media_type(&self) -> &str {
        &self.default_media_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_registry_uses_json() {
        let registry = EncoderRegistry::default();
        assert_eq!(registry.default_media_type(), DEFAULT_MEDIA_TYPE);
        assert_eq!(
            registry.media_types(),
            vec!["application/json", "application/toml", "application/yaml", "text/yaml"]
        );
    }

    #[test]
    fn test_unknown_media_type_is_unsupported() {
        let registry = EncoderRegistry::default();
        let mut sink = Vec::new();
        let err = registry.get_encoder(&mut sink, "test/mango").err().unwrap();
        assert_eq!(err, EncodingError::UnsupportedMediaType("test/mango".into()));
    }

    #[test]
    fn test_lookup_ignores_parameters_and_case() {
        let registry = EncoderRegistry::default();
        let mut body: &[u8] = br#"{"a":1}"#;
        let mut decoder = registry
            .get_decoder(&mut body, "Application/JSON; charset=utf-8")
            .unwrap();
        assert_eq!(decoder.decode().unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_empty_registry_has_no_encoders() {
        let registry = EncoderRegistry::new("text/yaml");
        let mut sink = Vec::new();
        assert!(registry.get_encoder(&mut sink, "text/yaml").is_err());
        assert_eq!(registry.default_media_type(), "text/yaml");
    }
}
