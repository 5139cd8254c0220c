use std::io::{Read, Write};

use serde_json::Value;

use super::error::{DecodingError, EncodingError};
use super::registry::{Codec, Decoder, Encoder};

/// `application/json` via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

/// `application/yaml` / `text/yaml` via `serde_yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

/// `application/toml` via `toml`.
///
/// TOML documents must be tables, so models that serialise to arrays,
/// scalars or contain nulls fail to encode.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCodec;

struct JsonEncoder<'w>(&'w mut dyn Write);
struct JsonDecoder<'r>(&'r mut dyn Read);
struct YamlEncoder<'w>(&'w mut dyn Write);
struct YamlDecoder<'r>(&'r mut dyn Read);
struct TomlEncoder<'w>(&'w mut dyn Write);
struct TomlDecoder<'r>(&'r mut dyn Read);

impl Codec for JsonCodec {
    fn encoder<'w>(&self, sink: &'w mut dyn Write) -> Box<dyn Encoder + 'w> {
        Box::new(JsonEncoder(sink))
    }

    fn decoder<'r>(&self, source: &'r mut dyn Read) -> Box<dyn Decoder + 'r> {
        Box::new(JsonDecoder(source))
    }
}

impl Encoder for JsonEncoder<'_> {
    fn encode(&mut self, model: &Value) -> Result<(), EncodingError> {
        serde_json::to_writer(&mut *self.0, model).map_err(|e| EncodingError::Encode(e.to_string()))
    }
}

impl Decoder for JsonDecoder<'_> {
    fn decode(&mut self) -> Result<Value, DecodingError> {
        serde_json::from_reader(&mut *self.0).map_err(|e| DecodingError::Decode(e.to_string()))
    }
}

impl Codec for YamlCodec {
    fn encoder<'w>(&self, sink: &'w mut dyn Write) -> Box<dyn Encoder + 'w> {
        Box::new(YamlEncoder(sink))
    }

    fn decoder<'r>(&self, source: &'r mut dyn Read) -> Box<dyn Decoder + 'r> {
        Box::new(YamlDecoder(source))
    }
}

impl Encoder for YamlEncoder<'_> {
    fn encode(&mut self, model: &Value) -> Result<(), EncodingError> {
        serde_yaml::to_writer(&mut *self.0, model).map_err(|e| EncodingError::Encode(e.to_string()))
    }
}

impl Decoder for YamlDecoder<'_> {
    fn decode(&mut self) -> Result<Value, DecodingError> {
        serde_yaml::from_reader(&mut *self.0).map_err(|e| DecodingError::Decode(e.to_string()))
    }
}

impl Codec for TomlCodec {
    fn encoder<'w>(&self, sink: &'w mut dyn Write) -> Box<dyn Encoder + 'w> {
        Box::new(TomlEncoder(sink))
    }

    fn decoder<'r>(&self, source: &'r mut dyn Read) -> Box<dyn Decoder + 'r> {
        Box::new(TomlDecoder(source))
    }
}

impl Encoder for TomlEncoder<'_> {
    fn encode(&mut self, model: &Value) -> Result<(), EncodingError> {
        let text = toml::to_string(model).map_err(|e| EncodingError::Encode(e.to_string()))?;
        self.0
            .write_all(text.as_bytes())
            .map_err(|e| EncodingError::Encode(e.to_string()))
    }
}

impl Decoder for TomlDecoder<'_> {
    fn decode(&mut self) -> Result<Value, DecodingError> {
        let mut text = String::new();
        self.0
            .read_to_string(&mut text)
            .map_err(|e| DecodingError::Decode(e.to_string()))?;
        toml::from_str(&text).map_err(|e| DecodingError::Decode(e.to_string()))
    }
}
