#![allow(dead_code)]

pub mod http_util {
    use http::header::ACCEPT;
    use http::{Method, Request, Response};

    pub fn request(method: Method, uri: &str) -> Request<Vec<u8>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Vec::new())
            .unwrap()
    }

    pub fn request_accepting(method: Method, uri: &str, accept: &str) -> Request<Vec<u8>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(ACCEPT, accept)
            .body(Vec::new())
            .unwrap()
    }

    pub fn body_text(response: &Response<Vec<u8>>) -> &str {
        std::str::from_utf8(response.body()).unwrap()
    }
}

pub mod mock_engine {
    use std::io::{Read, Write};

    use mango::encoding::{
        Decoder, DecodingError, Encoder, EncoderEngine, EncodingError, DEFAULT_MEDIA_TYPE,
    };
    use serde_json::Value;

    /// Media type understood by [`MockEngine`].
    pub const TEST_MEDIA_TYPE: &str = "test/test";

    /// Engine supporting only `test/test`, which writes string models
    /// verbatim and fails on anything else.
    #[derive(Debug, Default)]
    pub struct MockEngine;

    struct MockEncoder<'w>(&'w mut dyn Write);

    impl Encoder for MockEncoder<'_> {
        fn encode(&mut self, model: &Value) -> Result<(), EncodingError> {
            match model {
                Value::String(text) => self
                    .0
                    .write_all(text.as_bytes())
                    .map_err(|e| EncodingError::Encode(e.to_string())),
                other => Err(EncodingError::Encode(format!("not a string: {other}"))),
            }
        }
    }

    struct MockDecoder<'r>(&'r mut dyn Read);

    impl Decoder for MockDecoder<'_> {
        fn decode(&mut self) -> Result<Value, DecodingError> {
            let mut text = String::new();
            self.0
                .read_to_string(&mut text)
                .map_err(|e| DecodingError::Decode(e.to_string()))?;
            Ok(Value::String(text))
        }
    }

    impl EncoderEngine for MockEngine {
        fn get_encoder<'w>(
            &self,
            sink: &'w mut dyn Write,
            media_type: &str,
        ) -> Result<Box<dyn Encoder + 'w>, EncodingError> {
            if media_type == TEST_MEDIA_TYPE {
                Ok(Box::new(MockEncoder(sink)))
            } else {
                Err(EncodingError::UnsupportedMediaType(media_type.to_string()))
            }
        }

        fn get_decoder<'r>(
            &self,
            source: &'r mut dyn Read,
            content_type: &str,
        ) -> Result<Box<dyn Decoder + 'r>, DecodingError> {
            if content_type == TEST_MEDIA_TYPE {
                Ok(Box::new(MockDecoder(source)))
            } else {
                Err(DecodingError::UnsupportedMediaType(content_type.to_string()))
            }
        }

        fn default_media_type(&self) -> &str {
            DEFAULT_MEDIA_TYPE
        }
    }
}

pub mod temp_files {
    use std::io::Write;

    use tempfile::NamedTempFile;

    /// Write `content` to a temporary `.yaml` file, removed when dropped.
    pub fn create_temp_yaml(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("mango_test_")
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }
}
