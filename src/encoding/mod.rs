//! # Encoding Module
//!
//! Content negotiation building blocks: ranking of the `Accept` header and a
//! registry mapping media types to serialisers/deserialisers.
//!
//! ## Overview
//!
//! - [`rank`] turns `text/html,application/json;q=0.9` into an ordered list
//!   of `type/subtype` strings.
//! - [`EncoderEngine`] is the lookup seam used by the dispatch engine and by
//!   [`Context::bind`](crate::context::Context::bind). [`EncoderRegistry`] is
//!   the standard implementation and ships with JSON, YAML and TOML codecs.
//!
//! The registry never negotiates. The router walks the ranked list, swaps
//! `*/*` for [`EncoderEngine::default_media_type`], and asks for one encoder
//! at a time until one is found.
//!
//! ## Example
//!
//! ```rust
//! use mango::encoding::{rank, EncoderEngine, EncoderRegistry};
//! use serde_json::json;
//!
//! let registry = EncoderRegistry::default();
//! let ranked = rank(Some("application/yaml;q=0.5, application/json"));
//! assert_eq!(ranked, vec!["application/json", "application/yaml"]);
//!
//! let mut body = Vec::new();
//! registry
//!     .get_encoder(&mut body, &ranked[0])
//!     .unwrap()
//!     .encode(&json!({ "id": 7 }))
//!     .unwrap();
//! assert_eq!(body, br#"{"id":7}"#);
//! ```

mod codecs;
mod error;
mod media_type;
mod registry;

pub use codecs::{JsonCodec, TomlCodec, YamlCodec};
pub use error::{DecodingError, EncodingError, MediaTypeError};
pub use media_type::{essence_of, rank, MediaType, WILDCARD};
pub use registry::{Codec, Decoder, Encoder, EncoderEngine, EncoderRegistry, DEFAULT_MEDIA_TYPE};
