//! `Accept` header parsing and ranking.
//!
//! Ranking is deliberately simple: entries are ordered by quality only, with
//! header order breaking ties. Specificity (`text/html` vs `text/*`) does not
//! influence the order.

use std::fmt;
use std::str::FromStr;

use super::error::MediaTypeError;

/// The match-anything media range.
pub const WILDCARD: &str = "*/*";

/// A parsed media range from an `Accept` header entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaType {
    /// Top-level type, lowercased (`application`, `text`, `*`)
    pub main: String,
    /// Subtype, lowercased (`json`, `html`, `*`)
    pub sub: String,
    /// Quality in `[0, 1]`, 1.0 when the entry carries no `q` parameter
    pub quality: f32,
    /// Remaining parameters in header order, `q` excluded
    pub params: Vec<(String, String)>,
}

impl MediaType {
    /// Parse one comma-separated `Accept` entry such as `text/html;level=1;q=0.5`.
    pub fn parse(raw: &str) -> Result<Self, MediaTypeError> {
        let mut parts = raw.split(';');
        let essence = parts.next().unwrap_or_default().trim();
        let (main, sub) = essence
            .split_once('/')
            .ok_or_else(|| MediaTypeError::InvalidEssence(raw.to_string()))?;

        if !is_token(main) || !is_token(sub) || (main == "*" && sub != "*") {
            return Err(MediaTypeError::InvalidEssence(raw.to_string()));
        }

        let mut quality = 1.0_f32;
        let mut params = Vec::new();
        for param in parts {
            let param = param.trim();
            if param.is_empty() {
                continue;
            }
            let (name, value) = param
                .split_once('=')
                .ok_or_else(|| MediaTypeError::InvalidParameter(param.to_string()))?;
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim().trim_matches('"');
            if !is_token(&name) {
                return Err(MediaTypeError::InvalidParameter(param.to_string()));
            }
            if name == "q" {
                quality = value
                    .parse::<f32>()
                    .ok()
                    .filter(|q| (0.0..=1.0).contains(q))
                    .ok_or_else(|| MediaTypeError::InvalidQuality(value.to_string()))?;
            } else {
                params.push((name, value.to_string()));
            }
        }

        Ok(Self {
            main: main.to_ascii_lowercase(),
            sub: sub.to_ascii_lowercase(),
            quality,
            params,
        })
    }

    /// `type/subtype` without parameters.
    #[must_use]
    pub fn essence(&self) -> String {
        format!("{}/{}", self.main, self.sub)
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.main == "*" && self.sub == "*"
    }
}

impl FromStr for MediaType {
    type Err = MediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main, self.sub)
    }
}

/// Rank an `Accept` header into media types, most acceptable first.
///
/// A missing or blank header ranks as `["*/*"]`. Malformed entries are
/// dropped; if nothing parses, the result falls back to `["*/*"]` as well.
/// Entries with `q=0` are kept and rank last.
#[must_use]
pub fn rank(accept: Option<&str>) -> Vec<String> {
    let header = match accept.map(str::trim) {
        Some(h) if !h.is_empty() => h,
        _ => return vec![WILDCARD.to_string()],
    };

    let mut ranked: Vec<MediaType> = header
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| MediaType::parse(entry).ok())
        .collect();

    if ranked.is_empty() {
        return vec![WILDCARD.to_string()];
    }

    // Vec::sort_by is stable, so equal qualities keep header order.
    ranked.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    ranked.iter().map(MediaType::essence).collect()
}

/// Split a `Content-Type` value down to its lowercased `type/subtype`.
#[must_use]
pub fn essence_of(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}
