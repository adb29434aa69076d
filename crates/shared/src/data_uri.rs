//! `data:<mime>;base64,<payload>` interchange format used for every image
//! that crosses the client boundary.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// A decoded data URI: MIME type plus the still-encoded base64 payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, STANDARD.encode(bytes))
    }

    /// Parses a data URI. Anything that does not match
    /// `data:<mime>;base64,<payload>` with non-empty parts yields `None`.
    ///
    /// When the marker occurs more than once the last usable occurrence
    /// splits the string, so the MIME part is as long as possible.
    pub fn parse(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix(SCHEME)?;
        if rest.contains(is_line_terminator) {
            return None;
        }
        rest.rmatch_indices(BASE64_MARKER)
            .map(|(idx, _)| (&rest[..idx], &rest[idx + BASE64_MARKER.len()..]))
            .find(|(mime_type, data)| !mime_type.is_empty() && !data.is_empty())
            .map(|(mime_type, data)| Self::new(mime_type, data))
    }

    pub fn to_data_uri(&self) -> String {
        format!("{SCHEME}{}{BASE64_MARKER}{}", self.mime_type, self.data)
    }

    /// Substitutes `fallback` for a blank MIME type, then keeps the image
    /// only if its data URI parses back to the same parts.
    pub fn into_interchange(mut self, fallback: &str) -> Option<Self> {
        if self.mime_type.trim().is_empty() {
            self.mime_type = fallback.to_string();
        }
        let round_trips = Self::parse(&self.to_data_uri()).as_ref() == Some(&self);
        round_trips.then_some(self)
    }

    pub fn decode_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.data.as_bytes())
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Builds a data URI from its parts.
pub fn encode(mime_type: &str, data: &str) -> String {
    InlineImage::new(mime_type, data).to_data_uri()
}

/// Splits a data URI into `(mime_type, data)`; both are `None` when the
/// string is not a data URI.
pub fn decode(uri: &str) -> (Option<String>, Option<String>) {
    match InlineImage::parse(uri) {
        Some(image) => (Some(image.mime_type), Some(image.data)),
        None => (None, None),
    }
}
