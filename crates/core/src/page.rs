use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::ClaimdeskError;

/// Smallest accepted page size.
pub const MIN_LIMIT: usize = 1;
/// Largest accepted page size.
pub const MAX_LIMIT: usize = 100;
/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: usize = 20;

/// A validated page-size bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimit(usize);

impl PageLimit {
    /// Validate a caller-supplied limit against the 1-100 bound.
    pub fn new(limit: usize) -> Result<Self, ClaimdeskError> {
        if (MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
            Ok(Self(limit))
        } else {
            Err(ClaimdeskError::invalid(
                "limit",
                format!("limit must be between {MIN_LIMIT} and {MAX_LIMIT}"),
            ))
        }
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self(DEFAULT_LIMIT)
    }
}

/// Encode the id of the last item on a page into an opaque cursor token.
#[must_use]
pub fn encode_cursor(last_id: &str) -> String {
    URL_SAFE_NO_PAD.encode(last_id.as_bytes())
}

/// Decode an opaque cursor token back into the id it was built from.
pub fn decode_cursor(cursor: &str) -> Result<String, ClaimdeskError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(cursor.as_bytes())
        .map_err(|_| ClaimdeskError::invalid("cursor", "cursor is not a valid token"))?;
    String::from_utf8(bytes)
        .map_err(|_| ClaimdeskError::invalid("cursor", "cursor is not a valid token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_roundtrip() {
        let token = encode_cursor("clm_42");
        assert_ne!(token, "clm_42");
        assert_eq!(decode_cursor(&token).unwrap(), "clm_42");
    }

    #[test]
    fn garbage_cursor_is_validation_error() {
        let err = decode_cursor("!!!not-base64!!!").unwrap_err();
        assert!(matches!(err, ClaimdeskError::ValidationFailed(_)));
    }

    #[test]
    fn limit_bounds() {
        assert!(PageLimit::new(0).is_err());
        assert!(PageLimit::new(1).is_ok());
        assert!(PageLimit::new(100).is_ok());
        assert!(PageLimit::new(101).is_err());
        assert_eq!(PageLimit::default().get(), DEFAULT_LIMIT);
    }
}
