//! Validation of identifiers placed into `pass://` references.

use crate::{PassError, Result};

/// URI scheme understood by `pass-cli item view`.
pub const URI_SCHEME: &str = "pass";

/// Maximum allowed length for a single reference segment.
const MAX_SEGMENT_LENGTH: usize = 255;

/// Validates one segment of an item reference.
///
/// Segments must be non-empty, at most 255 bytes, and free of `/`,
/// whitespace and control characters, since each one becomes a path
/// component of a `pass://` URI.
///
/// # Errors
///
/// Returns [`PassError::InvalidReference`] if validation fails.
///
/// # Example
///
/// ```
/// use protonpass::validation::validate_reference_segment;
///
/// assert!(validate_reference_segment("share id", "kX3n_a==").is_ok());
/// assert!(validate_reference_segment("share id", "").is_err());
/// assert!(validate_reference_segment("item id", "a/b").is_err());
/// ```
pub fn validate_reference_segment(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(PassError::InvalidReference(format!("{} cannot be empty", kind)));
    }

    if value.len() > MAX_SEGMENT_LENGTH {
        return Err(PassError::InvalidReference(format!(
            "{} exceeds maximum length of {} characters",
            kind, MAX_SEGMENT_LENGTH
        )));
    }

    if value.contains('/') {
        return Err(PassError::InvalidReference(format!("{} contains '/'", kind)));
    }

    if value.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(PassError::InvalidReference(format!(
            "{} contains whitespace or control characters",
            kind
        )));
    }

    Ok(())
}

/// A validated address of a single item field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReference {
    share_id: String,
    item_id: String,
    field: String,
}

impl ItemReference {
    /// Builds a reference after validating every segment.
    pub fn new(
        share_id: impl Into<String>,
        item_id: impl Into<String>,
        field: impl Into<String>,
    ) -> Result<Self> {
        let reference = Self {
            share_id: share_id.into(),
            item_id: item_id.into(),
            field: field.into(),
        };
        validate_reference_segment("share id", &reference.share_id)?;
        validate_reference_segment("item id", &reference.item_id)?;
        validate_reference_segment("field", &reference.field)?;
        Ok(reference)
    }

    /// Share id segment.
    pub fn share_id(&self) -> &str {
        &self.share_id
    }

    /// Item id segment.
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Field segment.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Formats the reference as `pass://<share>/<item>/<field>`.
    pub fn uri(&self) -> String {
        format!(
            "{}://{}/{}/{}",
            URI_SCHEME, self.share_id, self.item_id, self.field
        )
    }
}

impl std::fmt::Display for ItemReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri())
    }
}
