//! Upload validation.

use serde::Serialize;
use thiserror::Error;

/// Default upload ceiling: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// An uploaded file as received from a form, CLI argument, or request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Original file name
    pub name: String,
    /// Declared MIME type, if the client sent one
    pub content_type: Option<String>,
    /// File contents
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Creates an upload, guessing the MIME type from the name when none is declared.
    pub fn new(name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .or_else(|| {
                mime_guess::from_path(&name)
                    .first()
                    .map(|mime| mime.essence_str().to_string())
            });
        Self {
            name,
            content_type,
            bytes,
        }
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// MIME type, or an empty string when unknown.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or("")
    }
}

/// Why an upload was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FileRejection {
    /// MIME type outside the allowed prefixes
    #[error("Please select a valid image file")]
    UnsupportedType {
        /// The offending MIME type
        mime_type: String,
    },
    /// File larger than the ceiling
    #[error("File size must be less than {}", size_limit(.max_bytes))]
    TooLarge {
        /// Actual size
        size: u64,
        /// Allowed maximum
        max_bytes: u64,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn size_limit(max_bytes: &u64) -> String {
    format_file_size(*max_bytes)
}

/// Result shape returned to form-style callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    /// True when the file may be uploaded
    pub is_valid: bool,
    /// Human-readable reason when invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Checks uploads against MIME-type prefixes and a size ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileValidator {
    allowed_types: Vec<String>,
    max_bytes: u64,
}

impl Default for FileValidator {
    fn default() -> Self {
        Self {
            allowed_types: vec!["image/".to_string()],
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl FileValidator {
    /// Creates a validator. An empty prefix list allows every type.
    #[must_use]
    pub const fn new(allowed_types: Vec<String>, max_bytes: u64) -> Self {
        Self {
            allowed_types,
            max_bytes,
        }
    }

    /// Size ceiling in bytes.
    #[must_use]
    pub const fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Validates a file, returning the first rule it breaks.
    pub fn check(&self, file: &UploadedFile) -> Result<(), FileRejection> {
        let mime_type = file.mime_type();
        if !self.allowed_types.is_empty()
            && !self
                .allowed_types
                .iter()
                .any(|prefix| mime_type.starts_with(prefix.as_str()))
        {
            return Err(FileRejection::UnsupportedType {
                mime_type: mime_type.to_string(),
            });
        }

        if file.size() > self.max_bytes {
            return Err(FileRejection::TooLarge {
                size: file.size(),
                max_bytes: self.max_bytes,
            });
        }

        Ok(())
    }

    /// Validates a file into the `{ isValid, error? }` shape.
    #[must_use]
    pub fn validate(&self, file: &UploadedFile) -> Validation {
        match self.check(file) {
            Ok(()) => Validation {
                is_valid: true,
                error: None,
            },
            Err(rejection) => Validation {
                is_valid: false,
                error: Some(rejection.to_string()),
            },
        }
    }
}

/// Formats a byte count for display ("0 Bytes", "1.5 KB", "5 MB").
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content_type: Option<&str>, size: usize) -> UploadedFile {
        UploadedFile::new(name, content_type.map(str::to_string), vec![0; size])
    }

    #[test]
    fn test_accepts_small_image() {
        let validator = FileValidator::default();
        let result = validator.validate(&file("villa.jpg", Some("image/jpeg"), 1024));
        assert!(result.is_valid);
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_guesses_type_from_name() {
        let upload = file("villa.png", None, 10);
        assert_eq!(upload.mime_type(), "image/png");
        assert!(FileValidator::default().check(&upload).is_ok());
    }

    #[test]
    fn test_rejects_non_image() {
        let validator = FileValidator::default();
        let result = validator.validate(&file("notes.pdf", Some("application/pdf"), 10));
        assert!(!result.is_valid);
        assert_eq!(result.error.as_deref(), Some("Please select a valid image file"));

        assert!(matches!(
            validator.check(&file("mystery", None, 10)),
            Err(FileRejection::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_size_ceiling_is_inclusive() {
        let validator = FileValidator::new(vec!["image/".to_string()], 100);
        assert!(validator.check(&file("a.jpg", None, 100)).is_ok());
        assert_eq!(
            validator.check(&file("a.jpg", None, 101)),
            Err(FileRejection::TooLarge {
                size: 101,
                max_bytes: 100
            })
        );
    }

    #[test]
    fn test_default_ceiling_message() {
        let validator = FileValidator::default();
        let big = file("big.jpg", None, (DEFAULT_MAX_UPLOAD_BYTES + 1) as usize);
        assert_eq!(
            validator.validate(&big).error.as_deref(),
            Some("File size must be less than 5 MB")
        );
    }

    #[test]
    fn test_empty_allow_list_allows_all_types() {
        let validator = FileValidator::new(Vec::new(), 100);
        assert!(validator.check(&file("a.bin", Some("application/octet-stream"), 1)).is_ok());
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
    }
}
