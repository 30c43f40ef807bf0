//! Upload admission checks.
//!
//! Only client-supplied metadata is inspected. The declared media type and the
//! extension are trusted as sent; nothing looks at the file's bytes, so a
//! renamed executable passes as long as its name and declared type fit the
//! allow-lists. Treat the type checks as a usability filter, not a security
//! control.

use thiserror::Error;

/// Default per-file size cap: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".pdf", ".txt", ".zip"];

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/pdf",
    "text/plain",
    "application/zip",
    "application/x-zip-compressed",
    "application/octet-stream",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("File size too large (max {})", format_size(.max))]
    TooLarge { size: u64, max: u64 },
    #[error("Invalid filename")]
    UnsafeName(String),
    #[error("File type not allowed: {0}")]
    TypeNotAllowed(String),
    #[error("MIME type not allowed: {0}")]
    MimeNotAllowed(String),
}

/// Limits applied to every candidate upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_file_size: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl UploadPolicy {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Check a candidate upload. Checks run in a fixed order and stop at the
    /// first failure: size, filename safety, extension, media type.
    pub fn validate(
        &self,
        filename: &str,
        declared_size: u64,
        declared_mime_type: &str,
    ) -> Result<(), ValidationError> {
        if declared_size > self.max_file_size {
            return Err(ValidationError::TooLarge {
                size: declared_size,
                max: self.max_file_size,
            });
        }

        if !is_safe_filename(filename) {
            return Err(ValidationError::UnsafeName(filename.to_string()));
        }

        let name = base_name(filename);
        let extension = extension(name).map(|ext| ext.to_ascii_lowercase());
        match extension {
            Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
            Some(ext) => return Err(ValidationError::TypeNotAllowed(ext)),
            None => return Err(ValidationError::TypeNotAllowed("(none)".to_string())),
        }

        if !ALLOWED_MIME_TYPES.contains(&mime_essence(declared_mime_type).as_str()) {
            return Err(ValidationError::MimeNotAllowed(
                declared_mime_type.to_string(),
            ));
        }

        Ok(())
    }
}

/// Strip any directory component from a client filename.
///
/// Only `/` counts as a separator here; a backslash left in the result is
/// rejected by the safety check instead.
pub fn base_name(filename: &str) -> &str {
    let trimmed = filename.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

fn is_safe_filename(filename: &str) -> bool {
    if filename.contains("..") || is_absolute(filename) {
        return false;
    }
    let name = base_name(filename);
    !name.is_empty() && !name.contains("..") && !name.contains(&['/', '\\'][..])
}

fn is_absolute(filename: &str) -> bool {
    if filename.starts_with(&['/', '\\'][..]) {
        return true;
    }
    // Windows drive prefix, e.g. `C:`
    let bytes = filename.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Extension including the leading dot, e.g. `.pdf`.
fn extension(name: &str) -> Option<&str> {
    name.rfind('.').map(|idx| &name[idx..]).filter(|ext| ext.len() > 1)
}

fn mime_essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Human-readable size used in client-facing messages.
pub(crate) fn format_size(bytes: &u64) -> String {
    const MIB: u64 = 1024 * 1024;
    let bytes = *bytes;
    if bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> UploadPolicy {
        UploadPolicy::default()
    }

    #[test]
    fn test_accepts_allowed_upload() {
        assert_eq!(
            policy().validate("report.pdf", 1024, "application/pdf"),
            Ok(())
        );
    }

    #[test]
    fn test_size_boundary() {
        let p = policy();
        assert!(p
            .validate("a.txt", DEFAULT_MAX_FILE_SIZE, "text/plain")
            .is_ok());
        assert_eq!(
            p.validate("a.txt", DEFAULT_MAX_FILE_SIZE + 1, "text/plain"),
            Err(ValidationError::TooLarge {
                size: DEFAULT_MAX_FILE_SIZE + 1,
                max: DEFAULT_MAX_FILE_SIZE,
            })
        );
    }

    #[test]
    fn test_size_is_checked_first() {
        let err = policy()
            .validate("../evil.exe", DEFAULT_MAX_FILE_SIZE + 1, "x/y")
            .unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
    }

    #[test]
    fn test_rejects_traversal_and_absolute_names() {
        for name in [
            "../../etc/passwd",
            "../secret.txt",
            "dir/../x.txt",
            "/etc/passwd",
            "/tmp/notes.txt",
            "\\windows\\win.ini",
            "C:\\boot.txt",
            "..\\..\\x.txt",
            "a\\b.txt",
            "notes..txt",
            "",
        ] {
            assert!(
                matches!(
                    policy().validate(name, 1, "text/plain"),
                    Err(ValidationError::UnsafeName(_))
                ),
                "{name:?} should be unsafe"
            );
        }
    }

    #[test]
    fn test_directory_component_is_stripped() {
        assert!(policy()
            .validate("photos/cat.png", 10, "image/png")
            .is_ok());
        assert_eq!(base_name("photos/2024/cat.png"), "cat.png");
        assert_eq!(base_name("cat.png"), "cat.png");
    }

    #[test]
    fn test_extension_allow_list() {
        let p = policy();
        assert!(p.validate("IMAGE.JPG", 1, "image/jpeg").is_ok());
        assert!(p.validate("archive.Zip", 1, "application/zip").is_ok());
        assert_eq!(
            p.validate("run.exe", 1, "application/octet-stream"),
            Err(ValidationError::TypeNotAllowed(".exe".to_string()))
        );
        assert!(matches!(
            p.validate("README", 1, "text/plain"),
            Err(ValidationError::TypeNotAllowed(_))
        ));
    }

    #[test]
    fn test_mime_allow_list() {
        let p = policy();
        assert!(p.validate("a.zip", 1, "application/x-zip-compressed").is_ok());
        assert!(p.validate("a.txt", 1, "text/plain; charset=utf-8").is_ok());
        assert_eq!(
            p.validate("a.txt", 1, "text/html"),
            Err(ValidationError::MimeNotAllowed("text/html".to_string()))
        );
        assert!(matches!(
            p.validate("a.txt", 1, ""),
            Err(ValidationError::MimeNotAllowed(_))
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = ValidationError::TooLarge {
            size: DEFAULT_MAX_FILE_SIZE + 1,
            max: DEFAULT_MAX_FILE_SIZE,
        };
        assert_eq!(err.to_string(), "File size too large (max 50MB)");
        assert_eq!(
            ValidationError::UnsafeName("../x".into()).to_string(),
            "Invalid filename"
        );
    }
}
