//! Shared validation utilities

use thiserror::Error;

/// Extension every uploaded sales file must carry
pub const DAT_EXTENSION: &str = "dat";

/// Maximum accepted filename length
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Errors that can occur during filename validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilenameValidationError {
    #[error("Filename is required and cannot be empty")]
    Required,

    #[error("Filename must not exceed {max_length} characters")]
    TooLong { max_length: usize },

    #[error("Only .dat files are accepted, got '{filename}'")]
    InvalidExtension { filename: String },
}

/// Validate the name of an uploaded sales file
///
/// # Rules
/// - Must not be blank
/// - Must be at most 255 characters
/// - Must end in `.dat`, compared case-insensitively
pub fn validate_dat_filename(filename: &str) -> Result<(), FilenameValidationError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(FilenameValidationError::Required);
    }

    if trimmed.chars().count() > MAX_FILENAME_LENGTH {
        return Err(FilenameValidationError::TooLong {
            max_length: MAX_FILENAME_LENGTH,
        });
    }

    let has_dat_extension = std::path::Path::new(trimmed)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DAT_EXTENSION));

    if !has_dat_extension {
        return Err(FilenameValidationError::InvalidExtension {
            filename: trimmed.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dat_filenames() {
        assert!(validate_dat_filename("vendas.dat").is_ok());
        assert!(validate_dat_filename("VENDAS.DAT").is_ok());
        assert!(validate_dat_filename("2025-01.vendas.Dat").is_ok());
    }

    #[test]
    fn test_rejects_other_extensions() {
        assert!(matches!(
            validate_dat_filename("vendas.csv"),
            Err(FilenameValidationError::InvalidExtension { .. })
        ));
        assert!(matches!(
            validate_dat_filename("vendas.dat.txt"),
            Err(FilenameValidationError::InvalidExtension { .. })
        ));
        assert!(matches!(
            validate_dat_filename("dat"),
            Err(FilenameValidationError::InvalidExtension { .. })
        ));
    }

    #[test]
    fn test_rejects_blank_and_long_names() {
        assert_eq!(validate_dat_filename("  "), Err(FilenameValidationError::Required));
        let long = format!("{}.dat", "a".repeat(300));
        assert_eq!(
            validate_dat_filename(&long),
            Err(FilenameValidationError::TooLong { max_length: 255 })
        );
    }
}
