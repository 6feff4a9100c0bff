//! Input validation errors.

use std::path::PathBuf;

use tagtrace_common::TagMatch;

/// A [`TagMatch`] that could not have come from a working parser.
///
/// These indicate a bug upstream, not a property of the scanned project.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty.
    #[error("malformed tag at {file}:{line}: `{field}` is empty")]
    EmptyField {
        /// The name of the empty field.
        field: &'static str,
        /// The file the tag claims to come from.
        file: PathBuf,
        /// The line the tag claims to come from.
        line: u32,
    },

    /// Line numbers are 1-indexed.
    #[error("malformed tag {token} in {file}: line number 0")]
    ZeroLine {
        /// The tag token.
        token: String,
        /// The file the tag claims to come from.
        file: PathBuf,
    },

    /// The identifier contains whitespace, so it cannot have been split off
    /// a source line.
    #[error("malformed tag at {file}:{line}: identifier {identifier:?} contains whitespace")]
    WhitespaceInIdentifier {
        /// The offending identifier.
        identifier: String,
        /// The file the tag claims to come from.
        file: PathBuf,
        /// The line the tag claims to come from.
        line: u32,
    },
}

/// Checks every tag for the fields the validator relies on.
pub fn check_input(tags: &[TagMatch]) -> Result<(), ValidationError> {
    for tag in tags {
        for (field, value) in [("category", &tag.category), ("identifier", &tag.identifier)] {
            if value.is_empty() {
                return Err(ValidationError::EmptyField {
                    field,
                    file: tag.file.clone(),
                    line: tag.line,
                });
            }
        }
        if tag.file.as_os_str().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "file",
                file: tag.file.clone(),
                line: tag.line,
            });
        }
        if tag.line == 0 {
            return Err(ValidationError::ZeroLine {
                token: tag.token(),
                file: tag.file.clone(),
            });
        }
        if tag.identifier.chars().any(char::is_whitespace) {
            return Err(ValidationError::WhitespaceInIdentifier {
                identifier: tag.identifier.clone(),
                file: tag.file.clone(),
                line: tag.line,
            });
        }
    }
    Ok(())
}
