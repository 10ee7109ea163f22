//! Error types shared between the API and its clients

use thiserror::Error;

/// A request field that failed validation
///
/// The display form (`Invalid <field>`) is what the API sends back to the
/// client; `reason` carries the rule that was broken for logs and tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_only_the_field() {
        let err = ValidationError::new("username", "must not be empty");
        assert_eq!(err.to_string(), "Invalid username");
        assert_eq!(err.reason, "must not be empty");
    }
}
