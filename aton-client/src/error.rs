//! Stable error-kind taxonomy shared across component boundaries.

/// Caller-visible failure family for errors crossing a component boundary.
///
/// Each component's error enum maps into one of these kinds so callers can
/// branch on the family without matching component-specific variants.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Caller-supplied input is malformed or a required collaborator is
    /// unconfigured. Never retried automatically.
    Validation,
    /// The remote counterparty has no matching resource. Not retried.
    NotFound,
    /// An inbound upload payload failed to decode against the expected
    /// content schema. Surfaced in-band, not as a fault.
    SchemaValidation,
}

impl ErrorKind {
    /// Stable identifying code for this failure family.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::SchemaValidation => "schema_validation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorKind;

    #[test]
    fn kind_codes_are_stable() {
        assert_eq!(ErrorKind::Validation.code(), "validation");
        assert_eq!(ErrorKind::NotFound.code(), "not_found");
        assert_eq!(ErrorKind::SchemaValidation.code(), "schema_validation");
    }
}
