//! Certificate-introspection capability over PEM-encoded public certificates.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure to parse or inspect a PEM-encoded certificate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CertificateError {
    Malformed(String),
}

impl Display for CertificateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CertificateError::Malformed(detail) => {
                write!(f, "malformed public certificate: {detail}")
            }
        }
    }
}

impl Error for CertificateError {}

/// Pure functions extracting signer metadata from a PEM certificate.
///
/// The cryptographic parsing itself belongs to the excluded keystore /
/// signature library; the core only consumes the extracted identities.
pub trait CertificateIntrospector: Send + Sync {
    /// Subject unique identifier (who signed the upload).
    fn extract_subject_id(&self, pem: &str) -> Result<String, CertificateError>;

    /// Issuer unique identifier (who issued the signer's certificate).
    fn extract_issuer_id(&self, pem: &str) -> Result<String, CertificateError>;
}
