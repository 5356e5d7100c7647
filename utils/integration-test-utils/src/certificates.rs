//! Certificate introspectors with fixed outcomes.

use aton_client::contract::{CertificateError, CertificateIntrospector};

/// Introspector returning the same subject and issuer for every certificate.
pub struct FixedCertificateIntrospector {
    pub subject: String,
    pub issuer: String,
}

impl FixedCertificateIntrospector {
    pub fn new(subject: &str, issuer: &str) -> Self {
        Self {
            subject: subject.to_string(),
            issuer: issuer.to_string(),
        }
    }
}

impl CertificateIntrospector for FixedCertificateIntrospector {
    fn extract_subject_id(&self, _certificate_pem: &str) -> Result<String, CertificateError> {
        Ok(self.subject.clone())
    }

    fn extract_issuer_id(&self, _certificate_pem: &str) -> Result<String, CertificateError> {
        Ok(self.issuer.clone())
    }
}

/// Introspector rejecting every certificate as malformed.
pub struct RejectingCertificateIntrospector;

impl CertificateIntrospector for RejectingCertificateIntrospector {
    fn extract_subject_id(&self, _certificate_pem: &str) -> Result<String, CertificateError> {
        Err(CertificateError::Malformed(
            "unparseable certificate".to_string(),
        ))
    }

    fn extract_issuer_id(&self, _certificate_pem: &str) -> Result<String, CertificateError> {
        Err(CertificateError::Malformed(
            "unparseable certificate".to_string(),
        ))
    }
}
