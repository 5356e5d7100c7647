//! Signed upload ingestion: decode, classify, fan out, acknowledge.

pub mod classification;

mod envelope;
pub use envelope::{AckRequest, SignerIdentity, UploadEnvelope, UploadResult, UploadResultCode};

mod pipeline;
pub use pipeline::IngestionPipeline;
