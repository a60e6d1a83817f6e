//! Generation Pipeline - Single Entry Point
//!
//! CRITICAL: compile MUST validate the generated artwork internally. No bypass.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::export::ExportError;
use crate::hashing::{compute_job_hash, compute_manifest_hash, sha256_hex, HashDigest};
use crate::params::VisualParameters;
use crate::scene::GeneratedArtwork;
use crate::validation::{check_text, ValidationResult, Validator};
use crate::ENGINE_VERSION;

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Manifest from engine {0} cannot be reproduced by engine {1}")]
    EngineVersionMismatch(String, String),

    #[error("Invalid engine version: {0}")]
    InvalidVersion(#[from] semver::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub quote: String,
    pub author: String,
}

impl GenerateRequest {
    pub fn new(quote: impl Into<String>, author: impl Into<String>) -> Self {
        Self { quote: quote.into(), author: author.into() }
    }

    /// Parse a JSON payload, insisting that `quote` and `author` are JSON
    /// strings. Numbers, nulls and the like are rejected rather than
    /// coerced.
    pub fn from_json(payload: &str) -> Result<Self, PipelineError> {
        let value: Value = serde_json::from_str(payload)?;
        let object = value
            .as_object()
            .ok_or_else(|| PipelineError::InvalidInput("payload must be a JSON object".into()))?;

        let field = |name: &str| -> Result<String, PipelineError> {
            match object.get(name) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Err(PipelineError::InvalidInput(format!(
                    "`{}` must be a string, got {}",
                    name,
                    json_type(other)
                ))),
                None => Err(PipelineError::InvalidInput(format!("`{}` is required", name))),
            }
        };

        Ok(Self {
            quote: field("quote")?,
            author: field("author")?,
        })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Everything needed to reproduce and audit one artwork.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkManifest {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub engine_version: String,
    pub quote: String,
    pub author: String,
    pub digest: HashDigest,
    pub parameters: VisualParameters,
    pub content_hash: String,
    pub job_hash: String,
    pub manifest_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledArtwork {
    pub manifest: ArtworkManifest,
    pub validation: ValidationResult,
    pub svg: String,
}

/// The generation pipeline - single entry point for audited generation
pub struct ArtworkPipeline {
    validator: Validator,
}

impl ArtworkPipeline {
    pub fn new(validator: Validator) -> Self {
        Self { validator }
    }

    /// Plain generation, no manifest.
    pub fn generate_svg(&self, quote: &str, author: &str) -> String {
        GeneratedArtwork::generate(quote, author).to_svg()
    }

    /// This is the ONLY artwork validation entry point.
    pub fn validate_artwork(&self, artwork: &GeneratedArtwork) -> ValidationResult {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        self.validator.validate(artwork)
    }

    /// Generate, validate and record an artwork.
    ///
    /// Rejecting control characters is a policy of this pipeline only:
    /// [`crate::generate`] accepts any text and never fails.
    ///
    /// CRITICAL: This ALWAYS calls validate_artwork internally.
    pub fn compile(&self, request: &GenerateRequest) -> Result<CompiledArtwork, PipelineError> {
        check_text("quote", &request.quote).map_err(PipelineError::InvalidInput)?;
        check_text("author", &request.author).map_err(PipelineError::InvalidInput)?;

        let artwork = GeneratedArtwork::generate(&request.quote, &request.author);

        // MANDATORY: Validation is always called.
        let validation = self.validate_artwork(&artwork);
        if !validation.valid {
            let messages: Vec<_> = validation
                .violations
                .iter()
                .map(|v| format!("{}: {}", v.rule, v.message))
                .collect();
            warn!("event=artwork_rejected module=pipeline violations={}", messages.len());
            return Err(PipelineError::ValidationFailed(messages.join("; ")));
        }

        let svg = artwork.to_svg();
        let mut manifest = ArtworkManifest {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            quote: request.quote.clone(),
            author: request.author.clone(),
            digest: *artwork.digest(),
            parameters: artwork.params().clone(),
            content_hash: sha256_hex(svg.as_bytes()),
            job_hash: compute_job_hash(&request.quote, &request.author, ENGINE_VERSION),
            manifest_hash: String::new(), // Computed after
        };
        manifest.manifest_hash = compute_manifest_hash(&manifest)?;

        info!(
            "event=artwork_compiled module=pipeline id={} job_hash={} bytes={}",
            manifest.id,
            manifest.job_hash,
            svg.len()
        );

        Ok(CompiledArtwork { manifest, validation, svg })
    }

    /// Regenerate from a manifest and report whether the output still
    /// matches. Only manifests written by the same major engine version are
    /// reproducible.
    pub fn verify(&self, manifest: &ArtworkManifest) -> Result<bool, PipelineError> {
        let ours = semver::Version::parse(ENGINE_VERSION)?;
        let theirs = semver::Version::parse(&manifest.engine_version)?;
        if ours.major != theirs.major {
            return Err(PipelineError::EngineVersionMismatch(
                manifest.engine_version.clone(),
                ENGINE_VERSION.to_string(),
            ));
        }

        let artwork = GeneratedArtwork::generate(&manifest.quote, &manifest.author);
        let content_hash = sha256_hex(artwork.to_svg().as_bytes());
        let matches = *artwork.digest() == manifest.digest && content_hash == manifest.content_hash;
        debug!(
            "event=artwork_verified module=pipeline id={} matches={}",
            manifest.id, matches
        );
        Ok(matches)
    }
}

impl Default for ArtworkPipeline {
    fn default() -> Self {
        Self::new(Validator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_accepts_strings() {
        let req = GenerateRequest::from_json(r#"{"quote": "Hi", "author": "Me"}"#).unwrap();
        assert_eq!(req, GenerateRequest::new("Hi", "Me"));
    }

    #[test]
    fn test_from_json_rejects_numbers() {
        let err = GenerateRequest::from_json(r#"{"quote": 42, "author": "Me"}"#).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
        assert!(err.to_string().contains("`quote` must be a string, got number"));
    }

    #[test]
    fn test_from_json_rejects_missing() {
        let err = GenerateRequest::from_json(r#"{"quote": "Hi"}"#).unwrap_err();
        assert!(err.to_string().contains("`author` is required"));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = GenerateRequest::from_json(r#"["Hi", "Me"]"#).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
    }

    #[test]
    fn test_control_characters_rejected() {
        let pipeline = ArtworkPipeline::default();
        let err = pipeline
            .compile(&GenerateRequest::new("bell\u{7}", "Me"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));

        // Plain generation stays total.
        assert!(crate::generate("bell\u{7}", "Me").starts_with("<svg"));
    }

    #[test]
    fn test_verify_rejects_other_major() {
        let pipeline = ArtworkPipeline::default();
        let mut compiled = pipeline.compile(&GenerateRequest::new("q", "a")).unwrap();
        compiled.manifest.engine_version = "99.0.0".into();
        assert!(matches!(
            pipeline.verify(&compiled.manifest),
            Err(PipelineError::EngineVersionMismatch(_, _))
        ));
    }
}
