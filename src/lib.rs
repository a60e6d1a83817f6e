//! QuoteArt Core - Deterministic Quote Artwork Engine
//!
//! # The Laws (Non-Negotiable)
//! 1. SVG Is Truth
//! 2. Same Text, Same Art: generation is a pure function of quote and author
//! 3. Validation Is Protective
//! 4. Layer Order Never Changes
//! 5. Manifests Enable Reproduction
//! 6. Ephemeral Handles Are Always Released

pub mod chain;
pub mod config;
pub mod export;
pub mod hashing;
pub mod logging;
pub mod params;
pub mod pipeline;
pub mod samples;
pub mod scene;
pub mod svg;
pub mod text;
pub mod validation;
pub mod variants;

pub use config::{AppConfig, ChainConfig, ConfigError};
pub use export::{data_url, with_display_reference, ArtworkBlob, DisplayReference, ReferenceRegistry};
pub use hashing::{artwork_digest, canonical_json, compute_job_hash, compute_manifest_hash, hash, HashDigest};
pub use params::{Hsl, TextTone, VisualParameters};
pub use pipeline::{ArtworkManifest, ArtworkPipeline, CompiledArtwork, GenerateRequest, PipelineError};
pub use scene::{GeneratedArtwork, Layer, LayerKind, Scene};
pub use validation::{ValidationResult, ValidationRule, ValidationViolation, ViolationSeverity};
pub use variants::{PatternKind, ShapeKind, TextureKind};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Serialized SVG artwork for a quote and its author.
pub fn generate(text: &str, label: &str) -> String {
    GeneratedArtwork::generate(text, label).to_svg()
}

/// Register the artwork in `registry` and return its ephemeral reference.
pub fn display_reference<'a>(
    registry: &'a ReferenceRegistry,
    text: &str,
    label: &str,
) -> DisplayReference<'a> {
    registry.create(&GeneratedArtwork::generate(text, label))
}

/// Download blob; without an explicit `filename` it is named after `label`.
pub fn download(text: &str, label: &str, filename: Option<&str>) -> ArtworkBlob {
    let artwork = GeneratedArtwork::generate(text, label);
    match filename {
        Some(name) => ArtworkBlob::new(&artwork, name),
        None => ArtworkBlob::for_author(&artwork, label),
    }
}
