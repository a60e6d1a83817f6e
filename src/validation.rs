//! Validation System - Rule/Policy Separation
//!
//! Rules inspect a generated artwork and produce structured violations.
//! Policy maps violations to a verdict.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::scene::{GeneratedArtwork, LayerKind};
use crate::svg::CANVAS_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self { valid: true, violations: vec![] }
    }

    pub fn failure(violations: Vec<ValidationViolation>) -> Self {
        Self { valid: false, violations }
    }

    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    #[default]
    Block,
    Warn,
}

/// Validation rule trait - produces violations
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, artwork: &GeneratedArtwork) -> Vec<ValidationViolation>;
}

fn violation(
    rule: &str,
    message: impl Into<String>,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> ValidationViolation {
    ValidationViolation {
        rule: rule.to_string(),
        severity: ViolationSeverity::Error,
        message: message.into(),
        expected: Some(expected.into()),
        actual: Some(actual.into()),
    }
}

// --- Concrete Rules ---

pub struct CanvasSizeRule;

impl ValidationRule for CanvasSizeRule {
    fn name(&self) -> &'static str { "canvas_size" }

    fn validate(&self, artwork: &GeneratedArtwork) -> Vec<ValidationViolation> {
        if artwork.width() == CANVAS_SIZE && artwork.height() == CANVAS_SIZE {
            return vec![];
        }
        vec![violation(
            self.name(),
            "Canvas is not the fixed square size",
            format!("{0}x{0}", CANVAS_SIZE),
            format!("{}x{}", artwork.width(), artwork.height()),
        )]
    }
}

/// Layers must appear in stacking order with no repeats.
pub struct LayerOrderRule;

impl ValidationRule for LayerOrderRule {
    fn name(&self) -> &'static str { "layer_order" }

    fn validate(&self, artwork: &GeneratedArtwork) -> Vec<ValidationViolation> {
        let kinds = artwork.scene().kinds();
        let ordered = kinds.windows(2).all(|w| w[0] < w[1]);
        if ordered && kinds.first() == Some(&LayerKind::Definitions) {
            return vec![];
        }
        vec![violation(
            self.name(),
            "Layers out of order",
            format!("{:?}", LayerKind::ORDER),
            format!("{:?}", kinds),
        )]
    }
}

/// Every mandatory layer is present and no layer is empty.
pub struct LayerContentRule;

impl ValidationRule for LayerContentRule {
    fn name(&self) -> &'static str { "layer_content" }

    fn validate(&self, artwork: &GeneratedArtwork) -> Vec<ValidationViolation> {
        let scene = artwork.scene();
        let mut violations = vec![];

        for kind in LayerKind::ORDER {
            if kind == LayerKind::OrganicArt {
                continue;
            }
            if scene.layer(kind).is_none() {
                violations.push(violation(
                    self.name(),
                    format!("Missing {} layer", kind.name()),
                    "present",
                    "absent",
                ));
            }
        }

        for layer in scene.layers() {
            if layer.markup.trim().is_empty() {
                violations.push(violation(
                    self.name(),
                    format!("Empty {} layer", layer.kind.name()),
                    "markup",
                    "empty",
                ));
            }
        }

        violations
    }
}

/// The organic layer exists exactly when the flow gate is open.
pub struct OrganicGateRule;

impl ValidationRule for OrganicGateRule {
    fn name(&self) -> &'static str { "organic_gate" }

    fn validate(&self, artwork: &GeneratedArtwork) -> Vec<ValidationViolation> {
        let expected = artwork.params().has_organic_layer();
        let actual = artwork.scene().layer(LayerKind::OrganicArt).is_some();
        if expected == actual {
            return vec![];
        }
        vec![violation(
            self.name(),
            format!("Organic layer presence disagrees with flow {}", artwork.params().organic_flow),
            expected.to_string(),
            actual.to_string(),
        )]
    }
}

/// The serialized SVG parses as XML and every end tag closes the element
/// that is actually open.
pub struct WellFormedRule;

impl ValidationRule for WellFormedRule {
    fn name(&self) -> &'static str { "well_formed" }

    fn validate(&self, artwork: &GeneratedArtwork) -> Vec<ValidationViolation> {
        match check_well_formed(&artwork.to_svg()) {
            Ok(()) => vec![],
            Err(problem) => vec![violation(self.name(), "Malformed markup", "well-formed XML", problem)],
        }
    }
}

/// Walk `markup` with a stack of open element names.
pub fn check_well_formed(markup: &str) -> Result<(), String> {
    let mut reader = Reader::from_str(markup);
    // Mismatches are reported from our own stack, with both names.
    reader.config_mut().check_end_names = false;
    let mut open: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(elem)) => {
                open.push(String::from_utf8_lossy(elem.name().as_ref()).into_owned());
            }
            Ok(Event::End(elem)) => {
                let name = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
                match open.pop() {
                    Some(expected) if expected == name => {}
                    Some(expected) => {
                        return Err(format!(
                            "</{}> closes <{}> at position {}",
                            name,
                            expected,
                            reader.buffer_position()
                        ));
                    }
                    None => return Err(format!("</{}> has no open element", name)),
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "XML parse error at position {}: {}",
                    reader.error_position(),
                    e
                ));
            }
        }
    }

    match open.last() {
        Some(name) => Err(format!("<{}> is never closed", name)),
        None => Ok(()),
    }
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
    failure_mode: FailureMode,
}

impl Validator {
    pub fn new() -> Self {
        Self::with_failure_mode(FailureMode::Block)
    }

    pub fn with_failure_mode(failure_mode: FailureMode) -> Self {
        Self {
            rules: vec![
                Box::new(CanvasSizeRule),
                Box::new(LayerOrderRule),
                Box::new(LayerContentRule),
                Box::new(OrganicGateRule),
                Box::new(WellFormedRule),
            ],
            failure_mode,
        }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn validate(&self, artwork: &GeneratedArtwork) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(artwork))
            .collect();

        let has_errors = violations.iter().any(|v| v.severity == ViolationSeverity::Error);

        match self.failure_mode {
            FailureMode::Block if has_errors => ValidationResult::failure(violations),
            FailureMode::Block if violations.is_empty() => ValidationResult::success(),
            FailureMode::Block | FailureMode::Warn => ValidationResult {
                valid: true,
                violations,
            },
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject text the markup cannot carry: XML 1.0 forbids most C0 controls.
pub fn check_text(field: &str, value: &str) -> Result<(), String> {
    match value
        .chars()
        .find(|c| *c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r'))
    {
        Some(bad) => Err(format!("{field} contains control character U+{:04X}", bad as u32)),
        None => Ok(()),
    }
}
