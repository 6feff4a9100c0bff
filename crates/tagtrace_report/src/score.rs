//! The blended overall score.
//!
//! Presentation only. Nothing in validation reads it back.

use tagtrace_config::ScoreWeights;
use tagtrace_graph::{ChainValidationResult, Suggestion};

/// Share of checked chains that are complete, 1.0 when there are none.
pub fn chain_integrity(chains: &[ChainValidationResult]) -> f64 {
    if chains.is_empty() {
        return 1.0;
    }
    chains.iter().filter(|c| c.is_valid).count() as f64 / chains.len() as f64
}

/// Mean suggestion confidence, 1.0 when there is nothing to correct.
pub fn average_confidence(suggestions: &[Suggestion]) -> f64 {
    if suggestions.is_empty() {
        return 1.0;
    }
    suggestions.iter().map(|s| s.confidence).sum::<f64>() / suggestions.len() as f64
}

/// Weighted mean of coverage, integrity, and confidence, each in `[0, 1]`.
/// Weights are normalised by their sum; a zero sum yields 0.0.
pub fn overall_score(weights: &ScoreWeights, coverage: f64, integrity: f64, confidence: f64) -> f64 {
    let total = weights.coverage + weights.integrity + weights.confidence;
    if total <= 0.0 || !total.is_finite() {
        return 0.0;
    }
    let blended =
        weights.coverage * coverage + weights.integrity * integrity + weights.confidence * confidence;
    (blended / total).clamp(0.0, 1.0)
}
