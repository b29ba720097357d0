use crate::domain::MatchEvidence;

/// Reduce evidence to a 0..=100 plagiarism score.
///
/// The mean runs over matches, not fragments: a fragment matching three sources contributes
/// three data points. Empty evidence scores exactly 0.
pub fn aggregate(evidence: &[MatchEvidence]) -> f64 {
    if evidence.is_empty() {
        return 0.0;
    }
    let sum: f64 = evidence.iter().map(|e| f64::from(e.similarity)).sum();
    let mean = sum / evidence.len() as f64;
    (mean * 100.0).clamp(0.0, 100.0)
}
