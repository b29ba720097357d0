use std::cmp::Ordering;

use crate::config::Threshold;
use crate::domain::{CandidateSource, Encoded, Fragment, MatchEvidence};
use crate::similarity::{cosine_similarity_with_norms, l2_norm};

/// Compare every fragment against every source and keep pairs at or above `threshold`.
///
/// Sources with an empty snippet are skipped. Pairs are generated source-major (each source
/// against all fragments, in input order); the output is then stably sorted by descending
/// similarity, so equal scores keep that generation order.
pub fn select_evidence(
    fragments: &[Encoded<Fragment>],
    sources: &[Encoded<CandidateSource>],
    threshold: Threshold,
) -> Vec<MatchEvidence> {
    let min = threshold.value();
    let fragment_norms: Vec<f32> = fragments.iter().map(|f| l2_norm(&f.embedding)).collect();

    let mut out: Vec<MatchEvidence> = Vec::new();
    for source in sources {
        if !source.item.has_snippet() {
            continue;
        }
        let source_norm = l2_norm(&source.embedding);
        for (fragment, fragment_norm) in fragments.iter().zip(fragment_norms.iter()) {
            let similarity = cosine_similarity_with_norms(
                &fragment.embedding,
                &source.embedding,
                *fragment_norm,
                source_norm,
            );
            if similarity >= min {
                out.push(MatchEvidence {
                    url: source.item.url.clone(),
                    fragment: fragment.item.text.clone(),
                    snippet: source.item.snippet.clone(),
                    similarity,
                });
            }
        }
    }

    rank_evidence(&mut out);
    out
}

/// Stable descending sort by similarity.
pub fn rank_evidence(evidence: &mut [MatchEvidence]) {
    evidence.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frag(text: &str, v: &[f32]) -> Encoded<Fragment> {
        Encoded::new(Fragment::new(text), v.to_vec())
    }

    fn src(url: &str, snippet: &str, v: &[f32]) -> Encoded<CandidateSource> {
        Encoded::new(CandidateSource::new(url, snippet), v.to_vec())
    }

    fn t(v: f32) -> Threshold {
        Threshold::new(v).expect("threshold")
    }

    #[test]
    fn keeps_only_pairs_at_or_above_threshold() {
        let fragments = vec![frag("a", &[1.0, 0.0]), frag("b", &[0.0, 1.0])];
        let sources = vec![src("https://x", "x", &[1.0, 0.0])];
        let ev = select_evidence(&fragments, &sources, t(0.75));
        assert_eq!(ev.len(), 1);
        assert_eq!(ev[0].fragment, "a");
        assert_eq!(ev[0].url, "https://x");
        assert!(ev.iter().all(|e| e.similarity >= 0.75));
    }

    #[test]
    fn similarity_equal_to_threshold_is_included() {
        let fragments = vec![frag("a", &[1.0, 0.0])];
        let sources = vec![src("https://x", "x", &[1.0, 0.0])];
        let ev = select_evidence(&fragments, &sources, t(1.0));
        assert_eq!(ev.len(), 1);
    }

    #[test]
    fn empty_snippets_are_skipped() {
        let fragments = vec![frag("a", &[1.0, 0.0])];
        let sources = vec![
            src("https://empty", "   ", &[1.0, 0.0]),
            src("https://full", "text", &[1.0, 0.0]),
        ];
        let ev = select_evidence(&fragments, &sources, t(0.7));
        assert_eq!(ev.len(), 1);
        assert_eq!(ev[0].url, "https://full");
    }

    #[test]
    fn output_is_descending_with_stable_ties() {
        let fragments = vec![frag("f1", &[1.0, 0.0]), frag("f2", &[1.0, 1.0])];
        let sources = vec![
            src("https://s1", "s1", &[1.0, 0.2]),
            src("https://s2", "s2", &[1.0, 0.0]),
        ];
        let ev = select_evidence(&fragments, &sources, t(0.5));
        for w in ev.windows(2) {
            assert!(w[0].similarity >= w[1].similarity);
        }
        // f1 vs s2 is an exact match and must lead.
        assert_eq!((ev[0].fragment.as_str(), ev[0].url.as_str()), ("f1", "https://s2"));

        // Ties keep source-major generation order.
        let tied = vec![src("https://first", "a", &[2.0, 0.0]), src("https://second", "b", &[3.0, 0.0])];
        let ev = select_evidence(&[frag("f", &[1.0, 0.0])], &tied, t(0.5));
        let urls: Vec<&str> = ev.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://first", "https://second"]);
    }

    #[test]
    fn zero_vectors_never_match() {
        let fragments = vec![frag("a", &[0.0, 0.0])];
        let sources = vec![src("https://x", "x", &[1.0, 0.0])];
        assert!(select_evidence(&fragments, &sources, t(0.01)).is_empty());
    }
}
