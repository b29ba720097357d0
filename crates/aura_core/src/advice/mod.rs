use serde::{Deserialize, Serialize};

/// Score bands observed at the service boundary: [0,30), [30,60), [60,100].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityBand {
    Original,
    Moderate,
    Heavy,
}

impl SimilarityBand {
    pub fn for_score(score: f64) -> Self {
        if score < 30.0 {
            SimilarityBand::Original
        } else if score < 60.0 {
            SimilarityBand::Moderate
        } else {
            SimilarityBand::Heavy
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SimilarityBand::Original => "looks original",
            SimilarityBand::Moderate => "moderate similarity",
            SimilarityBand::Heavy => "heavily similar, rewrite required",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            SimilarityBand::Original => {
                "Your text looks quite original. Minor improvements or paraphrasing may help polish it."
            }
            SimilarityBand::Moderate => {
                "Your text shows moderate similarity. Consider rephrasing key sections and verifying originality."
            }
            SimilarityBand::Heavy => {
                "Your text is heavily plagiarized. Rewrite it completely or make major changes to ensure originality."
            }
        }
    }

    /// Whether a generated rewrite is worth requesting for this band.
    pub fn wants_rewrite(self) -> bool {
        !matches!(self, SimilarityBand::Original)
    }
}

pub fn advice_for_score(score: f64) -> (SimilarityBand, &'static str) {
    let band = SimilarityBand::for_score(score);
    (band, band.advice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges_follow_half_open_ranges() {
        assert_eq!(SimilarityBand::for_score(0.0), SimilarityBand::Original);
        assert_eq!(SimilarityBand::for_score(29.99), SimilarityBand::Original);
        assert_eq!(SimilarityBand::for_score(30.0), SimilarityBand::Moderate);
        assert_eq!(SimilarityBand::for_score(59.99), SimilarityBand::Moderate);
        assert_eq!(SimilarityBand::for_score(60.0), SimilarityBand::Heavy);
        assert_eq!(SimilarityBand::for_score(100.0), SimilarityBand::Heavy);
    }

    #[test]
    fn advice_text_matches_band() {
        let (band, text) = advice_for_score(75.0);
        assert_eq!(band, SimilarityBand::Heavy);
        assert!(text.contains("Rewrite"));
        assert!(!SimilarityBand::Original.wants_rewrite());
        assert!(SimilarityBand::Moderate.wants_rewrite());
    }

    #[test]
    fn advice_sentences_per_band() {
        assert_eq!(
            advice_for_score(12.0).1,
            "Your text looks quite original. Minor improvements or paraphrasing may help polish it."
        );
        assert_eq!(
            advice_for_score(45.0).1,
            "Your text shows moderate similarity. Consider rephrasing key sections and verifying originality."
        );
        assert_eq!(
            advice_for_score(88.0).1,
            "Your text is heavily plagiarized. Rewrite it completely or make major changes to ensure originality."
        );
    }
}
