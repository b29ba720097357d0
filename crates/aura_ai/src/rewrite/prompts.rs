pub fn rewrite_prompt(score: f64, band_label: &str, text: &str) -> String {
    // Keep the contract explicit:
    // - Preserve meaning, change wording and structure.
    // - Return only the rewritten text.
    format!(
        r#"The following text was checked for originality and scored {score:.2}/100 ({band_label}) against existing web sources.

Rewrite it so that it is original in wording and sentence structure.

Rules (non-negotiable):
1) Preserve the meaning and every factual claim. Do not add new facts.
2) Do not copy phrases of four or more words from the original.
3) Keep roughly the same length.

Text:
{text}

Output:
- Return only the rewritten text, with no preamble or commentary.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::rewrite_prompt;

    #[test]
    fn prompt_carries_score_band_and_text() {
        let p = rewrite_prompt(72.345, "heavily similar, rewrite required", "Water boils.");
        assert!(p.contains("72.35/100"));
        assert!(p.contains("heavily similar, rewrite required"));
        assert!(p.contains("Text:\nWater boils.\n"));
    }
}
