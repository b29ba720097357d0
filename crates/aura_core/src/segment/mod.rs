use crate::domain::Fragment;

pub(crate) fn normalize_text(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

fn is_terminal(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

fn push_fragment(text: &str, start: usize, end: usize, out: &mut Vec<Fragment>) {
    let span = &text[start..end];
    let trimmed = span.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = span.len() - span.trim_start().len();
    out.push(Fragment::new(trimmed).with_offset(start + lead));
}

/// Split text into sentence-level fragments.
///
/// A boundary sits right after `.`, `!` or `?` when the next character is whitespace.
/// Abbreviations, decimals and quoted punctuation get no special treatment. Empty or
/// whitespace-only input yields no fragments.
pub fn segment(text: &str) -> Vec<Fragment> {
    let normalized = normalize_text(text);
    let mut out = Vec::new();
    let mut start = 0usize;

    let mut chars = normalized.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if !is_terminal(ch) {
            continue;
        }
        let Some(&(_, next)) = chars.peek() else {
            break;
        };
        if next.is_whitespace() {
            let end = i + ch.len_utf8();
            push_fragment(&normalized, start, end, &mut out);
            start = end;
        }
    }
    push_fragment(&normalized, start, normalized.len(), &mut out);

    out
}

#[cfg(test)]
mod tests {
    use super::segment;
    use pretty_assertions::assert_eq;

    fn texts(input: &str) -> Vec<String> {
        segment(input).into_iter().map(|f| f.text).collect()
    }

    #[test]
    fn splits_on_terminal_punctuation_followed_by_whitespace() {
        assert_eq!(
            texts("The sky is blue. Water boils at 100 degrees Celsius."),
            vec!["The sky is blue.", "Water boils at 100 degrees Celsius."]
        );
        assert_eq!(texts("Really?  Yes!\nOk."), vec!["Really?", "Yes!", "Ok."]);
    }

    #[test]
    fn empty_and_whitespace_input_yield_nothing() {
        assert!(segment("").is_empty());
        assert!(segment("   \n\t  \r\n").is_empty());
    }

    #[test]
    fn text_without_terminal_punctuation_is_one_fragment() {
        assert_eq!(texts("  no punctuation here  "), vec!["no punctuation here"]);
    }

    #[test]
    fn heuristic_does_not_protect_abbreviations_or_decimals() {
        // "Dr. Smith" splits; "3.14" does not because no whitespace follows the dot.
        assert_eq!(
            texts("Dr. Smith measured 3.14 units."),
            vec!["Dr.", "Smith measured 3.14 units."]
        );
    }

    #[test]
    fn offsets_point_at_trimmed_fragment_start() {
        let input = "One.   Two!";
        let frags = segment(input);
        assert_eq!(frags.len(), 2);
        assert_eq!(frags[0].offset, Some(0));
        assert_eq!(frags[1].offset, Some(7));
        assert_eq!(&input[7..], "Two!");
    }

    #[test]
    fn crlf_is_normalized_before_splitting() {
        assert_eq!(texts("First.\r\nSecond."), vec!["First.", "Second."]);
    }

    #[test]
    fn multibyte_text_is_split_on_char_boundaries() {
        assert_eq!(texts("Café ouvert. Çа va?"), vec!["Café ouvert.", "Çа va?"]);
    }
}
