use crate::models::Span;

/// Titles and abbreviations whose trailing period never ends a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sen", "rep", "gov", "pres", "gen", "col", "lt", "sgt", "capt",
    "jr", "sr", "st", "vs", "etc", "inc", "corp", "ltd", "co", "fig", "vol", "ch", "pp", "approx",
    "dept", "est",
];

const CLOSERS: &[char] = &['"', '\'', ')', ']', '\u{201d}', '\u{2019}'];
const OPENERS: &[char] = &['"', '\'', '(', '[', '\u{201c}', '\u{2018}'];

/// A sentence located inside some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceSpan {
    pub text: String,
    /// Relative to the text that was split
    pub span: Span,
}

/// Split text into sentences with exact, trimmed offsets.
///
/// `.`, `!` or `?` (plus any run of terminal punctuation and closing quotes)
/// ends a sentence only when followed by whitespace and an uppercase letter,
/// quote or bracket, and the word before a `.` is not an abbreviation or an
/// initial. Text without any boundary comes back as one sentence.
pub fn split_sentences(text: &str) -> Vec<SentenceSpan> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }

        // consume the whole run: "?!", "...", closing quotes
        let mut end = idx + c.len_utf8();
        while let Some(&(next_idx, next)) = chars.peek() {
            if matches!(next, '.' | '!' | '?') || CLOSERS.contains(&next) {
                end = next_idx + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        if !followed_by_sentence_start(&text[end..]) {
            continue;
        }
        if c == '.' && end == idx + 1 && is_abbreviation(&text[start..idx]) {
            continue;
        }

        push_trimmed(&mut sentences, text, start, end);
        start = end;
    }

    push_trimmed(&mut sentences, text, start, text.len());
    sentences
}

fn followed_by_sentence_start(rest: &str) -> bool {
    let trimmed = rest.trim_start();
    if trimmed.len() == rest.len() {
        return false;
    }
    trimmed
        .chars()
        .next()
        .is_some_and(|c| c.is_uppercase() || OPENERS.contains(&c))
}

/// Whether the last word of `before` is an abbreviation, title or initial.
fn is_abbreviation(before: &str) -> bool {
    let token = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(OPENERS);

    if token.is_empty() {
        return false;
    }

    // "A." style initials
    let mut token_chars = token.chars();
    if let (Some(first), None) = (token_chars.next(), token_chars.next()) {
        return first.is_uppercase();
    }

    // "U.S", "e.g", "Ph.D"
    if token.contains('.') {
        return token
            .split('.')
            .all(|part| !part.is_empty() && part.chars().count() <= 2 && part.chars().all(char::is_alphabetic));
    }

    ABBREVIATIONS.contains(&token.to_lowercase().as_str())
}

fn push_trimmed(out: &mut Vec<SentenceSpan>, text: &str, start: usize, end: usize) {
    let raw = &text[start..end];
    let leading = raw.len() - raw.trim_start().len();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let s = start + leading;
    out.push(SentenceSpan {
        text: trimmed.to_string(),
        span: Span::new(s, s + trimmed.len()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        split_sentences(input).into_iter().map(|s| s.text).collect()
    }

    #[test]
    fn test_basic_split() {
        assert_eq!(
            texts("Taxes rose. Then they fell! Why? Nobody knows."),
            vec!["Taxes rose.", "Then they fell!", "Why?", "Nobody knows."]
        );
    }

    #[test]
    fn test_abbreviations_and_initials() {
        assert_eq!(
            texts("Mr. Smith met Dr. Jones in the U.S. Senate. J. R. Tolkien wrote it."),
            vec!["Mr. Smith met Dr. Jones in the U.S. Senate.", "J. R. Tolkien wrote it."]
        );
    }

    #[test]
    fn test_requires_uppercase_after() {
        assert_eq!(texts("it rose 3.5 percent. and then"), vec!["it rose 3.5 percent. and then"]);
    }

    #[test]
    fn test_no_boundary_is_one_sentence() {
        let input = "so there is also stochastic uncertainty in the universe";
        let sentences = split_sentences(input);
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].span, Span::new(0, input.len()));
    }

    #[test]
    fn test_quotes_and_punctuation_runs() {
        assert_eq!(
            texts("He said \"no.\" She left?! \"Fine.\""),
            vec!["He said \"no.\"", "She left?!", "\"Fine.\""]
        );
    }

    #[test]
    fn test_spans_cover_input() {
        let input = "  First one.   Second one?\n Third.  ";
        let sentences = split_sentences(input);
        assert_eq!(sentences.len(), 3);
        for s in &sentences {
            assert_eq!(&input[s.span.start..s.span.end], s.text);
        }
        for pair in sentences.windows(2) {
            assert!(pair[0].span.end <= pair[1].span.start);
            assert!(input[pair[0].span.end..pair[1].span.start].trim().is_empty());
        }
        assert!(input[..sentences[0].span.start].trim().is_empty());
        assert!(input[sentences[2].span.end..].trim().is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n ").is_empty());
    }
}
