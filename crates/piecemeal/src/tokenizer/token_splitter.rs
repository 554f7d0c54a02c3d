//! # Added-Token Splitting

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};

/// A span of input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSpan<'a> {
    /// Ordinary text, to be segmented by the model.
    Text(&'a str),

    /// A registered token, kept whole.
    Token(&'a str),
}

/// Splits text around a set of never-split tokens.
///
/// Whitespace adjacent to a matched token is dropped, and empty text
/// spans are skipped.
#[derive(Clone)]
pub struct TokenSplitter {
    matcher: Option<AhoCorasick>,
}

impl TokenSplitter {
    /// Build a splitter; longer tokens win over their prefixes.
    pub fn new<S: AsRef<str>>(tokens: &[S]) -> Self {
        let patterns: Vec<&str> = tokens
            .iter()
            .map(AsRef::as_ref)
            .filter(|t| !t.is_empty())
            .collect();
        let matcher = if patterns.is_empty() {
            None
        } else {
            AhoCorasickBuilder::new()
                .match_kind(MatchKind::LeftmostLongest)
                .build(&patterns)
                .map_err(|e| log::warn!("added-token matcher unavailable: {e}"))
                .ok()
        };
        Self { matcher }
    }

    /// Split text into spans.
    pub fn split<'a>(
        &self,
        text: &'a str,
    ) -> Vec<TextSpan<'a>> {
        let Some(matcher) = &self.matcher else {
            return if text.is_empty() {
                Vec::new()
            } else {
                vec![TextSpan::Text(text)]
            };
        };

        let mut spans = Vec::new();
        let mut last = 0;
        let push_text = |spans: &mut Vec<TextSpan<'a>>, segment: &'a str, after: bool, before: bool| {
            let mut segment = segment;
            if after {
                segment = segment.trim_start();
            }
            if before {
                segment = segment.trim_end();
            }
            if !segment.is_empty() {
                spans.push(TextSpan::Text(segment));
            }
        };

        for m in matcher.find_iter(text) {
            push_text(&mut spans, &text[last..m.start()], last > 0, true);
            spans.push(TextSpan::Token(&text[m.start()..m.end()]));
            last = m.end();
        }
        push_text(&mut spans, &text[last..], last > 0, false);
        spans
    }
}

impl std::fmt::Debug for TokenSplitter {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("TokenSplitter")
            .field("patterns", &self.matcher.as_ref().map_or(0, |m| m.patterns_len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tokens() {
        let splitter = TokenSplitter::new::<&str>(&[]);
        assert_eq!(splitter.split("a b"), vec![TextSpan::Text("a b")]);
        assert!(splitter.split("").is_empty());
    }

    #[test]
    fn test_split_strips_adjacent_whitespace() {
        let splitter = TokenSplitter::new(&["<pad>", "</s>"]);
        assert_eq!(
            splitter.split("hello <pad> world</s>"),
            vec![
                TextSpan::Text("hello"),
                TextSpan::Token("<pad>"),
                TextSpan::Text("world"),
                TextSpan::Token("</s>"),
            ]
        );
        assert_eq!(
            splitter.split("  <pad>  "),
            vec![TextSpan::Token("<pad>")]
        );
        // Leading whitespace not next to a token is kept.
        assert_eq!(
            splitter.split(" a <pad>"),
            vec![TextSpan::Text(" a"), TextSpan::Token("<pad>")]
        );
    }

    #[test]
    fn test_longest_match() {
        let splitter = TokenSplitter::new(&["<a>", "<a><b>"]);
        assert_eq!(
            splitter.split("x<a><b>y"),
            vec![
                TextSpan::Text("x"),
                TextSpan::Token("<a><b>"),
                TextSpan::Text("y"),
            ]
        );
    }
}
