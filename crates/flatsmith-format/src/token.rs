//! Placeholder scanner.
//!
//! [`TokenScanner`] walks a template string left to right and yields every
//! unescaped `{tag}` / `{tag:format}` placeholder as a [`Token`]. The scanner
//! knows nothing about argument values; resolution lives in
//! [`crate::format`].

/// The four delimiter characters recognized by the scanner.
///
/// Behavior is undefined when two delimiters share the same character; the
/// scanner does not validate the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    /// Opens a placeholder.
    pub start: char,
    /// Closes a placeholder.
    pub end: char,
    /// Separates the tag from its format spec.
    pub mid: char,
    /// Marks the following start delimiter as literal text.
    pub escape: char,
}

impl Delimiters {
    pub const fn new(start: char, end: char, mid: char, escape: char) -> Self {
        Self {
            start,
            end,
            mid,
            escape,
        }
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new('{', '}', ':', '\\')
    }
}

/// A single placeholder located in the source string.
///
/// `tag` and `format_spec` borrow from the scanned input and never include
/// delimiter characters. The span covers the whole placeholder, both
/// delimiters included, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Raw text between the start and mid (or end) delimiters, untrimmed.
    pub tag: &'a str,
    /// Raw text after the first mid delimiter, if one was present.
    pub format_spec: Option<&'a str>,
    /// Byte offset of the start delimiter.
    pub start: usize,
    /// Byte length of the placeholder including both delimiters.
    pub len: usize,
}

impl<'a> Token<'a> {
    /// The placeholder exactly as it appears in `input`.
    pub fn source_text(&self, input: &'a str) -> &'a str {
        &input[self.start..self.start + self.len]
    }
}

/// Scans a string for placeholders.
#[derive(Debug, Clone)]
pub struct TokenScanner<'a> {
    input: &'a str,
    delimiters: Delimiters,
}

impl<'a> TokenScanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_delimiters(input, Delimiters::default())
    }

    pub fn with_delimiters(input: &'a str, delimiters: Delimiters) -> Self {
        Self { input, delimiters }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Start a fresh scan from the beginning of the input.
    pub fn tokens(&self) -> Tokens<'a> {
        Tokens {
            input: self.input,
            delimiters: self.delimiters,
            cursor: 0,
        }
    }
}

/// Lazy iterator over the placeholders of one scan pass, in order of start
/// position and non-overlapping.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: &'a str,
    delimiters: Delimiters,
    cursor: usize,
}

impl<'a> Tokens<'a> {
    fn find_from(&self, needle: char, from: usize) -> Option<usize> {
        self.input.get(from..)?.find(needle).map(|at| from + at)
    }

    /// Whether the character immediately before `index` is the escape
    /// delimiter.
    fn escaped(&self, index: usize) -> bool {
        self.input[..index].chars().next_back() == Some(self.delimiters.escape)
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            let start = self.find_from(self.delimiters.start, self.cursor)?;
            if self.escaped(start) {
                self.cursor = start + self.delimiters.start.len_utf8();
                continue;
            }

            let body_at = start + self.delimiters.start.len_utf8();
            // An unterminated placeholder ends the scan; the dangling tail
            // stays literal.
            let end = self.find_from(self.delimiters.end, body_at)?;
            // The next scan resumes at the end delimiter, not past it.
            self.cursor = end;

            let body = &self.input[body_at..end];
            let len = end + self.delimiters.end.len_utf8() - start;
            let (tag, format_spec) = match body.find(self.delimiters.mid) {
                Some(mid) => (
                    &body[..mid],
                    Some(&body[mid + self.delimiters.mid.len_utf8()..]),
                ),
                None => (body, None),
            };

            return Some(Token {
                tag,
                format_spec,
                start,
                len,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Vec<Token<'_>> {
        TokenScanner::new(input).tokens().collect()
    }

    #[test]
    fn finds_tokens_in_order() {
        let tokens = scan("a {one} b {two} c");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].tag, "one");
        assert_eq!(tokens[1].tag, "two");
        assert!(tokens[0].start < tokens[1].start);
    }

    #[test]
    fn span_covers_both_delimiters() {
        let input = "x{tag}y";
        let tokens = scan(input);
        assert_eq!(tokens[0].start, 1);
        assert_eq!(tokens[0].len, 5);
        assert_eq!(tokens[0].source_text(input), "{tag}");
    }

    #[test]
    fn splits_on_first_mid_delimiter() {
        let tokens = scan("{now:HH:mm}");
        assert_eq!(tokens[0].tag, "now");
        assert_eq!(tokens[0].format_spec, Some("HH:mm"));
    }

    #[test]
    fn no_mid_means_no_format_spec() {
        let tokens = scan("{now}");
        assert_eq!(tokens[0].tag, "now");
        assert_eq!(tokens[0].format_spec, None);
    }

    #[test]
    fn escaped_start_is_skipped() {
        let tokens = scan(r"\{nope} {yes}");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].tag, "yes");
    }

    #[test]
    fn escape_elsewhere_has_no_meaning() {
        let tokens = scan(r"back\slash {tag}");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].tag, "tag");
    }

    #[test]
    fn unterminated_token_ends_the_scan() {
        assert!(scan("{open and no close").is_empty());
        let tokens = scan("{done} then {open");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].tag, "done");
    }

    #[test]
    fn empty_body_is_a_valid_token() {
        let tokens = scan("{}");
        assert_eq!(tokens[0].tag, "");
        assert_eq!(tokens[0].format_spec, None);
    }

    #[test]
    fn tags_are_not_trimmed() {
        let tokens = scan("{ padded }");
        assert_eq!(tokens[0].tag, " padded ");
    }

    #[test]
    fn adjacent_tokens_are_both_found() {
        let tokens = scan("{a}{b}");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].tag, "a");
        assert_eq!(tokens[1].tag, "b");
    }

    #[test]
    fn custom_delimiters() {
        let delimiters = Delimiters::new('<', '>', '|', '!');
        let scanner = TokenScanner::with_delimiters("!<skip> <tag|fmt>", delimiters);
        let tokens: Vec<_> = scanner.tokens().collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].tag, "tag");
        assert_eq!(tokens[0].format_spec, Some("fmt"));
    }

    #[test]
    fn scan_is_restartable() {
        let scanner = TokenScanner::new("{a} {b}");
        assert_eq!(scanner.tokens().count(), 2);
        assert_eq!(scanner.tokens().count(), 2);
    }

    #[test]
    fn multibyte_text_around_tokens() {
        let input = "héllo {tag} wörld";
        let tokens = scan(input);
        assert_eq!(tokens[0].source_text(input), "{tag}");
    }
}
