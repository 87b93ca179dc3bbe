//! Lyrics markup parser. Verse texts in the catalog carry a tiny inline
//! notation: `R:/` flags a chorus line, a leading `N.` numbers a verse, and
//! the isolated words `(ter)` / `(bis)` tell the congregation to repeat. The
//! parser turns a raw verse into lines of tagged tokens so the renderer only
//! has to pick a style per tag.
//!
//! Parsing is total: every input string yields some structure, and joining
//! the token texts back together (see [`render_verse`]) reproduces the input
//! byte for byte.

/// Marker that opens a chorus (refrain) line.
pub const CHORUS_MARKER: &str = "R:/";

/// Whole-word markers asking for a line to be sung two or three times.
pub const REPETITION_MARKERS: [&str; 2] = ["(ter)", "(bis)"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Visual treatment a token asks for. Styling itself belongs to the renderer.
pub enum TokenKind {
    ChorusMarker,
    VerseNumberLabel,
    EmphasisWord,
    PlainText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn chorus_marker() -> Self {
        Self::new(TokenKind::ChorusMarker, CHORUS_MARKER)
    }

    pub fn verse_number(text: impl Into<String>) -> Self {
        Self::new(TokenKind::VerseNumberLabel, text)
    }

    pub fn emphasis(text: impl Into<String>) -> Self {
        Self::new(TokenKind::EmphasisWord, text)
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(TokenKind::PlainText, text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a whole line was classified. Exactly one kind applies per line.
pub enum LineKind {
    Chorus,
    Numbered,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub tokens: Vec<Token>,
}

impl Line {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Split a raw verse on `\n` and tokenize every line. Trailing empty lines are
/// kept so the renderer can reproduce the spacing of the source.
pub fn parse_verse(raw: &str) -> Vec<Line> {
    raw.split('\n').map(parse_line).collect()
}

/// Classify and tokenize a single line. The chorus marker is checked first,
/// then the numeric label, and anything else is a plain line.
pub fn parse_line(raw: &str) -> Line {
    let mut tokens = Vec::new();

    if let Some(idx) = raw.find(CHORUS_MARKER) {
        push_inline(&mut tokens, &raw[..idx]);
        tokens.push(Token::chorus_marker());
        push_inline(&mut tokens, &raw[idx + CHORUS_MARKER.len()..]);
        return Line {
            kind: LineKind::Chorus,
            tokens,
        };
    }

    if let Some(label_len) = verse_number_prefix(raw) {
        tokens.push(Token::verse_number(&raw[..label_len]));
        push_inline(&mut tokens, &raw[label_len..]);
        return Line {
            kind: LineKind::Numbered,
            tokens,
        };
    }

    push_inline(&mut tokens, raw);
    Line {
        kind: LineKind::Plain,
        tokens,
    }
}

/// Join the token texts of one line.
pub fn render_line(line: &Line) -> String {
    line.tokens.iter().map(|token| token.text.as_str()).collect()
}

/// Rejoin parsed lines with the newline they were split on.
pub fn render_verse(lines: &[Line]) -> String {
    lines.iter().map(render_line).collect::<Vec<_>>().join("\n")
}

/// Byte length of a leading `digits.` label, if the line starts with one.
fn verse_number_prefix(line: &str) -> Option<usize> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && line.as_bytes().get(digits) == Some(&b'.') {
        Some(digits + 1)
    } else {
        None
    }
}

/// Tokenize free text: isolated repetition markers become emphasis tokens,
/// everything between them (separators included) is merged into plain runs.
fn push_inline(tokens: &mut Vec<Token>, text: &str) {
    let mut plain_start = 0;
    for (start, end) in word_spans(text) {
        let word = &text[start..end];
        if !REPETITION_MARKERS.contains(&word) {
            continue;
        }
        if plain_start < start {
            tokens.push(Token::plain(&text[plain_start..start]));
        }
        tokens.push(Token::emphasis(word));
        plain_start = end;
    }
    if plain_start < text.len() {
        tokens.push(Token::plain(&text[plain_start..]));
    }
}

/// Byte ranges of the whitespace-separated words in `text`.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut word_start = None;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = word_start.take() {
                spans.push((start, idx));
            }
        } else if word_start.is_none() {
            word_start = Some(idx);
        }
    }
    if let Some(start) = word_start {
        spans.push((start, text.len()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chorus_and_numbered_verse() {
        let lines = parse_verse("R:/Hallelujah\n1.Praise the Lord (ter)");
        assert_eq!(lines.len(), 2);

        assert_eq!(lines[0].kind, LineKind::Chorus);
        assert_eq!(
            lines[0].tokens,
            vec![Token::chorus_marker(), Token::plain("Hallelujah")]
        );

        assert_eq!(lines[1].kind, LineKind::Numbered);
        assert_eq!(
            lines[1].tokens,
            vec![
                Token::verse_number("1."),
                Token::plain("Praise the Lord "),
                Token::emphasis("(ter)"),
            ]
        );
    }

    #[test]
    fn test_chorus_marker_removed_exactly() {
        let line = parse_line("R:/ Glory be");
        assert_eq!(line.tokens[0].text, "R:/");
        assert_eq!(line.tokens[1], Token::plain(" Glory be"));

        let bare = parse_line("R:/");
        assert_eq!(bare.tokens, vec![Token::chorus_marker()]);
    }

    #[test]
    fn test_chorus_marker_mid_line_keeps_prefix() {
        let line = parse_line("Sing R:/refrain");
        assert_eq!(line.kind, LineKind::Chorus);
        assert_eq!(
            line.tokens,
            vec![
                Token::plain("Sing "),
                Token::chorus_marker(),
                Token::plain("refrain"),
            ]
        );
    }

    #[test]
    fn test_chorus_takes_priority_over_number() {
        let line = parse_line("2.R:/Glory");
        assert_eq!(line.kind, LineKind::Chorus);
        assert_eq!(
            line.tokens,
            vec![
                Token::plain("2."),
                Token::chorus_marker(),
                Token::plain("Glory"),
            ]
        );
    }

    #[test]
    fn test_numbered_line_splits_on_first_period() {
        let line = parse_line("12.Grace. Mercy. Peace.");
        assert_eq!(line.kind, LineKind::Numbered);
        assert_eq!(
            line.tokens,
            vec![
                Token::verse_number("12."),
                Token::plain("Grace. Mercy. Peace."),
            ]
        );
    }

    #[test]
    fn test_not_numbered_without_leading_digits() {
        assert_eq!(parse_line("A.B").kind, LineKind::Plain);
        assert_eq!(parse_line(" 1.indented").kind, LineKind::Plain);
        assert_eq!(parse_line("12 no period").kind, LineKind::Plain);
        assert_eq!(parse_line(".5").kind, LineKind::Plain);
    }

    #[test]
    fn test_emphasis_requires_whole_word() {
        let line = parse_line("How (terrible) the (bis), (ter).");
        assert!(line
            .tokens
            .iter()
            .all(|token| token.kind == TokenKind::PlainText));

        let line = parse_line("(bis) Amen  (ter)");
        assert_eq!(
            line.tokens,
            vec![
                Token::emphasis("(bis)"),
                Token::plain(" Amen  "),
                Token::emphasis("(ter)"),
            ]
        );
    }

    #[test]
    fn test_empty_input_is_one_empty_line() {
        let lines = parse_verse("");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_empty());
        assert_eq!(lines[0].kind, LineKind::Plain);
    }

    #[test]
    fn test_trailing_empty_lines_are_kept() {
        let lines = parse_verse("Amen\n\n");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].is_empty());
        assert!(lines[2].is_empty());
    }

    #[test]
    fn test_round_trip() {
        let samples = [
            "",
            "\n",
            "R:/Hallelujah\n1.Praise the Lord (ter)",
            "1.\n2.x\n\n",
            "  leading and trailing  ",
            "tabs\there (bis)\t(ter)\r\nwindows line",
            "Sing R:/ twice R:/ here",
            "Ééé R:/ ünïcödé (bis) 漢字",
            "99999999999999999999999.overflow is fine",
            "(ter)(bis) (bis)(ter)",
        ];
        for sample in samples {
            let lines = parse_verse(sample);
            assert_eq!(render_verse(&lines), sample, "round trip of {sample:?}");
        }
    }
}
