//! Assistant text → display block converter.
//!
//! A pure, total transform from raw assistant-authored text to an ordered
//! sequence of typed blocks the view can render. Works line by line as a
//! small state machine: plain, inside a list (pending items accumulate),
//! or inside a code region. Blocks are derived fresh on every render and
//! never persisted; only the raw content goes over the wire.

use std::mem;

/// A substring with or without emphasis (paired `**` delimiters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSpan {
    Plain(String),
    Emphasis(String),
}

/// One renderable unit of assistant output.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayBlock {
    /// Short line ending with `:`.
    Header(String),
    /// Consecutive bullet/numbered lines, one span sequence per item.
    List(Vec<Vec<InlineSpan>>),
    /// Verbatim line inside a `---` delimited region.
    CodeLine(String),
    /// Emitted when a code region closes.
    Divider,
    TextLine(Vec<InlineSpan>),
    /// Blank line between blocks.
    LineBreak,
}

/// Converts assistant text into display blocks.
///
/// Total over any input: empty or marker-less content falls back to a
/// single `TextLine` wrapping the raw string, never an empty sequence.
pub fn format(content: &str) -> Vec<DisplayBlock> {
    let mut builder = Builder::default();
    for line in content.lines() {
        builder.line(line);
    }
    builder.finish(content)
}

#[derive(Default)]
struct Builder {
    blocks: Vec<DisplayBlock>,
    /// In-progress list items; flushed when a non-list rule fires.
    pending_items: Vec<Vec<InlineSpan>>,
    in_code: bool,
}

impl Builder {
    /// Applies the per-line rules in precedence order; first match wins.
    fn line(&mut self, line: &str) {
        let trimmed = line.trim();

        // A run of three or more dashes toggles the code region. Only the
        // closing toggle emits a divider.
        if is_divider_run(trimmed) {
            self.flush_list();
            self.in_code = !self.in_code;
            if !self.in_code {
                self.blocks.push(DisplayBlock::Divider);
            }
            return;
        }

        // Inside a code region every line is verbatim, rules bypassed.
        if self.in_code {
            self.blocks.push(DisplayBlock::CodeLine(line.to_string()));
            return;
        }

        if trimmed.ends_with(':') && trimmed.chars().count() < 50 {
            self.flush_list();
            self.blocks.push(DisplayBlock::Header(trimmed.to_string()));
            return;
        }

        if let Some(item) = strip_list_marker(trimmed) {
            // Not flushed yet: items accumulate across consecutive lines.
            self.pending_items.push(scan_spans(item));
            return;
        }

        if !trimmed.is_empty() {
            self.flush_list();
            self.blocks.push(DisplayBlock::TextLine(scan_spans(trimmed)));
            return;
        }

        // Blank line: spacing only, and only after some block exists so
        // leading blanks produce nothing. The pending list survives.
        if !self.blocks.is_empty() {
            self.blocks.push(DisplayBlock::LineBreak);
        }
    }

    fn flush_list(&mut self) {
        if !self.pending_items.is_empty() {
            self.blocks
                .push(DisplayBlock::List(mem::take(&mut self.pending_items)));
        }
    }

    fn finish(mut self, raw: &str) -> Vec<DisplayBlock> {
        self.flush_list();
        if self.blocks.is_empty() {
            // Degenerate reply: render the raw content rather than nothing.
            return vec![DisplayBlock::TextLine(vec![InlineSpan::Plain(
                raw.to_string(),
            )])];
        }
        self.blocks
    }
}

/// True for lines that are exactly a run of three or more `-`.
fn is_divider_run(trimmed: &str) -> bool {
    trimmed.len() >= 3 && trimmed.bytes().all(|b| b == b'-')
}

/// Strips a bullet (`*`, `-`, `•`) or numeric (`1.`) marker followed by
/// whitespace, returning the item text. `None` if the line is not a list
/// item.
fn strip_list_marker(trimmed: &str) -> Option<&str> {
    if let Some(rest) = trimmed.strip_prefix(['*', '-', '•'])
        && rest.starts_with(char::is_whitespace)
    {
        return Some(rest.trim_start());
    }

    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits > 0
        && let Some(rest) = trimmed[digits..].strip_prefix('.')
        && rest.starts_with(char::is_whitespace)
    {
        return Some(rest.trim_start());
    }

    None
}

/// Splits a line on paired `**...**` delimiters. Delimited segments become
/// `Emphasis`, the rest `Plain`. An unpaired `**` has no closing partner
/// and stays plain text; empty segments are dropped.
fn scan_spans(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("**") else {
            break;
        };
        if start > 0 {
            spans.push(InlineSpan::Plain(rest[..start].to_string()));
        }
        if end > 0 {
            spans.push(InlineSpan::Emphasis(after[..end].to_string()));
        }
        rest = &after[end + 2..];
    }

    if !rest.is_empty() {
        spans.push(InlineSpan::Plain(rest.to_string()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> InlineSpan {
        InlineSpan::Plain(text.to_string())
    }

    fn emphasis(text: &str) -> InlineSpan {
        InlineSpan::Emphasis(text.to_string())
    }

    #[test]
    fn test_format_is_pure() {
        let content = "Routes:\n- **100** Central\n\nDone";
        assert_eq!(format(content), format(content));
    }

    #[test]
    fn test_header_bullets_text_round_trip() {
        let content = "Today's routes:\n- A to B\n- C to D\nSafe travels";
        assert_eq!(
            format(content),
            vec![
                DisplayBlock::Header("Today's routes:".to_string()),
                DisplayBlock::List(vec![vec![plain("A to B")], vec![plain("C to D")]]),
                DisplayBlock::TextLine(vec![plain("Safe travels")]),
            ]
        );
    }

    #[test]
    fn test_empty_input_never_yields_empty_output() {
        assert_eq!(
            format(""),
            vec![DisplayBlock::TextLine(vec![plain("")])]
        );
    }

    #[test]
    fn test_code_region_divider_on_close_only() {
        assert_eq!(
            format("---\nfoo\nbar\n---\n"),
            vec![
                DisplayBlock::CodeLine("foo".to_string()),
                DisplayBlock::CodeLine("bar".to_string()),
                DisplayBlock::Divider,
            ]
        );
    }

    #[test]
    fn test_code_region_lines_bypass_all_rules() {
        let blocks = format("----\nHeader-looking line:\n- not a bullet\n----");
        assert_eq!(
            blocks,
            vec![
                DisplayBlock::CodeLine("Header-looking line:".to_string()),
                DisplayBlock::CodeLine("- not a bullet".to_string()),
                DisplayBlock::Divider,
            ]
        );
    }

    #[test]
    fn test_unclosed_code_region_keeps_lines_verbatim() {
        assert_eq!(
            format("---\n  indented"),
            vec![DisplayBlock::CodeLine("  indented".to_string())]
        );
    }

    #[test]
    fn test_emphasis_spans() {
        assert_eq!(
            format("**Route** 100"),
            vec![DisplayBlock::TextLine(vec![
                emphasis("Route"),
                plain(" 100"),
            ])]
        );
    }

    #[test]
    fn test_multiple_emphasis_segments() {
        assert_eq!(
            format("**a** b **c**"),
            vec![DisplayBlock::TextLine(vec![
                emphasis("a"),
                plain(" b "),
                emphasis("c"),
            ])]
        );
    }

    #[test]
    fn test_unpaired_emphasis_stays_plain() {
        assert_eq!(
            format("fare is **unknown"),
            vec![DisplayBlock::TextLine(vec![plain("fare is **unknown")])]
        );
    }

    #[test]
    fn test_emphasis_inside_list_item() {
        assert_eq!(
            format("- **100** Central to Harbor"),
            vec![DisplayBlock::List(vec![vec![
                emphasis("100"),
                plain(" Central to Harbor"),
            ]])]
        );
    }

    #[test]
    fn test_numbered_and_bullet_markers() {
        let blocks = format("1. first\n2. second\n* starred\n• dotted");
        assert_eq!(
            blocks,
            vec![DisplayBlock::List(vec![
                vec![plain("first")],
                vec![plain("second")],
                vec![plain("starred")],
                vec![plain("dotted")],
            ])]
        );
    }

    #[test]
    fn test_marker_requires_trailing_whitespace() {
        // "-x" and "3.x" are ordinary text, not list items.
        assert_eq!(
            format("-x\n3.x"),
            vec![
                DisplayBlock::TextLine(vec![plain("-x")]),
                DisplayBlock::TextLine(vec![plain("3.x")]),
            ]
        );
    }

    #[test]
    fn test_list_survives_blank_line() {
        // A blank between items neither flushes the list nor adds a break
        // before any block has been emitted.
        assert_eq!(
            format("- a\n\n- b"),
            vec![DisplayBlock::List(vec![vec![plain("a")], vec![plain("b")]])]
        );
    }

    #[test]
    fn test_long_colon_line_is_not_header() {
        let long = format!("{}:", "x".repeat(60));
        assert_eq!(
            format(&long),
            vec![DisplayBlock::TextLine(vec![plain(&long)])]
        );
    }

    #[test]
    fn test_header_boundary_at_fifty_chars() {
        let at_limit = format!("{}:", "h".repeat(49)); // 50 chars incl. colon
        assert_eq!(
            format(&at_limit),
            vec![DisplayBlock::TextLine(vec![plain(&at_limit)])]
        );
        let under = format!("{}:", "h".repeat(48)); // 49 chars
        assert_eq!(
            format(&under),
            vec![DisplayBlock::Header(under.clone())]
        );
    }

    #[test]
    fn test_leading_blank_lines_produce_nothing() {
        assert_eq!(
            format("\n\nhello"),
            vec![DisplayBlock::TextLine(vec![plain("hello")])]
        );
    }

    #[test]
    fn test_blank_between_blocks_becomes_line_break() {
        assert_eq!(
            format("one\n\ntwo"),
            vec![
                DisplayBlock::TextLine(vec![plain("one")]),
                DisplayBlock::LineBreak,
                DisplayBlock::TextLine(vec![plain("two")]),
            ]
        );
    }

    #[test]
    fn test_list_flushed_at_end_of_input() {
        assert_eq!(
            format("- tail item"),
            vec![DisplayBlock::List(vec![vec![plain("tail item")]])]
        );
    }

    #[test]
    fn test_header_flushes_pending_list() {
        assert_eq!(
            format("- item\nNext section:"),
            vec![
                DisplayBlock::List(vec![vec![plain("item")]]),
                DisplayBlock::Header("Next section:".to_string()),
            ]
        );
    }

    #[test]
    fn test_two_dashes_is_plain_text() {
        assert_eq!(
            format("--"),
            vec![DisplayBlock::TextLine(vec![plain("--")])]
        );
    }
}
