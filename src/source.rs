use crate::token::Span;

/// Owns the input text and a precomputed vector of line start offsets.
///
/// All diagnostics carry byte spans into this buffer; the map turns them
/// back into 1-based line numbers and underlined code snippets.
pub struct SourceMap {
    text: String,
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        SourceMap { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based line number containing the given byte offset.
    pub fn line_number_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Byte range of the given 1-based line, excluding the line break.
    pub fn line_span(&self, line_number: usize) -> Span {
        let start = self.line_starts[line_number - 1];
        let mut end = self
            .line_starts
            .get(line_number)
            .copied()
            .unwrap_or(self.text.len());
        let bytes = self.text.as_bytes();
        while end > start && (bytes[end - 1] == b'\n' || bytes[end - 1] == b'\r') {
            end -= 1;
        }
        Span::new(start, end)
    }

    /// Slice of source covering all lines intersected by the span.
    pub fn lines_of(&self, span: Span) -> &str {
        let first = self.line_number_of(span.start);
        let last = self.line_number_of(span.end.saturating_sub(1).max(span.start));
        let start = self.line_span(first).start;
        let end = self.line_span(last).end;
        &self.text[start..end]
    }

    /// Iterator over the lines intersected by the span, each with enough
    /// information to render an underline row beneath it.
    pub fn underline(&self, span: Span) -> CodeUnderliner<'_> {
        let first = self.line_number_of(span.start);
        let last = self.line_number_of(span.end.saturating_sub(1).max(span.start));
        CodeUnderliner {
            map: self,
            span,
            next_line: first,
            last_line: last,
        }
    }
}

/// One source line intersected by an underlined span.
pub struct UnderlinedLine<'a> {
    pub line_number: usize,
    pub text: &'a str,
    /// Spaces to print before the `~` marks.
    pub spaces_before: usize,
    /// Number of `~` marks; always at least 1.
    pub underline_len: usize,
}

pub struct CodeUnderliner<'a> {
    map: &'a SourceMap,
    span: Span,
    next_line: usize,
    last_line: usize,
}

impl<'a> Iterator for CodeUnderliner<'a> {
    type Item = UnderlinedLine<'a>;

    fn next(&mut self) -> Option<UnderlinedLine<'a>> {
        if self.next_line > self.last_line {
            return None;
        }

        let line_number = self.next_line;
        self.next_line += 1;

        let line_span = self.map.line_span(line_number);
        let text = &self.map.text[line_span.start..line_span.end];
        let underline_start = self.span.start.clamp(line_span.start, line_span.end);
        let underline_end = self.span.end.clamp(line_span.start, line_span.end);
        let spaces_before = underline_start - line_span.start;
        let underline_len = (underline_end - underline_start).max(1);

        Some(UnderlinedLine {
            line_number,
            text,
            spaces_before,
            underline_len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_numbers_are_one_based() {
        let map = SourceMap::new("first\nsecond\nthird");
        assert_eq!(map.line_number_of(0), 1);
        assert_eq!(map.line_number_of(4), 1);
        assert_eq!(map.line_number_of(6), 2);
        assert_eq!(map.line_number_of(13), 3);
    }

    #[test]
    fn line_span_excludes_line_break() {
        let map = SourceMap::new("ab\ncdef\n");
        assert_eq!(map.line_span(1), Span::new(0, 2));
        assert_eq!(map.line_span(2), Span::new(3, 7));
    }

    #[test]
    fn underliner_marks_span_within_line() {
        let map = SourceMap::new("$color = BAD\n");
        let lines: Vec<_> = map.underline(Span::new(9, 12)).collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line_number, 1);
        assert_eq!(lines[0].text, "$color = BAD");
        assert_eq!(lines[0].spaces_before, 9);
        assert_eq!(lines[0].underline_len, 3);
    }

    #[test]
    fn underliner_spans_multiple_lines() {
        let map = SourceMap::new("Class \"Boots\" {\n\tShow\n}\n");
        let span = Span::new(0, 23);
        let lines: Vec<_> = map.underline(span).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].line_number, 1);
        assert_eq!(lines[2].text, "}");
    }

    #[test]
    fn underline_len_is_never_zero() {
        let map = SourceMap::new("x\n");
        let lines: Vec<_> = map.underline(Span::new(1, 1)).collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].underline_len, 1);
    }

    #[test]
    fn every_offset_maps_into_the_input() {
        let source = "a\nbb\nccc\n";
        let map = SourceMap::new(source);
        for offset in 0..source.len() {
            let line = map.line_number_of(offset);
            let span = map.line_span(line);
            assert!(span.start <= offset);
        }
    }

    #[test]
    fn lines_of_covers_whole_lines() {
        let map = SourceMap::new("SetFontSize 45\nShow\n");
        assert_eq!(map.lines_of(Span::new(12, 14)), "SetFontSize 45");
        assert_eq!(map.lines_of(Span::new(12, 19)), "SetFontSize 45\nShow");
    }
}
