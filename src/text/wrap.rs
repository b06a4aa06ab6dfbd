//! Word-by-word line breaking.
//!
//! [`WordWrap`] is a restartable, lazy iterator over the line breaks of a
//! text run. The layout engine drives it twice per text node: once during
//! the hypothetical-size pass (bounded by the available width, to count
//! lines and find the widest) and once during placement (bounded by the
//! final target width, to produce the display lines).
//!
//! The finished line is cleared *lazily*, on the next [`next_elem`]
//! call — callers read the just-finished line through [`line`] after an
//! `EndOfLine`/`End` step before asking for more. The layout passes
//! depend on this.
//!
//! [`next_elem`]: WordWrap::next_elem
//! [`line`]: WordWrap::line

use crate::types::Length;

/// One step of the wrapping iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextElem {
    /// A word was appended to the current line.
    Word,
    /// The current line is complete; read it with [`WordWrap::line`].
    EndOfLine,
    /// No more input. The final line (possibly empty) is readable.
    /// Terminal: further calls keep returning `End`.
    End,
}

/// Restartable word-wrap iterator.
///
/// `measure` returns the rendered width of a candidate line; the wrapper
/// is agnostic to fonts and only compares widths against `max_width`.
pub struct WordWrap<'t, M> {
    rest: &'t str,
    line: String,
    need_reset: bool,
    measure: M,
    max_width: Length,
}

impl<'t, M> WordWrap<'t, M>
where
    M: FnMut(&str) -> Length,
{
    pub fn new(text: &'t str, max_width: Length, measure: M) -> Self {
        Self {
            rest: text,
            line: String::new(),
            need_reset: false,
            measure,
            max_width,
        }
    }

    /// The line accumulated so far, or the line just finished if the last
    /// step was `EndOfLine`/`End`.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Advance by one word or line break.
    pub fn next_elem(&mut self) -> TextElem {
        if self.need_reset {
            self.line.clear();
            self.need_reset = false;
        }

        // Skip whitespace up to the next word. A newline ends the current
        // line immediately, without consuming the word after it.
        let mut start = self.rest.len();
        for (i, c) in self.rest.char_indices() {
            if c == '\n' {
                self.rest = &self.rest[i + c.len_utf8()..];
                self.need_reset = true;
                return TextElem::EndOfLine;
            }
            if !c.is_whitespace() {
                start = i;
                break;
            }
        }
        if start == self.rest.len() {
            return TextElem::End;
        }

        let end = self.rest[start..]
            .find(char::is_whitespace)
            .map_or(self.rest.len(), |off| start + off);
        let word = &self.rest[start..end];

        let prev_len = self.line.len();
        if prev_len > 0 {
            self.line.push(' ');
        }
        self.line.push_str(word);

        // A first word is accepted even if it alone overflows; otherwise
        // the wrapper could never make progress on a too-narrow width.
        let width = (self.measure)(&self.line);
        if prev_len > 0 && width > self.max_width {
            self.line.truncate(prev_len);
            self.need_reset = true;
            return TextElem::EndOfLine;
        }

        self.rest = &self.rest[end..];
        TextElem::Word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Wrap with a width-per-char measure and collect the emitted lines.
    fn wrap_lines(text: &str, max_width: Length, advance: Length) -> Vec<String> {
        let mut ww = WordWrap::new(text, max_width, |line: &str| {
            line.chars().count() as Length * advance
        });
        let mut lines = Vec::new();
        loop {
            match ww.next_elem() {
                TextElem::Word => {}
                TextElem::EndOfLine => lines.push(ww.line().to_owned()),
                TextElem::End => {
                    lines.push(ww.line().to_owned());
                    break;
                }
            }
        }
        lines
    }

    #[test]
    fn three_words_single_line() {
        let mut ww = WordWrap::new("Foo bar, baz.", 0.0, |_: &str| 0.0);
        assert_eq!(ww.next_elem(), TextElem::Word);
        assert_eq!(ww.next_elem(), TextElem::Word);
        assert_eq!(ww.next_elem(), TextElem::Word);
        assert_eq!(ww.next_elem(), TextElem::End);
        assert_eq!(ww.line(), "Foo bar, baz.");
    }

    #[test]
    fn whitespace_runs_collapse() {
        let mut ww = WordWrap::new("   Foo bar,  baz.  ", 0.0, |_: &str| 0.0);
        for _ in 0..3 {
            assert_eq!(ww.next_elem(), TextElem::Word);
        }
        assert_eq!(ww.next_elem(), TextElem::End);
        assert_eq!(ww.line(), "Foo bar, baz.");
    }

    #[test]
    fn newline_characters_break_lines() {
        let mut ww = WordWrap::new("Foo bar,\nbaz. \n \nBang.", 0.0, |_: &str| 0.0);
        assert_eq!(ww.next_elem(), TextElem::Word);
        assert_eq!(ww.next_elem(), TextElem::Word);
        assert_eq!(ww.next_elem(), TextElem::EndOfLine);
        assert_eq!(ww.line(), "Foo bar,");
        assert_eq!(ww.next_elem(), TextElem::Word);
        assert_eq!(ww.next_elem(), TextElem::EndOfLine);
        assert_eq!(ww.line(), "baz.");
        assert_eq!(ww.next_elem(), TextElem::EndOfLine);
        assert_eq!(ww.line(), "");
        assert_eq!(ww.next_elem(), TextElem::Word);
        assert_eq!(ww.next_elem(), TextElem::End);
        assert_eq!(ww.line(), "Bang.");
    }

    #[test]
    fn overflow_starts_a_new_line() {
        // 10 units per char, max 100: "Hello, world" is 12 chars.
        assert_eq!(wrap_lines("Hello, world", 100.0, 10.0), ["Hello,", "world"]);
    }

    #[test]
    fn wide_enough_width_keeps_one_line() {
        assert_eq!(wrap_lines("Hello, world", 200.0, 10.0), ["Hello, world"]);
    }

    #[test]
    fn first_word_overflow_is_accepted() {
        // "incomprehensibilities" alone exceeds the width but must land
        // on its own line rather than loop forever.
        assert_eq!(
            wrap_lines("incomprehensibilities ok", 50.0, 10.0),
            ["incomprehensibilities", "ok"]
        );
    }

    #[test]
    fn end_is_terminal() {
        let mut ww = WordWrap::new("one", 0.0, |_: &str| 0.0);
        assert_eq!(ww.next_elem(), TextElem::Word);
        assert_eq!(ww.next_elem(), TextElem::End);
        assert_eq!(ww.next_elem(), TextElem::End);
    }

    #[test]
    fn rewrapping_is_deterministic() {
        let text = "the quick brown fox jumps over the lazy dog";
        let first = wrap_lines(text, 120.0, 10.0);
        for _ in 0..10 {
            assert_eq!(wrap_lines(text, 120.0, 10.0), first);
        }
    }
}
