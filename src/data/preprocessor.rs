// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Normalises one sentence before it becomes a Record.
//
// Line-oriented corpora (the Hindi polarity files, the SST-2
// TSV columns) often contain:
//   - A byte order mark (U+FEFF) at the start of the file
//   - Non-breaking spaces (U+00A0) and zero-width spaces (U+200B)
//   - Tabs and stray control characters
//   - Runs of spaces and trailing whitespace
//
// Cleaning steps (applied in order):
//   1. Map Unicode whitespace variants and control chars to space
//   2. Collapse runs of spaces into one
//   3. Trim both ends
//
// Zero-width joiners (U+200D) and non-joiners (U+200C) are left
// alone: Devanagari text uses them to select conjunct forms.

pub struct Preprocessor;

impl Preprocessor {
    /// Create a new Preprocessor instance
    pub fn new() -> Self {
        Self
    }

    /// Clean a single line of text. Returns an owned String,
    /// empty if nothing printable remains.
    pub fn clean(&self, text: &str) -> String {
        let mut out        = String::with_capacity(text.len());
        let mut last_space = true; // swallows leading spaces

        for c in text.chars() {
            let c = match c {
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_control() => ' ',
                c if c.is_whitespace() => ' ',
                c => c,
            };

            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        // At most one trailing space can be left behind
        if out.ends_with(' ') {
            out.pop();
        }
        out
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_multiple_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello   world"), "hello world");
    }

    #[test]
    fn test_trims_edges() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("  hello world  "), "hello world");
    }

    #[test]
    fn test_removes_control_chars_and_bom() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("\u{FEFF}hello\x01world\r"), "hello world");
    }

    #[test]
    fn test_keeps_devanagari_and_joiners() {
        let p = Preprocessor::new();
        let line = "फ़िल्म बहुत अच्छी थी\u{200D}";
        assert_eq!(p.clean(line), line);
    }

    #[test]
    fn test_blank_line_becomes_empty() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(" \t \u{00A0} "), "");
        assert_eq!(p.clean(""), "");
    }
}
