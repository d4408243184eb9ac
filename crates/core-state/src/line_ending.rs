//! Line ending detection and normalization.
//!
//! The session stores LF-only text. Files are normalized on open and the
//! dominant original style is re-applied on save.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Cr,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::Crlf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// LF-only content.
    pub normalized: String,
    /// Majority style (ties: CRLF > LF > CR). `Lf` when the input has no breaks.
    pub original: LineEnding,
    /// More than one style was present.
    pub mixed: bool,
}

pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let mut normalized = String::with_capacity(input.len());
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                crlf += 1;
                normalized.push('\n');
            }
            '\r' => {
                cr += 1;
                normalized.push('\n');
            }
            '\n' => {
                lf += 1;
                normalized.push('\n');
            }
            _ => normalized.push(ch),
        }
    }
    let mut original = LineEnding::Lf;
    let mut max = 0usize;
    for (style, count) in [
        (LineEnding::Crlf, crlf),
        (LineEnding::Lf, lf),
        (LineEnding::Cr, cr),
    ] {
        if count > max {
            max = count;
            original = style;
        }
    }
    let mixed = [crlf, lf, cr].iter().filter(|&&c| c > 0).count() > 1;
    NormalizedText {
        normalized,
        original,
        mixed,
    }
}

/// Re-expand LF-only text to `style`.
pub fn expand_line_endings(text: &str, style: LineEnding) -> String {
    match style {
        LineEnding::Lf => text.to_string(),
        other => text.replace('\n', other.as_str()),
    }
}
