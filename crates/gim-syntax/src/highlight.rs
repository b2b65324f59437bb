//! Highlight classes — the per-byte tags attached to a row's render string.
//!
//! The scan engine assigns one class per render byte; the view layer maps
//! each class to an SGR foreground code at paint time. Colours are resolved
//! here, ahead of the hot rendering path.

/// Highlight class for one byte of a rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    /// Plain text, drawn in the terminal's default foreground.
    #[default]
    Normal,
    /// A numeric literal.
    Number,
    /// A string literal (including its quotes and escapes).
    String,
    /// A single-line comment, from its marker to end of row.
    Comment,
    /// A multi-line comment, possibly continued from a previous row.
    MultilineComment,
    /// A reserved word.
    Keyword1,
    /// A type name.
    Keyword2,
    /// The current find match (overlay; not produced by the scan engine).
    Match,
}

impl Highlight {
    /// The SGR foreground code for this class, or `None` for the default
    /// foreground (`ESC[39m`).
    #[must_use]
    pub const fn color(self) -> Option<u8> {
        match self {
            Self::Normal => None,
            Self::Number => Some(31),
            Self::Match => Some(34),
            Self::String => Some(35),
            Self::Comment | Self::MultilineComment => Some(36),
            Self::Keyword1 => Some(33),
            Self::Keyword2 => Some(32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_uses_default_foreground() {
        assert_eq!(Highlight::Normal.color(), None);
    }

    #[test]
    fn colour_mapping_is_the_fixed_table() {
        assert_eq!(Highlight::Number.color(), Some(31));
        assert_eq!(Highlight::Match.color(), Some(34));
        assert_eq!(Highlight::String.color(), Some(35));
        assert_eq!(Highlight::Comment.color(), Some(36));
        assert_eq!(Highlight::MultilineComment.color(), Some(36));
        assert_eq!(Highlight::Keyword1.color(), Some(33));
        assert_eq!(Highlight::Keyword2.color(), Some(32));
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(Highlight::default(), Highlight::Normal);
    }
}
