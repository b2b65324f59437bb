//! Language profiles — the data that drives the scan engine.
//!
//! A profile names a file type, the filename suffixes it claims, its
//! comment markers, two keyword classes (reserved words and type names),
//! and flags enabling number/string highlighting. The built-in table
//! covers C and Go; adding a language is adding one entry to
//! [`PROFILES`] — no engine changes.

use bitflags::bitflags;

bitflags! {
    /// Which literal kinds the scan engine highlights for a profile.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HlFlags: u8 {
        /// Highlight numeric literals.
        const NUMBERS = 1 << 0;
        /// Highlight string literals.
        const STRINGS = 1 << 1;
    }
}

/// A language profile.
///
/// All fields are `'static` data: profiles live in the built-in table and
/// the editor holds at most a reference to one of them.
#[derive(Debug)]
pub struct Syntax {
    /// Short label shown in the status bar (`"c"`, `"go"`).
    pub file_type: &'static str,
    /// Filename suffixes (with the dot) this profile claims.
    pub file_match: &'static [&'static str],
    /// Reserved words, painted [`Keyword1`](crate::Highlight::Keyword1).
    pub keywords1: &'static [&'static str],
    /// Type names, painted [`Keyword2`](crate::Highlight::Keyword2).
    pub keywords2: &'static [&'static str],
    /// Single-line comment marker; empty when the language has none.
    pub single_line_comment_start: &'static str,
    /// Multi-line comment opener; empty together with the closer.
    pub multiline_comment_start: &'static str,
    /// Multi-line comment closer.
    pub multiline_comment_end: &'static str,
    /// Enabled literal highlighting.
    pub flags: HlFlags,
}

/// The built-in profile table.
pub static PROFILES: &[Syntax] = &[
    Syntax {
        file_type: "c",
        file_match: &[".c", ".h", ".cpp"],
        keywords1: &[
            "switch", "if", "while", "for", "break", "continue", "return", "else", "struct",
            "union", "typedef", "static", "enum", "class", "case",
        ],
        keywords2: &[
            "int", "long", "double", "float", "char", "unsigned", "signed", "void",
        ],
        single_line_comment_start: "//",
        multiline_comment_start: "/*",
        multiline_comment_end: "*/",
        flags: HlFlags::NUMBERS.union(HlFlags::STRINGS),
    },
    Syntax {
        file_type: "go",
        file_match: &[".go"],
        keywords1: &[
            "break",
            "default",
            "func",
            "interface",
            "select",
            "case",
            "defer",
            "go",
            "else",
            "goto",
            "package",
            "switch",
            "fallthrough",
            "if",
            "range",
            "continue",
            "for",
            "import",
            "return",
        ],
        keywords2: &[
            "type", "var", "chan", "bool", "map", "struct", "const", "int", "string", "rune",
            "byte", "float64", "float32", "int8", "int16", "int32", "int64",
        ],
        single_line_comment_start: "//",
        multiline_comment_start: "/*",
        multiline_comment_end: "*/",
        flags: HlFlags::NUMBERS.union(HlFlags::STRINGS),
    },
];

/// Select the profile claiming `filename`'s suffix (everything from the
/// last `.`, inclusive). `None` when the name has no dot or no profile
/// claims the suffix.
#[must_use]
pub fn select(filename: &str) -> Option<&'static Syntax> {
    let dot = filename.rfind('.')?;
    let ext = &filename[dot..];
    PROFILES
        .iter()
        .find(|syntax| syntax.file_match.contains(&ext))
}
