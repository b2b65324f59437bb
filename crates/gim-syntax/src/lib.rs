//! gim-syntax — syntax highlighting for gim.
//!
//! Three small pieces: the per-byte [`Highlight`] classes with their SGR
//! colour mapping, the static language [`profile`]s (C and Go built in),
//! and the single-pass [`scan`](scan::scan) engine with cross-line
//! comment state threaded through by the caller.

pub mod highlight;
pub mod profile;
pub mod scan;

pub use highlight::Highlight;
pub use profile::{HlFlags, Syntax, PROFILES};
