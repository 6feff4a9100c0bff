//! Findings as user-facing diagnostics.
//!
//! Report rules turn graph findings into [`Diagnostic`]s: a [`Severity`], a
//! [`DiagnosticCode`] like `E101`, the tag's `file:line` and, when one is
//! known, a [`SuggestedFix`]. Rules push them into a shared
//! [`DiagnosticSink`]; [`TerminalRenderer`] prints them.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod location;
pub mod renderer;
pub mod severity;
pub mod sink;
pub mod suggested_fix;

pub use code::{Category, DiagnosticCode, InvalidCode};
pub use diagnostic::Diagnostic;
pub use location::Location;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
pub use suggested_fix::{Replacement, SuggestedFix};
