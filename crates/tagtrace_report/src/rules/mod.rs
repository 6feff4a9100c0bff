//! Built-in report rules.
//!
//! `register_builtin_rules` adds all six rules to a `FindingEngine`.

mod c301;
mod e101;
mod e102;
mod v401;
mod w201;
mod w202;

pub use c301::NamingConvention;
pub use e101::BrokenReference;
pub use e102::CircularReference;
pub use v401::LowCoverage;
pub use w201::IncompleteChain;
pub use w202::OrphanedTag;

use crate::FindingEngine;

/// Registers the built-in rules: E101, E102, W201, W202, C301, V401.
pub fn register_builtin_rules(engine: &mut FindingEngine) {
    engine.register(Box::new(BrokenReference));
    engine.register(Box::new(CircularReference));
    engine.register(Box::new(IncompleteChain));
    engine.register(Box::new(OrphanedTag));
    engine.register(Box::new(NamingConvention));
    engine.register(Box::new(LowCoverage));
}
