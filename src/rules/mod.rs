//! Rule matching and ordering for tabshare.
//!
//! This module handles:
//! - Host pattern matching for the page and destination sides
//! - Selecting and ordering the applicable pre-processing rules
//! - Parsing sed-like substitution commands for the replace-text transform

pub mod matcher;
pub mod substitution;

pub use matcher::{CompiledRule, HostPattern, MatchContext, compile_rules, select_applicable};
pub use substitution::Substitution;
