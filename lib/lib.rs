#![allow(clippy::collapsible_if)]

/// Chess domain types.
pub mod chess;
/// Static position evaluation.
pub mod eval;
/// The contract between the search and a rules engine.
pub mod rules;
/// Minimax searching algorithm.
pub mod search;
/// UCI protocol.
pub mod uci;
/// Assorted utilities.
pub mod util;
