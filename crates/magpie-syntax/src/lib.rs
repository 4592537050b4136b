//! Magpie syntax: LALR front end for the Magpie language.
//!
//! # Example
//!
//! ```
//! use magpie_syntax::parse;
//!
//! let source = r#"
//!     class Greeter {
//!         void greet(String name) {
//!             log(name);
//!         }
//!     }
//! "#;
//!
//! let (unit, diagnostics) = parse(source).expect("parser invariant violated");
//! assert!(!unit.recovered);
//! assert!(diagnostics.is_empty());
//! ```
//!
//! Parsing is table-driven: the grammar is described as data, compiled into an
//! LALR(1) automaton once per process, and executed by a shift-reduce engine
//! that builds the AST through per-rule semantic actions. Syntax errors never
//! surface through the outer `Result`; they become [`Diagnostics`] entries and
//! a best-effort tree with `recovered` markers. The outer `Result` is reserved
//! for engine invariant violations, which indicate a bug in the grammar or the
//! action dispatcher rather than bad input.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod ast;
pub mod diagnostics;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod tables;

#[cfg(test)]
mod ast_tests;
#[cfg(test)]
mod lexer_tests;

/// Result type for passes that produce both output and diagnostics.
///
/// Each pass returns its typed output alongside any diagnostics it collected.
/// Internal invariant violations use the outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use grammar::Edition;
pub use parser::{
    ParseOptions, parse, parse_expression, parse_statements, parse_with, reparse_skipped_bodies,
};

/// Internal engine failures.
///
/// These are never caused by malformed source text. Each variant points at a
/// broken invariant between the grammar tables and the action dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A semantic action popped more values than its rule pushed.
    #[error("value stack underflow on the {stack} stack in rule `{rule}`")]
    StackUnderflow { stack: &'static str, rule: String },

    /// A semantic action found a value of the wrong variant on a stack.
    #[error("expected {expected} on the {stack} stack in rule `{rule}`")]
    WrongFragment {
        stack: &'static str,
        expected: &'static str,
        rule: String,
    },

    /// The automaton performed too many reductions without consuming input.
    #[error("parser made no progress (reduction limit exceeded)")]
    Stuck,

    /// The grammar tables failed their startup self-check.
    #[error("grammar table construction failed: {0}")]
    Table(String),
}
