//! LALR(1) parse tables.
//!
//! The tables are compiled from [`crate::grammar::rules`] on first use and
//! cached for the lifetime of the process. Rows are dense: every
//! (state, terminal) pair has an explicit entry, so the engine detects an
//! error at the exact token where the table says so, with no default
//! reductions masking the point of failure.
//!
//! ## Action encoding
//!
//! Each action cell is a single `i32`:
//!
//! | cell      | meaning            |
//! |-----------|--------------------|
//! | `0`       | error              |
//! | `1`       | accept             |
//! | `s + 2`   | shift to state `s` |
//! | `-(r + 1)`| reduce by rule `r` |
//!
//! Goto cells hold the target state or `-1`.

mod build;
pub mod binary;

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::grammar::{Action, Edition, NONTERM_COUNT, NonTerm};
use crate::lexer::{TERMINAL_COUNT, TERMINALS, TokenKind};

const CELL_ERROR: i32 = 0;
const CELL_ACCEPT: i32 = 1;

/// Decoded action cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseAction {
    Error,
    Accept,
    Shift(u16),
    Reduce(u16),
}

/// The complete automaton plus per-rule metadata for the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrammarTables {
    pub state_count: u16,
    /// `state_count * TERMINAL_COUNT` action cells, row per state.
    pub actions: Vec<i32>,
    /// `state_count * NONTERM_COUNT` goto cells, `-1` for none.
    pub gotos: Vec<i32>,
    pub rule_lhs: Vec<u16>,
    pub rule_len: Vec<u8>,
    pub rule_action: Vec<Action>,
    pub rule_edition: Vec<Edition>,
    /// `Lhs -> sym sym` renderings for table dumps and invariant errors.
    pub rule_names: Vec<String>,
    /// Shift/reduce conflicts resolved in favor of the shift.
    pub shift_reduce_resolved: u32,
    /// Reduce/reduce conflicts resolved in favor of the lower rule id.
    pub reduce_reduce_resolved: u32,
}

impl GrammarTables {
    #[inline]
    pub fn action(&self, state: u16, term: TokenKind) -> ParseAction {
        let cell = self.actions[state as usize * TERMINAL_COUNT + term.terminal_index()];
        match cell {
            CELL_ERROR => ParseAction::Error,
            CELL_ACCEPT => ParseAction::Accept,
            c if c >= 2 => ParseAction::Shift((c - 2) as u16),
            c => ParseAction::Reduce((-(c + 1)) as u16),
        }
    }

    #[inline]
    pub fn goto(&self, state: u16, nt: NonTerm) -> Option<u16> {
        self.goto_index(state, nt.index() as u16)
    }

    /// Goto lookup by raw nonterminal index, as stored in `rule_lhs`.
    #[inline]
    pub fn goto_index(&self, state: u16, nt: u16) -> Option<u16> {
        let cell = self.gotos[state as usize * NONTERM_COUNT + nt as usize];
        (cell >= 0).then_some(cell as u16)
    }

    pub fn rule_count(&self) -> usize {
        self.rule_len.len()
    }

    /// Terminals with a non-error action in `state`, as display names.
    /// Synthetic kinds never appear in user-facing expectation lists.
    pub fn expected_terminals(&self, state: u16) -> Vec<&'static str> {
        let row = &self.actions
            [state as usize * TERMINAL_COUNT..(state as usize + 1) * TERMINAL_COUNT];
        let mut names = Vec::new();
        for (idx, &cell) in row.iter().enumerate() {
            if cell == CELL_ERROR {
                continue;
            }
            let kind = TERMINALS[idx];
            if matches!(
                kind,
                TokenKind::GoalUnit | TokenKind::GoalBlock | TokenKind::GoalExpr
            ) {
                continue;
            }
            let name = kind.display_name();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

static TABLES: OnceLock<Result<GrammarTables, String>> = OnceLock::new();

/// The process-wide tables for the Magpie grammar. Built on first call;
/// construction failure is sticky and reported on every call.
pub fn magpie() -> Result<&'static GrammarTables, Error> {
    match TABLES.get_or_init(build::build) {
        Ok(tables) => Ok(tables),
        Err(message) => Err(Error::Table(message.clone())),
    }
}
