//! The shift-reduce engine.
//!
//! One engine instance drives one parse attempt over a window of the token
//! stream. The recovery controller in [`super::recovery`] may run several
//! attempts against shrinking windows; each attempt gets a fresh engine with
//! a synthetic prefix that re-establishes parser context before the first
//! real token.
//!
//! The engine owns the state stack, a parallel span stack, and the semantic
//! value stacks. Every shift pushes the token's span; every reduce pops one
//! span per right-hand-side symbol, hands them to the semantic action, and
//! pushes the covering span back. Actions slice identifier and literal text
//! straight out of the source through those spans, so tokens never carry
//! text.

use text_size::{TextRange, TextSize};

use crate::Error;
use crate::ast::Ident;
use crate::ast::QualifiedName;
use crate::ast::{CompilationUnit, Expr, Stmt};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::grammar::NonTerm;
use crate::lexer::{Comments, Token, TokenKind};
use crate::tables::{GrammarTables, ParseAction};

use super::ParseOptions;
use super::recovery::{Journal, OpenElement, OpenHeader};
use super::stacks::{SpanStack, ValueStacks, cover, with_rule};

/// Reductions allowed between two shifts. The grammar's longest reduction
/// chains are far below this; exhausting it means the tables are cyclic.
const REDUCE_FUEL: u32 = 4096;

/// What a successful parse produced, depending on the goal marker.
#[derive(Debug)]
pub(crate) enum GoalValue {
    Unit(CompilationUnit),
    Block(Vec<Stmt>),
    Expr(Expr),
}

/// How an attempt ended. Syntax errors are data, not `Err`: the controller
/// decides what happens next. `Err` is reserved for engine invariants.
#[derive(Debug)]
pub(crate) enum Outcome {
    Accepted(GoalValue),
    SyntaxError { state: u16, token: Token },
}

pub(crate) struct Engine<'a> {
    source: &'a str,
    /// Token window for this attempt, without a trailing end-of-input token.
    tokens: &'a [Token],
    comments: &'a Comments,
    tables: &'static GrammarTables,
    options: &'a ParseOptions,
    pub diagnostics: Diagnostics,

    /// Synthetic tokens replayed before the window: the goal marker, plus
    /// declaration re-openers when resuming after a wreck.
    prefix: Vec<Token>,
    prefix_pos: usize,
    /// Next unconsumed index into `tokens`.
    pub pos: usize,
    eof_at: TextSize,

    states: Vec<u16>,
    spans: SpanStack,
    pub stacks: ValueStacks,
    scratch: Vec<TextRange>,

    brace_depth: u32,
    /// Header waiting for its body `{`; set by header actions, cleared by
    /// any other shift.
    pub open_armed: Option<OpenHeader>,
    diet_armed: bool,
    /// Interior range skipped by diet parsing, consumed by the body action.
    pub pending_skip: Option<TextRange>,

    pub journal: Journal,
    journaling: bool,

    pub result: Option<GoalValue>,
}

impl<'a> Engine<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: &'a str,
        tokens: &'a [Token],
        comments: &'a Comments,
        tables: &'static GrammarTables,
        options: &'a ParseOptions,
        goal: TokenKind,
        resume_prefix: Vec<Token>,
        eof_at: TextSize,
        journaling: bool,
    ) -> Self {
        let anchor = tokens.first().map_or(eof_at, |t| t.span.start());
        let mut prefix = Vec::with_capacity(1 + resume_prefix.len());
        prefix.push(Token::synthetic(goal, anchor));
        prefix.extend(resume_prefix);
        Self {
            source,
            tokens,
            comments,
            tables,
            options,
            diagnostics: Diagnostics::new(),
            prefix,
            prefix_pos: 0,
            pos: 0,
            eof_at,
            states: vec![0],
            spans: SpanStack::default(),
            stacks: ValueStacks::default(),
            scratch: Vec::new(),
            brace_depth: 0,
            open_armed: None,
            diet_armed: false,
            pending_skip: None,
            journal: Journal::default(),
            journaling,
            result: None,
        }
    }

    pub fn run(&mut self) -> Result<Outcome, Error> {
        let mut fuel = REDUCE_FUEL;
        loop {
            let token = self.lookahead();
            match self.tables.action(self.state(), token.kind) {
                ParseAction::Shift(next) => {
                    self.shift(token, next);
                    fuel = REDUCE_FUEL;
                }
                ParseAction::Reduce(rule) => {
                    if fuel == 0 {
                        return Err(Error::Stuck);
                    }
                    fuel -= 1;
                    self.reduce(rule)?;
                }
                ParseAction::Accept => {
                    let value = self.result.take().ok_or_else(|| {
                        Error::Table("accepted with no goal value".to_string())
                    })?;
                    return Ok(Outcome::Accepted(value));
                }
                ParseAction::Error => {
                    return Ok(Outcome::SyntaxError {
                        state: self.state(),
                        token,
                    });
                }
            }
        }
    }

    /// True when the attempt died while replaying its synthetic prefix,
    /// which means the resume context itself was unparsable.
    pub fn errored_in_prefix(&self) -> bool {
        self.prefix_pos < self.prefix.len()
    }

    pub fn brace_depth(&self) -> u32 {
        self.brace_depth
    }

    fn state(&self) -> u16 {
        self.states.last().copied().unwrap_or(0)
    }

    fn lookahead(&self) -> Token {
        if self.prefix_pos < self.prefix.len() {
            self.prefix[self.prefix_pos]
        } else {
            self.tokens
                .get(self.pos)
                .copied()
                .unwrap_or_else(|| Token::synthetic(TokenKind::Eof, self.eof_at))
        }
    }

    fn shift(&mut self, token: Token, next: u16) {
        if self.prefix_pos < self.prefix.len() {
            self.prefix_pos += 1;
        } else if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        self.states.push(next);
        self.spans.push(token.span);

        if token.kind == TokenKind::LBrace {
            self.brace_depth += 1;
            if let Some(header) = self.open_armed.take() {
                let member_body = matches!(header, OpenHeader::Member(_));
                if self.journaling {
                    self.journal.open.push(OpenElement {
                        header,
                        node_watermark: self.stacks.nodes.len(),
                        base_depth: self.brace_depth - 1,
                    });
                }
                if member_body && self.diet_armed {
                    self.pending_skip = self.skip_balanced(token.span);
                }
            }
        } else {
            if token.kind == TokenKind::RBrace {
                self.brace_depth = self.brace_depth.saturating_sub(1);
            }
            self.open_armed = None;
        }
        self.diet_armed = false;
    }

    /// Advance past a body interior without parsing it, leaving the closing
    /// `}` as the next lookahead. Returns the body span braces included, the
    /// same span the eager parse would give the block, or `None` when the
    /// braces never balance; the parser then runs into end of input and
    /// recovery deals with it.
    fn skip_balanced(&mut self, open: TextRange) -> Option<TextRange> {
        let mut depth = 1u32;
        let mut idx = self.pos;
        while idx < self.tokens.len() {
            match self.tokens[idx].kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos = idx;
                        return Some(TextRange::new(open.start(), self.tokens[idx].span.end()));
                    }
                }
                _ => {}
            }
            idx += 1;
        }
        None
    }

    fn reduce(&mut self, rule: u16) -> Result<(), Error> {
        let rule = rule as usize;
        let len = self.tables.rule_len[rule] as usize;
        if self.states.len() <= len {
            return Err(Error::StackUnderflow {
                stack: "states",
                rule: self.tables.rule_names[rule].clone(),
            });
        }
        self.states.truncate(self.states.len() - len);

        let mut rhs = std::mem::take(&mut self.scratch);
        let popped = self.spans.pop_into(len, &mut rhs);
        if let Err(error) = popped {
            self.scratch = rhs;
            return Err(with_rule(error, &self.tables.rule_names[rule]));
        }
        let anchor = TextRange::empty(self.lookahead().span.start());
        let span = cover(&rhs, anchor);

        let edition = self.tables.rule_edition[rule];
        if edition > self.options.edition {
            self.diagnostics
                .report(DiagnosticKind::ConstructUnavailable, span)
                .message(format!(
                    "this construct requires the {edition:?} edition"
                ))
                .emit();
        }

        let action = self.tables.rule_action[rule];
        let outcome = self.run_action(action, span, &rhs);
        self.scratch = rhs;
        outcome.map_err(|error| with_rule(error, &self.tables.rule_names[rule]))?;

        let lhs = self.tables.rule_lhs[rule];
        let next = self.tables.goto_index(self.state(), lhs).ok_or_else(|| {
            Error::Table(format!(
                "missing goto after {} in state {}",
                self.tables.rule_names[rule],
                self.state()
            ))
        })?;
        self.states.push(next);
        self.spans.push(span);

        if self.journaling {
            self.journal_after_reduce(lhs);
        }
        Ok(())
    }

    fn journal_after_reduce(&mut self, lhs: u16) {
        let lhs = lhs as usize;
        let closes_type = lhs == NonTerm::ClassDecl.index()
            || lhs == NonTerm::InterfaceDecl.index()
            || lhs == NonTerm::EnumDecl.index()
            || lhs == NonTerm::RecordDecl.index();
        let closes_member =
            lhs == NonTerm::MethodDecl.index() || lhs == NonTerm::ConstructorDecl.index();
        if closes_type {
            if matches!(
                self.journal.open.last(),
                Some(OpenElement {
                    header: OpenHeader::Type(_),
                    ..
                })
            ) {
                self.journal.open.pop();
            }
        } else if closes_member
            && matches!(
                self.journal.open.last(),
                Some(OpenElement {
                    header: OpenHeader::Member(_),
                    ..
                })
            )
        {
            self.journal.open.pop();
        }
    }

    // --- helpers shared with the semantic actions ---

    pub fn text(&self, span: TextRange) -> &'a str {
        &self.source[std::ops::Range::<usize>::from(span)]
    }

    pub fn ident(&self, span: TextRange) -> Ident {
        Ident {
            text: self.text(span).to_owned(),
            span,
        }
    }

    /// Close the identifier list accumulated by the `Name` rules.
    pub fn take_name(&mut self, span: TextRange) -> Result<QualifiedName, Error> {
        let parts = self.stacks.idents.take_list("idents")?;
        Ok(QualifiedName { parts, span })
    }

    /// Doc comment attached to a declaration starting at `start`.
    pub fn doc_for(&self, start: TextSize) -> Option<TextRange> {
        let idx = self.tokens.partition_point(|t| t.span.end() <= start);
        let prev_end = if idx == 0 {
            TextSize::from(0)
        } else {
            self.tokens[idx - 1].span.end()
        };
        self.comments.doc_before(start, prev_end)
    }

    pub fn comment_inside(&self, span: TextRange) -> bool {
        self.comments.any_in(span)
    }

    pub fn arm_type_open(&mut self, header: super::headers::TypeHeader) {
        self.open_armed = Some(OpenHeader::Type(header));
    }

    pub fn arm_member_open(&mut self, header: super::headers::CallableHeader) {
        self.open_armed = Some(OpenHeader::Member(header));
        if self.journaling && self.options.diet {
            self.diet_armed = true;
        }
    }
}
