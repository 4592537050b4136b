//! The parser.
//!
//! Parsing is table-driven: [`crate::tables`] holds the LALR automaton built
//! from the grammar in [`crate::grammar`], and the engine walks it over the
//! token stream, running one semantic action per reduction to build the AST
//! on a set of parallel value stacks. Syntax errors hand control to the
//! recovery controller, which salvages finished pieces, re-opens the
//! enclosing declarations, and resumes further down the file.
//!
//! Three goals share one grammar: a whole compilation unit, a statement
//! list, and a single expression. The goal is selected by a synthetic
//! marker token the engine replays before the first real token.

mod actions;
mod engine;
mod headers;
mod recovery;
mod stacks;

#[cfg(test)]
mod tests;

use text_size::{TextRange, TextSize};

use crate::ast::{Block, Body, CompilationUnit, Expr, Member, Stmt, TypeDecl};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::grammar::Edition;
use crate::lexer::{Comments, LexOutput, Token, TokenKind, lex};
use crate::tables::GrammarTables;
use crate::{Error, PassResult, tables};

use engine::{Engine, GoalValue, Outcome};
use recovery::{Controller, diagnose_wreck, salvage_stmts};

/// Knobs for a parse run.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Language edition to accept. Constructs from newer editions still
    /// parse, but are reported.
    pub edition: Edition,
    /// Skip method and constructor body interiors, leaving
    /// [`Body::Skipped`] spans for [`reparse_skipped_bodies`].
    pub diet: bool,
    /// Repair wrecked member bodies in place instead of discarding them.
    pub statement_recovery: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            edition: Edition::Latest,
            diet: false,
            statement_recovery: true,
        }
    }
}

/// Parse a compilation unit with default options.
pub fn parse(source: &str) -> PassResult<CompilationUnit> {
    parse_with(source, &ParseOptions::default())
}

/// Parse a compilation unit. Always produces a unit; syntax errors surface
/// as diagnostics and as `recovered` flags on the affected nodes.
pub fn parse_with(source: &str, options: &ParseOptions) -> PassResult<CompilationUnit> {
    let tables = tables::magpie()?;
    let lexed = lex(source);
    let mut diagnostics = garbage_diagnostics(&lexed);
    let (tokens, eof_at) = parse_stream(&lexed);
    let controller = Controller::new(source, tokens, &lexed.comments, tables, options, eof_at);
    let (unit, parse_diags) = controller.parse_unit()?;
    diagnostics.merge(parse_diags);
    Ok((unit, diagnostics))
}

/// Parse a single expression. `None` when the input is not an expression;
/// the diagnostics say why.
pub fn parse_expression(source: &str) -> PassResult<Option<Expr>> {
    let options = ParseOptions::default();
    let tables = tables::magpie()?;
    let lexed = lex(source);
    let mut diagnostics = garbage_diagnostics(&lexed);
    let (tokens, eof_at) = parse_stream(&lexed);
    let mut engine = one_shot(
        source,
        tokens,
        &lexed.comments,
        tables,
        &options,
        TokenKind::GoalExpr,
        eof_at,
    );
    let outcome = engine.run()?;
    diagnostics.merge(std::mem::take(&mut engine.diagnostics));
    match outcome {
        Outcome::Accepted(GoalValue::Expr(expr)) => Ok((Some(expr), diagnostics)),
        Outcome::Accepted(_) => Err(Error::Table(
            "expression goal produced a non-expression value".into(),
        )),
        Outcome::SyntaxError { state, token } => {
            diagnose_wreck(&mut diagnostics, tables, state, token);
            Ok((None, diagnostics))
        }
    }
}

/// Parse a statement list. On a syntax error the statements finished before
/// the error are returned.
pub fn parse_statements(source: &str) -> PassResult<Vec<Stmt>> {
    let options = ParseOptions::default();
    let tables = tables::magpie()?;
    let lexed = lex(source);
    let mut diagnostics = garbage_diagnostics(&lexed);
    let (tokens, eof_at) = parse_stream(&lexed);
    let mut engine = one_shot(
        source,
        tokens,
        &lexed.comments,
        tables,
        &options,
        TokenKind::GoalBlock,
        eof_at,
    );
    let outcome = engine.run()?;
    diagnostics.merge(std::mem::take(&mut engine.diagnostics));
    match outcome {
        Outcome::Accepted(GoalValue::Block(stmts)) => Ok((stmts, diagnostics)),
        Outcome::Accepted(_) => Err(Error::Table(
            "statement goal produced a non-block value".into(),
        )),
        Outcome::SyntaxError { state, token } => {
            diagnose_wreck(&mut diagnostics, tables, state, token);
            Ok((salvage_stmts(&mut engine), diagnostics))
        }
    }
}

/// Second pass after a diet parse: reparse every [`Body::Skipped`] span as
/// a statement list and splice the blocks into the unit.
pub fn reparse_skipped_bodies(
    source: &str,
    unit: &mut CompilationUnit,
    options: &ParseOptions,
) -> Result<Diagnostics, Error> {
    let tables = tables::magpie()?;
    let lexed = lex(source);
    let mut pass = BodyPass {
        source,
        lexed: &lexed,
        tables,
        options,
        diagnostics: Diagnostics::new(),
    };
    for decl in &mut unit.types {
        pass.visit_type(decl)?;
    }
    Ok(pass.diagnostics)
}

struct BodyPass<'a> {
    source: &'a str,
    lexed: &'a LexOutput,
    tables: &'static GrammarTables,
    options: &'a ParseOptions,
    diagnostics: Diagnostics,
}

impl BodyPass<'_> {
    fn visit_type(&mut self, decl: &mut TypeDecl) -> Result<(), Error> {
        for constant in &mut decl.enum_constants {
            if let Some(members) = &mut constant.body {
                for member in members {
                    self.visit_member(member)?;
                }
            }
        }
        for member in &mut decl.members {
            self.visit_member(member)?;
        }
        Ok(())
    }

    fn visit_member(&mut self, member: &mut Member) -> Result<(), Error> {
        match member {
            Member::Method(method) => self.visit_body(&mut method.body),
            Member::Constructor(ctor) => self.visit_body(&mut ctor.body),
            Member::Nested(decl) => self.visit_type(decl),
            Member::Field(_) | Member::Initializer { .. } | Member::Empty { .. } => Ok(()),
        }
    }

    fn visit_body(&mut self, body: &mut Body) -> Result<(), Error> {
        let Body::Skipped(range) = *body else {
            return Ok(());
        };
        *body = Body::Block(self.reparse(range)?);
        Ok(())
    }

    /// Reparse one skipped body. The recorded range covers the braces; the
    /// statement goal sees only the interior between them.
    fn reparse(&mut self, range: TextRange) -> Result<Block, Error> {
        let first = self
            .lexed
            .tokens
            .partition_point(|t| t.span.start() < range.start());
        let last = self
            .lexed
            .tokens
            .partition_point(|t| t.span.end() <= range.end());
        let window = &self.lexed.tokens[first..last];
        let (interior, close_at) = match window {
            [_, interior @ .., close] => (interior, close.span.start()),
            _ => (&[][..], range.end()),
        };
        let mut engine = one_shot(
            self.source,
            interior,
            &self.lexed.comments,
            self.tables,
            self.options,
            TokenKind::GoalBlock,
            close_at,
        );
        let outcome = engine.run()?;
        self.diagnostics
            .merge(std::mem::take(&mut engine.diagnostics));
        let (stmts, recovered) = match outcome {
            Outcome::Accepted(GoalValue::Block(stmts)) => (stmts, false),
            Outcome::Accepted(_) => {
                return Err(Error::Table(
                    "statement goal produced a non-block value".into(),
                ));
            }
            Outcome::SyntaxError { state, token } => {
                diagnose_wreck(&mut self.diagnostics, self.tables, state, token);
                (salvage_stmts(&mut engine), true)
            }
        };
        Ok(Block {
            stmts,
            contains_comment: self.lexed.comments.any_in(range),
            recovered,
            span: range,
        })
    }
}

/// One engine attempt with no journaling and no resume prefix.
fn one_shot<'a>(
    source: &'a str,
    tokens: &'a [Token],
    comments: &'a Comments,
    tables: &'static GrammarTables,
    options: &'a ParseOptions,
    goal: TokenKind,
    eof_at: TextSize,
) -> Engine<'a> {
    Engine::new(
        source,
        tokens,
        comments,
        tables,
        options,
        goal,
        Vec::new(),
        eof_at,
        false,
    )
}

/// Strip the trailing end-of-input token the lexer appends; the engine
/// synthesizes its own at `eof_at`.
fn parse_stream(lexed: &LexOutput) -> (&[Token], TextSize) {
    match lexed.tokens.split_last() {
        Some((eof, rest)) if eof.kind == TokenKind::Eof => (rest, eof.span.start()),
        _ => (&lexed.tokens, TextSize::from(0)),
    }
}

fn garbage_diagnostics(lexed: &LexOutput) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    for range in &lexed.garbage {
        diagnostics
            .report(DiagnosticKind::UnrecognizedCharacters, *range)
            .emit();
    }
    diagnostics
}
