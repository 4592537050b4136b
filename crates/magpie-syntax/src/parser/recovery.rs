//! Error recovery.
//!
//! The engine stops at the first token its tables reject. Everything after
//! that is this module's job: salvage what the wrecked attempt already
//! built, decide where parsing can realistically resume, and stitch the
//! pieces into one compilation unit.
//!
//! Recovery leans on two structures the engine maintains while it runs.
//! The *journal* records every declaration whose header completed and whose
//! body `{` was shifted but not yet closed, innermost last, along with the
//! height of the value stack at that moment. Those watermarks let the
//! salvage pass attribute each finished fragment to the declaration it
//! belongs inside. The *spine* is the controller's own copy of the open
//! type declarations that survive across attempts: each resumed attempt
//! replays a synthetic prefix that re-opens the spine before the first real
//! token, so the engine parses the tail of the file in the right context.
//!
//! A member body that wrecks can instead be repaired in place: the already
//! reduced statements are kept, the rest of the body is reparsed as a
//! statement goal, and the member closes at its real `}`. That is
//! statement-level recovery, and it is the only path that does not shrink
//! the window to a declaration boundary.

use text_size::{TextRange, TextSize};

use crate::Error;
use crate::ast::{
    Block, Body, CompilationUnit, EnumConstant, ImportDecl, Member, ModuleDecl, PackageDecl, Stmt,
    TypeDecl, TypeDeclKind,
};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::lexer::{Comments, Token, TokenKind};
use crate::tables::GrammarTables;

use super::ParseOptions;
use super::engine::{Engine, GoalValue, Outcome};
use super::headers::{CallableHeader, TypeHeader};
use super::stacks::Fragment;

/// Declaration whose body `{` has been shifted but not closed.
#[derive(Debug, Clone)]
pub(crate) enum OpenHeader {
    Type(TypeHeader),
    Member(CallableHeader),
}

/// One journal entry. `node_watermark` is the height of the `nodes` value
/// stack when the body `{` was shifted; everything pushed above it belongs
/// inside this declaration. `base_depth` is the brace depth just outside
/// the body.
#[derive(Debug)]
pub(crate) struct OpenElement {
    pub header: OpenHeader,
    pub node_watermark: usize,
    pub base_depth: u32,
}

/// Recovery journal kept by the engine while a unit parse is running:
/// the stack of declarations whose `{` has been shifted but whose closing
/// reduce has not fired yet.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    pub open: Vec<OpenElement>,
}

/// Type declaration held open across attempts, with the members salvaged
/// for it so far.
struct SpineLevel {
    header: TypeHeader,
    members: Vec<Member>,
    constants: Vec<EnumConstant>,
    /// Brace depth of this level's `{` in journal coordinates. Spine levels
    /// always open first, so this equals the level's index.
    base_depth: u32,
}

/// Top-level fragments accumulated across attempts.
#[derive(Default)]
struct TopSalvage {
    package: Option<PackageDecl>,
    imports: Vec<ImportDecl>,
    types: Vec<TypeDecl>,
    module: Option<ModuleDecl>,
}

impl TopSalvage {
    fn absorb(&mut self, frag: Fragment) {
        match frag {
            Fragment::Package(decl) => self.package = self.package.take().or(Some(decl)),
            Fragment::Import(decl) => self.imports.push(decl),
            Fragment::Type(decl) => self.types.push(decl),
            Fragment::Module(decl) => self.module = self.module.take().or(Some(decl)),
            // Partial junk next to the wreck point.
            _ => {}
        }
    }
}

/// One journal level with the fragments salvaged from inside it.
struct WreckLevel {
    header: OpenHeader,
    base_depth: u32,
    members: Vec<Member>,
    constants: Vec<EnumConstant>,
    stmts: Vec<Stmt>,
}

/// Everything pulled out of a wrecked attempt.
struct Wreck {
    /// Fragments completed below every open declaration.
    top: Vec<Fragment>,
    levels: Vec<WreckLevel>,
    /// Token index of the rejected token, over the whole stream.
    at: usize,
    /// Source position of the rejected token.
    at_span: TextRange,
    /// Brace depth when the attempt stopped, in journal coordinates.
    depth: u32,
}

/// Where a resync scan decided to resume.
struct Resync {
    /// Stream token index of the first token of the next attempt.
    resume: usize,
    /// The scan consumed the `}` of the innermost open type level.
    closes_level: bool,
}

pub(crate) struct Controller<'a> {
    source: &'a str,
    tokens: &'a [Token],
    comments: &'a Comments,
    tables: &'static GrammarTables,
    options: &'a ParseOptions,
    eof_at: TextSize,
    diagnostics: Diagnostics,
}

impl<'a> Controller<'a> {
    pub fn new(
        source: &'a str,
        tokens: &'a [Token],
        comments: &'a Comments,
        tables: &'static GrammarTables,
        options: &'a ParseOptions,
        eof_at: TextSize,
    ) -> Self {
        Self {
            source,
            tokens,
            comments,
            tables,
            options,
            eof_at,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Parse a whole compilation unit, recovering as needed.
    pub fn parse_unit(mut self) -> Result<(CompilationUnit, Diagnostics), Error> {
        let mut window_start = 0usize;
        let mut spine: Vec<SpineLevel> = Vec::new();
        let mut top = TopSalvage::default();
        let mut recovered = false;

        loop {
            let window = &self.tokens[window_start..];
            let prefix = resume_prefix(&spine);
            let mut engine = Engine::new(
                self.source,
                window,
                self.comments,
                self.tables,
                self.options,
                TokenKind::GoalUnit,
                prefix,
                self.eof_at,
                true,
            );
            let outcome = engine.run()?;
            self.diagnostics.merge(std::mem::take(&mut engine.diagnostics));
            match outcome {
                Outcome::Accepted(GoalValue::Unit(unit)) => {
                    let unit = self.absorb_accept(spine, unit, top, recovered);
                    return Ok((unit, self.diagnostics));
                }
                Outcome::Accepted(_) => {
                    return Err(Error::Table("unit goal produced a non-unit value".into()));
                }
                Outcome::SyntaxError { state, token } => {
                    recovered = true;
                    if engine.errored_in_prefix() {
                        // The resume context itself failed to replay; there
                        // is nothing sensible left to attempt.
                        return Ok(self.halt(spine, top));
                    }
                    self.diagnose(state, token);
                    let mut wreck = self.salvage(&mut engine, window_start);
                    let resume = self.recover(&mut spine, &mut top, &mut wreck)?;
                    match resume {
                        Some(next) if next > window_start => window_start = next,
                        // No resync point, or no forward progress.
                        _ => return Ok(self.halt(spine, top)),
                    }
                }
            }
        }
    }

    // --- diagnostics ---

    fn diagnose(&mut self, state: u16, token: Token) {
        diagnose_wreck(&mut self.diagnostics, self.tables, state, token);
    }

    // --- salvage ---

    /// Pull finished fragments and journal state out of a wrecked engine.
    /// Fragments between consecutive watermarks belong to the inner open
    /// declaration; fragments below every watermark are top-level.
    fn salvage(&mut self, engine: &mut Engine<'_>, window_start: usize) -> Wreck {
        let journal = std::mem::take(&mut engine.journal);
        let values = engine.stacks.nodes.drain_values();
        let at = window_start + engine.pos;
        let at_span = self
            .tokens
            .get(at)
            .map_or(TextRange::empty(self.eof_at), |t| t.span);

        let mut levels: Vec<WreckLevel> = journal
            .open
            .iter()
            .map(|open| WreckLevel {
                header: open.header.clone(),
                base_depth: open.base_depth,
                members: Vec::new(),
                constants: Vec::new(),
                stmts: Vec::new(),
            })
            .collect();

        let mut top = Vec::new();
        for (idx, value) in values.into_iter().enumerate() {
            let owner = journal.open.partition_point(|open| open.node_watermark <= idx);
            if owner == 0 {
                // Headers of the open levels themselves live below every
                // watermark; the journal already captured them.
                if !matches!(value, Fragment::TypeHeader(_) | Fragment::Callable(_)) {
                    top.push(value);
                }
            } else {
                Self::absorb_into_level(&mut levels[owner - 1], value);
            }
        }

        Wreck {
            top,
            levels,
            at,
            at_span,
            depth: engine.brace_depth(),
        }
    }

    fn absorb_into_level(level: &mut WreckLevel, value: Fragment) {
        match value {
            Fragment::Member(member) => level.members.push(member),
            Fragment::Type(decl) => level.members.push(Member::Nested(decl)),
            Fragment::EnumConst(constant) => level.constants.push(constant),
            Fragment::Stmt(stmt) => level.stmts.push(stmt),
            // Anything else is an unfinished construct next to the wreck.
            _ => {}
        }
    }
}

impl<'a> Controller<'a> {
    // --- recovery proper ---

    /// Fold a wreck into the spine and find where to resume. `None` means
    /// recovery is out of options and the caller should halt.
    fn recover(
        &mut self,
        spine: &mut Vec<SpineLevel>,
        top: &mut TopSalvage,
        wreck: &mut Wreck,
    ) -> Result<Option<usize>, Error> {
        for frag in wreck.top.drain(..) {
            top.absorb(frag);
        }

        // Leading journal levels that re-opened existing spine levels.
        let matching = wreck
            .levels
            .iter()
            .take(spine.len())
            .take_while(|l| matches!(l.header, OpenHeader::Type(_)))
            .count();

        // Spine levels beyond the match closed for real during this
        // attempt; their finished declarations sit in the fresh salvage and
        // must pick up the members accumulated in earlier attempts.
        let closed_tail = spine.split_off(matching);
        if !closed_tail.is_empty() {
            if matching > 0 {
                self.merge_closed(&mut wreck.levels[matching - 1].members, closed_tail);
            } else {
                self.merge_closed_top(&mut top.types, closed_tail);
            }
        }

        for (level, wl) in spine.iter_mut().zip(wreck.levels.drain(..matching)) {
            level.members.extend(wl.members);
            level.constants.extend(wl.constants);
        }

        // Levels the wreck opened beyond the spine: types deepen the spine,
        // and everything from the first open member inward is repaired or
        // collapsed in place.
        let ext = std::mem::take(&mut wreck.levels);
        let first_member = ext
            .iter()
            .position(|l| matches!(l.header, OpenHeader::Member(_)));
        let mut iter = ext.into_iter();
        for level in iter.by_ref().take(first_member.unwrap_or(usize::MAX)) {
            if let OpenHeader::Type(header) = level.header {
                spine.push(SpineLevel {
                    header,
                    members: level.members,
                    constants: level.constants,
                    base_depth: level.base_depth,
                });
            }
        }
        let mut chain: Vec<WreckLevel> = iter.collect();

        if chain.len() == 1 && self.options.statement_recovery {
            let base = chain[0].base_depth;
            if let Some(rb) = self.find_close(wreck.at, wreck.depth, base) {
                let level = match chain.pop() {
                    Some(level) => level,
                    None => return Ok(None),
                };
                let member = self.repair_member_body(level, wreck, rb)?;
                attach_member(spine, member);
                return Ok(Some(rb + 1));
            }
        }
        if !chain.is_empty() {
            if let Some(member) = self.collapse_chain(chain, wreck.at_span.start()) {
                attach_member(spine, member);
            }
        }

        let target = spine.last().map_or(0, |l| l.base_depth + 1);
        match self.resync(wreck.at, wreck.depth, target) {
            None => Ok(None),
            Some(Resync {
                resume,
                closes_level,
            }) => {
                if closes_level {
                    let end = self.tokens[resume - 1].span.end();
                    if let Some(level) = spine.pop() {
                        let decl =
                            close_level(level.header, level.constants, level.members, end);
                        match spine.last_mut() {
                            Some(outer) => outer.members.push(Member::Nested(decl)),
                            None => top.types.push(decl),
                        }
                    }
                }
                Ok(Some(resume))
            }
        }
    }

    /// Scan forward for the next point the member or declaration list can
    /// continue: a `;` at list depth, a `}` ending the wrecked construct,
    /// or the `}` of the innermost open level itself.
    fn resync(&self, from: usize, depth: u32, target: u32) -> Option<Resync> {
        let mut cur = depth;
        let mut idx = from;
        while idx < self.tokens.len() {
            match self.tokens[idx].kind {
                TokenKind::Semi if cur == target => {
                    return Some(Resync {
                        resume: idx + 1,
                        closes_level: false,
                    });
                }
                TokenKind::LBrace => cur += 1,
                TokenKind::RBrace => {
                    if cur == target {
                        return Some(Resync {
                            resume: idx + 1,
                            closes_level: true,
                        });
                    }
                    cur = cur.saturating_sub(1);
                    if cur == target {
                        return Some(Resync {
                            resume: idx + 1,
                            closes_level: false,
                        });
                    }
                }
                _ => {}
            }
            idx += 1;
        }
        None
    }

    /// Index of the `}` that closes a body whose `{` sits at `base` depth,
    /// scanning from `from` at depth `depth`.
    fn find_close(&self, from: usize, depth: u32, base: u32) -> Option<usize> {
        let mut cur = depth;
        let mut idx = from;
        while idx < self.tokens.len() {
            match self.tokens[idx].kind {
                TokenKind::LBrace => cur += 1,
                TokenKind::RBrace => {
                    if cur == base + 1 {
                        return Some(idx);
                    }
                    cur = cur.saturating_sub(1);
                }
                _ => {}
            }
            idx += 1;
        }
        None
    }

    /// Statement-level recovery. The wrecked member keeps its already
    /// reduced statements, the remainder of its body is reparsed as a
    /// statement goal, and the member closes at its real `}` at `rb`.
    fn repair_member_body(
        &mut self,
        level: WreckLevel,
        wreck: &Wreck,
        rb: usize,
    ) -> Result<Member, Error> {
        let interior = level.base_depth + 1;
        let tail_start = self.skip_statement(wreck.at, wreck.depth, interior, rb);
        let tail = if tail_start < rb {
            self.subparse_block(tail_start, rb)?
        } else {
            Vec::new()
        };

        let dropped_end = if tail_start > wreck.at {
            self.tokens[tail_start - 1].span.end()
        } else {
            wreck.at_span.end()
        };
        let mut stmts = level.stmts;
        stmts.push(Stmt::Recovered {
            span: TextRange::new(wreck.at_span.start(), dropped_end),
        });
        stmts.extend(tail);
        let end = self.tokens[rb].span.end();
        let start = stmts
            .first()
            .map_or(wreck.at_span.start(), |s| s.span().start());
        let span = TextRange::new(start, end);
        let block = Block {
            stmts,
            contains_comment: self.comments.any_in(span),
            recovered: true,
            span,
        };
        let header = match level.header {
            OpenHeader::Member(header) => header,
            OpenHeader::Type(header) => {
                // Cannot happen; degrade to an empty shell.
                return Ok(Member::Nested(close_level(
                    header,
                    level.constants,
                    level.members,
                    end,
                )));
            }
        };
        Ok(build_member(header, Body::Block(block), end))
    }

    /// Skip the remains of the statement the wreck happened inside: past
    /// the next `;` at body depth, or past the `}` that closes a block the
    /// statement opened. Returns `rb` when nothing parsable is left.
    fn skip_statement(&self, from: usize, depth: u32, interior: u32, rb: usize) -> usize {
        let mut cur = depth;
        let mut idx = from;
        while idx < rb {
            match self.tokens[idx].kind {
                TokenKind::Semi if cur == interior => return idx + 1,
                TokenKind::LBrace => cur += 1,
                TokenKind::RBrace => {
                    cur = cur.saturating_sub(1);
                    if cur == interior {
                        return idx + 1;
                    }
                }
                _ => {}
            }
            idx += 1;
        }
        rb
    }

    /// Parse `tokens[from..to]` as a statement list. A wreck inside the
    /// tail is diagnosed and its finished statements kept.
    fn subparse_block(&mut self, from: usize, to: usize) -> Result<Vec<Stmt>, Error> {
        let window = &self.tokens[from..to];
        let eof_at = self.tokens[to].span.start();
        let mut engine = Engine::new(
            self.source,
            window,
            self.comments,
            self.tables,
            self.options,
            TokenKind::GoalBlock,
            Vec::new(),
            eof_at,
            false,
        );
        let outcome = engine.run()?;
        self.diagnostics.merge(std::mem::take(&mut engine.diagnostics));
        match outcome {
            Outcome::Accepted(GoalValue::Block(stmts)) => Ok(stmts),
            Outcome::Accepted(_) => {
                Err(Error::Table("statement goal produced a non-block value".into()))
            }
            Outcome::SyntaxError { state, token } => {
                self.diagnose(state, token);
                Ok(salvage_stmts(&mut engine))
            }
        }
    }

    /// Collapse an unmatchable run of open levels into a single recovered
    /// member, innermost first. Local types end up as statements of the
    /// member body they were declared in.
    fn collapse_chain(&self, chain: Vec<WreckLevel>, end: TextSize) -> Option<Member> {
        enum Inner {
            M(Member),
            T(TypeDecl),
        }
        let mut inner: Option<Inner> = None;
        for level in chain.into_iter().rev() {
            match level.header {
                OpenHeader::Type(header) => {
                    let mut members = level.members;
                    match inner.take() {
                        Some(Inner::M(m)) => members.push(m),
                        Some(Inner::T(t)) => members.push(Member::Nested(t)),
                        None => {}
                    }
                    inner = Some(Inner::T(close_level(
                        header,
                        level.constants,
                        members,
                        end,
                    )));
                }
                OpenHeader::Member(header) => {
                    let mut stmts = level.stmts;
                    if let Some(Inner::T(t)) = inner.take() {
                        stmts.push(Stmt::TypeDecl(Box::new(t)));
                    }
                    let span = TextRange::new(header.start, end);
                    let body = if stmts.is_empty() {
                        Body::Recovered(span)
                    } else {
                        Body::Block(Block {
                            stmts,
                            contains_comment: self.comments.any_in(span),
                            recovered: true,
                            span,
                        })
                    };
                    inner = Some(Inner::M(build_member(header, body, end)));
                }
            }
        }
        match inner {
            Some(Inner::M(member)) => Some(member),
            Some(Inner::T(decl)) => Some(Member::Nested(decl)),
            None => None,
        }
    }

    // --- merging closed spine levels back in ---

    /// The outermost closed level's declaration is somewhere in `container`
    /// under its own name; splice the accumulated earlier salvage into it,
    /// recursing for deeper closed levels.
    fn merge_closed(&self, container: &mut Vec<Member>, mut tail: Vec<SpineLevel>) {
        if tail.is_empty() {
            return;
        }
        let level = tail.remove(0);
        let pos = container.iter().position(
            |m| matches!(m, Member::Nested(d) if d.name.text == level.header.name.text),
        );
        match pos {
            Some(i) => match container.remove(i) {
                Member::Nested(found) => {
                    container.insert(i, Member::Nested(self.rebuild_closed(level, found, tail)));
                }
                other => container.insert(i, other),
            },
            None => {
                if let Some(decl) = fold_unclosed(once_with_tail(level, tail), None) {
                    container.push(Member::Nested(decl));
                }
            }
        }
    }

    fn merge_closed_top(&self, types: &mut Vec<TypeDecl>, mut tail: Vec<SpineLevel>) {
        if tail.is_empty() {
            return;
        }
        let level = tail.remove(0);
        let pos = types
            .iter()
            .position(|d| d.name.text == level.header.name.text);
        match pos {
            Some(i) => {
                let found = types.remove(i);
                types.insert(i, self.rebuild_closed(level, found, tail));
            }
            None => {
                if let Some(decl) = fold_unclosed(once_with_tail(level, tail), None) {
                    types.push(decl);
                }
            }
        }
    }

    fn rebuild_closed(
        &self,
        level: SpineLevel,
        found: TypeDecl,
        tail: Vec<SpineLevel>,
    ) -> TypeDecl {
        let mut inner_members = found.members;
        if !tail.is_empty() {
            self.merge_closed(&mut inner_members, tail);
        }
        let mut members = level.members;
        members.extend(inner_members);
        let mut constants = level.constants;
        constants.extend(found.enum_constants);
        close_level(level.header, constants, members, found.span.end())
    }

    // --- terminal outcomes ---

    /// Out of resync points. Close every spine level at end of input, one
    /// unclosed-brace diagnostic each, and return what was salvaged.
    fn halt(
        mut self,
        spine: Vec<SpineLevel>,
        mut top: TopSalvage,
    ) -> (CompilationUnit, Diagnostics) {
        for level in &spine {
            self.diagnostics
                .report(DiagnosticKind::UnclosedBrace, level.header.name.span)
                .detail(&level.header.name.text)
                .emit();
        }
        if let Some(decl) = fold_unclosed(spine, Some(self.eof_at)) {
            top.types.push(decl);
        }
        let unit = CompilationUnit {
            package: top.package,
            imports: top.imports,
            types: top.types,
            module: top.module,
            recovered: true,
            span: TextRange::new(TextSize::from(0), self.eof_at),
        };
        (unit, self.diagnostics)
    }

    /// The final attempt accepted. Its unit re-parsed the spine's levels
    /// from their synthetic re-openers, so those declarations are rebuilt
    /// from the real headers with all accumulated members in front.
    fn absorb_accept(
        &mut self,
        spine: Vec<SpineLevel>,
        unit: CompilationUnit,
        mut top: TopSalvage,
        recovered: bool,
    ) -> CompilationUnit {
        if spine.is_empty() && !recovered {
            return unit;
        }
        let mut unit_types = unit.types;
        if !spine.is_empty() {
            self.merge_closed_top(&mut unit_types, spine);
        }
        let mut types = top.types;
        types.extend(unit_types);
        let mut imports = top.imports;
        imports.extend(unit.imports);
        CompilationUnit {
            package: top.package.or(unit.package),
            imports,
            types,
            module: top.module.or(unit.module),
            recovered,
            span: TextRange::new(TextSize::from(0), self.eof_at),
        }
    }
}

/// Synthetic tokens that re-open the spine before the first real token of
/// a resumed window. The identifier keeps its original span so the header
/// action slices the real name back out of the source.
fn resume_prefix(spine: &[SpineLevel]) -> Vec<Token> {
    let mut prefix = Vec::with_capacity(spine.len() * 3);
    for level in spine {
        let name_span = level.header.name.span;
        let at = name_span.start();
        let kw = match level.header.kind {
            TypeDeclKind::Class => TokenKind::Class,
            TypeDeclKind::Interface => TokenKind::Interface,
            TypeDeclKind::Enum => TokenKind::Enum,
            TypeDeclKind::Record => TokenKind::Record,
        };
        prefix.push(Token::synthetic(kw, at));
        prefix.push(Token::new(TokenKind::Identifier, name_span));
        if level.header.kind == TypeDeclKind::Record {
            prefix.push(Token::synthetic(TokenKind::LParen, at));
            prefix.push(Token::synthetic(TokenKind::RParen, at));
        }
        prefix.push(Token::synthetic(TokenKind::LBrace, at));
    }
    prefix
}

fn attach_member(spine: &mut [SpineLevel], member: Member) {
    // A member with no enclosing type has nowhere to go and is dropped.
    if let Some(level) = spine.last_mut() {
        level.members.push(member);
    }
}

fn build_member(header: CallableHeader, body: Body, end: TextSize) -> Member {
    if header.return_type.is_some() {
        Member::Method(header.into_method(body, end))
    } else {
        Member::Constructor(header.into_constructor(body, end))
    }
}

fn close_level(
    header: TypeHeader,
    constants: Vec<EnumConstant>,
    members: Vec<Member>,
    end: TextSize,
) -> TypeDecl {
    let mut decl = header.into_decl(members, end, true);
    decl.enum_constants = constants;
    decl
}

/// Nest a run of unclosed spine levels into one declaration, innermost
/// first. `end` falls back to each header's own start when absent.
fn fold_unclosed(levels: Vec<SpineLevel>, end: Option<TextSize>) -> Option<TypeDecl> {
    let mut inner: Option<TypeDecl> = None;
    for level in levels.into_iter().rev() {
        let close_at = end.unwrap_or_else(|| level.header.name.span.end());
        let mut members = level.members;
        if let Some(decl) = inner.take() {
            members.push(Member::Nested(decl));
        }
        inner = Some(close_level(
            level.header,
            level.constants,
            members,
            close_at,
        ));
    }
    inner
}

fn once_with_tail(level: SpineLevel, tail: Vec<SpineLevel>) -> Vec<SpineLevel> {
    let mut levels = Vec::with_capacity(1 + tail.len());
    levels.push(level);
    levels.extend(tail);
    levels
}


/// Report the token the tables rejected, listing a few terminals the parse
/// state would have accepted.
pub(crate) fn diagnose_wreck(
    diagnostics: &mut Diagnostics,
    tables: &GrammarTables,
    state: u16,
    token: Token,
) {
    if token.kind == TokenKind::Eof {
        diagnostics
            .report(DiagnosticKind::UnexpectedEof, token.span)
            .emit();
        return;
    }
    let mut message = format!("unexpected {}", token.kind.display_name());
    let expected = tables.expected_terminals(state);
    if !expected.is_empty() {
        let shown = expected.iter().take(8).copied().collect::<Vec<_>>();
        message.push_str(", expected ");
        message.push_str(&shown.join(" or "));
        if expected.len() > 8 {
            message.push_str(" or ...");
        }
    }
    diagnostics
        .report(DiagnosticKind::UnexpectedToken, token.span)
        .message(message)
        .emit();
}

/// Finished statements left on a wrecked engine's value stack.
pub(crate) fn salvage_stmts(engine: &mut Engine<'_>) -> Vec<Stmt> {
    engine
        .stacks
        .nodes
        .drain_values()
        .into_iter()
        .filter_map(|frag| match frag {
            Fragment::Stmt(stmt) => Some(stmt),
            _ => None,
        })
        .collect()
}
