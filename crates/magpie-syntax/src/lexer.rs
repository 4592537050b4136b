//! Lexer for Magpie source text.
//!
//! Produces span-based tokens without storing text - text is sliced from source only when needed.
//! Trivia (whitespace, comments) never reaches the parse stream: comments are collected into a
//! side table so doc comments can be attached to declarations and method bodies can be checked
//! for embedded comments.
//!
//! ## Error handling
//!
//! The lexer coalesces consecutive unrecognized characters into single `Garbage` spans rather
//! than producing one error per character. This keeps the diagnostic stream manageable for
//! malformed input.
//!
//! ## Disambiguation
//!
//! Three token shapes are ambiguous under one-token lookahead and get resolved here by bounded
//! scans over the already-lexed stream, before the parser runs:
//!
//! - `[` directly followed by `]` fuses into a single [`TokenKind::BracketPair`], separating
//!   array types (`int[] x`) from array accesses (`a[0]`)
//! - `<` after an identifier becomes [`TokenKind::LtGeneric`] when a forward scan finds a
//!   well-formed type-argument list, separating `List<String>` from `a < b`
//! - `(` becomes [`TokenKind::LParenLambda`] when its matching `)` is followed by `->`,
//!   separating `(a, b) -> e` from a parenthesized expression

use logos::Logos;
use std::ops::Range;
use text_size::{TextRange, TextSize};

/// Upper bound on tokens examined by a single disambiguation scan.
/// Beyond this the scan gives up and keeps the operator reading.
const PROBE_LIMIT: usize = 512;

/// All terminal kinds, including the synthetic goal markers the parser
/// prepends to select an entry production. `#[repr(u16)]` makes the
/// discriminant double as the terminal index in the parse tables.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum TokenKind {
    #[token("{")]
    LBrace = 0,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    /// `(` opening a lambda parameter list. Produced by disambiguation, never by Logos.
    LParenLambda,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    /// `[]` with nothing between the brackets. Produced by disambiguation.
    BracketPair,

    #[token(";")]
    Semi,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("...")]
    Ellipsis,

    #[token("@")]
    At,

    #[token(":")]
    Colon,

    #[token("?")]
    Question,

    #[token("->")]
    Arrow,

    #[token("=")]
    Assign,

    /// Compound assignment operators. The exact operator is recovered from the lexeme.
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    OpAssign,

    #[token("||")]
    OrOr,

    #[token("&&")]
    AndAnd,

    #[token("|")]
    Or,

    #[token("^")]
    Xor,

    #[token("&")]
    And,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("<")]
    Lt,

    /// `<` opening a type-argument or type-parameter list. Produced by disambiguation.
    LtGeneric,

    #[token(">")]
    Gt,

    #[token("<=")]
    Le,

    #[token(">=")]
    Ge,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("!")]
    Not,

    #[token("~")]
    Tilde,

    #[token("++")]
    PlusPlus,

    #[token("--")]
    MinusMinus,

    #[token("class")]
    Class,

    #[token("interface")]
    Interface,

    #[token("enum")]
    Enum,

    #[token("record")]
    Record,

    #[token("extends")]
    Extends,

    #[token("implements")]
    Implements,

    #[token("throws")]
    Throws,

    #[token("package")]
    Package,

    #[token("import")]
    Import,

    #[token("module")]
    Module,

    #[token("requires")]
    Requires,

    #[token("exports")]
    Exports,

    #[token("opens")]
    Opens,

    #[token("uses")]
    Uses,

    #[token("provides")]
    Provides,

    #[token("to")]
    To,

    #[token("with")]
    With,

    #[token("transitive")]
    Transitive,

    /// Modifier keywords that carry no grammar significance beyond the bit they set.
    /// `static` and `default` are separate because they also appear in
    /// `import static` and switch labels.
    #[token("public")]
    #[token("protected")]
    #[token("private")]
    #[token("abstract")]
    #[token("final")]
    #[token("native")]
    #[token("transient")]
    #[token("volatile")]
    ModifierKw,

    #[token("static")]
    Static,

    #[token("default")]
    Default,

    /// Primitive type keywords. The exact type is recovered from the lexeme.
    #[token("boolean")]
    #[token("byte")]
    #[token("short")]
    #[token("int")]
    #[token("long")]
    #[token("char")]
    #[token("float")]
    #[token("double")]
    PrimKw,

    #[token("void")]
    Void,

    #[token("var")]
    Var,

    #[token("if")]
    If,

    #[token("else")]
    Else,

    #[token("while")]
    While,

    #[token("do")]
    Do,

    #[token("for")]
    For,

    #[token("switch")]
    Switch,

    #[token("case")]
    Case,

    #[token("break")]
    Break,

    #[token("continue")]
    Continue,

    #[token("return")]
    Return,

    #[token("throw")]
    Throw,

    #[token("try")]
    Try,

    #[token("catch")]
    Catch,

    #[token("finally")]
    Finally,

    #[token("new")]
    New,

    #[token("this")]
    This,

    #[token("super")]
    Super,

    #[token("instanceof")]
    Instanceof,

    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*[lL]?")]
    #[regex(r"[0-9][0-9_]*[lL]?")]
    IntLit,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[fFdD]")]
    FloatLit,

    #[regex(r"'(?:[^'\\\n]|\\.)'")]
    CharLit,

    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    StringLit,

    #[token("true")]
    #[token("false")]
    BoolLit,

    #[token("null")]
    NullLit,

    /// Defined after keywords so they take precedence.
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Identifier,

    /// Synthetic first token selecting the compilation-unit entry production.
    GoalUnit,
    /// Synthetic first token selecting the statement-list entry production.
    GoalBlock,
    /// Synthetic first token selecting the expression entry production.
    GoalExpr,

    /// End of input. Always the last token of a parse stream.
    Eof,

    // --- Trivia: stripped before parsing ---
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*+[^*/])*\*+/")]
    BlockComment,

    /// `/** ... */`. Higher priority than `BlockComment`, which also matches.
    #[regex(r"/\*\*(?:[^*]|\*+[^*/])*\*+/", priority = 12)]
    DocComment,

    /// Coalesced unrecognized characters.
    Garbage,
}

/// Number of terminal indexes the parse tables must cover.
/// Trivia kinds sit above `Eof` and never reach the parser.
pub const TERMINAL_COUNT: usize = TokenKind::Eof as usize + 1;

/// Every parse-stream terminal, in declaration order. `TERMINALS[k]` is the
/// kind whose `terminal_index()` is `k`; a unit test checks the alignment.
#[rustfmt::skip]
pub const TERMINALS: [TokenKind; TERMINAL_COUNT] = [
    TokenKind::LBrace, TokenKind::RBrace, TokenKind::LParen, TokenKind::LParenLambda,
    TokenKind::RParen, TokenKind::LBracket, TokenKind::RBracket, TokenKind::BracketPair,
    TokenKind::Semi, TokenKind::Comma, TokenKind::Dot, TokenKind::Ellipsis,
    TokenKind::At, TokenKind::Colon, TokenKind::Question, TokenKind::Arrow,
    TokenKind::Assign, TokenKind::OpAssign, TokenKind::OrOr, TokenKind::AndAnd,
    TokenKind::Or, TokenKind::Xor, TokenKind::And, TokenKind::EqEq,
    TokenKind::NotEq, TokenKind::Lt, TokenKind::LtGeneric, TokenKind::Gt,
    TokenKind::Le, TokenKind::Ge, TokenKind::Plus, TokenKind::Minus,
    TokenKind::Star, TokenKind::Slash, TokenKind::Percent, TokenKind::Not,
    TokenKind::Tilde, TokenKind::PlusPlus, TokenKind::MinusMinus, TokenKind::Class,
    TokenKind::Interface, TokenKind::Enum, TokenKind::Record, TokenKind::Extends,
    TokenKind::Implements, TokenKind::Throws, TokenKind::Package, TokenKind::Import,
    TokenKind::Module, TokenKind::Requires, TokenKind::Exports, TokenKind::Opens,
    TokenKind::Uses, TokenKind::Provides, TokenKind::To, TokenKind::With,
    TokenKind::Transitive, TokenKind::ModifierKw, TokenKind::Static, TokenKind::Default,
    TokenKind::PrimKw, TokenKind::Void, TokenKind::Var, TokenKind::If,
    TokenKind::Else, TokenKind::While, TokenKind::Do, TokenKind::For,
    TokenKind::Switch, TokenKind::Case, TokenKind::Break, TokenKind::Continue,
    TokenKind::Return, TokenKind::Throw, TokenKind::Try, TokenKind::Catch,
    TokenKind::Finally, TokenKind::New, TokenKind::This, TokenKind::Super,
    TokenKind::Instanceof, TokenKind::IntLit, TokenKind::FloatLit, TokenKind::CharLit,
    TokenKind::StringLit, TokenKind::BoolLit, TokenKind::NullLit, TokenKind::Identifier,
    TokenKind::GoalUnit, TokenKind::GoalBlock, TokenKind::GoalExpr, TokenKind::Eof,
];

impl TokenKind {
    #[inline]
    pub fn terminal_index(self) -> usize {
        debug_assert!((self as usize) < TERMINAL_COUNT);
        self as usize
    }

    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace
                | Self::LineComment
                | Self::BlockComment
                | Self::DocComment
                | Self::Garbage
        )
    }

    /// Human-readable name used in "expected one of ..." diagnostics.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::LBrace => "`{`",
            Self::RBrace => "`}`",
            Self::LParen | Self::LParenLambda => "`(`",
            Self::RParen => "`)`",
            Self::LBracket => "`[`",
            Self::RBracket => "`]`",
            Self::BracketPair => "`[]`",
            Self::Semi => "`;`",
            Self::Comma => "`,`",
            Self::Dot => "`.`",
            Self::Ellipsis => "`...`",
            Self::At => "`@`",
            Self::Colon => "`:`",
            Self::Question => "`?`",
            Self::Arrow => "`->`",
            Self::Assign => "`=`",
            Self::OpAssign => "a compound assignment operator",
            Self::OrOr => "`||`",
            Self::AndAnd => "`&&`",
            Self::Or => "`|`",
            Self::Xor => "`^`",
            Self::And => "`&`",
            Self::EqEq => "`==`",
            Self::NotEq => "`!=`",
            Self::Lt | Self::LtGeneric => "`<`",
            Self::Gt => "`>`",
            Self::Le => "`<=`",
            Self::Ge => "`>=`",
            Self::Plus => "`+`",
            Self::Minus => "`-`",
            Self::Star => "`*`",
            Self::Slash => "`/`",
            Self::Percent => "`%`",
            Self::Not => "`!`",
            Self::Tilde => "`~`",
            Self::PlusPlus => "`++`",
            Self::MinusMinus => "`--`",
            Self::Class => "`class`",
            Self::Interface => "`interface`",
            Self::Enum => "`enum`",
            Self::Record => "`record`",
            Self::Extends => "`extends`",
            Self::Implements => "`implements`",
            Self::Throws => "`throws`",
            Self::Package => "`package`",
            Self::Import => "`import`",
            Self::Module => "`module`",
            Self::Requires => "`requires`",
            Self::Exports => "`exports`",
            Self::Opens => "`opens`",
            Self::Uses => "`uses`",
            Self::Provides => "`provides`",
            Self::To => "`to`",
            Self::With => "`with`",
            Self::Transitive => "`transitive`",
            Self::ModifierKw => "a modifier",
            Self::Static => "`static`",
            Self::Default => "`default`",
            Self::PrimKw => "a primitive type",
            Self::Void => "`void`",
            Self::Var => "`var`",
            Self::If => "`if`",
            Self::Else => "`else`",
            Self::While => "`while`",
            Self::Do => "`do`",
            Self::For => "`for`",
            Self::Switch => "`switch`",
            Self::Case => "`case`",
            Self::Break => "`break`",
            Self::Continue => "`continue`",
            Self::Return => "`return`",
            Self::Throw => "`throw`",
            Self::Try => "`try`",
            Self::Catch => "`catch`",
            Self::Finally => "`finally`",
            Self::New => "`new`",
            Self::This => "`this`",
            Self::Super => "`super`",
            Self::Instanceof => "`instanceof`",
            Self::IntLit => "an integer literal",
            Self::FloatLit => "a floating-point literal",
            Self::CharLit => "a character literal",
            Self::StringLit => "a string literal",
            Self::BoolLit => "`true` or `false`",
            Self::NullLit => "`null`",
            Self::Identifier => "an identifier",
            Self::GoalUnit | Self::GoalBlock | Self::GoalExpr => "<goal>",
            Self::Eof => "end of input",
            Self::Whitespace
            | Self::LineComment
            | Self::BlockComment
            | Self::DocComment
            | Self::Garbage => "<trivia>",
        }
    }
}

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: TextRange) -> Self {
        Self { kind, span }
    }

    /// Zero-width token, used for synthetic goal markers and recovery prefixes.
    #[inline]
    pub fn synthetic(kind: TokenKind, at: TextSize) -> Self {
        Self::new(kind, TextRange::empty(at))
    }
}

/// A comment span recorded during lexing. Doc comments (`/** ... */`) are
/// eligible for attachment to the declaration that follows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
    pub span: TextRange,
    pub doc: bool,
}

/// Side table of all comments in source order.
#[derive(Debug, Clone, Default)]
pub struct Comments {
    entries: Vec<Comment>,
}

impl Comments {
    pub fn entries(&self) -> &[Comment] {
        &self.entries
    }

    /// True when any comment overlaps `range`. Used to flag method bodies
    /// that look empty but carry commentary.
    pub fn any_in(&self, range: TextRange) -> bool {
        let start = self
            .entries
            .partition_point(|c| c.span.end() <= range.start());
        self.entries[start..]
            .iter()
            .take_while(|c| c.span.start() < range.end())
            .next()
            .is_some()
    }

    /// The doc comment immediately preceding `decl_start`, if the gap between
    /// them contains no other token. `prev_token_end` is the end offset of the
    /// last parse token before the declaration (zero at file start).
    pub fn doc_before(&self, decl_start: TextSize, prev_token_end: TextSize) -> Option<TextRange> {
        let before = self.entries.partition_point(|c| c.span.end() <= decl_start);
        let candidate = self.entries[..before].last()?;
        if candidate.doc && candidate.span.start() >= prev_token_end {
            Some(candidate.span)
        } else {
            None
        }
    }
}

/// Everything the lexer produces for one source text.
#[derive(Debug, Clone, Default)]
pub struct LexOutput {
    /// Parse stream: trivia stripped, disambiguation applied, terminated by `Eof`.
    pub tokens: Vec<Token>,
    pub comments: Comments,
    /// Coalesced spans of unrecognized characters, reported as diagnostics by the parser.
    pub garbage: Vec<TextRange>,
}

fn range_to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Tokenizes source into a parse stream plus comment and garbage side tables.
pub fn lex(source: &str) -> LexOutput {
    let mut out = LexOutput::default();
    let mut lexer = TokenKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        let next = lexer.next();
        if let Some(Err(())) = next {
            if error_start.is_none() {
                error_start = Some(lexer.span().start);
            }
            continue;
        }
        if let Some(start) = error_start.take() {
            let end = match next {
                Some(_) => lexer.span().start,
                None => source.len(),
            };
            out.garbage.push(range_to_text_range(start..end));
        }
        let Some(Ok(kind)) = next else { break };

        let span = range_to_text_range(lexer.span());
        match kind {
            TokenKind::Whitespace => {}
            TokenKind::LineComment | TokenKind::BlockComment | TokenKind::DocComment => {
                out.comments.entries.push(Comment {
                    span,
                    doc: kind == TokenKind::DocComment,
                });
            }
            TokenKind::Garbage => unreachable!("Garbage is never produced by Logos"),
            _ => out.tokens.push(Token::new(kind, span)),
        }
    }

    fuse_bracket_pairs(&mut out.tokens);
    retag_generic_angles(&mut out.tokens);
    retag_lambda_parens(&mut out.tokens);

    let end = TextSize::from(source.len() as u32);
    out.tokens.push(Token::synthetic(TokenKind::Eof, end));
    out
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[std::ops::Range::<usize>::from(token.span)]
}

/// Fuses adjacent `[` `]` into a single `BracketPair` token.
///
/// `[]` never appears in a valid expression, so the fusion is unconditional;
/// it is what lets one-token lookahead tell `int[] x;` from `a[0] = 1;`.
fn fuse_bracket_pairs(tokens: &mut Vec<Token>) {
    let mut write = 0;
    let mut read = 0;
    while read < tokens.len() {
        if read + 1 < tokens.len()
            && tokens[read].kind == TokenKind::LBracket
            && tokens[read + 1].kind == TokenKind::RBracket
        {
            let span = TextRange::new(tokens[read].span.start(), tokens[read + 1].span.end());
            tokens[write] = Token::new(TokenKind::BracketPair, span);
            read += 2;
        } else {
            tokens[write] = tokens[read];
            read += 1;
        }
        write += 1;
    }
    tokens.truncate(write);
}

/// Retags `<` as `LtGeneric` wherever it follows an identifier and a bounded
/// forward scan finds a balanced type-argument list.
///
/// The token vocabulary inside a type-argument list is small (names, commas,
/// wildcards, bounds, array suffixes), so the first token outside that set
/// settles the question. `>` is always a single token in Magpie - there are
/// no shift operators - so nested lists close one level per token.
fn retag_generic_angles(tokens: &mut [Token]) {
    for i in 1..tokens.len() {
        if tokens[i].kind == TokenKind::Lt
            && tokens[i - 1].kind == TokenKind::Identifier
            && type_args_close(tokens, i)
        {
            tokens[i].kind = TokenKind::LtGeneric;
        }
    }
}

fn type_args_close(tokens: &[Token], lt: usize) -> bool {
    let mut depth = 1u32;
    for tok in tokens.iter().skip(lt + 1).take(PROBE_LIMIT) {
        match tok.kind {
            TokenKind::Lt | TokenKind::LtGeneric => depth += 1,
            TokenKind::Gt => {
                depth -= 1;
                if depth == 0 {
                    return true;
                }
            }
            TokenKind::Identifier
            | TokenKind::Dot
            | TokenKind::Comma
            | TokenKind::Question
            | TokenKind::Extends
            | TokenKind::Super
            | TokenKind::PrimKw
            | TokenKind::BracketPair => {}
            _ => return false,
        }
    }
    false
}

/// Retags `(` as `LParenLambda` when its matching `)` is directly followed by `->`.
///
/// Runs after angle retagging so typed lambda parameters like
/// `(List<String> xs) -> ...` scan cleanly.
fn retag_lambda_parens(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        if tokens[i].kind == TokenKind::LParen
            && let Some(close) = lambda_params_close(tokens, i)
            && close + 1 < tokens.len()
            && tokens[close + 1].kind == TokenKind::Arrow
        {
            tokens[i].kind = TokenKind::LParenLambda;
        }
    }
}

fn lambda_params_close(tokens: &[Token], open: usize) -> Option<usize> {
    for (offset, tok) in tokens.iter().enumerate().skip(open + 1).take(PROBE_LIMIT) {
        match tok.kind {
            TokenKind::RParen => return Some(offset),
            TokenKind::Identifier
            | TokenKind::Comma
            | TokenKind::Dot
            | TokenKind::PrimKw
            | TokenKind::Var
            | TokenKind::BracketPair
            | TokenKind::LtGeneric
            | TokenKind::Gt => {}
            _ => return None,
        }
    }
    None
}
