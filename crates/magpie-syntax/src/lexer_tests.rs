use text_size::{TextRange, TextSize};

use crate::lexer::{TERMINALS, Token, TokenKind, lex, token_text};

fn kinds(source: &str) -> Vec<TokenKind> {
    let mut kinds: Vec<_> = lex(source).tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds.pop(), Some(TokenKind::Eof));
    kinds
}

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[test]
fn terminal_table_is_aligned() {
    for (index, kind) in TERMINALS.iter().enumerate() {
        assert_eq!(kind.terminal_index(), index, "misplaced {kind:?}");
    }
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(
        kinds("class interface enum record classy"),
        [
            TokenKind::Class,
            TokenKind::Interface,
            TokenKind::Enum,
            TokenKind::Record,
            TokenKind::Identifier,
        ]
    );
    assert_eq!(
        kinds("public static final var"),
        [
            TokenKind::ModifierKw,
            TokenKind::Static,
            TokenKind::ModifierKw,
            TokenKind::Var,
        ]
    );
    assert_eq!(kinds("_name $dollar a9"), vec![TokenKind::Identifier; 3]);
}

#[test]
fn literals() {
    assert_eq!(
        kinds("42 0x1F_2a 10L 3.14 1.5e3d 2f 'a' '\\n' \"s\\\"t\" true null"),
        [
            TokenKind::IntLit,
            TokenKind::IntLit,
            TokenKind::IntLit,
            TokenKind::FloatLit,
            TokenKind::FloatLit,
            TokenKind::FloatLit,
            TokenKind::CharLit,
            TokenKind::CharLit,
            TokenKind::StringLit,
            TokenKind::BoolLit,
            TokenKind::NullLit,
        ]
    );
}

#[test]
fn stream_always_ends_with_eof() {
    let out = lex("a");
    let eof = out.tokens.last().unwrap();
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!(eof.span, range(1, 1));
    assert_eq!(lex("").tokens.len(), 1);
}

#[test]
fn bracket_pairs_fuse() {
    assert_eq!(
        kinds("int[] a"),
        [TokenKind::PrimKw, TokenKind::BracketPair, TokenKind::Identifier]
    );
    // An index expression keeps its brackets apart.
    assert_eq!(
        kinds("a[0]"),
        [
            TokenKind::Identifier,
            TokenKind::LBracket,
            TokenKind::IntLit,
            TokenKind::RBracket,
        ]
    );
    let out = lex("x[]");
    assert_eq!(out.tokens[1].span, range(1, 3));
}

#[test]
fn generic_angle_retags_on_closing_scan() {
    assert_eq!(
        kinds("Map<String, List<T>> m"),
        [
            TokenKind::Identifier,
            TokenKind::LtGeneric,
            TokenKind::Identifier,
            TokenKind::Comma,
            TokenKind::Identifier,
            TokenKind::LtGeneric,
            TokenKind::Identifier,
            TokenKind::Gt,
            TokenKind::Gt,
            TokenKind::Identifier,
        ]
    );
    // A comparison never closes like a type argument list.
    assert_eq!(
        kinds("a < b + 1"),
        [
            TokenKind::Identifier,
            TokenKind::Lt,
            TokenKind::Identifier,
            TokenKind::Plus,
            TokenKind::IntLit,
        ]
    );
}

#[test]
fn lambda_paren_retags_when_arrow_follows() {
    assert_eq!(
        kinds("(a, b) -> a"),
        [
            TokenKind::LParenLambda,
            TokenKind::Identifier,
            TokenKind::Comma,
            TokenKind::Identifier,
            TokenKind::RParen,
            TokenKind::Arrow,
            TokenKind::Identifier,
        ]
    );
    assert_eq!(
        kinds("(a)"),
        [TokenKind::LParen, TokenKind::Identifier, TokenKind::RParen]
    );
}

#[test]
fn comments_go_to_the_side_table() {
    let out = lex("a // line\n/* block */ b /** doc */ c");
    let kinds: Vec<_> = out.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
    let entries = out.comments.entries();
    assert_eq!(entries.len(), 3);
    assert!(!entries[0].doc);
    assert!(!entries[1].doc);
    assert!(entries[2].doc);
}

#[test]
fn doc_before_requires_adjacency() {
    let source = "/** docs */ class A { } /** orphan */ x class B { }";
    let out = lex(source);
    let class_a = out.tokens[0].span.start();
    assert!(out.comments.doc_before(class_a, TextSize::from(0)).is_some());
    // `x` sits between the second doc comment and `class B`.
    let class_b = out
        .tokens
        .iter()
        .rfind(|t| t.kind == TokenKind::Class)
        .unwrap()
        .span
        .start();
    let x_end = out
        .tokens
        .iter()
        .find(|t| token_text(source, t) == "x")
        .unwrap()
        .span
        .end();
    assert!(out.comments.doc_before(class_b, x_end).is_none());
}

#[test]
fn any_in_brackets_comment_overlap() {
    let source = "{ /* note */ }";
    let out = lex(source);
    assert!(out.comments.any_in(range(1, 13)));
    assert!(!out.comments.any_in(range(0, 1)));
}

#[test]
fn garbage_coalesces_into_one_span() {
    let out = lex("a ##@@## b");
    assert_eq!(out.garbage.len(), 2);
    assert_eq!(out.garbage[0], range(2, 4));
    // `@` is a real token, so the run splits around it.
    assert_eq!(out.garbage[1], range(6, 8));
    assert_eq!(
        out.tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        [
            TokenKind::Identifier,
            TokenKind::At,
            TokenKind::At,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn garbage_at_end_of_input() {
    let out = lex("a #");
    assert_eq!(out.garbage, [range(2, 3)]);
}

#[test]
fn token_text_slices_the_source() {
    let source = "foo + bar";
    let out = lex(source);
    assert_eq!(token_text(source, &out.tokens[0]), "foo");
    assert_eq!(token_text(source, &out.tokens[2]), "bar");
}

#[test]
fn synthetic_tokens_are_empty_spans() {
    let token = Token::synthetic(TokenKind::LBrace, TextSize::from(7));
    assert_eq!(token.span, range(7, 7));
    assert_eq!(token.kind, TokenKind::LBrace);
}

#[test]
fn display_names() {
    assert_eq!(TokenKind::LBrace.display_name(), "`{`");
    assert_eq!(TokenKind::Identifier.display_name(), "an identifier");
    assert_eq!(TokenKind::Eof.display_name(), "end of input");
}
