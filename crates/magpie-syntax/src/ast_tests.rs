use text_size::TextRange;

use crate::ast::{AssignOp, Expr, Ident, Modifiers, QualifiedName, TypeRef, WildcardBound};

fn ident(text: &str, start: u32) -> Ident {
    let end = start + text.len() as u32;
    Ident {
        text: text.to_string(),
        span: TextRange::new(start.into(), end.into()),
    }
}

fn name(parts: &[&str]) -> QualifiedName {
    let mut offset = 0;
    let parts: Vec<_> = parts
        .iter()
        .map(|p| {
            let id = ident(p, offset);
            offset += p.len() as u32 + 1;
            id
        })
        .collect();
    let span = TextRange::new(
        parts.first().map(|i| i.span.start()).unwrap_or_default(),
        parts.last().map(|i| i.span.end()).unwrap_or_default(),
    );
    QualifiedName { parts, span }
}

#[test]
fn qualified_name_accessors() {
    let qn = name(&["java", "util", "List"]);
    assert_eq!(qn.dotted(), "java.util.List");
    assert_eq!(qn.simple().text, "List");
    assert_eq!(name(&["x"]).dotted(), "x");
}

#[test]
fn modifier_bits() {
    let mods = Modifiers(Modifiers::PUBLIC | Modifiers::STATIC);
    assert!(mods.contains(Modifiers::PUBLIC));
    assert!(mods.contains(Modifiers::STATIC));
    assert!(!mods.contains(Modifiers::FINAL));
    assert!(!mods.is_empty());
    assert!(Modifiers::default().is_empty());
}

#[test]
fn modifier_bit_lookup() {
    assert_eq!(Modifiers::bit_for("public"), Some(Modifiers::PUBLIC));
    assert_eq!(Modifiers::bit_for("default"), Some(Modifiers::DEFAULT));
    assert_eq!(Modifiers::bit_for("synchronized"), None);
    assert_eq!(Modifiers::bit_for(""), None);
}

#[test]
fn assign_op_lexemes() {
    assert_eq!(AssignOp::from_lexeme("="), Some(AssignOp::Assign));
    assert_eq!(AssignOp::from_lexeme("+="), Some(AssignOp::Add));
    assert_eq!(AssignOp::from_lexeme("%="), Some(AssignOp::Rem));
    assert_eq!(AssignOp::from_lexeme("=="), None);
}

#[test]
fn type_ref_spans() {
    let span = TextRange::new(3.into(), 9.into());
    let named = TypeRef::Named {
        name: QualifiedName {
            parts: vec![ident("String", 3)],
            span,
        },
    };
    assert_eq!(named.span(), span);
    let array = TypeRef::Array {
        elem: Box::new(named),
        dims: 2,
        span: TextRange::new(3.into(), 13.into()),
    };
    assert_eq!(array.span(), TextRange::new(3.into(), 13.into()));
    let wildcard = TypeRef::Wildcard {
        bound: Some((
            WildcardBound::Extends,
            Box::new(TypeRef::Infer {
                span: TextRange::default(),
            }),
        )),
        span: TextRange::new(0.into(), 1.into()),
    };
    assert_eq!(wildcard.span(), TextRange::new(0.into(), 1.into()));
}

#[test]
fn expression_spans() {
    let qn = name(&["a", "b"]);
    let span = qn.span;
    assert_eq!(Expr::Name(qn).span(), span);
    assert_eq!(Expr::This { span }.span(), span);
}
