use text_size::{TextRange, TextSize};

use super::*;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(TextSize::from(start), TextSize::from(end))
}

#[test]
fn report_uses_fallback_message() {
    let mut diags = Diagnostics::new();
    diags.report(DiagnosticKind::UnexpectedToken, range(3, 4)).emit();
    assert_eq!(diags.len(), 1);
    let only = diags.iter().next().unwrap();
    assert_eq!(only.message, "unexpected token");
    assert!(only.is_error());
}

#[test]
fn detail_fills_template() {
    let mut diags = Diagnostics::new();
    diags
        .report(DiagnosticKind::DuplicateModifier, range(0, 6))
        .detail("public")
        .emit();
    let only = diags.iter().next().unwrap();
    assert_eq!(only.message, "`public` appears more than once");
    assert!(only.is_warning());
}

#[test]
fn containment_suppresses_lower_priority() {
    let mut diags = Diagnostics::new();
    diags.report(DiagnosticKind::UnclosedBrace, range(0, 40)).emit();
    diags.report(DiagnosticKind::UnexpectedToken, range(10, 12)).emit();
    let kept = diags.filtered();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].kind, DiagnosticKind::UnclosedBrace);
}

#[test]
fn disjoint_spans_both_survive() {
    let mut diags = Diagnostics::new();
    diags.report(DiagnosticKind::UnexpectedToken, range(0, 2)).emit();
    diags.report(DiagnosticKind::UnexpectedToken, range(10, 12)).emit();
    assert_eq!(diags.filtered().len(), 2);
}

#[test]
fn same_span_keeps_higher_priority() {
    let mut diags = Diagnostics::new();
    diags.report(DiagnosticKind::ConstructUnavailable, range(5, 9)).emit();
    diags.report(DiagnosticKind::UnexpectedEof, range(5, 9)).emit();
    let kept = diags.filtered();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].kind, DiagnosticKind::UnexpectedEof);
}

#[test]
fn plain_rendering_without_source() {
    let mut diags = Diagnostics::new();
    diags.report(DiagnosticKind::UnexpectedEof, range(12, 12)).emit();
    let out = DiagnosticsPrinter::new(&diags).render();
    assert_eq!(out, "error[12..12]: unexpected end of input");
}

#[test]
fn snippet_rendering_points_at_offender() {
    let source = "class A { int x = ; }";
    let mut diags = Diagnostics::new();
    diags
        .report(DiagnosticKind::UnexpectedToken, range(18, 19))
        .detail("`;`")
        .emit();
    let out = DiagnosticsPrinter::new(&diags)
        .source(source)
        .path("a.mag")
        .render();
    assert!(out.contains("unexpected `;`"), "{out}");
    assert!(out.contains("a.mag"), "{out}");
}

#[test]
fn merge_restores_span_order() {
    let mut first = Diagnostics::new();
    first.report(DiagnosticKind::UnexpectedToken, range(20, 21)).emit();
    let mut second = Diagnostics::new();
    second.report(DiagnosticKind::UnrecognizedCharacters, range(2, 5)).emit();
    first.merge(second);
    let spans: Vec<u32> = first.iter().map(|m| m.range.start().into()).collect();
    assert_eq!(spans, vec![2, 20]);
}
