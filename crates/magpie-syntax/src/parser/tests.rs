use indoc::indoc;

use crate::ast::{
    AssignOp, BinaryOp, Body, CaseItem, CompilationUnit, Expr, ForInit, LambdaBody, LambdaParam,
    LiteralKind, Member, Modifiers, ModuleDirective, Stmt, SwitchLabel, SwitchRuleBody, TypeDecl,
    TypeDeclKind, TypeRef, UnaryOp,
};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::grammar::Edition;
use crate::parser::{
    ParseOptions, parse, parse_expression, parse_statements, parse_with, reparse_skipped_bodies,
};

fn ok(source: &str) -> CompilationUnit {
    let (unit, diags) = parse(source).unwrap();
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    assert!(!unit.recovered);
    unit
}

fn with_errors(source: &str) -> (CompilationUnit, Diagnostics) {
    let (unit, diags) = parse(source).unwrap();
    assert!(diags.has_errors(), "expected diagnostics for {source:?}");
    (unit, diags)
}

fn one_type(source: &str) -> TypeDecl {
    let mut unit = ok(source);
    assert_eq!(unit.types.len(), 1);
    unit.types.pop().unwrap()
}

fn expr(source: &str) -> Expr {
    let (expr, diags) = parse_expression(source).unwrap();
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    expr.unwrap()
}

fn stmts(source: &str) -> Vec<Stmt> {
    let (stmts, diags) = parse_statements(source).unwrap();
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    stmts
}

fn count_kind(diags: &Diagnostics, kind: DiagnosticKind) -> usize {
    diags.iter().filter(|d| d.kind == kind).count()
}

#[test]
fn empty_file() {
    let unit = ok("");
    assert!(unit.package.is_none());
    assert!(unit.imports.is_empty());
    assert!(unit.types.is_empty());
}

#[test]
fn package_and_imports() {
    let unit = ok(indoc! {"
        package com.example.app;

        import java.util.List;
        import static java.lang.Math.max;
        import java.io.*;

        class Main { }
    "});
    assert_eq!(unit.package.unwrap().name.dotted(), "com.example.app");
    assert_eq!(unit.imports.len(), 3);
    assert_eq!(unit.imports[0].name.dotted(), "java.util.List");
    assert!(unit.imports[1].is_static);
    assert_eq!(unit.imports[1].name.dotted(), "java.lang.Math.max");
    assert!(unit.imports[2].on_demand);
    assert_eq!(unit.imports[2].name.dotted(), "java.io");
}

#[test]
fn class_with_field_and_method() {
    let decl = one_type(indoc! {"
        public class Point {
            private int x;
            int y = 0;

            public int sum() {
                return x + y;
            }
        }
    "});
    assert_eq!(decl.kind, TypeDeclKind::Class);
    assert_eq!(decl.name.text, "Point");
    assert!(decl.modifiers.contains(Modifiers::PUBLIC));
    assert_eq!(decl.members.len(), 3);
    let Member::Field(x) = &decl.members[0] else {
        panic!("expected field, got {:?}", decl.members[0]);
    };
    assert!(x.modifiers.contains(Modifiers::PRIVATE));
    assert_eq!(x.declarators.len(), 1);
    assert_eq!(x.declarators[0].name.text, "x");
    assert!(x.declarators[0].init.is_none());
    let Member::Field(y) = &decl.members[1] else {
        panic!("expected field");
    };
    assert!(y.declarators[0].init.is_some());
    let Member::Method(sum) = &decl.members[2] else {
        panic!("expected method");
    };
    assert_eq!(sum.name.text, "sum");
    assert!(matches!(&sum.body, Body::Block(b) if b.stmts.len() == 1));
}

#[test]
fn extends_and_implements() {
    let decl = one_type("class Child extends Base implements A, B { }");
    assert_eq!(decl.extends.len(), 1);
    assert_eq!(decl.implements.len(), 2);
}

#[test]
fn interface_members_default_to_absent_bodies() {
    let decl = one_type(indoc! {"
        interface Shape extends Drawable {
            double area();
            default int sides() { return 0; }
        }
    "});
    assert_eq!(decl.kind, TypeDeclKind::Interface);
    assert_eq!(decl.extends.len(), 1);
    let Member::Method(area) = &decl.members[0] else {
        panic!("expected method");
    };
    assert!(matches!(area.body, Body::Absent));
    let Member::Method(sides) = &decl.members[1] else {
        panic!("expected method");
    };
    assert!(sides.modifiers.contains(Modifiers::DEFAULT));
    assert!(matches!(sides.body, Body::Block(_)));
}

#[test]
fn enum_constants_with_args_and_body() {
    let decl = one_type(indoc! {"
        enum Planet {
            MERCURY(3), VENUS(4), EARTH {
                int radius() { return 6371; }
            };

            int radius() { return 0; }
        }
    "});
    assert_eq!(decl.kind, TypeDeclKind::Enum);
    assert_eq!(decl.enum_constants.len(), 3);
    assert_eq!(decl.enum_constants[0].name.text, "MERCURY");
    assert_eq!(decl.enum_constants[0].args.len(), 1);
    assert!(decl.enum_constants[2].body.as_ref().is_some_and(|m| m.len() == 1));
    assert_eq!(decl.members.len(), 1);
}

#[test]
fn record_components() {
    let decl = one_type("record Pair(int first, String second) implements Comparable { }");
    assert_eq!(decl.kind, TypeDeclKind::Record);
    assert_eq!(decl.record_params.len(), 2);
    assert_eq!(decl.record_params[1].name.text, "second");
    assert_eq!(decl.implements.len(), 1);
}

#[test]
fn generics_on_types_and_methods() {
    let decl = one_type(indoc! {"
        class Box<T extends Comparable> {
            T value;
            List<Map<String, T>> index;
        }
    "});
    assert_eq!(decl.type_params.len(), 1);
    assert_eq!(decl.type_params[0].name.text, "T");
    assert!(decl.type_params[0].bound.is_some());
    let Member::Field(index) = &decl.members[1] else {
        panic!("expected field");
    };
    let TypeRef::Generic { args, .. } = &index.ty else {
        panic!("expected generic type, got {:?}", index.ty);
    };
    assert!(matches!(&args[0], TypeRef::Generic { args, .. } if args.len() == 2));
}

#[test]
fn annotations_on_declarations() {
    let decl = one_type(indoc! {"
        @Entity
        @Table(name)
        class User {
            @Deprecated void old() { }
        }
    "});
    assert_eq!(decl.annotations.len(), 2);
    assert_eq!(decl.annotations[0].name.dotted(), "Entity");
    assert_eq!(decl.annotations[1].args.len(), 1);
    let Member::Method(old) = &decl.members[0] else {
        panic!("expected method");
    };
    assert_eq!(old.annotations.len(), 1);
}

#[test]
fn constructor_and_varargs() {
    let decl = one_type(indoc! {"
        class Log {
            Log(String tag) { }
            void write(String fmt, Object... args) throws IOException { }
        }
    "});
    let Member::Constructor(ctor) = &decl.members[0] else {
        panic!("expected constructor, got {:?}", decl.members[0]);
    };
    assert_eq!(ctor.name.text, "Log");
    let Member::Method(write) = &decl.members[1] else {
        panic!("expected method");
    };
    assert!(write.params[1].variadic);
    assert_eq!(write.throws.len(), 1);
}

#[test]
fn initializer_blocks() {
    let decl = one_type(indoc! {"
        class C {
            static { setup(); }
            { instances++; }
        }
    "});
    assert!(matches!(decl.members[0], Member::Initializer { is_static: true, .. }));
    assert!(matches!(decl.members[1], Member::Initializer { is_static: false, .. }));
}

#[test]
fn doc_comments_attach_to_declarations() {
    let decl = one_type(indoc! {"
        /** A well documented class. */
        class Doc {
            /** The answer. */
            int answer = 42;
            int undocumented;
        }
    "});
    assert!(decl.doc.is_some());
    let Member::Field(answer) = &decl.members[0] else {
        panic!("expected field");
    };
    assert!(answer.doc.is_some());
    let Member::Field(bare) = &decl.members[1] else {
        panic!("expected field");
    };
    assert!(bare.doc.is_none());
}

#[test]
fn module_declaration() {
    let unit = ok(indoc! {"
        module com.example.core {
            requires transitive com.example.base;
            exports com.example.api to com.example.app;
            uses com.example.spi.Plugin;
        }
    "});
    let module = unit.module.unwrap();
    assert_eq!(module.name.dotted(), "com.example.core");
    assert_eq!(module.directives.len(), 3);
    assert!(matches!(
        &module.directives[0],
        ModuleDirective::Requires { transitive: true, .. }
    ));
    assert!(matches!(
        &module.directives[1],
        ModuleDirective::Exports { to, .. } if to.len() == 1
    ));
}

#[test]
fn duplicate_modifier_reported() {
    let (unit, diags) = parse("public public class A { }").unwrap();
    assert_eq!(diags.warning_count(), 1);
    assert_eq!(count_kind(&diags, DiagnosticKind::DuplicateModifier), 1);
    assert_eq!(unit.types.len(), 1);
    assert!(unit.types[0].modifiers.contains(Modifiers::PUBLIC));
}

#[test]
fn unrecognized_characters_do_not_derail_the_parse() {
    let (unit, diags) = with_errors("class A { } ###");
    assert_eq!(count_kind(&diags, DiagnosticKind::UnrecognizedCharacters), 1);
    assert_eq!(unit.types.len(), 1);
    assert!(!unit.types[0].recovered);
}

// --- expressions ---

#[test]
fn multiplication_binds_tighter_than_addition() {
    let Expr::Binary { op, rhs, .. } = expr("a + b * c") else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Add);
    assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::Mul, .. }));
}

#[test]
fn assignment_is_right_associative() {
    let Expr::Assign { op, value, .. } = expr("a = b += c") else {
        panic!("expected assignment");
    };
    assert_eq!(op, AssignOp::Assign);
    assert!(matches!(*value, Expr::Assign { op: AssignOp::Add, .. }));
}

#[test]
fn ternary_and_relational() {
    let Expr::Ternary { cond, .. } = expr("a < b ? a : b") else {
        panic!("expected ternary");
    };
    assert!(matches!(*cond, Expr::Binary { op: BinaryOp::Lt, .. }));
}

#[test]
fn calls_fields_and_indexing_chain() {
    let Expr::Call { callee, args, .. } = expr("a.b[0].run(1, 2)") else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 2);
    let Expr::Field { target, name, .. } = *callee else {
        panic!("expected field access");
    };
    assert_eq!(name.text, "run");
    assert!(matches!(*target, Expr::Index { .. }));
}

#[test]
fn unary_and_postfix() {
    let Expr::Unary { op, operand, .. } = expr("!-x") else {
        panic!("expected unary");
    };
    assert_eq!(op, UnaryOp::Not);
    assert!(matches!(*operand, Expr::Unary { op: UnaryOp::Minus, .. }));
    assert!(matches!(expr("x++"), Expr::Unary { op: UnaryOp::PostIncr, .. }));
}

#[test]
fn parenthesized_name_is_a_cast() {
    let Expr::Cast { ty, operand, .. } = expr("(Shape) s") else {
        panic!("expected cast");
    };
    assert!(matches!(ty, TypeRef::Named { name } if name.dotted() == "Shape"));
    assert!(matches!(*operand, Expr::Name(_)));
    assert!(matches!(expr("(int) x"), Expr::Cast { ty: TypeRef::Primitive { .. }, .. }));
}

#[test]
fn non_name_cast_target_is_rejected() {
    let (result, diags) = parse_expression("(a + b) c").unwrap();
    assert_eq!(count_kind(&diags, DiagnosticKind::InvalidCastTarget), 1);
    // The operand survives so later phases still see an expression.
    assert!(matches!(result.unwrap(), Expr::Name(_)));
}

#[test]
fn instanceof_with_pattern_binding() {
    let Expr::Instanceof { binding, .. } = expr("s instanceof Circle c") else {
        panic!("expected instanceof");
    };
    assert_eq!(binding.unwrap().text, "c");
    assert!(matches!(expr("s instanceof Circle"), Expr::Instanceof { binding: None, .. }));
}

#[test]
fn object_and_array_creation() {
    let Expr::New { args, body, .. } = expr("new HashMap<String, Integer>(16)") else {
        panic!("expected new");
    };
    assert_eq!(args.len(), 1);
    assert!(body.is_none());
    assert!(matches!(expr("new Runnable() { }"), Expr::New { body: Some(_), .. }));
    let Expr::NewArray { dim_exprs, dims, .. } = expr("new int[8][n]") else {
        panic!("expected array creation");
    };
    assert_eq!(dim_exprs.len(), 2);
    assert_eq!(dims, 0);
    let Expr::NewArray { dims, init, .. } = expr("new int[] { 1, 2 }") else {
        panic!("expected initialized array");
    };
    assert_eq!(dims, 1);
    assert_eq!(init.unwrap().len(), 2);
}

#[test]
fn lambdas() {
    let Expr::Lambda { params, body, .. } = expr("x -> x + 1") else {
        panic!("expected lambda");
    };
    assert!(matches!(&params[0], LambdaParam::Inferred { name } if name.text == "x"));
    assert!(matches!(*body, LambdaBody::Expr(_)));
    let Expr::Lambda { params, body, .. } = expr("(a, b) -> { return a; }") else {
        panic!("expected lambda");
    };
    assert_eq!(params.len(), 2);
    assert!(matches!(*body, LambdaBody::Block(_)));
}

#[test]
fn literals() {
    assert!(matches!(
        expr("0x1F"),
        Expr::Literal { kind: LiteralKind::Int, .. }
    ));
    assert!(matches!(
        expr("\"hi\\n\""),
        Expr::Literal { kind: LiteralKind::String, .. }
    ));
    assert!(matches!(expr("true"), Expr::Literal { kind: LiteralKind::Bool, .. }));
    assert!(matches!(expr("null"), Expr::Literal { kind: LiteralKind::Null, .. }));
}

#[test]
fn wrecked_expression_yields_none() {
    let (result, diags) = parse_expression("1 +").unwrap();
    assert!(result.is_none());
    assert_eq!(count_kind(&diags, DiagnosticKind::UnexpectedEof), 1);
}

// --- statements ---

#[test]
fn local_declarations() {
    let list = stmts("int a = 1, b; final var c = f();");
    let Stmt::Local(first) = &list[0] else {
        panic!("expected local");
    };
    assert_eq!(first.declarators.len(), 2);
    let Stmt::Local(inferred) = &list[1] else {
        panic!("expected local");
    };
    assert!(inferred.modifiers.contains(Modifiers::FINAL));
    assert!(matches!(inferred.ty, TypeRef::Infer { .. }));
}

#[test]
fn control_flow() {
    let list = stmts(indoc! {"
        if (a) f(); else g();
        while (a) { }
        do f(); while (a);
        for (int i = 0; i < n; i++) f(i);
        for (String s : names) print(s);
    "});
    assert!(matches!(&list[0], Stmt::If { else_branch: Some(_), .. }));
    assert!(matches!(&list[1], Stmt::While { .. }));
    assert!(matches!(&list[2], Stmt::DoWhile { .. }));
    let Stmt::For { init, cond, update, .. } = &list[3] else {
        panic!("expected for");
    };
    assert!(matches!(init, ForInit::Local(_)));
    assert!(cond.is_some());
    assert_eq!(update.len(), 1);
    let Stmt::ForEach { ty, name, .. } = &list[4] else {
        panic!("expected foreach");
    };
    assert!(ty.is_some());
    assert_eq!(name.text, "s");
}

#[test]
fn foreach_with_var_binding() {
    let list = stmts("for (var s : names) { }");
    assert!(matches!(&list[0], Stmt::ForEach { ty: None, .. }));
}

#[test]
fn switch_rules() {
    let list = stmts(indoc! {"
        switch (shape) {
            case 1, 2 -> small();
            case Circle c -> c.radius();
            default -> { fallback(); }
        }
    "});
    let Stmt::Switch { rules, .. } = &list[0] else {
        panic!("expected switch");
    };
    assert_eq!(rules.len(), 3);
    let SwitchLabel::Case { items, .. } = &rules[0].label else {
        panic!("expected case");
    };
    assert_eq!(items.len(), 2);
    assert!(matches!(
        &rules[1].label,
        SwitchLabel::Case { items, .. }
            if matches!(&items[0], CaseItem::Pattern { name, .. } if name.text == "c")
    ));
    assert!(matches!(&rules[2].label, SwitchLabel::Default { .. }));
    assert!(matches!(&rules[2].body, SwitchRuleBody::Block(_)));
}

#[test]
fn try_catch_finally_and_throw() {
    let list = stmts(indoc! {"
        try { open(); } catch (IOException e) { log(e); } finally { close(); }
        throw new IllegalStateException();
    "});
    let Stmt::Try { catches, finally, .. } = &list[0] else {
        panic!("expected try");
    };
    assert_eq!(catches.len(), 1);
    assert_eq!(catches[0].name.text, "e");
    assert!(finally.is_some());
    assert!(matches!(&list[1], Stmt::Throw { .. }));
}

#[test]
fn local_type_declaration() {
    let list = stmts("class Helper { } new Helper();");
    assert!(matches!(&list[0], Stmt::TypeDecl(decl) if decl.name.text == "Helper"));
}

#[test]
fn wrecked_statement_list_keeps_finished_statements() {
    let (list, diags) = parse_statements("int x = 1; int y = ;").unwrap();
    assert!(diags.has_errors());
    assert_eq!(list.len(), 1);
    assert!(matches!(&list[0], Stmt::Local(l) if l.declarators[0].name.text == "x"));
}

// --- editions ---

#[test]
fn newer_constructs_are_reported_but_still_parsed() {
    let options = ParseOptions {
        edition: Edition::Classic,
        ..ParseOptions::default()
    };
    let (unit, diags) = parse_with("record Pair(int a, int b) { }", &options).unwrap();
    assert!(count_kind(&diags, DiagnosticKind::ConstructUnavailable) >= 1);
    assert_eq!(unit.types[0].kind, TypeDeclKind::Record);
}

#[test]
fn extended_edition_accepts_generics_but_not_lambdas() {
    let options = ParseOptions {
        edition: Edition::Extended,
        ..ParseOptions::default()
    };
    let (_, diags) = parse_with("class Box<T> { }", &options).unwrap();
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    let (_, diags) = parse_with("class C { Runnable r = () -> { }; }", &options).unwrap();
    assert!(count_kind(&diags, DiagnosticKind::ConstructUnavailable) >= 1);
}

// --- diet parsing ---

#[test]
fn diet_parse_skips_bodies_and_reparse_restores_them() {
    let source = indoc! {"
        class A {
            int f() {
                int x = 1;
                return x;
            }
            abstract void g();
        }
    "};
    let options = ParseOptions {
        diet: true,
        ..ParseOptions::default()
    };
    let (mut unit, diags) = parse_with(source, &options).unwrap();
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    let Member::Method(f) = &unit.types[0].members[0] else {
        panic!("expected method");
    };
    let Body::Skipped(range) = f.body else {
        panic!("expected skipped body, got {:?}", f.body);
    };
    let skipped = &source[std::ops::Range::<usize>::from(range)];
    assert!(skipped.starts_with('{') && skipped.ends_with('}'));
    assert!(matches!(
        &unit.types[0].members[1],
        Member::Method(g) if matches!(g.body, Body::Absent)
    ));

    let diags = reparse_skipped_bodies(source, &mut unit, &options).unwrap();
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    let Member::Method(f) = &unit.types[0].members[0] else {
        panic!("expected method");
    };
    let Body::Block(block) = &f.body else {
        panic!("expected reparsed block, got {:?}", f.body);
    };
    assert_eq!(block.stmts.len(), 2);
    assert_eq!(block.span, range);
    assert!(!block.recovered);
}

#[test]
fn diet_plus_reparse_equals_the_eager_parse() {
    let source = indoc! {"
        package demo;

        class Outer {
            int f(int n) {
                // halve
                int x = n / 2;
                return x;
            }
            Outer() {
                int y = 0;
            }
            class Inner {
                void g() { while (true) { break; } }
            }
        }
    "};
    let (eager, diags) = parse_with(source, &ParseOptions::default()).unwrap();
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");

    let options = ParseOptions {
        diet: true,
        ..ParseOptions::default()
    };
    let (mut unit, diags) = parse_with(source, &options).unwrap();
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    let diags = reparse_skipped_bodies(source, &mut unit, &options).unwrap();
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");

    assert_eq!(unit, eager);
}

#[test]
fn reparse_reaches_nested_and_enum_constant_bodies() {
    let source = indoc! {"
        enum E {
            A {
                int f() { return 1; }
            };
            class Inner {
                void g() { h(); }
            }
        }
    "};
    let options = ParseOptions {
        diet: true,
        ..ParseOptions::default()
    };
    let (mut unit, _) = parse_with(source, &options).unwrap();
    reparse_skipped_bodies(source, &mut unit, &options).unwrap();
    let constant_body = unit.types[0].enum_constants[0].body.as_ref().unwrap();
    assert!(matches!(
        &constant_body[0],
        Member::Method(f) if matches!(&f.body, Body::Block(b) if b.stmts.len() == 1)
    ));
    let Member::Nested(inner) = &unit.types[0].members[0] else {
        panic!("expected nested class");
    };
    assert!(matches!(
        &inner.members[0],
        Member::Method(g) if matches!(&g.body, Body::Block(b) if b.stmts.len() == 1)
    ));
}

// --- error recovery ---

#[test]
fn member_level_resync_keeps_later_members() {
    let (unit, diags) = with_errors(indoc! {"
        class A {
            int x = ;
            void m() { run(); }
        }
    "});
    assert_eq!(diags.error_count(), 1);
    assert!(unit.recovered);
    let decl = &unit.types[0];
    assert_eq!(decl.name.text, "A");
    assert!(decl.recovered);
    assert!(decl.members.iter().any(|m| matches!(
        m,
        Member::Method(method) if method.name.text == "m"
    )));
}

#[test]
fn members_before_the_wreck_survive() {
    let (unit, _) = with_errors(indoc! {"
        class A {
            int good = 1;
            void broken( { }
            void after() { }
        }
    "});
    let decl = &unit.types[0];
    assert!(decl.members.iter().any(|m| matches!(
        m,
        Member::Field(f) if f.declarators[0].name.text == "good"
    )));
    assert!(decl.members.iter().any(|m| matches!(
        m,
        Member::Method(method) if method.name.text == "after"
    )));
}

#[test]
fn truncated_nesting_halts_with_unclosed_braces() {
    let (unit, diags) = with_errors("class A { class B { class C {");
    assert_eq!(count_kind(&diags, DiagnosticKind::UnclosedBrace), 3);
    assert!(unit.recovered);
    let a = &unit.types[0];
    assert_eq!(a.name.text, "A");
    let Member::Nested(b) = &a.members[0] else {
        panic!("expected nested type, got {:?}", a.members[0]);
    };
    assert_eq!(b.name.text, "B");
    let Member::Nested(c) = &b.members[0] else {
        panic!("expected nested type");
    };
    assert_eq!(c.name.text, "C");
    assert!(c.recovered && b.recovered && a.recovered);
}

#[test]
fn statement_recovery_repairs_the_broken_body() {
    let (unit, diags) = with_errors(indoc! {"
        class A {
            void m() {
                int x = 1;
                int y = ;
                done();
            }
            void n() { }
        }
    "});
    assert!(diags.has_errors());
    let decl = &unit.types[0];
    let Some(Member::Method(m)) = decl
        .members
        .iter()
        .find(|m| matches!(m, Member::Method(method) if method.name.text == "m"))
    else {
        panic!("method m missing");
    };
    let Body::Block(block) = &m.body else {
        panic!("expected repaired block, got {:?}", m.body);
    };
    assert!(block.recovered);
    assert!(block.stmts.iter().any(|s| matches!(
        s,
        Stmt::Local(l) if l.declarators[0].name.text == "x"
    )));
    assert!(
        block
            .stmts
            .iter()
            .any(|s| matches!(s, Stmt::Recovered { .. })),
        "dropped statement should leave a placeholder"
    );
    assert!(
        block
            .stmts
            .iter()
            .any(|s| matches!(s, Stmt::Expr { .. })),
        "statements after the wreck should be reparsed"
    );
    assert!(decl.members.iter().any(|m| matches!(
        m,
        Member::Method(method) if method.name.text == "n"
    )));
}

#[test]
fn disabled_statement_recovery_abandons_the_body() {
    let options = ParseOptions {
        statement_recovery: false,
        ..ParseOptions::default()
    };
    let (unit, diags) = parse_with(
        indoc! {"
            class A {
                void m() {
                    int y = ;
                }
                void n() { }
            }
        "},
        &options,
    )
    .unwrap();
    assert!(diags.has_errors());
    let decl = &unit.types[0];
    let Some(Member::Method(m)) = decl
        .members
        .iter()
        .find(|m| matches!(m, Member::Method(method) if method.name.text == "m"))
    else {
        panic!("method m missing");
    };
    assert!(matches!(m.body, Body::Recovered(_)), "got {:?}", m.body);
    assert!(decl.members.iter().any(|m| matches!(
        m,
        Member::Method(method) if method.name.text == "n"
    )));
}

#[test]
fn wreck_in_one_type_keeps_its_neighbors() {
    let (unit, diags) = with_errors(indoc! {"
        class First { }
        class Broken { int x = ; }
        class Second { }
    "});
    assert!(diags.has_errors());
    let names: Vec<_> = unit.types.iter().map(|t| t.name.text.as_str()).collect();
    assert_eq!(names, ["First", "Broken", "Second"]);
}

#[test]
fn parsing_is_deterministic() {
    let source = indoc! {"
        class A {
            List<String> names = new ArrayList<String>();
            void add(String n) { names.add(n); }
        }
    "};
    let (first, _) = parse(source).unwrap();
    let (second, _) = parse(source).unwrap();
    assert_eq!(first, second);
}

#[test]
fn tree_serializes_to_json() {
    let unit = ok("class A { int x; }");
    let json = serde_json::to_value(&unit).unwrap();
    assert_eq!(json["types"][0]["name"]["text"], "A");
}

#[test]
fn recovery_never_loses_the_package() {
    let (unit, _) = with_errors(indoc! {"
        package com.example;
        class A {
            int x = ;
        }
    "});
    assert_eq!(unit.package.unwrap().name.dotted(), "com.example");
}
