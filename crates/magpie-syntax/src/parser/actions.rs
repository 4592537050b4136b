//! Semantic actions, one per grammar rule tag.
//!
//! Every action runs at the moment its rule reduces, with the right-hand
//! side's spans in `rhs` and the covering span in `span`. Actions move
//! values across the parallel stacks in [`super::stacks`]; the stack
//! discipline is the grammar itself, so every pop states what it expects
//! and a mismatch surfaces as an engine invariant error, never a panic.
//!
//! ## List protocol
//!
//! The `*ListFirst` tags open a group of one on the relevant length stack
//! and `*ListNext` grow it, so a completed list is taken with one
//! `take_list` by whichever rule consumes it. `Modifiers` is the one
//! irregular list: each modifier pushes a bit accumulator on `ints` and
//! marks how many annotation fragments it contributed on `nodes`, and the
//! chaining rule folds both.

use text_size::TextRange;

use crate::Error;
use crate::ast::{
    Annotation, AssignOp, Body, CaseItem, CatchClause, CompilationUnit, EnumConstant, Expr,
    ForInit, ImportDecl, LambdaBody, LambdaParam, LocalVar, Member, Modifiers, ModuleDecl,
    ModuleDirective, PackageDecl, Param, QualifiedName, Stmt, SwitchLabel, SwitchRule,
    SwitchRuleBody, TypeDeclKind, TypeParam, TypeRef, VarDeclarator, WildcardBound,
};
use crate::diagnostics::DiagnosticKind;
use crate::grammar::Action;

use super::engine::{Engine, GoalValue};
use super::headers::{CallableHeader, TypeHeader};
use super::stacks::{Fragment, into_list};

/// Return-type shape of a callable header.
enum Ret {
    Typed,
    Void(TextRange),
    Ctor,
}

impl<'a> Engine<'a> {
    pub(super) fn run_action(
        &mut self,
        action: Action,
        span: TextRange,
        rhs: &[TextRange],
    ) -> Result<(), Error> {
        match action {
            Action::None => Ok(()),

            // --- list bookkeeping ---
            Action::NodesMarkNone => {
                self.stacks.nodes.mark(0);
                Ok(())
            }
            Action::NodesListFirst => {
                self.stacks.nodes.mark(1);
                Ok(())
            }
            Action::NodesListNext => self.stacks.nodes.extend_top(1, "nodes"),
            Action::TypesMarkNone => {
                self.stacks.types.mark(0);
                Ok(())
            }
            Action::TypesListFirst => {
                self.stacks.types.mark(1);
                Ok(())
            }
            Action::TypesListNext => self.stacks.types.extend_top(1, "types"),
            Action::ExprsMarkNone => {
                self.stacks.exprs.mark(0);
                Ok(())
            }
            Action::ExprsListFirst => {
                self.stacks.exprs.mark(1);
                Ok(())
            }
            Action::ExprsListNext => self.stacks.exprs.extend_top(1, "exprs"),

            // --- names ---
            Action::NameSimple => {
                let id = self.ident(rhs[0]);
                self.stacks.idents.push(id);
                self.stacks.idents.mark(1);
                Ok(())
            }
            Action::NameQualified => {
                let id = self.ident(rhs[2]);
                self.stacks.idents.push(id);
                self.stacks.idents.extend_top(1, "idents")
            }
            Action::QNameFirst => {
                let name = self.take_name(span)?;
                self.stacks.nodes.push(Fragment::Name(name));
                self.stacks.nodes.mark(1);
                Ok(())
            }
            Action::QNameNext => {
                let name = self.take_name(rhs[2])?;
                self.stacks.nodes.push(Fragment::Name(name));
                self.stacks.nodes.extend_top(1, "nodes")
            }

            // --- compilation unit ---
            Action::CompilationUnit => self.compilation_unit(span),
            Action::PackageDecl => {
                let name = self.take_name(rhs[1])?;
                self.stacks
                    .nodes
                    .push(Fragment::Package(PackageDecl { name, span }));
                Ok(())
            }
            Action::ImportSingle => self.import(rhs[1], span, false, false),
            Action::ImportOnDemand => self.import(rhs[1], span, false, true),
            Action::ImportStatic => self.import(rhs[2], span, true, false),
            Action::ImportStaticOnDemand => self.import(rhs[2], span, true, true),
            Action::ModuleUnit => {
                self.stacks.nodes.mark(1);
                Ok(())
            }
            Action::ModuleDecl => {
                let directives = into_list(
                    self.stacks.nodes.take_list("nodes")?,
                    Fragment::into_directive,
                )?;
                let name = self.take_name(rhs[1])?;
                self.stacks.nodes.push(Fragment::Module(ModuleDecl {
                    name,
                    directives,
                    span,
                }));
                Ok(())
            }
            Action::DirRequires => self.requires(rhs[1], span, false, false),
            Action::DirRequiresTransitive => self.requires(rhs[2], span, true, false),
            Action::DirRequiresStatic => self.requires(rhs[2], span, false, true),
            Action::DirExports => {
                let name = self.take_name(rhs[1])?;
                self.push_directive(ModuleDirective::Exports {
                    name,
                    to: Vec::new(),
                    span,
                })
            }
            Action::DirExportsTo => {
                let to = self.name_list()?;
                let name = self.take_name(rhs[1])?;
                self.push_directive(ModuleDirective::Exports { name, to, span })
            }
            Action::DirOpens => {
                let name = self.take_name(rhs[1])?;
                self.push_directive(ModuleDirective::Opens {
                    name,
                    to: Vec::new(),
                    span,
                })
            }
            Action::DirOpensTo => {
                let to = self.name_list()?;
                let name = self.take_name(rhs[1])?;
                self.push_directive(ModuleDirective::Opens { name, to, span })
            }
            Action::DirUses => {
                let name = self.take_name(rhs[1])?;
                self.push_directive(ModuleDirective::Uses { name, span })
            }
            Action::DirProvides => {
                let with = self.name_list()?;
                let service = self.take_name(rhs[1])?;
                self.push_directive(ModuleDirective::Provides {
                    service,
                    with,
                    span,
                })
            }

            // --- types ---
            Action::TypePrimitive => {
                self.stacks.types.push(TypeRef::Primitive {
                    name: self.text(span).to_owned(),
                    span,
                });
                Ok(())
            }
            Action::TypeNamed => {
                let name = self.take_name(span)?;
                self.stacks.types.push(TypeRef::Named { name });
                Ok(())
            }
            Action::TypeGeneric => {
                let args = self.stacks.types.take_list("types")?;
                let name = self.take_name(rhs[0])?;
                self.stacks.types.push(TypeRef::Generic { name, args, span });
                Ok(())
            }
            Action::TypeArray => {
                let dims = self.stacks.ints.pop("ints")?;
                let elem = self.stacks.types.pop("types")?;
                self.stacks.types.push(TypeRef::Array {
                    elem: Box::new(elem),
                    dims,
                    span,
                });
                Ok(())
            }
            Action::TypeWildcard => {
                self.stacks
                    .types
                    .push(TypeRef::Wildcard { bound: None, span });
                Ok(())
            }
            Action::TypeWildcardExtends => self.wildcard(WildcardBound::Extends, span),
            Action::TypeWildcardSuper => self.wildcard(WildcardBound::Super, span),
            Action::DimsFirst => {
                self.stacks.ints.push(1);
                Ok(())
            }
            Action::DimsNext => {
                let n = self.stacks.ints.pop("ints")?;
                self.stacks.ints.push(n + 1);
                Ok(())
            }
            Action::TypeParamPlain => {
                let name = self.ident(rhs[0]);
                self.stacks.nodes.push(Fragment::TypeParam(TypeParam {
                    name,
                    bound: None,
                    span,
                }));
                Ok(())
            }
            Action::TypeParamBounded => {
                let bound = self.stacks.types.pop("types")?;
                let name = self.ident(rhs[0]);
                self.stacks.nodes.push(Fragment::TypeParam(TypeParam {
                    name,
                    bound: Some(bound),
                    span,
                }));
                Ok(())
            }

            // --- declarations ---
            Action::ClassHeader => self.type_header(TypeDeclKind::Class, span, rhs[2], true),
            Action::InterfaceHeader => {
                self.type_header(TypeDeclKind::Interface, span, rhs[2], false)
            }
            Action::EnumHeader => self.enum_header(span, rhs[2]),
            Action::RecordHeader => self.record_header(span, rhs[2]),
            Action::ClassDecl | Action::InterfaceDecl | Action::RecordDecl => {
                let members = self.stacks.nodes.pop("nodes")?.into_members()?;
                let header = self.stacks.nodes.pop("nodes")?.into_type_header()?;
                let decl = header.into_decl(members, span.end(), false);
                self.stacks.nodes.push(Fragment::Type(decl));
                Ok(())
            }
            Action::EnumDecl => {
                let (constants, members) = match self.stacks.nodes.pop("nodes")? {
                    Fragment::EnumParts { constants, members } => (constants, members),
                    other => return Err(other.mismatch("enum body")),
                };
                let header = self.stacks.nodes.pop("nodes")?.into_type_header()?;
                let mut decl = header.into_decl(members, span.end(), false);
                decl.enum_constants = constants;
                self.stacks.nodes.push(Fragment::Type(decl));
                Ok(())
            }
            Action::EnumBody => {
                let members =
                    into_list(self.stacks.nodes.take_list("nodes")?, Fragment::into_member)?;
                let constants = into_list(
                    self.stacks.nodes.take_list("nodes")?,
                    Fragment::into_enum_const,
                )?;
                self.stacks
                    .nodes
                    .push(Fragment::EnumParts { constants, members });
                Ok(())
            }
            Action::EnumConstPlain => {
                self.push_enum_const(span, rhs[0], Vec::new(), None)
            }
            Action::EnumConstArgs => {
                let args = self.stacks.exprs.take_list("exprs")?;
                self.push_enum_const(span, rhs[0], args, None)
            }
            Action::EnumConstBody => {
                let members = self.stacks.nodes.pop("nodes")?.into_members()?;
                self.push_enum_const(span, rhs[0], Vec::new(), Some(members))
            }
            Action::EnumConstArgsBody => {
                let members = self.stacks.nodes.pop("nodes")?.into_members()?;
                let args = self.stacks.exprs.take_list("exprs")?;
                self.push_enum_const(span, rhs[0], args, Some(members))
            }
            Action::ClassBody => {
                let members =
                    into_list(self.stacks.nodes.take_list("nodes")?, Fragment::into_member)?;
                self.stacks.nodes.push(Fragment::Members(members));
                Ok(())
            }
            Action::NestedTypeMember => {
                let decl = self.stacks.nodes.pop("nodes")?.into_type()?;
                self.stacks.nodes.push(Fragment::Member(Member::Nested(decl)));
                Ok(())
            }
            Action::InstanceInit => self.initializer(span, false),
            Action::StaticInit => self.initializer(span, true),
            Action::EmptyMember => {
                self.stacks
                    .nodes
                    .push(Fragment::Member(Member::Empty { span }));
                Ok(())
            }
            Action::FieldDecl => self.field_decl(span),
            Action::VarPlain => self.declarator(span, rhs[0], 0, false),
            Action::VarDims => {
                let dims = self.stacks.ints.pop("ints")?;
                self.declarator(span, rhs[0], dims, false)
            }
            Action::VarInit => self.declarator(span, rhs[0], 0, true),
            Action::VarDimsInit => {
                let init = self.stacks.exprs.pop("exprs")?;
                let dims = self.stacks.ints.pop("ints")?;
                self.stacks.exprs.push(init);
                self.declarator(span, rhs[0], dims, true)
            }
            Action::ArrayInitEmpty => {
                self.stacks.exprs.push(Expr::ArrayLit {
                    elems: Vec::new(),
                    span,
                });
                Ok(())
            }
            Action::ArrayInitList => {
                let elems = self.stacks.exprs.take_list("exprs")?;
                self.stacks.exprs.push(Expr::ArrayLit { elems, span });
                Ok(())
            }
            Action::MethodHeader => self.callable_header(span, rhs[2], Ret::Typed),
            Action::MethodHeaderVoid => self.callable_header(span, rhs[2], Ret::Void(rhs[1])),
            Action::ConstructorHeader => self.callable_header(span, rhs[1], Ret::Ctor),
            Action::MethodDecl => {
                let body = self.stacks.nodes.pop("nodes")?.into_body()?;
                let header = self.stacks.nodes.pop("nodes")?.into_callable()?;
                let member = Member::Method(header.into_method(body, span.end()));
                self.stacks.nodes.push(Fragment::Member(member));
                Ok(())
            }
            Action::ConstructorDecl => {
                let block = self.stacks.nodes.pop("nodes")?.into_block()?;
                let body = match self.pending_skip.take() {
                    Some(range) => Body::Skipped(range),
                    None => Body::Block(block),
                };
                let header = self.stacks.nodes.pop("nodes")?.into_callable()?;
                let member = Member::Constructor(header.into_constructor(body, span.end()));
                self.stacks.nodes.push(Fragment::Member(member));
                Ok(())
            }
            Action::ParamPlain => self.param(span, rhs[1], false),
            Action::ParamVariadic => self.param(span, rhs[2], true),
            Action::BodyBlock => {
                let block = self.stacks.nodes.pop("nodes")?.into_block()?;
                let body = match self.pending_skip.take() {
                    Some(range) => Body::Skipped(range),
                    None => Body::Block(block),
                };
                self.stacks.nodes.push(Fragment::Body(body));
                Ok(())
            }
            Action::BodyAbsent => {
                self.stacks.nodes.push(Fragment::Body(Body::Absent));
                Ok(())
            }

            // --- modifiers and annotations ---
            Action::ModifiersNone => {
                self.stacks.ints.push(0);
                self.stacks.nodes.mark(0);
                Ok(())
            }
            Action::ModifiersNext => {
                let added = self.stacks.ints.pop("ints")?;
                let acc = self.stacks.ints.pop("ints")?;
                if added != 0 && acc & added != 0 {
                    let word = self.text(rhs[1]).to_owned();
                    self.diagnostics
                        .report(DiagnosticKind::DuplicateModifier, rhs[1])
                        .detail(word)
                        .emit();
                }
                self.stacks.ints.push(acc | added);
                self.stacks.nodes.concat_top("nodes")
            }
            Action::ModifierWord | Action::ModifierStatic | Action::ModifierDefault => {
                let bit = Modifiers::bit_for(self.text(span)).unwrap_or(0);
                self.stacks.ints.push(bit);
                self.stacks.nodes.mark(0);
                Ok(())
            }
            Action::ModifierAnnotation => {
                // The annotation fragment is already on `nodes`.
                self.stacks.ints.push(0);
                self.stacks.nodes.mark(1);
                Ok(())
            }
            Action::AnnotationMarker => {
                let name = self.take_name(rhs[1])?;
                self.stacks.nodes.push(Fragment::Annotation(Annotation {
                    name,
                    args: Vec::new(),
                    span,
                }));
                Ok(())
            }
            Action::AnnotationArgs => {
                let args = self.stacks.exprs.take_list("exprs")?;
                let name = self.take_name(rhs[1])?;
                self.stacks
                    .nodes
                    .push(Fragment::Annotation(Annotation { name, args, span }));
                Ok(())
            }

            // --- statements ---
            Action::Block => {
                let stmts =
                    into_list(self.stacks.nodes.take_list("nodes")?, Fragment::into_stmt)?;
                let block = crate::ast::Block {
                    stmts,
                    contains_comment: self.comment_inside(span),
                    recovered: false,
                    span,
                };
                self.stacks.nodes.push(Fragment::Stmt(Stmt::Block(block)));
                Ok(())
            }
            Action::EmptyStmt => self.push_stmt(Stmt::Empty { span }),
            Action::ExprStmt => {
                let expr = self.stacks.exprs.pop("exprs")?;
                self.push_stmt(Stmt::Expr { expr, span })
            }
            Action::LocalTypeDeclStmt => {
                let decl = self.stacks.nodes.pop("nodes")?.into_type()?;
                self.push_stmt(Stmt::TypeDecl(Box::new(decl)))
            }
            Action::LocalVar => self.local_var(span, false),
            Action::LocalVarMods => self.local_var(span, true),
            Action::LocalVarInferred => self.local_var_inferred(span, rhs, false),
            Action::LocalVarInferredMods => self.local_var_inferred(span, rhs, true),
            Action::If => {
                let then_branch = Box::new(self.pop_stmt()?);
                let cond = self.stacks.exprs.pop("exprs")?;
                self.push_stmt(Stmt::If {
                    cond,
                    then_branch,
                    else_branch: None,
                    span,
                })
            }
            Action::IfElse => {
                let else_branch = Some(Box::new(self.pop_stmt()?));
                let then_branch = Box::new(self.pop_stmt()?);
                let cond = self.stacks.exprs.pop("exprs")?;
                self.push_stmt(Stmt::If {
                    cond,
                    then_branch,
                    else_branch,
                    span,
                })
            }
            Action::While => {
                let body = Box::new(self.pop_stmt()?);
                let cond = self.stacks.exprs.pop("exprs")?;
                self.push_stmt(Stmt::While { cond, body, span })
            }
            Action::DoWhile => {
                let cond = self.stacks.exprs.pop("exprs")?;
                let body = Box::new(self.pop_stmt()?);
                self.push_stmt(Stmt::DoWhile { body, cond, span })
            }
            Action::ForBasic => {
                let body = Box::new(self.pop_stmt()?);
                let update = self.stacks.exprs.take_list("exprs")?;
                let cond = self.stacks.exprs.take_list("exprs")?.pop();
                let init = self.stacks.nodes.pop("nodes")?.into_for_init()?;
                self.push_stmt(Stmt::For {
                    init,
                    cond,
                    update,
                    body,
                    span,
                })
            }
            Action::ForEach => {
                let body = Box::new(self.pop_stmt()?);
                let iterable = self.stacks.exprs.pop("exprs")?;
                let ty = Some(self.stacks.types.pop("types")?);
                self.push_stmt(Stmt::ForEach {
                    ty,
                    name: self.ident(rhs[3]),
                    iterable,
                    body,
                    span,
                })
            }
            Action::ForEachVar => {
                let body = Box::new(self.pop_stmt()?);
                let iterable = self.stacks.exprs.pop("exprs")?;
                self.push_stmt(Stmt::ForEach {
                    ty: None,
                    name: self.ident(rhs[3]),
                    iterable,
                    body,
                    span,
                })
            }
            Action::ForInitNone => {
                self.stacks.nodes.push(Fragment::ForInit(ForInit::None));
                Ok(())
            }
            Action::ForInitLocal => {
                let local = match self.pop_stmt()? {
                    Stmt::Local(local) => local,
                    _ => {
                        return Err(Error::WrongFragment {
                            stack: "nodes",
                            expected: "local declaration",
                            rule: String::new(),
                        });
                    }
                };
                self.stacks
                    .nodes
                    .push(Fragment::ForInit(ForInit::Local(local)));
                Ok(())
            }
            Action::ForInitExprs => {
                let exprs = self.stacks.exprs.take_list("exprs")?;
                self.stacks
                    .nodes
                    .push(Fragment::ForInit(ForInit::Exprs(exprs)));
                Ok(())
            }
            Action::SwitchStmt => {
                let rules = self.stacks.nodes.pop("nodes")?.into_rule_list()?;
                let scrutinee = self.stacks.exprs.pop("exprs")?;
                self.push_stmt(Stmt::Switch {
                    scrutinee,
                    rules,
                    span,
                })
            }
            Action::SwitchBlock => {
                let rules =
                    into_list(self.stacks.nodes.take_list("nodes")?, Fragment::into_rule)?;
                self.stacks.nodes.push(Fragment::RuleList(rules));
                Ok(())
            }
            Action::SwitchRule => {
                let body = self.stacks.nodes.pop("nodes")?.into_rule_body()?;
                let label = self.stacks.nodes.pop("nodes")?.into_label()?;
                self.stacks
                    .nodes
                    .push(Fragment::Rule(SwitchRule { label, body, span }));
                Ok(())
            }
            Action::LabelCase => {
                let items =
                    into_list(self.stacks.nodes.take_list("nodes")?, Fragment::into_case)?;
                self.stacks
                    .nodes
                    .push(Fragment::Label(SwitchLabel::Case { items, span }));
                Ok(())
            }
            Action::LabelDefault => {
                self.stacks
                    .nodes
                    .push(Fragment::Label(SwitchLabel::Default { span }));
                Ok(())
            }
            Action::CaseExpr => {
                let expr = self.stacks.exprs.pop("exprs")?;
                self.stacks.nodes.push(Fragment::Case(CaseItem::Expr(expr)));
                Ok(())
            }
            Action::CasePattern => {
                let ty = self.stacks.types.pop("types")?;
                self.stacks.nodes.push(Fragment::Case(CaseItem::Pattern {
                    ty,
                    name: self.ident(rhs[1]),
                    span,
                }));
                Ok(())
            }
            Action::RuleExprBody => {
                let expr = self.stacks.exprs.pop("exprs")?;
                self.stacks
                    .nodes
                    .push(Fragment::RuleBody(SwitchRuleBody::Expr(expr)));
                Ok(())
            }
            Action::RuleBlockBody => {
                let block = self.stacks.nodes.pop("nodes")?.into_block()?;
                self.stacks
                    .nodes
                    .push(Fragment::RuleBody(SwitchRuleBody::Block(block)));
                Ok(())
            }
            Action::RuleThrowBody => {
                let (expr, throw_span) = match self.pop_stmt()? {
                    Stmt::Throw { expr, span } => (expr, span),
                    _ => {
                        return Err(Error::WrongFragment {
                            stack: "nodes",
                            expected: "throw statement",
                            rule: String::new(),
                        });
                    }
                };
                self.stacks.nodes.push(Fragment::RuleBody(SwitchRuleBody::Throw {
                    expr,
                    span: throw_span,
                }));
                Ok(())
            }
            Action::Break => self.push_stmt(Stmt::Break { span }),
            Action::Continue => self.push_stmt(Stmt::Continue { span }),
            Action::ReturnVoid => self.push_stmt(Stmt::Return { value: None, span }),
            Action::Return => {
                let value = Some(self.stacks.exprs.pop("exprs")?);
                self.push_stmt(Stmt::Return { value, span })
            }
            Action::Throw => {
                let expr = self.stacks.exprs.pop("exprs")?;
                self.push_stmt(Stmt::Throw { expr, span })
            }
            Action::TryCatch => {
                let catches =
                    into_list(self.stacks.nodes.take_list("nodes")?, Fragment::into_catch)?;
                let block = self.stacks.nodes.pop("nodes")?.into_block()?;
                self.push_stmt(Stmt::Try {
                    block,
                    catches,
                    finally: None,
                    span,
                })
            }
            Action::TryCatchFinally => {
                let finally = Some(self.stacks.nodes.pop("nodes")?.into_block()?);
                let catches =
                    into_list(self.stacks.nodes.take_list("nodes")?, Fragment::into_catch)?;
                let block = self.stacks.nodes.pop("nodes")?.into_block()?;
                self.push_stmt(Stmt::Try {
                    block,
                    catches,
                    finally,
                    span,
                })
            }
            Action::TryFinally => {
                let finally = Some(self.stacks.nodes.pop("nodes")?.into_block()?);
                let block = self.stacks.nodes.pop("nodes")?.into_block()?;
                self.push_stmt(Stmt::Try {
                    block,
                    catches: Vec::new(),
                    finally,
                    span,
                })
            }
            Action::CatchClause => {
                let body = self.stacks.nodes.pop("nodes")?.into_block()?;
                let ty = self.stacks.types.pop("types")?;
                self.stacks.nodes.push(Fragment::Catch(CatchClause {
                    ty,
                    name: self.ident(rhs[3]),
                    body,
                    span,
                }));
                Ok(())
            }

            // --- expressions ---
            Action::Assign => self.assignment(span, AssignOp::Assign),
            Action::CompoundAssign => {
                let op = AssignOp::from_lexeme(self.text(rhs[1])).unwrap_or(AssignOp::Assign);
                self.assignment(span, op)
            }
            Action::Ternary => {
                let else_expr = Box::new(self.stacks.exprs.pop("exprs")?);
                let then_expr = Box::new(self.stacks.exprs.pop("exprs")?);
                let cond = Box::new(self.stacks.exprs.pop("exprs")?);
                self.stacks.exprs.push(Expr::Ternary {
                    cond,
                    then_expr,
                    else_expr,
                    span,
                });
                Ok(())
            }
            Action::Binary(op) => {
                let rhs_expr = Box::new(self.stacks.exprs.pop("exprs")?);
                let lhs_expr = Box::new(self.stacks.exprs.pop("exprs")?);
                self.stacks.exprs.push(Expr::Binary {
                    op,
                    lhs: lhs_expr,
                    rhs: rhs_expr,
                    span,
                });
                Ok(())
            }
            Action::InstanceofType => {
                let ty = self.stacks.types.pop("types")?;
                let operand = Box::new(self.stacks.exprs.pop("exprs")?);
                self.stacks.exprs.push(Expr::Instanceof {
                    operand,
                    ty,
                    binding: None,
                    span,
                });
                Ok(())
            }
            Action::InstanceofPattern => {
                let binding = Some(self.ident(rhs[3]));
                let ty = self.stacks.types.pop("types")?;
                let operand = Box::new(self.stacks.exprs.pop("exprs")?);
                self.stacks.exprs.push(Expr::Instanceof {
                    operand,
                    ty,
                    binding,
                    span,
                });
                Ok(())
            }
            Action::Unary(op) | Action::Postfix(op) => {
                let operand = Box::new(self.stacks.exprs.pop("exprs")?);
                self.stacks.exprs.push(Expr::Unary { op, operand, span });
                Ok(())
            }
            Action::CastExpr => self.cast_cover(span, rhs),
            Action::CastGeneric => {
                let operand = Box::new(self.stacks.exprs.pop("exprs")?);
                let args = self.stacks.types.take_list("types")?;
                let name = self.take_name(rhs[1])?;
                let ty_span = TextRange::new(rhs[1].start(), rhs[2].end());
                let ty = TypeRef::Generic {
                    name,
                    args,
                    span: ty_span,
                };
                self.stacks.exprs.push(Expr::Cast { ty, operand, span });
                Ok(())
            }
            Action::CastNameArray => {
                let operand = Box::new(self.stacks.exprs.pop("exprs")?);
                let dims = self.stacks.ints.pop("ints")?;
                let name = self.take_name(rhs[1])?;
                let ty_span = TextRange::new(rhs[1].start(), rhs[2].end());
                let ty = TypeRef::Array {
                    elem: Box::new(TypeRef::Named { name }),
                    dims,
                    span: ty_span,
                };
                self.stacks.exprs.push(Expr::Cast { ty, operand, span });
                Ok(())
            }
            Action::CastPrimitive => {
                let operand = Box::new(self.stacks.exprs.pop("exprs")?);
                let ty = self.stacks.types.pop("types")?;
                self.stacks.exprs.push(Expr::Cast { ty, operand, span });
                Ok(())
            }
            Action::CastPrimArray => {
                let operand = Box::new(self.stacks.exprs.pop("exprs")?);
                let dims = self.stacks.ints.pop("ints")?;
                let elem = self.stacks.types.pop("types")?;
                let ty_span = TextRange::new(rhs[1].start(), rhs[2].end());
                let ty = TypeRef::Array {
                    elem: Box::new(elem),
                    dims,
                    span: ty_span,
                };
                self.stacks.exprs.push(Expr::Cast { ty, operand, span });
                Ok(())
            }
            Action::ExprName => {
                let name = self.take_name(span)?;
                self.stacks.exprs.push(Expr::Name(name));
                Ok(())
            }
            Action::Literal(kind) => {
                self.stacks.exprs.push(Expr::Literal {
                    kind,
                    text: self.text(span).to_owned(),
                    span,
                });
                Ok(())
            }
            Action::This => {
                self.stacks.exprs.push(Expr::This { span });
                Ok(())
            }
            Action::ParenExpr => {
                let inner = Box::new(self.stacks.exprs.pop("exprs")?);
                self.stacks.exprs.push(Expr::Paren { inner, span });
                Ok(())
            }
            Action::FieldAccess => {
                let target = Box::new(self.stacks.exprs.pop("exprs")?);
                self.stacks.exprs.push(Expr::Field {
                    target,
                    name: self.ident(rhs[2]),
                    span,
                });
                Ok(())
            }
            Action::SuperField => {
                let target = Box::new(Expr::Super { span: rhs[0] });
                self.stacks.exprs.push(Expr::Field {
                    target,
                    name: self.ident(rhs[2]),
                    span,
                });
                Ok(())
            }
            Action::InvokeName => {
                let args = self.stacks.exprs.take_list("exprs")?;
                let name = self.take_name(rhs[0])?;
                self.push_call(Expr::Name(name), args, span)
            }
            Action::InvokeExpr => {
                let args = self.stacks.exprs.take_list("exprs")?;
                let target = Box::new(self.stacks.exprs.pop("exprs")?);
                let callee = Expr::Field {
                    target,
                    name: self.ident(rhs[2]),
                    span: TextRange::new(span.start(), rhs[2].end()),
                };
                self.push_call(callee, args, span)
            }
            Action::InvokeSuperMethod => {
                let args = self.stacks.exprs.take_list("exprs")?;
                let callee = Expr::Field {
                    target: Box::new(Expr::Super { span: rhs[0] }),
                    name: self.ident(rhs[2]),
                    span: TextRange::new(rhs[0].start(), rhs[2].end()),
                };
                self.push_call(callee, args, span)
            }
            Action::InvokeSuperCtor => {
                let args = self.stacks.exprs.take_list("exprs")?;
                self.push_call(Expr::Super { span: rhs[0] }, args, span)
            }
            Action::InvokeThisCtor => {
                let args = self.stacks.exprs.take_list("exprs")?;
                self.push_call(Expr::This { span: rhs[0] }, args, span)
            }
            Action::IndexName => {
                let index = Box::new(self.stacks.exprs.pop("exprs")?);
                let name = self.take_name(rhs[0])?;
                self.stacks.exprs.push(Expr::Index {
                    target: Box::new(Expr::Name(name)),
                    index,
                    span,
                });
                Ok(())
            }
            Action::IndexExpr => {
                let index = Box::new(self.stacks.exprs.pop("exprs")?);
                let target = Box::new(self.stacks.exprs.pop("exprs")?);
                self.stacks.exprs.push(Expr::Index {
                    target,
                    index,
                    span,
                });
                Ok(())
            }
            Action::New => {
                let args = self.stacks.exprs.take_list("exprs")?;
                let ty = self.stacks.types.pop("types")?;
                self.stacks.exprs.push(Expr::New {
                    ty,
                    args,
                    body: None,
                    span,
                });
                Ok(())
            }
            Action::NewAnon => {
                let members = self.stacks.nodes.pop("nodes")?.into_members()?;
                let args = self.stacks.exprs.take_list("exprs")?;
                let ty = self.stacks.types.pop("types")?;
                self.stacks.exprs.push(Expr::New {
                    ty,
                    args,
                    body: Some(members),
                    span,
                });
                Ok(())
            }
            Action::NewArraySized => {
                let dim_exprs = self.stacks.exprs.take_list("exprs")?;
                let elem = self.stacks.types.pop("types")?;
                self.stacks.exprs.push(Expr::NewArray {
                    elem,
                    dim_exprs,
                    dims: 0,
                    init: None,
                    span,
                });
                Ok(())
            }
            Action::NewArrayInitd => {
                let elems = match self.stacks.exprs.pop("exprs")? {
                    Expr::ArrayLit { elems, .. } => elems,
                    _ => {
                        return Err(Error::WrongFragment {
                            stack: "exprs",
                            expected: "array initializer",
                            rule: String::new(),
                        });
                    }
                };
                let dims = self.stacks.ints.pop("ints")?;
                let elem = self.stacks.types.pop("types")?;
                self.stacks.exprs.push(Expr::NewArray {
                    elem,
                    dim_exprs: Vec::new(),
                    dims,
                    init: Some(elems),
                    span,
                });
                Ok(())
            }
            Action::LambdaIdent => {
                let body = Box::new(self.stacks.nodes.pop("nodes")?.into_lambda_body()?);
                let params = vec![LambdaParam::Inferred {
                    name: self.ident(rhs[0]),
                }];
                self.stacks.exprs.push(Expr::Lambda { params, body, span });
                Ok(())
            }
            Action::LambdaParens => {
                let body = Box::new(self.stacks.nodes.pop("nodes")?.into_lambda_body()?);
                let params = into_list(
                    self.stacks.nodes.take_list("nodes")?,
                    Fragment::into_lambda_param,
                )?;
                self.stacks.exprs.push(Expr::Lambda { params, body, span });
                Ok(())
            }
            Action::LambdaParamPlain => {
                self.stacks
                    .nodes
                    .push(Fragment::LambdaParam(LambdaParam::Inferred {
                        name: self.ident(rhs[0]),
                    }));
                Ok(())
            }
            Action::LambdaParamTyped => {
                let ty = self.stacks.types.pop("types")?;
                self.stacks
                    .nodes
                    .push(Fragment::LambdaParam(LambdaParam::Typed {
                        ty,
                        name: self.ident(rhs[1]),
                    }));
                Ok(())
            }
            Action::LambdaBodyExpr => {
                let expr = self.stacks.exprs.pop("exprs")?;
                self.stacks
                    .nodes
                    .push(Fragment::LambdaBody(LambdaBody::Expr(expr)));
                Ok(())
            }
            Action::LambdaBodyBlock => {
                let block = self.stacks.nodes.pop("nodes")?.into_block()?;
                self.stacks
                    .nodes
                    .push(Fragment::LambdaBody(LambdaBody::Block(block)));
                Ok(())
            }

            // --- goal acceptance ---
            Action::AcceptUnit => {
                let unit = self.stacks.nodes.pop("nodes")?.into_unit()?;
                self.result = Some(GoalValue::Unit(unit));
                Ok(())
            }
            Action::AcceptBlock => {
                let stmts =
                    into_list(self.stacks.nodes.take_list("nodes")?, Fragment::into_stmt)?;
                self.result = Some(GoalValue::Block(stmts));
                Ok(())
            }
            Action::AcceptExpr => {
                let expr = self.stacks.exprs.pop("exprs")?;
                self.result = Some(GoalValue::Expr(expr));
                Ok(())
            }
        }
    }
}

/// Builders shared by the dispatcher arms above. Each pops its rule's
/// operands in reverse push order.
impl<'a> Engine<'a> {
    /// Modifier bits plus the annotation group left by `ModifiersOpt`.
    fn modifier_parts(&mut self) -> Result<(Modifiers, Vec<Annotation>), Error> {
        let annotations = into_list(
            self.stacks.nodes.take_list("nodes")?,
            Fragment::into_annotation,
        )?;
        let bits = self.stacks.ints.pop("ints")?;
        Ok((Modifiers(bits), annotations))
    }

    fn compilation_unit(&mut self, span: TextRange) -> Result<(), Error> {
        let body = self.stacks.nodes.take_list("nodes")?;
        let imports = into_list(
            self.stacks.nodes.take_list("nodes")?,
            Fragment::into_import,
        )?;
        let package = into_list(
            self.stacks.nodes.take_list("nodes")?,
            Fragment::into_package,
        )?
        .pop();
        let mut types = Vec::new();
        let mut module = None;
        for frag in body {
            match frag {
                Fragment::Type(decl) => types.push(decl),
                Fragment::Module(decl) => module = Some(decl),
                other => return Err(other.mismatch("type or module declaration")),
            }
        }
        self.stacks.nodes.push(Fragment::Unit(CompilationUnit {
            package,
            imports,
            types,
            module,
            recovered: false,
            span,
        }));
        Ok(())
    }

    fn import(
        &mut self,
        name_span: TextRange,
        span: TextRange,
        is_static: bool,
        on_demand: bool,
    ) -> Result<(), Error> {
        let name = self.take_name(name_span)?;
        self.stacks.nodes.push(Fragment::Import(ImportDecl {
            name,
            is_static,
            on_demand,
            span,
        }));
        Ok(())
    }

    fn requires(
        &mut self,
        name_span: TextRange,
        span: TextRange,
        transitive: bool,
        is_static: bool,
    ) -> Result<(), Error> {
        let name = self.take_name(name_span)?;
        self.push_directive(ModuleDirective::Requires {
            name,
            transitive,
            is_static,
            span,
        })
    }

    fn push_directive(&mut self, directive: ModuleDirective) -> Result<(), Error> {
        self.stacks.nodes.push(Fragment::Directive(directive));
        Ok(())
    }

    /// The `NameList` group left on `nodes` by `to`/`with` clauses.
    fn name_list(&mut self) -> Result<Vec<QualifiedName>, Error> {
        into_list(self.stacks.nodes.take_list("nodes")?, Fragment::into_name)
    }

    fn wildcard(&mut self, kind: WildcardBound, span: TextRange) -> Result<(), Error> {
        let bound = self.stacks.types.pop("types")?;
        self.stacks.types.push(TypeRef::Wildcard {
            bound: Some((kind, Box::new(bound))),
            span,
        });
        Ok(())
    }

    /// Class and interface headers. A class carries both a superclass group
    /// and an implements group on `types`; an interface only its extends
    /// group.
    fn type_header(
        &mut self,
        kind: TypeDeclKind,
        span: TextRange,
        name_span: TextRange,
        has_superclass: bool,
    ) -> Result<(), Error> {
        let (extends, implements) = if has_superclass {
            let implements = self.stacks.types.take_list("types")?;
            let extends = self.stacks.types.take_list("types")?;
            (extends, implements)
        } else {
            (self.stacks.types.take_list("types")?, Vec::new())
        };
        let type_params = into_list(
            self.stacks.nodes.take_list("nodes")?,
            Fragment::into_type_param,
        )?;
        self.finish_type_header(kind, span, name_span, type_params, extends, implements, Vec::new())
    }

    fn enum_header(&mut self, span: TextRange, name_span: TextRange) -> Result<(), Error> {
        let implements = self.stacks.types.take_list("types")?;
        self.finish_type_header(
            TypeDeclKind::Enum,
            span,
            name_span,
            Vec::new(),
            Vec::new(),
            implements,
            Vec::new(),
        )
    }

    fn record_header(&mut self, span: TextRange, name_span: TextRange) -> Result<(), Error> {
        let implements = self.stacks.types.take_list("types")?;
        let record_params = into_list(
            self.stacks.nodes.take_list("nodes")?,
            Fragment::into_param,
        )?;
        let type_params = into_list(
            self.stacks.nodes.take_list("nodes")?,
            Fragment::into_type_param,
        )?;
        self.finish_type_header(
            TypeDeclKind::Record,
            span,
            name_span,
            type_params,
            Vec::new(),
            implements,
            record_params,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn finish_type_header(
        &mut self,
        kind: TypeDeclKind,
        span: TextRange,
        name_span: TextRange,
        type_params: Vec<TypeParam>,
        extends: Vec<TypeRef>,
        implements: Vec<TypeRef>,
        record_params: Vec<Param>,
    ) -> Result<(), Error> {
        let (modifiers, annotations) = self.modifier_parts()?;
        let header = TypeHeader {
            kind,
            name: self.ident(name_span),
            modifiers,
            annotations,
            type_params,
            extends,
            implements,
            record_params,
            doc: self.doc_for(span.start()),
            start: span.start(),
        };
        self.arm_type_open(header.clone());
        self.stacks.nodes.push(Fragment::TypeHeader(header));
        Ok(())
    }

    fn callable_header(
        &mut self,
        span: TextRange,
        name_span: TextRange,
        ret: Ret,
    ) -> Result<(), Error> {
        let throws = self.stacks.types.take_list("types")?;
        let return_type = match ret {
            Ret::Typed => Some(self.stacks.types.pop("types")?),
            Ret::Void(void_span) => Some(TypeRef::Void { span: void_span }),
            Ret::Ctor => None,
        };
        let params = into_list(self.stacks.nodes.take_list("nodes")?, Fragment::into_param)?;
        let (modifiers, annotations) = self.modifier_parts()?;
        let header = CallableHeader {
            modifiers,
            annotations,
            return_type,
            name: self.ident(name_span),
            params,
            throws,
            doc: self.doc_for(span.start()),
            start: span.start(),
        };
        self.arm_member_open(header.clone());
        self.stacks.nodes.push(Fragment::Callable(header));
        Ok(())
    }

    fn push_enum_const(
        &mut self,
        span: TextRange,
        name_span: TextRange,
        args: Vec<Expr>,
        body: Option<Vec<Member>>,
    ) -> Result<(), Error> {
        let constant = EnumConstant {
            name: self.ident(name_span),
            args,
            body,
            span,
        };
        self.stacks.nodes.push(Fragment::EnumConst(constant));
        Ok(())
    }

    fn initializer(&mut self, span: TextRange, is_static: bool) -> Result<(), Error> {
        let body = self.stacks.nodes.pop("nodes")?.into_block()?;
        self.stacks
            .nodes
            .push(Fragment::Member(Member::Initializer {
                is_static,
                body,
                span,
            }));
        Ok(())
    }

    fn field_decl(&mut self, span: TextRange) -> Result<(), Error> {
        let declarators = into_list(
            self.stacks.nodes.take_list("nodes")?,
            Fragment::into_declarator,
        )?;
        let ty = self.stacks.types.pop("types")?;
        let (modifiers, annotations) = self.modifier_parts()?;
        let field = crate::ast::FieldDecl {
            modifiers,
            annotations,
            ty,
            declarators,
            doc: self.doc_for(span.start()),
            span,
        };
        self.stacks.nodes.push(Fragment::Member(Member::Field(field)));
        Ok(())
    }

    fn declarator(
        &mut self,
        span: TextRange,
        name_span: TextRange,
        dims: u32,
        has_init: bool,
    ) -> Result<(), Error> {
        let init = if has_init {
            Some(self.stacks.exprs.pop("exprs")?)
        } else {
            None
        };
        self.stacks.nodes.push(Fragment::Declarator(VarDeclarator {
            name: self.ident(name_span),
            dims,
            init,
            span,
        }));
        Ok(())
    }

    fn param(&mut self, span: TextRange, name_span: TextRange, variadic: bool) -> Result<(), Error> {
        let ty = self.stacks.types.pop("types")?;
        self.stacks.nodes.push(Fragment::Param(Param {
            ty,
            name: self.ident(name_span),
            variadic,
            span,
        }));
        Ok(())
    }

    fn local_var(&mut self, span: TextRange, has_modifiers: bool) -> Result<(), Error> {
        let declarators = into_list(
            self.stacks.nodes.take_list("nodes")?,
            Fragment::into_declarator,
        )?;
        let ty = self.stacks.types.pop("types")?;
        let (modifiers, annotations) = if has_modifiers {
            self.modifier_parts()?
        } else {
            (Modifiers(0), Vec::new())
        };
        self.push_stmt(Stmt::Local(LocalVar {
            modifiers,
            annotations,
            ty,
            declarators,
            span,
        }))
    }

    /// `var x = init` carries no declarator list, so one is synthesized
    /// around the initializer popped off `exprs`.
    fn local_var_inferred(
        &mut self,
        span: TextRange,
        rhs: &[TextRange],
        has_modifiers: bool,
    ) -> Result<(), Error> {
        let (var_span, name_span) = if has_modifiers {
            (rhs[1], rhs[2])
        } else {
            (rhs[0], rhs[1])
        };
        let init = self.stacks.exprs.pop("exprs")?;
        let declarator = VarDeclarator {
            name: self.ident(name_span),
            dims: 0,
            init: Some(init),
            span: TextRange::new(name_span.start(), span.end()),
        };
        let (modifiers, annotations) = if has_modifiers {
            self.modifier_parts()?
        } else {
            (Modifiers(0), Vec::new())
        };
        self.push_stmt(Stmt::Local(LocalVar {
            modifiers,
            annotations,
            ty: TypeRef::Infer { span: var_span },
            declarators: vec![declarator],
            span,
        }))
    }

    fn push_stmt(&mut self, stmt: Stmt) -> Result<(), Error> {
        self.stacks.nodes.push(Fragment::Stmt(stmt));
        Ok(())
    }

    fn pop_stmt(&mut self) -> Result<Stmt, Error> {
        self.stacks.nodes.pop("nodes")?.into_stmt()
    }

    fn assignment(&mut self, span: TextRange, op: AssignOp) -> Result<(), Error> {
        let value = Box::new(self.stacks.exprs.pop("exprs")?);
        let target = Box::new(self.stacks.exprs.pop("exprs")?);
        self.stacks.exprs.push(Expr::Assign {
            op,
            target,
            value,
            span,
        });
        Ok(())
    }

    /// `(Expression) operand` is a cast only when the parenthesized
    /// expression is name-shaped; anything else keeps the operand and
    /// reports the target.
    fn cast_cover(&mut self, span: TextRange, rhs: &[TextRange]) -> Result<(), Error> {
        let operand = self.stacks.exprs.pop("exprs")?;
        let target = self.stacks.exprs.pop("exprs")?;
        match target {
            Expr::Name(name) => {
                self.stacks.exprs.push(Expr::Cast {
                    ty: TypeRef::Named { name },
                    operand: Box::new(operand),
                    span,
                });
            }
            _ => {
                self.diagnostics
                    .report(DiagnosticKind::InvalidCastTarget, rhs[1])
                    .emit();
                self.stacks.exprs.push(operand);
            }
        }
        Ok(())
    }

    fn push_call(&mut self, callee: Expr, args: Vec<Expr>, span: TextRange) -> Result<(), Error> {
        self.stacks.exprs.push(Expr::Call {
            callee: Box::new(callee),
            args,
            span,
        });
        Ok(())
    }
}
