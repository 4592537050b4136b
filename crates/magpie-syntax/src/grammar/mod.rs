//! The Magpie grammar as data.
//!
//! [`rules()`] returns the full production list. Nothing here is executable:
//! the table builder in [`crate::tables`] compiles these rules into an
//! LALR(1) automaton, and the dispatcher in [`crate::parser`] interprets each
//! rule's [`Action`] tag when the automaton reduces by it.
//!
//! Two deliberate grammar-shape choices keep the automaton conflict-free:
//!
//! - Operator precedence is structural. Each precedence tier is its own
//!   nonterminal (`OrExpression` down to `Primary`), so the tables need no
//!   precedence annotations.
//! - Declaration headers are split from bodies (`ClassHeader` + `ClassBody`,
//!   `MethodHeader` + `MethodBody`). The header reduction gives the parser a
//!   well-defined moment to journal structural progress for error recovery
//!   and to arm diet parsing before a body's `{` is consumed.

mod rules;

pub use rules::rules;

use serde::{Deserialize, Serialize};

use crate::ast::{BinaryOp, LiteralKind, UnaryOp};
use crate::lexer::TokenKind;

/// Language level a construct belongs to. Rules above the configured edition
/// still parse; the dispatcher reports them as unavailable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Edition {
    /// Classes, interfaces, fields, methods, statements, expressions.
    Classic,
    /// Generics, enums, annotations, varargs, foreach.
    Extended,
    /// Records, modules, lambdas, `var`, arrow switch, type patterns.
    #[default]
    Latest,
}

/// Every nonterminal of the grammar. `#[repr(u16)]` makes the discriminant
/// double as the goto-table column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum NonTerm {
    /// Augmented start symbol; only the builder's rule 0 uses it.
    Start = 0,
    Goal,

    CompilationUnit,
    PackageDeclOpt,
    PackageDecl,
    ImportDeclsOpt,
    ImportDecls,
    ImportDecl,
    UnitBody,
    TypeDeclsOpt,
    TypeDecls,
    TypeDecl,
    Name,

    ModuleDecl,
    ModuleDirectivesOpt,
    ModuleDirectives,
    ModuleDirective,
    NameList,

    Type,
    PrimitiveType,
    ReferenceType,
    ClassType,
    ArrayType,
    Dims,
    TypeArguments,
    TypeArgumentList,
    TypeArgument,
    TypeParamsOpt,
    TypeParams,
    TypeParam,

    ClassDecl,
    ClassHeader,
    SuperclassOpt,
    InterfacesOpt,
    ClassTypeList,
    ClassBody,
    ClassBodyDeclsOpt,
    ClassBodyDecls,
    ClassBodyDecl,

    FieldDecl,
    VariableDeclarators,
    VariableDeclarator,
    VariableInit,
    ArrayInit,
    VariableInitList,

    MethodDecl,
    MethodHeader,
    FormalParamsOpt,
    FormalParams,
    FormalParam,
    ThrowsOpt,
    MethodBody,

    ConstructorDecl,
    ConstructorHeader,

    InterfaceDecl,
    InterfaceHeader,
    ExtendsInterfacesOpt,

    EnumDecl,
    EnumHeader,
    EnumBody,
    EnumConstantsOpt,
    EnumConstants,
    EnumConstant,
    EnumBodyDeclsOpt,

    RecordDecl,
    RecordHeader,

    Annotation,
    ModifiersOpt,
    Modifiers,
    Modifier,

    Block,
    BlockStatementsOpt,
    BlockStatements,
    BlockStatement,
    LocalVarDeclStatement,
    LocalVarDecl,
    Statement,
    ExpressionStatement,
    ThrowStatement,
    TryStatement,
    Catches,
    CatchClause,
    ForInit,
    ForCondOpt,
    ForUpdateOpt,
    ExpressionList,
    SwitchBlock,
    SwitchRulesOpt,
    SwitchRules,
    SwitchRule,
    SwitchLabel,
    CaseItemList,
    CaseItem,
    TypePattern,
    SwitchRuleBody,

    Expression,
    AssignmentExpression,
    LambdaExpression,
    LambdaParamsOpt,
    LambdaParams,
    LambdaParam,
    LambdaBody,
    ConditionalExpression,
    OrExpression,
    AndExpression,
    InclusiveOrExpression,
    ExclusiveOrExpression,
    AndBitExpression,
    EqualityExpression,
    RelationalExpression,
    AdditiveExpression,
    MultiplicativeExpression,
    UnaryExpression,
    UnaryNotPlusMinus,
    CastExpression,
    PostfixExpression,
    Primary,
    Literal,
    ArgListOpt,
    ArgList,
    DimExprs,
}

/// Number of goto-table columns.
pub const NONTERM_COUNT: usize = NonTerm::DimExprs as usize + 1;

impl NonTerm {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        // Debug names are stable for a fieldless enum.
        nonterm_name(self)
    }
}

fn nonterm_name(nt: NonTerm) -> &'static str {
    macro_rules! names {
        ($($v:ident),* $(,)?) => {
            match nt { $(NonTerm::$v => stringify!($v),)* }
        };
    }
    names!(
        Start, Goal, CompilationUnit, PackageDeclOpt, PackageDecl, ImportDeclsOpt, ImportDecls,
        ImportDecl, UnitBody, TypeDeclsOpt, TypeDecls, TypeDecl, Name, ModuleDecl,
        ModuleDirectivesOpt, ModuleDirectives, ModuleDirective, NameList, Type, PrimitiveType,
        ReferenceType, ClassType, ArrayType, Dims, TypeArguments, TypeArgumentList, TypeArgument,
        TypeParamsOpt, TypeParams, TypeParam, ClassDecl, ClassHeader, SuperclassOpt,
        InterfacesOpt, ClassTypeList, ClassBody, ClassBodyDeclsOpt, ClassBodyDecls, ClassBodyDecl,
        FieldDecl, VariableDeclarators, VariableDeclarator, VariableInit, ArrayInit,
        VariableInitList, MethodDecl, MethodHeader, FormalParamsOpt, FormalParams, FormalParam,
        ThrowsOpt, MethodBody, ConstructorDecl, ConstructorHeader, InterfaceDecl, InterfaceHeader,
        ExtendsInterfacesOpt, EnumDecl, EnumHeader, EnumBody, EnumConstantsOpt, EnumConstants,
        EnumConstant, EnumBodyDeclsOpt, RecordDecl, RecordHeader, Annotation, ModifiersOpt,
        Modifiers, Modifier, Block, BlockStatementsOpt, BlockStatements, BlockStatement,
        LocalVarDeclStatement, LocalVarDecl, Statement, ExpressionStatement, ThrowStatement,
        TryStatement, Catches, CatchClause, ForInit, ForCondOpt, ForUpdateOpt, ExpressionList,
        SwitchBlock, SwitchRulesOpt, SwitchRules, SwitchRule, SwitchLabel, CaseItemList, CaseItem,
        TypePattern, SwitchRuleBody, Expression, AssignmentExpression, LambdaExpression,
        LambdaParamsOpt, LambdaParams, LambdaParam, LambdaBody, ConditionalExpression,
        OrExpression, AndExpression, InclusiveOrExpression, ExclusiveOrExpression,
        AndBitExpression, EqualityExpression, RelationalExpression, AdditiveExpression,
        MultiplicativeExpression, UnaryExpression, UnaryNotPlusMinus, CastExpression,
        PostfixExpression, Primary, Literal, ArgListOpt, ArgList, DimExprs,
    )
}

/// Grammar symbol: terminal or nonterminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    T(TokenKind),
    N(NonTerm),
}

/// Semantic action tag attached to each rule. The dispatcher interprets these
/// when the automaton reduces; `None` marks pass-through rules that move no
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    None,

    // Length-stack bookkeeping shared by many list rules.
    NodesMarkNone,
    NodesListFirst,
    NodesListNext,
    TypesMarkNone,
    TypesListFirst,
    TypesListNext,
    ExprsMarkNone,
    ExprsListFirst,
    ExprsListNext,

    // Names.
    NameSimple,
    NameQualified,
    QNameFirst,
    QNameNext,

    // Compilation unit.
    CompilationUnit,
    PackageDecl,
    ImportSingle,
    ImportOnDemand,
    ImportStatic,
    ImportStaticOnDemand,
    ModuleUnit,
    ModuleDecl,
    DirRequires,
    DirRequiresTransitive,
    DirRequiresStatic,
    DirExports,
    DirExportsTo,
    DirOpens,
    DirOpensTo,
    DirUses,
    DirProvides,

    // Types.
    TypePrimitive,
    TypeNamed,
    TypeGeneric,
    TypeArray,
    TypeWildcard,
    TypeWildcardExtends,
    TypeWildcardSuper,
    DimsFirst,
    DimsNext,
    TypeParamPlain,
    TypeParamBounded,

    // Declarations.
    ClassHeader,
    ClassDecl,
    InterfaceHeader,
    InterfaceDecl,
    EnumHeader,
    EnumDecl,
    EnumBody,
    EnumConstPlain,
    EnumConstArgs,
    EnumConstBody,
    EnumConstArgsBody,
    RecordHeader,
    RecordDecl,
    ClassBody,
    NestedTypeMember,
    InstanceInit,
    StaticInit,
    EmptyMember,
    FieldDecl,
    VarPlain,
    VarDims,
    VarInit,
    VarDimsInit,
    ArrayInitEmpty,
    ArrayInitList,
    MethodHeader,
    MethodHeaderVoid,
    MethodDecl,
    ParamPlain,
    ParamVariadic,
    BodyBlock,
    BodyAbsent,
    ConstructorHeader,
    ConstructorDecl,
    ModifiersNone,
    ModifiersNext,
    ModifierWord,
    ModifierStatic,
    ModifierDefault,
    ModifierAnnotation,
    AnnotationMarker,
    AnnotationArgs,

    // Statements.
    Block,
    EmptyStmt,
    ExprStmt,
    LocalTypeDeclStmt,
    LocalVar,
    LocalVarMods,
    LocalVarInferred,
    LocalVarInferredMods,
    If,
    IfElse,
    While,
    DoWhile,
    ForBasic,
    ForEach,
    ForEachVar,
    ForInitNone,
    ForInitLocal,
    ForInitExprs,
    SwitchStmt,
    SwitchBlock,
    SwitchRule,
    LabelCase,
    LabelDefault,
    CaseExpr,
    CasePattern,
    RuleExprBody,
    RuleBlockBody,
    RuleThrowBody,
    Break,
    Continue,
    ReturnVoid,
    Return,
    Throw,
    TryCatch,
    TryCatchFinally,
    TryFinally,
    CatchClause,

    // Expressions.
    Assign,
    CompoundAssign,
    Ternary,
    Binary(BinaryOp),
    InstanceofType,
    InstanceofPattern,
    Unary(UnaryOp),
    Postfix(UnaryOp),
    CastExpr,
    CastGeneric,
    CastNameArray,
    CastPrimitive,
    CastPrimArray,
    ExprName,
    Literal(LiteralKind),
    This,
    ParenExpr,
    FieldAccess,
    SuperField,
    InvokeName,
    InvokeExpr,
    InvokeSuperMethod,
    InvokeSuperCtor,
    InvokeThisCtor,
    IndexName,
    IndexExpr,
    New,
    NewAnon,
    NewArraySized,
    NewArrayInitd,
    LambdaIdent,
    LambdaParens,
    LambdaParamPlain,
    LambdaParamTyped,
    LambdaBodyExpr,
    LambdaBodyBlock,

    // Goal acceptance.
    AcceptUnit,
    AcceptBlock,
    AcceptExpr,
}

/// One production.
#[derive(Debug, Clone)]
pub struct Rule {
    pub lhs: NonTerm,
    pub rhs: Vec<Symbol>,
    pub action: Action,
    pub edition: Edition,
}

impl Rule {
    /// `Lhs -> sym sym sym` rendering for table dumps and invariant errors.
    pub fn display(&self) -> String {
        let mut out = String::from(self.lhs.name());
        out.push_str(" ->");
        if self.rhs.is_empty() {
            out.push_str(" <empty>");
        }
        for sym in &self.rhs {
            out.push(' ');
            match sym {
                Symbol::T(t) => out.push_str(&format!("{t:?}")),
                Symbol::N(n) => out.push_str(n.name()),
            }
        }
        out
    }
}
