//! Owned syntax tree for Magpie compilation units.
//!
//! The tree is built bottom-up by the parser's semantic actions. There is no
//! separate "malformed" node hierarchy: recovery surfaces as `recovered`
//! flags, [`Stmt::Recovered`] placeholders, and [`Body`] variants that carry
//! the source range of text the parser skipped.

use serde::{Deserialize, Serialize};
use text_size::TextRange;

/// One identifier with its source span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub text: String,
    pub span: TextRange,
}

/// Dotted name such as `com.example.List`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifiedName {
    pub parts: Vec<Ident>,
    pub span: TextRange,
}

impl QualifiedName {
    /// Last segment, the simple name.
    pub fn simple(&self) -> &Ident {
        self.parts.last().expect("qualified name has no parts")
    }

    pub fn dotted(&self) -> String {
        let mut out = String::new();
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&part.text);
        }
        out
    }
}

/// Declaration modifier bits. Annotations are stored separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers(pub u32);

impl Modifiers {
    pub const PUBLIC: u32 = 1 << 0;
    pub const PROTECTED: u32 = 1 << 1;
    pub const PRIVATE: u32 = 1 << 2;
    pub const ABSTRACT: u32 = 1 << 3;
    pub const STATIC: u32 = 1 << 4;
    pub const FINAL: u32 = 1 << 5;
    pub const NATIVE: u32 = 1 << 6;
    pub const TRANSIENT: u32 = 1 << 7;
    pub const VOLATILE: u32 = 1 << 8;
    pub const DEFAULT: u32 = 1 << 9;

    pub fn contains(self, bit: u32) -> bool {
        self.0 & bit != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Bit for a modifier keyword lexeme, if it names one.
    pub fn bit_for(word: &str) -> Option<u32> {
        Some(match word {
            "public" => Self::PUBLIC,
            "protected" => Self::PROTECTED,
            "private" => Self::PRIVATE,
            "abstract" => Self::ABSTRACT,
            "static" => Self::STATIC,
            "final" => Self::FINAL,
            "native" => Self::NATIVE,
            "transient" => Self::TRANSIENT,
            "volatile" => Self::VOLATILE,
            "default" => Self::DEFAULT,
            _ => return None,
        })
    }
}

/// `@Name` or `@Name(args...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: QualifiedName,
    pub args: Vec<Expr>,
    pub span: TextRange,
}

/// A type as written in source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeRef {
    Primitive {
        name: String,
        span: TextRange,
    },
    Named {
        name: QualifiedName,
    },
    Generic {
        name: QualifiedName,
        args: Vec<TypeRef>,
        span: TextRange,
    },
    Array {
        elem: Box<TypeRef>,
        dims: u32,
        span: TextRange,
    },
    Wildcard {
        bound: Option<(WildcardBound, Box<TypeRef>)>,
        span: TextRange,
    },
    /// `var` in a local declaration; the type is left to later phases.
    Infer {
        span: TextRange,
    },
    Void {
        span: TextRange,
    },
}

impl TypeRef {
    pub fn span(&self) -> TextRange {
        match self {
            Self::Primitive { span, .. }
            | Self::Generic { span, .. }
            | Self::Array { span, .. }
            | Self::Wildcard { span, .. }
            | Self::Infer { span }
            | Self::Void { span } => *span,
            Self::Named { name } => name.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WildcardBound {
    Extends,
    Super,
}

/// Declared type parameter: `T` or `T extends Bound`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: Ident,
    pub bound: Option<TypeRef>,
    pub span: TextRange,
}

/// `package a.b.c;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDecl {
    pub name: QualifiedName,
    pub span: TextRange,
}

/// `import [static] a.b.C;` or `import [static] a.b.*;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub name: QualifiedName,
    pub is_static: bool,
    pub on_demand: bool,
    pub span: TextRange,
}

/// `module a.b { ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDecl {
    pub name: QualifiedName,
    pub directives: Vec<ModuleDirective>,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleDirective {
    Requires {
        name: QualifiedName,
        transitive: bool,
        is_static: bool,
        span: TextRange,
    },
    Exports {
        name: QualifiedName,
        to: Vec<QualifiedName>,
        span: TextRange,
    },
    Opens {
        name: QualifiedName,
        to: Vec<QualifiedName>,
        span: TextRange,
    },
    Uses {
        name: QualifiedName,
        span: TextRange,
    },
    Provides {
        service: QualifiedName,
        with: Vec<QualifiedName>,
        span: TextRange,
    },
}

/// Root of a parse. Holds either ordinary type declarations or one module
/// declaration, never both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub package: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    pub types: Vec<TypeDecl>,
    pub module: Option<ModuleDecl>,
    /// True when any part of the tree was rebuilt by error recovery.
    pub recovered: bool,
    pub span: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeDeclKind {
    Class,
    Interface,
    Enum,
    Record,
}

/// A class, interface, enum, or record declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub kind: TypeDeclKind,
    pub name: Ident,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParam>,
    /// Superclass for classes, extended interfaces for interfaces.
    pub extends: Vec<TypeRef>,
    pub implements: Vec<TypeRef>,
    /// Record component list; empty for other kinds.
    pub record_params: Vec<Param>,
    /// Enum constants; empty for other kinds.
    pub enum_constants: Vec<EnumConstant>,
    pub members: Vec<Member>,
    /// Span of the doc comment attached to this declaration, if any.
    pub doc: Option<TextRange>,
    /// True when the body was reassembled by error recovery.
    pub recovered: bool,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumConstant {
    pub name: Ident,
    pub args: Vec<Expr>,
    pub body: Option<Vec<Member>>,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
    Nested(TypeDecl),
    Initializer {
        is_static: bool,
        body: Block,
        span: TextRange,
    },
    /// Stray `;` in a type body.
    Empty { span: TextRange },
}

impl Member {
    pub fn span(&self) -> TextRange {
        match self {
            Self::Field(f) => f.span,
            Self::Method(m) => m.span,
            Self::Constructor(c) => c.span,
            Self::Nested(t) => t.span,
            Self::Initializer { span, .. } | Self::Empty { span } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub ty: TypeRef,
    pub declarators: Vec<VarDeclarator>,
    pub doc: Option<TextRange>,
    pub span: TextRange,
}

/// One `name`, `name[]`, or `name = init` inside a field or local declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDeclarator {
    pub name: Ident,
    /// Trailing `[]` pairs on the declarator itself.
    pub dims: u32,
    pub init: Option<Expr>,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub return_type: TypeRef,
    pub name: Ident,
    pub params: Vec<Param>,
    pub throws: Vec<TypeRef>,
    pub body: Body,
    pub doc: Option<TextRange>,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDecl {
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub name: Ident,
    pub params: Vec<Param>,
    pub throws: Vec<TypeRef>,
    pub body: Body,
    pub doc: Option<TextRange>,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub ty: TypeRef,
    pub name: Ident,
    pub variadic: bool,
    pub span: TextRange,
}

/// Method or constructor body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Body {
    Block(Block),
    /// `;` body (abstract or interface method).
    Absent,
    /// Body skipped by diet parsing; the range covers the braces themselves.
    Skipped(TextRange),
    /// Interior abandoned by error recovery with statement recovery disabled.
    Recovered(TextRange),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    /// True when a comment sits inside the braces. Lets later phases tell an
    /// intentionally empty body from one that carries commentary.
    pub contains_comment: bool,
    /// True when statements were reassembled by error recovery.
    pub recovered: bool,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalVar {
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub ty: TypeRef,
    pub declarators: Vec<VarDeclarator>,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForInit {
    None,
    Local(LocalVar),
    Exprs(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchRule {
    pub label: SwitchLabel,
    pub body: SwitchRuleBody,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SwitchLabel {
    Default { span: TextRange },
    Case { items: Vec<CaseItem>, span: TextRange },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CaseItem {
    Expr(Expr),
    Pattern {
        ty: TypeRef,
        name: Ident,
        span: TextRange,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SwitchRuleBody {
    Expr(Expr),
    Block(Block),
    Throw { expr: Expr, span: TextRange },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    pub ty: TypeRef,
    pub name: Ident,
    pub body: Block,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Local(LocalVar),
    TypeDecl(Box<TypeDecl>),
    Expr {
        expr: Expr,
        span: TextRange,
    },
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        span: TextRange,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
        span: TextRange,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
        span: TextRange,
    },
    For {
        init: ForInit,
        cond: Option<Expr>,
        update: Vec<Expr>,
        body: Box<Stmt>,
        span: TextRange,
    },
    ForEach {
        /// `None` for `var` bindings.
        ty: Option<TypeRef>,
        name: Ident,
        iterable: Expr,
        body: Box<Stmt>,
        span: TextRange,
    },
    Switch {
        scrutinee: Expr,
        rules: Vec<SwitchRule>,
        span: TextRange,
    },
    Break {
        span: TextRange,
    },
    Continue {
        span: TextRange,
    },
    Return {
        value: Option<Expr>,
        span: TextRange,
    },
    Throw {
        expr: Expr,
        span: TextRange,
    },
    Try {
        block: Block,
        catches: Vec<CatchClause>,
        finally: Option<Block>,
        span: TextRange,
    },
    Block(Block),
    Empty {
        span: TextRange,
    },
    /// Placeholder for source the recovery controller could not reparse.
    Recovered {
        span: TextRange,
    },
}

impl Stmt {
    pub fn span(&self) -> TextRange {
        match self {
            Self::Local(l) => l.span,
            Self::TypeDecl(t) => t.span,
            Self::Block(b) => b.span,
            Self::Expr { span, .. }
            | Self::If { span, .. }
            | Self::While { span, .. }
            | Self::DoWhile { span, .. }
            | Self::For { span, .. }
            | Self::ForEach { span, .. }
            | Self::Switch { span, .. }
            | Self::Break { span }
            | Self::Continue { span }
            | Self::Return { span, .. }
            | Self::Throw { span, .. }
            | Self::Try { span, .. }
            | Self::Empty { span }
            | Self::Recovered { span } => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralKind {
    Int,
    Float,
    Char,
    String,
    Bool,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    PreIncr,
    PreDecr,
    PostIncr,
    PostDecr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// Assignment operator: `=` or a compound form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
}

impl AssignOp {
    /// Maps a compound-assignment lexeme to its operator.
    pub fn from_lexeme(text: &str) -> Option<Self> {
        Some(match text {
            "=" => Self::Assign,
            "+=" => Self::Add,
            "-=" => Self::Sub,
            "*=" => Self::Mul,
            "/=" => Self::Div,
            "%=" => Self::Rem,
            "&=" => Self::BitAnd,
            "|=" => Self::BitOr,
            "^=" => Self::BitXor,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LambdaParam {
    /// Bare identifier parameter.
    Inferred { name: Ident },
    Typed { ty: TypeRef, name: Ident },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LambdaBody {
    Expr(Expr),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal {
        kind: LiteralKind,
        text: String,
        span: TextRange,
    },
    Name(QualifiedName),
    This {
        span: TextRange,
    },
    Super {
        span: TextRange,
    },
    Paren {
        inner: Box<Expr>,
        span: TextRange,
    },
    Field {
        target: Box<Expr>,
        name: Ident,
        span: TextRange,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: TextRange,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
        span: TextRange,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: TextRange,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: TextRange,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
        span: TextRange,
    },
    Ternary {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
        span: TextRange,
    },
    Cast {
        ty: TypeRef,
        operand: Box<Expr>,
        span: TextRange,
    },
    Instanceof {
        operand: Box<Expr>,
        ty: TypeRef,
        /// Pattern binding: `x instanceof Circle c`.
        binding: Option<Ident>,
        span: TextRange,
    },
    New {
        ty: TypeRef,
        args: Vec<Expr>,
        /// Anonymous class body, when present.
        body: Option<Vec<Member>>,
        span: TextRange,
    },
    NewArray {
        elem: TypeRef,
        dim_exprs: Vec<Expr>,
        /// `[]` pairs beyond the sized dimensions.
        dims: u32,
        init: Option<Vec<Expr>>,
        span: TextRange,
    },
    /// `{ a, b, c }` array initializer.
    ArrayLit {
        elems: Vec<Expr>,
        span: TextRange,
    },
    Lambda {
        params: Vec<LambdaParam>,
        body: Box<LambdaBody>,
        span: TextRange,
    },
}

impl Expr {
    pub fn span(&self) -> TextRange {
        match self {
            Self::Name(name) => name.span,
            Self::Literal { span, .. }
            | Self::This { span }
            | Self::Super { span }
            | Self::Paren { span, .. }
            | Self::Field { span, .. }
            | Self::Call { span, .. }
            | Self::Index { span, .. }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::Assign { span, .. }
            | Self::Ternary { span, .. }
            | Self::Cast { span, .. }
            | Self::Instanceof { span, .. }
            | Self::New { span, .. }
            | Self::NewArray { span, .. }
            | Self::ArrayLit { span, .. }
            | Self::Lambda { span, .. } => *span,
        }
    }
}
