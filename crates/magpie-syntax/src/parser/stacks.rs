//! Parallel semantic value stacks.
//!
//! Each stack pairs a value vector with a length vector. List-building rules
//! mark how many of the topmost values belong to the list under construction;
//! a consumer takes the whole marked group at once. Keeping lengths separate
//! from values means a `Vec<T>` is never allocated per list step: elements
//! accumulate in place and are split off exactly once.
//!
//! Underflow is always an engine bug, never a user error, so the accessors
//! return [`Error`] values the dispatcher propagates with `?`.

use text_size::TextRange;

use crate::Error;
use crate::ast::{
    Annotation, Block, Body, CaseItem, CatchClause, CompilationUnit, EnumConstant, Expr, ForInit,
    Ident, ImportDecl, LambdaBody, LambdaParam, Member, ModuleDecl, ModuleDirective, PackageDecl,
    Param, QualifiedName, Stmt, SwitchLabel, SwitchRule, SwitchRuleBody, TypeDecl, TypeParam,
    TypeRef, VarDeclarator,
};

use super::headers::{CallableHeader, TypeHeader};

/// One value stack with its parallel length stack.
#[derive(Debug)]
pub(crate) struct ValueStack<T> {
    values: Vec<T>,
    lengths: Vec<u32>,
}

impl<T> Default for ValueStack<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            lengths: Vec::new(),
        }
    }
}

impl<T> ValueStack<T> {
    pub fn push(&mut self, value: T) {
        self.values.push(value);
    }

    pub fn pop(&mut self, stack: &'static str) -> Result<T, Error> {
        self.values.pop().ok_or(Error::StackUnderflow {
            stack,
            rule: String::new(),
        })
    }

    /// Open a list covering the topmost `n` values.
    pub fn mark(&mut self, n: u32) {
        self.lengths.push(n);
    }

    /// Grow the topmost list by `n` values.
    pub fn extend_top(&mut self, n: u32, stack: &'static str) -> Result<(), Error> {
        match self.lengths.last_mut() {
            Some(top) => {
                *top += n;
                Ok(())
            }
            None => Err(Error::StackUnderflow {
                stack,
                rule: String::new(),
            }),
        }
    }

    /// Merge the two topmost lists into one.
    pub fn concat_top(&mut self, stack: &'static str) -> Result<(), Error> {
        let upper = self.pop_length(stack)?;
        self.extend_top(upper, stack)
    }

    /// Close the topmost list and take its values, oldest first.
    pub fn take_list(&mut self, stack: &'static str) -> Result<Vec<T>, Error> {
        let len = self.pop_length(stack)? as usize;
        if len > self.values.len() {
            return Err(Error::StackUnderflow {
                stack,
                rule: String::new(),
            });
        }
        Ok(self.values.split_off(self.values.len() - len))
    }

    fn pop_length(&mut self, stack: &'static str) -> Result<u32, Error> {
        self.lengths.pop().ok_or(Error::StackUnderflow {
            stack,
            rule: String::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Surrender all values. Used when salvaging a wrecked parse; the length
    /// stack is abandoned with the engine.
    pub fn drain_values(&mut self) -> Vec<T> {
        std::mem::take(&mut self.values)
    }
}

/// The five stacks the semantic actions move values across.
#[derive(Debug, Default)]
pub(crate) struct ValueStacks {
    /// Structured fragments: declarations, members, statements, clauses.
    pub nodes: ValueStack<Fragment>,
    pub exprs: ValueStack<Expr>,
    pub types: ValueStack<TypeRef>,
    /// Dotted-name segments under construction.
    pub idents: ValueStack<Ident>,
    /// Modifier bit accumulators and array dimension counts.
    pub ints: ValueStack<u32>,
}

/// Everything the `nodes` stack can hold. One enum rather than one stack per
/// shape: the stack discipline already guarantees what sits on top at each
/// reduction, and the typed accessors turn a violation into a precise error.
#[derive(Debug, Clone)]
pub(crate) enum Fragment {
    Unit(CompilationUnit),
    Package(PackageDecl),
    Import(ImportDecl),
    Module(ModuleDecl),
    Directive(ModuleDirective),
    Name(QualifiedName),
    Type(TypeDecl),
    TypeHeader(TypeHeader),
    Callable(CallableHeader),
    Body(Body),
    Members(Vec<Member>),
    EnumParts {
        constants: Vec<EnumConstant>,
        members: Vec<Member>,
    },
    EnumConst(EnumConstant),
    Member(Member),
    Annotation(Annotation),
    TypeParam(TypeParam),
    Param(Param),
    Declarator(VarDeclarator),
    Stmt(Stmt),
    Catch(CatchClause),
    ForInit(ForInit),
    Label(SwitchLabel),
    Case(CaseItem),
    Rule(SwitchRule),
    RuleList(Vec<SwitchRule>),
    RuleBody(SwitchRuleBody),
    LambdaParam(LambdaParam),
    LambdaBody(LambdaBody),
}

macro_rules! fragment_accessor {
    ($fn_name:ident, $variant:ident, $ty:ty, $expected:literal) => {
        pub fn $fn_name(self) -> Result<$ty, Error> {
            match self {
                Fragment::$variant(inner) => Ok(inner),
                other => Err(other.mismatch($expected)),
            }
        }
    };
}

impl Fragment {
    fragment_accessor!(into_unit, Unit, CompilationUnit, "compilation unit");
    fragment_accessor!(into_package, Package, PackageDecl, "package declaration");
    fragment_accessor!(into_import, Import, ImportDecl, "import declaration");
    fragment_accessor!(into_module, Module, ModuleDecl, "module declaration");
    fragment_accessor!(into_directive, Directive, ModuleDirective, "module directive");
    fragment_accessor!(into_name, Name, QualifiedName, "qualified name");
    fragment_accessor!(into_type, Type, TypeDecl, "type declaration");
    fragment_accessor!(into_type_header, TypeHeader, TypeHeader, "type header");
    fragment_accessor!(into_callable, Callable, CallableHeader, "callable header");
    fragment_accessor!(into_body, Body, Body, "body");
    fragment_accessor!(into_members, Members, Vec<Member>, "member list");
    fragment_accessor!(into_enum_const, EnumConst, EnumConstant, "enum constant");
    fragment_accessor!(into_member, Member, Member, "member");
    fragment_accessor!(into_annotation, Annotation, Annotation, "annotation");
    fragment_accessor!(into_type_param, TypeParam, TypeParam, "type parameter");
    fragment_accessor!(into_param, Param, Param, "parameter");
    fragment_accessor!(into_declarator, Declarator, VarDeclarator, "declarator");
    fragment_accessor!(into_stmt, Stmt, Stmt, "statement");
    fragment_accessor!(into_catch, Catch, CatchClause, "catch clause");
    fragment_accessor!(into_for_init, ForInit, ForInit, "for-loop initializer");
    fragment_accessor!(into_label, Label, SwitchLabel, "switch label");
    fragment_accessor!(into_case, Case, CaseItem, "case item");
    fragment_accessor!(into_rule, Rule, SwitchRule, "switch rule");
    fragment_accessor!(into_rule_list, RuleList, Vec<SwitchRule>, "switch rule list");
    fragment_accessor!(into_rule_body, RuleBody, SwitchRuleBody, "switch rule body");
    fragment_accessor!(into_lambda_param, LambdaParam, LambdaParam, "lambda parameter");
    fragment_accessor!(into_lambda_body, LambdaBody, LambdaBody, "lambda body");

    /// The block form of a statement fragment.
    pub fn into_block(self) -> Result<Block, Error> {
        match self {
            Fragment::Stmt(Stmt::Block(block)) => Ok(block),
            other => Err(other.mismatch("block")),
        }
    }

    pub fn mismatch(&self, expected: &'static str) -> Error {
        Error::WrongFragment {
            stack: "nodes",
            expected,
            rule: String::new(),
        }
    }
}

/// Converts a drained fragment group into a typed list.
pub(crate) fn into_list<T>(
    frags: Vec<Fragment>,
    accessor: impl Fn(Fragment) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    frags.into_iter().map(accessor).collect()
}

/// Attach a rule name to a stack error bubbling out of an action.
pub(crate) fn with_rule(error: Error, rule_name: &str) -> Error {
    match error {
        Error::StackUnderflow { stack, .. } => Error::StackUnderflow {
            stack,
            rule: rule_name.to_string(),
        },
        Error::WrongFragment {
            stack, expected, ..
        } => Error::WrongFragment {
            stack,
            expected,
            rule: rule_name.to_string(),
        },
        other => other,
    }
}

/// Spans carried alongside the state stack. Reduces pop one group per
/// right-hand-side symbol and push the covering span back.
#[derive(Debug, Default)]
pub(crate) struct SpanStack {
    spans: Vec<TextRange>,
}

impl SpanStack {
    pub fn push(&mut self, span: TextRange) {
        self.spans.push(span);
    }

    /// Pop the topmost `n` spans into `scratch`, oldest first.
    pub fn pop_into(
        &mut self,
        n: usize,
        scratch: &mut Vec<TextRange>,
    ) -> Result<(), Error> {
        if n > self.spans.len() {
            return Err(Error::StackUnderflow {
                stack: "spans",
                rule: String::new(),
            });
        }
        scratch.clear();
        scratch.extend(self.spans.drain(self.spans.len() - n..));
        Ok(())
    }
}

/// Covering span of a reduction's right-hand side. Empty spans come from
/// nullable rules and synthetic tokens; they only anchor a position when
/// nothing real is present.
pub(crate) fn cover(spans: &[TextRange], fallback: TextRange) -> TextRange {
    let mut real = spans.iter().filter(|s| !s.is_empty());
    match real.next() {
        Some(first) => {
            let last = real.last().copied().unwrap_or(*first);
            TextRange::new(first.start(), last.end().max(first.end()))
        }
        None => spans.last().copied().unwrap_or(fallback),
    }
}
