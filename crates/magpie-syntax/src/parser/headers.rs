//! Header fragments.
//!
//! Headers are reduced before their bodies, which is what makes them useful:
//! the moment a header completes, the parser knows what declaration it is
//! inside before a single body token is consumed. The recovery journal
//! snapshots headers at that moment, so a wrecked body can still be rebuilt
//! around a fully-known declaration shell.

use text_size::{TextRange, TextSize};

use crate::ast::{
    Annotation, Body, ConstructorDecl, Ident, Member, MethodDecl, Modifiers, Param, TypeDecl,
    TypeDeclKind, TypeParam, TypeRef,
};

/// Completed class, interface, enum, or record header.
#[derive(Debug, Clone)]
pub(crate) struct TypeHeader {
    pub kind: TypeDeclKind,
    pub name: Ident,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub record_params: Vec<Param>,
    pub doc: Option<TextRange>,
    pub start: TextSize,
}

impl TypeHeader {
    /// Build the declaration this header opens, with the given body content.
    pub fn into_decl(self, members: Vec<Member>, end: TextSize, recovered: bool) -> TypeDecl {
        TypeDecl {
            kind: self.kind,
            name: self.name,
            modifiers: self.modifiers,
            annotations: self.annotations,
            type_params: self.type_params,
            extends: self.extends,
            implements: self.implements,
            record_params: self.record_params,
            enum_constants: Vec::new(),
            members,
            doc: self.doc,
            recovered,
            span: TextRange::new(self.start, end),
        }
    }
}

/// Completed method or constructor header. `return_type` is `None` for
/// constructors.
#[derive(Debug, Clone)]
pub(crate) struct CallableHeader {
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub return_type: Option<TypeRef>,
    pub name: Ident,
    pub params: Vec<Param>,
    pub throws: Vec<TypeRef>,
    pub doc: Option<TextRange>,
    pub start: TextSize,
}

impl CallableHeader {
    pub fn into_method(self, body: Body, end: TextSize) -> MethodDecl {
        let return_type = self.return_type.unwrap_or(TypeRef::Void {
            span: TextRange::empty(self.start),
        });
        MethodDecl {
            modifiers: self.modifiers,
            annotations: self.annotations,
            return_type,
            name: self.name,
            params: self.params,
            throws: self.throws,
            body,
            doc: self.doc,
            span: TextRange::new(self.start, end),
        }
    }

    pub fn into_constructor(self, body: Body, end: TextSize) -> ConstructorDecl {
        ConstructorDecl {
            modifiers: self.modifiers,
            annotations: self.annotations,
            name: self.name,
            params: self.params,
            throws: self.throws,
            body,
            doc: self.doc,
            span: TextRange::new(self.start, end),
        }
    }
}
