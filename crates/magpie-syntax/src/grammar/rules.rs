//! The production list.
//!
//! Order within the list is load-bearing in exactly one way: when a state
//! ends up with two viable reductions on the same lookahead, the table
//! builder keeps the rule that appears first here. The list is grouped so
//! that more specific productions precede the general ones they overlap.

use super::{Action, Edition, NonTerm, Rule, Symbol};
use crate::ast::{BinaryOp, LiteralKind, UnaryOp};
use crate::lexer::TokenKind;

use Action as A;
use NonTerm::*;
use TokenKind::*;

fn t(kind: TokenKind) -> Symbol {
    Symbol::T(kind)
}

fn n(nt: NonTerm) -> Symbol {
    Symbol::N(nt)
}

fn r(lhs: NonTerm, rhs: &[Symbol], action: Action) -> Rule {
    Rule {
        lhs,
        rhs: rhs.to_vec(),
        action,
        edition: Edition::Classic,
    }
}

fn re(lhs: NonTerm, rhs: &[Symbol], action: Action, edition: Edition) -> Rule {
    Rule {
        lhs,
        rhs: rhs.to_vec(),
        action,
        edition,
    }
}

/// Builds the complete grammar. The table builder prepends the augmented
/// `Start -> Goal` production as rule 0.
#[rustfmt::skip]
pub fn rules() -> Vec<Rule> {
    use Edition::{Extended, Latest};
    let mut g = Vec::with_capacity(256);

    // --- Goals -----------------------------------------------------------
    g.push(r(Goal, &[t(GoalUnit), n(CompilationUnit)], A::AcceptUnit));
    g.push(r(Goal, &[t(GoalBlock), n(BlockStatementsOpt)], A::AcceptBlock));
    g.push(r(Goal, &[t(GoalExpr), n(Expression)], A::AcceptExpr));

    // --- Compilation unit ------------------------------------------------
    g.push(r(CompilationUnit, &[n(PackageDeclOpt), n(ImportDeclsOpt), n(UnitBody)], A::CompilationUnit));
    g.push(r(PackageDeclOpt, &[], A::NodesMarkNone));
    g.push(r(PackageDeclOpt, &[n(PackageDecl)], A::NodesListFirst));
    g.push(r(PackageDecl, &[t(Package), n(Name), t(Semi)], A::PackageDecl));
    g.push(r(ImportDeclsOpt, &[], A::NodesMarkNone));
    g.push(r(ImportDeclsOpt, &[n(ImportDecls)], A::None));
    g.push(r(ImportDecls, &[n(ImportDecl)], A::NodesListFirst));
    g.push(r(ImportDecls, &[n(ImportDecls), n(ImportDecl)], A::NodesListNext));
    g.push(r(ImportDecl, &[t(Import), n(Name), t(Semi)], A::ImportSingle));
    g.push(r(ImportDecl, &[t(Import), n(Name), t(Dot), t(Star), t(Semi)], A::ImportOnDemand));
    g.push(r(ImportDecl, &[t(Import), t(Static), n(Name), t(Semi)], A::ImportStatic));
    g.push(r(ImportDecl, &[t(Import), t(Static), n(Name), t(Dot), t(Star), t(Semi)], A::ImportStaticOnDemand));
    g.push(r(UnitBody, &[n(TypeDeclsOpt)], A::None));
    g.push(re(UnitBody, &[n(ModuleDecl)], A::ModuleUnit, Latest));
    g.push(r(TypeDeclsOpt, &[], A::NodesMarkNone));
    g.push(r(TypeDeclsOpt, &[n(TypeDecls)], A::None));
    g.push(r(TypeDecls, &[n(TypeDecl)], A::NodesListFirst));
    g.push(r(TypeDecls, &[n(TypeDecls), n(TypeDecl)], A::NodesListNext));
    g.push(r(TypeDecl, &[n(ClassDecl)], A::None));
    g.push(r(TypeDecl, &[n(InterfaceDecl)], A::None));
    g.push(re(TypeDecl, &[n(EnumDecl)], A::None, Extended));
    g.push(re(TypeDecl, &[n(RecordDecl)], A::None, Latest));

    // --- Names -----------------------------------------------------------
    g.push(r(Name, &[t(Identifier)], A::NameSimple));
    g.push(r(Name, &[n(Name), t(Dot), t(Identifier)], A::NameQualified));

    // --- Module declarations ---------------------------------------------
    g.push(re(ModuleDecl, &[t(Module), n(Name), t(LBrace), n(ModuleDirectivesOpt), t(RBrace)], A::ModuleDecl, Latest));
    g.push(r(ModuleDirectivesOpt, &[], A::NodesMarkNone));
    g.push(r(ModuleDirectivesOpt, &[n(ModuleDirectives)], A::None));
    g.push(r(ModuleDirectives, &[n(ModuleDirective)], A::NodesListFirst));
    g.push(r(ModuleDirectives, &[n(ModuleDirectives), n(ModuleDirective)], A::NodesListNext));
    g.push(r(ModuleDirective, &[t(Requires), n(Name), t(Semi)], A::DirRequires));
    g.push(r(ModuleDirective, &[t(Requires), t(Transitive), n(Name), t(Semi)], A::DirRequiresTransitive));
    g.push(r(ModuleDirective, &[t(Requires), t(Static), n(Name), t(Semi)], A::DirRequiresStatic));
    g.push(r(ModuleDirective, &[t(Exports), n(Name), t(Semi)], A::DirExports));
    g.push(r(ModuleDirective, &[t(Exports), n(Name), t(To), n(NameList), t(Semi)], A::DirExportsTo));
    g.push(r(ModuleDirective, &[t(Opens), n(Name), t(Semi)], A::DirOpens));
    g.push(r(ModuleDirective, &[t(Opens), n(Name), t(To), n(NameList), t(Semi)], A::DirOpensTo));
    g.push(r(ModuleDirective, &[t(Uses), n(Name), t(Semi)], A::DirUses));
    g.push(r(ModuleDirective, &[t(Provides), n(Name), t(With), n(NameList), t(Semi)], A::DirProvides));
    g.push(r(NameList, &[n(Name)], A::QNameFirst));
    g.push(r(NameList, &[n(NameList), t(Comma), n(Name)], A::QNameNext));

    // --- Types -----------------------------------------------------------
    g.push(r(Type, &[n(PrimitiveType)], A::None));
    g.push(r(Type, &[n(ReferenceType)], A::None));
    g.push(r(PrimitiveType, &[t(PrimKw)], A::TypePrimitive));
    g.push(r(ReferenceType, &[n(ClassType)], A::None));
    g.push(r(ReferenceType, &[n(ArrayType)], A::None));
    g.push(r(ClassType, &[n(Name)], A::TypeNamed));
    g.push(re(ClassType, &[n(Name), n(TypeArguments)], A::TypeGeneric, Extended));
    g.push(r(ArrayType, &[n(PrimitiveType), n(Dims)], A::TypeArray));
    g.push(r(ArrayType, &[n(ClassType), n(Dims)], A::TypeArray));
    g.push(r(Dims, &[t(BracketPair)], A::DimsFirst));
    g.push(r(Dims, &[n(Dims), t(BracketPair)], A::DimsNext));
    g.push(re(TypeArguments, &[t(LtGeneric), n(TypeArgumentList), t(Gt)], A::None, Extended));
    g.push(r(TypeArgumentList, &[n(TypeArgument)], A::TypesListFirst));
    g.push(r(TypeArgumentList, &[n(TypeArgumentList), t(Comma), n(TypeArgument)], A::TypesListNext));
    g.push(r(TypeArgument, &[n(ReferenceType)], A::None));
    g.push(r(TypeArgument, &[t(Question)], A::TypeWildcard));
    g.push(r(TypeArgument, &[t(Question), t(Extends), n(ReferenceType)], A::TypeWildcardExtends));
    g.push(r(TypeArgument, &[t(Question), t(Super), n(ReferenceType)], A::TypeWildcardSuper));
    g.push(r(TypeParamsOpt, &[], A::NodesMarkNone));
    g.push(re(TypeParamsOpt, &[t(LtGeneric), n(TypeParams), t(Gt)], A::None, Extended));
    g.push(r(TypeParams, &[n(TypeParam)], A::NodesListFirst));
    g.push(r(TypeParams, &[n(TypeParams), t(Comma), n(TypeParam)], A::NodesListNext));
    g.push(r(TypeParam, &[t(Identifier)], A::TypeParamPlain));
    g.push(r(TypeParam, &[t(Identifier), t(Extends), n(ReferenceType)], A::TypeParamBounded));

    // --- Class declarations ----------------------------------------------
    g.push(r(ClassDecl, &[n(ClassHeader), n(ClassBody)], A::ClassDecl));
    g.push(r(ClassHeader, &[n(ModifiersOpt), t(Class), t(Identifier), n(TypeParamsOpt), n(SuperclassOpt), n(InterfacesOpt)], A::ClassHeader));
    g.push(r(SuperclassOpt, &[], A::TypesMarkNone));
    g.push(r(SuperclassOpt, &[t(Extends), n(ClassType)], A::TypesListFirst));
    g.push(r(InterfacesOpt, &[], A::TypesMarkNone));
    g.push(r(InterfacesOpt, &[t(Implements), n(ClassTypeList)], A::None));
    g.push(r(ClassTypeList, &[n(ClassType)], A::TypesListFirst));
    g.push(r(ClassTypeList, &[n(ClassTypeList), t(Comma), n(ClassType)], A::TypesListNext));
    g.push(r(ClassBody, &[t(LBrace), n(ClassBodyDeclsOpt), t(RBrace)], A::ClassBody));
    g.push(r(ClassBodyDeclsOpt, &[], A::NodesMarkNone));
    g.push(r(ClassBodyDeclsOpt, &[n(ClassBodyDecls)], A::None));
    g.push(r(ClassBodyDecls, &[n(ClassBodyDecl)], A::NodesListFirst));
    g.push(r(ClassBodyDecls, &[n(ClassBodyDecls), n(ClassBodyDecl)], A::NodesListNext));
    g.push(r(ClassBodyDecl, &[n(FieldDecl)], A::None));
    g.push(r(ClassBodyDecl, &[n(MethodDecl)], A::None));
    g.push(r(ClassBodyDecl, &[n(ConstructorDecl)], A::None));
    g.push(r(ClassBodyDecl, &[n(TypeDecl)], A::NestedTypeMember));
    g.push(r(ClassBodyDecl, &[n(Block)], A::InstanceInit));
    g.push(r(ClassBodyDecl, &[t(Static), n(Block)], A::StaticInit));
    g.push(r(ClassBodyDecl, &[t(Semi)], A::EmptyMember));

    // --- Fields ----------------------------------------------------------
    g.push(r(FieldDecl, &[n(ModifiersOpt), n(Type), n(VariableDeclarators), t(Semi)], A::FieldDecl));
    g.push(r(VariableDeclarators, &[n(VariableDeclarator)], A::NodesListFirst));
    g.push(r(VariableDeclarators, &[n(VariableDeclarators), t(Comma), n(VariableDeclarator)], A::NodesListNext));
    g.push(r(VariableDeclarator, &[t(Identifier)], A::VarPlain));
    g.push(r(VariableDeclarator, &[t(Identifier), n(Dims)], A::VarDims));
    g.push(r(VariableDeclarator, &[t(Identifier), t(Assign), n(VariableInit)], A::VarInit));
    g.push(r(VariableDeclarator, &[t(Identifier), n(Dims), t(Assign), n(VariableInit)], A::VarDimsInit));
    g.push(r(VariableInit, &[n(Expression)], A::None));
    g.push(r(VariableInit, &[n(ArrayInit)], A::None));
    g.push(r(ArrayInit, &[t(LBrace), t(RBrace)], A::ArrayInitEmpty));
    g.push(r(ArrayInit, &[t(LBrace), n(VariableInitList), t(RBrace)], A::ArrayInitList));
    g.push(r(ArrayInit, &[t(LBrace), n(VariableInitList), t(Comma), t(RBrace)], A::ArrayInitList));
    g.push(r(VariableInitList, &[n(VariableInit)], A::ExprsListFirst));
    g.push(r(VariableInitList, &[n(VariableInitList), t(Comma), n(VariableInit)], A::ExprsListNext));

    // --- Methods ---------------------------------------------------------
    g.push(r(MethodDecl, &[n(MethodHeader), n(MethodBody)], A::MethodDecl));
    g.push(r(MethodHeader, &[n(ModifiersOpt), n(Type), t(Identifier), t(LParen), n(FormalParamsOpt), t(RParen), n(ThrowsOpt)], A::MethodHeader));
    g.push(r(MethodHeader, &[n(ModifiersOpt), t(Void), t(Identifier), t(LParen), n(FormalParamsOpt), t(RParen), n(ThrowsOpt)], A::MethodHeaderVoid));
    g.push(r(FormalParamsOpt, &[], A::NodesMarkNone));
    g.push(r(FormalParamsOpt, &[n(FormalParams)], A::None));
    g.push(r(FormalParams, &[n(FormalParam)], A::NodesListFirst));
    g.push(r(FormalParams, &[n(FormalParams), t(Comma), n(FormalParam)], A::NodesListNext));
    g.push(r(FormalParam, &[n(Type), t(Identifier)], A::ParamPlain));
    g.push(re(FormalParam, &[n(Type), t(Ellipsis), t(Identifier)], A::ParamVariadic, Extended));
    g.push(r(ThrowsOpt, &[], A::TypesMarkNone));
    g.push(r(ThrowsOpt, &[t(Throws), n(ClassTypeList)], A::None));
    g.push(r(MethodBody, &[n(Block)], A::BodyBlock));
    g.push(r(MethodBody, &[t(Semi)], A::BodyAbsent));

    // --- Constructors ----------------------------------------------------
    g.push(r(ConstructorDecl, &[n(ConstructorHeader), n(Block)], A::ConstructorDecl));
    g.push(r(ConstructorHeader, &[n(ModifiersOpt), t(Identifier), t(LParen), n(FormalParamsOpt), t(RParen), n(ThrowsOpt)], A::ConstructorHeader));

    // --- Interfaces ------------------------------------------------------
    g.push(r(InterfaceDecl, &[n(InterfaceHeader), n(ClassBody)], A::InterfaceDecl));
    g.push(r(InterfaceHeader, &[n(ModifiersOpt), t(Interface), t(Identifier), n(TypeParamsOpt), n(ExtendsInterfacesOpt)], A::InterfaceHeader));
    g.push(r(ExtendsInterfacesOpt, &[], A::TypesMarkNone));
    g.push(r(ExtendsInterfacesOpt, &[t(Extends), n(ClassTypeList)], A::None));

    // --- Enums -----------------------------------------------------------
    g.push(re(EnumDecl, &[n(EnumHeader), n(EnumBody)], A::EnumDecl, Extended));
    g.push(r(EnumHeader, &[n(ModifiersOpt), t(Enum), t(Identifier), n(InterfacesOpt)], A::EnumHeader));
    g.push(r(EnumBody, &[t(LBrace), n(EnumConstantsOpt), n(EnumBodyDeclsOpt), t(RBrace)], A::EnumBody));
    g.push(r(EnumConstantsOpt, &[], A::NodesMarkNone));
    g.push(r(EnumConstantsOpt, &[n(EnumConstants)], A::None));
    g.push(r(EnumConstantsOpt, &[n(EnumConstants), t(Comma)], A::None));
    g.push(r(EnumConstants, &[n(EnumConstant)], A::NodesListFirst));
    g.push(r(EnumConstants, &[n(EnumConstants), t(Comma), n(EnumConstant)], A::NodesListNext));
    g.push(r(EnumConstant, &[t(Identifier)], A::EnumConstPlain));
    g.push(r(EnumConstant, &[t(Identifier), t(LParen), n(ArgListOpt), t(RParen)], A::EnumConstArgs));
    g.push(r(EnumConstant, &[t(Identifier), n(ClassBody)], A::EnumConstBody));
    g.push(r(EnumConstant, &[t(Identifier), t(LParen), n(ArgListOpt), t(RParen), n(ClassBody)], A::EnumConstArgsBody));
    g.push(r(EnumBodyDeclsOpt, &[], A::NodesMarkNone));
    g.push(r(EnumBodyDeclsOpt, &[t(Semi), n(ClassBodyDeclsOpt)], A::None));

    // --- Records ---------------------------------------------------------
    g.push(re(RecordDecl, &[n(RecordHeader), n(ClassBody)], A::RecordDecl, Latest));
    g.push(r(RecordHeader, &[n(ModifiersOpt), t(Record), t(Identifier), n(TypeParamsOpt), t(LParen), n(FormalParamsOpt), t(RParen), n(InterfacesOpt)], A::RecordHeader));

    // --- Annotations and modifiers ---------------------------------------
    g.push(re(Annotation, &[t(At), n(Name)], A::AnnotationMarker, Extended));
    g.push(re(Annotation, &[t(At), n(Name), t(LParen), n(ArgListOpt), t(RParen)], A::AnnotationArgs, Extended));
    g.push(r(ModifiersOpt, &[], A::ModifiersNone));
    g.push(r(ModifiersOpt, &[n(Modifiers)], A::None));
    // A lone modifier's bit accumulator doubles as the list value, so the
    // single-element rule has nothing to do.
    g.push(r(Modifiers, &[n(Modifier)], A::None));
    g.push(r(Modifiers, &[n(Modifiers), n(Modifier)], A::ModifiersNext));
    g.push(r(Modifier, &[t(ModifierKw)], A::ModifierWord));
    g.push(r(Modifier, &[t(Static)], A::ModifierStatic));
    g.push(r(Modifier, &[t(Default)], A::ModifierDefault));
    g.push(r(Modifier, &[n(Annotation)], A::ModifierAnnotation));

    // --- Blocks and statements -------------------------------------------
    g.push(r(Block, &[t(LBrace), n(BlockStatementsOpt), t(RBrace)], A::Block));
    g.push(r(BlockStatementsOpt, &[], A::NodesMarkNone));
    g.push(r(BlockStatementsOpt, &[n(BlockStatements)], A::None));
    g.push(r(BlockStatements, &[n(BlockStatement)], A::NodesListFirst));
    g.push(r(BlockStatements, &[n(BlockStatements), n(BlockStatement)], A::NodesListNext));
    g.push(r(BlockStatement, &[n(LocalVarDeclStatement)], A::None));
    g.push(r(BlockStatement, &[n(ClassDecl)], A::LocalTypeDeclStmt));
    g.push(r(BlockStatement, &[n(Statement)], A::None));
    g.push(r(LocalVarDeclStatement, &[n(LocalVarDecl), t(Semi)], A::None));
    g.push(r(LocalVarDecl, &[n(Type), n(VariableDeclarators)], A::LocalVar));
    g.push(r(LocalVarDecl, &[n(Modifiers), n(Type), n(VariableDeclarators)], A::LocalVarMods));
    g.push(re(LocalVarDecl, &[t(Var), t(Identifier), t(Assign), n(Expression)], A::LocalVarInferred, Latest));
    g.push(re(LocalVarDecl, &[n(Modifiers), t(Var), t(Identifier), t(Assign), n(Expression)], A::LocalVarInferredMods, Latest));
    g.push(r(Statement, &[n(Block)], A::None));
    g.push(r(Statement, &[t(Semi)], A::EmptyStmt));
    g.push(r(Statement, &[n(ExpressionStatement)], A::None));
    g.push(r(Statement, &[t(If), t(LParen), n(Expression), t(RParen), n(Statement)], A::If));
    g.push(r(Statement, &[t(If), t(LParen), n(Expression), t(RParen), n(Statement), t(Else), n(Statement)], A::IfElse));
    g.push(r(Statement, &[t(While), t(LParen), n(Expression), t(RParen), n(Statement)], A::While));
    g.push(r(Statement, &[t(Do), n(Statement), t(While), t(LParen), n(Expression), t(RParen), t(Semi)], A::DoWhile));
    g.push(r(Statement, &[t(For), t(LParen), n(ForInit), t(Semi), n(ForCondOpt), t(Semi), n(ForUpdateOpt), t(RParen), n(Statement)], A::ForBasic));
    g.push(re(Statement, &[t(For), t(LParen), n(Type), t(Identifier), t(Colon), n(Expression), t(RParen), n(Statement)], A::ForEach, Extended));
    g.push(re(Statement, &[t(For), t(LParen), t(Var), t(Identifier), t(Colon), n(Expression), t(RParen), n(Statement)], A::ForEachVar, Latest));
    g.push(r(Statement, &[t(Switch), t(LParen), n(Expression), t(RParen), n(SwitchBlock)], A::SwitchStmt));
    g.push(r(Statement, &[t(Break), t(Semi)], A::Break));
    g.push(r(Statement, &[t(Continue), t(Semi)], A::Continue));
    g.push(r(Statement, &[t(Return), t(Semi)], A::ReturnVoid));
    g.push(r(Statement, &[t(Return), n(Expression), t(Semi)], A::Return));
    g.push(r(Statement, &[n(ThrowStatement)], A::None));
    g.push(r(Statement, &[n(TryStatement)], A::None));
    g.push(r(ExpressionStatement, &[n(Expression), t(Semi)], A::ExprStmt));
    g.push(r(ThrowStatement, &[t(Throw), n(Expression), t(Semi)], A::Throw));
    g.push(r(TryStatement, &[t(Try), n(Block), n(Catches)], A::TryCatch));
    g.push(r(TryStatement, &[t(Try), n(Block), n(Catches), t(Finally), n(Block)], A::TryCatchFinally));
    g.push(r(TryStatement, &[t(Try), n(Block), t(Finally), n(Block)], A::TryFinally));
    g.push(r(Catches, &[n(CatchClause)], A::NodesListFirst));
    g.push(r(Catches, &[n(Catches), n(CatchClause)], A::NodesListNext));
    g.push(r(CatchClause, &[t(Catch), t(LParen), n(ClassType), t(Identifier), t(RParen), n(Block)], A::CatchClause));
    g.push(r(ForInit, &[], A::ForInitNone));
    g.push(r(ForInit, &[n(LocalVarDecl)], A::ForInitLocal));
    g.push(r(ForInit, &[n(ExpressionList)], A::ForInitExprs));
    g.push(r(ForCondOpt, &[], A::ExprsMarkNone));
    g.push(r(ForCondOpt, &[n(Expression)], A::ExprsListFirst));
    g.push(r(ForUpdateOpt, &[], A::ExprsMarkNone));
    g.push(r(ForUpdateOpt, &[n(ExpressionList)], A::None));
    g.push(r(ExpressionList, &[n(Expression)], A::ExprsListFirst));
    g.push(r(ExpressionList, &[n(ExpressionList), t(Comma), n(Expression)], A::ExprsListNext));

    // --- Arrow switch ----------------------------------------------------
    g.push(re(SwitchBlock, &[t(LBrace), n(SwitchRulesOpt), t(RBrace)], A::SwitchBlock, Latest));
    g.push(r(SwitchRulesOpt, &[], A::NodesMarkNone));
    g.push(r(SwitchRulesOpt, &[n(SwitchRules)], A::None));
    g.push(r(SwitchRules, &[n(SwitchRule)], A::NodesListFirst));
    g.push(r(SwitchRules, &[n(SwitchRules), n(SwitchRule)], A::NodesListNext));
    g.push(r(SwitchRule, &[n(SwitchLabel), t(Arrow), n(SwitchRuleBody)], A::SwitchRule));
    g.push(r(SwitchLabel, &[t(Case), n(CaseItemList)], A::LabelCase));
    g.push(r(SwitchLabel, &[t(Default)], A::LabelDefault));
    g.push(r(CaseItemList, &[n(CaseItem)], A::NodesListFirst));
    g.push(r(CaseItemList, &[n(CaseItemList), t(Comma), n(CaseItem)], A::NodesListNext));
    g.push(r(CaseItem, &[n(ConditionalExpression)], A::CaseExpr));
    g.push(re(CaseItem, &[n(TypePattern)], A::None, Latest));
    g.push(r(TypePattern, &[n(Type), t(Identifier)], A::CasePattern));
    g.push(r(SwitchRuleBody, &[n(Expression), t(Semi)], A::RuleExprBody));
    g.push(r(SwitchRuleBody, &[n(Block)], A::RuleBlockBody));
    g.push(r(SwitchRuleBody, &[n(ThrowStatement)], A::RuleThrowBody));

    // --- Expressions -----------------------------------------------------
    g.push(r(Expression, &[n(AssignmentExpression)], A::None));
    g.push(r(AssignmentExpression, &[n(ConditionalExpression)], A::None));
    g.push(r(AssignmentExpression, &[n(PostfixExpression), t(Assign), n(AssignmentExpression)], A::Assign));
    g.push(r(AssignmentExpression, &[n(PostfixExpression), t(OpAssign), n(AssignmentExpression)], A::CompoundAssign));
    g.push(re(AssignmentExpression, &[n(LambdaExpression)], A::None, Latest));
    g.push(re(LambdaExpression, &[t(Identifier), t(Arrow), n(LambdaBody)], A::LambdaIdent, Latest));
    g.push(re(LambdaExpression, &[t(LParenLambda), n(LambdaParamsOpt), t(RParen), t(Arrow), n(LambdaBody)], A::LambdaParens, Latest));
    g.push(r(LambdaParamsOpt, &[], A::NodesMarkNone));
    g.push(r(LambdaParamsOpt, &[n(LambdaParams)], A::None));
    g.push(r(LambdaParams, &[n(LambdaParam)], A::NodesListFirst));
    g.push(r(LambdaParams, &[n(LambdaParams), t(Comma), n(LambdaParam)], A::NodesListNext));
    g.push(r(LambdaParam, &[t(Identifier)], A::LambdaParamPlain));
    g.push(r(LambdaParam, &[n(Type), t(Identifier)], A::LambdaParamTyped));
    g.push(r(LambdaBody, &[n(Expression)], A::LambdaBodyExpr));
    g.push(r(LambdaBody, &[n(Block)], A::LambdaBodyBlock));
    g.push(r(ConditionalExpression, &[n(OrExpression)], A::None));
    g.push(r(ConditionalExpression, &[n(OrExpression), t(Question), n(Expression), t(Colon), n(ConditionalExpression)], A::Ternary));
    g.push(r(OrExpression, &[n(AndExpression)], A::None));
    g.push(r(OrExpression, &[n(OrExpression), t(OrOr), n(AndExpression)], A::Binary(BinaryOp::Or)));
    g.push(r(AndExpression, &[n(InclusiveOrExpression)], A::None));
    g.push(r(AndExpression, &[n(AndExpression), t(AndAnd), n(InclusiveOrExpression)], A::Binary(BinaryOp::And)));
    g.push(r(InclusiveOrExpression, &[n(ExclusiveOrExpression)], A::None));
    g.push(r(InclusiveOrExpression, &[n(InclusiveOrExpression), t(Or), n(ExclusiveOrExpression)], A::Binary(BinaryOp::BitOr)));
    g.push(r(ExclusiveOrExpression, &[n(AndBitExpression)], A::None));
    g.push(r(ExclusiveOrExpression, &[n(ExclusiveOrExpression), t(Xor), n(AndBitExpression)], A::Binary(BinaryOp::BitXor)));
    g.push(r(AndBitExpression, &[n(EqualityExpression)], A::None));
    g.push(r(AndBitExpression, &[n(AndBitExpression), t(And), n(EqualityExpression)], A::Binary(BinaryOp::BitAnd)));
    g.push(r(EqualityExpression, &[n(RelationalExpression)], A::None));
    g.push(r(EqualityExpression, &[n(EqualityExpression), t(EqEq), n(RelationalExpression)], A::Binary(BinaryOp::Eq)));
    g.push(r(EqualityExpression, &[n(EqualityExpression), t(NotEq), n(RelationalExpression)], A::Binary(BinaryOp::NotEq)));
    g.push(r(RelationalExpression, &[n(AdditiveExpression)], A::None));
    g.push(r(RelationalExpression, &[n(RelationalExpression), t(Lt), n(AdditiveExpression)], A::Binary(BinaryOp::Lt)));
    g.push(r(RelationalExpression, &[n(RelationalExpression), t(Gt), n(AdditiveExpression)], A::Binary(BinaryOp::Gt)));
    g.push(r(RelationalExpression, &[n(RelationalExpression), t(Le), n(AdditiveExpression)], A::Binary(BinaryOp::Le)));
    g.push(r(RelationalExpression, &[n(RelationalExpression), t(Ge), n(AdditiveExpression)], A::Binary(BinaryOp::Ge)));
    g.push(r(RelationalExpression, &[n(RelationalExpression), t(Instanceof), n(ReferenceType)], A::InstanceofType));
    g.push(re(RelationalExpression, &[n(RelationalExpression), t(Instanceof), n(ReferenceType), t(Identifier)], A::InstanceofPattern, Latest));
    g.push(r(AdditiveExpression, &[n(MultiplicativeExpression)], A::None));
    g.push(r(AdditiveExpression, &[n(AdditiveExpression), t(Plus), n(MultiplicativeExpression)], A::Binary(BinaryOp::Add)));
    g.push(r(AdditiveExpression, &[n(AdditiveExpression), t(Minus), n(MultiplicativeExpression)], A::Binary(BinaryOp::Sub)));
    g.push(r(MultiplicativeExpression, &[n(UnaryExpression)], A::None));
    g.push(r(MultiplicativeExpression, &[n(MultiplicativeExpression), t(Star), n(UnaryExpression)], A::Binary(BinaryOp::Mul)));
    g.push(r(MultiplicativeExpression, &[n(MultiplicativeExpression), t(Slash), n(UnaryExpression)], A::Binary(BinaryOp::Div)));
    g.push(r(MultiplicativeExpression, &[n(MultiplicativeExpression), t(Percent), n(UnaryExpression)], A::Binary(BinaryOp::Rem)));
    g.push(r(UnaryExpression, &[n(UnaryNotPlusMinus)], A::None));
    g.push(r(UnaryExpression, &[t(Plus), n(UnaryExpression)], A::Unary(UnaryOp::Plus)));
    g.push(r(UnaryExpression, &[t(Minus), n(UnaryExpression)], A::Unary(UnaryOp::Minus)));
    g.push(r(UnaryExpression, &[t(PlusPlus), n(UnaryExpression)], A::Unary(UnaryOp::PreIncr)));
    g.push(r(UnaryExpression, &[t(MinusMinus), n(UnaryExpression)], A::Unary(UnaryOp::PreDecr)));
    g.push(r(UnaryNotPlusMinus, &[n(PostfixExpression)], A::None));
    g.push(r(UnaryNotPlusMinus, &[t(Not), n(UnaryExpression)], A::Unary(UnaryOp::Not)));
    g.push(r(UnaryNotPlusMinus, &[t(Tilde), n(UnaryExpression)], A::Unary(UnaryOp::BitNot)));
    g.push(r(UnaryNotPlusMinus, &[n(CastExpression)], A::None));
    g.push(r(CastExpression, &[t(LParen), n(Expression), t(RParen), n(UnaryNotPlusMinus)], A::CastExpr));
    g.push(re(CastExpression, &[t(LParen), n(Name), n(TypeArguments), t(RParen), n(UnaryNotPlusMinus)], A::CastGeneric, Extended));
    g.push(r(CastExpression, &[t(LParen), n(Name), n(Dims), t(RParen), n(UnaryNotPlusMinus)], A::CastNameArray));
    g.push(r(CastExpression, &[t(LParen), n(PrimitiveType), t(RParen), n(UnaryExpression)], A::CastPrimitive));
    g.push(r(CastExpression, &[t(LParen), n(PrimitiveType), n(Dims), t(RParen), n(UnaryExpression)], A::CastPrimArray));
    g.push(r(PostfixExpression, &[n(Primary)], A::None));
    g.push(r(PostfixExpression, &[n(Name)], A::ExprName));
    g.push(r(PostfixExpression, &[n(PostfixExpression), t(PlusPlus)], A::Postfix(UnaryOp::PostIncr)));
    g.push(r(PostfixExpression, &[n(PostfixExpression), t(MinusMinus)], A::Postfix(UnaryOp::PostDecr)));
    g.push(r(Primary, &[n(Literal)], A::None));
    g.push(r(Primary, &[t(This)], A::This));
    g.push(r(Primary, &[t(LParen), n(Expression), t(RParen)], A::ParenExpr));
    g.push(r(Primary, &[n(Name), t(LParen), n(ArgListOpt), t(RParen)], A::InvokeName));
    g.push(r(Primary, &[n(Primary), t(Dot), t(Identifier)], A::FieldAccess));
    g.push(r(Primary, &[n(Primary), t(Dot), t(Identifier), t(LParen), n(ArgListOpt), t(RParen)], A::InvokeExpr));
    g.push(r(Primary, &[t(Super), t(Dot), t(Identifier)], A::SuperField));
    g.push(r(Primary, &[t(Super), t(Dot), t(Identifier), t(LParen), n(ArgListOpt), t(RParen)], A::InvokeSuperMethod));
    g.push(r(Primary, &[t(Super), t(LParen), n(ArgListOpt), t(RParen)], A::InvokeSuperCtor));
    g.push(r(Primary, &[t(This), t(LParen), n(ArgListOpt), t(RParen)], A::InvokeThisCtor));
    g.push(r(Primary, &[n(Name), t(LBracket), n(Expression), t(RBracket)], A::IndexName));
    g.push(r(Primary, &[n(Primary), t(LBracket), n(Expression), t(RBracket)], A::IndexExpr));
    g.push(r(Primary, &[t(New), n(ClassType), t(LParen), n(ArgListOpt), t(RParen)], A::New));
    g.push(r(Primary, &[t(New), n(ClassType), t(LParen), n(ArgListOpt), t(RParen), n(ClassBody)], A::NewAnon));
    g.push(r(Primary, &[t(New), n(PrimitiveType), n(DimExprs)], A::NewArraySized));
    g.push(r(Primary, &[t(New), n(ClassType), n(DimExprs)], A::NewArraySized));
    g.push(r(Primary, &[t(New), n(PrimitiveType), n(Dims), n(ArrayInit)], A::NewArrayInitd));
    g.push(r(Primary, &[t(New), n(ClassType), n(Dims), n(ArrayInit)], A::NewArrayInitd));
    g.push(r(Literal, &[t(IntLit)], A::Literal(LiteralKind::Int)));
    g.push(r(Literal, &[t(FloatLit)], A::Literal(LiteralKind::Float)));
    g.push(r(Literal, &[t(CharLit)], A::Literal(LiteralKind::Char)));
    g.push(r(Literal, &[t(StringLit)], A::Literal(LiteralKind::String)));
    g.push(r(Literal, &[t(BoolLit)], A::Literal(LiteralKind::Bool)));
    g.push(r(Literal, &[t(NullLit)], A::Literal(LiteralKind::Null)));
    g.push(r(ArgListOpt, &[], A::ExprsMarkNone));
    g.push(r(ArgListOpt, &[n(ArgList)], A::None));
    g.push(r(ArgList, &[n(Expression)], A::ExprsListFirst));
    g.push(r(ArgList, &[n(ArgList), t(Comma), n(Expression)], A::ExprsListNext));
    g.push(r(DimExprs, &[t(LBracket), n(Expression), t(RBracket)], A::ExprsListFirst));
    g.push(r(DimExprs, &[n(DimExprs), t(LBracket), n(Expression), t(RBracket)], A::ExprsListNext));

    g
}
