use crate::error::TokenSpan;
use serde::{Deserialize, Serialize};

pub type Span = TokenSpan;

/// Root of one parsed source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub usings: Vec<UsingDirective>,
    pub members: Vec<Declaration>,
    pub span: Span,
}

impl CompilationUnit {
    pub fn new(span: Span) -> Self {
        Self {
            usings: Vec::new(),
            members: Vec::new(),
            span,
        }
    }
}

/// `using` directive. `name` is the imported namespace or type as written,
/// without `static`, `global` or an alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsingDirective {
    pub name: String,
    pub alias: Option<String>,
    pub is_static: bool,
    pub is_global: bool,
    pub span: Span,
}

/// Top-level or namespace-level declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Declaration {
    Namespace(NamespaceDecl),
    Type(TypeDecl),
}

/// Namespace declaration, either block-bodied or file-scoped (`namespace A.B;`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceDecl {
    pub name: String,
    pub file_scoped: bool,
    pub usings: Vec<UsingDirective>,
    pub members: Vec<Declaration>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Record,
    Enum,
}

/// Class, struct, interface, record or enum declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: String,
    pub attributes: Vec<AttributeList>,
    pub modifiers: Vec<String>,
    pub type_parameters: Vec<TypeParameter>,
    pub base_types: Vec<String>,
    pub constraint_clauses: Vec<ConstraintClause>,
    /// Always empty for enums
    pub members: Vec<MemberDecl>,
    pub span: Span,
}

impl TypeDecl {
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDecl> {
        self.members.iter().filter_map(|member| match member {
            MemberDecl::Property(property) => Some(property),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|member| match member {
            MemberDecl::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn nested_types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.members.iter().filter_map(|member| match member {
            MemberDecl::Type(nested) => Some(nested),
            _ => None,
        })
    }
}

/// One bracketed attribute section, e.g. `[type: Foo, Bar(1)]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeList {
    pub target: Option<String>,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Name as written, possibly qualified (`System.Serializable`)
    pub name: String,
    /// Argument list as written, including parentheses
    pub arguments: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParameter {
    pub name: String,
    /// `in` / `out` variance annotation on interface and delegate parameters
    pub variance: Option<String>,
    pub span: Span,
}

/// `where T : c1, c2` with each constraint kept as written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintClause {
    pub type_parameter: String,
    pub constraints: Vec<String>,
    pub span: Span,
}

/// Member of a type body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MemberDecl {
    Property(PropertyDecl),
    Method(MethodDecl),
    Type(TypeDecl),
    /// Fields, events, indexers, operators, constructors, delegates
    Other { span: Span },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessorKind {
    Get,
    Set,
    Init,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accessor {
    pub kind: AccessorKind,
    pub modifiers: Vec<String>,
    pub has_body: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub attributes: Vec<AttributeList>,
    pub modifiers: Vec<String>,
    pub ty: String,
    pub name: String,
    /// Accessors in declaration order. Expression-bodied properties get a
    /// single synthesized `get`.
    pub accessors: Vec<Accessor>,
    pub span: Span,
}

impl PropertyDecl {
    pub fn has_accessor(&self, kind: AccessorKind) -> bool {
        self.accessors.iter().any(|accessor| accessor.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub attributes: Vec<AttributeList>,
    pub modifiers: Vec<String>,
    pub return_type: String,
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<ParameterDecl>,
    pub constraint_clauses: Vec<ConstraintClause>,
    pub has_body: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub attributes: Vec<AttributeList>,
    /// `ref`, `out`, `in`, `params`, `this`, `scoped`, `readonly` as written
    pub modifiers: Vec<String>,
    pub ty: String,
    pub name: String,
    pub default_value: Option<String>,
    pub span: Span,
}
