//! Language-neutral generation inputs for one marked interface.
//!
//! Everything is copied out of the declaration tree as plain strings so the
//! emitter never touches syntax nodes.

use serde::Serialize;

/// Sentinel return type for methods that return nothing
pub const VOID: &str = "void";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceDeclaration {
    pub name: String,
    /// Dotted namespace, empty for the global namespace
    pub namespace: String,
    /// Imported names from the file's top-level `using` directives
    pub imports: Vec<String>,
    pub type_parameters: Vec<String>,
    pub constraint_clauses: Vec<ConstraintClause>,
    pub properties: Vec<PropertyMember>,
    pub methods: Vec<MethodMember>,
}

impl InterfaceDeclaration {
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    /// Interface name with its type parameters, e.g. `IRepo<TKey, TValue>`
    pub fn type_name(&self) -> String {
        if self.is_generic() {
            format!("{}<{}>", self.name, self.type_parameters.join(", "))
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyMember {
    pub name: String,
    pub ty: String,
    pub has_getter: bool,
    pub has_setter: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodMember {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<Parameter>,
    pub type_parameters: Vec<String>,
    pub constraint_clauses: Vec<ConstraintClause>,
    /// Never empty: methods declared without modifiers get `public`
    pub modifiers: Vec<String>,
}

impl MethodMember {
    pub fn returns_value(&self) -> bool {
        self.return_type != VOID
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub modifiers: Vec<String>,
    pub ty: String,
    pub name: String,
    pub default_value: Option<String>,
}

impl Parameter {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            modifiers: Vec::new(),
            ty: ty.into(),
            name: name.into(),
            default_value: None,
        }
    }

    /// Keyword the argument needs when forwarded at a call site
    pub fn argument_modifier(&self) -> Option<&'static str> {
        let has = |m: &str| self.modifiers.iter().any(|modifier| modifier == m);

        if has("out") {
            Some("out")
        } else if has("ref") && has("readonly") {
            Some("in")
        } else if has("ref") {
            Some("ref")
        } else if has("in") {
            Some("in")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintClause {
    pub type_parameter: String,
    pub constraints: Vec<String>,
}
