use crate::marker::has_marker;
use crate::model::{ConstraintClause, InterfaceDeclaration, MethodMember, Parameter, PropertyMember};
use sigen_common::{walk_compilation_unit, walk_namespace, walk_type_decl, GenerateResult, Visitor};
use sigen_parser::ast::{self, AccessorKind, CompilationUnit, NamespaceDecl, TypeDecl};
use sigen_parser::parse;
use std::path::Path;
use tracing::{debug, instrument};

/// Collects marked interfaces while the declaration tree is walked.
///
/// Namespace and import context travels down with the walk, so each match is
/// captured with the namespace it sits in without looking back up the tree.
#[derive(Debug, Default)]
pub struct InterfaceReceiver {
    imports: Vec<String>,
    namespaces: Vec<String>,
    interfaces: Vec<InterfaceDeclaration>,
}

impl InterfaceReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marked interfaces seen so far, in declaration order
    pub fn interfaces(&self) -> &[InterfaceDeclaration] {
        &self.interfaces
    }

    pub fn into_interfaces(self) -> Vec<InterfaceDeclaration> {
        self.interfaces
    }

    fn current_namespace(&self) -> String {
        self.namespaces.join(".")
    }
}

impl Visitor for InterfaceReceiver {
    fn visit_compilation_unit(&mut self, unit: &CompilationUnit) {
        self.imports = unit.usings.iter().map(|using| using.name.clone()).collect();
        walk_compilation_unit(self, unit);
    }

    fn visit_namespace(&mut self, namespace: &NamespaceDecl) {
        self.namespaces.push(namespace.name.clone());
        walk_namespace(self, namespace);
        self.namespaces.pop();
    }

    fn visit_type_decl(&mut self, decl: &TypeDecl) {
        if decl.is_interface() && has_marker(&decl.attributes) {
            let interface = build_interface(decl, self.current_namespace(), self.imports.clone());
            debug!(
                interface = %interface.name,
                namespace = %interface.namespace,
                properties = interface.properties.len(),
                methods = interface.methods.len(),
                "Found marked interface"
            );
            self.interfaces.push(interface);
        }

        walk_type_decl(self, decl);
    }
}

/// Parse source text and collect every marked interface in it.
///
/// A parse error fails the whole file; no interfaces found before the error
/// are returned.
#[instrument(skip(source, path), fields(path = %path.display()))]
pub fn extract(source: &str, path: &Path) -> GenerateResult<Vec<InterfaceDeclaration>> {
    let unit = parse(source)?;
    Ok(extract_from_unit(&unit))
}

/// Collect marked interfaces from an already parsed file
pub fn extract_from_unit(unit: &CompilationUnit) -> Vec<InterfaceDeclaration> {
    let mut receiver = InterfaceReceiver::new();
    receiver.visit_compilation_unit(unit);
    receiver.into_interfaces()
}

fn build_interface(decl: &TypeDecl, namespace: String, imports: Vec<String>) -> InterfaceDeclaration {
    InterfaceDeclaration {
        name: decl.name.clone(),
        namespace,
        imports,
        type_parameters: decl.type_parameters.iter().map(|t| t.name.clone()).collect(),
        constraint_clauses: decl.constraint_clauses.iter().map(build_constraint).collect(),
        properties: decl.properties().filter_map(build_property).collect(),
        methods: decl.methods().map(build_method).collect(),
    }
}

/// Properties without a get or set accessor (`init`-only) have nothing to forward
fn build_property(property: &ast::PropertyDecl) -> Option<PropertyMember> {
    let has_getter = property.has_accessor(AccessorKind::Get);
    let has_setter = property.has_accessor(AccessorKind::Set);

    if !has_getter && !has_setter {
        debug!(property = %property.name, "Skipping property without get or set accessor");
        return None;
    }

    Some(PropertyMember {
        name: property.name.clone(),
        ty: property.ty.clone(),
        has_getter,
        has_setter,
    })
}

fn build_method(method: &ast::MethodDecl) -> MethodMember {
    let modifiers = if method.modifiers.is_empty() {
        vec!["public".to_string()]
    } else {
        method.modifiers.clone()
    };

    MethodMember {
        name: method.name.clone(),
        return_type: method.return_type.clone(),
        parameters: method.parameters.iter().map(build_parameter).collect(),
        type_parameters: method.type_parameters.iter().map(|t| t.name.clone()).collect(),
        constraint_clauses: method.constraint_clauses.iter().map(build_constraint).collect(),
        modifiers,
    }
}

fn build_parameter(parameter: &ast::ParameterDecl) -> Parameter {
    Parameter {
        modifiers: parameter.modifiers.clone(),
        ty: parameter.ty.clone(),
        name: parameter.name.clone(),
        default_value: parameter.default_value.clone(),
    }
}

fn build_constraint(clause: &ast::ConstraintClause) -> ConstraintClause {
    ConstraintClause {
        type_parameter: clause.type_parameter.clone(),
        constraints: clause.constraints.clone(),
    }
}
