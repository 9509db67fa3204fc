use sigen_parser::ast::*;

/// Visitor pattern for traversing the declaration tree immutably
///
/// This trait provides default implementations that walk the entire tree.
/// Override specific visit_* methods to perform custom actions on nodes.
/// An override that still wants the children visited calls the matching
/// `walk_*` function itself, which lets it keep context around the walk.
pub trait Visitor: Sized {
    fn visit_compilation_unit(&mut self, unit: &CompilationUnit) {
        walk_compilation_unit(self, unit);
    }

    fn visit_using(&mut self, _using: &UsingDirective) {
        // Leaf node, no children to walk
    }

    fn visit_namespace(&mut self, namespace: &NamespaceDecl) {
        walk_namespace(self, namespace);
    }

    fn visit_type_decl(&mut self, decl: &TypeDecl) {
        walk_type_decl(self, decl);
    }

    fn visit_property(&mut self, _property: &PropertyDecl) {
        // Leaf node, no children to walk
    }

    fn visit_method(&mut self, _method: &MethodDecl) {
        // Leaf node, no children to walk
    }
}

pub fn walk_compilation_unit<V: Visitor>(visitor: &mut V, unit: &CompilationUnit) {
    for using in &unit.usings {
        visitor.visit_using(using);
    }
    for decl in &unit.members {
        walk_declaration(visitor, decl);
    }
}

pub fn walk_declaration<V: Visitor>(visitor: &mut V, decl: &Declaration) {
    match decl {
        Declaration::Namespace(namespace) => visitor.visit_namespace(namespace),
        Declaration::Type(ty) => visitor.visit_type_decl(ty),
    }
}

pub fn walk_namespace<V: Visitor>(visitor: &mut V, namespace: &NamespaceDecl) {
    for using in &namespace.usings {
        visitor.visit_using(using);
    }
    for decl in &namespace.members {
        walk_declaration(visitor, decl);
    }
}

pub fn walk_type_decl<V: Visitor>(visitor: &mut V, decl: &TypeDecl) {
    for member in &decl.members {
        match member {
            MemberDecl::Property(property) => visitor.visit_property(property),
            MemberDecl::Method(method) => visitor.visit_method(method),
            MemberDecl::Type(nested) => visitor.visit_type_decl(nested),
            MemberDecl::Other { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigen_parser::parse;

    #[derive(Default)]
    struct Counter {
        usings: usize,
        namespaces: usize,
        types: Vec<String>,
        properties: usize,
        methods: usize,
    }

    impl Visitor for Counter {
        fn visit_using(&mut self, _using: &UsingDirective) {
            self.usings += 1;
        }

        fn visit_namespace(&mut self, namespace: &NamespaceDecl) {
            self.namespaces += 1;
            walk_namespace(self, namespace);
        }

        fn visit_type_decl(&mut self, decl: &TypeDecl) {
            self.types.push(decl.name.clone());
            walk_type_decl(self, decl);
        }

        fn visit_property(&mut self, _property: &PropertyDecl) {
            self.properties += 1;
        }

        fn visit_method(&mut self, _method: &MethodDecl) {
            self.methods += 1;
        }
    }

    #[test]
    fn test_walks_whole_tree_in_order() {
        let source = r#"
            using System;
            namespace A
            {
                using B;
                class Outer
                {
                    interface IInner { int X { get; } void Y(); }
                    void Z() { }
                }
            }
            interface ITop {}
        "#;

        let unit = parse(source).unwrap();
        let mut counter = Counter::default();
        counter.visit_compilation_unit(&unit);

        assert_eq!(counter.usings, 2);
        assert_eq!(counter.namespaces, 1);
        assert_eq!(counter.types, vec!["Outer", "IInner", "ITop"]);
        assert_eq!(counter.properties, 1);
        assert_eq!(counter.methods, 2);
    }
}
