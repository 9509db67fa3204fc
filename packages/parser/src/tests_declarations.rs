//! Parsing tests against whole source files shaped like real Unity scripts

use crate::ast::*;
use crate::parse;

fn collect_types(decls: &[Declaration], out: &mut Vec<String>) {
    for decl in decls {
        match decl {
            Declaration::Namespace(ns) => collect_types(&ns.members, out),
            Declaration::Type(ty) => collect_type(ty, out),
        }
    }
}

fn collect_type(ty: &TypeDecl, out: &mut Vec<String>) {
    out.push(ty.name.clone());
    for nested in ty.nested_types() {
        collect_type(nested, out);
    }
}

#[test]
fn test_unity_script_file() {
    let source = r#"
// Copyright notice
#nullable enable
using System;
using System.Collections.Generic;
using UnityEngine;

namespace Game.Inventory
{
    /// <summary>
    /// Something that can be stored.
    /// </summary>
    [SerializableInterface]
    public interface IStorable
    {
        string Id { get; }
        int Weight { get; set; }
        float Durability { set; }

        bool CanStack(IStorable other);
        T Convert<T>(Func<IStorable, T> converter) where T : class;
        void Store(Dictionary<string, List<IStorable>> into, int slot = -1);
    }

    public sealed class Chest : MonoBehaviour, IStorable
    {
        [SerializeField] private List<SIStorable> contents = new List<SIStorable>();

        public string Id => name;
        public int Weight { get; set; }
        public float Durability { set { } }

        public bool CanStack(IStorable other) => other.Id == Id;

        public T Convert<T>(Func<IStorable, T> converter) where T : class
        {
            return converter(this);
        }

        public void Store(Dictionary<string, List<IStorable>> into, int slot = -1)
        {
            foreach (var item in contents)
            {
                Debug.Log($"Storing {item} in slot {slot}");
            }
        }

#if UNITY_EDITOR
        private void OnValidate() { }
#endif
    }
}
"#;

    let unit = parse(source).expect("Failed to parse");
    assert_eq!(unit.usings.len(), 3);

    let mut names = Vec::new();
    collect_types(&unit.members, &mut names);
    assert_eq!(names, vec!["IStorable", "Chest"]);

    let ns = match &unit.members[0] {
        Declaration::Namespace(ns) => ns,
        other => panic!("Expected namespace, got {:?}", other),
    };
    let storable = match &ns.members[0] {
        Declaration::Type(ty) => ty,
        other => panic!("Expected interface, got {:?}", other),
    };

    let props: Vec<_> = storable.properties().map(|p| p.name.as_str()).collect();
    assert_eq!(props, vec!["Id", "Weight", "Durability"]);

    let methods: Vec<_> = storable.methods().collect();
    assert_eq!(methods.len(), 3);
    assert_eq!(methods[1].parameters[0].ty, "Func<IStorable, T>");
    assert_eq!(methods[2].parameters[0].ty, "Dictionary<string, List<IStorable>>");
    assert_eq!(methods[2].parameters[1].default_value.as_deref(), Some("-1"));
    assert!(methods.iter().all(|m| !m.has_body));
}

#[test]
fn test_interface_members_with_default_implementations() {
    let source = r#"
        interface ILogger
        {
            void Log(string message);
            void LogError(string message) { Log("error: " + message); }
            string Prefix => "[log]";
            static ILogger Default { get; }
            event Action<string> Logged;
            string this[int index] { get; }
        }
    "#;

    let unit = parse(source).expect("Failed to parse");
    let logger = match &unit.members[0] {
        Declaration::Type(ty) => ty,
        other => panic!("Expected interface, got {:?}", other),
    };

    let methods: Vec<_> = logger.methods().collect();
    assert_eq!(methods.len(), 2);
    assert!(!methods[0].has_body);
    assert!(methods[1].has_body);

    let props: Vec<_> = logger.properties().collect();
    assert_eq!(props.len(), 2);
    assert_eq!(props[1].modifiers, vec!["static"]);

    let others = logger
        .members
        .iter()
        .filter(|m| matches!(m, MemberDecl::Other { .. }))
        .count();
    assert_eq!(others, 2);
}

#[test]
fn test_generic_interface_declaration() {
    let source = r#"
        public interface IRepository<in TKey, TValue> : IEnumerable<TValue>
            where TKey : notnull
            where TValue : class, new()
        {
            TValue Find(TKey key);
        }
    "#;

    let unit = parse(source).expect("Failed to parse");
    let repo = match &unit.members[0] {
        Declaration::Type(ty) => ty,
        other => panic!("Expected interface, got {:?}", other),
    };

    assert_eq!(repo.type_parameters[0].variance.as_deref(), Some("in"));
    assert_eq!(repo.type_parameters[1].name, "TValue");
    assert_eq!(repo.base_types, vec!["IEnumerable<TValue>"]);
    assert_eq!(repo.constraint_clauses.len(), 2);
    assert_eq!(repo.constraint_clauses[1].constraints, vec!["class", "new()"]);
}

#[test]
fn test_nested_namespaces() {
    let source = r#"
        namespace Outer
        {
            namespace Inner.Deep
            {
                interface IFoo {}
            }
            interface IBar {}
        }
    "#;

    let unit = parse(source).expect("Failed to parse");
    let outer = match &unit.members[0] {
        Declaration::Namespace(ns) => ns,
        other => panic!("Expected namespace, got {:?}", other),
    };

    assert_eq!(outer.members.len(), 2);
    match &outer.members[0] {
        Declaration::Namespace(inner) => assert_eq!(inner.name, "Inner.Deep"),
        other => panic!("Expected namespace, got {:?}", other),
    }
}

#[test]
fn test_tree_serializes_to_json() {
    let unit = parse("namespace N { interface IFoo { int Bar { get; } } }").expect("Failed to parse");
    let json = serde_json::to_string(&unit).expect("Failed to serialize");

    assert!(json.contains("\"name\":\"IFoo\""));
    assert!(json.contains("\"Interface\""));
}

#[test]
fn test_stray_closing_brace_fails() {
    assert!(parse("interface IFoo {} }").is_err());
}

#[test]
fn test_unicode_member_names() {
    let source = r#"
        namespace Spiel
        {
            interface IWaffe
            {
                float Größe { get; }
                void Schießen(int stärke);
            }
        }
    "#;

    let unit = parse(source).expect("Failed to parse");
    let ns = match &unit.members[0] {
        Declaration::Namespace(ns) => ns,
        other => panic!("Expected namespace, got {:?}", other),
    };
    let weapon = match &ns.members[0] {
        Declaration::Type(ty) => ty,
        other => panic!("Expected interface, got {:?}", other),
    };

    assert_eq!(weapon.properties().next().map(|p| p.name.as_str()), Some("Größe"));
    let method = weapon.methods().next().expect("Expected a method");
    assert_eq!(method.name, "Schießen");
    assert_eq!(method.parameters[0].name, "stärke");
}

#[test]
fn test_editor_only_declaration_header() {
    let source = r#"
        namespace Game
        {
#if UNITY_EDITOR
            [SerializableInterface]
            public interface IDamageable : IEditorPreview
#else
            [SerializableInterface]
            public interface IDamageable
#endif
            {
                int Health { get; }
#if UNITY_EDITOR
                void DrawGizmo();
#endif
            }
        }
    "#;

    let unit = parse(source).expect("Failed to parse");
    let ns = match &unit.members[0] {
        Declaration::Namespace(ns) => ns,
        other => panic!("Expected namespace, got {:?}", other),
    };
    assert_eq!(ns.members.len(), 1);
    let damageable = match &ns.members[0] {
        Declaration::Type(ty) => ty,
        other => panic!("Expected interface, got {:?}", other),
    };

    assert_eq!(damageable.attributes.len(), 1);
    assert!(damageable.base_types.is_empty());
    assert_eq!(damageable.properties().count(), 1);
    assert_eq!(damageable.methods().count(), 0);
}

#[test]
fn test_explicit_implementations_are_not_interface_members() {
    let source = r#"
        interface IFoo : IBar
        {
            void Run();
            void IBar.Run() { }
            int IBar.Count => 0;
            string IBar.Name { get { return ""; } }
            event Action IBar.Changed { add { } remove { } }
        }
    "#;

    let unit = parse(source).expect("Failed to parse");
    let foo = match &unit.members[0] {
        Declaration::Type(ty) => ty,
        other => panic!("Expected interface, got {:?}", other),
    };

    let methods: Vec<_> = foo.methods().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["Run"]);
    assert_eq!(foo.properties().count(), 0);
    assert_eq!(foo.members.len(), 5);
}
