use crate::{extract, render, render_source, GeneratorSettings};
use std::path::Path;

fn lines(lines: &[&str]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_only(source: &str) -> String {
    let units = render_source(source, Path::new("Assets/IFoo.cs"), &GeneratorSettings::default())
        .expect("Failed to render");
    assert_eq!(units.len(), 1, "expected exactly one marked interface");
    units[0].text.clone()
}

#[test]
fn test_end_to_end_forwarding_class() {
    let source = r#"
using System;

namespace N
{
    [SerializableInterface]
    public interface IFoo
    {
        int Bar { get; set; }
        void Baz(int x);
    }
}
"#;

    let units = render_source(source, Path::new("Assets/IFoo.cs"), &GeneratorSettings::default())
        .expect("Failed to render");
    assert_eq!(units[0].output_path, Path::new("Assets/SIFoo.g.cs"));

    println!("Generated code:\n{}", units[0].text);

    let expected = lines(&[
        "// <auto-generated />",
        "using System;",
        "",
        "namespace N",
        "{",
        "    [System.Serializable]",
        "    /// <inheritdoc />",
        "    public class SIFoo : SerializableInterface<IFoo>",
        "    {",
        "        /// <inheritdoc />",
        "        public int Bar",
        "        {",
        "            get { return Value.Bar; }",
        "            set { Value.Bar = value; }",
        "        }",
        "        /// <inheritdoc />",
        "        public void Baz(int x)",
        "        {",
        "            Value.Baz(x);",
        "        }",
        "    }",
        "}",
    ]);
    assert_eq!(units[0].text, expected);
}

#[test]
fn test_global_namespace_uses_base_indentation() {
    let output = render_only("[SerializableInterface] interface IFoo { string Name { get; } }");

    let expected = lines(&[
        "// <auto-generated />",
        "",
        "[System.Serializable]",
        "/// <inheritdoc />",
        "public class SIFoo : SerializableInterface<IFoo>",
        "{",
        "    /// <inheritdoc />",
        "    public string Name",
        "    {",
        "        get { return Value.Name; }",
        "    }",
        "}",
    ]);
    assert_eq!(output, expected);
}

#[test]
fn test_dotted_namespace_wraps_one_level() {
    let output = render_only("namespace A.B { [SerializableInterface] interface IFoo { } }");

    assert!(output.contains("namespace A.B\n{\n    [System.Serializable]\n"));
    assert!(output.contains("    public class SIFoo : SerializableInterface<IFoo>\n    {\n    }\n}\n"));
}

#[test]
fn test_setter_only_and_accessor_order() {
    let output = render_only(
        r#"
        [SerializableInterface]
        interface IFoo
        {
            float Speed { set; }
            int Count { set; get; }
        }
        "#,
    );

    assert!(output.contains(
        "    public float Speed\n    {\n        set { Value.Speed = value; }\n    }\n"
    ));
    assert!(output.contains(
        "    public int Count\n    {\n        get { return Value.Count; }\n        set { Value.Count = value; }\n    }\n"
    ));
}

#[test]
fn test_expression_bodied_property_is_getter_only() {
    let output = render_only("[SerializableInterface] interface IFoo { int Max => 10; }");

    assert!(output.contains("get { return Value.Max; }"));
    assert!(!output.contains("set {"));
}

#[test]
fn test_generic_method_with_constraint() {
    let output = render_only(
        r#"
        [SerializableInterface]
        interface IFoo
        {
            T Get<T>(string key) where T : IFoo;
        }
        "#,
    );

    let expected = lines(&[
        "    /// <inheritdoc />",
        "    public T Get<T>(string key)",
        "        where T : IFoo",
        "    {",
        "        return Value.Get<T>(key);",
        "    }",
    ]);
    assert!(output.contains(&expected), "unexpected output:\n{}", output);
}

#[test]
fn test_multiple_constraint_clauses() {
    let output = render_only(
        r#"
        [SerializableInterface]
        interface IFoo
        {
            void Map<TIn, TOut>(TIn input) where TIn : struct where TOut : class, new();
        }
        "#,
    );

    assert!(output.contains(
        "    public void Map<TIn, TOut>(TIn input)\n        where TIn : struct\n        where TOut : class, new()\n    {\n        Value.Map<TIn, TOut>(input);\n    }\n"
    ));
}

#[test]
fn test_generic_interface() {
    let output = render_only(
        r#"
        namespace Data
        {
            [SerializableInterface]
            public interface IRepo<TKey, TValue> where TValue : class
            {
                TValue Find(TKey key);
            }
        }
        "#,
    );

    assert!(output.contains(
        "    public class SIRepo<TKey, TValue> : SerializableInterface<IRepo<TKey, TValue>>\n        where TValue : class\n    {\n"
    ));
    assert!(output.contains("            return Value.Find(key);\n"));
}

#[test]
fn test_parameter_modifiers_and_defaults() {
    let output = render_only(
        r#"
        [SerializableInterface]
        interface IFoo
        {
            bool TryGet(string key, out int value, ref int hits, in Vector3 origin, params object[] args);
            void Log(string message = "none", int level = 0);
        }
        "#,
    );

    assert!(output.contains(
        "public bool TryGet(string key, out int value, ref int hits, in Vector3 origin, params object[] args)\n"
    ));
    assert!(output.contains("return Value.TryGet(key, out value, ref hits, in origin, args);\n"));
    assert!(output.contains("public void Log(string message = \"none\", int level = 0)\n"));
    assert!(output.contains("Value.Log(message, level);\n"));
}

#[test]
fn test_custom_settings() {
    let settings = GeneratorSettings {
        class_prefix: "Serializable".to_string(),
        filename_suffix: ".generated".to_string(),
        base_class: "TNRD.SerializableInterface".to_string(),
    };
    let units = render_source(
        "[SerializableInterface] interface IFoo { }",
        Path::new("Scripts/IFoo.cs"),
        &settings,
    )
    .unwrap();

    assert_eq!(units[0].output_path, Path::new("Scripts/SerializableIFoo.generated.cs"));
    assert!(units[0]
        .text
        .contains("public class SerializableIFoo : TNRD.SerializableInterface<IFoo>\n"));
}

#[test]
fn test_rendering_is_deterministic() {
    let source = r#"
        using System;
        using UnityEngine;
        namespace Game
        {
            [SerializableInterface]
            interface IEnemy
            {
                int Health { get; set; }
                void Attack<T>(T target) where T : Component;
            }
        }
    "#;

    let interfaces = extract(source, Path::new("Enemy.cs")).unwrap();
    let settings = GeneratorSettings::default();

    let first = render(&interfaces[0], &settings);
    let second = render(&interfaces[0], &settings);
    assert_eq!(first, second);
    assert!(first.lines().all(|line| !line.ends_with(' ')));
    assert!(first.ends_with("}\n"));
}

#[test]
fn test_unmarked_interface_renders_nothing() {
    let units = render_source(
        "namespace N { public interface IFoo { void Run(); } }",
        Path::new("IFoo.cs"),
        &GeneratorSettings::default(),
    )
    .unwrap();

    assert!(units.is_empty());
}

#[test]
fn test_marker_with_same_short_name_is_accepted() {
    // Name-only matching: any attribute spelled `SerializableInterface` counts
    let output = render_only(
        r#"
        using Some.Other.Library;
        [SerializableInterface(Mode = 2)]
        interface IFoo { }
        "#,
    );

    assert!(output.contains("using Some.Other.Library;\n\n"));
    assert!(output.contains("public class SIFoo"));
}
