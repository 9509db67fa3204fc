use crate::context::EmitContext;
use crate::model::{ConstraintClause, InterfaceDeclaration, MethodMember, Parameter, PropertyMember};
use crate::settings::GeneratorSettings;

const INHERITDOC: &str = "/// <inheritdoc />";

/// First line of every generated unit
pub const AUTO_GENERATED_HEADER: &str = "// <auto-generated />";

/// Render the forwarding class for one interface as a complete source unit
pub fn render(interface: &InterfaceDeclaration, settings: &GeneratorSettings) -> String {
    let ctx = EmitContext::new();

    ctx.add_line(AUTO_GENERATED_HEADER);
    emit_imports(interface, &ctx);

    if interface.namespace.is_empty() {
        emit_class(interface, settings, &ctx);
    } else {
        ctx.add_line(&format!("namespace {}", interface.namespace));
        ctx.add_line("{");
        {
            let _indent = ctx.indent();
            emit_class(interface, settings, &ctx);
        }
        ctx.add_line("}");
    }

    ctx.get_output()
}

fn emit_imports(interface: &InterfaceDeclaration, ctx: &EmitContext) {
    for import in &interface.imports {
        ctx.add_line(&format!("using {};", import));
    }
    ctx.end_line();
}

fn emit_class(interface: &InterfaceDeclaration, settings: &GeneratorSettings, ctx: &EmitContext) {
    let class_name = settings.class_name(&interface.name);
    let class_type = if interface.is_generic() {
        format!("{}<{}>", class_name, interface.type_parameters.join(", "))
    } else {
        class_name
    };

    ctx.add_line("[System.Serializable]");
    ctx.add_line(INHERITDOC);
    ctx.add_line(&format!(
        "public class {} : {}<{}>",
        class_type,
        settings.base_class,
        interface.type_name()
    ));
    emit_constraint_clauses(&interface.constraint_clauses, ctx);
    ctx.add_line("{");
    {
        let _indent = ctx.indent();
        for property in &interface.properties {
            emit_property(property, ctx);
        }
        for method in &interface.methods {
            emit_method(method, ctx);
        }
    }
    ctx.add_line("}");
}

fn emit_property(property: &PropertyMember, ctx: &EmitContext) {
    ctx.add_line(INHERITDOC);
    ctx.add_line(&format!("public {} {}", property.ty, property.name));
    ctx.add_line("{");
    {
        let _indent = ctx.indent();
        if property.has_getter {
            ctx.add_line(&format!("get {{ return Value.{}; }}", property.name));
        }
        if property.has_setter {
            ctx.add_line(&format!("set {{ Value.{} = value; }}", property.name));
        }
    }
    ctx.add_line("}");
}

fn emit_method(method: &MethodMember, ctx: &EmitContext) {
    let generic_args = type_argument_list(&method.type_parameters);
    let parameters: Vec<_> = method.parameters.iter().map(render_parameter).collect();

    ctx.add_line(INHERITDOC);
    ctx.add_line(&format!(
        "{} {} {}{}({})",
        method.modifiers.join(" "),
        method.return_type,
        method.name,
        generic_args,
        parameters.join(", ")
    ));
    emit_constraint_clauses(&method.constraint_clauses, ctx);
    ctx.add_line("{");
    {
        let _indent = ctx.indent();
        let arguments: Vec<_> = method.parameters.iter().map(render_argument).collect();
        let call = format!(
            "Value.{}{}({});",
            method.name,
            generic_args,
            arguments.join(", ")
        );

        if method.returns_value() {
            ctx.add_line(&format!("return {}", call));
        } else {
            ctx.add_line(&call);
        }
    }
    ctx.add_line("}");
}

/// One `where` line per clause, one level deeper than the declaration it follows
fn emit_constraint_clauses(clauses: &[ConstraintClause], ctx: &EmitContext) {
    if clauses.is_empty() {
        return;
    }

    let _indent = ctx.indent();
    for clause in clauses {
        ctx.add_line(&format!(
            "where {} : {}",
            clause.type_parameter,
            clause.constraints.join(", ")
        ));
    }
}

fn type_argument_list(type_parameters: &[String]) -> String {
    if type_parameters.is_empty() {
        String::new()
    } else {
        format!("<{}>", type_parameters.join(", "))
    }
}

fn render_parameter(parameter: &Parameter) -> String {
    let mut out = String::new();
    for modifier in &parameter.modifiers {
        out.push_str(modifier);
        out.push(' ');
    }
    out.push_str(&parameter.ty);
    out.push(' ');
    out.push_str(&parameter.name);
    if let Some(default) = &parameter.default_value {
        out.push_str(" = ");
        out.push_str(default);
    }
    out
}

fn render_argument(parameter: &Parameter) -> String {
    match parameter.argument_modifier() {
        Some(modifier) => format!("{} {}", modifier, parameter.name),
        None => parameter.name.clone(),
    }
}
