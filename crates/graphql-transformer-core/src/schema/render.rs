use super::*;
use itertools::Itertools as _;
use std::fmt::{self, Write as _};

const INDENT: &str = "  ";

/// Renders the schema as SDL.
impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut blocks: Vec<String> = Vec::new();

        if self.root_operation_types.defined {
            blocks.push(render_schema_definition(&self.root_operation_types)?);
        }

        for definition in &self.directive_definitions {
            blocks.push(render_directive_definition(definition)?);
        }

        for definition in &self.definitions {
            blocks.push(render_type_definition(definition)?);
        }

        for (idx, block) in blocks.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            f.write_str(block)?;
        }

        Ok(())
    }
}

fn render_schema_definition(roots: &RootOperationTypes) -> Result<String, fmt::Error> {
    let mut out = String::from("schema");
    render_directives(&roots.directives, &mut out)?;
    out.push_str(" {\n");

    for (operation, name) in [
        ("query", &roots.query),
        ("mutation", &roots.mutation),
        ("subscription", &roots.subscription),
    ] {
        if let Some(name) = name {
            writeln!(out, "{INDENT}{operation}: {name}")?;
        }
    }

    out.push_str("}\n");
    Ok(out)
}

fn render_directive_definition(definition: &DirectiveDefinition) -> Result<String, fmt::Error> {
    let mut out = String::new();
    render_description(definition.description.as_deref(), "", &mut out)?;
    write!(out, "directive @{}", definition.name)?;
    render_arguments(&definition.arguments, &mut out)?;

    if definition.repeatable {
        out.push_str(" repeatable");
    }

    writeln!(out, " on {}", definition.locations)?;
    Ok(out)
}

fn render_type_definition(definition: &TypeDefinition) -> Result<String, fmt::Error> {
    let mut out = String::new();
    render_description(definition.description.as_deref(), "", &mut out)?;

    if definition.is_extension {
        out.push_str("extend ");
    }

    write!(out, "{} {}", definition.keyword(), definition.name)?;

    match &definition.kind {
        TypeKind::Object(object) | TypeKind::Interface(object) => {
            if !object.implements.is_empty() {
                write!(out, " implements {}", object.implements.join(" & "))?;
            }
            render_directives(&definition.directives, &mut out)?;

            if !object.fields.is_empty() {
                out.push_str(" {\n");
                for field in &object.fields {
                    render_description(field.description.as_deref(), INDENT, &mut out)?;
                    write!(out, "{INDENT}{}", field.name)?;
                    render_arguments(&field.arguments, &mut out)?;
                    write!(out, ": {}", field.ty)?;
                    render_directives(&field.directives, &mut out)?;
                    out.push('\n');
                }
                out.push('}');
            }
        }
        TypeKind::Union(members) => {
            render_directives(&definition.directives, &mut out)?;
            if !members.is_empty() {
                write!(out, " = {}", members.join(" | "))?;
            }
        }
        TypeKind::Enum(values) => {
            render_directives(&definition.directives, &mut out)?;

            if !values.is_empty() {
                out.push_str(" {\n");
                for value in values {
                    render_description(value.description.as_deref(), INDENT, &mut out)?;
                    write!(out, "{INDENT}{}", value.name)?;
                    render_directives(&value.directives, &mut out)?;
                    out.push('\n');
                }
                out.push('}');
            }
        }
        TypeKind::InputObject(fields) => {
            render_directives(&definition.directives, &mut out)?;

            if !fields.is_empty() {
                out.push_str(" {\n");
                for field in fields {
                    render_description(field.description.as_deref(), INDENT, &mut out)?;
                    out.push_str(INDENT);
                    render_input_value(field, &mut out)?;
                    out.push('\n');
                }
                out.push('}');
            }
        }
        TypeKind::Scalar => render_directives(&definition.directives, &mut out)?,
    }

    out.push('\n');
    Ok(out)
}

fn render_arguments(arguments: &[InputValueDefinition], out: &mut String) -> fmt::Result {
    if arguments.is_empty() {
        return Ok(());
    }

    out.push('(');
    for (idx, argument) in arguments.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        render_input_value(argument, out)?;
    }
    out.push(')');

    Ok(())
}

fn render_input_value(input_value: &InputValueDefinition, out: &mut String) -> fmt::Result {
    write!(out, "{}: {}", input_value.name, input_value.ty)?;

    if let Some(default_value) = &input_value.default_value {
        write!(out, " = {default_value}")?;
    }

    render_directives(&input_value.directives, out)
}

fn render_directives(directives: &[Directive], out: &mut String) -> fmt::Result {
    for directive in directives {
        write!(out, " @{}", directive.name)?;

        if directive.arguments.is_empty() {
            continue;
        }

        let arguments = directive
            .arguments
            .iter()
            .format_with(", ", |(name, value), f| f(&format_args!("{name}: {value}")));
        write!(out, "({arguments})")?;
    }

    Ok(())
}

fn render_description(description: Option<&str>, indent: &str, out: &mut String) -> fmt::Result {
    let Some(description) = description else {
        return Ok(());
    };

    writeln!(out, "{indent}\"\"\"")?;
    for line in description.lines() {
        writeln!(out, "{indent}{}", line.replace("\"\"\"", "\\\"\"\""))?;
    }
    writeln!(out, "{indent}\"\"\"")
}

#[cfg(test)]
mod tests {
    use crate::Schema;

    #[test]
    fn renders_what_it_parses() {
        let sdl = indoc::indoc! {r#"
            schema {
              query: Root
            }

            directive @model(name: String = "x") on OBJECT | FIELD_DEFINITION

            type Root {
              posts(first: Int = 10, after: String): [Post!]! @aws_api_key
            }

            """
            A post.
            """
            type Post implements Node @model {
              id: ID!
            }

            extend type Post {
              title: String @deprecated(reason: "use name")
            }

            interface Node {
              id: ID!
            }

            union SearchResult = Post

            enum Status {
              DRAFT
              PUBLISHED
            }

            input PostInput {
              title: String!
              tags: [String] = ["a", "b"]
            }

            scalar AWSJSON
        "#};

        let schema = Schema::parse(sdl).unwrap();
        assert_eq!(schema.to_string(), sdl);
    }
}
