//! Structural validation of the input schema against the combined vocabulary of the plugins.
//!
//! Every violation is collected. The transformation fails with all of them at once.

use std::collections::{HashMap, HashSet};

use crate::{
    SchemaValidationError,
    directives::BUILTIN_SCALARS,
    schema::{
        Directive, DirectiveDefinition, DirectiveLocations, FieldDefinition, InputValueDefinition, Schema, Type,
        TypeDefinition, TypeKind,
    },
};

struct Context<'a> {
    definition_names: HashMap<&'a str, &'a TypeDefinition>,
    directive_names: HashMap<&'a str, &'a DirectiveDefinition>,
    errors: Vec<String>,
}

impl Context<'_> {
    fn push_error(&mut self, message: String) {
        self.errors.push(message);
    }
}

#[must_use]
enum TypeCheck {
    Ok,
    UnknownType,
    WrongKind,
}

/// Validate `schema` together with the directive and type definitions contributed by the plugins
/// and the built-ins.
pub(crate) fn validate(
    schema: &Schema,
    directive_definitions: &[DirectiveDefinition],
    type_definitions: &[TypeDefinition],
) -> Result<(), SchemaValidationError> {
    let definitions = schema.definitions.iter().chain(type_definitions).collect::<Vec<_>>();
    let all_directive_definitions = directive_definitions
        .iter()
        .chain(&schema.directive_definitions)
        .collect::<Vec<_>>();

    let mut ctx = Context {
        definition_names: HashMap::new(),
        directive_names: HashMap::new(),
        errors: Vec::new(),
    };

    validate_definition_names(&definitions, &mut ctx);
    validate_directive_definitions(&all_directive_definitions, &mut ctx);
    validate_extensions(&definitions, &mut ctx);
    validate_members(&definitions, &mut ctx);

    for definition in &definitions {
        validate_type_references(definition, &mut ctx);
    }

    validate_root_operation_types(schema, &mut ctx);

    if !schema.root_operation_types.directives.is_empty() {
        validate_directives(&schema.root_operation_types.directives, DirectiveLocations::SCHEMA, "schema", &mut ctx);
    }

    for definition in &definitions {
        validate_directive_usages(definition, &mut ctx);
    }

    if ctx.errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaValidationError::new(ctx.errors))
    }
}

fn validate_definition_names<'a>(definitions: &[&'a TypeDefinition], ctx: &mut Context<'a>) {
    for &definition in definitions.iter().filter(|definition| !definition.is_extension) {
        if ctx.definition_names.contains_key(definition.name.as_str()) {
            ctx.push_error(format!("There can be only one type named \"{}\".", definition.name));
        } else {
            ctx.definition_names.insert(&definition.name, definition);
        }
    }
}

fn validate_directive_definitions<'a>(definitions: &[&'a DirectiveDefinition], ctx: &mut Context<'a>) {
    for &definition in definitions {
        if ctx.directive_names.insert(&definition.name, definition).is_some() {
            ctx.push_error(format!(
                "There can be only one directive named \"@{}\".",
                definition.name
            ));
        }

        let path = format!("@{}", definition.name);
        validate_arguments(&path, &definition.arguments, ctx);
    }
}

fn validate_extensions(definitions: &[&TypeDefinition], ctx: &mut Context<'_>) {
    for extension in definitions.iter().filter(|definition| definition.is_extension) {
        match ctx.definition_names.get(extension.name.as_str()).copied() {
            None if BUILTIN_SCALARS.contains(&extension.name.as_str()) => (),
            None => ctx.push_error(format!(
                "Cannot extend type \"{}\" because it is not defined.",
                extension.name
            )),
            Some(definition) if std::mem::discriminant(&definition.kind) != std::mem::discriminant(&extension.kind) => {
                let message = format!(
                    "Cannot extend the {} \"{}\" with an {} extension.",
                    definition.keyword(),
                    extension.name,
                    extension.keyword()
                );
                ctx.push_error(message);
            }
            Some(_) => (),
        }
    }
}

/// Fields, enum values and input fields must be unique within a type and its extensions.
fn validate_members(definitions: &[&TypeDefinition], ctx: &mut Context<'_>) {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();

    for definition in definitions {
        let (noun, names): (&str, Vec<&str>) = match &definition.kind {
            TypeKind::Object(object) | TypeKind::Interface(object) => {
                ("Field", object.fields.iter().map(|field| field.name.as_str()).collect())
            }
            TypeKind::Enum(values) => ("Enum value", values.iter().map(|value| value.name.as_str()).collect()),
            TypeKind::InputObject(fields) => ("Field", fields.iter().map(|field| field.name.as_str()).collect()),
            TypeKind::Scalar | TypeKind::Union(_) => continue,
        };

        for name in names {
            if !seen.insert((definition.name.as_str(), name)) {
                ctx.push_error(format!(
                    "{noun} \"{}.{name}\" can only be defined once.",
                    definition.name
                ));
            }
        }
    }
}

fn validate_type_references(definition: &TypeDefinition, ctx: &mut Context<'_>) {
    match &definition.kind {
        TypeKind::Object(object) | TypeKind::Interface(object) => {
            for interface in &object.implements {
                match ctx.definition_names.get(interface.as_str()).copied().map(|definition| &definition.kind) {
                    Some(TypeKind::Interface(_)) => (),
                    Some(_) => ctx.push_error(format!(
                        "Type \"{}\" implements \"{interface}\", which is not an interface.",
                        definition.name
                    )),
                    None => ctx.push_error(format!(
                        "Unknown type \"{interface}\" implemented by \"{}\".",
                        definition.name
                    )),
                }
            }

            for field in &object.fields {
                validate_field(&definition.name, field, ctx);
            }
        }
        TypeKind::Union(members) => {
            for member in members {
                match ctx.definition_names.get(member.as_str()).copied().map(|definition| &definition.kind) {
                    Some(TypeKind::Object(_)) => (),
                    Some(_) => ctx.push_error(format!(
                        "Union \"{}\" can only include object types, but \"{member}\" is not one.",
                        definition.name
                    )),
                    None => ctx.push_error(format!(
                        "Unknown type \"{member}\" in the union \"{}\".",
                        definition.name
                    )),
                }
            }
        }
        TypeKind::InputObject(fields) => {
            for field in fields {
                let path = format!("{}.{}", definition.name, field.name);
                validate_input_value_type(&path, &field.ty, ctx);
            }
        }
        TypeKind::Scalar | TypeKind::Enum(_) => (),
    }
}

fn validate_field(type_name: &str, field: &FieldDefinition, ctx: &mut Context<'_>) {
    let path = format!("{type_name}.{}", field.name);

    match check_output_type(field.ty.named_type(), ctx) {
        TypeCheck::Ok => (),
        TypeCheck::UnknownType => ctx.push_error(format!(
            "Unknown type \"{}\" referenced by \"{path}\".",
            field.ty.named_type()
        )),
        TypeCheck::WrongKind => ctx.push_error(format!(
            "The type of \"{path}\" must be an output type, but \"{}\" is not.",
            field.ty.named_type()
        )),
    }

    validate_arguments(&path, &field.arguments, ctx);
}

fn validate_arguments(path: &str, arguments: &[InputValueDefinition], ctx: &mut Context<'_>) {
    let mut seen = HashSet::new();

    for argument in arguments {
        let argument_path = format!("{path}({}:)", argument.name);

        if !seen.insert(argument.name.as_str()) {
            ctx.push_error(format!("Argument \"{argument_path}\" can only be defined once."));
        }

        validate_input_value_type(&argument_path, &argument.ty, ctx);
    }
}

fn validate_input_value_type(path: &str, ty: &Type, ctx: &mut Context<'_>) {
    match check_input_type(ty.named_type(), ctx) {
        TypeCheck::Ok => (),
        TypeCheck::UnknownType => ctx.push_error(format!(
            "Unknown type \"{}\" referenced by \"{path}\".",
            ty.named_type()
        )),
        TypeCheck::WrongKind => ctx.push_error(format!(
            "The type of \"{path}\" must be an input type, but \"{}\" is not.",
            ty.named_type()
        )),
    }
}

fn check_input_type(type_name: &str, ctx: &Context<'_>) -> TypeCheck {
    if BUILTIN_SCALARS.contains(&type_name) {
        return TypeCheck::Ok;
    }

    match ctx.definition_names.get(type_name).copied().map(|definition| &definition.kind) {
        None => TypeCheck::UnknownType,
        Some(TypeKind::Scalar | TypeKind::Enum(_) | TypeKind::InputObject(_)) => TypeCheck::Ok,
        Some(TypeKind::Object(_) | TypeKind::Interface(_) | TypeKind::Union(_)) => TypeCheck::WrongKind,
    }
}

fn check_output_type(type_name: &str, ctx: &Context<'_>) -> TypeCheck {
    if BUILTIN_SCALARS.contains(&type_name) {
        return TypeCheck::Ok;
    }

    match ctx.definition_names.get(type_name).copied().map(|definition| &definition.kind) {
        None => TypeCheck::UnknownType,
        Some(TypeKind::InputObject(_)) => TypeCheck::WrongKind,
        Some(_) => TypeCheck::Ok,
    }
}

fn validate_root_operation_types(schema: &Schema, ctx: &mut Context<'_>) {
    let roots = &schema.root_operation_types;

    for (operation, name) in [
        ("query", &roots.query),
        ("mutation", &roots.mutation),
        ("subscription", &roots.subscription),
    ] {
        let Some(name) = name else { continue };

        match ctx.definition_names.get(name.as_str()).copied().map(|definition| &definition.kind) {
            Some(TypeKind::Object(_)) => (),
            Some(_) => ctx.push_error(format!("The {operation} root type \"{name}\" must be an object type.")),
            None => ctx.push_error(format!("Unknown type \"{name}\" used as the {operation} root type.")),
        }
    }
}

fn validate_directive_usages(definition: &TypeDefinition, ctx: &mut Context<'_>) {
    validate_directives(&definition.directives, definition.location(), &definition.name, ctx);

    match &definition.kind {
        TypeKind::Object(object) | TypeKind::Interface(object) => {
            for field in &object.fields {
                let path = format!("{}.{}", definition.name, field.name);
                validate_directives(&field.directives, DirectiveLocations::FIELD_DEFINITION, &path, ctx);

                for argument in &field.arguments {
                    let path = format!("{path}({}:)", argument.name);
                    validate_directives(&argument.directives, DirectiveLocations::ARGUMENT_DEFINITION, &path, ctx);
                }
            }
        }
        TypeKind::Enum(values) => {
            for value in values {
                let path = format!("{}.{}", definition.name, value.name);
                validate_directives(&value.directives, DirectiveLocations::ENUM_VALUE, &path, ctx);
            }
        }
        TypeKind::InputObject(fields) => {
            for field in fields {
                let path = format!("{}.{}", definition.name, field.name);
                validate_directives(&field.directives, DirectiveLocations::INPUT_FIELD_DEFINITION, &path, ctx);
            }
        }
        TypeKind::Scalar | TypeKind::Union(_) => (),
    }
}

fn validate_directives(directives: &[Directive], location: DirectiveLocations, path: &str, ctx: &mut Context<'_>) {
    let mut seen = HashSet::new();

    for directive in directives {
        let Some(definition) = ctx.directive_names.get(directive.name.as_str()).copied() else {
            ctx.push_error(format!("Unknown directive \"@{}\" (\"{path}\").", directive.name));
            continue;
        };

        if !definition.locations.contains(location) {
            ctx.push_error(format!(
                "Directive \"@{}\" may not be used on {location} (\"{path}\").",
                directive.name
            ));
        }

        if !seen.insert(directive.name.as_str()) && !definition.repeatable {
            ctx.push_error(format!(
                "The directive \"@{}\" can only be used once at \"{path}\".",
                directive.name
            ));
        }

        for (name, _) in &directive.arguments {
            if !definition.arguments.iter().any(|argument| &argument.name == name) {
                ctx.push_error(format!(
                    "Unknown argument \"{name}\" on directive \"@{}\" (\"{path}\").",
                    directive.name
                ));
            }
        }

        let missing = definition.arguments.iter().filter(|argument| {
            argument.ty.is_non_null()
                && argument.default_value.is_none()
                && directive.argument(&argument.name).is_none()
        });

        for argument in missing {
            ctx.push_error(format!(
                "Directive \"@{}\" argument \"{}\" of type \"{}\" is required, but it was not provided (\"{path}\").",
                directive.name, argument.name, argument.ty
            ));
        }
    }
}
