use super::*;
use cynic_parser::{ConstValue, common::WrappingType, type_system as ast};

pub(super) fn ingest_document(document: &ast::TypeSystemDocument) -> Schema {
    let mut schema = Schema::default();

    for definition in document.definitions() {
        match definition {
            ast::Definition::Schema(schema_definition) | ast::Definition::SchemaExtension(schema_definition) => {
                ingest_schema_definition(schema_definition, &mut schema.root_operation_types);
            }
            ast::Definition::Type(type_definition) => {
                schema.definitions.push(ingest_type_definition(type_definition, false));
            }
            ast::Definition::TypeExtension(type_definition) => {
                schema.definitions.push(ingest_type_definition(type_definition, true));
            }
            ast::Definition::Directive(directive_definition) => {
                schema
                    .directive_definitions
                    .push(ingest_directive_definition(directive_definition));
            }
        }
    }

    schema
}

fn ingest_schema_definition(definition: ast::SchemaDefinition<'_>, roots: &mut RootOperationTypes) {
    roots.defined = true;

    if let Some(query) = definition.query_type() {
        roots.query = Some(query.named_type().to_owned());
    }

    if let Some(mutation) = definition.mutation_type() {
        roots.mutation = Some(mutation.named_type().to_owned());
    }

    if let Some(subscription) = definition.subscription_type() {
        roots.subscription = Some(subscription.named_type().to_owned());
    }

    roots.directives.extend(definition.directives().map(ingest_directive));
}

fn ingest_type_definition(definition: ast::TypeDefinition<'_>, is_extension: bool) -> TypeDefinition {
    let kind = match definition {
        ast::TypeDefinition::Scalar(_) => TypeKind::Scalar,
        ast::TypeDefinition::Object(object) => TypeKind::Object(ObjectType {
            implements: object.implements_interfaces().map(str::to_owned).collect(),
            fields: object.fields().map(ingest_field).collect(),
        }),
        ast::TypeDefinition::Interface(interface) => TypeKind::Interface(ObjectType {
            implements: interface.implements_interfaces().map(str::to_owned).collect(),
            fields: interface.fields().map(ingest_field).collect(),
        }),
        ast::TypeDefinition::Union(union) => {
            TypeKind::Union(union.members().map(|member| member.name().to_owned()).collect())
        }
        ast::TypeDefinition::Enum(enum_definition) => TypeKind::Enum(
            enum_definition
                .values()
                .map(|value| EnumValueDefinition {
                    name: value.value().to_owned(),
                    description: value.description().map(|description| description.to_cow().into_owned()),
                    directives: value.directives().map(ingest_directive).collect(),
                })
                .collect(),
        ),
        ast::TypeDefinition::InputObject(input_object) => {
            TypeKind::InputObject(input_object.fields().map(ingest_input_value).collect())
        }
    };

    TypeDefinition {
        name: definition.name().to_owned(),
        description: definition
            .description()
            .map(|description| description.to_cow().into_owned()),
        directives: definition.directives().map(ingest_directive).collect(),
        is_extension,
        kind,
    }
}

fn ingest_field(field: ast::FieldDefinition<'_>) -> FieldDefinition {
    FieldDefinition {
        name: field.name().to_owned(),
        description: field.description().map(|description| description.to_cow().into_owned()),
        arguments: field.arguments().map(ingest_input_value).collect(),
        ty: ingest_type(field.ty()),
        directives: field.directives().map(ingest_directive).collect(),
    }
}

fn ingest_input_value(input_value: ast::InputValueDefinition<'_>) -> InputValueDefinition {
    InputValueDefinition {
        name: input_value.name().to_owned(),
        description: input_value
            .description()
            .map(|description| description.to_cow().into_owned()),
        ty: ingest_type(input_value.ty()),
        default_value: input_value.default_value().map(ingest_value),
        directives: input_value.directives().map(ingest_directive).collect(),
    }
}

fn ingest_directive(directive: ast::Directive<'_>) -> Directive {
    Directive {
        name: directive.name().to_owned(),
        arguments: directive
            .arguments()
            .map(|argument| (argument.name().to_owned(), ingest_value(argument.value())))
            .collect(),
    }
}

pub(crate) fn ingest_directive_definition(definition: ast::DirectiveDefinition<'_>) -> DirectiveDefinition {
    let mut locations = DirectiveLocations::default();

    for location in definition.locations() {
        locations |= match location {
            ast::DirectiveLocation::Query => DirectiveLocations::QUERY,
            ast::DirectiveLocation::Mutation => DirectiveLocations::MUTATION,
            ast::DirectiveLocation::Subscription => DirectiveLocations::SUBSCRIPTION,
            ast::DirectiveLocation::Field => DirectiveLocations::FIELD,
            ast::DirectiveLocation::FragmentDefinition => DirectiveLocations::FRAGMENT_DEFINITION,
            ast::DirectiveLocation::FragmentSpread => DirectiveLocations::FRAGMENT_SPREAD,
            ast::DirectiveLocation::InlineFragment => DirectiveLocations::INLINE_FRAGMENT,
            ast::DirectiveLocation::VariableDefinition => DirectiveLocations::VARIABLE_DEFINITION,
            ast::DirectiveLocation::Schema => DirectiveLocations::SCHEMA,
            ast::DirectiveLocation::Scalar => DirectiveLocations::SCALAR,
            ast::DirectiveLocation::Object => DirectiveLocations::OBJECT,
            ast::DirectiveLocation::FieldDefinition => DirectiveLocations::FIELD_DEFINITION,
            ast::DirectiveLocation::ArgumentDefinition => DirectiveLocations::ARGUMENT_DEFINITION,
            ast::DirectiveLocation::Interface => DirectiveLocations::INTERFACE,
            ast::DirectiveLocation::Union => DirectiveLocations::UNION,
            ast::DirectiveLocation::Enum => DirectiveLocations::ENUM,
            ast::DirectiveLocation::EnumValue => DirectiveLocations::ENUM_VALUE,
            ast::DirectiveLocation::InputObject => DirectiveLocations::INPUT_OBJECT,
            ast::DirectiveLocation::InputFieldDefinition => DirectiveLocations::INPUT_FIELD_DEFINITION,
        };
    }

    DirectiveDefinition {
        name: definition.name().to_owned(),
        description: definition
            .description()
            .map(|description| description.to_cow().into_owned()),
        arguments: definition.arguments().map(ingest_input_value).collect(),
        locations,
        repeatable: definition.is_repeatable(),
    }
}

fn ingest_type(ty: ast::Type<'_>) -> Type {
    // Wrappers are listed from the outermost in, so build the type from the innermost out.
    let wrappers = ty.wrappers().collect::<Vec<_>>();

    wrappers
        .into_iter()
        .rev()
        .fold(Type::named(ty.name()), |inner, wrapper| match wrapper {
            WrappingType::NonNull => Type::NonNull(Box::new(inner)),
            WrappingType::List => Type::List(Box::new(inner)),
        })
}

fn ingest_value(value: ConstValue<'_>) -> Value {
    match value {
        ConstValue::Null(_) => Value::Null,
        ConstValue::Int(n) => Value::Int(n.as_i64()),
        ConstValue::Float(n) => Value::Float(n.as_f64()),
        ConstValue::String(s) => Value::String(s.as_str().to_owned()),
        ConstValue::Boolean(b) => Value::Boolean(b.value()),
        ConstValue::Enum(e) => Value::Enum(e.name().to_owned()),
        ConstValue::List(list) => Value::List(list.items().map(ingest_value).collect()),
        ConstValue::Object(object) => Value::Object(
            object
                .fields()
                .map(|field| (field.name().to_owned(), ingest_value(field.value())))
                .collect(),
        ),
    }
}
