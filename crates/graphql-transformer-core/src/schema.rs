//! Owned model of a GraphQL type system document.
//!
//! The parser AST borrows from the source text and cannot be mutated, while plugins need to
//! rewrite the schema as the transformation goes. Documents are therefore ingested once into
//! this model, which is then cloned into the evolving output schema.

mod ingest;
mod locations;
mod render;
mod value;

pub use self::{locations::DirectiveLocations, value::Value};

use crate::TransformerError;
use std::fmt;

pub(crate) const DEFAULT_QUERY_TYPE_NAME: &str = "Query";
pub(crate) const DEFAULT_MUTATION_TYPE_NAME: &str = "Mutation";
pub(crate) const DEFAULT_SUBSCRIPTION_TYPE_NAME: &str = "Subscription";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub root_operation_types: RootOperationTypes,
    /// Type definitions and type extensions, in document order.
    pub definitions: Vec<TypeDefinition>,
    pub directive_definitions: Vec<DirectiveDefinition>,
}

/// The `schema { ... }` definition, if the document has one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootOperationTypes {
    pub defined: bool,
    pub query: Option<String>,
    pub mutation: Option<String>,
    pub subscription: Option<String>,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub name: String,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
    pub is_extension: bool,
    pub kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Scalar,
    Object(ObjectType),
    Interface(ObjectType),
    Union(Vec<String>),
    Enum(Vec<EnumValueDefinition>),
    InputObject(Vec<InputValueDefinition>),
}

/// The body shared by object and interface definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectType {
    pub implements: Vec<String>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValueDefinition>,
    pub ty: Type,
    pub directives: Vec<Directive>,
}

/// A field argument, an input object field or a directive argument definition.
#[derive(Debug, Clone, PartialEq)]
pub struct InputValueDefinition {
    pub name: String,
    pub description: Option<String>,
    pub ty: Type,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueDefinition {
    pub name: String,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
}

/// An applied directive.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub name: String,
    /// Arguments in the order they were written.
    pub arguments: Vec<(String, Value)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValueDefinition>,
    pub locations: DirectiveLocations,
    pub repeatable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Named(String),
    List(Box<Type>),
    NonNull(Box<Type>),
}

impl Schema {
    /// Parse and ingest an SDL document.
    pub fn parse(sdl: &str) -> Result<Schema, TransformerError> {
        let document = cynic_parser::parse_type_system_document(sdl).map_err(|err| {
            TransformerError::SchemaValidation(crate::SchemaValidationError::new(vec![format!(
                "Syntax error: {err}"
            )]))
        })?;

        Ok(ingest::ingest_document(&document))
    }

    pub fn query_type_name(&self) -> &str {
        self.root_operation_types
            .query
            .as_deref()
            .unwrap_or(DEFAULT_QUERY_TYPE_NAME)
    }

    pub fn mutation_type_name(&self) -> &str {
        self.root_operation_types
            .mutation
            .as_deref()
            .unwrap_or(DEFAULT_MUTATION_TYPE_NAME)
    }

    pub fn subscription_type_name(&self) -> &str {
        self.root_operation_types
            .subscription
            .as_deref()
            .unwrap_or(DEFAULT_SUBSCRIPTION_TYPE_NAME)
    }

    /// The type definition with that name. Extensions are only returned when the type has no
    /// proper definition in the document.
    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.definitions
            .iter()
            .find(|definition| definition.name == name && !definition.is_extension)
            .or_else(|| self.definitions.iter().find(|definition| definition.name == name))
    }

    pub fn type_definition_mut(&mut self, name: &str) -> Option<&mut TypeDefinition> {
        let idx = self
            .definitions
            .iter()
            .position(|definition| definition.name == name && !definition.is_extension)
            .or_else(|| self.definitions.iter().position(|definition| definition.name == name))?;

        self.definitions.get_mut(idx)
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.definitions.iter().any(|definition| definition.name == name)
    }

    /// Insert a type definition, replacing the existing definition with the same name.
    pub fn put_type(&mut self, definition: TypeDefinition) {
        match self
            .definitions
            .iter_mut()
            .find(|existing| existing.name == definition.name && existing.is_extension == definition.is_extension)
        {
            Some(existing) => *existing = definition,
            None => self.definitions.push(definition),
        }
    }

    /// Remove the type and all its extensions.
    pub fn remove_type(&mut self, name: &str) -> Option<TypeDefinition> {
        let idx = self
            .definitions
            .iter()
            .position(|definition| definition.name == name && !definition.is_extension);
        let removed = idx.map(|idx| self.definitions.remove(idx));
        self.definitions.retain(|definition| definition.name != name);
        removed
    }

    pub fn directive_definition(&self, name: &str) -> Option<&DirectiveDefinition> {
        self.directive_definitions
            .iter()
            .find(|definition| definition.name == name)
    }

    /// Append fields to an object or interface type. Fields with the name of an existing field
    /// replace it.
    pub fn add_fields(
        &mut self,
        type_name: &str,
        fields: impl IntoIterator<Item = FieldDefinition>,
    ) -> Result<(), TransformerError> {
        let Some(definition) = self.type_definition_mut(type_name) else {
            return Err(TransformerError::invalid_directive(format!(
                "Cannot add fields to '{type_name}': the type does not exist."
            )));
        };

        let Some(object) = definition.object_type_mut() else {
            return Err(TransformerError::invalid_directive(format!(
                "Cannot add fields to '{type_name}': it is not an object or interface type."
            )));
        };

        for field in fields {
            match object.fields.iter_mut().find(|existing| existing.name == field.name) {
                Some(existing) => *existing = field,
                None => object.fields.push(field),
            }
        }

        Ok(())
    }

    pub fn add_query_fields(
        &mut self,
        fields: impl IntoIterator<Item = FieldDefinition>,
    ) -> Result<(), TransformerError> {
        let name = self.query_type_name().to_owned();
        self.ensure_root_object(&name);
        self.add_fields(&name, fields)
    }

    pub fn add_mutation_fields(
        &mut self,
        fields: impl IntoIterator<Item = FieldDefinition>,
    ) -> Result<(), TransformerError> {
        let name = self.mutation_type_name().to_owned();
        self.ensure_root_object(&name);
        self.add_fields(&name, fields)
    }

    pub fn add_subscription_fields(
        &mut self,
        fields: impl IntoIterator<Item = FieldDefinition>,
    ) -> Result<(), TransformerError> {
        let name = self.subscription_type_name().to_owned();
        self.ensure_root_object(&name);
        self.add_fields(&name, fields)
    }

    fn ensure_root_object(&mut self, name: &str) {
        if !self.has_type(name) {
            self.definitions.push(TypeDefinition::object(name, Vec::new()));
        }
    }

    /// Remove every applied directive for which `keep` returns false, everywhere in the document.
    pub fn retain_directives(&mut self, keep: impl Fn(&str) -> bool) {
        let retain = |directives: &mut Vec<Directive>| directives.retain(|directive| keep(&directive.name));

        retain(&mut self.root_operation_types.directives);

        for definition in &mut self.definitions {
            retain(&mut definition.directives);

            match &mut definition.kind {
                TypeKind::Object(object) | TypeKind::Interface(object) => {
                    for field in &mut object.fields {
                        retain(&mut field.directives);
                        for argument in &mut field.arguments {
                            retain(&mut argument.directives);
                        }
                    }
                }
                TypeKind::Enum(values) => {
                    for value in values {
                        retain(&mut value.directives);
                    }
                }
                TypeKind::InputObject(fields) => {
                    for field in fields {
                        retain(&mut field.directives);
                    }
                }
                TypeKind::Scalar | TypeKind::Union(_) => (),
            }
        }
    }

    /// Every applied directive in the document, with a human readable location.
    pub(crate) fn iter_directives(&self) -> impl Iterator<Item = (String, &Directive)> + '_ {
        let schema = self
            .root_operation_types
            .directives
            .iter()
            .map(|directive| (String::from("schema"), directive));

        let definitions = self.definitions.iter().flat_map(|definition| {
            let own = definition
                .directives
                .iter()
                .map(move |directive| (definition.name.clone(), directive));

            let nested: Vec<(String, &Directive)> = match &definition.kind {
                TypeKind::Object(object) | TypeKind::Interface(object) => object
                    .fields
                    .iter()
                    .flat_map(|field| {
                        let location = format!("{}.{}", definition.name, field.name);
                        let arguments = field.arguments.iter().flat_map(move |argument| {
                            let location = format!("{}.{}({}:)", definition.name, field.name, argument.name);
                            argument
                                .directives
                                .iter()
                                .map(move |directive| (location.clone(), directive))
                        });

                        field
                            .directives
                            .iter()
                            .map(move |directive| (location.clone(), directive))
                            .chain(arguments)
                    })
                    .collect(),
                TypeKind::Enum(values) => values
                    .iter()
                    .flat_map(|value| {
                        let location = format!("{}.{}", definition.name, value.name);
                        value
                            .directives
                            .iter()
                            .map(move |directive| (location.clone(), directive))
                    })
                    .collect(),
                TypeKind::InputObject(fields) => fields
                    .iter()
                    .flat_map(|field| {
                        let location = format!("{}.{}", definition.name, field.name);
                        field
                            .directives
                            .iter()
                            .map(move |directive| (location.clone(), directive))
                    })
                    .collect(),
                TypeKind::Scalar | TypeKind::Union(_) => Vec::new(),
            };

            own.chain(nested)
        });

        schema.chain(definitions)
    }
}

impl TypeDefinition {
    pub fn object(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        TypeDefinition {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            is_extension: false,
            kind: TypeKind::Object(ObjectType {
                implements: Vec::new(),
                fields,
            }),
        }
    }

    pub fn input_object(name: impl Into<String>, fields: Vec<InputValueDefinition>) -> Self {
        TypeDefinition {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            is_extension: false,
            kind: TypeKind::InputObject(fields),
        }
    }

    pub fn enumeration(name: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        TypeDefinition {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            is_extension: false,
            kind: TypeKind::Enum(
                values
                    .into_iter()
                    .map(|value| EnumValueDefinition {
                        name: value.into(),
                        description: None,
                        directives: Vec::new(),
                    })
                    .collect(),
            ),
        }
    }

    pub fn object_type(&self) -> Option<&ObjectType> {
        match &self.kind {
            TypeKind::Object(object) | TypeKind::Interface(object) => Some(object),
            _ => None,
        }
    }

    pub fn object_type_mut(&mut self) -> Option<&mut ObjectType> {
        match &mut self.kind {
            TypeKind::Object(object) | TypeKind::Interface(object) => Some(object),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.object_type()?.fields.iter().find(|field| field.name == name)
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, TypeKind::Object(_))
    }

    /// The directive location matching this node.
    pub fn location(&self) -> DirectiveLocations {
        match self.kind {
            TypeKind::Scalar => DirectiveLocations::SCALAR,
            TypeKind::Object(_) => DirectiveLocations::OBJECT,
            TypeKind::Interface(_) => DirectiveLocations::INTERFACE,
            TypeKind::Union(_) => DirectiveLocations::UNION,
            TypeKind::Enum(_) => DirectiveLocations::ENUM,
            TypeKind::InputObject(_) => DirectiveLocations::INPUT_OBJECT,
        }
    }

    pub(crate) fn keyword(&self) -> &'static str {
        match self.kind {
            TypeKind::Scalar => "scalar",
            TypeKind::Object(_) => "type",
            TypeKind::Interface(_) => "interface",
            TypeKind::Union(_) => "union",
            TypeKind::Enum(_) => "enum",
            TypeKind::InputObject(_) => "input",
        }
    }
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        FieldDefinition {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
            ty,
            directives: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_argument(mut self, argument: InputValueDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }
}

impl InputValueDefinition {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        InputValueDefinition {
            name: name.into(),
            description: None,
            ty,
            default_value: None,
            directives: Vec::new(),
        }
    }
}

impl Directive {
    pub fn new(name: impl Into<String>) -> Self {
        Directive {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.push((name.into(), value));
        self
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|(argument_name, _)| argument_name == name)
            .map(|(_, value)| value)
    }
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Type::Named(name.into())
    }

    #[must_use]
    pub fn non_null(self) -> Self {
        match self {
            Type::NonNull(_) => self,
            other => Type::NonNull(Box::new(other)),
        }
    }

    #[must_use]
    pub fn list(self) -> Self {
        Type::List(Box::new(self))
    }

    /// The innermost named type.
    pub fn named_type(&self) -> &str {
        match self {
            Type::Named(name) => name,
            Type::List(inner) | Type::NonNull(inner) => inner.named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNull(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Named(name) => f.write_str(name),
            Type::List(inner) => write!(f, "[{inner}]"),
            Type::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_display_and_named_type() {
        let ty = Type::named("Post").non_null().list().non_null();

        assert_eq!(ty.to_string(), "[Post!]!");
        assert_eq!(ty.named_type(), "Post");
        assert!(ty.is_non_null());
    }

    #[test]
    fn add_query_fields_creates_the_root_type() {
        let mut schema = Schema::default();

        schema
            .add_query_fields([FieldDefinition::new("hello", Type::named("String"))])
            .unwrap();

        let query = schema.type_definition("Query").unwrap();
        assert!(query.is_object());
        assert!(query.field("hello").is_some());
    }

    #[test]
    fn put_type_replaces_definitions_with_the_same_name() {
        let mut schema = Schema::default();
        schema.put_type(TypeDefinition::object("Post", Vec::new()));
        schema.put_type(TypeDefinition::object(
            "Post",
            vec![FieldDefinition::new("id", Type::named("ID").non_null())],
        ));

        assert_eq!(schema.definitions.len(), 1);
        assert!(schema.type_definition("Post").unwrap().field("id").is_some());
    }

    #[test]
    fn remove_type_drops_its_extensions() {
        let sdl = "type Post { id: ID! } extend type Post { title: String } type Comment { id: ID! }";
        let mut schema = Schema::parse(sdl).unwrap();
        schema.put_type(TypeDefinition::enumeration("Status", ["DRAFT", "PUBLISHED"]));

        let removed = schema.remove_type("Post").unwrap();
        assert!(!removed.is_extension);
        assert!(removed.field("id").is_some());

        let names = schema
            .definitions
            .iter()
            .map(|definition| definition.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Comment", "Status"]);
        assert!(schema.remove_type("Post").is_none());

        let TypeKind::Enum(values) = &schema.type_definition("Status").unwrap().kind else {
            unreachable!("Status is an enum");
        };
        assert_eq!(values.len(), 2);
        assert_eq!(values[1].name, "PUBLISHED");
    }
}
