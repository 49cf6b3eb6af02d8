//! The directive vocabulary of a transformation and the matching of applied directives against
//! plugin definitions.

use crate::{
    DirectiveSite, TransformerError,
    schema::{Directive, DirectiveDefinition, Schema},
};

/// Directives that are always valid in an input schema, whether or not a plugin declares them.
pub const BUILTIN_DIRECTIVES: &[&str] = &[
    "subscribe",
    "auth",
    "api_key",
    "iam",
    "oidc",
    "lambda",
    "cognito_user_pools",
    "deprecated",
];

pub(crate) const BUILTIN_DIRECTIVE_DEFINITIONS: &str = r#"
directive @subscribe(mutations: [String]) on FIELD_DEFINITION
directive @auth(cognito_groups: [String]) on FIELD_DEFINITION | OBJECT
directive @api_key on FIELD_DEFINITION | OBJECT
directive @iam on FIELD_DEFINITION | OBJECT
directive @oidc on FIELD_DEFINITION | OBJECT
directive @lambda on FIELD_DEFINITION | OBJECT
directive @cognito_user_pools(cognito_groups: [String]) on FIELD_DEFINITION | OBJECT
directive @deprecated(reason: String = "No longer supported") on FIELD_DEFINITION | ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION | ENUM_VALUE
"#;

pub(crate) const BUILTIN_SCALARS: &[&str] = &[
    "String",
    "Int",
    "Float",
    "Boolean",
    "ID",
    "AWSDate",
    "AWSTime",
    "AWSDateTime",
    "AWSTimestamp",
    "AWSEmail",
    "AWSJSON",
    "AWSURL",
    "AWSPhone",
    "AWSIPAddress",
];

pub(crate) fn is_builtin_directive(name: &str) -> bool {
    BUILTIN_DIRECTIVES.contains(&name)
}

pub(crate) fn builtin_directive_definitions() -> Result<Vec<DirectiveDefinition>, TransformerError> {
    Schema::parse(BUILTIN_DIRECTIVE_DEFINITIONS)
        .map(|schema| schema.directive_definitions)
        .map_err(|err| TransformerError::configuration(format!("built-in directives: {err}")))
}

/// Parse the directive definition a plugin declares. The SDL must contain exactly one directive
/// definition.
pub(crate) fn parse_plugin_directive(plugin: &str, sdl: &str) -> Result<DirectiveDefinition, TransformerError> {
    let schema = Schema::parse(sdl).map_err(|err| {
        TransformerError::configuration(format!(
            "the directive definition of the transformer '{plugin}' could not be parsed: {err}"
        ))
    })?;

    let mut definitions = schema.directive_definitions.into_iter();

    match (definitions.next(), definitions.next()) {
        (Some(definition), None) if schema.definitions.is_empty() => Ok(definition),
        _ => Err(TransformerError::configuration(format!(
            "the transformer '{plugin}' must declare exactly one directive definition"
        ))),
    }
}

/// Parse the supporting type definitions a plugin declares, if any.
pub(crate) fn parse_plugin_type_definitions(plugin: &str, sdl: &str) -> Result<Schema, TransformerError> {
    if sdl.trim().is_empty() {
        return Ok(Schema::default());
    }

    Schema::parse(sdl).map_err(|err| {
        TransformerError::configuration(format!(
            "the type definitions of the transformer '{plugin}' could not be parsed: {err}"
        ))
    })
}

/// Does the applied directive belong to this definition, at this site?
///
/// Directives on object and interface extensions are rejected outright, whatever the declared
/// locations.
pub fn directive_matches(
    definition: &DirectiveDefinition,
    directive: &Directive,
    site: &DirectiveSite<'_>,
) -> Result<bool, TransformerError> {
    if definition.name != directive.name {
        return Ok(false);
    }

    if site.is_object_or_interface_extension() {
        return Err(TransformerError::invalid_directive(format!(
            "Directives are not supported on object or interface extensions. See the '@{}' directive on '{}'",
            directive.name,
            site.type_name()
        )));
    }

    Ok(definition.locations.contains(site.location()))
}
