use crate::{
    TransformerContext, TransformerError,
    schema::{
        Directive, DirectiveLocations, EnumValueDefinition, FieldDefinition, InputValueDefinition, Schema,
        TypeDefinition,
    },
};

/// Plugins run in bands: every data source provider runs before every data source enhancer, and
/// so on. Order is preserved inside a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PluginBand {
    /// Establishes the data source of the fields it touches (e.g. model generation).
    DataSourceProvider,
    /// Layers on top of an existing data source (e.g. indexes, relations).
    DataSourceEnhancer,
    #[default]
    Generic,
    /// Authorization runs last so it sees every resolver the other plugins generated.
    Auth,
}

/// A schema node carrying a directive that matched a plugin's definition.
///
/// Every plugin handles the full set of sites in [`TransformerPlugin::visit`]. Sites a plugin
/// does not support should be answered with [`DirectiveSite::unsupported`].
#[derive(Debug, Clone, Copy)]
pub enum DirectiveSite<'a> {
    Object(&'a TypeDefinition),
    Interface(&'a TypeDefinition),
    Scalar(&'a TypeDefinition),
    Union(&'a TypeDefinition),
    Enum(&'a TypeDefinition),
    InputObject(&'a TypeDefinition),
    Field {
        parent: &'a TypeDefinition,
        field: &'a FieldDefinition,
    },
    Argument {
        parent: &'a TypeDefinition,
        field: &'a FieldDefinition,
        argument: &'a InputValueDefinition,
    },
    EnumValue {
        parent: &'a TypeDefinition,
        value: &'a EnumValueDefinition,
    },
    InputField {
        parent: &'a TypeDefinition,
        field: &'a InputValueDefinition,
    },
}

impl<'a> DirectiveSite<'a> {
    /// The enclosing type definition.
    pub fn parent(&self) -> &'a TypeDefinition {
        match *self {
            DirectiveSite::Object(definition)
            | DirectiveSite::Interface(definition)
            | DirectiveSite::Scalar(definition)
            | DirectiveSite::Union(definition)
            | DirectiveSite::Enum(definition)
            | DirectiveSite::InputObject(definition) => definition,
            DirectiveSite::Field { parent, .. }
            | DirectiveSite::Argument { parent, .. }
            | DirectiveSite::EnumValue { parent, .. }
            | DirectiveSite::InputField { parent, .. } => parent,
        }
    }

    pub fn type_name(&self) -> &'a str {
        &self.parent().name
    }

    /// The name of the field, enum value or input field the directive sits on, if any.
    pub fn field_name(&self) -> Option<&'a str> {
        match *self {
            DirectiveSite::Field { field, .. } | DirectiveSite::Argument { field, .. } => Some(&field.name),
            DirectiveSite::EnumValue { value, .. } => Some(&value.name),
            DirectiveSite::InputField { field, .. } => Some(&field.name),
            _ => None,
        }
    }

    pub fn argument_name(&self) -> Option<&'a str> {
        match *self {
            DirectiveSite::Argument { argument, .. } => Some(&argument.name),
            _ => None,
        }
    }

    /// The directives applied on the node itself.
    pub fn directives(&self) -> &'a [Directive] {
        match *self {
            DirectiveSite::Field { field, .. } => &field.directives,
            DirectiveSite::Argument { argument, .. } => &argument.directives,
            DirectiveSite::EnumValue { value, .. } => &value.directives,
            DirectiveSite::InputField { field, .. } => &field.directives,
            _ => &self.parent().directives,
        }
    }

    pub fn location(&self) -> DirectiveLocations {
        match self {
            DirectiveSite::Object(_) => DirectiveLocations::OBJECT,
            DirectiveSite::Interface(_) => DirectiveLocations::INTERFACE,
            DirectiveSite::Scalar(_) => DirectiveLocations::SCALAR,
            DirectiveSite::Union(_) => DirectiveLocations::UNION,
            DirectiveSite::Enum(_) => DirectiveLocations::ENUM,
            DirectiveSite::InputObject(_) => DirectiveLocations::INPUT_OBJECT,
            DirectiveSite::Field { .. } => DirectiveLocations::FIELD_DEFINITION,
            DirectiveSite::Argument { .. } => DirectiveLocations::ARGUMENT_DEFINITION,
            DirectiveSite::EnumValue { .. } => DirectiveLocations::ENUM_VALUE,
            DirectiveSite::InputField { .. } => DirectiveLocations::INPUT_FIELD_DEFINITION,
        }
    }

    /// The name of the plugin hook this site corresponds to.
    pub fn hook_name(&self) -> &'static str {
        match self {
            DirectiveSite::Object(_) => "object",
            DirectiveSite::Interface(_) => "interface",
            DirectiveSite::Scalar(_) => "scalar",
            DirectiveSite::Union(_) => "union",
            DirectiveSite::Enum(_) => "enum",
            DirectiveSite::InputObject(_) => "input",
            DirectiveSite::Field { .. } => "field",
            DirectiveSite::Argument { .. } => "argument",
            DirectiveSite::EnumValue { .. } => "enumValue",
            DirectiveSite::InputField { .. } => "inputValue",
        }
    }

    pub(crate) fn is_object_or_interface_extension(&self) -> bool {
        match self {
            DirectiveSite::Object(definition) | DirectiveSite::Interface(definition) => definition.is_extension,
            _ => false,
        }
    }

    /// The error a plugin returns for a site it matched but does not handle.
    pub fn unsupported(&self, plugin: &str) -> TransformerError {
        TransformerError::InvalidTransformer {
            transformer: plugin.to_owned(),
            method: self.hook_name(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransformerLogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

/// A message a plugin wants surfaced to the user once the transformation is over.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TransformerLog {
    pub level: TransformerLogLevel,
    pub message: String,
}

impl TransformerLog {
    pub fn warn(message: impl Into<String>) -> Self {
        TransformerLog {
            level: TransformerLogLevel::Warn,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        TransformerLog {
            level: TransformerLogLevel::Info,
            message: message.into(),
        }
    }
}

/// A plugin owning one directive.
///
/// Hooks are invoked by [`GraphqlTransform`](crate::GraphqlTransform) in a fixed order:
///
/// 1. `pre_validate_schema`
/// 2. `before`
/// 3. `visit`, once per occurrence of the plugin's directive
/// 4. `validate`, `prepare`, `transform_schema`
/// 5. `generate_resolvers`
/// 6. `after`, in the reverse plugin order
/// 7. `logs`
///
/// `pre_mutate_schema` and `mutate_schema` only run through
/// [`GraphqlTransform::preprocess_schema`](crate::GraphqlTransform::preprocess_schema).
pub trait TransformerPlugin {
    fn name(&self) -> &str;

    /// The SDL definition of the directive this plugin owns, e.g.
    /// `directive @model(queries: ModelQueryMap) on OBJECT`.
    fn directive_definition(&self) -> &str;

    /// Supporting type definitions the directive arguments reference.
    fn type_definitions(&self) -> &str {
        ""
    }

    fn band(&self) -> PluginBand {
        PluginBand::Generic
    }

    fn pre_mutate_schema(&mut self, _schema: &mut Schema) -> Result<(), TransformerError> {
        Ok(())
    }

    fn mutate_schema(&mut self, _schema: &mut Schema) -> Result<(), TransformerError> {
        Ok(())
    }

    fn pre_validate_schema(&mut self, _ctx: &mut TransformerContext) -> Result<(), TransformerError> {
        Ok(())
    }

    fn before(&mut self, _ctx: &mut TransformerContext) -> Result<(), TransformerError> {
        Ok(())
    }

    /// Called for every occurrence of the plugin's directive.
    fn visit(
        &mut self,
        ctx: &mut TransformerContext,
        site: DirectiveSite<'_>,
        directive: &Directive,
    ) -> Result<(), TransformerError>;

    fn validate(&mut self, _ctx: &mut TransformerContext) -> Result<(), TransformerError> {
        Ok(())
    }

    fn prepare(&mut self, _ctx: &mut TransformerContext) -> Result<(), TransformerError> {
        Ok(())
    }

    fn transform_schema(&mut self, _ctx: &mut TransformerContext) -> Result<(), TransformerError> {
        Ok(())
    }

    fn generate_resolvers(&mut self, _ctx: &mut TransformerContext) -> Result<(), TransformerError> {
        Ok(())
    }

    fn after(&mut self, _ctx: &mut TransformerContext) -> Result<(), TransformerError> {
        Ok(())
    }

    fn logs(&mut self) -> Vec<TransformerLog> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_serialize_with_their_level() {
        let logs = [TransformerLog::warn("table name is too long"), TransformerLog::info("done")];

        insta::assert_json_snapshot!(logs, @r#"
        [
          {
            "level": "WARN",
            "message": "table name is too long"
          },
          {
            "level": "INFO",
            "message": "done"
          }
        ]
        "#);
    }
}
