#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use graphql_transformer_core::{
    DataSource, DataSourceConfig, Directive, DirectiveSite, FieldDefinition, FunctionLogic, InputValueDefinition,
    MappingTemplate, PluginBand, Schema, Slot, TransformConfig, Type, TransformerContext, TransformerError,
    TransformerLog, TransformerPlugin, Value,
};

pub const GET_ITEM_REQUEST: &str = r#"{"version": "2018-05-29", "operation": "GetItem", "key": {"id": $util.dynamodb.toDynamoDBJson($ctx.args.id)}}"#;
pub const GET_ITEM_RESPONSE: &str = "$util.toJson($ctx.result)";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Hook invocations shared by several plugins, in call order.
pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

/// Records every hook it receives. Accepts its directive everywhere.
pub struct Recorder {
    name: String,
    directive: String,
    band: PluginBand,
    journal: Journal,
}

impl Recorder {
    pub fn new(name: &str, journal: &Journal) -> Self {
        Recorder::with_band(name, PluginBand::Generic, journal)
    }

    pub fn with_band(name: &str, band: PluginBand, journal: &Journal) -> Self {
        Recorder {
            name: name.to_owned(),
            directive: format!(
                "directive @{name}(label: String) repeatable on SCALAR | OBJECT | FIELD_DEFINITION | ARGUMENT_DEFINITION \
                 | INTERFACE | UNION | ENUM | ENUM_VALUE | INPUT_OBJECT | INPUT_FIELD_DEFINITION"
            ),
            band,
            journal: journal.clone(),
        }
    }

    fn record(&self, entry: impl std::fmt::Display) {
        self.journal.borrow_mut().push(format!("{}.{entry}", self.name));
    }
}

impl TransformerPlugin for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn directive_definition(&self) -> &str {
        &self.directive
    }

    fn band(&self) -> PluginBand {
        self.band
    }

    fn pre_validate_schema(&mut self, _: &mut TransformerContext) -> Result<(), TransformerError> {
        self.record("preValidateSchema");
        Ok(())
    }

    fn before(&mut self, _: &mut TransformerContext) -> Result<(), TransformerError> {
        self.record("before");
        Ok(())
    }

    fn visit(
        &mut self,
        _: &mut TransformerContext,
        site: DirectiveSite<'_>,
        directive: &Directive,
    ) -> Result<(), TransformerError> {
        let label = directive.argument("label").and_then(Value::as_str).unwrap_or("-");
        let target = match (site.field_name(), site.argument_name()) {
            (Some(field), Some(argument)) => format!("{}.{field}.{argument}", site.type_name()),
            (Some(field), None) => format!("{}.{field}", site.type_name()),
            _ => site.type_name().to_owned(),
        };

        self.record(format_args!("{}({target}, {label})", site.hook_name()));
        Ok(())
    }

    fn validate(&mut self, _: &mut TransformerContext) -> Result<(), TransformerError> {
        self.record("validate");
        Ok(())
    }

    fn prepare(&mut self, _: &mut TransformerContext) -> Result<(), TransformerError> {
        self.record("prepare");
        Ok(())
    }

    fn transform_schema(&mut self, _: &mut TransformerContext) -> Result<(), TransformerError> {
        self.record("transformSchema");
        Ok(())
    }

    fn generate_resolvers(&mut self, _: &mut TransformerContext) -> Result<(), TransformerError> {
        self.record("generateResolvers");
        Ok(())
    }

    fn after(&mut self, _: &mut TransformerContext) -> Result<(), TransformerError> {
        self.record("after");
        Ok(())
    }

    fn logs(&mut self) -> Vec<TransformerLog> {
        vec![TransformerLog::info(format!("{} done", self.name))]
    }
}

/// `@model`: backs an object type with a table and exposes a `get<Type>` query.
#[derive(Default)]
pub struct ModelPlugin {
    models: Vec<String>,
}

impl TransformerPlugin for ModelPlugin {
    fn name(&self) -> &str {
        "model"
    }

    fn directive_definition(&self) -> &str {
        "directive @model on OBJECT"
    }

    fn band(&self) -> PluginBand {
        PluginBand::DataSourceProvider
    }

    fn before(&mut self, _: &mut TransformerContext) -> Result<(), TransformerError> {
        self.models.clear();
        Ok(())
    }

    fn visit(
        &mut self,
        ctx: &mut TransformerContext,
        site: DirectiveSite<'_>,
        _: &Directive,
    ) -> Result<(), TransformerError> {
        let DirectiveSite::Object(definition) = site else {
            return Err(site.unsupported(self.name()));
        };

        let name = definition.name.as_str();
        let table = DataSource::new(
            format!("{name}Table"),
            DataSourceConfig::DynamoDb {
                table_name: format!("{name}-{}", ctx.synth_parameters().environment_name),
                stream_arn: None,
            },
        );
        ctx.data_sources.add_for_type(name, table)?;

        let get = FieldDefinition::new(format!("get{name}"), Type::named(name))
            .with_argument(InputValueDefinition::new("id", Type::named("ID").non_null()));
        ctx.output.add_query_fields([get])?;

        self.models.push(name.to_owned());
        Ok(())
    }

    fn generate_resolvers(&mut self, ctx: &mut TransformerContext) -> Result<(), TransformerError> {
        let query = ctx.output.query_type_name().to_owned();

        for model in &self.models {
            let field = format!("get{model}");
            let data_source = ctx.data_sources.for_type(model).map(|data_source| data_source.name.clone());
            let logic = FunctionLogic::templates(
                MappingTemplate::named(format!("{query}.{field}.req.vtl"), GET_ITEM_REQUEST),
                MappingTemplate::named(format!("{query}.{field}.res.vtl"), GET_ITEM_RESPONSE),
            );

            let mut resolver = ctx
                .resolvers
                .generate_query_resolver(&query, &field, logic, data_source.as_deref())?;
            resolver.add_to_slot(
                Slot::PostDataLoad,
                None,
                Some(MappingTemplate::inline("$util.toJson($ctx.prev.result)")),
                None,
            )?;

            ctx.resolvers.add_resolver(resolver)?;
        }

        Ok(())
    }
}

/// `@allow(groups: [...])`: puts a group check in the auth slot of the `get<Type>` query.
#[derive(Default)]
pub struct AllowPlugin {
    rules: Vec<(String, Vec<String>)>,
}

impl TransformerPlugin for AllowPlugin {
    fn name(&self) -> &str {
        "allow"
    }

    fn directive_definition(&self) -> &str {
        "directive @allow(groups: [String!]!) on OBJECT"
    }

    fn band(&self) -> PluginBand {
        PluginBand::Auth
    }

    fn before(&mut self, _: &mut TransformerContext) -> Result<(), TransformerError> {
        self.rules.clear();
        Ok(())
    }

    fn visit(
        &mut self,
        _: &mut TransformerContext,
        site: DirectiveSite<'_>,
        directive: &Directive,
    ) -> Result<(), TransformerError> {
        let DirectiveSite::Object(definition) = site else {
            return Err(site.unsupported(self.name()));
        };

        let groups = directive
            .argument("groups")
            .and_then(Value::as_list)
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect();

        self.rules.push((definition.name.clone(), groups));
        Ok(())
    }

    fn generate_resolvers(&mut self, ctx: &mut TransformerContext) -> Result<(), TransformerError> {
        let query = ctx.output.query_type_name().to_owned();

        for (type_name, groups) in &self.rules {
            let field = format!("get{type_name}");
            let Some(resolver) = ctx.resolvers.get_resolver_mut(&query, &field) else {
                continue;
            };

            let request = format!(
                "#set($allowed = {:?})\n#if(!$util.authType().equals(\"API Key Authorization\") && !$allowed.containsAll($ctx.identity.groups))\n$util.unauthorized()\n#end\n{{}}",
                groups
            );

            resolver.add_to_slot(
                Slot::Auth,
                Some(MappingTemplate::named(
                    format!("{query}.{field}.{{slotName}}.{{slotIndex}}.req.vtl"),
                    request,
                )),
                Some(MappingTemplate::named(
                    format!("{query}.{field}.{{slotName}}.{{slotIndex}}.res.vtl"),
                    "$util.toJson({})",
                )),
                None,
            )?;
        }

        Ok(())
    }
}

type Hook = Box<dyn FnMut(&mut TransformerContext) -> Result<(), TransformerError>>;
type SchemaHook = Box<dyn FnMut(&mut Schema) -> Result<(), TransformerError>>;

/// A plugin whose hooks are given as closures.
pub struct CustomPlugin {
    name: String,
    directive: String,
    band: PluginBand,
    mutate_schema: Option<SchemaHook>,
    generate_resolvers: Option<Hook>,
    after: Option<Hook>,
}

impl CustomPlugin {
    pub fn new(name: &str) -> Self {
        CustomPlugin {
            name: name.to_owned(),
            directive: format!("directive @{name} on OBJECT"),
            band: PluginBand::Generic,
            mutate_schema: None,
            generate_resolvers: None,
            after: None,
        }
    }

    #[must_use]
    pub fn with_band(mut self, band: PluginBand) -> Self {
        self.band = band;
        self
    }

    #[must_use]
    pub fn on_mutate_schema(mut self, hook: impl FnMut(&mut Schema) -> Result<(), TransformerError> + 'static) -> Self {
        self.mutate_schema = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn on_generate_resolvers(
        mut self,
        hook: impl FnMut(&mut TransformerContext) -> Result<(), TransformerError> + 'static,
    ) -> Self {
        self.generate_resolvers = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn on_after(
        mut self,
        hook: impl FnMut(&mut TransformerContext) -> Result<(), TransformerError> + 'static,
    ) -> Self {
        self.after = Some(Box::new(hook));
        self
    }
}

impl TransformerPlugin for CustomPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn directive_definition(&self) -> &str {
        &self.directive
    }

    fn band(&self) -> PluginBand {
        self.band
    }

    fn mutate_schema(&mut self, schema: &mut Schema) -> Result<(), TransformerError> {
        match &mut self.mutate_schema {
            Some(hook) => hook(schema),
            None => Ok(()),
        }
    }

    fn visit(
        &mut self,
        _: &mut TransformerContext,
        _: DirectiveSite<'_>,
        _: &Directive,
    ) -> Result<(), TransformerError> {
        Ok(())
    }

    fn generate_resolvers(&mut self, ctx: &mut TransformerContext) -> Result<(), TransformerError> {
        match &mut self.generate_resolvers {
            Some(hook) => hook(ctx),
            None => Ok(()),
        }
    }

    fn after(&mut self, ctx: &mut TransformerContext) -> Result<(), TransformerError> {
        match &mut self.after {
            Some(hook) => hook(ctx),
            None => Ok(()),
        }
    }
}

pub fn model_and_allow() -> Vec<Box<dyn TransformerPlugin>> {
    vec![Box::new(AllowPlugin::default()), Box::new(ModelPlugin::default())]
}

pub fn config(toml: &str) -> TransformConfig {
    TransformConfig::from_toml(toml).unwrap()
}
