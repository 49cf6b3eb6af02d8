mod dispatch;

use crate::{
    ApiConstruct, GraphqlApi, NONE_DATA_SOURCE_NAME, TransformConfig, TransformerContext, TransformerError,
    TransformerLog, TransformerLogLevel, TransformerPlugin,
    directives::{
        builtin_directive_definitions, is_builtin_directive, parse_plugin_directive, parse_plugin_type_definitions,
    },
    schema::{DirectiveDefinition, Schema, TypeDefinition},
    validate::validate,
};

/// The result of a transformation.
#[derive(Debug)]
pub struct TransformOutput<Api = GraphqlApi> {
    /// The output schema, with every directive still applied.
    pub schema: Schema,
    /// The API the resolvers were synthesized into.
    pub api: Api,
    pub logs: Vec<TransformerLog>,
}

/// Runs a list of plugins over GraphQL schemas.
pub struct GraphqlTransform {
    /// Sorted by band.
    plugins: Vec<Box<dyn TransformerPlugin>>,
    /// The directive of each plugin, in the same order as `plugins`.
    plugin_directives: Vec<DirectiveDefinition>,
    plugin_types: Vec<TypeDefinition>,
    builtin_directives: Vec<DirectiveDefinition>,
    config: TransformConfig,
}

impl GraphqlTransform {
    pub fn new(plugins: Vec<Box<dyn TransformerPlugin>>, config: TransformConfig) -> Result<Self, TransformerError> {
        if plugins.is_empty() {
            return Err(TransformerError::configuration("at least one transformer must be provided"));
        }

        let mut plugins = plugins;
        plugins.sort_by_key(|plugin| plugin.band());

        let mut plugin_directives = Vec::with_capacity(plugins.len());
        let mut plugin_types = Vec::new();

        for plugin in &plugins {
            let directive = parse_plugin_directive(plugin.name(), plugin.directive_definition())?;

            if plugin_directives
                .iter()
                .any(|existing: &DirectiveDefinition| existing.name == directive.name)
            {
                return Err(TransformerError::configuration(format!(
                    "the directive '@{}' is declared by more than one transformer",
                    directive.name
                )));
            }

            plugin_directives.push(directive);
            plugin_types.extend(parse_plugin_type_definitions(plugin.name(), plugin.type_definitions())?.definitions);
        }

        let builtin_directives = builtin_directive_definitions()?
            .into_iter()
            .filter(|builtin| plugin_directives.iter().all(|directive| directive.name != builtin.name))
            .collect();

        Ok(GraphqlTransform {
            plugins,
            plugin_directives,
            plugin_types,
            builtin_directives,
            config,
        })
    }

    /// The plugin names, in the order they run.
    pub fn plugin_names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|plugin| plugin.name())
    }

    /// Transform the schema, synthesizing the resolvers into an in-memory [`GraphqlApi`].
    pub fn transform(&mut self, sdl: &str) -> Result<TransformOutput, TransformerError> {
        self.transform_with(sdl, GraphqlApi::default())
    }

    /// Transform the schema, synthesizing the resolvers into `api`.
    #[tracing::instrument(skip_all, fields(plugins = self.plugins.len()))]
    pub fn transform_with<Api: ApiConstruct>(
        &mut self,
        sdl: &str,
        mut api: Api,
    ) -> Result<TransformOutput<Api>, TransformerError> {
        let input = Schema::parse(sdl)?;
        self.check_unknown_directives(&input)?;

        let mut ctx = TransformerContext::new(input.clone(), &self.config);

        run_phase(self.plugins.iter_mut(), "preValidateSchema", &mut ctx, |plugin, ctx| {
            plugin.pre_validate_schema(ctx)
        })?;

        let directive_definitions = self
            .plugin_directives
            .iter()
            .chain(&self.builtin_directives)
            .cloned()
            .collect::<Vec<_>>();
        validate(&input, &directive_definitions, &self.plugin_types)?;

        run_phase(self.plugins.iter_mut(), "before", &mut ctx, |plugin, ctx| plugin.before(ctx))?;

        tracing::debug!("Dispatching directives");
        for (plugin, directive) in self.plugins.iter_mut().zip(&self.plugin_directives) {
            dispatch::dispatch(plugin.as_mut(), directive, &input, &mut ctx)?;
        }

        run_phase(self.plugins.iter_mut(), "validate", &mut ctx, |plugin, ctx| plugin.validate(ctx))?;
        run_phase(self.plugins.iter_mut(), "prepare", &mut ctx, |plugin, ctx| plugin.prepare(ctx))?;
        run_phase(self.plugins.iter_mut(), "transformSchema", &mut ctx, |plugin, ctx| {
            plugin.transform_schema(ctx)
        })?;

        api.set_schema(self.api_schema(&ctx.output));

        run_phase(self.plugins.iter_mut(), "generateResolvers", &mut ctx, |plugin, ctx| {
            plugin.generate_resolvers(ctx)
        })?;
        run_phase(self.plugins.iter_mut().rev(), "after", &mut ctx, |plugin, ctx| plugin.after(ctx))?;

        let logs = self.collect_logs();

        finalize(&mut ctx, &mut api)?;

        Ok(TransformOutput {
            schema: ctx.output,
            api,
            logs,
        })
    }

    /// Let the plugins rewrite the input schema, without transforming it.
    ///
    /// Runs `pre_mutate_schema` then `mutate_schema` on every plugin and returns the resulting SDL.
    pub fn preprocess_schema(&mut self, sdl: &str) -> Result<String, TransformerError> {
        let mut schema = Schema::parse(sdl)?;

        for plugin in &mut self.plugins {
            plugin.pre_mutate_schema(&mut schema)?;
        }

        for plugin in &mut self.plugins {
            plugin.mutate_schema(&mut schema)?;
        }

        Ok(schema.to_string())
    }

    fn check_unknown_directives(&self, input: &Schema) -> Result<(), TransformerError> {
        for (location, directive) in input.iter_directives() {
            let is_known = is_builtin_directive(&directive.name)
                || self
                    .plugin_directives
                    .iter()
                    .any(|definition| definition.name == directive.name);

            if !is_known {
                tracing::debug!("Unknown directive @{} on {location}", directive.name);
                return Err(TransformerError::UnknownDirective {
                    directive: directive.name.clone(),
                });
            }
        }

        Ok(())
    }

    /// The schema handed to the API: plugin directives mean nothing at runtime and are removed,
    /// including the ones reusing the name of a built-in directive.
    fn api_schema(&self, output: &Schema) -> String {
        let mut schema = output.clone();
        schema.retain_directives(|name| self.builtin_directives.iter().any(|builtin| builtin.name == name));
        schema.directive_definitions.retain(|definition| {
            self.plugin_directives
                .iter()
                .all(|directive| directive.name != definition.name)
        });
        schema.to_string()
    }

    fn collect_logs(&mut self) -> Vec<TransformerLog> {
        let mut logs = Vec::new();

        for plugin in &mut self.plugins {
            for log in plugin.logs() {
                let name = plugin.name();

                match log.level {
                    TransformerLogLevel::Error => tracing::error!(transformer = name, "{}", log.message),
                    TransformerLogLevel::Warn => tracing::warn!(transformer = name, "{}", log.message),
                    TransformerLogLevel::Info => tracing::info!(transformer = name, "{}", log.message),
                    TransformerLogLevel::Debug => tracing::debug!(transformer = name, "{}", log.message),
                }

                logs.push(log);
            }
        }

        logs
    }
}

fn run_phase<'a>(
    plugins: impl Iterator<Item = &'a mut Box<dyn TransformerPlugin>>,
    phase: &str,
    ctx: &mut TransformerContext,
    hook: impl Fn(&mut dyn TransformerPlugin, &mut TransformerContext) -> Result<(), TransformerError>,
) -> Result<(), TransformerError> {
    tracing::debug!("Running {phase}");

    for plugin in plugins {
        tracing::trace!("{phase}() of '{}'", plugin.name());
        hook(plugin.as_mut(), ctx)?;
    }

    Ok(())
}

/// Register the data sources and synthesize every pipeline resolver.
fn finalize(ctx: &mut TransformerContext, api: &mut dyn ApiConstruct) -> Result<(), TransformerError> {
    for data_source in ctx.data_sources.iter() {
        if !api.has_data_source(&data_source.name) {
            api.add_data_source(data_source.clone());
        }
    }

    if !api.has_data_source(NONE_DATA_SOURCE_NAME) {
        api.add_none_data_source(NONE_DATA_SOURCE_NAME);
    }

    let resolvers = std::mem::take(&mut ctx.resolvers);
    tracing::debug!("Synthesizing {} resolvers", resolvers.len());

    for resolver in resolvers.iter() {
        resolver.synthesize(ctx, api)?;
    }

    ctx.resolvers = resolvers;
    Ok(())
}
