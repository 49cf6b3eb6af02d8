use indexmap::IndexMap;
use serde::Serialize;

use super::{
    ApiConstruct, DataSource, FunctionCode, FunctionDefinition, FunctionId, ResolverDefinition, ResolverId,
};
use crate::SyncConfig;

/// An [`ApiConstruct`] that records everything it is given.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlApi {
    schema: String,
    data_sources: IndexMap<String, DataSource>,
    functions: Vec<FunctionRecord>,
    resolvers: Vec<ResolverRecord>,
    /// Template files by name.
    assets: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRecord {
    pub id: FunctionId,
    pub name: String,
    pub data_source: String,
    pub logic: FunctionCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_config: Option<SyncConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverRecord {
    pub id: ResolverId,
    pub type_name: String,
    pub field_name: String,
    pub logical_id: String,
    pub request_template: String,
    pub response_template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    pub pipeline_function_ids: Vec<FunctionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stash: Option<serde_json::Value>,
}

impl GraphqlApi {
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn data_sources(&self) -> impl ExactSizeIterator<Item = &DataSource> {
        self.data_sources.values()
    }

    pub fn functions(&self) -> &[FunctionRecord] {
        &self.functions
    }

    pub fn function(&self, id: FunctionId) -> Option<&FunctionRecord> {
        self.functions.get(id.index())
    }

    pub fn resolvers(&self) -> &[ResolverRecord] {
        &self.resolvers
    }

    pub fn resolver(&self, type_name: &str, field_name: &str) -> Option<&ResolverRecord> {
        self.resolvers
            .iter()
            .find(|resolver| resolver.type_name == type_name && resolver.field_name == field_name)
    }

    /// The names of the functions of a pipeline resolver, in execution order.
    pub fn pipeline_function_names(&self, type_name: &str, field_name: &str) -> Vec<&str> {
        self.resolver(type_name, field_name)
            .map(|resolver| {
                resolver
                    .pipeline_function_ids
                    .iter()
                    .filter_map(|id| self.function(*id))
                    .map(|function| function.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn asset(&self, name: &str) -> Option<&str> {
        self.assets.get(name).map(String::as_str)
    }

    pub fn assets(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.assets.iter().map(|(name, content)| (name.as_str(), content.as_str()))
    }

    fn bind_assets(&mut self, definition: &FunctionDefinition) {
        for asset in &definition.assets {
            self.assets.insert(asset.name.clone(), asset.content.clone());
        }
    }
}

impl ApiConstruct for GraphqlApi {
    fn set_schema(&mut self, sdl: String) {
        self.schema = sdl;
    }

    fn add_data_source(&mut self, data_source: DataSource) {
        self.data_sources.insert(data_source.name.clone(), data_source);
    }

    fn has_data_source(&self, name: &str) -> bool {
        self.data_sources.contains_key(name)
    }

    fn data_source(&self, name: &str) -> Option<&DataSource> {
        self.data_sources.get(name)
    }

    fn add_function(&mut self, function: FunctionDefinition) -> FunctionId {
        let id = FunctionId::new(self.functions.len());
        self.bind_assets(&function);

        let FunctionDefinition {
            name,
            data_source,
            code,
            sync_config,
            ..
        } = function;

        self.functions.push(FunctionRecord {
            id,
            name,
            data_source,
            logic: code,
            sync_config,
        });

        id
    }

    fn bind_function_logic(&mut self, _function: FunctionId, definition: &FunctionDefinition) {
        self.bind_assets(definition);
    }

    fn create_resolver(&mut self, resolver: ResolverDefinition) -> ResolverId {
        let id = ResolverId::new(self.resolvers.len());

        let ResolverDefinition {
            type_name,
            field_name,
            logical_id,
            request_template,
            response_template,
            data_source,
            pipeline_function_ids,
            stash,
        } = resolver;

        self.resolvers.push(ResolverRecord {
            id,
            logical_id: logical_id.unwrap_or_else(|| format!("{type_name}{field_name}Resolver")),
            type_name,
            field_name,
            request_template,
            response_template,
            data_source,
            pipeline_function_ids,
            stash,
        });

        id
    }
}
