//! The construct the synthesized resolver graph is emitted into.

mod in_memory;

pub use in_memory::{FunctionRecord, GraphqlApi, ResolverRecord};

use serde::Serialize;

use crate::SyncConfig;

/// The data source every function without one of its own is bound to.
pub const NONE_DATA_SOURCE_NAME: &str = "NONE_DS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSourceType {
    AmazonDynamodb,
    AwsLambda,
    Http,
    RelationalDatabase,
    AmazonOpensearchService,
    None,
}

impl DataSourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            DataSourceType::AmazonDynamodb => "AMAZON_DYNAMODB",
            DataSourceType::AwsLambda => "AWS_LAMBDA",
            DataSourceType::Http => "HTTP",
            DataSourceType::RelationalDatabase => "RELATIONAL_DATABASE",
            DataSourceType::AmazonOpensearchService => "AMAZON_OPENSEARCH_SERVICE",
            DataSourceType::None => "NONE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DataSourceConfig {
    #[serde(rename_all = "camelCase")]
    DynamoDb {
        table_name: String,
        stream_arn: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Lambda { function_arn: String },
    Http { endpoint: String },
    #[serde(rename_all = "camelCase")]
    RelationalDatabase { database_name: String },
    OpenSearch { endpoint: String },
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSource {
    pub name: String,
    #[serde(flatten)]
    pub config: DataSourceConfig,
}

impl DataSource {
    pub fn new(name: impl Into<String>, config: DataSourceConfig) -> Self {
        DataSource {
            name: name.into(),
            config,
        }
    }

    pub fn none(name: impl Into<String>) -> Self {
        DataSource::new(name, DataSourceConfig::None)
    }

    pub fn ty(&self) -> DataSourceType {
        match self.config {
            DataSourceConfig::DynamoDb { .. } => DataSourceType::AmazonDynamodb,
            DataSourceConfig::Lambda { .. } => DataSourceType::AwsLambda,
            DataSourceConfig::Http { .. } => DataSourceType::Http,
            DataSourceConfig::RelationalDatabase { .. } => DataSourceType::RelationalDatabase,
            DataSourceConfig::OpenSearch { .. } => DataSourceType::AmazonOpensearchService,
            DataSourceConfig::None => DataSourceType::None,
        }
    }
}

/// Handle to a function registered with an [`ApiConstruct`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FunctionId(u32);

impl FunctionId {
    pub fn new(idx: usize) -> Self {
        FunctionId(idx as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a resolver created by an [`ApiConstruct`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResolverId(u32);

impl ResolverId {
    pub fn new(idx: usize) -> Self {
        ResolverId(idx as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The logic of a function once every template has been resolved to its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FunctionCode {
    Templates { request: String, response: String },
    Code { code: String },
}

impl FunctionCode {
    pub(crate) fn request_text(&self) -> &str {
        match self {
            FunctionCode::Templates { request, .. } => request,
            FunctionCode::Code { code } => code,
        }
    }

    pub(crate) fn response_text(&self) -> &str {
        match self {
            FunctionCode::Templates { response, .. } => response,
            FunctionCode::Code { .. } => "",
        }
    }
}

/// A named template file, written next to the generated resolvers so it can be overridden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateAsset {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDefinition {
    pub name: String,
    pub data_source: String,
    pub code: FunctionCode,
    pub assets: Vec<TemplateAsset>,
    pub sync_config: Option<SyncConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolverDefinition {
    pub type_name: String,
    pub field_name: String,
    pub logical_id: Option<String>,
    pub request_template: String,
    pub response_template: String,
    pub data_source: Option<String>,
    pub pipeline_function_ids: Vec<FunctionId>,
    pub stash: Option<serde_json::Value>,
}

/// The API the resolver graph is emitted into.
///
/// Implementations must keep functions in the order they are given in
/// [`ResolverDefinition::pipeline_function_ids`].
pub trait ApiConstruct {
    fn set_schema(&mut self, sdl: String);

    fn add_data_source(&mut self, data_source: DataSource);

    fn has_data_source(&self, name: &str) -> bool;

    fn add_none_data_source(&mut self, name: &str) {
        self.add_data_source(DataSource::none(name));
    }

    fn data_source(&self, name: &str) -> Option<&DataSource>;

    fn add_function(&mut self, function: FunctionDefinition) -> FunctionId;

    /// Bind the templates of `definition` to an already registered function, without creating a
    /// new one.
    fn bind_function_logic(&mut self, function: FunctionId, definition: &FunctionDefinition);

    fn create_resolver(&mut self, resolver: ResolverDefinition) -> ResolverId;
}
