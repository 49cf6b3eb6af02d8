use std::fmt;

use indexmap::IndexMap;
use serde_json::json;

use crate::{AuthConfig, AuthMode, DataSource, DataSourceConfig, SynthParameters};

/// The values the wrapper of a pipeline resolver puts in the stash before running its functions.
#[derive(Debug, Clone, PartialEq)]
pub struct StashPayload {
    pub type_name: String,
    pub field_name: String,
    pub conditions: Vec<serde_json::Value>,
    pub metadata: IndexMap<String, serde_json::Value>,
    /// `tableName`, `lambdaArn`, `httpEndpoint` or `databaseName`, depending on the data source.
    pub locator: Option<(&'static str, String)>,
    pub auth_role: Option<String>,
    pub unauth_role: Option<String>,
    pub admin_roles: Vec<String>,
}

impl StashPayload {
    pub(crate) fn new(
        type_name: &str,
        field_name: &str,
        data_source: Option<&DataSource>,
        synth_parameters: &SynthParameters,
        auth_config: &AuthConfig,
    ) -> Self {
        let mut metadata = IndexMap::new();

        if let Some(data_source) = data_source {
            metadata.insert(String::from("dataSourceType"), json!(data_source.ty().as_str()));
        }
        metadata.insert(String::from("apiId"), json!(synth_parameters.api_id()));

        let locator = data_source.and_then(|data_source| match &data_source.config {
            DataSourceConfig::DynamoDb { table_name, .. } => Some(("tableName", table_name.clone())),
            DataSourceConfig::Lambda { function_arn } => Some(("lambdaArn", function_arn.clone())),
            DataSourceConfig::Http { endpoint } => Some(("httpEndpoint", endpoint.clone())),
            DataSourceConfig::RelationalDatabase { database_name } => Some(("databaseName", database_name.clone())),
            DataSourceConfig::OpenSearch { .. } | DataSourceConfig::None => None,
        });

        let mut payload = StashPayload {
            type_name: type_name.to_owned(),
            field_name: field_name.to_owned(),
            conditions: Vec::new(),
            metadata,
            locator,
            auth_role: None,
            unauth_role: None,
            admin_roles: Vec::new(),
        };

        if auth_config.uses(AuthMode::AwsIam) {
            payload.auth_role = synth_parameters
                .authenticated_user_role_name
                .as_deref()
                .map(|role| synth_parameters.assumed_role_arn(role));
            payload.unauth_role = synth_parameters
                .unauthenticated_user_role_name
                .as_deref()
                .map(|role| synth_parameters.assumed_role_arn(role));
            payload.admin_roles.clone_from(&synth_parameters.admin_roles);
        }

        payload
    }

    /// The request template of the wrapper resolver.
    pub fn render_template(&self) -> String {
        self.to_string()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut value = json!({
            "typeName": self.type_name,
            "fieldName": self.field_name,
            "conditions": self.conditions,
            "metadata": self.metadata,
        });

        if let Some(object) = value.as_object_mut() {
            if let Some((key, locator)) = &self.locator {
                object.insert((*key).to_owned(), json!(locator));
            }
            if let Some(role) = &self.auth_role {
                object.insert(String::from("authRole"), json!(role));
            }
            if let Some(role) = &self.unauth_role {
                object.insert(String::from("unauthRole"), json!(role));
            }
            if !self.admin_roles.is_empty() {
                object.insert(String::from("adminRoles"), json!(self.admin_roles));
            }
        }

        value
    }
}

impl fmt::Display for StashPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        put(f, "typeName", json!(self.type_name))?;
        put(f, "fieldName", json!(self.field_name))?;
        put(f, "conditions", json!(self.conditions))?;
        put(f, "metadata", json!({}))?;

        for (key, value) in &self.metadata {
            writeln!(f, "$util.qr($ctx.stash.metadata.put(\"{key}\", {value}))")?;
        }

        if let Some((key, value)) = &self.locator {
            put(f, key, json!(value))?;
        }

        if let Some(role) = &self.auth_role {
            put(f, "authRole", json!(role))?;
        }

        if let Some(role) = &self.unauth_role {
            put(f, "unauthRole", json!(role))?;
        }

        if !self.admin_roles.is_empty() {
            put(f, "adminRoles", json!(self.admin_roles))?;
        }

        writeln!(f, "$util.toJson({{}})")
    }
}

fn put(f: &mut fmt::Formatter<'_>, key: &str, value: serde_json::Value) -> fmt::Result {
    writeln!(f, "$util.qr($ctx.stash.put(\"{key}\", {value}))")
}
