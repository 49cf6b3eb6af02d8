use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{SyncConfig, TransformerError};

/// Everything a transformation needs besides the schema and the plugins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TransformConfig {
    pub resolver_config: ResolverConfig,
    pub auth_config: AuthConfig,
    pub synth_parameters: SynthParameters,
    /// Create one function per slot unit even when an identical one already exists.
    pub disable_resolver_deduping: bool,
}

impl TransformConfig {
    /// Load the configuration from a TOML document.
    ///
    /// ```toml
    /// disableResolverDeduping = false
    ///
    /// [resolverConfig.project]
    /// conflictDetection = "VERSION"
    /// conflictHandler = "AUTOMERGE"
    ///
    /// [synthParameters]
    /// apiName = "blog"
    /// region = "eu-west-1"
    /// accountId = "123456789012"
    /// ```
    pub fn from_toml(source: &str) -> Result<Self, TransformerError> {
        toml::from_str(source).map_err(|err| TransformerError::configuration(err.to_string()))
    }
}

/// Conflict detection settings, project wide and per model type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    pub project: Option<SyncConfig>,
    pub models: BTreeMap<String, SyncConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthMode {
    ApiKey,
    AwsIam,
    AmazonCognitoUserPools,
    OpenidConnect,
    AwsLambda,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthConfig {
    pub default_authentication: AuthMode,
    pub additional_authentication_providers: Vec<AuthMode>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            default_authentication: AuthMode::ApiKey,
            additional_authentication_providers: Vec::new(),
        }
    }
}

impl AuthConfig {
    pub fn modes(&self) -> impl Iterator<Item = AuthMode> + '_ {
        std::iter::once(self.default_authentication).chain(self.additional_authentication_providers.iter().copied())
    }

    pub fn uses(&self, mode: AuthMode) -> bool {
        self.modes().any(|candidate| candidate == mode)
    }
}

/// Parameters of the deployment the resolvers are synthesized for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SynthParameters {
    pub api_name: String,
    pub environment_name: String,
    pub region: String,
    pub account_id: String,
    pub authenticated_user_role_name: Option<String>,
    pub unauthenticated_user_role_name: Option<String>,
    pub admin_roles: Vec<String>,
}

impl Default for SynthParameters {
    fn default() -> Self {
        SynthParameters {
            api_name: String::from("api"),
            environment_name: String::from("NONE"),
            region: String::from("us-east-1"),
            account_id: String::from("000000000000"),
            authenticated_user_role_name: None,
            unauthenticated_user_role_name: None,
            admin_roles: Vec::new(),
        }
    }
}

impl SynthParameters {
    pub(crate) fn api_id(&self) -> String {
        format!("{}-{}", self.api_name, self.environment_name)
    }

    pub(crate) fn assumed_role_arn(&self, role: &str) -> String {
        format!(
            "arn:aws:sts::{}:assumed-role/{role}/CognitoIdentityCredentials",
            self.account_id
        )
    }
}
