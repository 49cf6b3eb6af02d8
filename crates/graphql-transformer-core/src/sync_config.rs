//! Conflict detection configuration of the resolvers backed by a table.

use serde::{Deserialize, Serialize};

use crate::{ResolverConfig, SynthParameters, TransformerContext};

const ENV_REFERENCE: &str = "${env}";
const NO_ENVIRONMENT: &str = "NONE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictDetection {
    Version,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictHandler {
    OptimisticConcurrency,
    Automerge,
    Lambda,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaConflictHandler {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda_arn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_detection: Option<ConflictDetection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_handler: Option<ConflictHandler>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda_conflict_handler: Option<LambdaConflictHandler>,
}

impl SyncConfig {
    pub fn new(conflict_detection: ConflictDetection, conflict_handler: ConflictHandler) -> Self {
        SyncConfig {
            conflict_detection: Some(conflict_detection),
            conflict_handler: Some(conflict_handler),
            lambda_conflict_handler: None,
        }
    }

    #[must_use]
    pub fn with_lambda_conflict_handler(mut self, handler: LambdaConflictHandler) -> Self {
        self.lambda_conflict_handler = Some(handler);
        self
    }

    /// A per-type configuration only applies when it names both a detection strategy and a
    /// handler.
    pub fn is_complete(&self) -> bool {
        self.conflict_detection.is_some() && self.conflict_handler.is_some()
    }
}

/// The conflict detection configuration of the given model type.
pub fn get_sync_config(ctx: &TransformerContext, type_name: &str) -> Option<SyncConfig> {
    resolve_sync_config(ctx.resolver_config(), ctx.synth_parameters(), type_name)
}

pub(crate) fn resolve_sync_config(
    resolver_config: &ResolverConfig,
    synth_parameters: &SynthParameters,
    type_name: &str,
) -> Option<SyncConfig> {
    let mut sync_config = match resolver_config.models.get(type_name) {
        Some(model) if model.is_complete() => Some(model.clone()),
        Some(_) => {
            tracing::warn!(
                "Ignoring the conflict detection configuration of '{type_name}': both the detection strategy and the handler must be set."
            );
            resolver_config.project.clone()
        }
        None => resolver_config.project.clone(),
    }?;

    let is_lambda = sync_config.conflict_handler == Some(ConflictHandler::Lambda);

    if let Some(handler) = sync_config
        .lambda_conflict_handler
        .as_mut()
        .filter(|handler| is_lambda && handler.lambda_arn.is_none())
    {
        handler.lambda_arn = Some(lambda_arn(synth_parameters, &handler.name, handler.region.as_deref()));
    }

    Some(sync_config)
}

fn lambda_arn(synth_parameters: &SynthParameters, name: &str, region: Option<&str>) -> String {
    let name = if !name.contains(ENV_REFERENCE) {
        name.to_owned()
    } else if synth_parameters.environment_name == NO_ENVIRONMENT {
        name.replace(&format!("-{ENV_REFERENCE}"), "").replace(ENV_REFERENCE, "")
    } else {
        name.replace(ENV_REFERENCE, &synth_parameters.environment_name)
    };

    format!(
        "arn:aws:lambda:{}:{}:function:{name}",
        region.unwrap_or(&synth_parameters.region),
        synth_parameters.account_id
    )
}
