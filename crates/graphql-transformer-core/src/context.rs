mod data_sources;
mod resolvers;

pub use self::{data_sources::DataSourceRegistry, resolvers::ResolverPipelineRegistry};

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::{AuthConfig, FunctionDeduplicator, ResolverConfig, Schema, SynthParameters, TransformConfig};

/// One occurrence of a directive: its name, the node it is applied on and its position among the
/// directives with the same name on that node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct SeenTransformationKey {
    pub directive: String,
    pub type_name: String,
    pub field_name: Option<String>,
    pub argument_name: Option<String>,
    pub ordinal: usize,
}

/// The state threaded through every phase of a transformation.
///
/// A new context is created for every call to
/// [`GraphqlTransform::transform`](crate::GraphqlTransform::transform), so nothing leaks from one
/// transformation to the next.
#[derive(Debug)]
pub struct TransformerContext {
    /// The schema being produced. Starts as a copy of the input.
    pub output: Schema,
    pub resolvers: ResolverPipelineRegistry,
    pub data_sources: DataSourceRegistry,
    /// Free-form values plugins share with each other.
    pub metadata: IndexMap<String, serde_json::Value>,
    resolver_config: ResolverConfig,
    auth_config: AuthConfig,
    synth_parameters: SynthParameters,
    dedup: FunctionDeduplicator,
    seen: HashSet<SeenTransformationKey>,
}

impl TransformerContext {
    pub fn new(output: Schema, config: &TransformConfig) -> Self {
        TransformerContext {
            output,
            resolvers: ResolverPipelineRegistry::default(),
            data_sources: DataSourceRegistry::default(),
            metadata: IndexMap::new(),
            resolver_config: config.resolver_config.clone(),
            auth_config: config.auth_config.clone(),
            synth_parameters: config.synth_parameters.clone(),
            dedup: FunctionDeduplicator::new(config.disable_resolver_deduping),
            seen: HashSet::new(),
        }
    }

    pub fn resolver_config(&self) -> &ResolverConfig {
        &self.resolver_config
    }

    pub fn auth_config(&self) -> &AuthConfig {
        &self.auth_config
    }

    pub fn synth_parameters(&self) -> &SynthParameters {
        &self.synth_parameters
    }

    /// Whether conflict detection is configured anywhere in the project.
    pub fn is_using_conflict_detection(&self) -> bool {
        self.resolver_config.project.is_some() || !self.resolver_config.models.is_empty()
    }

    pub fn dedup_mut(&mut self) -> &mut FunctionDeduplicator {
        &mut self.dedup
    }

    pub(crate) fn has_seen(&self, key: &SeenTransformationKey) -> bool {
        self.seen.contains(key)
    }

    pub(crate) fn mark_seen(&mut self, key: SeenTransformationKey) {
        self.seen.insert(key);
    }
}
