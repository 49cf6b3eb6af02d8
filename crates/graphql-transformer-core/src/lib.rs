//! Directive-driven GraphQL schema transformation.
//!
//! A [`GraphqlTransform`] runs an ordered list of [`TransformerPlugin`]s over a GraphQL SDL
//! document. Every plugin owns one directive: the orchestrator decides when and how many times
//! the plugin is invoked for each occurrence of that directive, lets plugins mutate the output
//! schema, and collects the resolver logic they contribute into one [`PipelineResolver`] per
//! field. At the end of the pass every pipeline is synthesized against an [`ApiConstruct`],
//! producing the resolver graph that downstream provisioning consumes.
//!
//! ```ignore
//! let mut transform = GraphqlTransform::new(vec![Box::new(ModelPlugin::default())], TransformConfig::default())?;
//! let output = transform.transform(sdl)?;
//! for resolver in output.api.resolvers() {
//!     println!("{}.{} -> {:?}", resolver.type_name, resolver.field_name, resolver.pipeline_function_ids);
//! }
//! ```

#![cfg_attr(test, allow(unused_crate_dependencies))]

mod api;
mod config;
mod context;
mod dedup;
mod directives;
mod error;
mod plugin;
mod resolver;
mod schema;
mod sync_config;
mod transform;
mod validate;

pub use self::{
    api::{
        ApiConstruct, DataSource, DataSourceConfig, DataSourceType, FunctionCode, FunctionDefinition, FunctionId,
        FunctionRecord, GraphqlApi, NONE_DATA_SOURCE_NAME, ResolverDefinition, ResolverId, ResolverRecord,
        TemplateAsset,
    },
    config::{AuthConfig, AuthMode, ResolverConfig, SynthParameters, TransformConfig},
    context::{DataSourceRegistry, ResolverPipelineRegistry, TransformerContext},
    dedup::FunctionDeduplicator,
    directives::{BUILTIN_DIRECTIVES, directive_matches},
    error::{SchemaValidationError, TransformerError},
    plugin::{DirectiveSite, PluginBand, TransformerLog, TransformerLogLevel, TransformerPlugin},
    resolver::{
        FunctionLogic, FunctionUnit, MappingTemplate, OperationKind, PipelineResolver, Slot, StashPayload,
    },
    schema::{
        Directive, DirectiveDefinition, DirectiveLocations, EnumValueDefinition, FieldDefinition,
        InputValueDefinition, ObjectType, RootOperationTypes, Schema, Type, TypeDefinition, TypeKind, Value,
    },
    sync_config::{ConflictDetection, ConflictHandler, LambdaConflictHandler, SyncConfig, get_sync_config},
    transform::{GraphqlTransform, TransformOutput},
};
