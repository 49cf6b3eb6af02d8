use indexmap::IndexMap;

use crate::{FunctionLogic, OperationKind, PipelineResolver, TransformerError};

/// The pipeline resolvers of a transformation, by type and field name.
///
/// Resolvers are synthesized in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ResolverPipelineRegistry {
    resolvers: IndexMap<(String, String), PipelineResolver>,
}

impl ResolverPipelineRegistry {
    pub fn generate_query_resolver(
        &self,
        type_name: &str,
        field_name: &str,
        logic: FunctionLogic,
        data_source: Option<&str>,
    ) -> Result<PipelineResolver, TransformerError> {
        generate(type_name, field_name, logic, data_source, OperationKind::Query)
    }

    pub fn generate_mutation_resolver(
        &self,
        type_name: &str,
        field_name: &str,
        logic: FunctionLogic,
        data_source: Option<&str>,
    ) -> Result<PipelineResolver, TransformerError> {
        generate(type_name, field_name, logic, data_source, OperationKind::Mutation)
    }

    pub fn generate_subscription_resolver(
        &self,
        type_name: &str,
        field_name: &str,
        logic: FunctionLogic,
    ) -> Result<PipelineResolver, TransformerError> {
        generate(type_name, field_name, logic, None, OperationKind::Subscription)
    }

    /// Register a resolver. There can only be one resolver per field.
    pub fn add_resolver(&mut self, resolver: PipelineResolver) -> Result<&mut PipelineResolver, TransformerError> {
        let key = (resolver.type_name().to_owned(), resolver.field_name().to_owned());

        match self.resolvers.entry(key) {
            indexmap::map::Entry::Occupied(entry) => {
                let (type_name, field_name) = entry.key();
                Err(TransformerError::invalid_directive(format!(
                    "A resolver for {type_name}.{field_name} already exists."
                )))
            }
            indexmap::map::Entry::Vacant(entry) => Ok(entry.insert(resolver)),
        }
    }

    pub fn get_resolver(&self, type_name: &str, field_name: &str) -> Option<&PipelineResolver> {
        self.resolvers.get(&(type_name.to_owned(), field_name.to_owned()))
    }

    pub fn get_resolver_mut(&mut self, type_name: &str, field_name: &str) -> Option<&mut PipelineResolver> {
        self.resolvers.get_mut(&(type_name.to_owned(), field_name.to_owned()))
    }

    pub fn has_resolver(&self, type_name: &str, field_name: &str) -> bool {
        self.get_resolver(type_name, field_name).is_some()
    }

    pub fn remove_resolver(&mut self, type_name: &str, field_name: &str) -> Option<PipelineResolver> {
        self.resolvers
            .shift_remove(&(type_name.to_owned(), field_name.to_owned()))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &PipelineResolver> {
        self.resolvers.values()
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

fn generate(
    type_name: &str,
    field_name: &str,
    logic: FunctionLogic,
    data_source: Option<&str>,
    operation: OperationKind,
) -> Result<PipelineResolver, TransformerError> {
    let resolver = PipelineResolver::new(type_name, field_name, logic, operation)?;

    Ok(match data_source {
        Some(data_source) => resolver.with_data_source(data_source),
        None => resolver,
    })
}
