//! Pipeline resolvers: ordered slots of function units around the main logic of a field.

mod function_unit;
mod matching;
mod slot;
mod stash;

pub use self::{
    function_unit::{FunctionLogic, FunctionUnit, MappingTemplate},
    slot::{OperationKind, Slot},
    stash::StashPayload,
};

use std::collections::HashMap;

use crate::{
    ApiConstruct, DataSourceType, FunctionDefinition, FunctionId, NONE_DATA_SOURCE_NAME, ResolverDefinition,
    ResolverId, TransformerContext, TransformerError, sync_config::resolve_sync_config,
};

const WRAPPER_RESPONSE_TEMPLATE: &str = "$util.toJson($ctx.prev.result)";

/// The resolver of one field.
///
/// Plugins contribute [`FunctionUnit`]s to the slots declared for the operation of the field.
/// At synthesis every unit becomes a function, and the functions are chained as
/// `[request slots..., main, response slots...]`.
#[derive(Debug, Clone)]
pub struct PipelineResolver {
    type_name: String,
    field_name: String,
    logical_id: Option<String>,
    logic: FunctionLogic,
    data_source: Option<String>,
    request_slots: Vec<Slot>,
    response_slots: Vec<Slot>,
    slots: HashMap<Slot, Vec<FunctionUnit>>,
}

impl PipelineResolver {
    pub fn new(
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        logic: FunctionLogic,
        operation: OperationKind,
    ) -> Result<Self, TransformerError> {
        Self::with_slots(
            type_name,
            field_name,
            logic,
            operation.request_slots().to_vec(),
            operation.response_slots().to_vec(),
        )
    }

    /// A resolver with a custom slot layout.
    pub fn with_slots(
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        logic: FunctionLogic,
        request_slots: Vec<Slot>,
        response_slots: Vec<Slot>,
    ) -> Result<Self, TransformerError> {
        let type_name = type_name.into();
        let field_name = field_name.into();

        if type_name.is_empty() || field_name.is_empty() {
            return Err(TransformerError::invalid_directive(
                "A resolver needs both a type name and a field name.",
            ));
        }

        if !logic.is_complete() {
            return Err(TransformerError::invalid_directive(format!(
                "The resolver {type_name}.{field_name} needs either code or both a request and a response template."
            )));
        }

        Ok(PipelineResolver {
            type_name,
            field_name,
            logical_id: None,
            logic,
            data_source: None,
            request_slots,
            response_slots,
            slots: HashMap::new(),
        })
    }

    #[must_use]
    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = Some(data_source.into());
        self
    }

    #[must_use]
    pub fn with_logical_id(mut self, logical_id: impl Into<String>) -> Self {
        self.logical_id = Some(logical_id.into());
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn logic(&self) -> &FunctionLogic {
        &self.logic
    }

    pub fn data_source(&self) -> Option<&str> {
        self.data_source.as_deref()
    }

    pub fn set_data_source(&mut self, data_source: impl Into<String>) {
        self.data_source = Some(data_source.into());
    }

    /// Replace the main logic of the resolver.
    pub fn set_logic(&mut self, logic: FunctionLogic) -> Result<(), TransformerError> {
        if !logic.is_complete() {
            return Err(TransformerError::invalid_directive(format!(
                "The resolver {}.{} needs either code or both a request and a response template.",
                self.type_name, self.field_name
            )));
        }

        self.logic = logic;
        Ok(())
    }

    pub fn request_slots(&self) -> &[Slot] {
        &self.request_slots
    }

    pub fn response_slots(&self) -> &[Slot] {
        &self.response_slots
    }

    /// The units of a slot, in pipeline order.
    pub fn slot(&self, slot: Slot) -> &[FunctionUnit] {
        self.slots.get(&slot).map(Vec::as_slice).unwrap_or_default()
    }

    /// Add a template pair to a slot. Either half may be omitted.
    pub fn add_to_slot(
        &mut self,
        slot: impl AsRef<str>,
        request: Option<MappingTemplate>,
        response: Option<MappingTemplate>,
        data_source: Option<String>,
    ) -> Result<(), TransformerError> {
        let unit = FunctionUnit {
            data_source,
            ..FunctionUnit::templates(request, response)
        };

        self.add_to_slot_with_strategy(slot, unit)
    }

    /// Add a unit to a slot. A unit recognized as an override of an existing one is merged into
    /// it, otherwise it is appended.
    pub fn add_to_slot_with_strategy(
        &mut self,
        slot: impl AsRef<str>,
        unit: FunctionUnit,
    ) -> Result<(), TransformerError> {
        let slot = self.declared_slot(slot.as_ref())?;
        let units = self.slots.entry(slot).or_default();

        match matching::find_override(units, &unit, slot.as_str()) {
            Some(idx) => {
                tracing::trace!("Overriding unit {idx} of {}.{} {slot}", self.type_name, self.field_name);
                units[idx].merge(unit);
            }
            None => units.push(unit),
        }

        Ok(())
    }

    fn declared_slot(&self, name: &str) -> Result<Slot, TransformerError> {
        name.parse::<Slot>()
            .ok()
            .filter(|slot| self.request_slots.contains(slot) || self.response_slots.contains(slot))
            .ok_or_else(|| TransformerError::MissingSlot {
                type_name: self.type_name.clone(),
                field_name: self.field_name.clone(),
                slot: name.to_owned(),
            })
    }

    /// Emit the functions and the pipeline resolver into the API.
    pub fn synthesize(
        &self,
        ctx: &mut TransformerContext,
        api: &mut dyn ApiConstruct,
    ) -> Result<ResolverId, TransformerError> {
        if !api.has_data_source(NONE_DATA_SOURCE_NAME) {
            api.add_none_data_source(NONE_DATA_SOURCE_NAME);
        }

        let mut pipeline_function_ids = self.synthesize_slots(&self.request_slots, ctx, api)?;

        let data_source_name = self.data_source.as_deref().unwrap_or(NONE_DATA_SOURCE_NAME);
        let data_source = api.data_source(data_source_name).cloned().ok_or_else(|| {
            TransformerError::invalid_directive(format!(
                "The data source '{data_source_name}' of the resolver {}.{} does not exist.",
                self.type_name, self.field_name
            ))
        })?;

        let sync_config = match data_source.ty() {
            DataSourceType::AmazonDynamodb => {
                resolve_sync_config(ctx.resolver_config(), ctx.synth_parameters(), &self.type_name)
            }
            _ => None,
        };

        let (code, assets) = self.logic.realize("", 0);
        let main = FunctionDefinition {
            name: format!("{}{}DataResolverFn", self.type_name, self.field_name),
            data_source: data_source.name.clone(),
            code,
            assets,
            sync_config,
        };
        pipeline_function_ids.push(ctx.dedup_mut().add_function(api, main));

        pipeline_function_ids.extend(self.synthesize_slots(&self.response_slots, ctx, api)?);

        let stash = StashPayload::new(
            &self.type_name,
            &self.field_name,
            Some(&data_source),
            ctx.synth_parameters(),
            ctx.auth_config(),
        );

        tracing::debug!(
            "Synthesized {}.{} with {} functions",
            self.type_name,
            self.field_name,
            pipeline_function_ids.len()
        );

        Ok(api.create_resolver(ResolverDefinition {
            type_name: self.type_name.clone(),
            field_name: self.field_name.clone(),
            logical_id: self.logical_id.clone(),
            request_template: stash.render_template(),
            response_template: WRAPPER_RESPONSE_TEMPLATE.to_owned(),
            data_source: None,
            pipeline_function_ids,
            stash: Some(stash.to_json()),
        }))
    }

    fn synthesize_slots(
        &self,
        slots: &[Slot],
        ctx: &mut TransformerContext,
        api: &mut dyn ApiConstruct,
    ) -> Result<Vec<FunctionId>, TransformerError> {
        let mut ids = Vec::new();

        for slot in slots {
            for (idx, unit) in self.slot(*slot).iter().enumerate() {
                let data_source = unit.data_source.as_deref().unwrap_or(NONE_DATA_SOURCE_NAME);

                if !api.has_data_source(data_source) {
                    return Err(TransformerError::invalid_directive(format!(
                        "The data source '{data_source}' used in the {slot} slot of {}.{} does not exist.",
                        self.type_name, self.field_name
                    )));
                }

                let (code, assets) = unit.logic.realize(slot.as_str(), idx + 1);
                let function = FunctionDefinition {
                    name: format!("{}{}{slot}{idx}Function", self.type_name, self.field_name),
                    data_source: data_source.to_owned(),
                    code,
                    assets,
                    sync_config: None,
                };

                ids.push(ctx.dedup_mut().add_function(api, function));
            }
        }

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_resolver() -> PipelineResolver {
        PipelineResolver::new(
            "Query",
            "getPost",
            FunctionLogic::templates(MappingTemplate::inline("{}"), MappingTemplate::inline("{}")),
            OperationKind::Query,
        )
        .unwrap()
    }

    #[test]
    fn construction_needs_names_and_complete_logic() {
        let logic = FunctionLogic::templates(MappingTemplate::inline("{}"), MappingTemplate::inline("{}"));
        let err = PipelineResolver::new("", "getPost", logic, OperationKind::Query).unwrap_err();
        assert!(matches!(err, TransformerError::InvalidDirective(_)));

        let half = FunctionLogic::Templates {
            request: Some(MappingTemplate::inline("{}")),
            response: None,
        };
        let err = PipelineResolver::new("Query", "getPost", half, OperationKind::Query).unwrap_err();
        assert!(matches!(err, TransformerError::InvalidDirective(_)));

        let code = FunctionLogic::Code {
            name: None,
            code: String::from("export function request() {}"),
        };
        assert!(PipelineResolver::new("Query", "getPost", code, OperationKind::Query).is_ok());
    }

    #[test]
    fn slots_follow_the_operation() {
        let mut resolver = query_resolver();

        assert!(resolver.add_to_slot(Slot::PreDataLoad, None, None, None).is_ok());

        let err = resolver.add_to_slot(Slot::PreUpdate, None, None, None).unwrap_err();
        assert!(matches!(err, TransformerError::MissingSlot { ref slot, .. } if slot == "preUpdate"));

        let err = resolver.add_to_slot("unknown", None, None, None).unwrap_err();
        assert!(matches!(err, TransformerError::MissingSlot { .. }));
    }

    #[test]
    fn named_units_override_while_inline_units_append() {
        let mut resolver = query_resolver();

        for _ in 0..2 {
            resolver
                .add_to_slot(
                    Slot::Auth,
                    Some(MappingTemplate::inline("## auth")),
                    Some(MappingTemplate::inline("{}")),
                    None,
                )
                .unwrap();
        }
        assert_eq!(resolver.slot(Slot::Auth).len(), 2);

        let mut resolver = query_resolver();
        for content in ["first", "second"] {
            resolver
                .add_to_slot(
                    Slot::Auth,
                    Some(MappingTemplate::named("Query.getPost.auth.1.req.vtl", content)),
                    None,
                    None,
                )
                .unwrap();
        }
        assert_eq!(resolver.slot(Slot::Auth).len(), 1);
    }

    #[test]
    fn replaced_logic_is_synthesized_under_the_chosen_logical_id() {
        let mut resolver = query_resolver().with_logical_id("PostLookup");

        let half = FunctionLogic::Templates {
            request: None,
            response: Some(MappingTemplate::inline("{}")),
        };
        assert!(matches!(resolver.set_logic(half), Err(TransformerError::InvalidDirective(_))));

        let code = FunctionLogic::Code {
            name: None,
            code: String::from("export function request() {}"),
        };
        resolver.set_logic(code).unwrap();

        let schema = crate::Schema::parse("type Query { getPost: String }").unwrap();
        let mut ctx = TransformerContext::new(schema, &crate::TransformConfig::default());
        let mut api = crate::GraphqlApi::default();
        resolver.synthesize(&mut ctx, &mut api).unwrap();

        let record = api.resolver("Query", "getPost").unwrap();
        assert_eq!(record.logical_id, "PostLookup");
        assert_eq!(api.pipeline_function_names("Query", "getPost"), ["QuerygetPostDataResolverFn"]);

        let main = api.function(record.pipeline_function_ids[0]).unwrap();
        assert_eq!(main.data_source, NONE_DATA_SOURCE_NAME);
        assert_eq!(
            main.logic,
            crate::FunctionCode::Code {
                code: String::from("export function request() {}")
            }
        );
    }
}
