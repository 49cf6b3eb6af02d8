//! Per-node dispatch of directive occurrences to the plugin owning the directive.

use crate::{
    DirectiveSite, TransformerContext, TransformerError, TransformerPlugin,
    context::SeenTransformationKey,
    directives::directive_matches,
    schema::{DirectiveDefinition, Schema, TypeDefinition, TypeKind},
};

/// Walk every node of the input schema, in document order, and hand each occurrence of the
/// plugin's directive to it.
pub(super) fn dispatch(
    plugin: &mut dyn TransformerPlugin,
    definition: &DirectiveDefinition,
    input: &Schema,
    ctx: &mut TransformerContext,
) -> Result<(), TransformerError> {
    for type_definition in &input.definitions {
        visit_site(plugin, definition, ctx, type_site(type_definition))?;

        match &type_definition.kind {
            TypeKind::Object(object) | TypeKind::Interface(object) => {
                for field in &object.fields {
                    let site = DirectiveSite::Field {
                        parent: type_definition,
                        field,
                    };
                    visit_site(plugin, definition, ctx, site)?;

                    for argument in &field.arguments {
                        let site = DirectiveSite::Argument {
                            parent: type_definition,
                            field,
                            argument,
                        };
                        visit_site(plugin, definition, ctx, site)?;
                    }
                }
            }
            TypeKind::Enum(values) => {
                for value in values {
                    let site = DirectiveSite::EnumValue {
                        parent: type_definition,
                        value,
                    };
                    visit_site(plugin, definition, ctx, site)?;
                }
            }
            TypeKind::InputObject(fields) => {
                for field in fields {
                    let site = DirectiveSite::InputField {
                        parent: type_definition,
                        field,
                    };
                    visit_site(plugin, definition, ctx, site)?;
                }
            }
            TypeKind::Scalar | TypeKind::Union(_) => (),
        }
    }

    Ok(())
}

fn type_site(definition: &TypeDefinition) -> DirectiveSite<'_> {
    match definition.kind {
        TypeKind::Scalar => DirectiveSite::Scalar(definition),
        TypeKind::Object(_) => DirectiveSite::Object(definition),
        TypeKind::Interface(_) => DirectiveSite::Interface(definition),
        TypeKind::Union(_) => DirectiveSite::Union(definition),
        TypeKind::Enum(_) => DirectiveSite::Enum(definition),
        TypeKind::InputObject(_) => DirectiveSite::InputObject(definition),
    }
}

fn visit_site(
    plugin: &mut dyn TransformerPlugin,
    definition: &DirectiveDefinition,
    ctx: &mut TransformerContext,
    site: DirectiveSite<'_>,
) -> Result<(), TransformerError> {
    let occurrences = site
        .directives()
        .iter()
        .filter(|directive| directive.name == definition.name)
        .enumerate();

    for (ordinal, directive) in occurrences {
        if !directive_matches(definition, directive, &site)? {
            continue;
        }

        let key = SeenTransformationKey {
            directive: directive.name.clone(),
            type_name: site.type_name().to_owned(),
            field_name: site.field_name().map(str::to_owned),
            argument_name: site.argument_name().map(str::to_owned),
            ordinal,
        };

        if ctx.has_seen(&key) {
            continue;
        }

        tracing::trace!(
            "Invoking {}() of '{}' for @{} on {}",
            site.hook_name(),
            plugin.name(),
            directive.name,
            site.type_name()
        );

        plugin.visit(ctx, site, directive)?;
        ctx.mark_seen(key);
    }

    Ok(())
}
