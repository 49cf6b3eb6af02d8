#![allow(unused_crate_dependencies)]

mod common;

use common::{CustomPlugin, ModelPlugin, Recorder, init_tracing, journal};
use graphql_transformer_core::{
    Directive, DirectiveSite, FieldDefinition, GraphqlTransform, PluginBand, TransformConfig, TransformerContext,
    TransformerError, TransformerLog, TransformerPlugin, Type,
};
use indoc::indoc;
use pretty_assertions::assert_eq;

fn transform(plugins: Vec<Box<dyn TransformerPlugin>>) -> GraphqlTransform {
    init_tracing();
    GraphqlTransform::new(plugins, TransformConfig::default()).unwrap()
}

#[test]
fn requires_at_least_one_plugin() {
    let err = GraphqlTransform::new(Vec::new(), TransformConfig::default()).err();
    assert!(matches!(err, Some(TransformerError::Configuration(_))));
}

#[test]
fn a_directive_belongs_to_a_single_plugin() {
    let journal = journal();
    let plugins: Vec<Box<dyn TransformerPlugin>> =
        vec![Box::new(Recorder::new("record", &journal)), Box::new(Recorder::new("record", &journal))];

    let err = GraphqlTransform::new(plugins, TransformConfig::default()).err();
    assert!(matches!(err, Some(TransformerError::Configuration(_))));
}

#[test]
fn plugins_run_by_band_in_stable_order() {
    let journal = journal();
    let transform = transform(vec![
        Box::new(Recorder::with_band("auth", PluginBand::Auth, &journal)),
        Box::new(Recorder::new("generic_b", &journal)),
        Box::new(Recorder::with_band("provider", PluginBand::DataSourceProvider, &journal)),
        Box::new(Recorder::new("generic_a", &journal)),
        Box::new(Recorder::with_band("enhancer", PluginBand::DataSourceEnhancer, &journal)),
    ]);

    assert_eq!(
        transform.plugin_names().collect::<Vec<_>>(),
        ["provider", "enhancer", "generic_b", "generic_a", "auth"]
    );
}

#[test]
fn hooks_run_in_phase_order() {
    let journal = journal();
    let mut transform = transform(vec![
        Box::new(Recorder::new("first", &journal)),
        Box::new(Recorder::new("second", &journal)),
    ]);

    let output = transform
        .transform(indoc! {r#"
            type Query {
              posts: [Post]
            }

            type Post @first @second(label: "a") {
              id: ID! @first
              title: String
            }
        "#})
        .unwrap();

    assert_eq!(
        journal.borrow().as_slice(),
        [
            "first.preValidateSchema",
            "second.preValidateSchema",
            "first.before",
            "second.before",
            "first.object(Post, -)",
            "first.field(Post.id, -)",
            "second.object(Post, a)",
            "first.validate",
            "second.validate",
            "first.prepare",
            "second.prepare",
            "first.transformSchema",
            "second.transformSchema",
            "first.generateResolvers",
            "second.generateResolvers",
            "second.after",
            "first.after",
        ]
    );

    assert_eq!(
        output.logs,
        [TransformerLog::info("first done"), TransformerLog::info("second done")]
    );
}

#[test]
fn every_kind_of_site_is_dispatched() {
    let journal = journal();
    let mut transform = transform(vec![Box::new(Recorder::new("record", &journal))]);

    transform
        .transform(indoc! {r#"
            scalar Date @record(label: "scalar")

            interface Node @record {
              id: ID!
            }

            type Query {
              posts(first: Int @record): [Post] @record(label: "list")
            }

            type Post implements Node {
              id: ID!
            }

            union Result @record = Post

            enum Status @record {
              DRAFT @record
              PUBLISHED
            }

            input PostInput @record {
              title: String @record
            }
        "#})
        .unwrap();

    let visits = journal
        .borrow()
        .iter()
        .filter(|entry| entry.contains('('))
        .cloned()
        .collect::<Vec<_>>();

    assert_eq!(
        visits,
        [
            "record.scalar(Date, scalar)",
            "record.interface(Node, -)",
            "record.field(Query.posts, list)",
            "record.argument(Query.posts.first, -)",
            "record.union(Result, -)",
            "record.enum(Status, -)",
            "record.enumValue(Status.DRAFT, -)",
            "record.input(PostInput, -)",
            "record.inputValue(PostInput.title, -)",
        ]
    );
}

#[test]
fn each_occurrence_is_visited_once_per_transformation() {
    let journal = journal();
    let mut transform = transform(vec![Box::new(Recorder::new("record", &journal))]);
    let sdl = indoc! {r#"
        type Post @record(label: "one") @record(label: "two") {
          id: ID! @record
        }
    "#};

    let visits = || {
        journal
            .borrow()
            .iter()
            .filter(|entry| entry.contains('('))
            .cloned()
            .collect::<Vec<_>>()
    };

    transform.transform(sdl).unwrap();
    assert_eq!(
        visits(),
        ["record.object(Post, one)", "record.object(Post, two)", "record.field(Post.id, -)"]
    );

    // Nothing is remembered from the previous run.
    transform.transform(sdl).unwrap();
    assert_eq!(visits().len(), 6);
}

#[test]
fn unknown_directives_fail_before_any_hook() {
    let journal = journal();
    let mut transform = transform(vec![Box::new(Recorder::new("record", &journal))]);

    let err = transform
        .transform("type Post @record { id: ID! @searchable }")
        .unwrap_err();

    assert!(matches!(&err, TransformerError::UnknownDirective { directive } if directive == "searchable"));
    assert!(journal.borrow().is_empty());
}

/// Declares fields as a valid location but only handles objects.
struct Searchable;

impl TransformerPlugin for Searchable {
    fn name(&self) -> &str {
        "searchable"
    }

    fn directive_definition(&self) -> &str {
        "directive @searchable on OBJECT | FIELD_DEFINITION"
    }

    fn visit(
        &mut self,
        _: &mut TransformerContext,
        site: DirectiveSite<'_>,
        _: &Directive,
    ) -> Result<(), TransformerError> {
        match site {
            DirectiveSite::Object(_) => Ok(()),
            _ => Err(site.unsupported(self.name())),
        }
    }
}

#[test]
fn unsupported_sites_are_reported_with_the_hook_name() {
    let mut transform = transform(vec![Box::new(Searchable)]);

    assert!(transform.transform("type Post @searchable { id: ID! }").is_ok());

    let err = transform
        .transform("type Post @searchable { id: ID! title: String @searchable }")
        .unwrap_err();

    assert!(matches!(
        &err,
        TransformerError::InvalidTransformer { transformer, method: "field" } if transformer == "searchable"
    ));
    insta::assert_snapshot!(err, @"The transformer 'searchable' must implement the 'field()' method");
}

#[test]
fn directives_on_object_extensions_are_rejected() {
    let journal = journal();
    let mut transform = transform(vec![Box::new(Recorder::new("record", &journal))]);

    let err = transform
        .transform(indoc! {"
            type Post {
              id: ID!
            }

            extend type Post @record
        "})
        .unwrap_err();

    insta::assert_snapshot!(err, @"Directives are not supported on object or interface extensions. See the '@record' directive on 'Post'");
}

#[test]
fn validation_errors_are_reported_together() {
    let mut transform = transform(vec![Box::new(ModelPlugin::default())]);

    let err = transform
        .transform(indoc! {r#"
            type Query {
              post: Missing
            }

            type Post @model(table: "posts") {
              id: ID!
            }
        "#})
        .unwrap_err();

    let TransformerError::SchemaValidation(validation) = &err else {
        unreachable!("expected a validation error, got {err}");
    };
    assert_eq!(validation.errors().len(), 2);

    insta::assert_snapshot!(err, @r#"
    Schema validation failed.

    Unknown type "Missing" referenced by "Query.post".

    Unknown argument "table" on directive "@model" ("Post").
    "#);
}

#[test]
fn api_schema_drops_plugin_directives() {
    let mut transform = transform(vec![Box::new(ModelPlugin::default())]);

    let output = transform
        .transform(indoc! {r#"
            type Post @model {
              id: ID!
              title: String @deprecated(reason: "use name")
            }
        "#})
        .unwrap();

    insta::assert_snapshot!(output.api.schema(), @r#"
    type Post {
      id: ID!
      title: String @deprecated(reason: "use name")
    }

    type Query {
      getPost(id: ID!): Post
    }
    "#);

    let post = output.schema.type_definition("Post").unwrap();
    assert_eq!(post.directives.len(), 1);
    assert_eq!(post.directives[0].name, "model");
}

/// Takes over the built-in `@auth` directive with its own arguments.
struct OwnerAuth;

impl TransformerPlugin for OwnerAuth {
    fn name(&self) -> &str {
        "owner_auth"
    }

    fn directive_definition(&self) -> &str {
        "directive @auth(rules: [String!]!) on OBJECT"
    }

    fn visit(
        &mut self,
        _: &mut TransformerContext,
        _: DirectiveSite<'_>,
        _: &Directive,
    ) -> Result<(), TransformerError> {
        Ok(())
    }
}

#[test]
fn plugin_directives_shadowing_builtins_are_dropped_too() {
    let mut transform = transform(vec![Box::new(OwnerAuth)]);

    let output = transform
        .transform(indoc! {r#"
            type Post @auth(rules: ["owner"]) {
              id: ID!
              title: String @deprecated
            }
        "#})
        .unwrap();

    insta::assert_snapshot!(output.api.schema(), @r#"
    type Post {
      id: ID!
      title: String @deprecated
    }
    "#);
}

#[test]
fn preprocessing_runs_the_schema_mutations() {
    let timestamps = CustomPlugin::new("timestamps").on_mutate_schema(|schema| {
        let models = schema
            .definitions
            .iter()
            .filter(|definition| definition.directives.iter().any(|directive| directive.name == "timestamps"))
            .map(|definition| definition.name.clone())
            .collect::<Vec<_>>();

        for model in models {
            schema.add_fields(&model, [FieldDefinition::new("createdAt", Type::named("AWSDateTime").non_null())])?;
        }

        Ok(())
    });

    let mut transform = transform(vec![Box::new(timestamps)]);

    let sdl = transform
        .preprocess_schema(indoc! {"
            type Post @timestamps {
              id: ID!
            }
        "})
        .unwrap();

    insta::assert_snapshot!(sdl, @r"
    type Post @timestamps {
      id: ID!
      createdAt: AWSDateTime!
    }
    ");
}
