use std::fmt;

/// Every failure a transformation can end with. All of them are fatal: a transformation either
/// fully succeeds or returns one of these.
#[derive(thiserror::Error, Debug)]
pub enum TransformerError {
    #[error("Invalid transformer configuration: {0}")]
    Configuration(String),
    #[error(
        "Unknown directive '{directive}'. Either remove the directive from the schema or add a transformer to handle it."
    )]
    UnknownDirective { directive: String },
    #[error(transparent)]
    SchemaValidation(#[from] SchemaValidationError),
    #[error("The transformer '{transformer}' must implement the '{method}()' method")]
    InvalidTransformer { transformer: String, method: &'static str },
    #[error("{0}")]
    InvalidDirective(String),
    #[error("Resolver {type_name}.{field_name} is missing slot {slot}")]
    MissingSlot {
        type_name: String,
        field_name: String,
        slot: String,
    },
}

impl TransformerError {
    pub fn invalid_directive(message: impl Into<String>) -> Self {
        TransformerError::InvalidDirective(message.into())
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        TransformerError::Configuration(message.into())
    }
}

/// All the violations found while validating the schema against the combined directive and type
/// vocabulary of the plugins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaValidationError {
    errors: Vec<String>,
}

impl SchemaValidationError {
    pub(crate) fn new(errors: Vec<String>) -> Self {
        SchemaValidationError { errors }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Schema validation failed.")?;

        for error in &self.errors {
            f.write_str("\n\n")?;
            f.write_str(error)?;
        }

        Ok(())
    }
}

impl std::error::Error for SchemaValidationError {}
