use crate::{FunctionCode, TemplateAsset};

pub(crate) const DEFAULT_REQUEST_TEMPLATE: &str = "$util.toJson({})";
pub(crate) const DEFAULT_RESPONSE_TEMPLATE: &str = "$util.toJson({})";

/// A resolver template, either written inline or backed by a named file that users can override.
///
/// Names may contain the `{slotName}` and `{slotIndex}` placeholders, which are substituted once
/// the position of the unit in its slot is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingTemplate {
    Inline(String),
    Named { name: String, content: String },
}

impl MappingTemplate {
    pub fn inline(content: impl Into<String>) -> Self {
        MappingTemplate::Inline(content.into())
    }

    pub fn named(name: impl Into<String>, content: impl Into<String>) -> Self {
        MappingTemplate::Named {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            MappingTemplate::Inline(_) => None,
            MappingTemplate::Named { name, .. } => Some(name),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            MappingTemplate::Inline(content) | MappingTemplate::Named { content, .. } => content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionLogic {
    /// A request/response template pair. Either half may be missing in a slot unit.
    Templates {
        request: Option<MappingTemplate>,
        response: Option<MappingTemplate>,
    },
    /// A single code block handling both the request and the response.
    Code { name: Option<String>, code: String },
}

impl FunctionLogic {
    pub fn templates(request: MappingTemplate, response: MappingTemplate) -> Self {
        FunctionLogic::Templates {
            request: Some(request),
            response: Some(response),
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, FunctionLogic::Code { .. })
    }

    /// A main resolver needs both halves, or code.
    pub(crate) fn is_complete(&self) -> bool {
        match self {
            FunctionLogic::Templates { request, response } => request.is_some() && response.is_some(),
            FunctionLogic::Code { .. } => true,
        }
    }

    /// The names identifying this logic, request first.
    pub(crate) fn names(&self) -> [Option<&str>; 2] {
        match self {
            FunctionLogic::Templates { request, response } => [
                request.as_ref().and_then(MappingTemplate::name),
                response.as_ref().and_then(MappingTemplate::name),
            ],
            FunctionLogic::Code { name, .. } => [name.as_deref(), None],
        }
    }

    /// Resolve the logic to its content, substituting the placeholders of the named templates.
    pub(crate) fn realize(&self, slot_name: &str, slot_index: usize) -> (FunctionCode, Vec<TemplateAsset>) {
        let mut assets = Vec::new();
        let mut bind = |name: Option<&str>, content: &str| {
            if let Some(name) = name {
                assets.push(TemplateAsset {
                    name: substitute_placeholders(name, slot_name, slot_index),
                    content: content.to_owned(),
                });
            }
        };

        let code = match self {
            FunctionLogic::Templates { request, response } => {
                let request = request.as_ref().map_or(DEFAULT_REQUEST_TEMPLATE, MappingTemplate::content);
                let response = response.as_ref().map_or(DEFAULT_RESPONSE_TEMPLATE, MappingTemplate::content);
                let [request_name, response_name] = self.names();
                bind(request_name, request);
                bind(response_name, response);

                FunctionCode::Templates {
                    request: request.to_owned(),
                    response: response.to_owned(),
                }
            }
            FunctionLogic::Code { name, code } => {
                bind(name.as_deref(), code);
                FunctionCode::Code { code: code.clone() }
            }
        };

        (code, assets)
    }
}

pub(crate) fn substitute_placeholders(name: &str, slot_name: &str, slot_index: usize) -> String {
    name.replace("{slotName}", slot_name)
        .replace("{slotIndex}", &slot_index.to_string())
}

/// One contribution to a slot of a pipeline resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionUnit {
    pub logic: FunctionLogic,
    /// The data source of the function. Falls back to the `NONE` data source.
    pub data_source: Option<String>,
    /// Stable identity of the unit. When both units carry one, overrides are matched on it
    /// instead of on template names.
    pub key: Option<String>,
}

impl FunctionUnit {
    pub fn new(logic: FunctionLogic) -> Self {
        FunctionUnit {
            logic,
            data_source: None,
            key: None,
        }
    }

    pub fn templates(request: Option<MappingTemplate>, response: Option<MappingTemplate>) -> Self {
        FunctionUnit::new(FunctionLogic::Templates { request, response })
    }

    pub fn code(name: Option<String>, code: impl Into<String>) -> Self {
        FunctionUnit::new(FunctionLogic::Code {
            name,
            code: code.into(),
        })
    }

    #[must_use]
    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = Some(data_source.into());
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Apply an override on top of this unit.
    ///
    /// Template halves are replaced independently. Code on either side replaces the whole logic.
    pub(crate) fn merge(&mut self, incoming: FunctionUnit) {
        let FunctionUnit { logic, data_source, key } = incoming;

        match (&mut self.logic, logic) {
            (
                FunctionLogic::Templates { request, response },
                FunctionLogic::Templates {
                    request: incoming_request,
                    response: incoming_response,
                },
            ) => {
                if incoming_request.is_some() {
                    *request = incoming_request;
                }
                if incoming_response.is_some() {
                    *response = incoming_response;
                }
            }
            (current, logic) => *current = logic,
        }

        if data_source.is_some() {
            self.data_source = data_source;
        }

        if key.is_some() {
            self.key = key;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realizing_defaults_missing_halves_and_binds_named_templates() {
        let logic = FunctionLogic::Templates {
            request: Some(MappingTemplate::named("Query.getPost.{slotName}.{slotIndex}.req.vtl", "## auth")),
            response: None,
        };

        let (code, assets) = logic.realize("auth", 2);

        assert_eq!(
            code,
            FunctionCode::Templates {
                request: String::from("## auth"),
                response: String::from(DEFAULT_RESPONSE_TEMPLATE),
            }
        );
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].name, "Query.getPost.auth.2.req.vtl");
    }

    #[test]
    fn merging_replaces_template_halves_independently() {
        let mut unit = FunctionUnit::templates(
            Some(MappingTemplate::named("a.req.vtl", "request")),
            Some(MappingTemplate::named("a.res.vtl", "response")),
        );

        unit.merge(FunctionUnit::templates(Some(MappingTemplate::named("a.req.vtl", "override")), None));

        let FunctionLogic::Templates { request, response } = &unit.logic else {
            unreachable!("templates stay templates");
        };
        assert_eq!(request.as_ref().map(MappingTemplate::content), Some("override"));
        assert_eq!(response.as_ref().map(MappingTemplate::content), Some("response"));

        let code = FunctionUnit::code(Some(String::from("a.js")), "export function request() {}");
        unit.merge(code.with_data_source("PostTable"));
        assert!(unit.logic.is_code());
        assert_eq!(unit.data_source.as_deref(), Some("PostTable"));
    }
}
