use std::collections::HashMap;

use crate::{ApiConstruct, FunctionDefinition, FunctionId};

/// Collapses functions with identical logic bound to the same data source into one.
///
/// The cache lives for a single transformation.
#[derive(Debug, Default)]
pub struct FunctionDeduplicator {
    functions: HashMap<String, FunctionId>,
    disabled: bool,
}

impl FunctionDeduplicator {
    pub fn new(disabled: bool) -> Self {
        FunctionDeduplicator {
            functions: HashMap::new(),
            disabled,
        }
    }

    /// Register the function with the API, or return the existing function with the same content.
    ///
    /// On a hit the templates of the new definition are still bound to the existing function so
    /// that its named template files get written.
    pub fn add_function(&mut self, api: &mut dyn ApiConstruct, function: FunctionDefinition) -> FunctionId {
        let key = content_key(&function);

        if let Some(&id) = self.functions.get(&key).filter(|_| !self.disabled) {
            tracing::debug!("Reusing the function {id:?} for '{}'", function.name);
            api.bind_function_logic(id, &function);
            return id;
        }

        let id = api.add_function(function);
        self.functions.entry(key).or_insert(id);
        id
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

fn content_key(function: &FunctionDefinition) -> String {
    let request = blake3::hash(function.code.request_text().as_bytes());
    let response = blake3::hash(function.code.response_text().as_bytes());

    let mut hasher = blake3::Hasher::new();
    hasher.update(&function.data_source.len().to_ne_bytes());
    hasher.update(function.data_source.as_bytes());
    hasher.update(request.as_bytes());
    hasher.update(response.as_bytes());

    // A main function carrying conflict detection never shares a handle with a plain one.
    match &function.sync_config {
        Some(sync_config) => {
            hasher.update(&[1]);
            hasher.update(&serde_json::to_vec(sync_config).unwrap_or_default());
        }
        None => {
            hasher.update(&[0]);
        }
    }

    hex::encode(hasher.finalize().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConflictDetection, ConflictHandler, FunctionCode, GraphqlApi, SyncConfig};

    fn function(name: &str, data_source: &str, request: &str) -> FunctionDefinition {
        FunctionDefinition {
            name: name.to_owned(),
            data_source: data_source.to_owned(),
            code: FunctionCode::Templates {
                request: request.to_owned(),
                response: String::from("$util.toJson($ctx.prev.result)"),
            },
            assets: Vec::new(),
            sync_config: None,
        }
    }

    #[test]
    fn identical_content_shares_a_handle() {
        let mut api = GraphqlApi::default();
        let mut dedup = FunctionDeduplicator::new(false);

        let first = dedup.add_function(&mut api, function("QuerygetPostpreAuth0Function", "NONE_DS", "{}"));
        let second = dedup.add_function(&mut api, function("QuerylistPostspreAuth0Function", "NONE_DS", "{}"));
        let other_source = dedup.add_function(&mut api, function("QuerylistPostspreAuth1Function", "PostTable", "{}"));

        assert_eq!(first, second);
        assert_ne!(first, other_source);
        assert_eq!(api.functions().len(), 2);
        assert_eq!(dedup.len(), 2);
    }

    #[test]
    fn disabled_always_creates_a_function() {
        let mut api = GraphqlApi::default();
        let mut dedup = FunctionDeduplicator::new(true);

        let first = dedup.add_function(&mut api, function("a", "NONE_DS", "{}"));
        let second = dedup.add_function(&mut api, function("b", "NONE_DS", "{}"));

        assert_ne!(first, second);
        assert_eq!(api.functions().len(), 2);
    }

    #[test]
    fn sync_config_is_part_of_the_content() {
        let mut api = GraphqlApi::default();
        let mut dedup = FunctionDeduplicator::new(false);

        let slot = dedup.add_function(&mut api, function("QueryapreDataLoad0Function", "PostTable", "{}"));
        let main = dedup.add_function(
            &mut api,
            FunctionDefinition {
                sync_config: Some(SyncConfig::new(ConflictDetection::Version, ConflictHandler::Automerge)),
                ..function("QuerybDataResolverFn", "PostTable", "{}")
            },
        );

        assert_ne!(slot, main);
        assert_eq!(api.function(slot).unwrap().sync_config, None);
        assert_eq!(
            api.function(main).unwrap().sync_config,
            Some(SyncConfig::new(ConflictDetection::Version, ConflictHandler::Automerge))
        );
    }
}
