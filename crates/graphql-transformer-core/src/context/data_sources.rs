use indexmap::IndexMap;

use crate::{DataSource, TransformerError};

/// Data sources created by plugins, and the type each one backs.
#[derive(Debug, Clone, Default)]
pub struct DataSourceRegistry {
    data_sources: IndexMap<String, DataSource>,
    /// Type name to data source name.
    by_type: IndexMap<String, String>,
}

impl DataSourceRegistry {
    pub fn add(&mut self, data_source: DataSource) -> Result<(), TransformerError> {
        if self.data_sources.contains_key(&data_source.name) {
            return Err(TransformerError::invalid_directive(format!(
                "The data source '{}' already exists.",
                data_source.name
            )));
        }

        self.data_sources.insert(data_source.name.clone(), data_source);
        Ok(())
    }

    /// Register a data source as the one backing a type.
    pub fn add_for_type(&mut self, type_name: &str, data_source: DataSource) -> Result<(), TransformerError> {
        if let Some(existing) = self.by_type.get(type_name) {
            return Err(TransformerError::invalid_directive(format!(
                "The type '{type_name}' is already backed by the data source '{existing}'."
            )));
        }

        let name = data_source.name.clone();
        self.add(data_source)?;
        self.by_type.insert(type_name.to_owned(), name);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&DataSource> {
        self.data_sources.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.data_sources.contains_key(name)
    }

    pub fn for_type(&self, type_name: &str) -> Option<&DataSource> {
        self.by_type.get(type_name).and_then(|name| self.get(name))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &DataSource> {
        self.data_sources.values()
    }
}
