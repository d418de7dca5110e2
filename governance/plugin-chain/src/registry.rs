//! Registry of the plugins known to the client, keyed by name

use {
    crate::{
        config::PluginChainConfig,
        error::{PluginChainError, PluginChainResult},
        weight::PluginDescriptor,
    },
    std::collections::{HashMap, HashSet},
};

/// Maps plugin names to their descriptors and assembles ordered chains from names
#[derive(Clone, Debug, Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, PluginDescriptor>,
}

impl PluginRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the plugin under its name
    pub fn register(&mut self, plugin: PluginDescriptor) -> PluginChainResult<()> {
        if self.plugins.contains_key(&plugin.name) {
            return Err(PluginChainError::DuplicatePlugin(plugin.name));
        }

        self.plugins.insert(plugin.name.clone(), plugin);
        Ok(())
    }

    /// Returns the plugin registered under the name
    pub fn get(&self, name: &str) -> Option<&PluginDescriptor> {
        self.plugins.get(name)
    }

    /// Returns the number of registered plugins
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if no plugin is registered
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Returns the plugins for the given names in the same order
    /// A name may appear only once in a chain
    pub fn resolve_chain<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> PluginChainResult<Vec<PluginDescriptor>> {
        let mut seen = HashSet::new();

        names
            .iter()
            .map(|name| {
                let name = name.as_ref();

                if !seen.insert(name) {
                    return Err(PluginChainError::DuplicatePlugin(name.to_string()));
                }

                self.get(name)
                    .cloned()
                    .ok_or_else(|| PluginChainError::UnknownPlugin(name.to_string()))
            })
            .collect()
    }

    /// Returns the chain listed in the config
    pub fn resolve_configured_chain(
        &self,
        config: &PluginChainConfig,
    ) -> PluginChainResult<Vec<PluginDescriptor>> {
        self.resolve_chain(config.plugins.as_slice())
    }
}
