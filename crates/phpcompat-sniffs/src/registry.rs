//! Sniff trait and registry for the compatibility checks

use crate::options::SniffOptions;
use phpcompat_core::{Diagnostic, TokenStream};
use std::collections::HashSet;
use thiserror::Error;

/// Errors when selecting sniffs by name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown sniff '{0}'")]
    UnknownSniff(String),
}

/// A compatibility check over one file's token stream
pub trait Sniff: Send + Sync {
    /// The unique identifier for this sniff (e.g., "new_functions")
    fn name(&self) -> &'static str;

    /// A short description of what this sniff reports
    fn description(&self) -> &'static str;

    /// Check a token stream and return diagnostics
    fn check(&self, stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic>;
}

/// Registry of all available sniffs
pub struct SniffRegistry {
    sniffs: Vec<Box<dyn Sniff>>,
}

impl SniffRegistry {
    /// Create a new registry with all built-in sniffs
    pub fn new() -> Self {
        let mut registry = Self { sniffs: Vec::new() };

        registry.register(Box::new(crate::new_functions::NewFunctionsSniff));
        registry.register(Box::new(crate::removed_functions::RemovedFunctionsSniff));
        registry.register(Box::new(crate::removed_extensions::RemovedExtensionsSniff));
        registry.register(Box::new(crate::new_constants::NewConstantsSniff));
        registry.register(Box::new(crate::removed_constants::RemovedConstantsSniff));
        registry.register(Box::new(crate::new_interfaces::NewInterfacesSniff));
        registry.register(Box::new(crate::new_type_declarations::NewTypeDeclarationsSniff));
        registry.register(Box::new(crate::new_keywords::NewKeywordsSniff));
        registry.register(Box::new(crate::new_execution_directives::NewExecutionDirectivesSniff));
        registry.register(Box::new(crate::removed_ini_directives::RemovedIniDirectivesSniff));
        registry.register(Box::new(crate::removed_mbstring_modifiers::RemovedMbstringModifiersSniff));

        registry
    }

    /// Register a new sniff
    pub fn register(&mut self, sniff: Box<dyn Sniff>) {
        self.sniffs.push(sniff);
    }

    /// Get all sniff names
    pub fn all_names(&self) -> Vec<&'static str> {
        self.sniffs.iter().map(|s| s.name()).collect()
    }

    /// Check that every name refers to a registered sniff
    pub fn validate_names<'n, I>(&self, names: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = &'n String>,
    {
        let known = self.all_names();
        for name in names {
            if !known.contains(&name.as_str()) {
                return Err(RegistryError::UnknownSniff(name.clone()));
            }
        }
        Ok(())
    }

    /// Get sniffs filtered by enabled names
    pub fn get_enabled(&self, enabled: &HashSet<String>) -> Vec<&dyn Sniff> {
        self.sniffs
            .iter()
            .filter(|s| enabled.contains(s.name()))
            .map(|s| s.as_ref())
            .collect()
    }

    /// Get all sniffs with their descriptions (for --list-sniffs)
    pub fn list_sniffs(&self) -> Vec<(&'static str, &'static str)> {
        self.sniffs
            .iter()
            .map(|s| (s.name(), s.description()))
            .collect()
    }

    /// Run all enabled sniffs on a token stream
    ///
    /// Diagnostics come back ordered by position.
    pub fn check_all(
        &self,
        stream: &TokenStream,
        options: &SniffOptions,
        enabled: &HashSet<String>,
    ) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for sniff in self.get_enabled(enabled) {
            diagnostics.extend(sniff.check(stream, options));
        }
        diagnostics.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.code.cmp(&b.code)));
        diagnostics
    }
}

impl Default for SniffRegistry {
    fn default() -> Self {
        Self::new()
    }
}
