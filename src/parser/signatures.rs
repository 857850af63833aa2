//! Function signature table
//!
//! Records, for every function defined so far, whether it returns a value.
//! The parser fills it in as each function header is recognized and consults
//! it to tell a call apart from a variable reference. Entries are never
//! removed or replaced.

use rustc_hash::FxHashMap;

use super::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub returns_value: bool,
    /// Line of the defining header
    pub line: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    entries: FxHashMap<String, FunctionSignature>,
    order: Vec<String>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a function header. Redefining a name is a fatal error and
    /// leaves the first entry untouched.
    pub fn declare(
        &mut self,
        name: &str,
        returns_value: bool,
        line: usize,
    ) -> Result<(), ParseError> {
        if let Some(existing) = self.entries.get(name) {
            return Err(ParseError::DuplicateFunction {
                name: name.to_string(),
                line,
                first_line: existing.line,
            });
        }

        tracing::debug!(name, returns_value, line, "recorded function signature");
        self.entries.insert(
            name.to_string(),
            FunctionSignature {
                name: name.to_string(),
                returns_value,
                line,
            },
        );
        self.order.push(name.to_string());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FunctionSignature> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn returns_value(&self, name: &str) -> Option<bool> {
        self.get(name).map(|sig| sig.returns_value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Signatures in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.order.iter().filter_map(|name| self.entries.get(name))
    }
}
