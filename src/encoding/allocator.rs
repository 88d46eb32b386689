//! Signal name to DIMACS variable allocation

use std::collections::HashMap;

use crate::encoding::cnf::Var;

/// Dense, first-come mapping from signal names to variables
///
/// Ids start at 1 and grow by one per new name, so after `n` distinct
/// names the variables are exactly `1..=n`. Scoped to one compilation.
#[derive(Debug, Clone, Default)]
pub struct VariableAllocator {
    ids: HashMap<String, Var>,
    names: Vec<String>,
}

impl VariableAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variable for `name`, reserving the next id on first use
    pub fn allocate(&mut self, name: &str) -> Var {
        if let Some(&var) = self.ids.get(name) {
            return var;
        }
        let var = Var::from_index(self.names.len());
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), var);
        var
    }

    /// Variable previously allocated for `name`
    pub fn get(&self, name: &str) -> Option<Var> {
        self.ids.get(name).copied()
    }

    /// Signal name behind a variable
    pub fn name_of(&self, var: Var) -> Option<&str> {
        self.names.get(var.index()).map(String::as_str)
    }

    /// Number of distinct names allocated so far
    pub fn count(&self) -> u32 {
        self.names.len() as u32
    }

    /// `(name, var)` pairs in allocation order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Var)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), Var::from_index(i)))
    }
}
