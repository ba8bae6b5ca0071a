//! Evaluation Context

use std::collections::HashMap;

/// Variable bindings, optionally nested inside a parent scope
///
/// Lookups walk from the receiver up through its ancestors. Writes always
/// land in the receiver, so a child can shadow a parent binding but never
/// change it. The parent is borrowed, which keeps the chain acyclic.
#[derive(Debug, Default)]
pub struct Context<'p> {
    variables: HashMap<String, f64>,
    parent: Option<&'p Context<'p>>,
}

impl<'p> Context<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variables(mut self, vars: HashMap<String, f64>) -> Self {
        self.variables = vars;
        self
    }

    /// Create a nested scope whose lookups fall back to `self`
    pub fn child(&self) -> Context<'_> {
        Context {
            variables: HashMap::new(),
            parent: Some(self),
        }
    }

    pub fn parent(&self) -> Option<&Context<'p>> {
        self.parent
    }

    pub fn get_variable(&self, name: &str) -> Option<f64> {
        let mut scope = Some(self);
        while let Some(ctx) = scope {
            if let Some(value) = ctx.variables.get(name) {
                return Some(*value);
            }
            scope = ctx.parent;
        }
        None
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: f64) {
        self.variables.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get_variable(name).is_some()
    }

    /// Bindings of this scope only, sorted by name
    pub fn local_variables(&self) -> Vec<(&str, f64)> {
        let mut vars: Vec<(&str, f64)> = self
            .variables
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();
        vars.sort_by(|a, b| a.0.cmp(b.0));
        vars
    }

    /// Number of ancestors above this scope
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.parent;
        while let Some(ctx) = scope {
            depth += 1;
            scope = ctx.parent;
        }
        depth
    }
}
