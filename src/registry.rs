//! Function registry and the fold gate built on top of it.
//!
//! The registry answers a single question: is a function identifier known
//! to the relational backend? The partial evaluator only attempts constant
//! folding for calls whose identifier passes the [`FunctionGate`].

use crate::expression::Operator;
use dashmap::DashSet;

/// Comparison operators that are always foldable, whatever the registry holds.
pub const BUILTIN_COMPARISON_OPS: [&str; 6] = ["<=", "<", "=", "!=", ">", ">="];

/// Read-only lookup of function identifiers.
pub trait FunctionLookup: Send + Sync {
    fn lookup(&self, name: &str) -> bool;
}

/// Concurrent set of registered function identifiers
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: DashSet<String>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every non-comparison operator the built-in
    /// constant evaluator implements
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        for op in Operator::ALL.iter().filter(|op| !op.is_comparison()) {
            registry.register(op.as_str());
        }
        registry
    }

    /// Register a function identifier. Returns false if it was already present.
    pub fn register(&self, name: impl Into<String>) -> bool {
        self.functions.insert(name.into())
    }

    /// Remove a function identifier. Returns false if it was not present.
    pub fn unregister(&self, name: &str) -> bool {
        self.functions.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered identifiers in sorted order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .functions
            .iter()
            .map(|name| name.key().clone())
            .collect();
        names.sort();
        names
    }
}

impl FunctionLookup for FunctionRegistry {
    fn lookup(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<S: Into<String>> FromIterator<S> for FunctionRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(names: I) -> Self {
        let registry = Self::new();
        for name in names {
            registry.register(name);
        }
        registry
    }
}

/// Decides whether a function identifier is eligible for constant folding.
#[derive(Clone, Copy)]
pub struct FunctionGate<'a> {
    lookup: &'a dyn FunctionLookup,
}

impl<'a> FunctionGate<'a> {
    pub fn new(lookup: &'a dyn FunctionLookup) -> Self {
        Self { lookup }
    }

    /// Built-in comparison operators are always known; other identifiers are
    /// looked up. Matching is exact.
    pub fn is_known(&self, name: &str) -> bool {
        BUILTIN_COMPARISON_OPS.iter().any(|op| *op == name) || self.lookup.lookup(name)
    }

    /// Calls without an identifier are structural and always admitted.
    pub fn admits(&self, name: Option<&str>) -> bool {
        match name {
            None | Some("") => true,
            Some(name) => self.is_known(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_registration() {
        let registry = FunctionRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.register("http://ex.org/fn#upper"));
        assert!(!registry.register("http://ex.org/fn#upper"));
        assert!(registry.contains("http://ex.org/fn#upper"));
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister("http://ex.org/fn#upper"));
        assert!(!registry.unregister("http://ex.org/fn#upper"));
        assert!(!registry.contains("http://ex.org/fn#upper"));
    }

    #[test]
    fn test_with_builtins() {
        let registry = FunctionRegistry::with_builtins();
        assert!(registry.contains("concat"));
        assert!(registry.contains("&&"));
        assert!(registry.contains("str"));

        // Comparisons are handled by the gate, not the registry
        assert!(!registry.contains("="));
        assert_eq!(registry.len(), Operator::ALL.len() - BUILTIN_COMPARISON_OPS.len());
    }

    #[test]
    fn test_names_sorted() {
        let registry = ["b", "a", "c"].into_iter().collect::<FunctionRegistry>();
        assert_eq!(registry.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_gate_builtin_comparisons() {
        let registry = FunctionRegistry::new();
        let gate = FunctionGate::new(&registry);

        for op in BUILTIN_COMPARISON_OPS {
            assert!(gate.is_known(op));
        }
        assert!(!gate.is_known("concat"));
        assert!(!gate.is_known("unknownFn"));
    }

    #[test]
    fn test_gate_exact_match() {
        let registry = ["concat"].into_iter().collect::<FunctionRegistry>();
        let gate = FunctionGate::new(&registry);

        assert!(gate.is_known("concat"));
        assert!(!gate.is_known("CONCAT"));
        assert!(!gate.is_known(" concat"));
    }

    #[test]
    fn test_gate_admits_structural_calls() {
        let registry = FunctionRegistry::new();
        let gate = FunctionGate::new(&registry);

        assert!(gate.admits(None));
        assert!(gate.admits(Some("")));
        assert!(gate.admits(Some(">=")));
        assert!(!gate.admits(Some("unknownFn")));
    }

    #[test]
    fn test_concurrent_lookup() {
        let registry = Arc::new(FunctionRegistry::with_builtins());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = registry.clone();
                thread::spawn(move || {
                    registry.register(format!("fn{}", i));
                    let gate = FunctionGate::new(registry.as_ref());
                    gate.is_known("concat") && gate.is_known(&format!("fn{}", i))
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert!(registry.contains("fn3"));
    }
}
