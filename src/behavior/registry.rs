//! Name-to-factory table for behaviors built from scene files and the
//! inspector.

use std::collections::BTreeMap;

use serde_json::Value;

use super::builtin::{FlyCamera, Spin};
use super::traits::{Behavior, BehaviorKind};
use crate::errors::{CairnError, Result};

/// Builds a behavior from its stored constructor arguments.
pub type BehaviorFactory = fn(&[Value]) -> Result<Box<dyn Behavior>>;

#[derive(Default)]
pub struct BehaviorRegistry {
    factories: BTreeMap<&'static str, BehaviorFactory>,
}

impl BehaviorRegistry {
    /// Registry with nothing in it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the behaviors that ship with the crate.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(FlyCamera::KIND, FlyCamera::from_args);
        registry.register(Spin::KIND, Spin::from_args);
        registry
    }

    /// Adds or replaces the factory for `kind`.
    pub fn register(&mut self, kind: BehaviorKind, factory: BehaviorFactory) {
        if self.factories.insert(kind.name(), factory).is_some() {
            log::warn!("Replaced behavior factory for {}", kind);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered kind names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Builds the behavior registered as `name`.
    pub fn create(&self, name: &str, args: &[Value]) -> Result<Box<dyn Behavior>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| CairnError::UnknownBehavior(name.to_string()))?;
        factory(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtins_are_registered() {
        let registry = BehaviorRegistry::with_builtins();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["FlyCamera", "Spin"]);

        let spin = registry.create("Spin", &[json!(1.0)]).unwrap();
        assert_eq!(spin.kind(), Spin::KIND);
        assert_eq!(spin.args(), vec![json!(1.0), json!(0.0), json!(1.0)]);
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let registry = BehaviorRegistry::with_builtins();
        assert!(matches!(
            registry.create("Teleport", &[]),
            Err(CairnError::UnknownBehavior(name)) if name == "Teleport"
        ));
        assert!(!BehaviorRegistry::new().contains("Spin"));
    }
}
