//! The set of types a generated program must import.

use rustc_hash::FxHashSet;

use crate::{Type, Value};

/// Ordered, deduplicated set of required imports.
///
/// Types are stored by their [import target](Type::import_target) in first
/// registration order, so rendering is deterministic. Language exclusions
/// (`java.lang.String`, Kotlin's `Unit`, ...) are applied by the backend at
/// render time, not here.
#[derive(Clone, Debug, Default)]
pub struct ImportScope {
    order: Vec<Type>,
    seen: FxHashSet<Type>,
}

impl ImportScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type. Returns `true` if it was not registered before.
    pub fn import_type(&mut self, ty: &Type) -> bool {
        if !ty.should_import() {
            return false;
        }

        let target = ty.import_target();
        if self.seen.contains(target) {
            return false;
        }

        self.seen.insert(target.clone());
        self.order.push(target.clone());
        true
    }

    /// Register every import a value requires.
    pub fn import_value(&mut self, value: &Value) {
        for ty in value.imports() {
            self.import_type(ty);
        }
    }

    pub fn import_values<'a>(&mut self, values: impl IntoIterator<Item = &'a Value>) {
        for value in values {
            self.import_value(value);
        }
    }

    pub fn contains(&self, ty: &Type) -> bool {
        self.seen.contains(ty.import_target())
    }

    /// Registered types in registration order.
    pub fn types(&self) -> &[Type] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forget every type registered after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        for ty in self.order.drain(len.min(self.order.len())..) {
            self.seen.remove(&ty);
        }
    }
}
