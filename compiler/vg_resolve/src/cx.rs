//! Mutable state threaded through one resolution pass.

use std::ops::{Deref, DerefMut};

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use vg_ir::ImportScope;

use crate::{PlaceholderId, PlaceholderRegistry, Tier};

/// A placeholder found in flight while it was being resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cycle {
    /// The placeholder that was requested again.
    pub id: PlaceholderId,
    /// In-flight placeholders at detection time, outermost first.
    pub stack: Vec<PlaceholderId>,
}

impl Cycle {
    /// `a -> b -> a`
    pub fn path(&self) -> String {
        self.stack
            .iter()
            .chain(std::iter::once(&self.id))
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Context handed to every resolver closure.
///
/// Holds the registry (to look up other placeholders), the pass's import
/// scope (resolved values register their imports here), the tier being
/// swept, and the stack of placeholders currently being resolved.
pub struct ResolveCx<'a> {
    registry: &'a PlaceholderRegistry,
    imports: &'a mut ImportScope,
    tier: Tier,
    stack: SmallVec<[PlaceholderId; 8]>,
    cycles: Vec<Cycle>,
    /// Deferred placeholders asked for during the normal tier.
    deferred_requests: usize,
    /// Normal placeholders that gave up because of such a request; the
    /// deferred tier retries them.
    waiting: FxHashSet<PlaceholderId>,
}

impl<'a> ResolveCx<'a> {
    pub fn new(registry: &'a PlaceholderRegistry, imports: &'a mut ImportScope) -> Self {
        ResolveCx {
            registry,
            imports,
            tier: Tier::Normal,
            stack: SmallVec::new(),
            cycles: Vec::new(),
            deferred_requests: 0,
            waiting: FxHashSet::default(),
        }
    }

    #[inline]
    pub fn registry(&self) -> &'a PlaceholderRegistry {
        self.registry
    }

    #[inline]
    pub fn imports(&self) -> &ImportScope {
        &*self.imports
    }

    #[inline]
    pub fn imports_mut(&mut self) -> &mut ImportScope {
        &mut *self.imports
    }

    /// The tier currently being swept.
    #[inline]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub(crate) fn set_tier(&mut self, tier: Tier) {
        self.tier = tier;
    }

    pub(crate) fn deferred_requests(&self) -> usize {
        self.deferred_requests
    }

    pub(crate) fn note_deferred_request(&mut self, id: PlaceholderId) {
        tracing::debug!(placeholder = %id, "deferred placeholder requested during the normal tier");
        self.deferred_requests += 1;
    }

    pub(crate) fn wait_for_deferred(&mut self, id: PlaceholderId) {
        self.waiting.insert(id);
    }

    pub(crate) fn is_waiting_for_deferred(&self, id: PlaceholderId) -> bool {
        self.waiting.contains(&id)
    }

    pub fn is_in_flight(&self, id: PlaceholderId) -> bool {
        self.stack.contains(&id)
    }

    /// Placeholders currently being resolved, outermost first.
    pub fn in_flight(&self) -> &[PlaceholderId] {
        &self.stack
    }

    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub(crate) fn into_cycles(self) -> Vec<Cycle> {
        self.cycles
    }

    pub(crate) fn record_cycle(&mut self, id: PlaceholderId) {
        let cycle = Cycle {
            id,
            stack: self.stack.to_vec(),
        };
        tracing::warn!(
            placeholder = %id,
            path = %cycle.path(),
            "placeholder cycle detected, leaving marker unresolved"
        );
        self.cycles.push(cycle);
    }

    /// Mark `id` in flight until the returned guard is dropped.
    pub(crate) fn enter<'c>(&'c mut self, id: PlaceholderId) -> InFlight<'c, 'a> {
        self.stack.push(id);
        InFlight { cx: self }
    }
}

/// Pops its placeholder off the in-flight stack on drop, unwinding included.
pub(crate) struct InFlight<'c, 'a> {
    cx: &'c mut ResolveCx<'a>,
}

impl<'a> Deref for InFlight<'_, 'a> {
    type Target = ResolveCx<'a>;

    fn deref(&self) -> &ResolveCx<'a> {
        self.cx
    }
}

impl<'a> DerefMut for InFlight<'_, 'a> {
    fn deref_mut(&mut self) -> &mut ResolveCx<'a> {
        self.cx
    }
}

impl Drop for InFlight<'_, '_> {
    fn drop(&mut self) {
        self.cx.stack.pop();
    }
}
