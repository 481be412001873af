//! Per-pass table of placeholders.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::{IntoResolved, Placeholder, PlaceholderId, Resolvable, ResolveCx, Resolved, ResolverFn};

/// Which sub-pass of the resolver a placeholder belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Tier {
    Normal,
    /// Runs after every normal placeholder has been substituted.
    Last,
}

impl Tier {
    #[inline]
    pub fn of(resolve_last: bool) -> Self {
        if resolve_last {
            Tier::Last
        } else {
            Tier::Normal
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tier::Normal => "normal",
            Tier::Last => "last",
        })
    }
}

pub(crate) struct Entry {
    pub(crate) tier: Tier,
    pub(crate) resolver: ResolverFn<Resolved>,
}

/// Allocates placeholder ids and keeps their type-erased resolvers.
///
/// Ids start at zero and are unique within one registry; a registry lives
/// for exactly one generation pass.
#[derive(Default)]
pub struct PlaceholderRegistry {
    entries: FxHashMap<PlaceholderId, Entry>,
    next: u32,
}

impl fmt::Debug for PlaceholderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaceholderRegistry")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl PlaceholderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: PlaceholderId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn tier(&self, id: PlaceholderId) -> Option<Tier> {
        self.entries.get(&id).map(|entry| entry.tier)
    }

    pub(crate) fn entry(&self, id: PlaceholderId) -> Option<&Entry> {
        self.entries.get(&id)
    }

    /// A normal-tier placeholder.
    pub fn placeholder<T, F>(&mut self, resolver: F) -> Placeholder<T>
    where
        T: IntoResolved + 'static,
        F: Fn(&mut ResolveCx<'_>) -> Option<T> + 'static,
    {
        self.register(Tier::Normal, resolver)
    }

    /// A placeholder resolved only after the normal tier reached its fixed
    /// point, e.g. the import block, which must see every import.
    pub fn placeholder_last<T, F>(&mut self, resolver: F) -> Placeholder<T>
    where
        T: IntoResolved + 'static,
        F: Fn(&mut ResolveCx<'_>) -> Option<T> + 'static,
    {
        self.register(Tier::Last, resolver)
    }

    fn register<T, F>(&mut self, tier: Tier, resolver: F) -> Placeholder<T>
    where
        T: IntoResolved + 'static,
        F: Fn(&mut ResolveCx<'_>) -> Option<T> + 'static,
    {
        let id = PlaceholderId::new(self.next);
        self.next += 1;

        let resolver: ResolverFn<T> = Rc::new(resolver);
        let erased = Rc::clone(&resolver);
        self.entries.insert(
            id,
            Entry {
                tier,
                resolver: Rc::new(move |cx: &mut ResolveCx<'_>| erased(cx).map(IntoResolved::into_resolved)),
            },
        );

        tracing::trace!(placeholder = %id, %tier, "registered placeholder");
        Placeholder {
            id,
            resolve_last: tier == Tier::Last,
            resolver,
        }
    }

    /// Probe once: `Now` when `probe` already has the value, otherwise a
    /// placeholder that probes again on every resolution attempt.
    pub fn from_value<T, F>(&mut self, probe: F) -> Resolvable<T>
    where
        T: IntoResolved + 'static,
        F: Fn() -> Option<T> + 'static,
    {
        match probe() {
            Some(value) => Resolvable::Now(value),
            None => Resolvable::Placeholder(self.placeholder(move |_cx: &mut ResolveCx<'_>| probe())),
        }
    }

    /// Like [`from_value`](Self::from_value) for suppliers that produce a
    /// resolvable themselves. The inner resolvable is flattened: it is
    /// returned as-is when available up front, and resolved in place later.
    pub fn from_resolvable<T, F>(&mut self, supplier: F) -> Resolvable<T>
    where
        T: IntoResolved + Clone + 'static,
        F: Fn() -> Option<Resolvable<T>> + 'static,
    {
        match supplier() {
            Some(resolvable) => resolvable,
            None => Resolvable::Placeholder(
                self.placeholder(move |cx: &mut ResolveCx<'_>| supplier()?.resolve(cx)),
            ),
        }
    }

    /// A placeholder computed from the value of `dependency`.
    pub fn dependent<D, T, F>(&mut self, dependency: &Resolvable<D>, f: F) -> Placeholder<T>
    where
        D: Clone + 'static,
        T: IntoResolved + 'static,
        F: Fn(D) -> T + 'static,
    {
        let dependency = dependency.clone();
        self.placeholder(move |cx: &mut ResolveCx<'_>| dependency.resolve(cx).map(&f))
    }

    /// A placeholder computed from the values of two resolvables.
    pub fn dependent2<A, B, T, F>(&mut self, first: &Resolvable<A>, second: &Resolvable<B>, f: F) -> Placeholder<T>
    where
        A: Clone + 'static,
        B: Clone + 'static,
        T: IntoResolved + 'static,
        F: Fn(A, B) -> T + 'static,
    {
        let first = first.clone();
        let second = second.clone();
        self.placeholder(move |cx: &mut ResolveCx<'_>| {
            let a = first.resolve(cx)?;
            let b = second.resolve(cx)?;
            Some(f(a, b))
        })
    }
}
