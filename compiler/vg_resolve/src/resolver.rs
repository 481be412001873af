//! The placeholder resolution pass.
//!
//! Rewrites every marker in a generated program into its final text. The
//! pass runs in two tiers: normal placeholders first, then the `resolve_last`
//! ones over the output of the first tier. Normal markers that gave up
//! because they read a `resolve_last` value are retried in the second. Each tier sweeps the text left to right,
//! substituting every marker whose resolver yields a value, and repeats
//! until a sweep changes nothing.
//!
//! A marker left unexpanded registers no imports: whatever its resolution
//! attempt registered is rolled back.
//!
//! Resolution is never memoized: a marker that appears three times invokes
//! its resolver three times per sweep. Resolvers are expected to be cheap
//! and free of side effects beyond import registration.

use vg_ir::ImportScope;

use crate::marker::{self, Segment};
use crate::stack::ensure_sufficient_stack;
use crate::{Cycle, PlaceholderId, PlaceholderRegistry, ResolveCx, Tier};

/// Sweeps per tier before giving up on reaching a fixed point.
pub const MAX_SWEEPS: usize = 64;

/// Outcome of a resolution pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    /// Ids of markers that survived both tiers, in order of appearance.
    pub unresolved: Vec<PlaceholderId>,
    pub cycles: Vec<Cycle>,
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Result of a single sweep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sweep {
    pub text: String,
    /// Whether at least one marker was substituted.
    pub changed: bool,
}

pub struct PlaceholderResolver<'a> {
    registry: &'a PlaceholderRegistry,
}

impl<'a> PlaceholderResolver<'a> {
    pub fn new(registry: &'a PlaceholderRegistry) -> Self {
        PlaceholderResolver { registry }
    }

    /// Resolve every marker in `text`, registering the imports of
    /// substituted values on `imports`.
    #[tracing::instrument(level = "debug", skip_all, fields(placeholders = self.registry.len()))]
    pub fn resolve(&self, text: &str, imports: &mut ImportScope) -> Resolution {
        let mut cx = ResolveCx::new(self.registry, imports);

        let text = self.sub_pass(text, &mut cx, Tier::Normal);
        let text = self.sub_pass(&text, &mut cx, Tier::Last);

        let unresolved: Vec<PlaceholderId> = marker::marker_ids(&text).collect();
        if !unresolved.is_empty() {
            tracing::warn!(
                count = unresolved.len(),
                first = %unresolved[0],
                "placeholder markers left in generated source"
            );
        }

        Resolution {
            text,
            unresolved,
            cycles: cx.into_cycles(),
        }
    }

    /// Sweep until nothing changes or [`MAX_SWEEPS`] is reached.
    fn sub_pass(&self, text: &str, cx: &mut ResolveCx<'_>, tier: Tier) -> String {
        let mut current = text.to_string();
        for sweep in 1..=MAX_SWEEPS {
            let Sweep { text, changed } = self.sweep(&current, cx, tier);
            current = text;
            if !changed {
                tracing::debug!(%tier, sweeps = sweep, "tier reached a fixed point");
                return current;
            }
        }

        tracing::warn!(%tier, max = MAX_SWEEPS, "placeholder resolution did not converge");
        current
    }

    /// One left-to-right scan over `text`, substituting markers of `tier`.
    pub fn sweep(&self, text: &str, cx: &mut ResolveCx<'_>, tier: Tier) -> Sweep {
        cx.set_tier(tier);
        let mut out = String::with_capacity(text.len());
        let mut changed = false;

        for segment in marker::segments(text) {
            match segment {
                Segment::Text(plain) => out.push_str(plain),
                Segment::Marker { id, raw } => match self.expand(id, cx, tier) {
                    Some(expanded) => {
                        out.push_str(&expanded);
                        changed = true;
                    }
                    None => out.push_str(raw),
                },
            }
        }

        Sweep { text: out, changed }
    }

    /// Resolve one marker, nested markers included. `None` leaves it as-is.
    fn expand(&self, id: PlaceholderId, cx: &mut ResolveCx<'_>, tier: Tier) -> Option<String> {
        let Some(entry) = self.registry.entry(id) else {
            tracing::debug!(placeholder = %id, "unknown placeholder id");
            return None;
        };
        let retry = tier == Tier::Last && cx.is_waiting_for_deferred(id);
        if entry.tier != tier && !retry {
            return None;
        }
        if cx.is_in_flight(id) {
            cx.record_cycle(id);
            return None;
        }

        let imports_before = cx.imports().len();
        let cycles_before = cx.cycles().len();
        let deferred_before = cx.deferred_requests();
        let expanded = {
            let mut guard = cx.enter(id);
            (entry.resolver)(&mut *guard).map(|resolved| {
                let text = resolved.into_text(guard.imports_mut());
                ensure_sufficient_stack(|| self.sweep(&text, &mut *guard, tier)).text
            })
        };

        match expanded {
            Some(expanded) if cx.cycles().len() == cycles_before => {
                tracing::trace!(placeholder = %id, "substituted placeholder");
                Some(expanded)
            }
            _ => {
                if cx.deferred_requests() > deferred_before {
                    cx.wait_for_deferred(id);
                }
                cx.imports_mut().truncate(imports_before);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests;
