//! Deferred values for the VisionGen code generator.
//!
//! Nodes often need a value that does not exist yet when they generate code:
//! the variable another node will declare later in the pass, or the import
//! block, which is only complete once every node has run. Such values are
//! written into the source as placeholder markers and replaced afterwards.
//!
//! - [`Resolvable`]: a value known [now](Resolvable::Now) or a
//!   [`Placeholder`] with a resolver closure
//! - [`PlaceholderRegistry`]: allocates ids and keeps resolvers for one pass
//! - [`PlaceholderResolver`]: the two-tier, fixed-point substitution pass
//! - [`ResolveCx`]: what resolvers see, including the in-flight stack used
//!   for cycle detection

mod cx;
pub mod marker;
mod registry;
mod resolvable;
mod resolver;
mod stack;

pub use cx::{Cycle, ResolveCx};
pub use marker::PlaceholderId;
pub use registry::{PlaceholderRegistry, Tier};
pub use resolvable::{IntoResolved, Placeholder, Resolvable, Resolved, ResolverFn};
pub use resolver::{PlaceholderResolver, Resolution, Sweep, MAX_SWEEPS};
pub use stack::ensure_sufficient_stack;
