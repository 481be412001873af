//! Values that may not be known until the resolution pass.

use std::fmt;
use std::rc::Rc;

use vg_ir::{ImportScope, Value, Variable};

use crate::{PlaceholderId, ResolveCx, Tier};

/// Resolver closure of a placeholder. Re-invoked on every attempt.
pub type ResolverFn<T> = Rc<dyn Fn(&mut ResolveCx<'_>) -> Option<T>>;

/// What a resolver produced, before it is spliced into the text.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved {
    Text(String),
    /// A value contributes its rendering and registers its imports.
    Value(Value),
}

impl Resolved {
    /// The text substituted for a marker.
    pub fn into_text(self, imports: &mut ImportScope) -> String {
        match self {
            Resolved::Text(text) => text,
            Resolved::Value(value) => {
                imports.import_value(&value);
                value.text_or_empty().to_string()
            }
        }
    }
}

/// Types a placeholder can resolve to.
pub trait IntoResolved {
    fn into_resolved(self) -> Resolved;
}

impl IntoResolved for Resolved {
    fn into_resolved(self) -> Resolved {
        self
    }
}

impl IntoResolved for Value {
    fn into_resolved(self) -> Resolved {
        Resolved::Value(self)
    }
}

impl IntoResolved for Variable {
    fn into_resolved(self) -> Resolved {
        Resolved::Value(self.as_value().clone())
    }
}

impl IntoResolved for String {
    fn into_resolved(self) -> Resolved {
        Resolved::Text(self)
    }
}

impl IntoResolved for &'static str {
    fn into_resolved(self) -> Resolved {
        Resolved::Text(self.to_string())
    }
}

macro_rules! display_resolved {
    ($($ty:ty),*) => {
        $(
            impl IntoResolved for $ty {
                fn into_resolved(self) -> Resolved {
                    Resolved::Text(self.to_string())
                }
            }
        )*
    };
}

display_resolved!(bool, i32, i64, u32, usize, f32, f64);

/// A deferred value: a marker in the text now, a resolver call later.
pub struct Placeholder<T> {
    pub(crate) id: PlaceholderId,
    pub(crate) resolve_last: bool,
    pub(crate) resolver: ResolverFn<T>,
}

impl<T> Clone for Placeholder<T> {
    fn clone(&self) -> Self {
        Placeholder {
            id: self.id,
            resolve_last: self.resolve_last,
            resolver: Rc::clone(&self.resolver),
        }
    }
}

impl<T> fmt::Debug for Placeholder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Placeholder")
            .field("id", &self.id)
            .field("resolve_last", &self.resolve_last)
            .finish_non_exhaustive()
    }
}

impl<T> Placeholder<T> {
    #[inline]
    pub fn id(&self) -> PlaceholderId {
        self.id
    }

    #[inline]
    pub fn resolve_last(&self) -> bool {
        self.resolve_last
    }

    pub fn marker(&self) -> String {
        self.id.marker()
    }

    /// Invoke the resolver with this placeholder in flight.
    ///
    /// Returns `None` when the value is not available yet, when a
    /// `resolve_last` placeholder is asked for during the normal tier, or
    /// when this placeholder is already being resolved further up (a cycle,
    /// recorded on `cx`).
    pub fn resolve(&self, cx: &mut ResolveCx<'_>) -> Option<T> {
        if self.resolve_last && cx.tier() == Tier::Normal {
            cx.note_deferred_request(self.id);
            return None;
        }
        if cx.is_in_flight(self.id) {
            cx.record_cycle(self.id);
            return None;
        }
        let mut guard = cx.enter(self.id);
        (self.resolver)(&mut *guard)
    }
}

/// Either a value known now or a placeholder for one.
pub enum Resolvable<T> {
    Now(T),
    Placeholder(Placeholder<T>),
}

impl<T: Clone> Clone for Resolvable<T> {
    fn clone(&self) -> Self {
        match self {
            Resolvable::Now(value) => Resolvable::Now(value.clone()),
            Resolvable::Placeholder(p) => Resolvable::Placeholder(p.clone()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Resolvable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolvable::Now(value) => f.debug_tuple("Now").field(value).finish(),
            Resolvable::Placeholder(p) => p.fmt(f),
        }
    }
}

impl<T> From<Placeholder<T>> for Resolvable<T> {
    fn from(placeholder: Placeholder<T>) -> Self {
        Resolvable::Placeholder(placeholder)
    }
}

impl<T> Resolvable<T> {
    pub fn is_now(&self) -> bool {
        matches!(self, Resolvable::Now(_))
    }

    pub fn now(&self) -> Option<&T> {
        match self {
            Resolvable::Now(value) => Some(value),
            Resolvable::Placeholder(_) => None,
        }
    }

    pub fn placeholder_id(&self) -> Option<PlaceholderId> {
        match self {
            Resolvable::Now(_) => None,
            Resolvable::Placeholder(p) => Some(p.id),
        }
    }
}

impl<T: Clone> Resolvable<T> {
    pub fn resolve(&self, cx: &mut ResolveCx<'_>) -> Option<T> {
        match self {
            Resolvable::Now(value) => Some(value.clone()),
            Resolvable::Placeholder(p) => p.resolve(cx),
        }
    }
}

impl<T: IntoResolved + Clone> Resolvable<T> {
    /// Text to embed in generated code: the value itself, or the marker.
    pub fn to_text(&self) -> String {
        match self {
            Resolvable::Now(value) => match value.clone().into_resolved() {
                Resolved::Text(text) => text,
                Resolved::Value(value) => value.text_or_empty().to_string(),
            },
            Resolvable::Placeholder(p) => p.marker(),
        }
    }

    /// A [`Value`] to embed in generated code.
    ///
    /// A known value keeps its type and imports. A placeholder becomes an
    /// untyped marker; its imports are registered when it is substituted.
    pub fn to_value(&self) -> Value {
        match self {
            Resolvable::Now(value) => match value.clone().into_resolved() {
                Resolved::Text(text) => Value::raw(text),
                Resolved::Value(value) => value,
            },
            Resolvable::Placeholder(p) => Value::raw(p.marker()),
        }
    }
}
