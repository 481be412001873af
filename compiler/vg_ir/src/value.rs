//! Typed expressions.

use crate::Type;

/// What a [`Value`] stands for.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueKind {
    /// A literal or any other fixed expression.
    Constant,
    /// A boolean expression, accepted by `if`/`while`.
    Condition,
    /// An arithmetic expression; wrapped in parentheses when nested.
    Operation,
    /// A reference to a declared variable.
    Variable,
    /// A reference to a method parameter.
    Parameter,
}

/// A typed expression in the target language.
///
/// `text == None` means "no literal value yet": a declaration of such a
/// value has no initializer. Values are immutable; every combinator in the
/// language backends builds a new one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Value {
    ty: Type,
    text: Option<String>,
    kind: ValueKind,
    imports: Vec<Type>,
}

impl Value {
    /// A constant expression of type `ty`.
    pub fn new(ty: Type, text: impl Into<String>) -> Self {
        Value::with_kind(ty, Some(text.into()), ValueKind::Constant)
    }

    /// A value without rendering (declaration without initializer).
    pub fn uninit(ty: Type) -> Self {
        Value::with_kind(ty, None, ValueKind::Constant)
    }

    /// Untyped text, e.g. an identifier spelled by hand.
    pub fn raw(text: impl Into<String>) -> Self {
        Value::new(Type::none(), text)
    }

    pub fn condition(ty: Type, text: impl Into<String>) -> Self {
        Value::with_kind(ty, Some(text.into()), ValueKind::Condition)
    }

    pub fn operation(ty: Type, text: impl Into<String>) -> Self {
        Value::with_kind(ty, Some(text.into()), ValueKind::Operation)
    }

    /// The absent value (`Value.NONE`): no type, no rendering.
    pub fn none() -> Self {
        Value::uninit(Type::none())
    }

    pub(crate) fn with_kind(ty: Type, text: Option<String>, kind: ValueKind) -> Self {
        Value {
            ty,
            text,
            kind,
            imports: Vec::new(),
        }
    }

    /// Require additional imports when this value is used.
    #[must_use]
    pub fn with_imports(mut self, types: impl IntoIterator<Item = Type>) -> Self {
        for ty in types {
            if !self.imports.contains(&ty) {
                self.imports.push(ty);
            }
        }
        self
    }

    /// Carry over every import required by `values`.
    #[must_use]
    pub fn with_imports_of<'a>(self, values: impl IntoIterator<Item = &'a Value>) -> Self {
        let types: Vec<Type> = values
            .into_iter()
            .flat_map(|v| v.imports().cloned().collect::<Vec<_>>())
            .collect();
        self.with_imports(types)
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Rendering, or the empty string when there is none.
    #[inline]
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_none(&self) -> bool {
        self.text.is_none() && self.ty.is_none()
    }

    pub fn is_condition(&self) -> bool {
        self.kind == ValueKind::Condition
    }

    /// Every type that must be imported for this value to compile.
    ///
    /// The value's own type (and its generic arguments) come first, followed
    /// by the additional imports in insertion order. Types that never need an
    /// import are skipped.
    pub fn imports(&self) -> impl Iterator<Item = &Type> {
        std::iter::once(&self.ty)
            .chain(self.ty.generics().iter())
            .chain(self.imports.iter())
            .filter(|ty| ty.should_import())
    }

    /// Rendering wrapped in parentheses when this value is an operation.
    pub fn operand_text(&self) -> String {
        if self.kind == ValueKind::Operation {
            format!("({})", self.text_or_empty())
        } else {
            self.text_or_empty().to_string()
        }
    }
}

/// Render `values` as a comma separated list.
pub fn csv(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::text_or_empty)
        .collect::<Vec<_>>()
        .join(", ")
}
