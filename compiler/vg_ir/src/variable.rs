//! Named storage: variables and method parameters.

use crate::value::ValueKind;
use crate::{Type, Value};

/// A named, typed storage location with an initial value.
///
/// The variable's *reference* (see [`Variable::as_value`]) renders as its
/// name and carries the imports of the initial value, so using the variable
/// anywhere keeps the imports its declaration needs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Variable {
    name: String,
    initial: Value,
    reference: Value,
}

impl Variable {
    pub fn new(name: impl Into<String>, initial: Value) -> Self {
        let name = name.into();
        let reference = Value::with_kind(initial.ty().clone(), Some(name.clone()), ValueKind::Variable)
            .with_imports_of([&initial]);
        Variable {
            name,
            initial,
            reference,
        }
    }

    /// A variable without initializer.
    pub fn typed(ty: Type, name: impl Into<String>) -> Self {
        Variable::new(name, Value::uninit(ty))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        self.initial.ty()
    }

    /// The value assigned at declaration.
    #[inline]
    pub fn initial(&self) -> &Value {
        &self.initial
    }

    /// The variable used as an expression.
    #[inline]
    pub fn as_value(&self) -> &Value {
        &self.reference
    }
}

impl AsRef<Value> for Variable {
    fn as_ref(&self) -> &Value {
        &self.reference
    }
}

impl From<Variable> for Value {
    fn from(variable: Variable) -> Self {
        variable.reference
    }
}

/// A method or constructor parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    name: String,
    is_final: bool,
    reference: Value,
}

impl Parameter {
    pub fn new(ty: Type, name: impl Into<String>) -> Self {
        let name = name.into();
        let reference = Value::with_kind(ty, Some(name.clone()), ValueKind::Parameter);
        Parameter {
            name,
            is_final: false,
            reference,
        }
    }

    #[must_use]
    pub fn final_(mut self) -> Self {
        self.is_final = true;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        self.reference.ty()
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    #[inline]
    pub fn as_value(&self) -> &Value {
        &self.reference
    }
}

impl AsRef<Value> for Parameter {
    fn as_ref(&self) -> &Value {
        &self.reference
    }
}
