//! Declaration headers: visibility, modifiers, method and class signatures.

use std::fmt;

use bitflags::bitflags;

use crate::{Parameter, Type};

/// Member visibility.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Protected => "protected",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Declaration modifiers.
    ///
    /// Not every backend spells every modifier; unsupported ones are dropped
    /// silently (Lua has no `static`, Kotlin has no `synchronized` keyword
    /// and uses an annotation instead).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifiers: u8 {
        const STATIC = 1 << 0;
        const FINAL = 1 << 1;
        const OVERRIDE = 1 << 2;
        const SYNCHRONIZED = 1 << 3;
    }
}

/// Header of a method declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub visibility: Visibility,
    pub return_type: Type,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub modifiers: Modifiers,
}

impl MethodSignature {
    pub fn new(visibility: Visibility, return_type: Type, name: impl Into<String>) -> Self {
        MethodSignature {
            visibility,
            return_type,
            name: name.into(),
            parameters: Vec::new(),
            modifiers: Modifiers::empty(),
        }
    }

    #[must_use]
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }
}

/// Header of a class declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassSignature {
    pub visibility: Visibility,
    pub name: String,
    pub extends: Option<Type>,
    pub implements: Vec<Type>,
    pub modifiers: Modifiers,
}

impl ClassSignature {
    pub fn new(visibility: Visibility, name: impl Into<String>) -> Self {
        ClassSignature {
            visibility,
            name: name.into(),
            extends: None,
            implements: Vec::new(),
            modifiers: Modifiers::empty(),
        }
    }

    #[must_use]
    pub fn extends(mut self, ty: Type) -> Self {
        self.extends = Some(ty);
        self
    }

    #[must_use]
    pub fn implements(mut self, ty: Type) -> Self {
        self.implements.push(ty);
        self
    }

    #[must_use]
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }
}
