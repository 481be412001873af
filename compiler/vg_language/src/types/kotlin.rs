//! Kotlin builtin types. Builtins never produce an import.

use vg_ir::Type;

pub fn boolean() -> Type {
    Type::primitive("Boolean")
}

pub fn int() -> Type {
    Type::primitive("Int")
}

pub fn long() -> Type {
    Type::primitive("Long")
}

pub fn float() -> Type {
    Type::primitive("Float")
}

pub fn double() -> Type {
    Type::primitive("Double")
}

/// Excluded from imports by the Kotlin backend.
pub fn unit() -> Type {
    Type::new("Unit", "kotlin")
}
