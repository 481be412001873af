//! Type catalogs for the supported targets.
//!
//! Types are cheap descriptors, so catalogs are plain constructor functions
//! rather than statics.

pub mod java;
pub mod kotlin;
pub mod opencv;
pub mod python;

use vg_ir::Type;

pub fn boolean() -> Type {
    Type::primitive("boolean")
}

pub fn int() -> Type {
    Type::primitive("int")
}

pub fn long() -> Type {
    Type::primitive("long")
}

pub fn float() -> Type {
    Type::primitive("float")
}

pub fn double() -> Type {
    Type::primitive("double")
}

pub fn void() -> Type {
    Type::primitive("void")
}
