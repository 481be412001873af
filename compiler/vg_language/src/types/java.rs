//! `java.lang` / `java.util` types.

use vg_ir::{ImportRule, Type};

pub fn string() -> Type {
    Type::new("String", "java.lang")
}

/// Always visible, never imported.
pub fn math() -> Type {
    Type::new("Math", "java.lang").with_import_rule(ImportRule::Never)
}

pub fn array_list(element: Type) -> Type {
    Type::new("ArrayList", "java.util").with_generics([element])
}

pub fn list(element: Type) -> Type {
    Type::new("List", "java.util").with_generics([element])
}

pub fn hash_map(key: Type, value: Type) -> Type {
    Type::new("HashMap", "java.util").with_generics([key, value])
}

pub fn map(key: Type, value: Type) -> Type {
    Type::new("Map", "java.util").with_generics([key, value])
}

/// `Map.Entry`, imported through its enclosing interface.
pub fn map_entry(key: Type, value: Type) -> Type {
    Type::new("Entry", "java.util.Map").with_generics([key, value])
}

pub fn set(element: Type) -> Type {
    Type::new("Set", "java.util").with_generics([element])
}

pub fn collections() -> Type {
    Type::new("Collections", "java.util")
}

/// Annotation used to expose instance variables by a readable name in
/// preview mode.
pub fn label_annotation() -> Type {
    Type::new("Label", "io.github.deltacv.eocvsim.virtualreflect.jvm")
}
