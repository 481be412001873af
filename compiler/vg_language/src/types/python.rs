//! CPython modules.
//!
//! A Python type's package is its module and its name is how code refers
//! to it: `cv2` is `cv2`/`cv2`, numpy is `np`/`numpy` (imported with an
//! alias). Modules are always imported, even when name and module match.

use vg_ir::{ImportRule, Type, Value};

/// Placeholder type for untyped Python values.
pub fn no_type() -> Type {
    Type::primitive("None")
}

pub fn module(module: &str, alias: Option<&str>) -> Type {
    Type::new(alias.unwrap_or(module), module).with_import_rule(ImportRule::Always)
}

pub fn cv2() -> Type {
    module("cv2", None)
}

pub fn numpy() -> Type {
    module("numpy", Some("np"))
}

/// `np.ndarray`, imported through numpy.
pub fn nd_array() -> Type {
    Type::new("np.ndarray", "numpy").importing(numpy())
}

fn cv2_constant(name: &str) -> Value {
    Value::new(no_type(), format!("cv2.{name}")).with_imports([cv2()])
}

pub fn retr_list() -> Value {
    cv2_constant("RETR_LIST")
}

pub fn retr_external() -> Value {
    cv2_constant("RETR_EXTERNAL")
}

pub fn chain_approx_simple() -> Value {
    cv2_constant("CHAIN_APPROX_SIMPLE")
}

pub fn morph_rect() -> Value {
    cv2_constant("MORPH_RECT")
}
