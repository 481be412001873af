//! Language-agnostic program model for generated vision pipelines.
//!
//! This crate defines the data the generator works with before any concrete
//! syntax exists:
//!
//! - [`Type`] and [`Value`]: typed expressions in the target language
//! - [`Variable`] and [`Parameter`]: named storage
//! - [`ImportScope`]: the deduplicated set of types a program must import
//! - [`Scope`] and [`Stmt`]: append-only statement lists with nested bodies
//! - [`ColorSpace`]: image color spaces shared by nodes and backends
//!
//! Everything here is created fresh per generation pass and dropped once the
//! source text has been extracted.

mod decl;
mod imports;
pub mod scope;
mod ty;
mod value;
mod variable;
mod vision;

pub use decl::{ClassSignature, MethodSignature, Modifiers, Visibility};
pub use imports::ImportScope;
pub use scope::{Scope, Stmt};
pub use ty::{ImportRule, Type};
pub use value::{csv, Value, ValueKind};
pub use variable::{Parameter, Variable};
pub use vision::ColorSpace;
