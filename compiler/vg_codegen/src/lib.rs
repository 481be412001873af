//! Generation passes for VisionGen.
//!
//! A pass walks a node graph once and produces the source of one pipeline:
//!
//! ```text
//! nodes ──gen──▶ CodeGen scopes ──assemble──▶ text with markers ──resolve──▶ source
//!          │                                                         ▲
//!          └──────────── placeholders, imports ──────────────────────┘
//! ```
//!
//! - [`build`]: the driver, stage by stage
//! - [`CodeGen`] and [`Current`]: the pass state and the view of it a node
//!   generates against
//! - [`GenNode`] / [`PipelineNode`]: the node contract
//! - [`GenValue`]: what nodes hand each other through their attributes
//! - [`GenError`]: why a pass stopped

mod build;
mod codegen;
mod current;
mod error;
mod node;
mod options;
mod targets;
mod value;

pub use build::build;
pub use codegen::{Build, CodeGen, Stage, Target};
pub use current::Current;
pub use error::{AttributeRef, BuildError, GenError, NodeId, NodeRef};
pub use node::{GenNode, GenOptions, Generator, Generators, NoSession, PipelineNode};
pub use options::{parse_build_options, BuildOptions, OptionsError, DEFAULT_CLASS_NAME};
pub use targets::{enable_targets, Targets, TARGETS_FLAG};
pub use value::{GenValue, ListElement, MatValue, Range, Rect, RotatedRect, Scalar, ScalarRange};

#[cfg(test)]
mod tests;
