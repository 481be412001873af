//! Generation errors.

use std::fmt;

use thiserror::Error;
use vg_language::{LanguageError, LanguageId};

use crate::Stage;

/// Identity of a node within one graph.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node as named in diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub id: NodeId,
    pub name: String,
}

impl NodeRef {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        NodeRef { id, name: name.into() }
    }

    pub fn attribute(&self, name: impl Into<String>) -> AttributeRef {
        AttributeRef {
            node: self.clone(),
            name: name.into(),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.id)
    }
}

/// An input or output port of a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributeRef {
    pub node: NodeRef,
    pub name: String,
}

impl fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` of {}", self.name, self.node)
    }
}

/// Why a generation pass stopped.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenError {
    /// The node's inputs are semantically invalid.
    #[error("{node}: {message}")]
    Node { node: NodeRef, message: String },

    /// One port of a node is invalid (unlinked, wrong value kind).
    #[error("{attribute}: {message}")]
    Attribute { attribute: AttributeRef, message: String },

    /// The backend cannot express a construct the pass needed.
    #[error("{}", backend_message(.node.as_ref(), .source))]
    Backend {
        node: Option<NodeRef>,
        #[source]
        source: LanguageError,
    },

    #[error("{node} has no generator for {language}")]
    NoGenerator { node: NodeRef, language: LanguageId },

    #[error("{node} did not produce a session")]
    NotGenerated { node: NodeRef },

    #[error("{node} has no output `{attribute}`")]
    UnknownAttribute { node: NodeRef, attribute: String },

    #[error("session of {node} is not a `{expected}`")]
    SessionType { node: NodeRef, expected: &'static str },
}

impl GenError {
    pub fn node(node: &NodeRef, message: impl Into<String>) -> Self {
        GenError::Node {
            node: node.clone(),
            message: message.into(),
        }
    }

    pub fn attribute(attribute: AttributeRef, message: impl Into<String>) -> Self {
        GenError::Attribute {
            attribute,
            message: message.into(),
        }
    }

    pub fn unknown_attribute(node: &NodeRef, attribute: &str) -> Self {
        GenError::UnknownAttribute {
            node: node.clone(),
            attribute: attribute.to_string(),
        }
    }

    /// Whether the error is tied to user input rather than to a node or
    /// backend implementation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GenError::Node { .. } | GenError::Attribute { .. })
    }

    /// The node the error is reported against, if any.
    pub fn offending_node(&self) -> Option<&NodeRef> {
        match self {
            GenError::Node { node, .. }
            | GenError::NoGenerator { node, .. }
            | GenError::NotGenerated { node }
            | GenError::UnknownAttribute { node, .. }
            | GenError::SessionType { node, .. } => Some(node),
            GenError::Attribute { attribute, .. } => Some(&attribute.node),
            GenError::Backend { node, .. } => node.as_ref(),
        }
    }
}

fn backend_message(node: Option<&NodeRef>, source: &LanguageError) -> String {
    match node {
        Some(node) => format!("{node}: {source}"),
        None => source.to_string(),
    }
}

impl From<LanguageError> for GenError {
    fn from(source: LanguageError) -> Self {
        GenError::Backend { node: None, source }
    }
}

/// A failed build: the error and the stage the pass ended in.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("code generation failed during {stage}: {error}")]
pub struct BuildError {
    pub stage: Stage,
    #[source]
    pub error: GenError,
}
