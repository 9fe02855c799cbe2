//! Error types for composition operations
//!
//! Every failure is raised while a tree is being built or queried. Rendering
//! never fails, so the line iterators produced by [`Node::generate`] carry
//! plain strings.
//!
//! [`Node::generate`]: crate::node::Node::generate

use thiserror::Error;

/// Errors that can occur while building or querying a document tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    /// A namespace was built without a name, and no vocabulary supplied one
    #[error("Namespace name not provided as argument or by vocabulary")]
    MissingNamespaceName,

    /// A node type already bound to a namespace was offered to another one
    #[error("Element type '{tag}' already belongs to namespace '{namespace}'")]
    NamespaceAlreadyAssigned { tag: String, namespace: String },

    /// A namespace was asked for a node type it does not define
    #[error("Namespace '{namespace}' does not define element type '{tag}'")]
    UndefinedElementType { namespace: String, tag: String },

    /// An attribute was read before it was ever set
    #[error("Attribute '{0}' is not set")]
    AttributeNotFound(String),

    /// Deferred content declared another deferred content as its return type
    #[error("Deferred content cannot declare deferred content as its return type")]
    NestedDeferredReturnType,

    /// A substitution was registered with an empty marker
    #[error("Substitution marker must not be empty")]
    EmptySubstitutionMarker,

    /// An element was marked as a document root a second time
    #[error("Element '{0}' is already a document root")]
    RootAlreadyMarked(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ComposeError>;
