//! Programmatic composition of XML and HTML documents
//!
//!     This crate builds a tree of markup nodes in memory and serializes it to text, with
//!     control over indentation, line wrapping, namespace declarations and content that is
//!     only known at render time (the "session").
//!
//!     This is a pure lib: it never touches the filesystem, the network or the process
//!     environment. Writing the rendered text somewhere is the caller's job. Configuration
//!     loading lives in the markup-config crate.
//!
//! Architecture
//!
//!     Everything renderable implements the Node trait (./node.rs). A node produces a lazy
//!     sequence of lines given a Layout, a Scope and a Session. Rendering never mutates the
//!     tree, so one tree can be rendered many times, with different settings, from several
//!     threads at once.
//!
//!     The file structure :
//!     .
//!     ├── error.rs          # ComposeError
//!     ├── layout.rs         # Indentation, terminators and tag-aware line wrapping
//!     ├── namespace.rs      # Namespace values, the builder, and Scope
//!     ├── node.rs           # Node trait, Child, content classification
//!     ├── text.rs           # Text, CData, TextBlock, Template, escaping
//!     ├── callback.rs       # Deferred, session-dependent content
//!     ├── element.rs        # ElementType, Element and the rendering strategies
//!     ├── document.rs       # Prolog nodes and Document
//!     └── lib.rs
//!
//! Core Algorithms
//!
//!     Two pieces carry the real logic:
//!
//!     - Element content classification (./element.rs). Each child is classified when it is
//!       added. At render time the set of classes selects one of four strategies: empty,
//!       preformatted, flat or nested. Deferred content declares what it will return so the
//!       parent can classify it without calling it early.
//!     - Line wrapping (./layout.rs). A long logical line is cut only after a space and only
//!       outside of tags, searching backward from the target width first and then forward.
//!
//!     Namespace declarations follow one rule: the document root declares every namespace in
//!     its scope, and descendants declare only the namespace they newly introduce.
//!
//! Testing
//!
//!     Unit tests sit next to the code. Integration tests live in tests/, with one module per
//!     area declared from tests/lib.rs, and use insta inline snapshots for whole documents.

pub mod callback;
pub mod document;
pub mod element;
pub mod error;
pub mod layout;
pub mod namespace;
pub mod node;
pub mod text;

pub use callback::Callback;
pub use document::{
    Comment, DocType, Document, ProcessingInstruction, Prolog, XmlDeclaration, XmlStylesheet,
};
pub use element::{Element, ElementType, RenderStrategy};
pub use error::{ComposeError, Result};
pub use layout::{Layout, LayoutPreset, LayoutSettings};
pub use namespace::{Namespace, NamespaceBuilder, Scope, ScopeKind, Vocabulary};
pub use node::{session_ref, Child, ContentType, Lines, Node, NodeKind, Session};
pub use text::{escape, unescape, CData, Template, Text, TextBlock};
