//! Deferred, session-dependent content
//!
//! A [`Callback`] wraps a function of the render session. The function runs
//! only when the callback is rendered, never when it is added to an element.
//! An optional declared return kind lets the parent element classify its
//! content without calling the function early.

use crate::element::ElementType;
use crate::error::{ComposeError, Result};
use crate::layout::Layout;
use crate::namespace::Scope;
use crate::node::{Child, ContentType, Lines, Node, NodeKind, Session};
use std::fmt;
use std::iter;
use std::sync::Arc;

type Producer = dyn Fn(Session<'_>) -> Child + Send + Sync;

/// Content computed from the session at render time
#[derive(Clone)]
pub struct Callback {
    func: Arc<Producer>,
    return_kind: Option<NodeKind>,
}

impl Callback {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(Session<'_>) -> Child + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            return_kind: None,
        }
    }

    /// Declare what kind of node the function returns.
    ///
    /// Deferred content cannot be declared as the return kind.
    pub fn returning(mut self, kind: NodeKind) -> Result<Self> {
        if kind == NodeKind::Deferred {
            return Err(ComposeError::NestedDeferredReturnType);
        }
        self.return_kind = Some(kind);
        Ok(self)
    }

    /// Declare that the function returns elements of `element_type`
    pub fn returning_type(mut self, element_type: &ElementType) -> Self {
        self.return_kind = Some(element_type.kind());
        self
    }

    pub fn return_kind(&self) -> Option<NodeKind> {
        self.return_kind
    }

    /// Classification from the declared return kind; indeterminate when
    /// nothing was declared
    pub fn content_type(&self) -> ContentType {
        self.return_kind
            .map(NodeKind::content_type)
            .unwrap_or(ContentType::Indeterminate)
    }

    /// Run the function
    pub fn invoke(&self, session: Session<'_>) -> Child {
        (self.func)(session)
    }
}

impl Node for Callback {
    fn generate<'a>(&'a self, layout: Layout, scope: Scope, session: Session<'a>) -> Lines<'a> {
        Box::new(
            iter::once_with(move || {
                let content = self.invoke(session);
                let lines: Vec<String> = content.generate(layout, scope, session).collect();
                lines
            })
            .flatten(),
        )
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Deferred
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("return_kind", &self.return_kind)
            .finish_non_exhaustive()
    }
}
