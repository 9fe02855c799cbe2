//! The node abstraction every renderable thing implements
//!
//! A [`Node`] produces its markup lazily as a sequence of text lines. Each
//! line already carries its indentation and terminator, so concatenating the
//! sequence yields the final text. Rendering takes `&self`: a node never
//! changes while it renders, and the same tree can be rendered again, or from
//! several threads at once, with different layouts, scopes and sessions.
//!
//! Element content is held as a [`Child`], a closed set of variants that is
//! classified into a [`ContentType`] when it is added to an element.

use crate::callback::Callback;
use crate::element::Element;
use crate::layout::Layout;
use crate::namespace::Scope;
use crate::text::{CData, Template, Text, TextBlock};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque, caller-supplied context for deferred content
///
/// Borrowed for the duration of one render. Producers downcast it to whatever
/// type the caller agreed on; see [`session_ref`].
pub type Session<'s> = Option<&'s (dyn Any + Send + Sync)>;

/// A lazy sequence of rendered lines
pub type Lines<'a> = Box<dyn Iterator<Item = String> + 'a>;

/// Downcast a session to a concrete type
pub fn session_ref<'s, T: Any>(session: Session<'s>) -> Option<&'s T> {
    session.and_then(|value| value.downcast_ref::<T>())
}

/// What a parent element sees when it classifies a child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentType {
    Element,
    Pcdata,
    Preformatted,
    Indeterminate,
}

/// The static kind of a node, used for content classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A structured element
    Element,
    /// Character data
    Text,
    /// Content whose whitespace must survive untouched
    Preformatted,
    /// Content computed at render time
    Deferred,
    /// Anything else: raw markup, comments, doctypes
    Other,
}

impl NodeKind {
    pub fn content_type(self) -> ContentType {
        match self {
            NodeKind::Element => ContentType::Element,
            NodeKind::Text => ContentType::Pcdata,
            NodeKind::Preformatted => ContentType::Preformatted,
            NodeKind::Deferred | NodeKind::Other => ContentType::Indeterminate,
        }
    }
}

/// A renderable unit of markup
///
/// # Examples
///
/// ```ignore
/// #[derive(Debug)]
/// struct Rule;
///
/// impl Node for Rule {
///     fn generate<'a>(&'a self, layout: Layout, _: Scope, _: Session<'a>) -> Lines<'a> {
///         Box::new(std::iter::once(layout.format("<hr />")))
///     }
/// }
/// ```
pub trait Node: Send + Sync + fmt::Debug {
    /// Produce the markup of this node line by line
    fn generate<'a>(&'a self, layout: Layout, scope: Scope, session: Session<'a>) -> Lines<'a>;

    /// Produce the markup of this node as one string
    fn render(&self, layout: Layout, scope: Scope, session: Session<'_>) -> String {
        self.generate(layout, scope, session).collect()
    }

    /// How a parent element should classify this node
    fn kind(&self) -> NodeKind {
        NodeKind::Other
    }
}

/// One item of element content
#[derive(Debug, Clone)]
pub enum Child {
    Element(Element),
    Text(Text),
    CData(CData),
    Deferred(Callback),
    Node(Arc<dyn Node>),
}

impl Child {
    /// Wrap any node
    pub fn node(node: impl Node + 'static) -> Self {
        Child::Node(Arc::new(node))
    }

    /// Coerce a plain value to escaped text
    pub fn display(value: impl fmt::Display) -> Self {
        Child::Text(Text::new(value.to_string()))
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            Child::Element(element) => element.kind().content_type(),
            Child::Text(_) | Child::CData(_) => ContentType::Pcdata,
            Child::Deferred(callback) => callback.content_type(),
            Child::Node(node) => node.kind().content_type(),
        }
    }
}

impl Node for Child {
    fn generate<'a>(&'a self, layout: Layout, scope: Scope, session: Session<'a>) -> Lines<'a> {
        match self {
            Child::Element(element) => element.generate(layout, scope, session),
            Child::Text(text) => text.generate(layout, scope, session),
            Child::CData(cdata) => cdata.generate(layout, scope, session),
            Child::Deferred(callback) => callback.generate(layout, scope, session),
            Child::Node(node) => node.generate(layout, scope, session),
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            Child::Element(element) => element.kind(),
            Child::Text(text) => text.kind(),
            Child::CData(cdata) => cdata.kind(),
            Child::Deferred(callback) => callback.kind(),
            Child::Node(node) => node.kind(),
        }
    }
}

impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Child::Element(element)
    }
}

impl From<Text> for Child {
    fn from(text: Text) -> Self {
        Child::Text(text)
    }
}

impl From<CData> for Child {
    fn from(cdata: CData) -> Self {
        Child::CData(cdata)
    }
}

impl From<Callback> for Child {
    fn from(callback: Callback) -> Self {
        Child::Deferred(callback)
    }
}

impl From<Arc<dyn Node>> for Child {
    fn from(node: Arc<dyn Node>) -> Self {
        Child::Node(node)
    }
}

impl From<TextBlock> for Child {
    fn from(block: TextBlock) -> Self {
        Child::node(block)
    }
}

impl From<Template> for Child {
    fn from(template: Template) -> Self {
        Child::node(template)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(Text::new(text))
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(Text::new(text))
    }
}

impl From<&String> for Child {
    fn from(text: &String) -> Self {
        Child::Text(Text::new(text.as_str()))
    }
}
