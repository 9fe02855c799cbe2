//! Elements and element types
//!
//! An [`ElementType`] is a node type definition: a mandatory tag name, a
//! preformatted flag, default attributes and, once a namespace has been built
//! around it, that namespace. An [`Element`] is one instance of a type with its
//! own attributes and ordered children.
//!
//! # Rendering strategies
//!
//! Every child is classified into a [`ContentType`] as it is added. When the
//! element renders, the set of content types picks one [`RenderStrategy`]:
//!
//! | Condition                                          | Strategy       |
//! |----------------------------------------------------|----------------|
//! | no children                                        | `Empty`        |
//! | element is preformatted, or any child is           | `Preformatted` |
//! | some child is text and none is indeterminate       | `Flat`         |
//! | otherwise                                          | `Nested`       |
//!
//! - `Empty`: `<tag attr="v"/>` on one line.
//! - `Preformatted`: the tags hug the content, and children keep their own
//!   newlines. Nothing is indented or wrapped inside.
//! - `Flat`: open tag, children and close tag are built as one logical line
//!   which the outer layout then wraps.
//! - `Nested`: open tag and close tag on their own lines, every child one
//!   indentation level deeper.
//!
//! Mixed content (text next to sub-elements) is therefore flat, which keeps
//! inline markup such as `<em>` inside running text.
//!
//! # Namespace declarations
//!
//! Under a document scope the element declares every namespace of the scope,
//! plus its own. Under a regular scope it declares only its own namespace, and
//! only when that namespace is not already in scope.

use crate::error::{ComposeError, Result};
use crate::layout::Layout;
use crate::namespace::{Namespace, Scope};
use crate::node::{Child, ContentType, Lines, Node, NodeKind, Session};
use crate::text::{escape, unescape};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::iter;

const ATTRIBUTE_ESCAPES: &[(char, &str)] = &[('"', "&quot;")];
const ATTRIBUTE_UNESCAPES: &[(&str, &str)] = &[("&quot;", "\"")];

/// A node type definition
#[derive(Debug, Clone, PartialEq)]
pub struct ElementType {
    tag_name: String,
    preformatted: bool,
    default_attributes: BTreeMap<String, String>,
    namespace: Option<Namespace>,
}

impl ElementType {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            preformatted: false,
            default_attributes: BTreeMap::new(),
            namespace: None,
        }
    }

    /// Mark elements of this type as preformatted
    pub fn preformatted(mut self) -> Self {
        self.preformatted = true;
        self
    }

    /// An attribute every new element of this type starts with
    pub fn default_attribute(mut self, key: impl Into<String>, value: &str) -> Self {
        self.default_attributes
            .insert(key.into(), escape(value, ATTRIBUTE_ESCAPES));
        self
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn is_preformatted(&self) -> bool {
        self.preformatted
    }

    pub fn namespace(&self) -> Option<&Namespace> {
        self.namespace.as_ref()
    }

    pub fn kind(&self) -> NodeKind {
        if self.preformatted {
            NodeKind::Preformatted
        } else {
            NodeKind::Element
        }
    }

    /// A new, childless element of this type
    pub fn element(&self) -> Element {
        Element::new(self)
    }

    pub(crate) fn bound_to(&self, namespace: Namespace) -> Self {
        Self {
            namespace: Some(namespace),
            ..self.clone()
        }
    }
}

/// How an element lays out its content for one render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    Empty,
    Preformatted,
    Flat,
    Nested,
}

/// A structured markup element
#[derive(Debug, Clone)]
pub struct Element {
    element_type: ElementType,
    attributes: BTreeMap<String, String>,
    children: Vec<Child>,
    content_types: BTreeSet<ContentType>,
    root: bool,
}

impl Element {
    pub fn new(element_type: &ElementType) -> Self {
        Self {
            attributes: element_type.default_attributes.clone(),
            element_type: element_type.clone(),
            children: Vec::new(),
            content_types: BTreeSet::new(),
            root: false,
        }
    }

    /// An element of an ad-hoc type with no namespace
    pub fn tag(tag_name: impl Into<String>) -> Self {
        Self::new(&ElementType::new(tag_name))
    }

    pub fn element_type(&self) -> &ElementType {
        &self.element_type
    }

    pub fn tag_name(&self) -> &str {
        self.element_type.tag_name()
    }

    pub fn namespace(&self) -> Option<&Namespace> {
        self.element_type.namespace()
    }

    pub fn is_preformatted(&self) -> bool {
        self.element_type.is_preformatted()
    }

    // ---- attributes ----

    /// Set an attribute, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: &str) -> &mut Self {
        self.attributes
            .insert(key.into(), escape(value, ATTRIBUTE_ESCAPES));
        self
    }

    /// Builder form of [`Element::set`]
    pub fn attr(mut self, key: impl Into<String>, value: &str) -> Self {
        self.set(key, value);
        self
    }

    /// Read an attribute, with escapes undone
    pub fn get(&self, key: &str) -> Result<String> {
        self.attributes
            .get(key)
            .map(|value| unescape(value, ATTRIBUTE_UNESCAPES))
            .ok_or_else(|| ComposeError::AttributeNotFound(key.to_string()))
    }

    /// Remove an attribute, returning its value if it was set
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.attributes
            .remove(key)
            .map(|value| unescape(&value, ATTRIBUTE_UNESCAPES))
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// All attributes in key order, with escapes undone
    pub fn attributes(&self) -> impl Iterator<Item = (&str, String)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), unescape(value, ATTRIBUTE_UNESCAPES)))
    }

    // ---- content ----

    /// Append one child
    pub fn add(&mut self, child: impl Into<Child>) -> &mut Self {
        let child = child.into();
        self.content_types.insert(child.content_type());
        self.children.push(child);
        self
    }

    /// Builder form of [`Element::add`]
    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.add(child);
        self
    }

    /// Builder form that appends several children
    pub fn children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Child>,
    {
        for child in children {
            self.add(child);
        }
        self
    }

    pub fn contents(&self) -> &[Child] {
        &self.children
    }

    /// The set of content types among the children
    pub fn content_types(&self) -> &BTreeSet<ContentType> {
        &self.content_types
    }

    // ---- document root ----

    /// Mark this element as a document root. Allowed once.
    pub fn mark_as_root(&mut self) -> Result<()> {
        if self.root {
            return Err(ComposeError::RootAlreadyMarked(self.tag_name().to_string()));
        }
        self.root = true;
        Ok(())
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    // ---- rendering ----

    /// The strategy a render of this element will use
    pub fn strategy(&self) -> RenderStrategy {
        let types = &self.content_types;
        if types.is_empty() {
            RenderStrategy::Empty
        } else if self.is_preformatted() || types.contains(&ContentType::Preformatted) {
            RenderStrategy::Preformatted
        } else if types.contains(&ContentType::Pcdata)
            && !types.contains(&ContentType::Indeterminate)
        {
            RenderStrategy::Flat
        } else {
            RenderStrategy::Nested
        }
    }

    /// Work out which namespaces this element declares under `scope`, and the
    /// scope its children render in.
    pub fn resolve_scope(&self, scope: &Scope) -> (Vec<Namespace>, Scope) {
        let namespace = self.namespace();
        if scope.is_document() {
            let inner = match namespace {
                Some(namespace) => scope.merge([namespace.clone()]),
                None => scope.to_regular_scope(),
            };
            return (inner.iter().cloned().collect(), inner);
        }
        match namespace {
            Some(namespace) if !scope.contains(namespace) => {
                (vec![namespace.clone()], scope.merge([namespace.clone()]))
            }
            _ => (Vec::new(), scope.clone()),
        }
    }

    /// `key="value"` pairs in key order, space separated
    pub fn format_attributes(&self) -> String {
        self.attributes
            .iter()
            .map(|(key, value)| format!("{key}=\"{value}\""))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn qualified_name(&self) -> String {
        match self.namespace() {
            Some(namespace) => format!("{}{}", namespace.qualifier(), self.tag_name()),
            None => self.tag_name().to_string(),
        }
    }

    fn format_xmlns(declared: &[Namespace]) -> String {
        declared.iter().map(Namespace::xmlns_attribute).collect()
    }

    /// The opening tag, declaring `declared`
    pub fn open_tag(&self, declared: &[Namespace]) -> String {
        let mut attributes = self.format_attributes();
        if !attributes.is_empty() {
            attributes.insert(0, ' ');
        }
        format!(
            "<{}{}{}>",
            self.qualified_name(),
            Self::format_xmlns(declared),
            attributes
        )
    }

    /// The closing tag
    pub fn close_tag(&self) -> String {
        format!("</{}>", self.qualified_name())
    }

    /// The self-closing form used when there are no children
    pub fn empty_tag(&self, declared: &[Namespace]) -> String {
        format!(
            "<{}{} {}/>",
            self.qualified_name(),
            Self::format_xmlns(declared),
            self.format_attributes()
        )
    }

    /// Render with the readable layout, an empty scope and no session
    pub fn to_markup(&self) -> String {
        self.render(Layout::readable(), Scope::new(), None)
    }

    fn generate_empty<'a>(&'a self, layout: Layout, scope: Scope) -> Lines<'a> {
        let (declared, _) = self.resolve_scope(&scope);
        Box::new(iter::once(layout.format(&self.empty_tag(&declared))))
    }

    fn generate_preformatted<'a>(
        &'a self,
        layout: Layout,
        scope: Scope,
        session: Session<'a>,
    ) -> Lines<'a> {
        let (declared, inner) = self.resolve_scope(&scope);
        let open = format!("{}{}", layout.indentation(), self.open_tag(&declared));
        let close = format!("{}{}", self.close_tag(), layout.line_ending());

        let body = self.children.iter().map(move |child| {
            let spartan = Layout::spartan();
            let text: String = child.generate(spartan.clone(), inner.clone(), session).collect();
            match text.strip_suffix(spartan.line_ending()) {
                Some(stripped) => stripped.to_string(),
                None => text,
            }
        });

        Box::new(iter::once(open).chain(body).chain(iter::once(close)))
    }

    fn generate_flat<'a>(&'a self, layout: Layout, scope: Scope, session: Session<'a>) -> Lines<'a> {
        Box::new(iter::once_with(move || {
            let (declared, inner) = self.resolve_scope(&scope);
            let mut line = self.open_tag(&declared);
            for child in &self.children {
                line.extend(child.generate(Layout::minimal(), inner.clone(), session));
            }
            line.push_str(&self.close_tag());
            layout.format_wrapped(&line)
        }))
    }

    fn generate_nested<'a>(
        &'a self,
        layout: Layout,
        scope: Scope,
        session: Session<'a>,
    ) -> Lines<'a> {
        let (declared, inner) = self.resolve_scope(&scope);
        let open = layout.format(&self.open_tag(&declared));
        let close = layout.format(&self.close_tag());
        let child_layout = layout.indent();

        let body = self
            .children
            .iter()
            .flat_map(move |child| child.generate(child_layout.clone(), inner.clone(), session));

        Box::new(iter::once(open).chain(body).chain(iter::once(close)))
    }
}

impl Node for Element {
    fn generate<'a>(&'a self, layout: Layout, scope: Scope, session: Session<'a>) -> Lines<'a> {
        let strategy = self.strategy();
        log::trace!("rendering <{}> as {:?}", self.tag_name(), strategy);
        match strategy {
            RenderStrategy::Empty => self.generate_empty(layout, scope),
            RenderStrategy::Preformatted => self.generate_preformatted(layout, scope, session),
            RenderStrategy::Flat => self.generate_flat(layout, scope, session),
            RenderStrategy::Nested => self.generate_nested(layout, scope, session),
        }
    }

    fn kind(&self) -> NodeKind {
        self.element_type.kind()
    }
}

impl From<&ElementType> for Element {
    fn from(element_type: &ElementType) -> Self {
        Element::new(element_type)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}
