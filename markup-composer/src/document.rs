//! Whole documents and the nodes that can precede the root element

use crate::element::Element;
use crate::error::Result;
use crate::layout::Layout;
use crate::namespace::Scope;
use crate::node::{Child, Lines, Node, NodeKind, Session};
use crate::text::escape;
use std::fmt;
use std::iter;
use std::sync::Arc;

const ATTRIBUTE_ESCAPES: &[(char, &str)] = &[('"', "&quot;")];

/// A processing instruction: `<?target key="value" content?>`
///
/// Pseudo-attributes keep the order they were added in. The content is made
/// of ordinary children, so it can be computed from the session at render
/// time.
#[derive(Debug, Clone)]
pub struct ProcessingInstruction {
    target: String,
    attributes: Vec<(String, String)>,
    content: Vec<Child>,
}

impl ProcessingInstruction {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            attributes: Vec::new(),
            content: Vec::new(),
        }
    }

    /// Add or replace a pseudo-attribute
    pub fn attr(mut self, key: impl Into<String>, value: &str) -> Self {
        let key = key.into();
        let value = escape(value, ATTRIBUTE_ESCAPES);
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((key, value)),
        }
        self
    }

    /// Append instruction content after the pseudo-attributes
    pub fn content(mut self, content: impl Into<Child>) -> Self {
        self.content.push(content.into());
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// The instruction rendered without a session
    pub fn markup(&self) -> String {
        self.instruction(&Scope::new(), None)
    }

    fn instruction(&self, scope: &Scope, session: Session<'_>) -> String {
        let mut out = format!("<?{}", self.target);
        for (key, value) in &self.attributes {
            out.push_str(&format!(" {key}=\"{value}\""));
        }

        // Content hugs the delimiters like preformatted element content.
        let spartan = Layout::spartan();
        let mut content = String::new();
        for child in &self.content {
            let text: String = child.generate(spartan.clone(), scope.clone(), session).collect();
            content.push_str(text.strip_suffix(spartan.line_ending()).unwrap_or(&text));
        }
        if !content.is_empty() {
            out.push(' ');
            out.push_str(&content);
        }

        out.push_str("?>");
        out
    }
}

impl Node for ProcessingInstruction {
    fn generate<'a>(&'a self, layout: Layout, scope: Scope, session: Session<'a>) -> Lines<'a> {
        Box::new(iter::once_with(move || {
            layout.format(&self.instruction(&scope, session))
        }))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Preformatted
    }
}

/// The `<?xml ...?>` line that opens an XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: String,
    pub standalone: Option<bool>,
}

impl Default for XmlDeclaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: "UTF-8".to_string(),
            standalone: None,
        }
    }
}

impl XmlDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standalone(mut self, standalone: bool) -> Self {
        self.standalone = Some(standalone);
        self
    }

    fn instruction(&self) -> ProcessingInstruction {
        let pi = ProcessingInstruction::new("xml")
            .attr("version", &self.version)
            .attr("encoding", &self.encoding);
        match self.standalone {
            Some(true) => pi.attr("standalone", "yes"),
            Some(false) => pi.attr("standalone", "no"),
            None => pi,
        }
    }
}

impl Node for XmlDeclaration {
    fn generate<'a>(&'a self, layout: Layout, _scope: Scope, _session: Session<'a>) -> Lines<'a> {
        Box::new(iter::once(layout.format(&self.instruction().markup())))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Preformatted
    }
}

/// Associates a stylesheet with the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlStylesheet {
    media_type: String,
    href: String,
}

impl XmlStylesheet {
    /// An XSL stylesheet at `href`
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            media_type: "text/xsl".to_string(),
            href: href.into(),
        }
    }

    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }
}

impl Node for XmlStylesheet {
    fn generate<'a>(&'a self, layout: Layout, _scope: Scope, _session: Session<'a>) -> Lines<'a> {
        let pi = ProcessingInstruction::new("xml-stylesheet")
            .attr("type", &self.media_type)
            .attr("href", &self.href);
        Box::new(iter::once(layout.format(&pi.markup())))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Preformatted
    }
}

/// A document type declaration with an optional external reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocType {
    /// `<!DOCTYPE root>`
    Bare { root: String },
    /// `<!DOCTYPE root SYSTEM "system_id">`
    System { root: String, system_id: String },
    /// `<!DOCTYPE root PUBLIC "public_id" "system_id">`
    Public {
        root: String,
        public_id: String,
        system_id: String,
    },
}

impl DocType {
    pub fn new(root: impl Into<String>) -> Self {
        DocType::Bare { root: root.into() }
    }

    pub fn system(root: impl Into<String>, system_id: impl Into<String>) -> Self {
        DocType::System {
            root: root.into(),
            system_id: system_id.into(),
        }
    }

    pub fn public(
        root: impl Into<String>,
        public_id: impl Into<String>,
        system_id: impl Into<String>,
    ) -> Self {
        DocType::Public {
            root: root.into(),
            public_id: public_id.into(),
            system_id: system_id.into(),
        }
    }

    pub fn markup(&self) -> String {
        match self {
            DocType::Bare { root } => format!("<!DOCTYPE {root}>"),
            DocType::System { root, system_id } => {
                format!("<!DOCTYPE {root} SYSTEM \"{system_id}\">")
            }
            DocType::Public {
                root,
                public_id,
                system_id,
            } => format!("<!DOCTYPE {root} PUBLIC \"{public_id}\" \"{system_id}\">"),
        }
    }
}

impl Node for DocType {
    fn generate<'a>(&'a self, layout: Layout, _scope: Scope, _session: Session<'a>) -> Lines<'a> {
        Box::new(iter::once(layout.format(&self.markup())))
    }
}

/// `<!-- text -->`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn markup(&self) -> String {
        // "--" may not appear inside a comment.
        let mut body = self.text.clone();
        while body.contains("--") {
            body = body.replace("--", "- -");
        }
        format!("<!-- {body} -->")
    }
}

impl Node for Comment {
    fn generate<'a>(&'a self, layout: Layout, _scope: Scope, _session: Session<'a>) -> Lines<'a> {
        Box::new(iter::once(layout.format(&self.markup())))
    }
}

/// Nodes rendered ahead of the root element, in order
#[derive(Debug, Clone, Default)]
pub struct Prolog {
    items: Vec<Arc<dyn Node>>,
}

impl Prolog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: impl Node + 'static) -> &mut Self {
        self.items.push(Arc::new(node));
        self
    }

    /// Builder form of [`Prolog::push`]
    pub fn with(mut self, node: impl Node + 'static) -> Self {
        self.push(node);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Node for Prolog {
    fn generate<'a>(&'a self, layout: Layout, scope: Scope, session: Session<'a>) -> Lines<'a> {
        Box::new(
            self.items
                .iter()
                .flat_map(move |item| item.generate(layout.clone(), scope.clone(), session)),
        )
    }
}

/// A complete document: an optional prolog and exactly one root element
///
/// The root renders under a document scope, so it declares every namespace
/// of the scope it is given as well as its own.
///
/// ```ignore
/// let doc = Document::new(html)?
///     .prolog(DocType::new("html"));
/// print!("{doc}");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    prolog: Prolog,
    root: Element,
}

impl Document {
    /// Wrap `root`, marking it as the document root
    pub fn new(mut root: Element) -> Result<Self> {
        root.mark_as_root()?;
        Ok(Self {
            prolog: Prolog::new(),
            root,
        })
    }

    /// Append a node to the prolog
    pub fn prolog(mut self, node: impl Node + 'static) -> Self {
        self.prolog.push(node);
        self
    }

    /// Replace the whole prolog
    pub fn with_prolog(mut self, prolog: Prolog) -> Self {
        self.prolog = prolog;
        self
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn prolog_nodes(&self) -> &Prolog {
        &self.prolog
    }

    /// Render with the readable layout, an empty scope and no session
    pub fn to_markup(&self) -> String {
        self.render(Layout::readable(), Scope::new(), None)
    }
}

impl Node for Document {
    fn generate<'a>(&'a self, layout: Layout, scope: Scope, session: Session<'a>) -> Lines<'a> {
        let scope = if scope.is_document() {
            scope
        } else {
            log::debug!(
                "promoting scope with {} namespaces for document root <{}>",
                scope.len(),
                self.root.tag_name()
            );
            scope.to_document_scope()
        };
        let prolog = self.prolog.generate(layout.clone(), scope.clone(), session);
        Box::new(prolog.chain(self.root.generate(layout, scope, session)))
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

impl From<ProcessingInstruction> for Child {
    fn from(pi: ProcessingInstruction) -> Self {
        Child::node(pi)
    }
}

impl From<Comment> for Child {
    fn from(comment: Comment) -> Self {
        Child::node(comment)
    }
}

impl From<DocType> for Child {
    fn from(doctype: DocType) -> Self {
        Child::node(doctype)
    }
}
