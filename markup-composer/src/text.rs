//! Character data, raw markup and render-time substitution
//!
//! - [`Text`] is escaped character data (PCDATA).
//! - [`CData`] is a `<![CDATA[...]]>` section.
//! - [`TextBlock`] holds raw markup lines, emitted as they are.
//! - [`Template`] is a text block with substitutions: marker strings that are
//!   replaced by deferred content every time the template renders.
//!
//! Escaping leaves existing entity references alone, so text that already
//! contains `&amp;` or `&#169;` is not double escaped.

use crate::callback::Callback;
use crate::error::{ComposeError, Result};
use crate::layout::Layout;
use crate::namespace::Scope;
use crate::node::{Lines, Node, NodeKind, Session};
use std::iter;

/// Longest entity name recognized after a `&`
const MAX_ENTITY_LEN: usize = 32;

/// Escape `&` and `<`, plus any `extra` characters.
///
/// An `&` that already starts an entity reference (`&name;`, `&#123;` or
/// `&#x1F;`) is kept as is.
pub fn escape(text: &str, extra: &[(char, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    for (index, c) in text.char_indices() {
        match c {
            '&' if starts_entity_reference(&text[index..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            c => match extra.iter().find(|(from, _)| *from == c) {
                Some((_, to)) => out.push_str(to),
                None => out.push(c),
            },
        }
    }
    out
}

/// Undo [`escape`]: replaces the `extra` entities, then `&lt;`, then `&amp;`.
pub fn unescape(text: &str, extra: &[(&str, &str)]) -> String {
    let mut out = text.to_string();
    for (from, to) in extra {
        out = out.replace(from, to);
    }
    out.replace("&lt;", "<").replace("&amp;", "&")
}

fn starts_entity_reference(text: &str) -> bool {
    let body = &text[1..];
    let Some(end) = body
        .char_indices()
        .take(MAX_ENTITY_LEN + 1)
        .find(|(_, c)| *c == ';' || c.is_whitespace() || *c == '&' || *c == '<')
        .filter(|(_, c)| *c == ';')
        .map(|(index, _)| index)
    else {
        return false;
    };
    is_entity_name(&body[..end])
}

fn is_entity_name(name: &str) -> bool {
    if let Some(number) = name.strip_prefix('#') {
        return match number.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()),
        };
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == ':' => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ':'))
        }
        _ => false,
    }
}

/// Escaped character data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    escaped: String,
}

impl Text {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            escaped: escape(text.as_ref(), &[]),
        }
    }

    /// The escaped form, as it will appear in output
    pub fn as_str(&self) -> &str {
        &self.escaped
    }

    /// The text with escapes undone
    pub fn unescaped(&self) -> String {
        unescape(&self.escaped, &[])
    }
}

impl Node for Text {
    fn generate<'a>(&'a self, layout: Layout, _scope: Scope, _session: Session<'a>) -> Lines<'a> {
        Box::new(iter::once(layout.format(&self.escaped)))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Text
    }
}

/// A CDATA section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CData {
    content: String,
}

impl CData {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    fn markup(&self) -> String {
        // A literal "]]>" would end the section early; split it over two.
        let body = self.content.replace("]]>", "]]]]><![CDATA[>");
        format!("<![CDATA[{body}]]>")
    }
}

impl Node for CData {
    fn generate<'a>(&'a self, layout: Layout, _scope: Scope, _session: Session<'a>) -> Lines<'a> {
        Box::new(iter::once(layout.format(&self.markup())))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Text
    }
}

/// Raw markup lines, emitted without escaping or well-formedness checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    lines: Vec<String>,
}

impl TextBlock {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// One stored line per line of `source`
    pub fn from_source(source: &str) -> Self {
        Self::new(source.lines())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Node for TextBlock {
    fn generate<'a>(&'a self, layout: Layout, _scope: Scope, _session: Session<'a>) -> Lines<'a> {
        Box::new(self.lines.iter().map(move |line| layout.format(line)))
    }
}

/// A marker and the deferred content that replaces it
#[derive(Debug, Clone)]
struct Substitution {
    marker: String,
    producer: Callback,
    layout: Layout,
}

impl Substitution {
    /// Replace every occurrence of the marker, left to right.
    ///
    /// The producer runs once per occurrence; its output is rendered with the
    /// substitution's own layout and trimmed before being spliced in.
    fn apply(&self, line: &str, scope: &Scope, session: Session<'_>) -> String {
        let mut parts = line.split(self.marker.as_str());
        let mut out = parts.next().unwrap_or_default().to_string();
        for part in parts {
            let replacement = self.producer.invoke(session).render(
                self.layout.clone(),
                scope.clone(),
                session,
            );
            out.push_str(replacement.trim());
            out.push_str(part);
        }
        out
    }
}

/// Raw markup with render-time substitutions
///
/// ```ignore
/// let page = Template::from_source("<p>Hello, {{name}}!</p>")
///     .substitute("{{name}}", Callback::new(|session| {
///         Child::display(session_ref::<String>(session).unwrap_or(&"stranger".into()))
///     }))?;
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    block: TextBlock,
    substitutions: Vec<Substitution>,
}

impl Template {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            block: TextBlock::new(lines),
            substitutions: Vec::new(),
        }
    }

    /// One stored line per line of `source`
    pub fn from_source(source: &str) -> Self {
        Self::new(source.lines())
    }

    /// Register a substitution whose content is laid out with
    /// [`Layout::spartan`].
    pub fn substitute(self, marker: impl Into<String>, producer: Callback) -> Result<Self> {
        self.substitute_with_layout(marker, producer, Layout::spartan())
    }

    /// Register a substitution whose content is laid out with `layout`,
    /// independent of the layout the template itself renders with.
    ///
    /// Substitutions apply in registration order; each one sees the output of
    /// the previous one.
    pub fn substitute_with_layout(
        mut self,
        marker: impl Into<String>,
        producer: Callback,
        layout: Layout,
    ) -> Result<Self> {
        let marker = marker.into();
        if marker.is_empty() {
            return Err(ComposeError::EmptySubstitutionMarker);
        }
        self.substitutions.push(Substitution {
            marker,
            producer,
            layout,
        });
        Ok(self)
    }

    pub fn lines(&self) -> &[String] {
        self.block.lines()
    }
}

impl Node for Template {
    fn generate<'a>(&'a self, layout: Layout, scope: Scope, session: Session<'a>) -> Lines<'a> {
        Box::new(self.block.lines.iter().map(move |line| {
            let line = self
                .substitutions
                .iter()
                .fold(line.clone(), |line, substitution| {
                    substitution.apply(&line, &scope, session)
                });
            layout.format(&line)
        }))
    }
}
