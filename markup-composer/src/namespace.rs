//! Namespaces and namespace scopes
//!
//! A [`Namespace`] is an immutable value: a URI-like name, an optional prefix,
//! and the element types defined in it. Two namespaces are the same namespace
//! when their names match; the prefix is presentation only.
//!
//! Element types are bound to a namespace while the namespace is being built
//! (see [`NamespaceBuilder::define`]). Once built, the namespace hands out bound
//! copies of its types through [`Namespace::element_type`].
//!
//! A [`Scope`] is the set of namespaces already declared at some point of the
//! tree. The document root receives a [`ScopeKind::Document`] scope, which
//! makes it declare every namespace it knows about; everything below it gets a
//! regular scope and only declares what it newly introduces.

use crate::element::{Element, ElementType};
use crate::error::{ComposeError, Result};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A source of element types for a namespace
///
/// Schema ingestion and prebuilt vocabularies implement this to populate a
/// namespace at construction time. A vocabulary may also know its own
/// namespace URI, in which case the builder does not need an explicit name.
pub trait Vocabulary {
    /// The namespace URI this vocabulary belongs to, if it declares one
    fn namespace_uri(&self) -> Option<&str> {
        None
    }

    /// The element types defined by this vocabulary, not yet bound to any
    /// namespace
    fn element_types(&self) -> Vec<ElementType>;
}

/// An XML namespace: identity, prefix and member element types
#[derive(Clone)]
pub struct Namespace {
    inner: Arc<NamespaceInner>,
}

struct NamespaceInner {
    name: String,
    prefix: Option<String>,
    members: BTreeMap<String, ElementType>,
}

impl Namespace {
    /// Start building a namespace
    pub fn builder() -> NamespaceBuilder {
        NamespaceBuilder::default()
    }

    /// A namespace with no member types
    pub fn new(name: impl Into<String>, prefix: Option<&str>) -> Result<Self> {
        let mut builder = Self::builder().name(name);
        if let Some(prefix) = prefix {
            builder = builder.prefix(prefix);
        }
        builder.build()
    }

    /// The namespace URI
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn prefix(&self) -> Option<&str> {
        self.inner.prefix.as_deref()
    }

    /// Get the element type `tag`, bound to this namespace
    pub fn element_type(&self, tag: &str) -> Result<ElementType> {
        self.inner
            .members
            .get(tag)
            .map(|ty| ty.bound_to(self.clone()))
            .ok_or_else(|| ComposeError::UndefinedElementType {
                namespace: self.name().to_string(),
                tag: tag.to_string(),
            })
    }

    /// Create an element of type `tag` from this namespace
    pub fn element(&self, tag: &str) -> Result<Element> {
        self.element_type(tag).map(|ty| ty.element())
    }

    /// Whether `element_type` is one of this namespace's bound types
    pub fn contains(&self, element_type: &ElementType) -> bool {
        element_type.namespace() == Some(self)
            && self.inner.members.contains_key(element_type.tag_name())
    }

    /// Tag names of all member types (sorted)
    pub fn member_tags(&self) -> Vec<&str> {
        self.inner.members.keys().map(String::as_str).collect()
    }

    /// The `xmlns` attribute declaring this namespace, with a leading space
    pub fn xmlns_attribute(&self) -> String {
        match self.prefix() {
            Some(prefix) => format!(" xmlns:{prefix}=\"{}\"", self.name()),
            None => format!(" xmlns=\"{}\"", self.name()),
        }
    }

    /// The tag-name qualifier for elements of this namespace (`"p:"` or `""`)
    pub fn qualifier(&self) -> String {
        match self.prefix() {
            Some(prefix) => format!("{prefix}:"),
            None => String::new(),
        }
    }
}

impl PartialEq for Namespace {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Namespace {}

impl Hash for Namespace {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl PartialOrd for Namespace {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Namespace {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(other.name())
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix() {
            Some(prefix) => write!(f, "<Namespace \"{prefix}\" \"{}\">", self.name()),
            None => write!(f, "<Namespace \"{}\">", self.name()),
        }
    }
}

/// Builder for [`Namespace`]
///
/// ```ignore
/// let rss = Namespace::builder()
///     .name("http://backend.userland.com/rss2")
///     .prefix("r")
///     .define(ElementType::new("channel"))
///     .define(ElementType::new("item"))
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct NamespaceBuilder {
    name: Option<String>,
    vocabulary_name: Option<String>,
    prefix: Option<String>,
    definitions: Vec<ElementType>,
}

impl NamespaceBuilder {
    /// Set the namespace URI. Takes precedence over a vocabulary's URI.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the prefix. An empty prefix means the default namespace.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }

    /// Add an element type. A later definition with the same tag replaces an
    /// earlier one.
    pub fn define(mut self, element_type: ElementType) -> Self {
        self.definitions.push(element_type);
        self
    }

    /// Add every type of a vocabulary, and adopt its URI if it has one
    pub fn vocabulary(mut self, vocabulary: &dyn Vocabulary) -> Self {
        if let Some(uri) = vocabulary.namespace_uri() {
            self.vocabulary_name = Some(uri.to_string());
        }
        self.definitions.extend(vocabulary.element_types());
        self
    }

    /// Finish construction
    ///
    /// Fails when no name was given and none could be derived from a
    /// vocabulary, or when a definition already belongs to a namespace.
    pub fn build(self) -> Result<Namespace> {
        let name = self
            .name
            .or(self.vocabulary_name)
            .filter(|name| !name.is_empty())
            .ok_or(ComposeError::MissingNamespaceName)?;

        let mut members = BTreeMap::new();
        for definition in self.definitions {
            if let Some(owner) = definition.namespace() {
                return Err(ComposeError::NamespaceAlreadyAssigned {
                    tag: definition.tag_name().to_string(),
                    namespace: owner.name().to_string(),
                });
            }
            members.insert(definition.tag_name().to_string(), definition);
        }

        log::debug!(
            "built namespace '{}' with {} element types",
            name,
            members.len()
        );

        Ok(Namespace {
            inner: Arc::new(NamespaceInner {
                name,
                prefix: self.prefix,
                members,
            }),
        })
    }
}

/// Which declaration rules apply at a point in the tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScopeKind {
    /// Inside element content: declare only newly introduced namespaces
    #[default]
    Regular,
    /// At the document root: declare every namespace in scope
    Document,
}

/// The namespaces already declared at a point in the tree
///
/// Membership is by namespace name. Iteration order is sorted by name, which
/// keeps root declarations deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    kind: ScopeKind,
    namespaces: BTreeSet<Namespace>,
}

impl Scope {
    /// An empty regular scope
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty document scope
    pub fn document() -> Self {
        Self {
            kind: ScopeKind::Document,
            namespaces: BTreeSet::new(),
        }
    }

    /// A regular scope holding `namespaces`
    pub fn with_namespaces(namespaces: impl IntoIterator<Item = Namespace>) -> Self {
        Self {
            kind: ScopeKind::Regular,
            namespaces: namespaces.into_iter().collect(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn is_document(&self) -> bool {
        self.kind == ScopeKind::Document
    }

    pub fn contains(&self, namespace: &Namespace) -> bool {
        self.namespaces.contains(namespace)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.iter()
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// A new scope with `namespaces` added.
    ///
    /// The result is always a regular scope: merging out of a document scope
    /// leaves the document root behind.
    pub fn merge(&self, namespaces: impl IntoIterator<Item = Namespace>) -> Scope {
        let mut merged = self.namespaces.clone();
        merged.extend(namespaces);
        Scope {
            kind: ScopeKind::Regular,
            namespaces: merged,
        }
    }

    /// The same namespaces, under document-root rules
    pub fn to_document_scope(&self) -> Scope {
        Scope {
            kind: ScopeKind::Document,
            namespaces: self.namespaces.clone(),
        }
    }

    /// The same namespaces, under regular rules
    pub fn to_regular_scope(&self) -> Scope {
        Scope {
            kind: ScopeKind::Regular,
            namespaces: self.namespaces.clone(),
        }
    }
}

impl FromIterator<Namespace> for Scope {
    fn from_iter<I: IntoIterator<Item = Namespace>>(iter: I) -> Self {
        Scope::with_namespaces(iter)
    }
}
