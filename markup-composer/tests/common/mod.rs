//! Shared helpers for the integration tests

use markup_composer::{ElementType, Layout, Namespace, Node, Scope};

/// Render with the readable layout, an empty scope and no session
pub fn readable(node: &dyn Node) -> String {
    node.render(Layout::readable(), Scope::new(), None)
}

/// Build a namespace defining one plain element type per tag
pub fn namespace(name: &str, prefix: Option<&str>, tags: &[&str]) -> Namespace {
    let mut builder = Namespace::builder().name(name);
    if let Some(prefix) = prefix {
        builder = builder.prefix(prefix);
    }
    for tag in tags {
        builder = builder.define(ElementType::new(*tag));
    }
    builder.build().unwrap()
}

/// Number of namespace declarations on one rendered line
pub fn xmlns_count(line: &str) -> usize {
    line.matches(" xmlns").count()
}
