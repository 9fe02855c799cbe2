//! Where namespace declarations land in rendered output
//!
//! The document root declares everything in its scope. Below the root, an
//! element declares its namespace only when it introduces it, and the
//! declaration covers that element's own subtree only.

use crate::common::{namespace, readable, xmlns_count};
use insta::assert_snapshot;
use markup_composer::{Document, Element, Layout, Namespace, Node, Scope};

struct Fixture {
    a: Namespace,
    b: Namespace,
    c: Namespace,
}

fn fixture() -> Fixture {
    Fixture {
        a: namespace("urn:a", Some("a"), &["root", "item"]),
        b: namespace("urn:b", Some("b"), &["meta"]),
        c: namespace("urn:c", Some("c"), &["extra", "leaf"]),
    }
}

fn tree(ns: &Fixture) -> Element {
    ns.a.element("root")
        .unwrap()
        .child(ns.a.element("item").unwrap().child("one"))
        .child(
            ns.c.element("extra")
                .unwrap()
                .child(ns.c.element("leaf").unwrap().child("two")),
        )
        .child(ns.c.element("leaf").unwrap().child("three"))
        .child(ns.b.element("meta").unwrap().child("four"))
}

fn render_document(ns: &Fixture) -> String {
    let doc = Document::new(tree(ns)).unwrap();
    doc.render(
        Layout::readable(),
        Scope::with_namespaces([ns.b.clone()]),
        None,
    )
}

#[test]
fn test_document_namespaces_snapshot() {
    let ns = fixture();
    assert_snapshot!(render_document(&ns).trim_end(), @r#"
<a:root xmlns:a="urn:a" xmlns:b="urn:b">
	<a:item>one</a:item>
	<c:extra xmlns:c="urn:c">
		<c:leaf>two</c:leaf>
	</c:extra>
	<c:leaf xmlns:c="urn:c">three</c:leaf>
	<b:meta>four</b:meta>
</a:root>
"#);
}

#[test]
fn test_root_declares_every_namespace_in_scope() {
    let ns = fixture();
    let out = render_document(&ns);
    let root = out.lines().next().unwrap();
    assert_eq!(xmlns_count(root), 2);
}

#[test]
fn test_descendant_in_scope_declares_nothing() {
    let ns = fixture();
    let out = render_document(&ns);
    let item = out.lines().find(|l| l.contains("<a:item>")).unwrap();
    assert_eq!(xmlns_count(item), 0);
    let meta = out.lines().find(|l| l.contains("<b:meta>")).unwrap();
    assert_eq!(xmlns_count(meta), 0);
}

#[test]
fn test_new_namespace_declared_once_for_its_subtree() {
    let ns = fixture();
    let out = render_document(&ns);
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(xmlns_count(lines[2]), 1);
    assert!(lines[2].contains("xmlns:c=\"urn:c\""));
    // Inside <c:extra> the namespace is already declared.
    assert_eq!(xmlns_count(lines[3]), 0);
    // A sibling outside that subtree has to declare it again.
    assert_eq!(xmlns_count(lines[5]), 1);
}

#[test]
fn test_element_outside_document_declares_own_namespace() {
    let ns = fixture();
    let item = ns.a.element("item").unwrap().child("x");
    assert_eq!(readable(&item), "<a:item xmlns:a=\"urn:a\">x</a:item>\n");

    let in_scope = item.render(
        Layout::readable(),
        Scope::with_namespaces([ns.a.clone()]),
        None,
    );
    assert_eq!(in_scope, "<a:item>x</a:item>\n");
}

#[test]
fn test_root_without_namespace_still_declares_scope() {
    let ns = fixture();
    let doc = Document::new(Element::tag("root")).unwrap();
    let out = doc.render(
        Layout::readable(),
        Scope::with_namespaces([ns.b.clone()]),
        None,
    );
    assert_eq!(out, "<root xmlns:b=\"urn:b\" />\n");
}

#[test]
fn test_default_namespace() {
    let xhtml = namespace("http://www.w3.org/1999/xhtml", None, &["html", "body"]);
    let doc = Document::new(
        xhtml
            .element("html")
            .unwrap()
            .child(xhtml.element("body").unwrap().child("hi")),
    )
    .unwrap();
    assert_eq!(
        doc.to_markup(),
        "<html xmlns=\"http://www.w3.org/1999/xhtml\">\n\t<body>hi</body>\n</html>\n"
    );
}

#[test]
fn test_element_type_lookup_errors() {
    let ns = fixture();
    assert!(ns.a.element("meta").is_err());
    assert_eq!(ns.c.member_tags(), vec!["extra", "leaf"]);
}
