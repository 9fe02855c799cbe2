//! Rendering strategies and element output
//!
//! The strategy is chosen from the set of content types among an element's
//! children. Mixed text and sub-elements render flat; anything the element
//! cannot classify forces the nested form.

use crate::common::readable;
use insta::assert_snapshot;
use markup_composer::{
    session_ref, Callback, Child, Comment, Element, ElementType, Layout, Node, NodeKind,
    RenderStrategy, Scope,
};
use std::thread;

// ============================================================================
// STRATEGY SELECTION
// ============================================================================

#[test]
fn test_mixed_text_and_elements_render_flat() {
    let div = Element::tag("div")
        .attr("class", "main")
        .child("Hello ")
        .child(Element::tag("em").child("world"));

    assert_eq!(div.strategy(), RenderStrategy::Flat);
    assert_eq!(
        readable(&div),
        "<div class=\"main\">Hello <em>world</em></div>\n"
    );
}

#[test]
fn test_elements_only_render_nested() {
    let ul = Element::tag("ul")
        .child(Element::tag("li").child("one"))
        .child(Element::tag("li").child("two"));

    assert_eq!(ul.strategy(), RenderStrategy::Nested);
    assert_eq!(readable(&ul), "<ul>\n\t<li>one</li>\n\t<li>two</li>\n</ul>\n");
}

#[test]
fn test_unclassified_content_forces_nested() {
    let div = Element::tag("div")
        .child("Hello")
        .child(Comment::new("note"));

    assert_eq!(div.strategy(), RenderStrategy::Nested);
    assert_eq!(readable(&div), "<div>\n\tHello\n\t<!-- note -->\n</div>\n");
}

#[test]
fn test_undeclared_callback_is_indeterminate() {
    let div = Element::tag("div")
        .child("x")
        .child(Callback::new(|_| Child::from("y")));

    assert_eq!(div.strategy(), RenderStrategy::Nested);
    assert_eq!(readable(&div), "<div>\n\tx\n\ty\n</div>\n");
}

#[test]
fn test_declared_callback_keeps_flat() {
    let p = Element::tag("p").child(
        Callback::new(|session| {
            Child::display(session_ref::<String>(session).cloned().unwrap_or_default())
        })
        .returning(NodeKind::Text)
        .unwrap(),
    );

    assert_eq!(p.strategy(), RenderStrategy::Flat);
    let name = String::from("Ada");
    assert_eq!(
        p.render(Layout::readable(), Scope::new(), Some(&name)),
        "<p>Ada</p>\n"
    );
}

#[test]
fn test_preformatted_child_propagates() {
    let pre = ElementType::new("pre").preformatted();
    let doc = Element::tag("html")
        .child(Element::tag("head").child(Element::tag("title").child("Test")))
        .child(
            Element::tag("body")
                .child(Element::tag("h1").child("Hello"))
                .child(
                    Element::tag("p")
                        .child("Some ")
                        .child(Element::tag("em").child("text"))
                        .child("."),
                )
                .child(pre.element().child("a\n  b")),
        );

    assert_snapshot!(readable(&doc).trim_end(), @r#"
<html>
	<head>
		<title>Test</title>
	</head>
	<body><h1>Hello</h1><p>Some <em>text</em>.</p><pre>a
  b</pre></body>
</html>
"#);
}

// ============================================================================
// OUTPUT SHAPES
// ============================================================================

#[test]
fn test_childless_elements_render_one_line() {
    let cases = [
        Element::tag("br"),
        Element::tag("img").attr("src", "a.png").attr("alt", "A"),
        ElementType::new("pre").preformatted().element(),
    ];
    for element in &cases {
        let out = readable(element);
        assert_eq!(out.lines().count(), 1, "{out:?}");
        assert!(out.ends_with("/>\n"), "{out:?}");
    }
    assert_eq!(readable(&cases[1]), "<img alt=\"A\" src=\"a.png\"/>\n");
}

#[test]
fn test_text_only_children_form_one_logical_line() {
    let words = "The quick brown fox jumps over the lazy dog and keeps on running far away";
    let p = Element::tag("p").child(words).child(" again & again");

    let logical = format!("<p>{words} again &amp; again</p>");
    assert_eq!(readable(&p), Layout::readable().format_wrapped(&logical));
    assert_eq!(
        p.render(Layout::spartan(), Scope::new(), None),
        format!("{logical}\n")
    );
}

#[test]
fn test_flat_element_wraps_at_depth() {
    let text = "This sentence is long enough that an indented paragraph must wrap it.";
    let div = Element::tag("div").child(Element::tag("p").child(text));

    let inner = Layout::readable().indent();
    let expected = format!(
        "<div>\n{}</div>\n",
        inner.format_wrapped(&format!("<p>{text}</p>"))
    );
    assert_eq!(readable(&div), expected);
}

#[test]
fn test_minimal_layout_has_no_whitespace() {
    let ul = Element::tag("ul")
        .child(Element::tag("li").child("one"))
        .child(Element::tag("li").child("two"));
    assert_eq!(
        ul.render(Layout::minimal(), Scope::new(), None),
        "<ul><li>one</li><li>two</li></ul>"
    );
}

#[test]
fn test_attribute_quotes_are_escaped() {
    let a = Element::tag("a").attr("title", "\"quoted\"");
    assert_eq!(readable(&a), "<a title=\"&quot;quoted&quot;\"/>\n");
}

#[test]
fn test_display_uses_readable_layout() {
    let p = Element::tag("p").child("x");
    assert_eq!(p.to_string(), "<p>x</p>\n");
}

// ============================================================================
// CONCURRENCY
// ============================================================================

#[test]
fn test_concurrent_renders_with_different_sessions() {
    let list = Element::tag("ol").child(Element::tag("li").child(Callback::new(|session| {
        let n = session_ref::<usize>(session).copied().unwrap_or_default();
        Child::display(n * n)
    })));

    let outputs: Vec<String> = thread::scope(|s| {
        let list = &list;
        let handles: Vec<_> = (0..8usize)
            .map(|n| s.spawn(move || list.render(Layout::readable(), Scope::new(), Some(&n))))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (n, out) in outputs.iter().enumerate() {
        // The callback is the only child of <li>, so <li> renders nested.
        assert_eq!(out, &format!("<ol>\n\t<li>\n\t\t{}\n\t</li>\n</ol>\n", n * n));
    }
}
