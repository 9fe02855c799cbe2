//! Templates, deferred content and escaping

use markup_composer::{
    escape, session_ref, unescape, Callback, Child, Element, Layout, Node, Scope, Template,
};
use proptest::prelude::*;

struct Visitor {
    name: String,
    visits: u32,
}

fn greeting() -> Template {
    Template::from_source("<p>Welcome back, $name$. Visit number $count$.</p>")
        .substitute(
            "$count$",
            Callback::new(|session| {
                Child::display(session_ref::<Visitor>(session).map_or(0, |v| v.visits))
            }),
        )
        .unwrap()
        .substitute(
            "$name$",
            Callback::new(|session| {
                Child::display(
                    session_ref::<Visitor>(session)
                        .map(|v| v.name.clone())
                        .unwrap_or_default(),
                )
            }),
        )
        .unwrap()
}

#[test]
fn test_markers_replaced_regardless_of_line_order() {
    let visitor = Visitor {
        name: "Ada".to_string(),
        visits: 3,
    };
    let body = Element::tag("body").child(greeting());
    assert_eq!(
        body.render(Layout::readable(), Scope::new(), Some(&visitor)),
        "<body>\n\t<p>Welcome back, Ada. Visit number 3.</p>\n</body>\n"
    );
}

#[test]
fn test_template_renders_per_session() {
    let template = greeting();
    let first = Visitor {
        name: "Ada".to_string(),
        visits: 1,
    };
    let second = Visitor {
        name: "Grace".to_string(),
        visits: 2,
    };
    assert_eq!(
        template.render(Layout::minimal(), Scope::new(), Some(&first)),
        "<p>Welcome back, Ada. Visit number 1.</p>"
    );
    assert_eq!(
        template.render(Layout::minimal(), Scope::new(), Some(&second)),
        "<p>Welcome back, Grace. Visit number 2.</p>"
    );
}

#[test]
fn test_substitution_layout_is_independent() {
    let list = || {
        Callback::new(|_| {
            Child::from(Element::tag("ul").child(Element::tag("li").child("a")))
        })
    };

    let spartan = Template::from_source("<div>%list%</div>")
        .substitute("%list%", list())
        .unwrap();
    assert_eq!(
        spartan.render(Layout::readable(), Scope::new(), None),
        "<div><ul>\n<li>a</li>\n</ul></div>\n"
    );

    let minimal = Template::from_source("<div>%list%</div>")
        .substitute_with_layout("%list%", list(), Layout::minimal())
        .unwrap();
    assert_eq!(
        minimal.render(Layout::readable(), Scope::new(), None),
        "<div><ul><li>a</li></ul></div>\n"
    );
}

#[test]
fn test_escaped_text_in_substitution() {
    let template = Template::from_source("<td>$v$</td>")
        .substitute("$v$", Callback::new(|_| Child::from("1 < 2")))
        .unwrap();
    assert_eq!(
        template.render(Layout::minimal(), Scope::new(), None),
        "<td>1 &lt; 2</td>"
    );
}

proptest! {
    #[test]
    fn unescape_inverts_escape(text in "[a-z &<>\"'#]{0,40}") {
        prop_assert_eq!(unescape(&escape(&text, &[]), &[]), text);
    }

    #[test]
    fn attribute_values_survive_storage(value in "[a-z &<>\"'#]{0,40}") {
        let element = Element::tag("e").attr("v", &value);
        prop_assert_eq!(element.get("v").unwrap(), value);
    }

    #[test]
    fn escape_is_idempotent(text in "[a-z &<>;#]{0,40}") {
        let once = escape(&text, &[]);
        prop_assert_eq!(escape(&once, &[]), once);
    }

    #[test]
    fn entity_references_are_preserved(
        prefix in "[a-z ]{0,10}",
        entity in prop_oneof![
            Just("&amp;".to_string()),
            Just("&lt;".to_string()),
            Just("&quot;".to_string()),
            "[0-9]{1,5}".prop_map(|n| format!("&#{n};")),
            "[0-9a-f]{1,4}".prop_map(|n| format!("&#x{n};")),
        ],
        suffix in "[a-z ]{0,10}",
    ) {
        let text = format!("{prefix}{entity}{suffix}");
        prop_assert_eq!(escape(&text, &[]), text);
    }
}
