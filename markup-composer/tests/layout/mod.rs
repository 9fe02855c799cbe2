//! Property-based tests for tag-aware line wrapping
//!
//! A wrapped line is only ever cut right after a space that sits outside of
//! any tag. Rejoining the physical lines with single spaces gives back the
//! logical line.

use markup_composer::Layout;
use proptest::prelude::*;

/// Words, inline tags, and tags whose attribute lists contain spaces
fn token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,12}",
        "[a-z]{1,6}".prop_map(|w| format!("<em>{w}</em>")),
        ("[a-z]{1,6}", "[a-z]{1,6}")
            .prop_map(|(a, b)| format!("<span class=\"{a} {b}\">{b}</span>")),
        "[a-z]{20,50}",
    ]
}

fn line_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(token_strategy(), 1..30).prop_map(|tokens| tokens.join(" "))
}

fn balanced(segment: &str) -> bool {
    segment.matches('<').count() == segment.matches('>').count()
}

proptest! {
    #[test]
    fn wrapped_lines_rejoin_to_input(line in line_strategy(), width in 40usize..100) {
        let layout = Layout::new("", 0, "\n", width);
        let wrapped = layout.format_wrapped(&line);

        prop_assert!(wrapped.ends_with('\n'));
        let segments: Vec<&str> = wrapped.lines().collect();
        prop_assert_eq!(segments.join(" "), line);
    }

    #[test]
    fn wrapped_lines_never_split_a_tag(line in line_strategy()) {
        let layout = Layout::new("", 0, "\n", 40);
        for segment in layout.format_wrapped(&line).lines() {
            prop_assert!(balanced(segment), "unbalanced segment {:?}", segment);
        }
    }

    #[test]
    fn indentation_prefixes_every_segment(line in line_strategy()) {
        let layout = Layout::new("  ", 2, "\n", 60);
        for segment in layout.format_wrapped(&line).lines() {
            prop_assert!(segment.starts_with("    "));
            prop_assert!(!segment[4..].starts_with(' '));
        }
    }

    #[test]
    fn short_lines_are_left_alone(line in "[a-z ]{0,40}") {
        let layout = Layout::new("\t", 1, "\n", 80);
        prop_assert_eq!(layout.format_wrapped(&line), format!("\t{line}\n"));
    }
}
