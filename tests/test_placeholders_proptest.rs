//! Property tests for placeholder substitution and the string shape matcher.
#![cfg(feature = "proptest")]

use proptest::prelude::*;
use xref::ide::{count_placeholders, match_string_literal, substitute_placeholders};
use xref::syntax::{SyntaxKind, parse};

/// Template text without braces.
fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z ,.!]{0,12}"
}

/// A template alternating plain text and `{name}` placeholders.
fn arb_template() -> impl Strategy<Value = (String, usize)> {
    (arb_text(), prop::collection::vec(("[a-z]{1,6}", arb_text()), 0..5)).prop_map(
        |(head, parts)| {
            let mut template = head;
            for (name, text) in &parts {
                template.push('{');
                template.push_str(name);
                template.push('}');
                template.push_str(text);
            }
            (template, parts.len())
        },
    )
}

proptest! {
    #[test]
    fn counts_every_placeholder((template, n) in arb_template()) {
        prop_assert_eq!(count_placeholders(&template), n);
    }

    #[test]
    fn full_supply_leaves_no_placeholder(
        (template, n) in arb_template(),
        value in "[a-z0-9]{0,6}",
    ) {
        let args = vec![value; n];
        let out = substitute_placeholders(&template, &args);
        prop_assert_eq!(count_placeholders(&out), 0);
    }

    #[test]
    fn short_supply_keeps_remaining_placeholders(
        (template, n) in arb_template(),
        supplied in 0usize..5,
    ) {
        let supplied = supplied.min(n);
        let args = vec!["x".to_string(); supplied];
        let out = substitute_placeholders(&template, &args);
        prop_assert_eq!(count_placeholders(&out), n - supplied);
    }

    #[test]
    fn extra_arguments_are_ignored((template, n) in arb_template()) {
        let exact = vec!["v".to_string(); n];
        let extra = vec!["v".to_string(); n + 3];
        prop_assert_eq!(
            substitute_placeholders(&template, &exact),
            substitute_placeholders(&template, &extra)
        );
    }

    #[test]
    fn plain_string_literals_match_their_content(content in "[a-zA-Z0-9/_. -]{0,20}") {
        let source = format!("final x = '{content}';");
        let root = parse(&source).syntax_node();
        let literal = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::STRING_LITERAL)
            .unwrap();
        prop_assert_eq!(match_string_literal(&literal), Some(content));
    }
}
