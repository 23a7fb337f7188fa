use proptest::prelude::*;

use plint::core::frontmatter::parse;

proptest! {
    #[test]
    fn test_parse_never_panics(content in "\\PC*") {
        let doc = parse(&content);
        prop_assert!(doc.header_end_line <= content.matches('\n').count() + 1);
    }

    #[test]
    fn test_parse_delimited_never_panics(header in "[a-z\\-: \\t\"'\\n]{0,80}", body in "\\PC{0,80}") {
        let content = format!("---\n{header}\n---\n{body}");
        let doc = parse(&content);
        prop_assert!(doc.header_end_line >= 2);
        prop_assert_eq!(doc.body.trim(), doc.body.as_str());
    }

    #[test]
    fn test_undelimited_input_is_all_body(content in "[^-]\\PC*") {
        let doc = parse(&content);
        prop_assert!(doc.header.is_empty());
        prop_assert_eq!(doc.header_end_line, 0);
        prop_assert_eq!(doc.body, content);
    }

    #[test]
    fn test_field_lines_within_header(keys in prop::collection::vec("[a-z]{1,8}", 1..6)) {
        let header: String = keys.iter().map(|k| format!("{k}: value\n")).collect();
        let content = format!("---\n{header}---\nbody\n");
        let doc = parse(&content);
        for (_, field) in doc.header.iter() {
            prop_assert!(field.line >= 2);
            prop_assert!(field.line < doc.header_end_line);
        }
    }
}
