use bank_mail_extract::*;

fn text(mime_type: &str, body: &str) -> MessagePart {
    MessagePart::leaf(mime_type, encode(body.as_bytes()))
}

#[test]
fn test_none_is_empty() {
    assert_eq!(extract_all_text(None).unwrap(), "");
}

#[test]
fn test_leaf_equals_decoded_body() {
    let part = text("text/plain", "Card ending 0919");
    let expected = to_plain_text(&decode(part.body().unwrap()).unwrap(), "text/plain").unwrap();
    assert_eq!(extract_all_text(Some(&part)).unwrap(), expected);
}

#[test]
fn test_leaf_html_is_converted() {
    let part = text("text/html", "<p>Hello</p>");
    let result = extract_all_text(Some(&part)).unwrap();
    assert!(result.contains("Hello"));
    assert!(!result.contains("<p>"));
}

#[test]
fn test_container_concatenates_in_order() {
    let part = MessagePart::container(
        "multipart/mixed",
        vec![
            text("text/plain", "one "),
            MessagePart::container("multipart/related", vec![text("text/plain", "two ")]),
            text("text/plain", "three"),
        ],
    );
    assert_eq!(extract_all_text(Some(&part)).unwrap(), "one two three");
}

#[test]
fn test_body_wins_over_children() {
    let part = MessagePart::new(
        "text/plain",
        Some(encode(b"leaf")),
        vec![text("text/plain", "ignored")],
    );
    assert_eq!(extract_all_text(Some(&part)).unwrap(), "leaf");
}

#[test]
fn test_empty_part() {
    let part = MessagePart::new("application/pdf", None, Vec::new());
    assert_eq!(part.content, PartContent::Empty);
    assert_eq!(extract_all_text(Some(&part)).unwrap(), "");
}

#[test]
fn test_child_decode_error_propagates() {
    let part = MessagePart::container(
        "multipart/mixed",
        vec![text("text/plain", "fine"), MessagePart::leaf("text/plain", "!!!!")],
    );
    assert!(matches!(
        extract_all_text(Some(&part)),
        Err(ExtractError::Decode(_))
    ));
}

#[test]
fn test_find_first_by_type_depth_first() {
    let parts = vec![
        MessagePart::container(
            "multipart/related",
            vec![text("text/html", "nested html"), text("text/plain", "nested plain")],
        ),
        text("text/plain", "sibling plain"),
    ];
    let found = find_first_by_type(&parts, "text/plain").unwrap();
    assert_eq!(extract_all_text(Some(found)).unwrap(), "nested plain");
}

#[test]
fn test_find_first_by_type_matches_container() {
    let parts = vec![MessagePart::container(
        "multipart/alternative",
        vec![text("text/plain", "inner")],
    )];
    let found = find_first_by_type(&parts, "multipart/alternative").unwrap();
    assert_eq!(found.children().len(), 1);
}

#[test]
fn test_find_first_by_type_exact_match() {
    let parts = vec![text("text/plain; charset=utf-8", "x")];
    assert!(find_first_by_type(&parts, "text/plain").is_none());
    assert!(find_first_by_type(&[], "text/plain").is_none());
}
