use bank_mail_extract::*;

fn card(name: &str, last4: &str) -> CardIdentity {
    CardIdentity {
        instrument_name: name.into(),
        bank_name: "IndusInd".into(),
        last4: last4.into(),
        from_email: "transactionalert@indusind.com".into(),
        subject_patterns: vec!["Transaction Alert".into()],
        exclude_words: Vec::new(),
    }
}

const CONTENT: &str = "The transaction on your IndusInd Bank Credit Card ending 0919 \
                       for INR 776.45 on 28-09-2025 09:01:28 pm at Eazydiner Private Limi is Approved.";

#[test]
fn test_single_match() {
    let txns = match_transactions("m1", "Sun, 28 Sep 2025", "text/html", CONTENT, &[card("Legend", "0919")]);

    assert_eq!(txns.len(), 1);
    let txn = &txns[0];
    assert_eq!(txn.last4, "0919");
    assert_eq!(txn.body, CONTENT);
    assert_eq!(txn.id, "m1");
    assert_eq!(txn.date, "Sun, 28 Sep 2025");
    assert_eq!(txn.mime_type, "text/html");
    assert_eq!(txn.instrument_name, "Legend");
    assert_eq!(txn.bank_name, "IndusInd");
    assert!(txn.amount.is_empty());
    assert!(txn.recipient.is_empty());
}

#[test]
fn test_no_match() {
    assert!(match_transactions("m1", "", "text/plain", CONTENT, &[card("Other", "1234")]).is_empty());
}

#[test]
fn test_order_follows_cards() {
    let content = "Card 4821 refunded, card 0919 charged";
    let cards = [card("First", "0919"), card("Second", "4821")];
    let txns = match_transactions("m1", "", "text/plain", content, &cards);

    let names: Vec<&str> = txns.iter().map(|t| t.instrument_name.as_str()).collect();
    assert_eq!(names, ["First", "Second"]);
}

#[test]
fn test_shared_last4_yields_one_per_card() {
    let cards = [card("Primary", "0919"), card("Add-on", "0919")];
    let txns = match_transactions("m1", "", "text/plain", CONTENT, &cards);
    assert_eq!(txns.len(), 2);
}

#[test]
fn test_substring_inside_longer_number() {
    let txns = match_transactions("m1", "", "text/plain", "Ref 1209190", &[card("Legend", "0919")]);
    assert_eq!(txns.len(), 1);
}

#[test]
fn test_match_message_uses_headers() {
    let message = Message {
        id: MessageId::new("18c2"),
        headers: vec![("Date".into(), "Sun, 28 Sep 2025 21:01:28 +0530".into())],
        payload: MessagePart::leaf("multipart/alternative", "unused"),
    };
    let txns = match_message(&message, CONTENT, &[card("Legend", "0919")]);

    assert_eq!(txns[0].id, "18c2");
    assert_eq!(txns[0].date, "Sun, 28 Sep 2025 21:01:28 +0530");
    assert_eq!(txns[0].mime_type, "multipart/alternative");
}
