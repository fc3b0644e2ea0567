use bank_mail_extract::*;
use std::path::PathBuf;

const GMAIL_JSON: &str = r#"{
  "id": "18c2f0a9",
  "threadId": "18c2f0a9",
  "payload": {
    "partId": "",
    "mimeType": "multipart/alternative",
    "filename": "",
    "headers": [
      {"name": "From", "value": "transactionalert@indusind.com"},
      {"name": "Date", "value": "Sun, 28 Sep 2025 21:01:28 +0530"}
    ],
    "body": {"size": 0},
    "parts": [
      {
        "partId": "0",
        "mimeType": "text/plain",
        "headers": [],
        "body": {"size": 16, "data": "Q2FyZCBlbmRpbmcgMDkxOQ"}
      },
      {
        "partId": "1",
        "mimeType": "text/html",
        "body": {"size": 25, "data": "PHA-SGVsbG8gPGI-V29ybGQ8L2I-PC9wPg"}
      }
    ]
  }
}"#;

const EML: &[u8] = b"From: alerts@bank.example\r\n\
Subject: Transaction Alert\r\n\
Date: Sun, 28 Sep 2025 21:01:28 +0530\r\n\
Message-ID: <abc123@bank.example>\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/alternative; boundary=\"XYZ\"\r\n\
\r\n\
--XYZ\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
Card ending 0919 used\r\n\
--XYZ\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<p>Card ending 0919 used</p>\r\n\
--XYZ--\r\n";

/// Scratch directory removed on drop
struct ScratchDir(PathBuf);

impl ScratchDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "bank-mail-extract-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        Self(path)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[test]
fn test_parse_gmail_json() {
    let message = parse_gmail_json(GMAIL_JSON).unwrap();

    assert_eq!(message.id.as_str(), "18c2f0a9");
    assert_eq!(message.mime_type(), "multipart/alternative");
    assert_eq!(message.date(), "Sun, 28 Sep 2025 21:01:28 +0530");
    assert_eq!(message.payload.children().len(), 2);
    assert_eq!(
        parse_message(&message).unwrap(),
        ParsedMessage::Content("Card ending 0919".into())
    );
}

#[test]
fn test_gmail_part_with_data_drops_children() {
    let part: GmailPart = serde_json::from_str(
        r#"{"mimeType": "text/plain", "body": {"data": "QQ"},
            "parts": [{"mimeType": "text/plain", "body": {"data": "Qg"}}]}"#,
    )
    .unwrap();
    let part = MessagePart::from(part);
    assert_eq!(part.content, PartContent::Body("QQ".into()));
}

#[test]
fn test_gmail_json_without_payload() {
    let message = parse_gmail_json(r#"{"id": "x"}"#).unwrap();
    assert_eq!(message.payload.content, PartContent::Empty);
    assert_eq!(
        parse_message(&message).unwrap(),
        ParsedMessage::Unsupported(String::new())
    );
}

#[test]
fn test_parse_eml() {
    let message = parse_eml("fallback", EML).unwrap();

    assert_eq!(message.id.as_str(), "abc123@bank.example");
    assert_eq!(message.mime_type(), "multipart/alternative");
    assert_eq!(message.header("Subject"), Some("Transaction Alert"));

    let children = message.payload.children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].mime_type, "text/plain");
    assert_eq!(children[1].mime_type, "text/html");

    assert_eq!(
        parse_message(&message).unwrap(),
        ParsedMessage::Content("Card ending 0919 used".into())
    );
}

#[test]
fn test_parse_eml_single_part_uses_fallback_id() {
    let raw = b"From: a@b.com\r\nSubject: Hi\r\n\r\nCard 4821 charged";
    let message = parse_eml("export-7", raw).unwrap();

    assert_eq!(message.id.as_str(), "export-7");
    assert_eq!(message.mime_type(), "text/plain");
    assert_eq!(
        parse_message(&message).unwrap(),
        ParsedMessage::Content("Card 4821 charged".into())
    );
}

#[test]
fn test_directory_source() {
    let dir = ScratchDir::new("dir-source");
    std::fs::write(dir.0.join("b.eml"), EML).unwrap();
    std::fs::write(dir.0.join("a.json"), GMAIL_JSON).unwrap();
    std::fs::write(dir.0.join("notes.txt"), "ignored").unwrap();

    let mut source = DirectorySource::new(&dir.0);
    let handles = source.search("(after:2025-09-01 before:2025-09-30)").unwrap();

    assert_eq!(handles.len(), 2);
    assert_eq!(handles[0].id.as_str(), "a");
    assert_eq!(handles[1].id.as_str(), "b");

    let first = source.fetch(&handles[0]).unwrap();
    assert_eq!(first.id.as_str(), "18c2f0a9");
    let second = source.fetch(&handles[1]).unwrap();
    assert_eq!(second.id.as_str(), "abc123@bank.example");
}

#[test]
fn test_directory_source_bad_json_is_fetch_error() {
    let dir = ScratchDir::new("bad-json");
    std::fs::write(dir.0.join("broken.json"), "{not json").unwrap();

    let mut source = DirectorySource::new(&dir.0);
    let handles = source.search("").unwrap();
    assert!(matches!(
        source.fetch(&handles[0]),
        Err(ExtractError::Fetch { .. })
    ));
}

#[test]
fn test_directory_source_missing_root() {
    let mut source = DirectorySource::new("/nonexistent/exports");
    assert!(matches!(source.search(""), Err(ExtractError::Fetch { .. })));
}
