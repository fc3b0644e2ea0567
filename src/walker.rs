//! Recursive traversal of MIME part trees

use crate::decode::decode_part;
use crate::error::Result;
use crate::types::{MessagePart, PartContent};

/// Collect the text of a part subtree.
///
/// Leaves are decoded and converted according to their own type; containers
/// concatenate their children in order with no separator. A decode failure
/// anywhere in the subtree fails the whole extraction.
pub fn extract_all_text(part: Option<&MessagePart>) -> Result<String> {
    let Some(part) = part else {
        return Ok(String::new());
    };

    match &part.content {
        PartContent::Body(data) => decode_part(data, &part.mime_type),
        PartContent::Children(children) => {
            let mut content = String::new();
            for child in children {
                content.push_str(&extract_all_text(Some(child))?);
            }
            Ok(content)
        }
        PartContent::Empty => Ok(String::new()),
    }
}

/// Depth-first, pre-order search for the first part of exactly `mime_type`.
#[must_use]
pub fn find_first_by_type<'a>(parts: &'a [MessagePart], mime_type: &str) -> Option<&'a MessagePart> {
    for part in parts {
        if part.mime_type == mime_type {
            return Some(part);
        }
        if let Some(found) = find_first_by_type(part.children(), mime_type) {
            return Some(found);
        }
    }
    None
}
