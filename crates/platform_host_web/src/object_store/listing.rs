//! `ListObjectsV2` and S3 error response decoding.

use chrono::DateTime;
use platform_host::StoredObject;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListBucketResult {
    #[serde(default)]
    contents: Vec<ListedObject>,
    #[serde(default)]
    is_truncated: bool,
    #[serde(default)]
    next_continuation_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListedObject {
    key: String,
    last_modified: String,
    #[serde(default)]
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct S3ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// One decoded listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListingPage {
    pub objects: Vec<StoredObject>,
    /// Token for the next page; `None` once the listing is complete.
    pub continuation_token: Option<String>,
}

fn parse_last_modified(raw: &str) -> Result<u64, String> {
    let parsed = DateTime::parse_from_rfc3339(raw.trim())
        .map_err(|e| format!("invalid LastModified `{raw}`: {e}"))?;
    u64::try_from(parsed.timestamp_millis())
        .map_err(|_| format!("LastModified `{raw}` predates the unix epoch"))
}

/// Decodes one `ListObjectsV2` response body.
pub(crate) fn parse_listing_page(xml: &str) -> Result<ListingPage, String> {
    let result: ListBucketResult =
        quick_xml::de::from_str(xml).map_err(|e| format!("malformed listing response: {e}"))?;

    let objects = result
        .contents
        .into_iter()
        .map(|listed| {
            Ok(StoredObject {
                last_modified_unix_ms: parse_last_modified(&listed.last_modified)?,
                key: listed.key,
                size_bytes: listed.size,
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    let continuation_token = if result.is_truncated {
        result
            .next_continuation_token
            .filter(|token| !token.is_empty())
    } else {
        None
    };

    Ok(ListingPage {
        objects,
        continuation_token,
    })
}

/// Renders a failed response as a single readable message.
pub(crate) fn describe_error_response(status: u16, body: &str) -> String {
    match quick_xml::de::from_str::<S3ErrorBody>(body) {
        Ok(error) if !error.code.is_empty() => {
            if error.message.is_empty() {
                format!("object store request failed ({status}): {}", error.code)
            } else {
                format!(
                    "object store request failed ({status}): {}: {}",
                    error.code, error.message
                )
            }
        }
        _ => format!("object store request failed ({status})"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const TRUNCATED_PAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>photos</Name>
  <Prefix>uploads/</Prefix>
  <KeyCount>2</KeyCount>
  <MaxKeys>2</MaxKeys>
  <IsTruncated>true</IsTruncated>
  <NextContinuationToken>1ueGcxLPRx1Tr/XYExHnhbYLgveDs2J/wm36Hy4vbOwM=</NextContinuationToken>
  <Contents>
    <Key>uploads/1700000000000_cat.jpg</Key>
    <LastModified>2023-11-14T22:13:20.000Z</LastModified>
    <ETag>"abc"</ETag>
    <Size>2048</Size>
    <StorageClass>STANDARD</StorageClass>
  </Contents>
  <Contents>
    <Key>uploads/1700000001000_notes.txt</Key>
    <LastModified>2023-11-14T22:13:21.000Z</LastModified>
    <Size>12</Size>
  </Contents>
</ListBucketResult>"#;

    #[test]
    fn parses_objects_and_continuation_token() {
        let page = parse_listing_page(TRUNCATED_PAGE).expect("parse");

        assert_eq!(
            page.objects,
            vec![
                StoredObject {
                    key: "uploads/1700000000000_cat.jpg".to_string(),
                    last_modified_unix_ms: 1_700_000_000_000,
                    size_bytes: Some(2048),
                },
                StoredObject {
                    key: "uploads/1700000001000_notes.txt".to_string(),
                    last_modified_unix_ms: 1_700_000_001_000,
                    size_bytes: Some(12),
                },
            ]
        );
        assert_eq!(
            page.continuation_token.as_deref(),
            Some("1ueGcxLPRx1Tr/XYExHnhbYLgveDs2J/wm36Hy4vbOwM=")
        );
    }

    #[test]
    fn empty_final_page_has_no_objects_or_token() {
        let xml = r#"<ListBucketResult><Name>photos</Name><KeyCount>0</KeyCount><IsTruncated>false</IsTruncated></ListBucketResult>"#;
        let page = parse_listing_page(xml).expect("parse");
        assert!(page.objects.is_empty());
        assert_eq!(page.continuation_token, None);
    }

    #[test]
    fn bad_timestamp_is_an_error() {
        let xml = r#"<ListBucketResult><IsTruncated>false</IsTruncated><Contents><Key>a</Key><LastModified>yesterday</LastModified></Contents></ListBucketResult>"#;
        let err = parse_listing_page(xml).expect_err("invalid timestamp");
        assert!(err.contains("invalid LastModified"));
    }

    #[test]
    fn error_bodies_surface_code_and_message() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>AccessDenied</Code><Message>Access Denied</Message><RequestId>1</RequestId></Error>"#;
        assert_eq!(
            describe_error_response(403, body),
            "object store request failed (403): AccessDenied: Access Denied"
        );
        assert_eq!(
            describe_error_response(500, "gateway exploded"),
            "object store request failed (500)"
        );
    }
}
