//! S3 REST adapter for [`ObjectStoreService`] using signed `reqwest` calls.

use chrono::{DateTime, Utc};
use platform_host::{
    unix_time_ms_now, ObjectStoreConfig, ObjectStoreFuture, ObjectStoreService, PutObjectRequest,
    StoredObject,
};
use reqwest::{Client, Method, RequestBuilder, Response};

use super::{
    listing::{describe_error_response, parse_listing_page},
    signing::{canonical_query, canonical_uri, hex_sha256, sign, SigningInput, EMPTY_PAYLOAD_SHA256},
};

/// Upper bound on listing pages fetched for one `list_objects` call.
const MAX_LISTING_PAGES: usize = 1_000;

#[derive(Debug, Clone)]
/// Object store backed by an S3-compatible bucket over HTTPS.
///
/// Requests use virtual-hosted addressing (`https://<bucket>.<host>/<key>`) and are signed
/// with the configured access key. There are no retries.
pub struct S3ObjectStoreService {
    config: ObjectStoreConfig,
    client: Client,
}

impl S3ObjectStoreService {
    /// Creates an adapter for `config`.
    pub fn new(config: ObjectStoreConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Returns the connection settings this adapter signs with.
    pub fn config(&self) -> &ObjectStoreConfig {
        &self.config
    }

    fn signed_request(
        &self,
        method: Method,
        key: &str,
        query: &[(&str, &str)],
        payload_sha256: &str,
    ) -> Result<RequestBuilder, String> {
        let host = self.config.bucket_host();
        let uri = canonical_uri(key);
        let query = canonical_query(query);
        let signed = sign(
            &self.config,
            &SigningInput {
                method: method.as_str(),
                host: &host,
                canonical_uri: &uri,
                canonical_query: &query,
                payload_sha256,
                signed_at: now_utc(),
            },
        )?;

        let url = if query.is_empty() {
            format!("https://{host}{uri}")
        } else {
            format!("https://{host}{uri}?{query}")
        };

        Ok(self
            .client
            .request(method, url)
            .header("x-amz-date", signed.amz_date)
            .header("x-amz-content-sha256", payload_sha256)
            .header("authorization", signed.authorization))
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> Result<super::listing::ListingPage, String> {
        let mut query = vec![("list-type", "2"), ("prefix", prefix)];
        if let Some(token) = continuation_token {
            query.push(("continuation-token", token));
        }

        let response = self
            .signed_request(Method::GET, "", &query, EMPTY_PAYLOAD_SHA256)?
            .send()
            .await
            .map_err(|e| format!("list_objects request failed: {e}"))?;
        let body = success_body(response).await?;
        parse_listing_page(&body)
    }
}

fn now_utc() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(unix_time_ms_now() as i64).unwrap_or_default()
}

async fn success_body(response: Response) -> Result<String, String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| format!("failed to read object store response: {e}"))?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(describe_error_response(status.as_u16(), &body))
    }
}

impl ObjectStoreService for S3ObjectStoreService {
    fn list_objects<'a>(
        &'a self,
        prefix: &'a str,
    ) -> ObjectStoreFuture<'a, Result<Vec<StoredObject>, String>> {
        Box::pin(async move {
            let mut objects = Vec::new();
            let mut token: Option<String> = None;
            for _ in 0..MAX_LISTING_PAGES {
                let page = self.list_page(prefix, token.as_deref()).await?;
                objects.extend(page.objects);
                match page.continuation_token {
                    Some(next) => token = Some(next),
                    None => return Ok(objects),
                }
            }
            Err(format!(
                "listing `{prefix}` did not finish within {MAX_LISTING_PAGES} pages"
            ))
        })
    }

    fn put_object<'a>(
        &'a self,
        request: &'a PutObjectRequest,
    ) -> ObjectStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let payload_sha256 = hex_sha256(&request.bytes);
            let content_type = if request.content_type.trim().is_empty() {
                "application/octet-stream"
            } else {
                request.content_type.as_str()
            };
            let response = self
                .signed_request(Method::PUT, &request.key, &[], &payload_sha256)?
                .header("content-type", content_type)
                .body(request.bytes.clone())
                .send()
                .await
                .map_err(|e| format!("put_object `{}` failed: {e}", request.key))?;
            success_body(response).await.map(|_| ())
        })
    }

    fn delete_object<'a>(&'a self, key: &'a str) -> ObjectStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let response = self
                .signed_request(Method::DELETE, key, &[], EMPTY_PAYLOAD_SHA256)?
                .send()
                .await
                .map_err(|e| format!("delete_object `{key}` failed: {e}"))?;
            success_body(response).await.map(|_| ())
        })
    }
}
