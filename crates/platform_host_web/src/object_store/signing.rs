//! AWS Signature Version 4 request signing for the S3 REST API.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use platform_host::ObjectStoreConfig;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// SHA-256 of an empty payload, used for bodiless requests.
pub(crate) const EMPTY_PAYLOAD_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

/// Parts of one request that take part in the signature.
pub(crate) struct SigningInput<'a> {
    pub method: &'a str,
    pub host: &'a str,
    pub canonical_uri: &'a str,
    pub canonical_query: &'a str,
    pub payload_sha256: &'a str,
    pub signed_at: DateTime<Utc>,
}

/// Header values to attach to a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SignedHeaders {
    pub authorization: String,
    pub amz_date: String,
}

pub(crate) fn hex_sha256(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, String> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|e| format!("invalid signing key: {e}"))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Derives the per-day, per-region signing key.
pub(crate) fn signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, String> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

/// Encodes an object key as a canonical URI path, keeping `/` separators.
pub(crate) fn canonical_uri(key: &str) -> String {
    let encoded: Vec<String> = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("/{}", encoded.join("/"))
}

/// Builds the canonical (sorted, fully encoded) query string.
pub(crate) fn canonical_query(pairs: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = pairs
        .iter()
        .map(|(name, value)| {
            (
                urlencoding::encode(name).into_owned(),
                urlencoding::encode(value).into_owned(),
            )
        })
        .collect();
    encoded.sort();
    encoded
        .into_iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

pub(crate) fn canonical_request(input: &SigningInput<'_>, amz_date: &str) -> String {
    format!(
        "{method}\n{uri}\n{query}\nhost:{host}\nx-amz-content-sha256:{payload}\nx-amz-date:{amz_date}\n\n{signed}\n{payload}",
        method = input.method,
        uri = input.canonical_uri,
        query = input.canonical_query,
        host = input.host,
        payload = input.payload_sha256,
        signed = SIGNED_HEADERS,
    )
}

/// Signs one request and returns the headers to send with it.
pub(crate) fn sign(
    config: &ObjectStoreConfig,
    input: &SigningInput<'_>,
) -> Result<SignedHeaders, String> {
    let amz_date = input.signed_at.format("%Y%m%dT%H%M%SZ").to_string();
    let date = input.signed_at.format("%Y%m%d").to_string();
    let scope = format!("{date}/{}/{SERVICE}/aws4_request", config.region);

    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        hex_sha256(canonical_request(input, &amz_date).as_bytes())
    );
    let key = signing_key(&config.secret_access_key, &date, &config.region, SERVICE)?;
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

    Ok(SignedHeaders {
        authorization: format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
            config.access_key_id
        ),
        amz_date,
    })
}
