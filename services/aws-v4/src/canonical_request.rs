use std::fmt;

use awsig_core::hash::hex_sha256;
use percent_encoding::utf8_percent_encode;

use crate::constants::{
    AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, S3_SERVICE, UNSIGNED_PAYLOAD, X_AMZ_CONTENT_SHA_256,
};
use crate::{Config, SigningRequest};

/// The canonical form of a [`SigningRequest`].
///
/// ```text
/// <method>
/// <canonical uri>
/// <canonical query string>
/// <canonical headers>
///
/// <signed headers>
/// <payload hash>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    value: String,
    signed_headers: String,
    payload_hash: String,
}

impl CanonicalRequest {
    /// The canonical request string.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Sorted, `;` joined names of the signed headers.
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// The payload hash used as the last line.
    pub fn payload_hash(&self) -> &str {
        &self.payload_hash
    }
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Canonicalize the request with the default header policy.
pub fn canonicalize(req: &SigningRequest) -> CanonicalRequest {
    canonicalize_with(req, &Config::default())
}

/// Canonicalize the request with the header policy from `config`.
pub fn canonicalize_with(req: &SigningRequest, config: &Config) -> CanonicalRequest {
    let signed: Vec<(&str, &str)> = req
        .headers()
        .iter()
        .filter(|(k, _)| config.is_signable_header(k))
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let signed_headers = signed
        .iter()
        .map(|(k, _)| *k)
        .collect::<Vec<_>>()
        .join(";");
    let payload_hash = payload_hash(req);

    // 256 is specially chosen to avoid reallocation for most requests.
    let mut s = String::with_capacity(256);
    s.push_str(req.method());
    s.push('\n');
    s.push_str(&canonical_uri(req.path()));
    s.push('\n');
    s.push_str(&canonical_query_string(req.query()));
    s.push('\n');
    for (name, value) in signed.iter() {
        s.push_str(name);
        s.push(':');
        s.push_str(&canonical_header_value(value));
        s.push('\n');
    }
    s.push('\n');
    s.push_str(&signed_headers);
    s.push('\n');
    s.push_str(&payload_hash);

    CanonicalRequest {
        value: s,
        signed_headers,
        payload_hash,
    }
}

/// Percent encode the path, leaving `/` as is.
///
/// An empty path is normalized to `/`.
pub fn canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    utf8_percent_encode(path, &AWS_URI_ENCODE_SET).to_string()
}

/// Escape every pair and sort them by `(name, value)`.
pub fn canonical_query_string(query: &[(String, String)]) -> String {
    let mut pairs = query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    pairs.sort();

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Trim the value and collapse inner whitespace into a single space.
pub fn canonical_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn payload_hash(req: &SigningRequest) -> String {
    if req.service() == S3_SERVICE {
        UNSIGNED_PAYLOAD.to_string()
    } else if let Some(v) = req.header(X_AMZ_CONTENT_SHA_256) {
        v.to_string()
    } else {
        hex_sha256(req.body())
    }
}
