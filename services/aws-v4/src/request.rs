use std::collections::BTreeMap;

use awsig_core::time::normalize_timestamp;
use awsig_core::{Error, Result};
use http::request::Parts;
use log::debug;
use percent_encoding::percent_decode_str;

use crate::constants::{DATE, HOST, X_AMZ_DATE};

/// The request fields that take part in a SigV4 signature.
///
/// A `SigningRequest` is validated when it's constructed and can't be
/// changed afterwards:
///
/// - header names are lowercased once, repeated names are joined with `,`
/// - a `host` header must be present
/// - an `x-amz-date` or `date` header must be present and parse as a timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningRequest {
    method: String,
    path: String,
    query: Vec<(String, String)>,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
    timestamp: String,
    region: String,
    service: String,
}

impl SigningRequest {
    /// Build a signing request from raw fields.
    ///
    /// `path` may carry a query string after `?`. Header names are matched
    /// case-insensitively.
    pub fn new<I, K, V>(
        method: &str,
        path: &str,
        headers: I,
        body: impl Into<Vec<u8>>,
        service: &str,
        region: &str,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (path, Vec::new()),
        };

        Self::build(method, path, query, headers, body.into(), service, region)
    }

    fn build<I, K, V>(
        method: &str,
        path: &str,
        query: Vec<(String, String)>,
        headers: I,
        body: Vec<u8>,
        service: &str,
        region: &str,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let method = method.trim();
        if method.is_empty() {
            return Err(Error::request_invalid("method must not be empty"));
        }
        if service.is_empty() {
            return Err(Error::request_invalid("service must not be empty"));
        }
        if region.is_empty() {
            return Err(Error::request_invalid("region must not be empty"));
        }

        let headers = normalize_headers(headers)?;
        if !headers.contains_key(HOST) {
            return Err(Error::header_missing("missing required header: host"));
        }
        let date = headers
            .get(X_AMZ_DATE)
            .or_else(|| headers.get(DATE))
            .ok_or_else(|| Error::date_missing("missing required header: x-amz-date or date"))?;
        let timestamp = normalize_timestamp(date)?;

        debug!("signing request built for {service} in {region} at {timestamp}");

        Ok(Self {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            query,
            headers,
            body,
            timestamp,
            region: region.to_string(),
            service: service.to_string(),
        })
    }

    /// Build a signing request from http::request::Parts.
    ///
    /// The uri is percent-encoded already, so its path and query pairs are
    /// decoded before they are canonicalized. The `host` header falls back
    /// to the uri's authority.
    pub fn from_http(parts: &Parts, body: &[u8], service: &str, region: &str) -> Result<Self> {
        let mut headers = Vec::with_capacity(parts.headers.len() + 1);
        for (name, value) in parts.headers.iter() {
            headers.push((name.as_str(), value.to_str()?));
        }
        if !parts.headers.contains_key(http::header::HOST) {
            if let Some(authority) = parts.uri.authority() {
                headers.push((HOST, authority.as_str()));
            }
        }

        let path = percent_decode(parts.uri.path())?;
        let query = parse_query(parts.uri.query().unwrap_or_default())
            .into_iter()
            .map(|(k, v)| Ok((percent_decode(&k)?, percent_decode(&v)?)))
            .collect::<Result<Vec<_>>>()?;

        Self::build(
            parts.method.as_str(),
            &path,
            query,
            headers,
            body.to_vec(),
            service,
            region,
        )
    }

    /// HTTP method, uppercased.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Path without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query pairs in the order they were given.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Headers keyed by lowercased name, in ascending order.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Get header value by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    /// Request payload.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Signing time in `YYYYMMDDTHHMMSSZ`.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Signing date in `YYYYMMDD`.
    pub fn date(&self) -> &str {
        &self.timestamp[..8]
    }

    /// Region of the credential scope.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Service of the credential scope.
    pub fn service(&self) -> &str {
        &self.service
    }
}

/// Lowercase header names and join repeated names with `,` in arrival order.
fn normalize_headers<I, K, V>(headers: I) -> Result<BTreeMap<String, String>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut normalized: BTreeMap<String, String> = BTreeMap::new();

    for (name, value) in headers {
        let name = name.as_ref().trim().to_ascii_lowercase();
        if name.is_empty() {
            return Err(Error::request_invalid("header name must not be empty"));
        }

        let value = value.as_ref();
        normalized
            .entry(name)
            .and_modify(|v| {
                v.push(',');
                v.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    Ok(normalized)
}

fn percent_decode(s: &str) -> Result<String> {
    percent_decode_str(s)
        .decode_utf8()
        .map(|v| v.into_owned())
        .map_err(|e| {
            Error::request_invalid(format!("uri component is not valid utf-8: {s}")).with_source(e)
        })
}

/// Split a raw query into `(name, value)` pairs.
///
/// A pair without `=` has an empty value, empty segments are skipped.
fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}
