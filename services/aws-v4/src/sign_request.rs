use std::fmt::{Debug, Formatter};

use awsig_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use awsig_core::time::{format_iso8601, now, DateTime};
use awsig_core::{Error, Result};
use http::header::{self, HeaderMap};
use http::request::Parts;
use http::HeaderValue;
use log::debug;

use crate::canonical_request::{canonicalize_with, CanonicalRequest};
use crate::constants::{
    ALGORITHM, AWS4_REQUEST, DATE, S3_SERVICE, UNSIGNED_PAYLOAD, X_AMZ_CONTENT_SHA_256,
    X_AMZ_DATE, X_AMZ_SECURITY_TOKEN,
};
use crate::{Config, Credential, SigningRequest};

/// Key derived from the secret access key, scoped to a date, region and service.
///
/// Never leaves this module.
pub(crate) struct SigningKey(Vec<u8>);

impl Debug for SigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(***)")
    }
}

/// Derive the signing key through the HMAC chain:
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
pub(crate) fn derive_signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> SigningKey {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    let sign_request = hmac_sha256(sign_service.as_slice(), AWS4_REQUEST.as_bytes());

    SigningKey(sign_request)
}

/// Credential scope: `20220313/<region>/<service>/aws4_request`
pub fn credential_scope(date: &str, region: &str, service: &str) -> String {
    format!("{date}/{region}/{service}/{AWS4_REQUEST}")
}

/// Build the string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(
    timestamp: &str,
    region: &str,
    service: &str,
    canonical_request: &str,
) -> String {
    let date = timestamp.get(..8).unwrap_or(timestamp);

    format!(
        "{ALGORITHM}\n{timestamp}\n{}\n{}",
        credential_scope(date, region, service),
        hex_sha256(canonical_request.as_bytes())
    )
}

/// Sign the string to sign with a key derived from `secret`.
///
/// Returns the hex encoded signature.
pub fn sign(secret: &str, date: &str, region: &str, service: &str, string_to_sign: &str) -> String {
    let key = derive_signing_key(secret, date, region, service);
    hex_hmac_sha256(&key.0, string_to_sign.as_bytes())
}

/// Format the `Authorization` header value.
pub fn authorization_header(
    access_key_id: &str,
    date: &str,
    region: &str,
    service: &str,
    signed_headers: &str,
    signature: &str,
) -> String {
    format!(
        "{ALGORITHM} Credential={access_key_id}/{}, SignedHeaders={signed_headers}, Signature={signature}",
        credential_scope(date, region, service)
    )
}

/// Everything produced by one signing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningOutput {
    canonical_request: CanonicalRequest,
    string_to_sign: String,
    credential_scope: String,
    signature: String,
    authorization: String,
}

impl SigningOutput {
    /// The canonical request that has been signed.
    pub fn canonical_request(&self) -> &CanonicalRequest {
        &self.canonical_request
    }

    /// The string to sign.
    pub fn string_to_sign(&self) -> &str {
        &self.string_to_sign
    }

    /// The credential scope.
    pub fn credential_scope(&self) -> &str {
        &self.credential_scope
    }

    /// Hex encoded signature.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// Insert the `Authorization` header into `headers`.
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<()> {
        let mut value = HeaderValue::from_str(&self.authorization)?;
        value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, value);
        Ok(())
    }
}

/// Signer that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// The signer holds no per-request state and can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Signer {
    config: Config,

    time: Option<DateTime>,
}

impl Signer {
    /// Create a new signer.
    pub fn new(config: Config) -> Self {
        Self { config, time: None }
    }

    /// Specify the signing time used when a request carries no date.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Config used by this signer.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole pipeline for a validated request.
    pub fn sign(&self, req: &SigningRequest, cred: &Credential) -> Result<SigningOutput> {
        cred.check()?;

        let creq = canonicalize_with(req, &self.config);
        debug!("calculated signed headers: {}", creq.signed_headers());

        let scope = credential_scope(req.date(), req.region(), req.service());
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(
            req.timestamp(),
            req.region(),
            req.service(),
            creq.as_str(),
        );
        debug!("calculated string to sign: {string_to_sign}");

        let signature = sign(
            &cred.secret_access_key,
            req.date(),
            req.region(),
            req.service(),
            &string_to_sign,
        );
        let authorization = authorization_header(
            &cred.access_key_id,
            req.date(),
            req.region(),
            req.service(),
            creq.signed_headers(),
            &signature,
        );

        Ok(SigningOutput {
            canonical_request: creq,
            string_to_sign,
            credential_scope: scope,
            signature,
            authorization,
        })
    }

    /// Sign an http request in place.
    ///
    /// Before signing, the following headers are inserted if absent:
    ///
    /// - `host` from the uri's authority
    /// - `x-amz-date` from the signing time, unless a `date` header exists
    /// - `x-amz-content-sha256: UNSIGNED-PAYLOAD` for s3
    /// - `x-amz-security-token` if the credential carries a session token
    ///
    /// The region comes from [`Config::region`]. The `Authorization` header
    /// is written back as a sensitive value.
    pub fn sign_http(
        &self,
        parts: &mut Parts,
        body: &[u8],
        service: &str,
        cred: &Credential,
    ) -> Result<SigningOutput> {
        let region = self
            .config
            .region
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("region is required to sign http requests"))?;
        cred.check()?;
        canonicalize_http_headers(parts, service, cred, self.time.unwrap_or_else(now))?;

        let req = SigningRequest::from_http(parts, body, service, region)?;
        let output = self.sign(&req, cred)?;
        output.apply(&mut parts.headers)?;

        Ok(output)
    }
}

fn canonicalize_http_headers(
    parts: &mut Parts,
    service: &str,
    cred: &Credential,
    now: DateTime,
) -> Result<()> {
    // Insert HOST header if not present.
    if parts.headers.get(header::HOST).is_none() {
        if let Some(authority) = parts.uri.authority() {
            let value = HeaderValue::from_str(authority.as_str()).map_err(|e| {
                Error::unexpected("failed to parse authority as header value").with_source(e)
            })?;
            parts.headers.insert(header::HOST, value);
        }
    }

    // Insert DATE header if not present.
    if parts.headers.get(X_AMZ_DATE).is_none() && parts.headers.get(DATE).is_none() {
        let value = HeaderValue::try_from(format_iso8601(now))?;
        parts.headers.insert(X_AMZ_DATE, value);
    }

    // Insert X_AMZ_CONTENT_SHA_256 header if not present.
    if service == S3_SERVICE && parts.headers.get(X_AMZ_CONTENT_SHA_256).is_none() {
        parts.headers.insert(
            X_AMZ_CONTENT_SHA_256,
            HeaderValue::from_static(UNSIGNED_PAYLOAD),
        );
    }

    // Insert X_AMZ_SECURITY_TOKEN header if security token exists.
    if let Some(token) = &cred.session_token {
        let mut value = HeaderValue::from_str(token)?;
        // Set token value sensitive to valid leaking.
        value.set_sensitive(true);
        parts.headers.insert(X_AMZ_SECURITY_TOKEN, value);
    }

    Ok(())
}
