//! Signing options given as a loosely typed mapping.
//!
//! ```json
//! {
//!   "method": "GET",
//!   "path": "/?Param2=value2&Param1=value1",
//!   "service": "service",
//!   "region": "us-east-1",
//!   "headers": { "X-Amz-Date": "20150830T123600Z", "host": "example.amazonaws.com" },
//!   "body": "",
//!   "credentials": { "accessKeyId": "AKIDEXAMPLE", "secretKey": "..." }
//! }
//! ```

use awsig_core::{Error, Result};
use serde_json::{Map, Value};

use crate::{Credential, SigningRequest};

const METHOD: &str = "method";
const PATH: &str = "path";
const SERVICE: &str = "service";
const REGION: &str = "region";
const HEADERS: &str = "headers";
const BODY: &str = "body";
const CREDENTIALS: &str = "credentials";
const ACCESS_KEY_ID: &str = "accessKeyId";
const SECRET_KEY: &str = "secretKey";
const SESSION_TOKEN: &str = "sessionToken";

const REQUIRED_KEYS: &[&str] = &[METHOD, PATH, SERVICE, REGION, HEADERS, BODY];
const REQUIRED_CREDENTIAL_KEYS: &[&str] = &[SECRET_KEY, ACCESS_KEY_ID];

/// Validated signing options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// The request to sign.
    pub request: SigningRequest,
    /// Credential given inline, if any.
    pub credential: Option<Credential>,
}

impl Options {
    /// Parse options whose credential is passed to the signer separately.
    ///
    /// An inline `credentials` entry is still validated and returned.
    pub fn parse(value: &Value) -> Result<Self> {
        Self::parse_inner(value, false)
    }

    /// Parse options that must carry `credentials` inline.
    pub fn parse_with_credentials(value: &Value) -> Result<Self> {
        Self::parse_inner(value, true)
    }

    fn parse_inner(value: &Value, require_credentials: bool) -> Result<Self> {
        let map = as_mapping(value, "options")?;

        let mut required = REQUIRED_KEYS.to_vec();
        if require_credentials {
            required.push(CREDENTIALS);
        }
        check_required_keys(map, &required, "options")?;

        let credential = get(map, CREDENTIALS).map(parse_credential).transpose()?;

        let headers = parse_headers(get(map, HEADERS).unwrap_or(&Value::Null))?;
        let body = parse_body(get(map, BODY).unwrap_or(&Value::Null))?;
        let request = SigningRequest::new(
            string_field(map, METHOD)?,
            string_field(map, PATH)?,
            headers,
            body,
            string_field(map, SERVICE)?,
            string_field(map, REGION)?,
        )?;

        Ok(Self {
            request,
            credential,
        })
    }
}

/// Check that `map` holds every key in `keys`, ignoring case.
///
/// A key whose value is `null` counts as missing. All missing keys are
/// reported in a single error.
pub fn check_required_keys(map: &Map<String, Value>, keys: &[&str], what: &str) -> Result<()> {
    if keys.is_empty() {
        return Err(Error::request_invalid("required keys cannot be empty"));
    }

    let missing = keys
        .iter()
        .filter(|k| get(map, k).is_none())
        .map(|k| k.to_string())
        .collect::<Vec<_>>();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::missing_keys_in(what, missing))
    }
}

fn as_mapping<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    let map = value
        .as_object()
        .ok_or_else(|| Error::request_invalid(format!("{what} has to be a mapping")))?;
    if map.is_empty() {
        return Err(Error::request_invalid(format!(
            "{what} cannot be an empty mapping"
        )));
    }
    Ok(map)
}

/// Case-insensitive lookup, `null` is treated as absent.
fn get<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
        .filter(|v| !v.is_null())
}

fn string_field<'a>(map: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    get(map, key)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::request_invalid(format!("`{key}` must be a string")))
}

fn parse_headers(value: &Value) -> Result<Vec<(String, String)>> {
    let map = value
        .as_object()
        .ok_or_else(|| Error::request_invalid("`headers` must be a mapping"))?;

    map.iter()
        .map(|(k, v)| Ok((k.clone(), header_value(k, v)?)))
        .collect()
}

fn header_value(name: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Array(values) => values
            .iter()
            .map(|v| header_value(name, v))
            .collect::<Result<Vec<_>>>()
            .map(|vs| vs.join(",")),
        Value::Null | Value::Object(_) => Err(Error::request_invalid(format!(
            "header `{name}` has an unsupported value"
        ))),
    }
}

fn parse_body(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::String(s) => Ok(s.as_bytes().to_vec()),
        Value::Array(bytes) => bytes
            .iter()
            .map(|b| {
                b.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| Error::request_invalid("`body` must be a string or bytes"))
            })
            .collect(),
        _ => Err(Error::request_invalid("`body` must be a string or bytes")),
    }
}

fn parse_credential(value: &Value) -> Result<Credential> {
    let map = value
        .as_object()
        .ok_or_else(|| Error::credential_invalid("`credentials` has to be a mapping"))?;
    if map.is_empty() {
        return Err(Error::credential_invalid(
            "`credentials` cannot be an empty mapping",
        ));
    }
    check_required_keys(map, REQUIRED_CREDENTIAL_KEYS, CREDENTIALS)?;

    let field = |key: &str| -> Result<String> {
        get(map, key)
            .and_then(Value::as_str)
            .map(|s| s.to_string())
            .ok_or_else(|| Error::credential_invalid(format!("`{key}` must be a string")))
    };

    Ok(Credential {
        access_key_id: field(ACCESS_KEY_ID)?,
        secret_access_key: field(SECRET_KEY)?,
        session_token: get(map, SESSION_TOKEN)
            .and_then(Value::as_str)
            .map(|s| s.to_string()),
    })
}
