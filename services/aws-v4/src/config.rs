use std::collections::HashMap;
use std::env;
use std::fmt::{Debug, Formatter};

use awsig_core::utils::Redact;
use log::debug;

use crate::constants::*;
use crate::Credential;

/// Config for the aws v4 signer.
#[derive(Clone, Default)]
pub struct Config {
    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`]
    ///
    /// Required by [`Signer::sign_http`](crate::Signer::sign_http).
    pub region: Option<String>,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SECRET_ACCESS_KEY`]
    pub secret_access_key: Option<String>,
    /// `session_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SESSION_TOKEN`]
    pub session_token: Option<String>,
    /// Exclude `content-type` from the signed headers.
    ///
    /// Older signers treated `content-type` as unsignable. AWS expects it to be
    /// signed, so this is off by default.
    ///
    /// - this field if it's `true`
    /// - env value: [`AWSIG_EXCLUDE_CONTENT_TYPE`] set to `true`
    pub exclude_content_type: bool,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("exclude_content_type", &self.exclude_content_type)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Fields already set take precedence over the environment.
    pub fn from_env(mut self) -> Self {
        let envs = env::vars().collect::<HashMap<_, _>>();

        if self.region.is_none() {
            self.region = envs.get(AWS_REGION).cloned();
        }
        if self.access_key_id.is_none() {
            self.access_key_id = envs.get(AWS_ACCESS_KEY_ID).cloned();
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = envs.get(AWS_SECRET_ACCESS_KEY).cloned();
        }
        if self.session_token.is_none() {
            self.session_token = envs.get(AWS_SESSION_TOKEN).cloned();
        }
        if let Some(v) = envs.get(AWSIG_EXCLUDE_CONTENT_TYPE) {
            self.exclude_content_type |= v.eq_ignore_ascii_case("true");
        }

        debug!("config loaded from env: {self:?}");
        self
    }

    /// Build a credential from the static keys in this config.
    ///
    /// Returns `None` if either key is missing.
    pub fn credential(&self) -> Option<Credential> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(ak), Some(sk)) => Some(Credential {
                access_key_id: ak.clone(),
                secret_access_key: sk.clone(),
                session_token: self.session_token.clone(),
            }),
            _ => None,
        }
    }

    /// Check if a lowercased header name takes part in the signature.
    ///
    /// `x-amz-*` headers are always signed.
    pub fn is_signable_header(&self, name: &str) -> bool {
        if name.starts_with(X_AMZ_PREFIX) {
            return true;
        }
        if self.exclude_content_type && name == CONTENT_TYPE {
            return false;
        }
        !UNSIGNABLE_HEADERS.contains(&name)
    }
}
