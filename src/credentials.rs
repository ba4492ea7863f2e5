//! Credential resolution.
//!
//! The catalog API authenticates with a session JWT and scopes every call to a
//! store. Both arrive as process-start arguments (or their environment
//! fallbacks) and are resolved exactly once; the resulting bundle is immutable
//! and shared by reference afterwards.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::types::{Error, Result};

/// Message used whenever either credential is missing.
pub const MISSING_CREDENTIALS: &str = "Missing required arguments: --jwt and/or --store-id";

/// Fallback for `--jwt`.
pub const JWT_ENV: &str = "HOSTINGER_JWT";

/// Fallback for `--store-id`.
pub const STORE_ID_ENV: &str = "HOSTINGER_STORE_ID";

/// Process arguments read as `--key value` pairs.
///
/// Tokens are consumed two at a time: the first names the flag (leading `--`
/// stripped), the second is its value even when it starts with `-`. A
/// `--key=value` token carries both. Nothing is rejected, so an unknown or
/// malformed pair never hides the ones around it. Later occurrences win.
#[derive(Clone, Default)]
pub struct StartupArgs {
    pairs: Vec<(String, Option<String>)>,
}

impl StartupArgs {
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pairs = Vec::new();
        let mut tokens = args.into_iter().map(Into::into);
        while let Some(token) = tokens.next() {
            if let Some(flag) = token.strip_prefix("--") {
                if let Some((key, value)) = flag.split_once('=') {
                    pairs.push((key.to_string(), Some(value.to_string())));
                    continue;
                }
            }
            let key = token.strip_prefix("--").unwrap_or(&token).to_string();
            pairs.push((key, tokens.next()));
        }
        Self { pairs }
    }

    /// Arguments of the current process, program name excluded.
    pub fn from_env() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    /// Value of the last `key` that carried one.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, v)| k == key && v.is_some())
            .and_then(|(_, v)| v.as_deref())
    }

    /// Every pair in argument order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

impl std::fmt::Debug for StartupArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartupArgs")
            .field("keys", &self.pairs.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .finish()
    }
}

/// Auth token and store scope for the catalog API.
#[derive(Debug, Clone)]
pub struct CredentialBundle {
    token: SecretString,
    store_id: String,
}

impl CredentialBundle {
    /// Resolve the bundle from the raw `--jwt` / `--store-id` values.
    ///
    /// Values are taken as-is; only presence is checked. An empty string
    /// counts as absent.
    pub fn resolve(jwt: Option<String>, store_id: Option<String>) -> Result<Self> {
        match (non_empty(jwt), non_empty(store_id)) {
            (Some(token), Some(store_id)) => Ok(Self {
                token: SecretString::from(token),
                store_id,
            }),
            _ => Err(Error::configuration(MISSING_CREDENTIALS)),
        }
    }

    /// Resolve from parsed arguments, falling back to [`JWT_ENV`] and
    /// [`STORE_ID_ENV`] through `env` for whichever flag is absent or empty.
    pub fn from_startup_args<F>(args: &StartupArgs, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str, var: &str| {
            non_empty(args.get(key).map(str::to_string)).or_else(|| non_empty(env(var)))
        };
        Self::resolve(lookup("jwt", JWT_ENV), lookup("store-id", STORE_ID_ENV))
    }

    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }
}

/// Startup resolution: a failure is logged and yields `None` so the tools
/// still register and report the problem per call.
pub fn resolve_at_startup<F>(args: &StartupArgs, env: F) -> Option<Arc<CredentialBundle>>
where
    F: Fn(&str) -> Option<String>,
{
    match CredentialBundle::from_startup_args(args, env) {
        Ok(bundle) => {
            tracing::info!(store_id = bundle.store_id(), "credentials resolved");
            Some(Arc::new(bundle))
        }
        Err(err) => {
            tracing::warn!("{}; tool calls will fail until the server is restarted with both", err);
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
