//! Host configuration for the sandbox runtime.
//!
//! Hosts embed the console next to their API docs and point it at a
//! concrete server. The configuration is plain JSON with `${VAR}`
//! environment expansion in string values, so deployments can inject
//! secrets (API keys in default headers) without templating the file.

use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use url::Url;

/// Sandbox runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxConfig {
    /// Server to resolve relative request URLs against. When absent,
    /// prepared URLs must already be absolute.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout. When absent the client default applies.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Headers applied to every request, overridable per request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl SandboxConfig {
    /// Parse a configuration from JSON text, expanding `${VAR}` references
    /// in the base URL and header values.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let mut cfg: Self =
            serde_json::from_str(raw).context("invalid sandbox configuration")?;

        if let Some(base) = cfg.base_url.as_mut() {
            *base = expand_env_vars(base);
        }
        for value in cfg.headers.values_mut() {
            *value = expand_env_vars(value);
        }

        Ok(cfg)
    }

    /// The parsed base URL, when one is configured.
    pub fn base(&self) -> anyhow::Result<Option<Url>> {
        self.base_url
            .as_deref()
            .map(|raw| Url::parse(raw).with_context(|| format!("invalid base URL `{raw}`")))
            .transpose()
    }
}

/// Replace `${NAME}` references with the named environment variable.
/// Unset variables are left as literal `${NAME}` so the problem stays
/// visible in the resulting value.
fn expand_env_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match env::var(name) {
                    Ok(value) => out.push_str(&value),
                    Err(_) => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated reference, keep it verbatim.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
