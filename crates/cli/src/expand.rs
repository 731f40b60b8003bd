//! `$VAR` / `${VAR}` expansion for configured paths
//!
//! Lets a pipeline write `remote_path = "/releases/${BUILD_NUMBER}"`.
//! Unknown variables are left untouched.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("valid variable pattern")
});

/// Expand variables in `template` using `lookup`
pub fn expand_with<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    VARIABLE
        .replace_all(template, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            lookup(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Expand variables from the process environment
pub fn expand_env(template: &str) -> String {
    expand_with(template, |name| std::env::var(name).ok())
}
