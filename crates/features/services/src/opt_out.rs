//! # Opt-out policy
//!
//! Operators reduce automatic configuration per reported service type with a directive such as
//! `mysql=config my-cache=all`. Tokens are whitespace separated; each is `<identifier>=<option>`
//! where the identifier may itself contain `=` and the option is `all` or `config`
//! (case-insensitive). Malformed tokens are logged and ignored, leaving the service at
//! [`AutoconfigTier::Full`].

use crate::tier::{AutoconfigTier, OptOutOption};
use fxhash::FxHashMap;
use std::str::FromStr;
use tracing::{debug, warn};

/// Per-service tier overrides keyed by the reported service type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptOutPolicy {
    table: FxHashMap<String, AutoconfigTier>,
}

impl OptOutPolicy {
    /// Parses an opt-out directive. Never fails; a missing or blank directive yields an empty policy.
    ///
    /// Tokens are applied left to right, so a later token for the same identifier wins.
    ///
    /// ```rust
    /// use bindery_services::{AutoconfigTier, OptOutPolicy};
    ///
    /// let policy = OptOutPolicy::parse(Some("mysql=config a=b=ALL broken"));
    /// assert_eq!(policy.tier_for("mysql"), AutoconfigTier::ConfigOnly);
    /// assert_eq!(policy.tier_for("a=b"), AutoconfigTier::None);
    /// assert_eq!(policy.tier_for("broken"), AutoconfigTier::Full);
    /// ```
    #[must_use]
    pub fn parse(directive: Option<&str>) -> Self {
        let mut table = FxHashMap::default();

        for token in directive.unwrap_or_default().split_whitespace() {
            match parse_token(token) {
                Ok((identifier, tier)) => {
                    debug!(service = identifier, %tier, "Opt-out override");
                    table.insert(identifier.to_owned(), tier);
                },
                Err(reason) => warn!(token, reason, "Ignoring invalid opt-out token"),
            }
        }

        Self { table }
    }

    /// Tier for a reported service type; services without an override get [`AutoconfigTier::Full`].
    #[must_use]
    pub fn tier_for(&self, service_type: &str) -> AutoconfigTier {
        self.table.get(service_type).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AutoconfigTier)> {
        self.table.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl From<&str> for OptOutPolicy {
    fn from(directive: &str) -> Self {
        Self::parse(Some(directive))
    }
}

fn parse_token(token: &str) -> Result<(&str, AutoconfigTier), &'static str> {
    let Some((identifier, option)) = token.rsplit_once('=') else {
        return Err("expected <service>=<all|config>");
    };
    if identifier.is_empty() {
        return Err("empty service identifier");
    }
    let option = OptOutOption::from_str(option).map_err(|_| "option must be 'all' or 'config'")?;
    Ok((identifier, option.into()))
}
