use strum_macros::{Display, EnumString};

/// How much automatic configuration a binding receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum AutoconfigTier {
    /// Features, support artifacts, client libraries and configuration stanzas.
    #[default]
    Full,
    /// Everything except touching the configuration document.
    ConfigOnly,
    /// Ignored by every query and by dispatch.
    None,
}

impl AutoconfigTier {
    /// Whether bindings in this tier take part in aggregate queries.
    #[must_use]
    pub const fn is_eligible(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Whether bindings in this tier may mutate the configuration document.
    #[must_use]
    pub const fn writes_config(self) -> bool {
        matches!(self, Self::Full)
    }
}

/// Option half of an opt-out token (`<service>=<option>`), matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub(crate) enum OptOutOption {
    All,
    Config,
}

impl From<OptOutOption> for AutoconfigTier {
    fn from(option: OptOutOption) -> Self {
        match option {
            OptOutOption::All => Self::None,
            OptOutOption::Config => Self::ConfigOnly,
        }
    }
}
