//! Engine configuration.
//!
//! Configuration is format-neutral; [`BinderConfig::from_toml_str`] is provided
//! for hosts that keep it alongside their other TOML settings.

use serde::Deserialize;


/// How an extension is chosen when several offered extensions are compatible
/// with one required type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionSelection {
	/// Take the first compatible extension in declaration order.
	#[default]
	FirstCompatible,
	/// Report more than one compatible extension as an ambiguity.
	RejectAmbiguous,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BinderConfig {
	pub extension_selection: ExtensionSelection,
	/// Maximum number of issues kept in the sink. Further issues are only counted.
	pub issue_limit: Option<usize>,
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
	#[error("issue_limit must be greater than zero")]
	ZeroIssueLimit,
}

impl BinderConfig {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let config: BinderConfig = toml::from_str(input)?;
		if config.issue_limit == Some(0) {
			return Err(ConfigError::ZeroIssueLimit);
		}
		Ok(config)
	}

	pub fn with_extension_selection(mut self, selection: ExtensionSelection) -> Self {
		self.extension_selection = selection;
		self
	}

	pub fn with_issue_limit(mut self, limit: usize) -> Self {
		self.issue_limit = Some(limit);
		self
	}
}
