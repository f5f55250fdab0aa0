use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration from a `.tabshare.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop the directory cascade and jump directly to
	/// ~/.tabshare.toml.
	#[serde(default)]
	pub root: bool,

	/// Share destinations. The most specific definition of a name in the
	/// cascade wins.
	#[serde(default)]
	pub destinations: Vec<Destination>,

	/// Pre-processing rules, run in ascending priority order when their
	/// host gates match.
	#[serde(default)]
	pub rules: Vec<PreProcRule>,
}

/// A configured share target.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Destination {
	/// Opaque identifier. A UUID is assigned at load when absent.
	#[serde(default)]
	pub id: Option<String>,

	/// Display name; also what `share --to` selects by.
	pub name: String,

	/// Intent endpoint template the share parameters are merged into.
	pub url: String,

	/// Query parameter that receives the share text.
	pub text_key: String,

	/// Query parameter that receives the page address. When absent, text
	/// and address are concatenated with one space under `text_key`.
	#[serde(default)]
	pub url_key: Option<String>,
}

/// A configured pipeline stage: a named transform gated by host matching.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PreProcRule {
	/// Human-readable label, shown by `config show`.
	#[serde(default)]
	pub description: String,

	/// Match string for the current page's host. "" matches any host.
	#[serde(default)]
	pub url_match: String,

	/// Treat `url_match` as a regex instead of a literal suffix.
	#[serde(default)]
	pub url_match_is_regex: bool,

	/// Match string for the share destination's host. "" matches any host.
	#[serde(default)]
	pub share_match: String,

	/// Treat `share_match` as a regex instead of a literal suffix.
	#[serde(default)]
	pub share_match_is_regex: bool,

	/// Registry name of the transform to run. Unknown names act as no-op.
	#[serde(default)]
	pub transform: String,

	/// Parameter string handed to the transform.
	#[serde(default)]
	pub param: String,

	/// Stage order, ascending. A negative priority disables the rule.
	#[serde(default)]
	pub priority: i64,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from multiple config files in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// Destinations in cascade precedence; the first definition of a name
	/// wins.
	pub destinations: Vec<DestinationWithSource>,

	/// All rules in cascade order. This order breaks priority ties.
	pub rules: Vec<RuleWithSource>,
}

/// A destination with its resolved id and source config path.
#[derive(Debug, Clone)]
pub struct DestinationWithSource {
	/// The configured id, or a UUID assigned at load.
	pub id: String,

	/// The destination itself.
	pub destination: Destination,

	/// The config file this destination came from.
	pub source: PathBuf,
}

/// A rule with its source config path for debugging/display.
#[derive(Debug, Clone)]
pub struct RuleWithSource {
	/// The rule itself.
	pub rule: PreProcRule,

	/// The config file this rule came from.
	pub source: PathBuf,
}

impl PreProcRule {
	/// Disabled rules are excluded from matching entirely.
	pub fn is_disabled(&self) -> bool {
		self.priority < 0
	}
}

impl Destination {
	/// Validate the fields a share action depends on.
	pub fn validate(&self) -> Result<(), crate::error::ShareError> {
		if self.name.is_empty() {
			return Err(invalid(self, "name must not be empty"));
		}

		if self.text_key.is_empty() {
			return Err(invalid(self, "text_key must not be empty"));
		}

		if let Err(e) = url::Url::parse(&self.url) {
			return Err(invalid(self, &format!("url is not a valid URL: {e}")));
		}

		Ok(())
	}
}

fn invalid(destination: &Destination, reason: &str) -> crate::error::ShareError {
	crate::error::ShareError::InvalidDestination {
		name: destination.name.clone(),
		reason: reason.to_string(),
	}
}

impl Config {
	/// Validate all destinations in this config.
	pub fn validate(&self) -> Result<(), crate::error::ShareError> {
		for destination in &self.destinations {
			destination.validate()?;
		}
		Ok(())
	}
}

impl MergedConfig {
	/// Look up a destination by name or id.
	pub fn find_destination(&self, selector: &str) -> Option<&DestinationWithSource> {
		self.destinations
			.iter()
			.find(|d| d.destination.name == selector || d.id == selector)
	}
}
