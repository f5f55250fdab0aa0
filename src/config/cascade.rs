use crate::config::parser::parse_config_file;
use crate::config::types::{DestinationWithSource, LoadedConfig, MergedConfig, RuleWithSource};
use crate::error::{Result, ShareError};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File name looked for at every cascade level.
pub const CONFIG_FILE_NAME: &str = ".tabshare.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.tabshare.toml`
/// 2. If found and `root = true`, stop walking up
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.tabshare.toml
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	// Walk up the directory tree
	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		if config_path.exists() {
			let config = parse_config_file(&config_path)?;
			let stop = config.root;

			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if stop {
				break;
			}
		}

		if let Some(parent) = current_dir.parent() {
			current_dir = parent.to_path_buf();
		} else {
			break;
		}
	}

	// Append the user config unless the walk already picked it up
	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load ~/.tabshare.toml if it exists and was not already found by the walk.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	let path = user_config_path()?;

	if existing_configs.iter().any(|loaded| loaded.path == path) {
		return Ok(None);
	}

	if path.exists() {
		let config = parse_config_file(&path)?;
		Ok(Some(LoadedConfig { config, path }))
	} else {
		Ok(None)
	}
}

/// Merge multiple configs into a single effective config.
///
/// Rules are collected in cascade order; that order is what breaks
/// priority ties later. Destinations merge by name, the most specific
/// definition winning. A destination without a configured id gets a UUID
/// here, so every merged destination is addressable for one run.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();

	for loaded in configs {
		for destination in &loaded.config.destinations {
			let name_taken = merged
				.destinations
				.iter()
				.any(|existing| existing.destination.name == destination.name);
			if name_taken {
				continue;
			}

			merged.destinations.push(DestinationWithSource {
				id: destination
					.id
					.clone()
					.unwrap_or_else(|| Uuid::new_v4().to_string()),
				destination: destination.clone(),
				source: loaded.path.clone(),
			});
		}

		for rule in &loaded.config.rules {
			merged.rules.push(RuleWithSource {
				rule: rule.clone(),
				source: loaded.path.clone(),
			});
		}
	}

	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(ShareError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
