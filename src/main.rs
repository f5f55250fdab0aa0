use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use tabshare_cli::compose::compose_share_url;
use tabshare_cli::config::{
	CONFIG_FILE_NAME, DestinationWithSource, MergedConfig, discover_configs,
	generate_init_template, load_merged_config, merge_configs, user_config_path,
};
use tabshare_cli::page::PageValue;
use tabshare_cli::pipeline;
use tabshare_cli::rules::{MatchContext, compile_rules, select_applicable};
use tabshare_cli::transforms::{TRANSFORM_NAMES, Transform};

#[derive(Parser)]
#[command(name = "tabshare")]
#[command(
	author,
	version,
	about = "CLI tool for sharing page titles and URLs through configurable pre-processing rules"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Run a page through the pre-processing rules and print the share URL
	Share {
		/// Address of the page being shared
		url: String,

		/// Title of the page being shared
		#[arg(default_value = "")]
		title: String,

		/// Destination name or id; optional when exactly one is configured
		#[arg(long, value_name = "NAME")]
		to: Option<String>,
	},
	/// List the available transforms
	Transforms {
		/// Include the detailed explanation of each transform
		#[arg(long)]
		full: bool,
	},
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
	/// Create a starter .tabshare.toml in the current directory
	Init {
		/// Overwrite an existing .tabshare.toml
		#[arg(long)]
		force: bool,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display merged effective configuration with source annotations
	Show,
	/// Check all config files for errors without sharing anything
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Share { url, title, to } => handle_share(&url, &title, to.as_deref()),
		Commands::Transforms { full } => handle_transforms(full),
		Commands::Config { action } => match action {
			ConfigAction::Show => handle_config_show(),
			ConfigAction::Validate => handle_config_validate(),
		},
		Commands::Init { force } => handle_init(force),
	}
}

fn handle_share(url: &str, title: &str, to: Option<&str>) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let config = load_merged_config(&cwd).context("Failed to load configuration")?;
	let destination = select_destination(&config, to)?;

	let value = PageValue::parse(title, url).context("Failed to parse the page address")?;

	// The destination template already parsed during config validation;
	// its host is the "share" side of every rule gate.
	let template = url::Url::parse(&destination.destination.url)
		.with_context(|| format!("Invalid destination URL: {}", destination.destination.url))?;

	let rules = compile_rules(&config).context("Failed to compile rules")?;

	let page_host = value.host().to_string();
	let share_host = template.host_str().unwrap_or("").to_string();
	let ctx = MatchContext {
		page_host: &page_host,
		share_host: &share_host,
	};

	let applicable = select_applicable(&rules, &ctx);
	let shared = pipeline::run(value, &applicable).context("Pre-processing failed")?;

	let share_url = compose_share_url(&destination.destination, &shared)
		.context("Failed to compose the share URL")?;
	println!("{share_url}");

	Ok(ExitCode::SUCCESS)
}

fn select_destination<'a>(
	config: &'a MergedConfig,
	selector: Option<&str>,
) -> Result<&'a DestinationWithSource> {
	if let Some(selector) = selector {
		return config.find_destination(selector).ok_or_else(|| {
			anyhow::anyhow!("No destination named '{selector}' is configured")
		});
	}

	match config.destinations.as_slice() {
		[] => anyhow::bail!(
			"No destinations configured. Run `tabshare init` to create a starter config."
		),
		[only] => Ok(only),
		many => {
			let names: Vec<&str> = many
				.iter()
				.map(|d| d.destination.name.as_str())
				.collect();
			anyhow::bail!(
				"Multiple destinations configured; pick one with --to: {}",
				names.join(", ")
			)
		}
	}
}

fn handle_transforms(full: bool) -> Result<ExitCode> {
	for name in TRANSFORM_NAMES {
		let description = Transform::lookup(name).describe();
		println!("{name}: {}", description.summary);

		if full {
			for line in description.detail.lines() {
				println!("    {line}");
			}
			println!();
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", loaded.config.root);
		println!("# destinations: {}", loaded.config.destinations.len());
		println!("# rules: {}", loaded.config.rules.len());
		println!();

		for destination in &loaded.config.destinations {
			println!("  Destination {}:", destination.name);
			if let Some(ref id) = destination.id {
				println!("    id: {id}");
			}
			println!("    url: {}", destination.url);
			println!("    text_key: {}", destination.text_key);
			if let Some(ref url_key) = destination.url_key {
				println!("    url_key: {url_key}");
			}
			println!();
		}

		for (i, rule) in loaded.config.rules.iter().enumerate() {
			println!("  Rule {}:", i + 1);
			if !rule.description.is_empty() {
				println!("    description: {}", rule.description);
			}
			if !rule.url_match.is_empty() {
				println!(
					"    url_match: {}{}",
					rule.url_match,
					if rule.url_match_is_regex { " (regex)" } else { "" }
				);
			}
			if !rule.share_match.is_empty() {
				println!(
					"    share_match: {}{}",
					rule.share_match,
					if rule.share_match_is_regex { " (regex)" } else { "" }
				);
			}
			println!(
				"    transform: {}",
				Transform::lookup(&rule.transform).name()
			);
			if !rule.param.is_empty() {
				println!("    param: {}", rule.param);
			}
			println!(
				"    priority: {}{}",
				rule.priority,
				if rule.is_disabled() { " (disabled)" } else { "" }
			);
			println!();
		}
	}

	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let configs = match discover_configs(&cwd) {
		Ok(configs) => configs,
		Err(e) => {
			eprintln!("Configuration error: {e}");
			return Ok(ExitCode::FAILURE);
		}
	};

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	// Rule patterns only compile when a share runs; check them here too so
	// validate catches a bad regex before it bites.
	let merged = merge_configs(&configs);
	if let Err(e) = compile_rules(&merged) {
		eprintln!("Configuration error: {e}");
		return Ok(ExitCode::FAILURE);
	}

	println!("All configuration files are valid:");
	for loaded in &configs {
		println!(
			"  {} ({} destinations, {} rules)",
			loaded.path.display(),
			loaded.config.destinations.len(),
			loaded.config.rules.len()
		);
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	let template = generate_init_template();
	std::fs::write(&config_path, template)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}
