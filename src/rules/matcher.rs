use crate::config::types::{MergedConfig, PreProcRule, RuleWithSource};
use crate::error::{Result, ShareError};
use regex::Regex;
use std::path::PathBuf;

/// The pair of hosts a rule is matched against.
#[derive(Debug)]
pub struct MatchContext<'a> {
	/// Host of the page being shared.
	pub page_host: &'a str,

	/// Host of the share destination's intent endpoint.
	pub share_host: &'a str,
}

/// One side of a rule's host gate, compiled for matching.
#[derive(Debug)]
pub enum HostPattern {
	/// Literal mode: suffix match aligned on a label boundary. An empty
	/// pattern matches any host.
	Literal(String),

	/// Regex mode: pattern anchored at the end of the host.
	Regex(Regex),
}

impl HostPattern {
	/// Compile one side from its configured match string and mode flag.
	pub fn compile(pattern: &str, is_regex: bool) -> Result<Self> {
		if !is_regex {
			return Ok(HostPattern::Literal(pattern.to_string()));
		}

		let anchored = anchor_pattern(pattern);
		let regex = Regex::new(&anchored).map_err(|source| ShareError::InvalidRegex {
			pattern: pattern.to_string(),
			source,
		})?;
		Ok(HostPattern::Regex(regex))
	}

	/// Check whether this side accepts the given host.
	pub fn matches(&self, host: &str) -> bool {
		match self {
			HostPattern::Literal(pattern) => literal_suffix_match(host, pattern),
			HostPattern::Regex(regex) => regex.is_match(host),
		}
	}
}

/// Anchor a regex-mode pattern at the end of the host, unless the
/// configured pattern already ends with `$`.
///
/// An empty pattern becomes `^$`: it accepts only an empty host, which is
/// how a configuration says "this side never applies".
fn anchor_pattern(pattern: &str) -> String {
	if pattern.is_empty() {
		"^$".to_string()
	} else if pattern.ends_with('$') {
		pattern.to_string()
	} else {
		format!("{pattern}$")
	}
}

/// Literal-mode host match.
///
/// The pattern must equal the host or be a suffix starting on a label
/// boundary: `youtube.com` accepts `www.youtube.com` but not
/// `notyoutube.com`. An empty pattern accepts every host.
fn literal_suffix_match(host: &str, pattern: &str) -> bool {
	if pattern.is_empty() {
		return true;
	}

	if host == pattern {
		return true;
	}

	if !host.ends_with(pattern) {
		return false;
	}

	// A pattern that itself starts with '.' carries its own boundary.
	pattern.starts_with('.') || host.as_bytes()[host.len() - pattern.len() - 1] == b'.'
}

/// A pre-processing rule compiled and ready for matching.
#[derive(Debug)]
pub struct CompiledRule {
	/// The original rule.
	pub rule: PreProcRule,

	/// Compiled gate for the current page's host.
	pub page_pattern: HostPattern,

	/// Compiled gate for the share destination's host.
	pub share_pattern: HostPattern,

	/// Source config path (for debugging).
	pub source: PathBuf,
}

impl CompiledRule {
	/// Compile a rule from a RuleWithSource.
	pub fn from_rule_with_source(rws: &RuleWithSource) -> Result<Self> {
		let page_pattern = HostPattern::compile(&rws.rule.url_match, rws.rule.url_match_is_regex)?;
		let share_pattern =
			HostPattern::compile(&rws.rule.share_match, rws.rule.share_match_is_regex)?;

		Ok(CompiledRule {
			rule: rws.rule.clone(),
			page_pattern,
			share_pattern,
			source: rws.source.clone(),
		})
	}

	/// Check if this rule applies to the given pair of hosts. Both sides
	/// must accept.
	pub fn matches(&self, ctx: &MatchContext) -> bool {
		self.page_pattern.matches(ctx.page_host) && self.share_pattern.matches(ctx.share_host)
	}
}

/// Compile all rules in a merged config.
pub fn compile_rules(config: &MergedConfig) -> Result<Vec<CompiledRule>> {
	config
		.rules
		.iter()
		.map(CompiledRule::from_rule_with_source)
		.collect()
}

/// Select the rules that apply to the given hosts, in pipeline order.
///
/// Disabled rules (negative priority) are dropped before their host gates
/// are even consulted. The survivors are sorted ascending by priority with
/// a stable sort, so ties keep their configured order.
pub fn select_applicable<'a>(
	rules: &'a [CompiledRule],
	ctx: &MatchContext,
) -> Vec<&'a CompiledRule> {
	let mut applicable: Vec<&CompiledRule> = rules
		.iter()
		.filter(|rule| !rule.rule.is_disabled())
		.filter(|rule| rule.matches(ctx))
		.collect();

	applicable.sort_by_key(|rule| rule.rule.priority);
	applicable
}
