//! The transform registry: the named operations a pre-processing rule can
//! run over a (text, URL) value.
//!
//! Every entry carries two capabilities: `describe`, which yields the
//! summary/detail pair shown in listings, and `apply`, which consumes a
//! page value and returns the reworked one. Lookups never fail; unknown
//! names resolve to the no-op transform.

use crate::error::Result;
use crate::page::PageValue;
use crate::rules::substitution::Substitution;
use rand::Rng;
use url::Url;

/// Probability that no-op swaps the value for the sleeping placeholder.
const SLEEPY_CHANCE: f64 = 0.01;

/// Placeholder text the stochastic no-op branch substitutes.
const SLEEPY_TEXT: &str = "すやすや……💤";

/// Names of every registered transform, in listing order.
pub const TRANSFORM_NAMES: [&str; 4] = [
	"no-op",
	"remove-fragment",
	"remove-url-params",
	"replace-text",
];

/// A transform's self-description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Description {
	/// One-line label used in listings. Never contains a newline.
	pub summary: &'static str,

	/// Longer explanation, shown by `tabshare transforms --full`.
	pub detail: &'static str,
}

/// A registered transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
	NoOperation,
	RemoveFragment,
	RemoveUrlParams,
	ReplaceText,
}

impl Transform {
	/// Resolve a configured transform name.
	///
	/// Unknown names resolve to `NoOperation`, so a stale rule can never
	/// break a share action.
	pub fn lookup(name: &str) -> Transform {
		match name {
			"remove-fragment" => Transform::RemoveFragment,
			"remove-url-params" => Transform::RemoveUrlParams,
			"replace-text" => Transform::ReplaceText,
			_ => Transform::NoOperation,
		}
	}

	/// The registry name of this transform.
	pub fn name(&self) -> &'static str {
		match self {
			Transform::NoOperation => "no-op",
			Transform::RemoveFragment => "remove-fragment",
			Transform::RemoveUrlParams => "remove-url-params",
			Transform::ReplaceText => "replace-text",
		}
	}

	/// Describe this transform for configuration listings.
	pub fn describe(&self) -> Description {
		match self {
			Transform::NoOperation => Description {
				summary: "Do nothing",
				detail: "This pre-processor does nothing at all.\n\
					The parameter is simply ignored.\n\
					Hmm, all this nothing is making it sleepy in here...\n\
					If a pre-processor you want is missing, send an issue or a PR!",
			},
			Transform::RemoveFragment => Description {
				summary: "Remove the fragment from the page URL",
				detail: "Removes the fragment identifier (the # and everything after it)\n\
					from the address of the page being shared.\n\
					The parameter is simply ignored.",
			},
			Transform::RemoveUrlParams => Description {
				summary: "Remove the given parameters from the page URL",
				detail: "Removes the named query parameters from the address of the page\n\
					being shared. The parameter is a comma-separated list of names;\n\
					whitespace around each name is ignored.\n\
					For example \"list, index\" removes the parameters named \"list\"\n\
					and \"index\".",
			},
			Transform::ReplaceText => Description {
				summary: "Replace text",
				detail: "Rewrites the title of the page being shared with a substitution\n\
					command of the form \"s/pattern/replacement/flags\".\n\
					Any character may serve as the separator, and the trailing\n\
					separator and flags may be omitted. Without the \"g\" flag only\n\
					the first match is replaced: \"s/twitter/X/gi\" replaces every\n\
					\"twitter\" ignoring case, and \"s/^\\(\\d+\\)\\s*/\" strips a\n\
					parenthesized count from the start of the title.\n\
					Anything that is not a substitution command replaces nothing.",
			},
		}
	}

	/// Apply this transform to a page value, with the default RNG.
	pub fn apply(&self, value: PageValue, param: &str) -> Result<PageValue> {
		self.apply_with_rng(value, param, &mut rand::thread_rng())
	}

	/// Apply this transform with a caller-supplied randomness source.
	///
	/// Only no-op consumes randomness; injecting the RNG lets tests pin
	/// both of its branches.
	pub fn apply_with_rng<R: Rng>(
		&self,
		value: PageValue,
		param: &str,
		rng: &mut R,
	) -> Result<PageValue> {
		match self {
			Transform::NoOperation => Ok(no_operation(value, rng)),
			Transform::RemoveFragment => Ok(remove_fragment(value)),
			Transform::RemoveUrlParams => Ok(remove_url_params(value, param)),
			Transform::ReplaceText => replace_text(value, param),
		}
	}
}

/// Do nothing, except once in a hundred runs really do nothing: the value
/// becomes the sleeping placeholder with an empty address.
fn no_operation<R: Rng>(value: PageValue, rng: &mut R) -> PageValue {
	if rng.gen_range(0.0..1.0) < SLEEPY_CHANCE {
		return PageValue {
			text: SLEEPY_TEXT.to_string(),
			url: None,
		};
	}

	value
}

/// Clear the URL's fragment component.
fn remove_fragment(mut value: PageValue) -> PageValue {
	if let Some(url) = value.url.as_mut() {
		url.set_fragment(None);
	}

	value
}

/// Delete the query parameters named in the comma-separated `param` list.
fn remove_url_params(mut value: PageValue, param: &str) -> PageValue {
	if param.trim().is_empty() {
		return value;
	}

	let names: Vec<&str> = param.split(',').map(str::trim).collect();
	if let Some(url) = value.url.as_mut() {
		remove_query_params(url, &names);
	}

	value
}

fn remove_query_params(url: &mut Url, names: &[&str]) {
	let retained: Vec<(String, String)> = url
		.query_pairs()
		.filter(|(name, _)| !names.contains(&name.as_ref()))
		.map(|(name, value)| (name.into_owned(), value.into_owned()))
		.collect();

	if retained.is_empty() {
		url.set_query(None);
	} else {
		url.query_pairs_mut().clear().extend_pairs(retained);
	}
}

/// Regex-replace the text field according to an `s/pattern/replacement/flags`
/// command. A malformed command replaces nothing; a well-formed command
/// with an uncompilable pattern is the pipeline's one hard failure.
fn replace_text(mut value: PageValue, param: &str) -> Result<PageValue> {
	let Some(substitution) = Substitution::parse(param)? else {
		return Ok(value);
	};

	value.text = substitution.apply(&value.text);
	Ok(value)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::mock::StepRng;

	fn make_value(url: &str) -> PageValue {
		PageValue::parse("(3) Example Title", url).unwrap()
	}

	/// An RNG whose first sample is far above the sleepy threshold.
	fn awake_rng() -> StepRng {
		StepRng::new(u64::MAX, 0)
	}

	/// An RNG whose first sample is 0.0, under any threshold.
	fn sleepy_rng() -> StepRng {
		StepRng::new(0, 0)
	}

	#[test]
	fn test_lookup_known_names() {
		for name in TRANSFORM_NAMES {
			assert_eq!(Transform::lookup(name).name(), name);
		}
	}

	#[test]
	fn test_lookup_unknown_name_falls_back_to_no_op() {
		assert_eq!(Transform::lookup("frobnicate"), Transform::NoOperation);
		assert_eq!(Transform::lookup(""), Transform::NoOperation);
	}

	#[test]
	fn test_summaries_are_single_line() {
		for name in TRANSFORM_NAMES {
			let description = Transform::lookup(name).describe();
			assert!(
				!description.summary.contains('\n'),
				"summary of {name} must not contain a newline"
			);
			assert!(!description.detail.is_empty());
		}
	}

	#[test]
	fn test_no_op_returns_input_unchanged() {
		let value = make_value("https://example.com/p?q=1#frag");
		let result = Transform::NoOperation
			.apply_with_rng(value.clone(), "ignored", &mut awake_rng())
			.unwrap();
		assert_eq!(result, value);
	}

	#[test]
	fn test_no_op_sleepy_branch() {
		let value = make_value("https://example.com/p");
		let result = Transform::NoOperation
			.apply_with_rng(value, "", &mut sleepy_rng())
			.unwrap();
		assert_eq!(result.text, SLEEPY_TEXT);
		assert_eq!(result.url, None);
	}

	#[test]
	fn test_no_op_mostly_does_nothing() {
		// Statistical check of the 1% branch with the real RNG. The margin
		// is wide enough that a false failure is practically impossible.
		let value = make_value("https://example.com/p");
		let runs = 10_000;
		let unchanged = (0..runs)
			.filter(|_| {
				Transform::NoOperation
					.apply(value.clone(), "")
					.unwrap() == value
			})
			.count();
		assert!(unchanged >= runs * 95 / 100, "unchanged {unchanged}/{runs}");
	}

	#[test]
	fn test_remove_fragment() {
		let value = make_value("https://example.com/p?q=1#section-2");
		let result = Transform::RemoveFragment.apply(value, "").unwrap();
		assert_eq!(result.url_string(), "https://example.com/p?q=1");
	}

	#[test]
	fn test_remove_fragment_without_fragment() {
		let value = make_value("https://example.com/p?q=1");
		let result = Transform::RemoveFragment.apply(value, "").unwrap();
		assert_eq!(result.url_string(), "https://example.com/p?q=1");
	}

	#[test]
	fn test_remove_fragment_with_empty_address() {
		let value = PageValue {
			text: "t".to_string(),
			url: None,
		};
		let result = Transform::RemoveFragment.apply(value.clone(), "").unwrap();
		assert_eq!(result, value);
	}

	#[test]
	fn test_remove_url_params() {
		let value = make_value("https://example.com/p?a=1&b=2&c=3");
		let result = Transform::RemoveUrlParams.apply(value, "a, b").unwrap();
		assert_eq!(result.url_string(), "https://example.com/p?c=3");
	}

	#[test]
	fn test_remove_url_params_absent_names_ignored() {
		let value = make_value("https://example.com/p?c=3");
		let result = Transform::RemoveUrlParams
			.apply(value, "a, b, missing")
			.unwrap();
		assert_eq!(result.url_string(), "https://example.com/p?c=3");
	}

	#[test]
	fn test_remove_url_params_exact_name_match() {
		let value = make_value("https://example.com/p?list=1&playlist=2");
		let result = Transform::RemoveUrlParams.apply(value, "list").unwrap();
		assert_eq!(result.url_string(), "https://example.com/p?playlist=2");
	}

	#[test]
	fn test_remove_url_params_last_pair_drops_question_mark() {
		let value = make_value("https://example.com/p?q=1");
		let result = Transform::RemoveUrlParams.apply(value, "q").unwrap();
		assert_eq!(result.url_string(), "https://example.com/p");
	}

	#[test]
	fn test_remove_url_params_empty_list_removes_nothing() {
		let value = make_value("https://example.com/p?q=1");
		let result = Transform::RemoveUrlParams.apply(value.clone(), "").unwrap();
		assert_eq!(result, value);

		let result = Transform::RemoveUrlParams.apply(value.clone(), "   ").unwrap();
		assert_eq!(result, value);
	}

	#[test]
	fn test_replace_text_first_occurrence() {
		let mut value = make_value("https://example.com/p");
		value.text = "foo foo".to_string();
		let result = Transform::ReplaceText.apply(value, "s/foo/bar/").unwrap();
		assert_eq!(result.text, "bar foo");
	}

	#[test]
	fn test_replace_text_global() {
		let mut value = make_value("https://example.com/p");
		value.text = "foo foo".to_string();
		let result = Transform::ReplaceText.apply(value, "s/foo/bar/g").unwrap();
		assert_eq!(result.text, "bar bar");
	}

	#[test]
	fn test_replace_text_leaves_url_alone() {
		let value = make_value("https://foo.example.com/foo");
		let result = Transform::ReplaceText.apply(value, "s/foo/bar/g").unwrap();
		assert_eq!(result.url_string(), "https://foo.example.com/foo");
	}

	#[test]
	fn test_replace_text_invalid_command_is_no_op() {
		let value = make_value("https://example.com/p");
		let result = Transform::ReplaceText
			.apply(value.clone(), "not-a-command")
			.unwrap();
		assert_eq!(result, value);
	}

	#[test]
	fn test_replace_text_strips_leading_count() {
		let value = make_value("https://example.com/p");
		let result = Transform::ReplaceText
			.apply(value, r"s#^\(\d+\)\s*#")
			.unwrap();
		assert_eq!(result.text, "Example Title");
	}

	#[test]
	fn test_replace_text_invalid_pattern_propagates() {
		let value = make_value("https://example.com/p");
		let result = Transform::ReplaceText.apply(value, "s/[invalid/x/");
		assert!(result.is_err());
	}
}
