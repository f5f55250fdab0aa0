use crate::error::{Result, ShareError};
use regex::{Regex, RegexBuilder};

/// Parsed text substitution command (sed-like syntax).
#[derive(Debug)]
pub struct Substitution {
	/// The pattern to match.
	pub pattern: Regex,

	/// The replacement string.
	pub replacement: String,

	/// Whether to replace all occurrences (global flag).
	pub global: bool,
}

impl Substitution {
	/// Parse a substitution command: `s<sep><pattern><sep><replacement>[<sep><flags>]`.
	///
	/// The character directly after the leading `s` serves as the
	/// separator; it need not be `/`. Leading whitespace is stripped
	/// first, and the trailing separator and flags may be omitted.
	///
	/// Returns `Ok(None)` when the input is not syntactically a
	/// substitution command; callers treat that as "replace nothing". A
	/// well-formed command whose pattern does not compile is an error.
	pub fn parse(input: &str) -> Result<Option<Self>> {
		let input = input.trim_start();

		let mut chars = input.chars();
		if chars.next() != Some('s') {
			return Ok(None);
		}
		let Some(separator) = chars.next() else {
			return Ok(None);
		};

		let body = &input[1 + separator.len_utf8()..];
		let parts = split_by_separator(body, separator);
		if parts.len() < 2 {
			return Ok(None);
		}

		let pattern_str = &parts[0];
		let replacement = parts[1].clone();
		let flags = if parts.len() > 2 { parts[2].as_str() } else { "" };

		let mut builder = RegexBuilder::new(pattern_str);
		for flag in flags.chars() {
			match flag {
				'i' => {
					builder.case_insensitive(true);
				}
				'm' => {
					builder.multi_line(true);
				}
				's' => {
					builder.dot_matches_new_line(true);
				}
				// 'g' is handled separately; unknown flags are ignored
				_ => {}
			}
		}

		let pattern = builder.build().map_err(|source| ShareError::InvalidRegex {
			pattern: pattern_str.to_string(),
			source,
		})?;

		Ok(Some(Substitution {
			pattern,
			replacement,
			global: flags.contains('g'),
		}))
	}

	/// Apply this substitution to a string.
	pub fn apply(&self, input: &str) -> String {
		if self.global {
			self.pattern
				.replace_all(input, &self.replacement)
				.to_string()
		} else {
			self.pattern.replace(input, &self.replacement).to_string()
		}
	}
}

/// Split a command body by the separator, respecting backslash escapes of
/// the separator itself.
fn split_by_separator(input: &str, separator: char) -> Vec<String> {
	let mut parts = Vec::new();
	let mut current = String::new();
	let mut chars = input.chars().peekable();
	let mut escape_next = false;

	while let Some(c) = chars.next() {
		if escape_next {
			current.push(c);
			escape_next = false;
		} else if c == '\\' {
			if chars.peek() == Some(&separator) {
				escape_next = true;
			} else {
				current.push(c);
			}
		} else if c == separator {
			parts.push(current);
			current = String::new();
		} else {
			current.push(c);
		}
	}

	parts.push(current);
	parts
}
