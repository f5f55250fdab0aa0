//! The destination composer: merges a final page value into a
//! destination's intent template.

use crate::config::types::Destination;
use crate::error::{Result, ShareError};
use crate::page::PageValue;
use url::Url;

/// Merge the final text and address into the destination template's query
/// string.
///
/// With a `url_key`, text and address travel as two separate parameters.
/// Without one, they are concatenated with a single space under
/// `text_key`. Parameters already present in the template are kept; a
/// parameter with the same name is replaced rather than duplicated. An
/// empty address renders as the empty string.
pub fn compose_share_url(destination: &Destination, value: &PageValue) -> Result<Url> {
	let mut url = Url::parse(&destination.url).map_err(|source| ShareError::InvalidUrl {
		url: destination.url.clone(),
		source,
	})?;

	match destination.url_key.as_deref() {
		Some(url_key) => {
			set_query_param(&mut url, &destination.text_key, &value.text);
			set_query_param(&mut url, url_key, &value.url_string());
		}
		None => {
			let combined = format!("{} {}", value.text, value.url_string());
			set_query_param(&mut url, &destination.text_key, &combined);
		}
	}

	Ok(url)
}

/// Set a query parameter the way `URLSearchParams.set` does: replace the
/// first occurrence in place, drop any further ones, append when absent.
fn set_query_param(url: &mut Url, key: &str, value: &str) {
	let pairs: Vec<(String, String)> = url
		.query_pairs()
		.map(|(name, value)| (name.into_owned(), value.into_owned()))
		.collect();

	let mut result: Vec<(String, String)> = Vec::with_capacity(pairs.len() + 1);
	let mut set = false;

	for (name, existing) in pairs {
		if name == key {
			if !set {
				result.push((name, value.to_string()));
				set = true;
			}
		} else {
			result.push((name, existing));
		}
	}

	if !set {
		result.push((key.to_string(), value.to_string()));
	}

	url.query_pairs_mut().clear().extend_pairs(result);
}

#[cfg(test)]
mod tests {
	use super::*;

	fn make_destination(url_key: Option<&str>) -> Destination {
		Destination {
			id: None,
			name: "X (Twitter)".to_string(),
			url: "https://twitter.com/intent/tweet".to_string(),
			text_key: "text".to_string(),
			url_key: url_key.map(str::to_string),
		}
	}

	fn make_value() -> PageValue {
		PageValue::parse("Hello", "https://example.com/p?keep=2").unwrap()
	}

	#[test]
	fn test_compose_with_url_key() {
		let url = compose_share_url(&make_destination(Some("url")), &make_value()).unwrap();

		assert_eq!(
			url.as_str(),
			"https://twitter.com/intent/tweet?text=Hello&url=https%3A%2F%2Fexample.com%2Fp%3Fkeep%3D2"
		);
	}

	#[test]
	fn test_compose_without_url_key_concatenates() {
		let url = compose_share_url(&make_destination(None), &make_value()).unwrap();

		let text = url
			.query_pairs()
			.find(|(name, _)| name == "text")
			.map(|(_, value)| value.into_owned())
			.unwrap();
		assert_eq!(text, "Hello https://example.com/p?keep=2");
		assert!(url.query_pairs().all(|(name, _)| name != "url"));
	}

	#[test]
	fn test_compose_replaces_template_parameter() {
		let destination = Destination {
			url: "https://twitter.com/intent/tweet?text=placeholder&via=tabshare".to_string(),
			..make_destination(Some("url"))
		};
		let url = compose_share_url(&destination, &make_value()).unwrap();

		let pairs: Vec<(String, String)> = url
			.query_pairs()
			.map(|(name, value)| (name.into_owned(), value.into_owned()))
			.collect();
		assert!(pairs.contains(&("text".to_string(), "Hello".to_string())));
		assert!(pairs.contains(&("via".to_string(), "tabshare".to_string())));
		assert!(!pairs.contains(&("text".to_string(), "placeholder".to_string())));
	}

	#[test]
	fn test_compose_empty_address() {
		let value = PageValue {
			text: "Hello".to_string(),
			url: None,
		};
		let url = compose_share_url(&make_destination(Some("url")), &value).unwrap();

		let address = url
			.query_pairs()
			.find(|(name, _)| name == "url")
			.map(|(_, value)| value.into_owned())
			.unwrap();
		assert_eq!(address, "");
	}

	#[test]
	fn test_compose_invalid_template() {
		let destination = Destination {
			url: "not a url".to_string(),
			..make_destination(None)
		};
		let result = compose_share_url(&destination, &make_value());
		assert!(result.is_err());
	}
}
