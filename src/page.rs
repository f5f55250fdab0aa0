use crate::error::{Result, ShareError};
use url::Url;

/// The (text, URL) value one share action threads through the pipeline.
///
/// A page value is built fresh from the page title and address when a share
/// action starts, moved through each pipeline stage by ownership, and
/// finally read by the destination composer. It never outlives the action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageValue {
	/// The share text, typically the page title.
	pub text: String,

	/// The page address. `None` is the "empty address" state that only the
	/// stochastic branch of the no-op transform produces.
	pub url: Option<Url>,
}

impl PageValue {
	/// Build a page value from a title and an already-parsed address.
	pub fn new(text: String, url: Url) -> Self {
		PageValue {
			text,
			url: Some(url),
		}
	}

	/// Build a page value from a title and an address string.
	pub fn parse(text: &str, url: &str) -> Result<Self> {
		let parsed = Url::parse(url).map_err(|source| ShareError::InvalidUrl {
			url: url.to_string(),
			source,
		})?;

		Ok(PageValue::new(text.to_string(), parsed))
	}

	/// Host of the page address, or "" when the address is empty or has no
	/// host (e.g. a `data:` URL).
	pub fn host(&self) -> &str {
		self.url
			.as_ref()
			.and_then(|url| url.host_str())
			.unwrap_or("")
	}

	/// String form of the address for composing; "" when the address is
	/// empty.
	pub fn url_string(&self) -> String {
		self.url.as_ref().map(Url::to_string).unwrap_or_default()
	}
}
