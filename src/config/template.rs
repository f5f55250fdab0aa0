use uuid::Uuid;

/// Generate the starter `.tabshare.toml` written by `tabshare init`.
///
/// The sample destination is the X (Twitter) compose intent, matching the
/// tool's out-of-the-box sharing target.
pub fn generate_init_template() -> String {
	let destination_id = Uuid::new_v4();

	format!(
		r#"# tabshare configuration.
#
# Config files are discovered from the working directory upward;
# `root = true` stops the walk here. ~/.tabshare.toml is always
# consulted last.
root = true

[[destinations]]
id = "{destination_id}"
name = "X (Twitter)"
url = "https://twitter.com/intent/tweet"
text_key = "text"
url_key = "url"

# Pre-processing rules run over the (title, address) pair before it is
# merged into the destination. Lower priority runs earlier; a negative
# priority disables the rule.
#
# [[rules]]
# description = "Strip tracking parameters everywhere"
# transform = "remove-url-params"
# param = "utm_source, utm_medium, utm_campaign"
# priority = 10
#
# [[rules]]
# description = "Drop fragments when sharing YouTube pages"
# url_match = "youtube.com"
# transform = "remove-fragment"
# priority = 20
"#
	)
}
