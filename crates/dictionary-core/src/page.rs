use handlebars::Handlebars;
use serde_json::json;

use crate::error::DictionaryError;
use crate::lookup::LookupSettings;

/// Path prefix the page's script calls to look a term up.
pub const LOOKUP_PREFIX: &str = "/dictionary/";

const INDEX_TEMPLATE: &str = "index";

/// Render the search page shared by every host.
///
/// The redirect target is embedded in the page script so the client-side URL check and the
/// server-side one agree.
pub fn render_index(title: &str, settings: &LookupSettings) -> Result<String, DictionaryError> {
    let mut hbs = Handlebars::new();
    hbs.set_strict_mode(true);
    hbs.register_template_string(INDEX_TEMPLATE, include_str!("../templates/index.html.hbs"))
        .map_err(DictionaryError::internal)?;

    let data = json!({
        "title": title,
        "redirect_target_json": script_string(settings.redirect_target().as_str())?,
        "lookup_prefix_json": script_string(LOOKUP_PREFIX)?,
    });
    hbs.render(INDEX_TEMPLATE, &data)
        .map_err(DictionaryError::internal)
}

/// JSON string literal that is safe to drop inside a `<script>` element.
fn script_string(value: &str) -> Result<String, DictionaryError> {
    let literal = serde_json::to_string(value).map_err(DictionaryError::internal)?;
    Ok(literal.replace('<', "\\u003c"))
}
