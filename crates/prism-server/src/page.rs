//! The report page.

use prism_embed::EmbedConfig;

const TEMPLATE: &str = include_str!("../templates/index.html");
const PLACEHOLDER: &str = "{{EMBED_CONFIG}}";

/// Render the index page with `config` inlined as a JavaScript object literal.
///
/// `<`, `>` and `&` are escaped so no value can close the surrounding
/// `<script>` element.
pub fn render_index(config: &EmbedConfig) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(config)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026");
    Ok(TEMPLATE.replace(PLACEHOLDER, &json))
}
