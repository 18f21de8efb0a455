use askama::Template;
use chrono::Utc;

use crate::i18n::Locale;
use crate::render::Figure;

/// Standalone HTML page that draws one figure with plotly.js.
#[derive(Template)]
#[template(path = "asteroid_scene.html.jinja", escape = "html")]
pub struct AsteroidSceneTemplate {
    pub lang: String,
    pub title: String,
    pub plotly_js_url: String,
    /// Already safe to embed inside a `<script>` element
    pub figure_json: String,
    pub generated_at: String,
}

impl AsteroidSceneTemplate {
    pub fn from_figure(
        figure: &Figure,
        locale: Locale,
        plotly_js_url: &str,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            lang: locale.code().to_string(),
            title: figure.title.clone(),
            plotly_js_url: plotly_js_url.to_string(),
            figure_json: script_safe(&figure.to_json()?),
            generated_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        })
    }
}

/// Keep a JSON document from closing the surrounding script tag.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
