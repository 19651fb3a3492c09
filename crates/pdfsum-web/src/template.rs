use axum::response::Html;

use pdfsum_core::{Config, MAX_INPUT_WORDS, MAX_LENGTH_BOUND, MIN_LENGTH_BOUND, ModelId};

const INDEX_HTML: &str = include_str!("../templates/index.html");

/// Render the index page with the configured defaults filled in.
pub fn render_index(config: &Config) -> Html<String> {
    let options: String = ModelId::ALL
        .iter()
        .map(|m| {
            let selected = if *m == config.default_model { " selected" } else { "" };
            format!("<option value=\"{m}\"{selected}>{m}</option>")
        })
        .collect();

    let html = INDEX_HTML
        .replace("{{ model_options }}", &options)
        .replace("{{ min_bound }}", &MIN_LENGTH_BOUND.to_string())
        .replace("{{ max_bound }}", &MAX_LENGTH_BOUND.to_string())
        .replace("{{ min_length }}", &config.default_lengths.min().to_string())
        .replace("{{ max_length }}", &config.default_lengths.max().to_string())
        .replace("{{ max_words }}", &MAX_INPUT_WORDS.to_string());
    Html(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_filled() {
        let Html(html) = render_index(&Config::default());
        assert!(!html.contains("{{"));
        assert!(html.contains("<option value=\"t5-small\" selected>t5-small</option>"));
        assert!(html.contains("facebook/bart-large-cnn"));
    }
}
