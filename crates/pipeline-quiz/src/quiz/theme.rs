use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Colour tokens from the `leadForm` block. Presentation only; no rule reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadFormTheme {
    pub progress_bar_color: Option<String>,
    pub progress_bar_background_color: Option<String>,
    pub progress_bar_text_color: Option<String>,
    pub button_color: Option<String>,
    pub button_hover_color: Option<String>,
    pub button_border_color: Option<String>,
    pub submit_button_color: Option<String>,
    pub submit_button_hover_color: Option<String>,
    pub back_button_color: Option<String>,
    pub back_button_color_hover: Option<String>,
}

impl LeadFormTheme {
    /// CSS custom properties for every token that is set.
    pub fn css_variables(&self) -> Vec<(&'static str, &str)> {
        [
            ("--progress-bar-color", &self.progress_bar_color),
            ("--progress-bar-bg", &self.progress_bar_background_color),
            ("--progress-bar-text", &self.progress_bar_text_color),
            ("--button-color", &self.button_color),
            ("--button-hover-color", &self.button_hover_color),
            ("--button-border-color", &self.button_border_color),
            ("--submit-button-color", &self.submit_button_color),
            ("--submit-button-hover-color", &self.submit_button_hover_color),
            ("--back-button-color", &self.back_button_color),
            ("--back-button-hover-color", &self.back_button_color_hover),
        ]
        .into_iter()
        .filter_map(|(property, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(|value| (property, value))
        })
        .collect()
    }

    /// `:root { ... }` rule for the set tokens. Values that could close the
    /// declaration or the surrounding element are dropped.
    pub fn style_block(&self) -> String {
        let mut css = String::from(":root {");
        for (property, value) in self.css_variables() {
            if value.contains([';', '{', '}', '<', '>']) {
                warn!(property, "dropping theme token with unsafe characters");
                continue;
            }
            write!(css, " {property}: {value};").expect("theme declaration");
        }
        css.push_str(" }");
        css
    }
}
