use std::fmt::Write as _;

use super::content::{Paragraph, ResultContent, Segment};
use super::definition::{DisqualificationCopy, QuestionDefinition};

/// Turns quiz content into something a host can display.
pub trait QuizRenderer {
    fn question(&self, question: &QuestionDefinition, number: usize, total: usize) -> String;
    fn disqualified(&self, copy: &DisqualificationCopy) -> String;
    fn result(&self, content: &ResultContent) -> String;
}

/// Markup matching the marketing site's quiz screens.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl QuizRenderer for HtmlRenderer {
    fn question(&self, question: &QuestionDefinition, number: usize, total: usize) -> String {
        let id = escape_html(question.id.as_str());
        let mut html = String::new();

        writeln!(
            html,
            "<div class=\"quiz-screen\" id=\"{id}\" data-question=\"{number}\">"
        )
        .expect("screen open");
        html.push_str("<div class=\"quiz-content\">\n<div class=\"question-header\">\n");
        writeln!(
            html,
            "<span class=\"question-number\">Question {number} of {total}</span>"
        )
        .expect("question number");
        writeln!(
            html,
            "<h2 class=\"question-title\">{}</h2>",
            escape_html(&question.prompt)
        )
        .expect("question title");
        html.push_str("</div>\n<div class=\"options-list\">\n");

        for option in &question.options {
            let escaped = escape_html(option);
            writeln!(
                html,
                "<label class=\"option-item\"><input type=\"radio\" name=\"{id}\" value=\"{escaped}\" required><span class=\"option-text\">{escaped}</span></label>"
            )
            .expect("option item");
        }

        html.push_str("</div>\n<div class=\"quiz-nav\">\n");
        if number > 1 {
            writeln!(
                html,
                "<button class=\"btn btn-secondary\" data-action=\"back\" data-from=\"{number}\">Back</button>"
            )
            .expect("back button");
        }
        writeln!(
            html,
            "<button class=\"btn btn-primary\" data-action=\"next\" data-from=\"{number}\">Next</button>"
        )
        .expect("next button");
        html.push_str("</div>\n</div>\n</div>\n");
        html
    }

    fn disqualified(&self, copy: &DisqualificationCopy) -> String {
        let mut html = String::from("<div class=\"quiz-screen\" id=\"dq\">\n");
        writeln!(
            html,
            "<p id=\"dqText\">{}</p>",
            escape_html(copy.message())
        )
        .expect("dq text");
        if let Some(additional) = copy.additional_message() {
            writeln!(
                html,
                "<p id=\"dqAdditionalText\">{}</p>",
                escape_html(additional)
            )
            .expect("dq additional text");
        }
        html.push_str("</div>\n");
        html
    }

    fn result(&self, content: &ResultContent) -> String {
        let mut html = String::new();

        writeln!(
            html,
            "<div class=\"result-header {}\">",
            content.tier.css_class()
        )
        .expect("result header");
        writeln!(
            html,
            "<div class=\"result-score\">{}</div>",
            escape_html(&content.score_display())
        )
        .expect("result score");
        writeln!(
            html,
            "<div class=\"result-label\">{}</div>",
            escape_html(&content.label)
        )
        .expect("result label");
        html.push_str("</div>\n<div class=\"result-content\">\n");
        for paragraph in &content.paragraphs {
            writeln!(html, "<p class=\"result-text\">{}</p>", paragraph_html(paragraph))
                .expect("result paragraph");
        }
        html.push_str("</div>\n");

        let cta = &content.call_to_action;
        html.push_str("<div class=\"result-cta\">\n");
        writeln!(html, "<h3>{}</h3>", escape_html(cta.heading)).expect("cta heading");
        writeln!(html, "<p>{}</p>", escape_html(cta.body)).expect("cta body");
        writeln!(
            html,
            "<a href=\"{}\" class=\"btn btn-primary btn-large\">{}</a>",
            escape_html(cta.href),
            escape_html(cta.link_label)
        )
        .expect("cta link");
        html.push_str("</div>\n");
        html
    }
}

fn paragraph_html(paragraph: &Paragraph) -> String {
    paragraph
        .0
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => escape_html(text),
            Segment::Emphasis(text) => format!("<strong>{}</strong>", escape_html(text)),
        })
        .collect()
}

/// Plain-text screens for the terminal quiz.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl QuizRenderer for TextRenderer {
    fn question(&self, question: &QuestionDefinition, number: usize, total: usize) -> String {
        let mut text = format!("Question {number} of {total}\n{}\n", question.prompt);
        for (index, option) in question.options.iter().enumerate() {
            writeln!(text, "  {}) {}", index + 1, option).expect("option line");
        }
        text
    }

    fn disqualified(&self, copy: &DisqualificationCopy) -> String {
        let mut text = format!("{}\n", copy.message());
        if let Some(additional) = copy.additional_message() {
            writeln!(text, "{additional}").expect("additional line");
        }
        text
    }

    fn result(&self, content: &ResultContent) -> String {
        let mut text = format!(
            "Pipeline score: {} ({})\n\n",
            content.score_display(),
            content.label
        );
        for paragraph in &content.paragraphs {
            writeln!(text, "{}\n", paragraph.plain()).expect("paragraph");
        }
        let cta = &content.call_to_action;
        writeln!(text, "{}\n{}\n-> {}", cta.heading, cta.body, cta.href).expect("cta");
        text
    }
}

/// Escape text for element content and double- or single-quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::classification::{ClassificationResult, Tier};
    use crate::quiz::content::result_content;

    #[test]
    fn option_values_are_quote_escaped() {
        let question = QuestionDefinition::new(
            "q1",
            "Pick <one>",
            &["We say \"fine\"", "Ops & IT's call"],
        );

        let html = HtmlRenderer.question(&question, 1, 8);

        assert!(html.contains("value=\"We say &quot;fine&quot;\""));
        assert!(html.contains("value=\"Ops &amp; IT&#39;s call\""));
        assert!(html.contains("Pick &lt;one&gt;"));
        assert!(!html.contains("data-action=\"back\""), "first question has no back button");
        assert!(HtmlRenderer
            .question(&question, 2, 8)
            .contains("data-action=\"back\""));
    }

    #[test]
    fn result_markup_escapes_echoed_answers() {
        let content = result_content(&ClassificationResult {
            tier: Tier::A,
            score: Tier::A.score(),
            label: Tier::A.label().to_string(),
            variant: 1,
            role: Some("<script>alert(1)</script>".to_string()),
            company_size: Some("51-250".to_string()),
        });

        let html = HtmlRenderer.result(&content);

        assert!(html.contains("result-header tier-a"));
        assert!(html.contains("<div class=\"result-score\">2.9 / 10</div>"));
        assert!(html.contains("<strong>&lt;script&gt;alert(1)&lt;/script&gt;</strong>"));
        assert!(html.contains("<strong>51-250 employee</strong>"));
        assert!(html.contains("href=\"index.html#contact\""));
    }

    #[test]
    fn disqualified_screen_omits_missing_secondary_message() {
        let copy = DisqualificationCopy {
            text: Some("Not a fit yet.".to_string()),
            additional_text: None,
        };

        let html = HtmlRenderer.disqualified(&copy);
        assert!(html.contains("<p id=\"dqText\">Not a fit yet.</p>"));
        assert!(!html.contains("dqAdditionalText"));

        let text = TextRenderer.disqualified(&copy);
        assert_eq!(text, "Not a fit yet.\n");
    }

    #[test]
    fn text_renderer_numbers_options() {
        let question = QuestionDefinition::new("q3", "Size?", &["2-10", "11-50"]);
        let text = TextRenderer.question(&question, 3, 8);
        assert_eq!(text, "Question 3 of 8\nSize?\n  1) 2-10\n  2) 11-50\n");
    }
}
