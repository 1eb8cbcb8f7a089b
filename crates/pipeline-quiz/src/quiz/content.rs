//! Tier and variant specific result copy, as structured content.
//!
//! Nothing here produces markup; see [`super::render`] for that.

use serde::Serialize;

use super::classification::{ClassificationResult, Tier};

/// Inline run of text; emphasised runs are rendered bold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Segment {
    Text(String),
    Emphasis(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Paragraph(pub Vec<Segment>);

impl Paragraph {
    fn text(text: &str) -> Self {
        Self(vec![Segment::Text(text.to_string())])
    }

    /// Concatenated text without emphasis markers.
    pub fn plain(&self) -> String {
        self.0
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) | Segment::Emphasis(text) => text.as_str(),
            })
            .collect()
    }
}

/// Closing block appended to every result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallToAction {
    pub heading: &'static str,
    pub body: &'static str,
    pub link_label: &'static str,
    pub href: &'static str,
}

pub const CALL_TO_ACTION: CallToAction = CallToAction {
    heading: "Ready to Fix Your Pipeline?",
    body: "Let's discuss how Pipeline Panther can help transform your sales process.",
    link_label: "Get Started",
    href: "index.html#contact",
};

/// Everything the results screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultContent {
    pub tier: Tier,
    pub variant: u8,
    pub score: f32,
    pub label: String,
    pub paragraphs: Vec<Paragraph>,
    pub call_to_action: CallToAction,
}

impl ResultContent {
    pub fn score_display(&self) -> String {
        format!("{} / 10", self.score)
    }
}

/// Pick the copy block for a classification. Out-of-range variants fall back
/// to the tier's last block.
pub fn result_content(result: &ClassificationResult) -> ResultContent {
    let paragraphs = match (result.tier, result.variant) {
        (Tier::A, 1) => tier_a_profile(
            result.role.as_deref().unwrap_or_default(),
            result.company_size.as_deref().unwrap_or_default(),
        ),
        (Tier::A, _) => paragraphs(&[
            "You reported a serious mismatch between what your CRM/ERP says and what actually closes, plus low confidence in the data your team is entering. For a team at your size and stage, that usually means deals are slipping through the cracks and your forecast is more of a guess than a plan.",
            "In plain English: your pipeline is lying to you, and the bigger you grow on top of it, the more expensive those lies become.",
            "You're big enough that bad data and missed follow\u{2011}ups are now a real revenue leak, and your own answers say you feel that weekly. This isn't a tooling problem; it's a setup problem. Until you fix the way your CRM/ERP is implemented, every forecast and growth plan sits on a cracked foundation.",
        ]),
        (Tier::B, 1) => paragraphs(&[
            "You're not on fire yet, but your answers say it plainly: your forecast is unreliable, your team doesn't fully trust the CRM/ERP, and you're already seeing deals fall through the cracks.",
            "This is the danger zone. It feels \"manageable\" day\u{2011}to\u{2011}day, but every new rep and every new opportunity is being piled on top of a shaky system. If you try to scale on this, you're betting your targets, your bonuses, and your reputation on numbers you already know are wrong.",
        ]),
        (Tier::B, 2) => paragraphs(&[
            "You told us you still get surprised by what actually closes and that your data needs constant fixing. That means every forecast you present to your leadership or board is part data, part guess.",
            "In this range, most teams don't blow up overnight. They just quietly bleed: reps chase bad deals, good deals get ignored, and you miss targets by \"a little\" every quarter until it becomes the new normal.",
        ]),
        (Tier::B, _) => paragraphs(&[
            "Right now you're in the worst possible spot: the system is painful enough that you feel it, but not broken enough to force an emergency rebuild. That's how teams get stuck for years with a CRM/ERP everyone complains about, no one truly owns, and everyone quietly works around in spreadsheets.",
            "The longer you stay here, the more expensive and politically painful the eventual fix becomes.",
        ]),
        (Tier::C, 1) => paragraphs(&[
            "You're not in crisis, but you also didn't describe a setup you'd bet the next stage of growth on. When the forecast is \"mostly right\" and the data is \"mostly trusted,\" what usually happens is simple: you leave money on the table without realizing how much.",
            "That's the trap. Because nothing is obviously broken, fixing it never becomes urgent\u{2026} until you miss a big target and have to admit the system underneath was never truly solid.",
        ]),
        (Tier::C, 2) => paragraphs(&[
            "Your answers suggest a pipeline that works well enough to keep things moving, but not well enough to give you real confidence. You might hit goals while things are small, but as volume increases, small data issues and adoption gaps compound into missed follow\u{2011}ups, fuzzy forecasts, and \"we should have seen that coming\" moments.",
        ]),
        (Tier::C, _) => paragraphs(&[
            "You're in the \"it's fine for now\" zone. That's exactly where most teams are right before they outgrow their process. On the surface, things look okay; underneath, you've already got enough noise in your CRM/ERP that a few more reps or a few bigger deals could push it past its limit fast.",
        ]),
    };

    ResultContent {
        tier: result.tier,
        variant: result.variant,
        score: result.score,
        label: result.label.clone(),
        paragraphs,
        call_to_action: CALL_TO_ACTION,
    }
}

fn paragraphs(texts: &[&str]) -> Vec<Paragraph> {
    texts.iter().map(|text| Paragraph::text(text)).collect()
}

fn tier_a_profile(role: &str, company_size: &str) -> Vec<Paragraph> {
    vec![
        Paragraph(vec![
            Segment::Text("Based on your answers, you're a ".to_string()),
            Segment::Emphasis(role.to_string()),
            Segment::Text(" at a ".to_string()),
            Segment::Emphasis(format!("{company_size} employee")),
            Segment::Text(
                " B2B company, planning CRM/ERP work in the next 3\u{2013}12 months. You also told us your forecast is often way off and you don't fully trust the data in your system."
                    .to_string(),
            ),
        ]),
        Paragraph::text(
            "That combination is dangerous: you're making big growth decisions on numbers you don't believe, right before you invest more into the same broken setup.",
        ),
    ]
}
