//! Prompt rendering with named placeholders.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use freyja_scraper::{truncate_chars, AcquisitionSource};

/// System message sent with every brand-analysis request.
pub const SYSTEM_PROMPT: &str = "JSON only.";

/// Page text beyond this many characters is not sent to the model.
pub const MAX_CONTENT_CHARS: usize = 6000;

const NO_COLORS_MARKER: &str = "NONE (site protected or no colors found)";
const INFER_COLORS_INSTRUCTION: &str = "no colors were detected; deduce a #RRGGBB primary and \
     secondary color that fits the brand universe described in the content";

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-z_]+)\s*\}\}").expect("valid placeholder regex")
});

const BRAND_ANALYSIS_TEMPLATE: &str = r#"You are a UI/UX and branding expert.

Analyse the website content below and identify the brand's visual identity.

Color rules:
1. "primaryColor": pick from DETECTED COLOR CANDIDATES when the list has entries. When it says NONE (protected site), you MUST deduce a hexadecimal color (#RRGGBB) that matches the brand universe described in the text (e.g. #000000 for luxury, #2E8B57 for nature, #0000FF for tech/corporate). Never leave it empty.
2. "secondaryColor": same rule, pick a complementary or contrasting color.

URL: {{url}}
Scraping source: {{source}}

DETECTED COLOR CANDIDATES (from HTML/CSS):
{{color_candidates}}

Content:
{{content}}

Reply ONLY with valid JSON in the following shape (no markdown). Write text values in French.
{
  "brandName": "Brand name",
  "offerDetails": "Description of the offer (2-3 sentences)",
  "targetAudience": "Primary target audience",
  "brandPositioning": "Positioning and tone",
  "primaryColor": "HEX code",
  "secondaryColor": "HEX code",
  "brandMood": "Visual mood in 3-4 keywords"
}"#;

/// Value for one template placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// A known value, injected verbatim.
    Given(String),
    /// No value available: renders `absent` followed by an `[INFER: ...]`
    /// instruction asking the model to fill the gap.
    Infer { absent: String, instruction: String },
}

impl Slot {
    /// `Given` for `Some`, `Infer` for `None`.
    #[must_use]
    pub fn from_option(value: Option<String>, absent: &str, instruction: &str) -> Self {
        match value {
            Some(value) => Slot::Given(value),
            None => Slot::Infer {
                absent: absent.to_string(),
                instruction: instruction.to_string(),
            },
        }
    }

    fn render(&self) -> Cow<'_, str> {
        match self {
            Slot::Given(value) => Cow::Borrowed(value),
            Slot::Infer {
                absent,
                instruction,
            } => Cow::Owned(format!("{absent} [INFER: {instruction}]")),
        }
    }
}

/// A prompt body with `{{name}}` placeholders.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    source: &'static str,
}

impl PromptTemplate {
    #[must_use]
    pub const fn new(source: &'static str) -> Self {
        Self { source }
    }

    /// The brand-analysis prompt used by [`crate::infer_brand_profile`].
    #[must_use]
    pub const fn brand_analysis() -> Self {
        Self::new(BRAND_ANALYSIS_TEMPLATE)
    }

    /// Substitutes every placeholder that has a slot.
    ///
    /// Placeholders without a matching slot are left untouched so a typo
    /// shows up in the rendered text instead of silently vanishing.
    #[must_use]
    pub fn render(&self, slots: &[(&str, Slot)]) -> String {
        PLACEHOLDER_RE
            .replace_all(self.source, |caps: &Captures<'_>| {
                let name = &caps[1];
                match slots.iter().find(|(key, _)| *key == name) {
                    Some((_, slot)) => slot.render().into_owned(),
                    None => {
                        tracing::debug!(placeholder = name, "no slot for prompt placeholder");
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }
}

/// Renders the brand-analysis prompt for one acquired page.
///
/// An empty `color_candidates` list turns the colors slot into an inference
/// request; `cleaned_text` is cut at [`MAX_CONTENT_CHARS`].
#[must_use]
pub fn brand_analysis_prompt(
    url: &str,
    source: AcquisitionSource,
    color_candidates: &[String],
    cleaned_text: &str,
) -> String {
    let colors = (!color_candidates.is_empty()).then(|| color_candidates.join(", "));
    let slots = [
        ("url", Slot::Given(url.to_string())),
        ("source", Slot::Given(source.label().to_string())),
        (
            "color_candidates",
            Slot::from_option(colors, NO_COLORS_MARKER, INFER_COLORS_INSTRUCTION),
        ),
        (
            "content",
            Slot::Given(truncate_chars(cleaned_text, MAX_CONTENT_CHARS).to_string()),
        ),
    ];
    PromptTemplate::brand_analysis().render(&slots)
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
