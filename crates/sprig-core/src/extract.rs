use scraper::{ElementRef, Html, Selector};

use crate::error::AppError;
use crate::models::{LinkMap, ProfileRecord};
use crate::rules::ExtractionRules;

/// A parsed profile page.
///
/// Not `Send`: parse, extract and drop it within one synchronous step.
pub struct ProfileDocument {
    html: Html,
}

impl ProfileDocument {
    /// Parse an HTML body. HTML parsing is lenient, so the only body
    /// rejected here is one with no content at all.
    pub fn parse(body: &str) -> Result<Self, AppError> {
        if body.trim().is_empty() {
            return Err(AppError::MalformedBody("empty document".to_string()));
        }
        Ok(Self {
            html: Html::parse_document(body),
        })
    }

    fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector)
    }
}

/// Compiled form of [`ExtractionRules`].
#[derive(Debug, Clone)]
struct CompiledRules {
    title: Selector,
    link_button: Selector,
    link_label: Selector,
    social_icon: Selector,
    icon_label: Selector,
    icon_label_attr: String,
    profile_title: Selector,
    profile_image: Selector,
}

fn compile(name: &str, selector: &str) -> Result<Selector, AppError> {
    Selector::parse(selector)
        .map_err(|e| AppError::ExtractionError(format!("invalid {name} selector {selector:?}: {e}")))
}

/// Applies the structural rules to a parsed page.
///
/// Each rule writes to its own field(s), so the rules are independent of
/// each other and of evaluation order.
#[derive(Debug, Clone)]
pub struct ProfileExtractor {
    rules: CompiledRules,
}

impl ProfileExtractor {
    pub fn new(rules: &ExtractionRules) -> Result<Self, AppError> {
        Ok(Self {
            rules: CompiledRules {
                title: compile("title", &rules.title)?,
                link_button: compile("link_button", &rules.link_button)?,
                link_label: compile("link_label", &rules.link_label)?,
                social_icon: compile("social_icon", &rules.social_icon)?,
                icon_label: compile("icon_label", &rules.icon_label)?,
                icon_label_attr: rules.icon_label_attr.clone(),
                profile_title: compile("profile_title", &rules.profile_title)?,
                profile_image: compile("profile_image", &rules.profile_image)?,
            },
        })
    }

    /// Extractor for the default Linktree layout.
    pub fn linktree() -> Result<Self, AppError> {
        Self::new(&ExtractionRules::default())
    }

    /// Parse `body` and extract in one step.
    pub fn extract_html(&self, body: &str) -> Result<ProfileRecord, AppError> {
        let document = ProfileDocument::parse(body)?;
        Ok(self.extract(&document))
    }

    /// Populate a fresh record from `document`. Missing nodes leave the
    /// corresponding field empty.
    pub fn extract(&self, document: &ProfileDocument) -> ProfileRecord {
        let mut record = ProfileRecord::new();
        self.extract_title(document, &mut record);
        self.extract_links(document, &mut record.links);
        self.extract_icon_links(document, &mut record.icon_links);
        self.extract_profile_name(document, &mut record);
        self.extract_profile_image(document, &mut record);

        tracing::debug!(
            links = record.links.len(),
            icon_links = record.icon_links.len(),
            has_image = !record.profile_image_url.is_empty(),
            "Extracted profile fields"
        );
        record
    }

    fn extract_title(&self, document: &ProfileDocument, record: &mut ProfileRecord) {
        for node in document.select(&self.rules.title) {
            record.title = node.text().collect();
        }
    }

    fn extract_links(&self, document: &ProfileDocument, links: &mut LinkMap) {
        for node in document.select(&self.rules.link_button) {
            let label = child_text(node, &self.rules.link_label);
            let href = node.value().attr("href").unwrap_or_default();
            if label.is_empty() || href.is_empty() {
                tracing::debug!(%label, %href, "Skipping incomplete link button");
                continue;
            }
            links.insert(label, href.to_string());
        }
    }

    fn extract_icon_links(&self, document: &ProfileDocument, icon_links: &mut LinkMap) {
        for node in document.select(&self.rules.social_icon) {
            let name = node
                .select(&self.rules.icon_label)
                .next()
                .and_then(|child| child.value().attr(&self.rules.icon_label_attr))
                .unwrap_or_default();
            let href = node.value().attr("href").unwrap_or_default();
            if name.is_empty() || href.is_empty() {
                tracing::debug!(%name, %href, "Skipping incomplete social icon");
                continue;
            }
            icon_links.insert(name.to_string(), href.to_string());
        }
    }

    fn extract_profile_name(&self, document: &ProfileDocument, record: &mut ProfileRecord) {
        for node in document.select(&self.rules.profile_title) {
            record.profile_name = node.text().collect();
        }
    }

    fn extract_profile_image(&self, document: &ProfileDocument, record: &mut ProfileRecord) {
        for node in document.select(&self.rules.profile_image) {
            if let Some(src) = node.value().attr("src").filter(|s| !s.is_empty()) {
                record.profile_image_url = src.to_string();
            }
        }
    }
}

/// Concatenated text of all descendants matching `selector`, trimmed.
fn child_text(node: ElementRef<'_>, selector: &Selector) -> String {
    node.select(selector)
        .flat_map(|child| child.text())
        .collect::<String>()
        .trim()
        .to_string()
}
