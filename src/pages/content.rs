//! Static content pages (home, about, contact)

use serde::Serialize;

use crate::config::SchoolConfig;
use crate::error::{PortalError, PortalResult};
use crate::i18n::Translator;

pub const PAGES: [&str; 3] = ["home", "about", "contact"];

#[derive(Debug, Clone, Serialize)]
pub struct ContentBlock {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactLine {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactInfo {
    pub school: String,
    pub lines: Vec<ContactLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentPage {
    pub page: String,
    pub title: String,
    pub subtitle: String,
    pub sections: Vec<ContentBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
}

fn block(translator: &dyn Translator, prefix: &str) -> ContentBlock {
    ContentBlock {
        heading: translator.t(&format!("{}.heading", prefix)),
        body: translator.t(&format!("{}.body", prefix)),
    }
}

fn contact_info(translator: &dyn Translator, school: &SchoolConfig) -> ContactInfo {
    let lines = [
        ("contact.address", &school.address),
        ("contact.phone", &school.phone),
        ("contact.email", &school.email),
        ("contact.hours", &school.hours),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .map(|(key, value)| ContactLine {
        label: translator.t(key),
        value: value.clone(),
    })
    .collect();

    ContactInfo {
        school: school.name.clone(),
        lines,
    }
}

/// Render one of the public pages in the translator's language
pub fn content_page(page: &str, translator: &dyn Translator, school: &SchoolConfig) -> PortalResult<ContentPage> {
    let sections: &[&str] = match page {
        "home" => &["page.home.method", "page.home.programs", "page.home.visit"],
        "about" => &["page.about.mission", "page.about.team", "page.about.reports"],
        "contact" => &["page.contact.visit"],
        _ => return Err(PortalError::NotFound(format!("page {}", page))),
    };

    Ok(ContentPage {
        page: page.to_string(),
        title: translator.t(&format!("page.{}.title", page)),
        subtitle: translator.t(&format!("page.{}.subtitle", page)),
        sections: sections.iter().map(|prefix| block(translator, prefix)).collect(),
        contact: (page == "contact").then(|| contact_info(translator, school)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;

    #[test]
    fn test_pages_render_in_both_languages() {
        let school = SchoolConfig::default();
        for page in PAGES {
            for lang in [Language::Tr, Language::En] {
                let rendered = content_page(page, &lang, &school).unwrap();
                assert!(!rendered.title.starts_with("page."), "{} {:?}", page, lang);
                assert!(rendered.sections.iter().all(|s| !s.body.starts_with("page.")));
            }
        }
        assert_eq!(content_page("about", &Language::En, &school).unwrap().title, "About Ref Academy");
    }

    #[test]
    fn test_contact_page_uses_configured_details() {
        let school = SchoolConfig {
            phone: "+90 212 555 00 00".to_string(),
            hours: String::new(),
            ..SchoolConfig::default()
        };
        let page = content_page("contact", &Language::Tr, &school).unwrap();
        let contact = page.contact.unwrap();
        assert!(contact
            .lines
            .iter()
            .any(|l| l.label == "Telefon" && l.value == "+90 212 555 00 00"));
        assert!(!contact.lines.iter().any(|l| l.label == "Çalışma Saatleri"));

        assert!(content_page("home", &Language::Tr, &school).unwrap().contact.is_none());
    }

    #[test]
    fn test_unknown_page() {
        let result = content_page("fees", &Language::En, &SchoolConfig::default());
        assert!(matches!(result, Err(PortalError::NotFound(_))));
    }
}
