//! Theme Catalog
//!
//! Statically bundled lesson themes. The catalog is immutable: there is no
//! runtime registration.

use serde::{Deserialize, Serialize};

use crate::core::content::ContentType;

/// Visual treatment of the preview, derived from a theme
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeLayout {
    VideoFirst,
    TextResources,
    QuizCentered,
    #[default]
    MixedContent,
    Interactive,
}

impl ThemeLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeLayout::VideoFirst => "video-first",
            ThemeLayout::TextResources => "text-resources",
            ThemeLayout::QuizCentered => "quiz-centered",
            ThemeLayout::MixedContent => "mixed-content",
            ThemeLayout::Interactive => "interactive",
        }
    }
}

impl std::fmt::Display for ThemeLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capability flags of a theme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ThemeSections {
    pub video: bool,
    pub content: bool,
    pub quiz: bool,
    pub assignments: bool,
    pub resources: bool,
}

/// Partial content item declared by a theme; data is synthesized at apply time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ContentTemplate {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub title: &'static str,
}

const fn template(content_type: ContentType, title: &'static str) -> ContentTemplate {
    ContentTemplate { content_type, title }
}

/// Immutable catalog entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub layout: ThemeLayout,
    pub sections: ThemeSections,
    pub default_content: &'static [ContentTemplate],
}

/// Every bundled theme, in display order
pub static THEME_CATALOG: [Theme; 5] = [
    Theme {
        id: "video-lecture",
        name: "Video Lecture",
        description: "A recorded lecture followed by its transcript",
        layout: ThemeLayout::VideoFirst,
        sections: ThemeSections {
            video: true,
            content: false,
            quiz: false,
            assignments: false,
            resources: true,
        },
        default_content: &[
            template(ContentType::Video, "Lecture Video"),
            template(ContentType::Transcript, "Lecture Transcript"),
        ],
    },
    Theme {
        id: "reading-resources",
        name: "Reading & Resources",
        description: "Reading material with supporting resources and a reflection task",
        layout: ThemeLayout::TextResources,
        sections: ThemeSections {
            video: false,
            content: true,
            quiz: false,
            assignments: true,
            resources: true,
        },
        default_content: &[
            template(ContentType::Text, "Reading"),
            template(ContentType::Text, "Further Resources"),
            template(ContentType::Assignment, "Reflection"),
        ],
    },
    Theme {
        id: "knowledge-check",
        name: "Knowledge Check",
        description: "Short instructions and an assessed quiz",
        layout: ThemeLayout::QuizCentered,
        sections: ThemeSections {
            video: false,
            content: true,
            quiz: true,
            assignments: false,
            resources: false,
        },
        default_content: &[
            template(ContentType::Text, "Instructions"),
            template(ContentType::Quiz, "Knowledge Check"),
        ],
    },
    Theme {
        id: "complete-lesson",
        name: "Complete Lesson",
        description: "Video introduction, written notes and a closing quiz",
        layout: ThemeLayout::MixedContent,
        sections: ThemeSections {
            video: true,
            content: true,
            quiz: true,
            assignments: false,
            resources: false,
        },
        default_content: &[
            template(ContentType::Video, "Introduction"),
            template(ContentType::Text, "Lesson Notes"),
            template(ContentType::Quiz, "Lesson Quiz"),
        ],
    },
    Theme {
        id: "interactive-workshop",
        name: "Interactive Workshop",
        description: "Demo, walkthrough, hands-on exercise and wrap-up quiz",
        layout: ThemeLayout::Interactive,
        sections: ThemeSections {
            video: true,
            content: true,
            quiz: true,
            assignments: true,
            resources: false,
        },
        default_content: &[
            template(ContentType::Video, "Demo"),
            template(ContentType::Text, "Walkthrough"),
            template(ContentType::Assignment, "Hands-on Exercise"),
            template(ContentType::Quiz, "Wrap-up Quiz"),
        ],
    },
];

/// Returns the whole catalog
pub fn catalog() -> &'static [Theme] {
    &THEME_CATALOG
}

/// Looks up a theme by id
pub fn find_theme(theme_id: &str) -> Option<&'static Theme> {
    THEME_CATALOG.iter().find(|t| t.id == theme_id)
}

/// Looks up a theme by display name (case-insensitive)
pub fn find_theme_by_name(name: &str) -> Option<&'static Theme> {
    let name = name.trim();
    THEME_CATALOG
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
}

/// Looks up a theme by id, falling back to display name
pub fn resolve_theme(key: &str) -> Option<&'static Theme> {
    find_theme(key).or_else(|| find_theme_by_name(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_unique() {
        let mut ids: Vec<_> = catalog().iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn test_sections_match_templates() {
        for theme in catalog() {
            for t in theme.default_content {
                match t.content_type {
                    ContentType::Video => assert!(theme.sections.video, "{}", theme.id),
                    ContentType::Quiz => assert!(theme.sections.quiz, "{}", theme.id),
                    ContentType::Assignment => assert!(theme.sections.assignments, "{}", theme.id),
                    ContentType::Text | ContentType::Transcript => {}
                }
            }
        }
    }

    #[test]
    fn test_lookup() {
        let theme = resolve_theme("complete lesson").unwrap();
        assert_eq!(theme.id, "complete-lesson");
        assert_eq!(find_theme("knowledge-check").unwrap().layout, ThemeLayout::QuizCentered);
        assert!(resolve_theme("missing").is_none());
    }

    #[test]
    fn test_layout_wire_names() {
        let json = serde_json::to_string(&ThemeLayout::TextResources).unwrap();
        assert_eq!(json, "\"text-resources\"");
        assert_eq!(ThemeLayout::VideoFirst.to_string(), "video-first");
    }
}
