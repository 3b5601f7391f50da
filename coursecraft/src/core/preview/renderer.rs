//! Preview Renderer
//!
//! Pure rendering of a lesson into a [`PreviewDocument`].
//!
//! Items are rendered in stored order. The theme layout only contributes a
//! background, a layout hint and emphasis flags; it never reorders or hides
//! content. An item that cannot be decoded degrades to an "unknown content
//! type" block without affecting its siblings.

use serde::Serialize;
use tracing::debug;

use crate::core::{
    content::{
        AssignmentData, ContentData, ContentItem, ContentType, QuizData, SubmissionType,
        TextFormat, TranscriptData, VideoData,
    },
    theme::{Theme, ThemeLayout},
};

// =============================================================================
// Document Model
// =============================================================================

/// Rendered lesson preview
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDocument {
    pub title: String,
    pub description: String,
    pub layout: ThemeLayout,
    pub theme_name: Option<String>,
    /// CSS class of the preview background
    pub background: &'static str,
    pub layout_hint: &'static str,
    pub blocks: Vec<PreviewBlock>,
}

/// One rendered content item
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewBlock {
    pub item_id: Option<String>,
    pub title: String,
    pub kind: BlockKind,
    /// Highlighted by the layout
    pub emphasized: bool,
}

/// A transcript line with its formatted time label
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimestampLine {
    pub label: String,
    pub text: String,
}

/// Per-type block body
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BlockKind {
    #[serde(rename_all = "camelCase")]
    Video {
        url: String,
        duration_label: String,
        has_transcript: bool,
    },
    #[serde(rename_all = "camelCase")]
    Text { content: String, format: TextFormat },
    #[serde(rename_all = "camelCase")]
    Quiz {
        questions: Vec<String>,
        passing_score: i32,
        allow_retakes: bool,
        time_limit: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Assignment {
        description: String,
        submission_type: SubmissionType,
        allowed_file_types: Vec<String>,
        max_file_size: Option<u64>,
        due_date: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Transcript {
        content: String,
        lines: Vec<TimestampLine>,
    },
    #[serde(rename_all = "camelCase")]
    Unknown { type_name: String, reason: String },
}

impl BlockKind {
    fn matches(&self, content_type: ContentType) -> bool {
        matches!(
            (self, content_type),
            (BlockKind::Video { .. }, ContentType::Video)
                | (BlockKind::Text { .. }, ContentType::Text)
                | (BlockKind::Quiz { .. }, ContentType::Quiz)
                | (BlockKind::Assignment { .. }, ContentType::Assignment)
                | (BlockKind::Transcript { .. }, ContentType::Transcript)
        )
    }
}

// =============================================================================
// Layout
// =============================================================================

fn background_for(layout: ThemeLayout) -> &'static str {
    match layout {
        ThemeLayout::VideoFirst => "preview-bg-cinema",
        ThemeLayout::TextResources => "preview-bg-paper",
        ThemeLayout::QuizCentered => "preview-bg-focus",
        ThemeLayout::MixedContent => "preview-bg-default",
        ThemeLayout::Interactive => "preview-bg-workshop",
    }
}

fn hint_for(layout: ThemeLayout) -> &'static str {
    match layout {
        ThemeLayout::VideoFirst => "Video is featured at full width",
        ThemeLayout::TextResources => "Reading material is shown in a single column",
        ThemeLayout::QuizCentered => "Assessments are centered",
        ThemeLayout::MixedContent => "Content is shown in stored order",
        ThemeLayout::Interactive => "Exercises are highlighted",
    }
}

fn emphasized_type(layout: ThemeLayout) -> Option<ContentType> {
    match layout {
        ThemeLayout::VideoFirst => Some(ContentType::Video),
        ThemeLayout::TextResources => Some(ContentType::Text),
        ThemeLayout::QuizCentered => Some(ContentType::Quiz),
        ThemeLayout::Interactive => Some(ContentType::Assignment),
        ThemeLayout::MixedContent => None,
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders typed content items
pub fn render(
    title: &str,
    description: &str,
    items: &[ContentItem],
    theme: Option<&Theme>,
) -> PreviewDocument {
    let blocks = items
        .iter()
        .map(|item| PreviewBlock {
            item_id: Some(item.id.clone()),
            title: item.title.clone(),
            kind: render_data(item.data()),
            emphasized: false,
        })
        .collect();
    assemble(title, description, blocks, theme)
}

/// Renders raw JSON items, degrading undecodable ones to placeholders
pub fn render_value(
    title: &str,
    description: &str,
    items: &[serde_json::Value],
    theme: Option<&Theme>,
) -> PreviewDocument {
    let blocks = items.iter().map(render_raw_item).collect();
    assemble(title, description, blocks, theme)
}

fn render_raw_item(value: &serde_json::Value) -> PreviewBlock {
    let text_field = |key: &str| value.get(key).and_then(|v| v.as_str()).map(str::to_string);

    match serde_json::from_value::<ContentItem>(value.clone()) {
        Ok(item) => PreviewBlock {
            item_id: Some(item.id.clone()),
            title: item.title.clone(),
            kind: render_data(item.data()),
            emphasized: false,
        },
        Err(e) => {
            let type_name = text_field("type").unwrap_or_else(|| "missing".to_string());
            debug!("Rendering placeholder for item of type {}: {}", type_name, e);
            PreviewBlock {
                item_id: text_field("id"),
                title: text_field("title").unwrap_or_default(),
                kind: BlockKind::Unknown {
                    type_name,
                    reason: e.to_string(),
                },
                emphasized: false,
            }
        }
    }
}

fn assemble(
    title: &str,
    description: &str,
    mut blocks: Vec<PreviewBlock>,
    theme: Option<&Theme>,
) -> PreviewDocument {
    let layout = theme.map(|t| t.layout).unwrap_or_default();

    if let Some(content_type) = emphasized_type(layout) {
        for block in &mut blocks {
            block.emphasized = block.kind.matches(content_type);
        }
    }

    PreviewDocument {
        title: title.to_string(),
        description: description.to_string(),
        layout,
        theme_name: theme.map(|t| t.name.to_string()),
        background: background_for(layout),
        layout_hint: hint_for(layout),
        blocks,
    }
}

fn render_data(data: &ContentData) -> BlockKind {
    match data {
        ContentData::Video(video) => render_video(video),
        ContentData::Text(text) => BlockKind::Text {
            content: text.content.clone(),
            format: text.formatting,
        },
        ContentData::Quiz(quiz) => render_quiz(quiz),
        ContentData::Assignment(assignment) => render_assignment(assignment),
        ContentData::Transcript(transcript) => render_transcript(transcript),
    }
}

fn render_video(video: &VideoData) -> BlockKind {
    BlockKind::Video {
        url: video.url.clone(),
        duration_label: format_duration(video.duration),
        has_transcript: video.has_transcript,
    }
}

fn render_quiz(quiz: &QuizData) -> BlockKind {
    BlockKind::Quiz {
        questions: quiz.questions.iter().map(|q| q.question.clone()).collect(),
        passing_score: quiz.passing_score,
        allow_retakes: quiz.allow_retakes,
        time_limit: quiz.time_limit,
    }
}

fn render_assignment(assignment: &AssignmentData) -> BlockKind {
    BlockKind::Assignment {
        description: assignment.description.clone(),
        submission_type: assignment.submission_type,
        allowed_file_types: assignment.allowed_file_types.clone(),
        max_file_size: assignment.max_file_size,
        due_date: assignment
            .due_date
            .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string()),
    }
}

fn render_transcript(transcript: &TranscriptData) -> BlockKind {
    BlockKind::Transcript {
        content: transcript.content.clone(),
        lines: transcript
            .timestamps
            .iter()
            .map(|t| TimestampLine {
                label: format_duration(t.time),
                text: t.text.clone(),
            })
            .collect(),
    }
}

/// Formats seconds as `m:ss`, or `h:mm:ss` from one hour up
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

// =============================================================================
// HTML Output
// =============================================================================

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl PreviewDocument {
    /// Emits a standalone HTML fragment.
    ///
    /// Authored HTML text blocks are inserted verbatim; every other string is
    /// escaped.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str(&format!(
            "<article class=\"lesson-preview {} layout-{}\" data-hint=\"{}\">\n",
            self.background,
            self.layout,
            escape_html(self.layout_hint)
        ));
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&self.title)));
        if !self.description.is_empty() {
            html.push_str(&format!(
                "<p class=\"lesson-description\">{}</p>\n",
                escape_html(&self.description)
            ));
        }
        for block in &self.blocks {
            html.push_str(&block.to_html());
        }
        html.push_str("</article>\n");
        html
    }
}

impl PreviewBlock {
    fn to_html(&self) -> String {
        let class = match &self.kind {
            BlockKind::Video { .. } => "video",
            BlockKind::Text { .. } => "text",
            BlockKind::Quiz { .. } => "quiz",
            BlockKind::Assignment { .. } => "assignment",
            BlockKind::Transcript { .. } => "transcript",
            BlockKind::Unknown { .. } => "unknown",
        };
        let emphasis = if self.emphasized { " emphasized" } else { "" };

        let mut html = format!("<section class=\"block block-{class}{emphasis}\">\n");
        if !self.title.is_empty() {
            html.push_str(&format!("<h2>{}</h2>\n", escape_html(&self.title)));
        }
        html.push_str(&self.kind.body_html());
        html.push_str("</section>\n");
        html
    }
}

impl BlockKind {
    fn body_html(&self) -> String {
        match self {
            BlockKind::Video {
                url,
                duration_label,
                has_transcript,
            } => {
                let mut html = format!(
                    "<video src=\"{}\" controls></video>\n<span class=\"duration\">{}</span>\n",
                    escape_html(url),
                    duration_label
                );
                if *has_transcript {
                    html.push_str("<span class=\"badge\">Transcript available</span>\n");
                }
                html
            }
            BlockKind::Text { content, format } => match format {
                TextFormat::Html => format!("<div class=\"rich-text\">{content}</div>\n"),
                TextFormat::Markdown => {
                    format!("<pre class=\"markdown\">{}</pre>\n", escape_html(content))
                }
            },
            BlockKind::Quiz {
                questions,
                passing_score,
                allow_retakes,
                time_limit,
            } => {
                let mut html = String::from("<ol class=\"questions\">\n");
                for q in questions {
                    html.push_str(&format!("<li>{}</li>\n", escape_html(q)));
                }
                html.push_str("</ol>\n");
                html.push_str(&format!(
                    "<p class=\"quiz-meta\">Passing score: {passing_score}%{}{}</p>\n",
                    if *allow_retakes { " · Retakes allowed" } else { "" },
                    time_limit
                        .map(|m| format!(" · {m} min"))
                        .unwrap_or_default()
                ));
                html
            }
            BlockKind::Assignment {
                description,
                submission_type,
                allowed_file_types,
                max_file_size,
                due_date,
            } => {
                let mut html = format!("<p>{}</p>\n", escape_html(description));
                if submission_type.accepts_files() && !allowed_file_types.is_empty() {
                    html.push_str(&format!(
                        "<p class=\"file-types\">Accepted: {}</p>\n",
                        escape_html(&allowed_file_types.join(", "))
                    ));
                }
                if let Some(size) = max_file_size {
                    html.push_str(&format!("<p class=\"file-size\">Max size: {size} MB</p>\n"));
                }
                if let Some(due) = due_date {
                    html.push_str(&format!("<p class=\"due\">Due {}</p>\n", escape_html(due)));
                }
                html
            }
            BlockKind::Transcript { content, lines } => {
                let mut html = String::new();
                if lines.is_empty() {
                    html.push_str(&format!("<p>{}</p>\n", escape_html(content)));
                } else {
                    html.push_str("<dl class=\"timestamps\">\n");
                    for line in lines {
                        html.push_str(&format!(
                            "<dt>{}</dt><dd>{}</dd>\n",
                            line.label,
                            escape_html(&line.text)
                        ));
                    }
                    html.push_str("</dl>\n");
                }
                html
            }
            BlockKind::Unknown { type_name, .. } => format!(
                "<p class=\"placeholder\">Unknown content type: {}</p>\n",
                escape_html(type_name)
            ),
        }
    }
}
