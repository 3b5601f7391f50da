//! CourseCraft CLI
//!
//! Headless driver for the authoring engine. Works on a course directory that
//! holds `draft.json` and, once published, `published.json`.

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};

use coursecraft_lib::core::{
    course::CourseState,
    fs::validate_course_dir,
    preview::render_value,
    settings::SettingsManager,
    store::{CourseSink, JsonCourseStore},
    theme::{catalog, resolve_theme},
};
use coursecraft_lib::AuthoringSession;

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser)]
#[command(name = "coursecraft-cli")]
#[command(version, about = "Author lessons and render previews from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Course directory
    #[arg(long, global = true, default_value = ".")]
    course: String,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Also write a daily log file under the config directory
    #[arg(long, global = true)]
    log_file: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the bundled lesson themes
    Themes {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Create an empty course draft
    Init {
        /// Course title
        #[arg(long)]
        title: String,

        /// Replace an existing draft
        #[arg(long)]
        force: bool,
    },

    /// Add a lesson, creating its section when needed
    AddLesson {
        /// Section title; an existing section with this title is reused
        #[arg(long)]
        section: String,

        /// Lesson title
        #[arg(long)]
        title: String,
    },

    /// Append a theme's default content to a lesson
    ApplyTheme {
        /// Lesson id
        #[arg(long)]
        lesson: String,

        /// Theme id or display name
        #[arg(long)]
        theme: String,
    },

    /// Render a lesson preview from the draft
    Render {
        /// Lesson id
        #[arg(long)]
        lesson: String,

        /// Theme id or name to style the preview with
        #[arg(long)]
        theme: Option<String>,

        /// Print HTML instead of JSON
        #[arg(long)]
        html: bool,
    },

    /// Check every content item in the draft
    Validate {
        /// Publish the draft when it validates
        #[arg(long)]
        publish: bool,
    },
}

fn init_logging(level: &str, log_file: bool) {
    use tracing_subscriber::prelude::*;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions));

    let file_layer = if log_file {
        let log_dir = config_dir().join("logs");
        let _ = std::fs::create_dir_all(&log_dir);
        let file_appender = tracing_appender::rolling::daily(&log_dir, "coursecraft.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let _ = LOG_GUARD.set(guard);
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
    } else {
        None
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer);

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("coursecraft")
}

fn open_store(course: &str) -> Result<JsonCourseStore> {
    let dir = validate_course_dir(course, "Course directory").map_err(|e| anyhow!(e))?;
    Ok(JsonCourseStore::new(dir))
}

fn load_session(store: &JsonCourseStore) -> Result<AuthoringSession> {
    let document = store
        .load_draft()
        .with_context(|| format!("Failed to load draft from {}", store.draft_path().display()))?;
    let settings = SettingsManager::new(config_dir()).load();
    Ok(AuthoringSession::with_state(document.into_state(), settings))
}

fn save_session(session: &mut AuthoringSession, store: &JsonCourseStore) -> Result<()> {
    session
        .save_draft(store)
        .with_context(|| format!("Failed to save draft to {}", store.draft_path().display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_file);

    match cli.command {
        Commands::Themes { json } => cmd_themes(json),
        Commands::Init { title, force } => cmd_init(&cli.course, &title, force),
        Commands::AddLesson { section, title } => cmd_add_lesson(&cli.course, &section, &title),
        Commands::ApplyTheme { lesson, theme } => cmd_apply_theme(&cli.course, &lesson, &theme),
        Commands::Render { lesson, theme, html } => {
            cmd_render(&cli.course, &lesson, theme.as_deref(), html)
        }
        Commands::Validate { publish } => cmd_validate(&cli.course, publish),
    }
}

// =============================================================================
// Commands
// =============================================================================

fn cmd_themes(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(catalog())?);
        return Ok(());
    }

    for theme in catalog() {
        let items: Vec<String> = theme
            .default_content
            .iter()
            .map(|t| t.content_type.to_string())
            .collect();
        println!(
            "{:<18} {:<18} {:<16} {}",
            theme.id,
            theme.name,
            theme.layout.as_str(),
            items.join(", ")
        );
    }
    Ok(())
}

fn cmd_init(course: &str, title: &str, force: bool) -> Result<()> {
    let store = open_store(course)?;
    if store.has_draft() && !force {
        bail!(
            "A draft already exists at {} (use --force to replace it)",
            store.draft_path().display()
        );
    }

    let state = CourseState::new(title);
    store.save_draft(&state.meta, state.sections())?;
    println!("{}", store.draft_path().display());
    Ok(())
}

fn cmd_add_lesson(course: &str, section_title: &str, title: &str) -> Result<()> {
    let store = open_store(course)?;
    let mut session = load_session(&store)?;

    let existing = session
        .outline()
        .sections
        .iter()
        .find(|s| s.title == section_title)
        .map(|s| s.id.clone());
    let section_id = match existing {
        Some(id) => id,
        None => {
            debug!("Creating section '{}'", section_title);
            session.add_section(section_title)?
        }
    };

    let lesson_id = session
        .add_lesson(&section_id, title)?
        .ok_or_else(|| anyhow!("Section {} disappeared while adding a lesson", section_id))?;
    save_session(&mut session, &store)?;

    info!("Added lesson '{}' to section '{}'", title, section_title);
    println!("{}", lesson_id);
    Ok(())
}

fn cmd_apply_theme(course: &str, lesson_id: &str, theme_key: &str) -> Result<()> {
    let theme = resolve_theme(theme_key).ok_or_else(|| anyhow!("Unknown theme: {}", theme_key))?;
    let store = open_store(course)?;
    let mut session = load_session(&store)?;

    let result = session.apply_theme(lesson_id, theme.id)?;
    if result.is_noop() {
        bail!("Lesson not found: {}", lesson_id);
    }
    save_session(&mut session, &store)?;

    for id in &result.created_ids {
        println!("{}", id);
    }
    Ok(())
}

/// Finds a lesson object in the raw draft
fn find_lesson<'a>(draft: &'a Value, lesson_id: &str) -> Option<&'a Value> {
    draft["sections"]
        .as_array()?
        .iter()
        .filter_map(|section| section["lessons"].as_array())
        .flatten()
        .find(|lesson| lesson["id"].as_str() == Some(lesson_id))
}

fn cmd_render(course: &str, lesson_id: &str, theme_key: Option<&str>, html: bool) -> Result<()> {
    let theme = match theme_key {
        Some(key) => Some(resolve_theme(key).ok_or_else(|| anyhow!("Unknown theme: {}", key))?),
        None => None,
    };
    let store = open_store(course)?;

    // Read untyped so items of unknown type still render as placeholders
    let draft = store.load_draft_value().with_context(|| {
        format!("Failed to read draft from {}", store.draft_path().display())
    })?;
    let lesson = find_lesson(&draft, lesson_id)
        .ok_or_else(|| anyhow!("Lesson not found: {}", lesson_id))?;

    let items = lesson["contentItems"].as_array().map(Vec::as_slice).unwrap_or(&[]);
    let document = render_value(
        lesson["title"].as_str().unwrap_or_default(),
        lesson["description"].as_str().unwrap_or_default(),
        items,
        theme,
    );

    if html {
        println!("{}", document.to_html());
    } else {
        println!("{}", serde_json::to_string_pretty(&document)?);
    }
    Ok(())
}

fn cmd_validate(course: &str, publish: bool) -> Result<()> {
    let store = open_store(course)?;
    let mut session = load_session(&store)?;

    let issues = session.outline().content_issues();
    for issue in &issues {
        println!("{}", issue);
    }
    if !issues.is_empty() {
        bail!("{} content issue(s) found", issues.len());
    }
    println!("All content items are valid");

    if publish {
        session.publish(&store)?;
        println!("{}", store.published_path().display());
    }
    Ok(())
}
