//! consulting-site: command line access to the site's collections
//!
//! Lists and deletes records, exports applications, prints the dashboard
//! summary and runs the scripted assistant on stdin.

use std::path::Path;
use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use consulting_site::assistant::{Assistant, ChatMessage, Role};
use consulting_site::config::{ConfigError, SiteConfig};
use consulting_site::domain::{
    BlogPost, CaseStudy, CompanyMilestone, ContactSubmission, DomainError, Entity, JobApplication, JobOpening,
    Project, Service, TeamMember, Testimonial, COLLECTIONS,
};
use consulting_site::export::ExportError;
use consulting_site::filter::{Filterable, ViewQuery};
use consulting_site::form::{FormError, Notice};
use consulting_site::pages::{AdminDashboard, PageContext, Section};
use consulting_site::repository::CollectionClient;
use consulting_site::store::CollectionStore;

const APP_NAME: &str = "consulting-site";

#[derive(Parser)]
#[command(name = "consulting-site")]
#[command(about = "Browse and manage the consulting site's collections")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "site.toml", env = "SITE_CONFIG")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print records of a collection as JSON lines
    List {
        collection: String,
        /// Case-insensitive text search
        #[arg(short, long, default_value = "")]
        search: String,
        /// Page size; defaults to the configured one
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Export job applications as CSV
    Export {
        #[arg(short, long, default_value = "")]
        search: String,
        /// Application status, or "all"
        #[arg(long, default_value = "all")]
        status: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Delete one record; without --yes only the confirmation is shown
    Delete {
        collection: String,
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Talk to the site assistant, one message per line
    Chat,
    /// Print the admin dashboard summary
    Summary,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown collection `{0}` (expected one of: {known})", known = COLLECTIONS.join(", "))]
    UnknownCollection(String),
}

/// Call `$func::<Entity>(args..)` for the entity stored in `$name`
macro_rules! with_collection {
    ($name:expr, $func:ident ( $($arg:expr),* )) => {
        match $name {
            "blogposts" => $func::<BlogPost>($($arg),*).await,
            "projects" => $func::<Project>($($arg),*).await,
            "services" => $func::<Service>($($arg),*).await,
            "testimonials" => $func::<Testimonial>($($arg),*).await,
            "teammembers" => $func::<TeamMember>($($arg),*).await,
            "jobopenings" => $func::<JobOpening>($($arg),*).await,
            "jobapplications" => $func::<JobApplication>($($arg),*).await,
            "casestudies" => $func::<CaseStudy>($($arg),*).await,
            "companymilestones" => $func::<CompanyMilestone>($($arg),*).await,
            "contactsubmissions" => $func::<ContactSubmission>($($arg),*).await,
            other => Err(CliError::UnknownCollection(other.to_string())),
        }
    };
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = rolling_logger::init_logger_with(config.logging.logger_options(APP_NAME)) {
        eprintln!("Warning: logging disabled: {}", e);
    }
    info!(config = %cli.config, backend = ?config.backend.kind, "starting");

    if let Err(e) = run(cli.command, &config).await {
        error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Config file if present, then environment overrides
fn load_config(path: &str) -> Result<SiteConfig, ConfigError> {
    let mut config = if Path::new(path).exists() {
        SiteConfig::load(path)?
    } else {
        SiteConfig::default()
    };
    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}

async fn run(command: Command, config: &SiteConfig) -> Result<(), CliError> {
    match command {
        Command::List {
            collection,
            search,
            limit,
        } => {
            let ctx = connect(config).await?;
            let limit = limit.unwrap_or(config.sync.page_size);
            with_collection!(collection.as_str(), list(&ctx, &search, limit))
        }
        Command::Delete { collection, id, yes } => {
            let ctx = connect(config).await?;
            with_collection!(collection.as_str(), delete(&ctx, &id, yes))
        }
        Command::Export { search, status, out } => export(connect(config).await?, search, status, out).await,
        Command::Summary => summary(connect(config).await?).await,
        Command::Chat => chat(config).await,
    }
}

async fn connect(config: &SiteConfig) -> Result<PageContext, CliError> {
    let client = config.connect().await?;
    Ok(PageContext::from_config(client, config))
}

async fn list<T: Entity + Filterable>(ctx: &PageContext, search: &str, limit: usize) -> Result<(), CliError> {
    let client: &dyn CollectionClient = ctx.client.as_ref();
    let mut store = CollectionStore::<T>::new(ctx.strategy);
    store.load_first_page(client, limit).await;
    if let Some(e) = store.last_error() {
        return Err(e.clone().into());
    }

    for item in store.view(&ViewQuery::new().search(search)) {
        println!("{}", serde_json::to_string(&item)?);
    }
    if store.has_more() {
        eprintln!("(more {} available; raise --limit)", T::COLLECTION);
    }
    Ok(())
}

async fn delete<T: Entity>(ctx: &PageContext, id: &str, yes: bool) -> Result<(), CliError> {
    let client: &dyn CollectionClient = ctx.client.as_ref();
    let mut section = Section::<T>::new(ctx.strategy);
    section.load(client).await;
    if let Some(e) = section.store.last_error() {
        return Err(e.clone().into());
    }
    if section.store.get(id).is_none() {
        return Err(DomainError::not_found(T::COLLECTION, id).into());
    }

    section.form.select_for_delete(id, id)?;
    if !yes {
        println!("Delete {} `{}`? Re-run with --yes to confirm.", T::LABEL, id);
        return Ok(());
    }
    section.confirm_delete(client).await?;
    if let Some(Notice::Success(message)) = section.form.notice() {
        println!("{}", message);
    }
    Ok(())
}

async fn export(ctx: PageContext, search: String, status: String, out: Option<String>) -> Result<(), CliError> {
    let mut admin = AdminDashboard::new(ctx);
    admin.load().await;
    if let Some(alert) = admin.alert() {
        eprintln!("Warning: {}", alert);
    }
    admin.set_search(search);
    admin.set_status_filter(status);

    let (file_name, csv) = admin.export_applications()?;
    match out {
        Some(path) => {
            tokio::fs::write(&path, csv).await?;
            info!(path = %path, "applications exported");
            println!("Wrote {}", path);
        }
        None => {
            eprintln!("{}", file_name);
            println!("{}", csv);
        }
    }
    Ok(())
}

async fn summary(ctx: PageContext) -> Result<(), CliError> {
    let mut admin = AdminDashboard::new(ctx);
    admin.load().await;
    if let Some(alert) = admin.alert() {
        eprintln!("Warning: {}", alert);
    }
    println!("{}", serde_json::to_string_pretty(&admin.summary())?);
    Ok(())
}

async fn chat(config: &SiteConfig) -> Result<(), CliError> {
    let delay = Duration::from_millis(config.assistant.reply_delay_ms);
    let mut assistant = Assistant::new(config.site.clone(), delay);
    for message in assistant.messages() {
        print_message(message);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(reply) = assistant.send(&line).await {
            print_message(reply);
        }
    }
    Ok(())
}

fn print_message(message: &ChatMessage) {
    let who = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    println!("[{}] {}: {}", message.time_label(), who, message.content);
    for suggestion in &message.suggestions {
        println!("    > {}", suggestion);
    }
}
