//! aicommit - CLI entry point.

use std::process;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use dialoguer::Confirm;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use aicommit::commit::{
    CommitOutcome, ReportPeriod, check_provider, commit_literal, default_allowed_types,
    generate_and_commit, generate_report, generation_timeout, report_commits,
};
use aicommit::config::{
    ConfigOverrides, Language, ProviderConfig, ProviderKind, Settings, mask_secret,
};
use aicommit::git::{ChangeScope, locate_repository, user_email};
use aicommit::llm::create_provider;

/// Draft conventional commit messages from your changes using an LLM.
#[derive(Parser, Debug)]
#[command(name = "aicommit")]
#[command(about = "Draft conventional commit messages from your changes using an LLM")]
#[command(version)]
struct Cli {
    /// Show debug logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a commit message for the current changes and commit it
    Commit(CommitArgs),
    /// Store API keys and defaults
    Config(ConfigArgs),
    /// Send a minimal request to check that a provider is reachable
    Check(CheckArgs),
    /// Summarize an author's commits into a Markdown work report
    Report(ReportArgs),
}

/// Flags shared by every command that calls a provider.
#[derive(Args, Debug)]
struct GenerationArgs {
    /// Provider to use (qwen, openai, claude, deepseek)
    #[arg(short, long)]
    provider: Option<ProviderKind>,

    /// Model name (defaults per provider)
    #[arg(long)]
    model: Option<String>,

    /// Seconds to wait for the provider (default 60, or AICOMMIT_TIMEOUT)
    #[arg(long)]
    timeout: Option<u64>,

    /// Language of the instructions sent to the model (en, zh-CN, zh-TW)
    #[arg(short, long)]
    language: Option<Language>,
}

impl GenerationArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            provider: self.provider,
            model: self.model.clone(),
            language: self.language,
            ..ConfigOverrides::default()
        }
    }
}

#[derive(Args, Debug)]
struct CommitArgs {
    #[command(flatten)]
    generation: GenerationArgs,

    /// Commit with this message instead of generating one
    #[arg(short, long)]
    message: Option<String>,

    /// Summarize unstaged changes and stage them when committing
    #[arg(long)]
    unstaged: bool,

    /// Sampling temperature between 0 and 1
    #[arg(long)]
    temperature: Option<f32>,

    /// Maximum tokens in the generated message
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Commit without asking for confirmation
    #[arg(short, long)]
    yes: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Provider the API key belongs to
    #[arg(short, long)]
    provider: Option<ProviderKind>,

    /// API key to store for the provider
    #[arg(short = 'k', long, requires = "provider")]
    api_key: Option<String>,

    /// Make the provider the default
    #[arg(long = "default", requires = "provider")]
    make_default: bool,

    /// Model for the default provider (empty to clear)
    #[arg(long)]
    model: Option<String>,

    /// Endpoint origin for the default provider (empty to clear)
    #[arg(long)]
    base_url: Option<String>,

    /// Default language for generated messages (en, zh-CN, zh-TW)
    #[arg(short, long)]
    language: Option<Language>,

    /// Print the current configuration
    #[arg(long)]
    show: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Provider to check (defaults to the configured provider)
    #[arg(short, long)]
    provider: Option<ProviderKind>,

    /// Seconds to wait for the provider
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[command(flatten)]
    generation: GenerationArgs,

    /// First day of the report (YYYY-MM-DD)
    #[arg(long, conflicts_with_all = ["this_week", "last_week"])]
    since: Option<String>,

    /// Last day of the report (YYYY-MM-DD, defaults to today)
    #[arg(long, conflicts_with_all = ["this_week", "last_week"])]
    until: Option<String>,

    /// Report on the current week (Monday to Sunday)
    #[arg(long, conflicts_with = "last_week")]
    this_week: bool,

    /// Report on the previous week
    #[arg(long)]
    last_week: bool,

    /// Author email (defaults to git user.email)
    #[arg(long)]
    author: Option<String>,
}

impl ReportArgs {
    fn period(&self) -> ReportPeriod {
        if self.this_week {
            ReportPeriod::ThisWeek
        } else if self.last_week {
            ReportPeriod::LastWeek
        } else {
            ReportPeriod::Between {
                since: self.since.clone(),
                until: self.until.clone(),
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Commit(args) => run_commit(args).await,
        Command::Config(args) => run_config(args),
        Command::Check(args) => run_check(args).await,
        Command::Report(args) => run_report(args).await,
    }
}

async fn run_commit(args: CommitArgs) -> Result<()> {
    let (repo, _workdir) = locate_repository()?;

    if let Some(text) = args.message.as_deref() {
        let oid = commit_literal(&repo, text)?;
        println!("Committed {}", short_id(&oid.to_string()));
        return Ok(());
    }

    let settings = Settings::load();
    let overrides = ConfigOverrides {
        temperature: args.temperature,
        max_tokens: args.max_tokens,
        ..args.generation.overrides()
    };
    let config = ProviderConfig::from_settings(&settings, &overrides)?;
    let limit = generation_timeout(args.generation.timeout)?;
    let provider = create_provider(config.provider_kind);
    let scope = if args.unstaged {
        ChangeScope::Unstaged
    } else {
        ChangeScope::Staged
    };

    println!(
        "Generating commit message with {} ({})...",
        config.provider_kind, config.model
    );

    let skip_confirmation = args.yes;
    let outcome = generate_and_commit(
        &repo,
        scope,
        provider.as_ref(),
        &config,
        &default_allowed_types(),
        limit,
        |message| {
            println!();
            println!("{message}");
            println!();
            skip_confirmation || confirm_commit()
        },
    )
    .await?;

    match outcome {
        CommitOutcome::Committed { oid, .. } => {
            println!("Committed {}", short_id(&oid.to_string()));
        }
        CommitOutcome::Declined { .. } => println!("Commit cancelled."),
    }
    Ok(())
}

fn confirm_commit() -> bool {
    Confirm::new()
        .with_prompt("Create this commit?")
        .default(true)
        .interact()
        .unwrap_or_else(|e| {
            warn!("Could not read confirmation: {e}");
            false
        })
}

fn short_id(oid: &str) -> &str {
    oid.get(..7).unwrap_or(oid)
}

fn run_config(args: ConfigArgs) -> Result<()> {
    let mut settings = Settings::load();
    let mut changes = Vec::new();

    if let Some(provider) = args.provider {
        if let Some(api_key) = args.api_key.as_deref() {
            settings.set_api_key(provider, api_key);
            changes.push(format!("{provider} API key"));
        }
        if args.make_default {
            settings.set_default_provider(provider);
            changes.push(format!("default provider {provider}"));
        }
    }

    if let Some(model) = args.model.as_deref() {
        settings.set_model(model);
        changes.push(format!("model '{model}'"));
    }

    if let Some(base_url) = args.base_url.as_deref() {
        settings.set_base_url(base_url);
        changes.push(format!("base URL '{base_url}'"));
    }

    if let Some(language) = args.language {
        settings.set_language(language);
        changes.push(format!("language {language}"));
    }

    if !changes.is_empty() {
        let path = settings.save().context("Failed to save settings")?;
        println!("Saved {} to {}", changes.join(", "), path.display());
    }

    if args.show || changes.is_empty() {
        print_settings(&settings)?;
    }
    Ok(())
}

fn print_settings(settings: &Settings) -> Result<()> {
    let path = Settings::config_path()?;
    println!("Config file: {}", path.display());
    println!("Default provider: {}", settings.default_provider);
    println!("Language: {}", settings.language);
    println!(
        "Model: {}",
        settings
            .model
            .as_deref()
            .unwrap_or(settings.default_provider.default_model())
    );
    if let Some(base_url) = settings.base_url.as_deref() {
        println!("Base URL: {base_url}");
    }
    for kind in ProviderKind::all() {
        println!("  {:<9} {}", kind.as_str(), mask_secret(settings.api_key(*kind)));
    }
    Ok(())
}

async fn run_check(args: CheckArgs) -> Result<()> {
    let settings = Settings::load();
    let overrides = ConfigOverrides {
        provider: args.provider,
        ..ConfigOverrides::default()
    };
    let config = ProviderConfig::from_settings(&settings, &overrides)?;
    let limit = generation_timeout(args.timeout)?;
    let provider = create_provider(config.provider_kind);

    println!("Provider: {}", config.provider_kind);
    println!("Model:    {}", config.model);
    println!(
        "API key:  {}",
        mask_secret(settings.api_key(config.provider_kind))
    );

    let elapsed = check_provider(provider.as_ref(), &config, limit).await?;
    println!("OK ({} ms)", elapsed.as_millis());
    Ok(())
}

async fn run_report(args: ReportArgs) -> Result<()> {
    let (repo, _workdir) = locate_repository()?;

    let author = match args.author.clone() {
        Some(author) => author,
        None => user_email(&repo).ok_or_else(|| {
            anyhow!("Cannot determine author email. Pass --author or set git user.email")
        })?,
    };

    let range = args.period().resolve(Local::now().date_naive())?;
    println!("Collecting commits by {author} until {}...", range.until);

    let commits = report_commits(&repo, &author, range)?;
    if commits.is_empty() {
        println!("No commits by {author} in this range.");
        return Ok(());
    }
    let range = range.starting_at_earliest(&commits);
    println!("Found {} commits, generating report...", commits.len());

    let settings = Settings::load();
    let config = ProviderConfig::from_settings(&settings, &args.generation.overrides())?;
    let limit = generation_timeout(args.generation.timeout)?;
    let provider = create_provider(config.provider_kind);

    let report = generate_report(provider.as_ref(), &commits, range, &config, limit).await?;
    println!();
    println!("{report}");
    Ok(())
}
