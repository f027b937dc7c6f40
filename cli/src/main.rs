//! CLI entrypoint for triage-bot
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use triage_application::{
    ChatGateway, DEFAULT_STATE_TTL, NoTicketAudit, QuestionStore, RunQuestionnaireUseCase,
    SessionTracker, TicketAuditLog, TicketSubmitter, TokenManager,
};
use triage_infrastructure::{
    ConfigLoader, FileConfig, JiraGateway, JiraSettings, JsonCredentialStore, JsonlTicketAudit,
    SharedFolder, SlackClient, SlackConfigStore, ViewQuestionnaireRepository, documents,
};
use triage_presentation::{AppState, BotServices, BotTemplates, Cli, TriageBot, serve};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()?
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };
    apply_overrides(&mut config, &cli);

    let folder = SharedFolder::new(config.storage.shared_folder.clone());
    let site_store = Arc::new(SlackConfigStore::new(folder.clone()));
    config.apply_shared_secrets(&site_store.document()?);

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        println!();
        println!("{}", config.to_redacted_toml()?);
        return Ok(());
    }

    let _log_guard = init_logging(cli.verbose, config.logging.dir.as_deref());
    config.validate()?;
    info!("Starting triage-bot");
    info!("Shared folder: {}", folder.root().display());

    // === Dependency Injection ===
    let workflow = config.workflow();
    let chat: Arc<dyn ChatGateway> = Arc::new(SlackClient::new(
        config.slack.api_base.clone(),
        config.slack.bot_token.clone().unwrap_or_default(),
    ));
    let jira = Arc::new(JiraGateway::new(JiraSettings {
        client_id: config.jira.client_id.clone().unwrap_or_default(),
        client_secret: config.jira.client_secret.clone().unwrap_or_default(),
        redirect_uri: config.jira.redirect_uri.clone(),
        auth_base: config.jira.auth_base.clone(),
        api_base: config.jira.api_base.clone(),
        scopes: config.jira.scopes.clone(),
    })?);

    let audit: Arc<dyn TicketAuditLog> =
        match config.storage.audit_log.as_ref().and_then(JsonlTicketAudit::new) {
            Some(log) => {
                info!("Ticket audit log: {}", log.path().display());
                Arc::new(log)
            }
            None => Arc::new(NoTicketAudit),
        };

    let tokens = Arc::new(
        TokenManager::load(
            jira.clone(),
            Arc::new(JsonCredentialStore::new(folder.clone())),
        )?
        .with_audit(audit.clone())
        .with_state_ttl(workflow.connect_timeout.unwrap_or(DEFAULT_STATE_TTL)),
    );
    let submitter = Arc::new(TicketSubmitter::load(
        jira,
        tokens.clone(),
        site_store,
        workflow.issue_defaults.clone(),
    )?);

    let views = Arc::new(ViewQuestionnaireRepository::new(folder.clone()));
    let questions = Arc::new(QuestionStore::load(views.clone())?);
    let catalog = folder
        .tier_catalog()
        .context("Failed to load the tier levels document")?;
    let questionnaire = Arc::new(
        RunQuestionnaireUseCase::new(
            Arc::new(SessionTracker::new()),
            submitter.clone(),
            chat.clone(),
            catalog,
            workflow.clone(),
        )
        .with_audit(audit),
    );

    let templates = BotTemplates {
        default: folder.template(documents::DEFAULT)?,
        connection: folder.template(documents::CONNECTION)?,
        add_questions: folder.template(documents::ADD_QUESTIONS)?,
    };

    let bot = Arc::new(TriageBot::new(
        BotServices {
            chat,
            questions,
            questionnaire,
            tokens,
            submitter,
            views,
        },
        templates,
        workflow,
    ));

    let state = AppState::new(
        bot,
        config.slack.signing_secret.clone().unwrap_or_default(),
        config.server.verify_state,
    );

    // === Serve ===
    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown requested");
            }
            shutdown.cancel();
        });
    }

    serve(listener, state, shutdown).await?;
    info!("Stopped");
    Ok(())
}

/// Command-line flags win over every config source
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(folder) = &cli.shared_folder {
        config.storage.shared_folder = folder.clone();
    }
}

/// Initialize logging based on verbosity level; `RUST_LOG` takes precedence.
///
/// With a log directory, output is also written to a daily rolling file.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });
    let stderr = fmt::layer().with_target(false).with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "triage-bot.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .init();
            None
        }
    }
}
