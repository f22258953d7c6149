//! CLI entrypoint for mcp-agent
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use mcp_agent_application::{
    NoRunProgress, RunAgentInput, RunAgentUseCase, RunProgressNotifier, ToolRegistry,
};
use mcp_agent_domain::{ConfigIssue, Severity};
use mcp_agent_infrastructure::{ConfigLoader, FileConfig, McpClient, build_backend, mask_secret};
use mcp_agent_presentation::{
    AppState, Cli, Command, ConsoleFormatter, ProgressReporter, init_tracing, router,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command();

    // The server is silent at warn; default it to info
    let verbose = match command {
        Command::Serve => cli.verbose.max(1),
        _ => cli.verbose,
    };
    init_tracing(verbose, cli.log_format);

    let mut config = ConfigLoader::load(cli.config.as_deref())?;
    if let Some(bind) = &cli.bind {
        config.server.bind_address = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if cli.show_config {
        print!("{}", config.to_masked_toml()?);
        return Ok(());
    }

    check_config(&config)?;
    log_config(&config);

    // === Dependency Injection ===
    let backend = build_backend(&config.backend)?;
    let server_url = config
        .tools
        .server_url
        .clone()
        .context("tools.server_url is not configured")?;
    let tool_server = Arc::new(McpClient::new(server_url, config.tools.timeout()));

    let shutdown = CancellationToken::new();
    let registry = tokio::select! {
        registry = ToolRegistry::discover(tool_server, config.tools.discovery_policy()) => {
            registry.context("tool discovery failed")?
        }
        _ = shutdown_signal() => {
            info!("Shutdown requested during tool discovery");
            return Ok(());
        }
    };

    let use_case = RunAgentUseCase::new(backend, Arc::new(registry), config.execution_params());

    match command {
        Command::Serve => serve(&config, use_case, shutdown).await,
        Command::Ask {
            prompt,
            instructions,
            quiet,
        } => ask(use_case, prompt, instructions, quiet, shutdown).await,
        Command::Tools => {
            let registry = use_case.registry();
            println!(
                "{}",
                ConsoleFormatter::format_tools(&registry.snapshot(), registry.server().endpoint())
            );
            Ok(())
        }
    }
}

/// Log every issue; abort when any is an error.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => error!(key = %issue.key, code = ?issue.code, "{}", issue.message),
            Severity::Warning => warn!(key = %issue.key, code = ?issue.code, "{}", issue.message),
        }
    }
    if ConfigIssue::has_errors(&issues) {
        let summary: Vec<String> = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .map(|i| i.to_string())
            .collect();
        bail!("invalid configuration:\n  {}", summary.join("\n  "));
    }
    Ok(())
}

fn log_config(config: &FileConfig) {
    let backend = &config.backend;
    info!(
        backend = %backend.kind,
        ollama_model = backend.ollama.model.as_deref().unwrap_or("-"),
        ollama_base_url = %backend.ollama.base_url,
        openai_model = backend.openai.model.as_deref().unwrap_or("-"),
        openai_api_base = %backend.openai.api_base,
        api_key = %backend
            .openai
            .resolve_api_key()
            .as_deref()
            .map(mask_secret)
            .unwrap_or_else(|| "None".to_string()),
        timeout_secs = backend.timeout_secs,
        mcp_server_url = config.tools.server_url.as_deref().unwrap_or("-"),
        max_iterations = config.agent.max_iterations,
        tool_concurrency = config.agent.tool_concurrency,
        "Configuration loaded"
    );
}

async fn serve(
    config: &FileConfig,
    use_case: RunAgentUseCase,
    shutdown: CancellationToken,
) -> Result<()> {
    let address = config.server.socket_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!(address = %address, "mcp-agent listening");

    let app = router(
        AppState::new(use_case, shutdown.clone()),
        config.server.cors_allow_any_origin,
    );

    // Stop accepting and cancel in-flight runs on the first signal
    let token = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown signal received, cancelling in-flight runs");
            token.cancel();
        })
        .await?;

    info!("mcp-agent stopped");
    Ok(())
}

async fn ask(
    use_case: RunAgentUseCase,
    prompt: String,
    instructions: Option<String>,
    quiet: bool,
    shutdown: CancellationToken,
) -> Result<()> {
    let input = RunAgentInput::new(prompt, instructions)?;

    let token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        token.cancel();
    });

    let reporter = (!quiet).then(ProgressReporter::new);
    let progress: &dyn RunProgressNotifier = match &reporter {
        Some(reporter) => reporter,
        None => &NoRunProgress,
    };

    let output = use_case
        .execute_with_progress(input, progress, &shutdown)
        .await?;
    if let Some(reporter) = &reporter {
        reporter.finish();
    }

    match &output.outcome {
        Ok(answer) => {
            println!("{}", ConsoleFormatter::format_answer(&output, answer));
            Ok(())
        }
        Err(failure) => {
            eprintln!("{}", ConsoleFormatter::format_failure(failure));
            bail!("{}", failure)
        }
    }
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
