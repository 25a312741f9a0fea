use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grokgen_api::cli::{Cli, Commands};
use grokgen_api::config::ServerConfig;
use grokgen_api::console::{self, generating_line, render_result, write_line, Console, Mode};
use grokgen_api::router::build_app_router;
use grokgen_api::state::AppState;
use grokgen_core::generation::GenerateOptions;
use grokgen_core::generator::ImageGenerator;
use grokgen_core::storage::ImageStore;
use grokgen_xai::api::XaiImagesApi;
use grokgen_xai::config::XaiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = ServerConfig::from_env().context("Invalid server configuration")?;

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    let command = match cli.command {
        Some(command) => command,
        None => {
            stdout_banner(&mut stdout).await?;
            match console::choose_mode(&mut stdin, &mut stdout).await? {
                Mode::Interactive => Commands::Interactive,
                Mode::Demo => Commands::Demo,
                Mode::Api => Commands::Api,
                Mode::Exit => return Ok(ExitCode::SUCCESS),
            }
        }
    };

    let generator = build_generator(&config).await?;

    match command {
        Commands::Api => {
            serve(config, generator).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Generate {
            prompt,
            count,
            format,
            no_save,
        } => {
            let options = GenerateOptions::new(prompt)
                .with_count(count)
                .with_format(format.into())
                .with_save_images(!no_save);
            write_line(&mut stdout, &generating_line(&options)).await?;
            let result = generator.generate(options).await;
            write_line(&mut stdout, &render_result(&result)).await?;

            Ok(if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Interactive => {
            Console::new(generator, &mut stdin, &mut stdout)
                .run_interactive()
                .await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Demo => {
            let result = Console::new(generator, &mut stdin, &mut stdout)
                .run_demo()
                .await?;
            Ok(match result {
                Some(r) if !r.success => ExitCode::FAILURE,
                _ => ExitCode::SUCCESS,
            })
        }
    }
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr so they never interleave with console output on stdout.
/// `LOG_FORMAT=json` switches to structured JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "grokgen_api=info,grokgen_core=info,grokgen_xai=info,tower_http=info".into()
    });

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let (json_layer, text_layer) = if json {
        (
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
            None,
        )
    } else {
        (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn stdout_banner(stdout: &mut tokio::io::Stdout) -> std::io::Result<()> {
    write_line(stdout, "🎨 Grok 2 Image Generator\n========================").await
}

/// Wire the xAI client and the local image store into a generator.
async fn build_generator(config: &ServerConfig) -> anyhow::Result<ImageGenerator> {
    let xai = XaiConfig::from_env()?;
    let api = XaiImagesApi::new(&xai).context("Failed to build xAI HTTP client")?;

    let store = ImageStore::open(&config.output_dir)
        .await
        .with_context(|| format!("Failed to open output directory {}", config.output_dir.display()))?;

    tracing::info!(
        output_dir = %config.output_dir.display(),
        model = %xai.model,
        api_url = %xai.api_url,
        "Image generator initialized"
    );

    Ok(ImageGenerator::new(Arc::new(api), store)
        .with_model(xai.model.clone())
        .with_public_base_url(config.public_base_url.clone()))
}

/// Run the HTTP API until SIGINT/SIGTERM.
async fn serve(config: ServerConfig, generator: ImageGenerator) -> anyhow::Result<()> {
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );

    let app = build_app_router(AppState::new(config, generator));

    tracing::info!(%addr, "Starting Grok image generator API server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by the container
/// runtime.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
