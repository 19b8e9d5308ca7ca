use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use loqa_session_monitor::config::DEFAULT_CONFIG_PATH;
use loqa_session_monitor::console::{spawn_interrupt_listener, ShutdownSignals};
use loqa_session_monitor::{
    AudioBackendFactory, Config, DashboardRenderer, InteractiveSelector, MonitorOutcome,
    ProcessResolverFactory, SessionCatalog, SessionError, TerminalCursor, TerminalCursorGuard,
};
use std::io;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

#[derive(Parser)]
#[command(
    name = "loqa-session-monitor",
    version,
    about = "Watch audio sessions on the default output device"
)]
struct Cli {
    /// Config file path (extension optional)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, Copy, Debug)]
enum Mode {
    /// Pick one session and log its state transitions until it expires
    Select,
    /// Continuously redraw every session with a colored state indicator
    Dashboard,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = Config::load(&cli.config);
    let level = cfg
        .as_ref()
        .map(Config::log_level)
        .unwrap_or(tracing::Level::INFO);

    // stdout belongs to the operator console
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    let result = match cfg {
        Ok(cfg) => run(cli.mode.unwrap_or(Mode::Select), cfg).await,
        Err(e) => Err(e.context("Failed to load configuration")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(mode: Mode, cfg: Config) -> Result<()> {
    debug!("Mode: {:?}, config: {:?}", mode, cfg);

    let backend = AudioBackendFactory::create()
        .map_err(|e| SessionError::EndpointUnavailable(format!("{e:#}")))?;
    let resolver = ProcessResolverFactory::create()
        .map_err(|e| SessionError::EndpointUnavailable(format!("{e:#}")))?;
    let catalog = SessionCatalog::new(backend, resolver);

    info!(
        "Loqa Session Monitor v{} ({})",
        env!("CARGO_PKG_VERSION"),
        catalog.backend_name()
    );

    match mode {
        Mode::Select => {
            let mut selector = InteractiveSelector::new(io::stdin().lock(), io::stdout());
            let outcome = selector.run(&catalog, cfg.poll_interval()).await?;

            match outcome {
                MonitorOutcome::Expired { transitions } => {
                    debug!("Session expired after {} transition(s)", transitions)
                }
                MonitorOutcome::StreamEnded { transitions } => {
                    warn!("Monitoring ended after {} transition(s)", transitions)
                }
            }
        }

        Mode::Dashboard => {
            // Handlers first, so no interrupt can land while the cursor is hidden
            let signals =
                ShutdownSignals::register().context("Failed to install interrupt handlers")?;
            let guard = TerminalCursorGuard::acquire(TerminalCursor)
                .context("Failed to hide terminal cursor")?;
            let listener = spawn_interrupt_listener(signals, guard.clone());

            let mut dashboard = DashboardRenderer::new(io::stdout(), cfg.refresh_interval());
            dashboard.run_guarded(&catalog, guard, listener).await?;
        }
    }

    Ok(())
}
