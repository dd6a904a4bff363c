//! Process startup: arguments, configuration, logging, then the kiosk itself

use clap::{CommandFactory, FromArgMatches};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use super::cli::args::Args;
use super::cli::config::ConfigError;
use super::cli::display::run_display;
use super::console::run_console;
use crate::backend::{BackendError, HttpBackend, ScanBackend};
use crate::cart::{RecommendationTable, TableError};
use crate::core::error_handling::{log_error_with_context, ContextualError};
use crate::core::logging::init_logging;
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::styles::palette_to_clap;
use crate::core::time::SystemTimeProvider;
use crate::core::version::long_version;
use crate::notifications::api::{AsyncNotificationManager, EventFilter};
use crate::session::{KioskController, SessionError};

/// Time given to in-flight tasks (and the blocking stdin reader) at exit
const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ContextualError for StartupError {
    fn is_user_actionable(&self) -> bool {
        match self {
            StartupError::Config(e) => e.is_user_actionable(),
            StartupError::Backend(e) => e.is_user_actionable(),
            StartupError::Table(e) => e.is_user_actionable(),
            StartupError::Session(e) => e.is_user_actionable(),
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            StartupError::Config(e) => e.user_message(),
            StartupError::Backend(e) => e.user_message(),
            StartupError::Table(e) => e.user_message(),
            StartupError::Session(e) => e.user_message(),
        }
    }
}

/// Entry point used by the binary
pub fn startup() -> ExitCode {
    let matches = Args::command()
        .styles(palette_to_clap(std::io::stdout().is_terminal()))
        .get_matches();
    let cli = match Args::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(run(cli));
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);
    code
}

async fn run(cli: Args) -> ExitCode {
    // The file may set the log options, so it is read before the logger starts
    let (args, config_error) = match Args::from_config_file(cli.config_file.as_deref()).await {
        Ok(file_args) => (cli.overlay(file_args), None),
        Err(e) => (cli, Some(e)),
    };

    let use_color = args.use_color();
    colored::control::set_override(use_color);

    let log_format = args.log_format();
    if let Err(e) = init_logging(
        args.log_level.as_deref(),
        log_format.as_ref().copied().unwrap_or_default(),
        args.log_file(),
        use_color,
    ) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let result = match (config_error, log_format) {
        (Some(e), _) | (None, Err(e)) => Err(StartupError::from(e)),
        (None, Ok(_)) => run_kiosk(args, use_color).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error_with_context(&e, "Kiosk startup");
            ExitCode::FAILURE
        }
    }
}

async fn run_kiosk(args: Args, use_color: bool) -> Result<(), StartupError> {
    log::info!("NexCart kiosk {} starting", long_version());

    let config = args.session_config()?;
    let backend: Arc<dyn ScanBackend> = Arc::new(HttpBackend::new(
        args.backend_url(),
        args.request_timeout()?,
    )?);
    log::info!("Using backend at {}", args.backend_url());

    let table = match &args.recommendations_file {
        Some(path) => RecommendationTable::load(path).await?,
        None => RecommendationTable::builtin(),
    };
    log::debug!("Recommendation table has {} products", table.len());

    let mut events = AsyncNotificationManager::new();
    let display_events = events.subscribe("display", EventFilter::All, "startup");

    let (controller, handle) = KioskController::new(
        config,
        Arc::new(table),
        backend,
        events,
        Arc::new(SystemTimeProvider),
    );
    let controller_task = controller.spawn();

    let (shutdown, _shutdown_rx) = ShutdownCoordinator::new();
    shutdown.install_signal_handlers();

    let initial = handle.snapshot().await?;
    let display_task = tokio::spawn(run_display(
        display_events,
        shutdown.subscribe(),
        initial,
        use_color,
    ));
    println!("Type 'help' for commands.");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let console_result = run_console(stdin, handle.clone(), shutdown.clone(), use_color).await;

    // The controller may already be gone if the console failed on a closed queue
    let _ = handle.shutdown();
    drop(handle);
    let (controller_result, _) = futures::future::join(controller_task, display_task).await;
    if let Err(e) = controller_result {
        log::warn!("Kiosk controller ended abnormally: {}", e);
    }

    log::info!("NexCart kiosk stopped");
    console_result.map_err(StartupError::from)
}
