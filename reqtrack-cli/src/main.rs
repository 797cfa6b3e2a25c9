mod app;
mod cli;
mod prompts;
mod shell;
mod views;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use inquire::InquireError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reqtrack_core::{get_config_path, seed_store, Config, ProjectStore, Session};

use crate::app::{App, ConsoleNotifier, Flow};
use crate::cli::{Cli, ShellLine};

fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine which config file to use
    let config_path = match cli.config {
        Some(path) => path,
        None => get_config_path()?,
    };
    let config = Config::load(&config_path)?;
    init_tracing(&config);

    let store = if cli.empty || !config.seed_data {
        ProjectStore::new(config.actor())
    } else {
        seed_store(config.actor())
    };
    tracing::debug!(path = %config_path.display(), projects = store.projects().len(), "starting");

    let mut app = App::new(
        store,
        Session::new(),
        config,
        config_path,
        Box::new(ConsoleNotifier),
    );

    if let Some(email) = cli.user.as_deref() {
        app.sign_in(email)?;
    }

    match cli.command {
        Some(command) => {
            app.execute(command)?;
        }
        None => run_shell(&mut app)?,
    }

    Ok(())
}

/// Reads and runs commands until `quit` or end of input
fn run_shell(app: &mut App) -> Result<()> {
    println!(
        "{} Type {} for commands, {} to leave.",
        "reqtrack shell.".bold(),
        "help".cyan(),
        "quit".cyan()
    );
    if app.session().current_user().is_none() {
        println!("Sign in first with {}", "sign-in <email>".cyan());
    }

    loop {
        let user = app.session().current_user().map(|u| u.email.clone());
        let line = match prompts::prompt_shell_line(user.as_deref()) {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        let args = match shell::split_command_line(&line) {
            Ok(args) if args.is_empty() => continue,
            Ok(args) => args,
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                continue;
            }
        };

        let command = match ShellLine::try_parse_from(&args) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // Help and usage errors render themselves
                let _ = e.print();
                continue;
            }
        };

        match app.execute(command) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
    }

    Ok(())
}
