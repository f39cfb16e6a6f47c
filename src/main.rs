use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use launchbox::browser::SystemBrowser;
use launchbox::cli::Cli;
use launchbox::docker::{CancelToken, DockerCli};
use launchbox::probe::TcpProber;
use launchbox::report::ConsoleReporter;
use launchbox::{Launcher, logging, signals};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let pause_on_error = cli.pause_on_error;

    let code = match launch(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("unexpected error: {err:#}");
            eprintln!("✗ Unexpected error: {err:#}");
            1
        }
    };

    if code != 0 && pause_on_error {
        pause();
    }
    ExitCode::from(code)
}

fn launch(cli: Cli) -> Result<u8> {
    let cancel = CancelToken::new();
    signals::install(&cancel)?;

    let config = cli.into_config()?;
    tracing::debug!(?config, "starting launcher");

    let engine = DockerCli::from_config(&config);
    let launcher = Launcher::new(
        config,
        engine,
        TcpProber,
        SystemBrowser,
        ConsoleReporter,
        cancel,
    );
    Ok(launcher.run().exit_code())
}

/// Block until Enter so a double-clicked launcher window stays readable.
fn pause() {
    if !io::stdin().is_terminal() {
        return;
    }
    print!("\nPress Enter to exit...");
    let _ = io::stdout().flush();
    let _ = io::stdin().lock().read_line(&mut String::new());
}
