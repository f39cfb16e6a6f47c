use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::LaunchConfig;

/// Start the app container if needed, wait for it, and open it in the browser.
#[derive(Debug, Parser)]
#[command(name = "launchbox", version, about)]
pub struct Cli {
    /// Container name to look for and to give a fresh container.
    #[arg(long, env = "LAUNCHBOX_NAME", default_value = "teleprompter-app")]
    pub name: String,

    /// Image for `docker run` when there is no compose file.
    #[arg(long, env = "LAUNCHBOX_IMAGE", default_value = "teleprompter-app")]
    pub image: String,

    #[arg(long, env = "LAUNCHBOX_HOST", default_value = "localhost")]
    pub host: String,

    /// Host port the app is published on.
    #[arg(
        long,
        env = "LAUNCHBOX_PORT",
        default_value_t = 3000,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub port: u16,

    /// Port the app listens on inside the container.
    #[arg(
        long,
        env = "LAUNCHBOX_CONTAINER_PORT",
        default_value_t = 80,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub container_port: u16,

    /// Directory holding the compose file [default: current directory].
    #[arg(long, env = "LAUNCHBOX_DIR")]
    pub dir: Option<PathBuf>,

    #[arg(long, env = "LAUNCHBOX_COMPOSE_FILE", default_value = "docker-compose.yml")]
    pub compose_file: String,

    /// Compose invocation, e.g. "docker compose".
    #[arg(long, env = "LAUNCHBOX_COMPOSE_COMMAND", default_value = "docker-compose")]
    pub compose_command: String,

    #[arg(long = "docker", env = "LAUNCHBOX_DOCKER", default_value = "docker")]
    pub docker_bin: String,

    /// Seconds to wait for a freshly started container.
    #[arg(long, env = "LAUNCHBOX_START_TIMEOUT", default_value_t = 30)]
    pub start_timeout: u64,

    /// Seconds to wait for the app before opening the browser anyway.
    #[arg(long, env = "LAUNCHBOX_READY_TIMEOUT", default_value_t = 10)]
    pub ready_timeout: u64,

    /// Do not open a browser.
    #[arg(long)]
    pub no_browser: bool,

    /// Wait for Enter before exiting on failure (keeps a launcher window open).
    #[arg(long, env = "LAUNCHBOX_PAUSE_ON_ERROR")]
    pub pause_on_error: bool,

    /// Log debug diagnostics to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn into_config(self) -> Result<LaunchConfig> {
        let work_dir = match self.dir {
            Some(dir) => dir,
            None => std::env::current_dir().context("cannot determine current directory")?,
        };

        Ok(LaunchConfig {
            container_name: self.name,
            image: self.image,
            host: self.host,
            port: self.port,
            container_port: self.container_port,
            work_dir,
            compose_file: self.compose_file,
            compose_command: self.compose_command,
            docker_bin: self.docker_bin,
            start_timeout: Duration::from_secs(self.start_timeout),
            ready_timeout: Duration::from_secs(self.ready_timeout),
            open_browser: !self.no_browser,
            ..LaunchConfig::default()
        })
    }
}
