use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything the launcher needs to know about the app it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    pub container_name: String,
    pub image: String,
    pub host: String,
    /// Host port that is probed and opened in the browser.
    pub port: u16,
    /// Port the app listens on inside the container.
    pub container_port: u16,
    pub work_dir: PathBuf,
    pub compose_file: String,
    pub compose_command: String,
    pub docker_bin: String,
    /// Ceiling for each short engine query (`--version`, `ps`).
    pub tool_timeout: Duration,
    pub start_timeout: Duration,
    pub start_poll_interval: Duration,
    /// Secondary wait before opening the browser.
    pub ready_timeout: Duration,
    pub ready_poll_interval: Duration,
    /// Per-attempt TCP connect timeout.
    pub probe_timeout: Duration,
    pub open_browser: bool,
}

impl LaunchConfig {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn compose_path(&self) -> PathBuf {
        self.work_dir.join(&self.compose_file)
    }

    /// Split `compose_command` into program and leading arguments.
    ///
    /// Accepts both `docker-compose` and `docker compose`.
    pub fn compose_argv(&self) -> anyhow::Result<Vec<String>> {
        let argv = shell_words::split(&self.compose_command)?;
        if argv.is_empty() {
            anyhow::bail!("compose command cannot be blank");
        }
        Ok(argv)
    }

    pub fn with_work_dir(mut self, dir: &Path) -> Self {
        self.work_dir = dir.to_path_buf();
        self
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            container_name: "teleprompter-app".to_string(),
            image: "teleprompter-app".to_string(),
            host: "localhost".to_string(),
            port: 3000,
            container_port: 80,
            work_dir: PathBuf::from("."),
            compose_file: "docker-compose.yml".to_string(),
            compose_command: "docker-compose".to_string(),
            docker_bin: "docker".to_string(),
            tool_timeout: Duration::from_secs(5),
            start_timeout: Duration::from_secs(30),
            start_poll_interval: Duration::from_secs(1),
            ready_timeout: Duration::from_secs(10),
            ready_poll_interval: Duration::from_millis(500),
            probe_timeout: Duration::from_secs(2),
            open_browser: true,
        }
    }
}
