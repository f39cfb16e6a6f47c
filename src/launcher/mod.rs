// Launch sequence — tool check, container, readiness, browser.
mod error;

pub use error::{DOCKER_DOWNLOAD_URL, LaunchError};

use crate::browser::BrowserOpener;
use crate::config::LaunchConfig;
use crate::docker::{CancelToken, ContainerEngine, LaunchPlan};
use crate::probe::{PollSpec, PortProber, WaitResult, wait_for_port};
use crate::report::Reporter;

/// What `start_container` had to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Started {
    AlreadyRunning,
    Launched(LaunchPlan),
}

/// How a full run ended.
#[derive(Debug)]
pub enum Outcome {
    /// The app answered and the browser was opened.
    Ready,
    /// The browser was opened although the app never answered the
    /// secondary readiness wait.
    Unconfirmed,
    Cancelled,
    Failed(LaunchError),
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Ready | Outcome::Unconfirmed | Outcome::Cancelled => 0,
            Outcome::Failed(_) => 1,
        }
    }
}

/// Drives one launch. Every side effect goes through an injected capability.
pub struct Launcher<E, P, B, R> {
    config: LaunchConfig,
    engine: E,
    prober: P,
    browser: B,
    reporter: R,
    cancel: CancelToken,
}

impl<E, P, B, R> Launcher<E, P, B, R>
where
    E: ContainerEngine,
    P: PortProber,
    B: BrowserOpener,
    R: Reporter,
{
    pub fn new(
        config: LaunchConfig,
        engine: E,
        prober: P,
        browser: B,
        reporter: R,
        cancel: CancelToken,
    ) -> Self {
        Self {
            config,
            engine,
            prober,
            browser,
            reporter,
            cancel,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Verify the container tool answers a version query.
    pub fn check_tool(&self) -> Result<String, LaunchError> {
        match self.engine.version() {
            Ok(version) => {
                tracing::debug!(%version, "container tool available");
                Ok(version)
            }
            // An interrupt also kills the query, which is not a missing tool.
            Err(_) if self.cancel.is_cancelled() => Err(LaunchError::Cancelled),
            Err(err) => Err(LaunchError::ToolMissing {
                tool: self.config.docker_bin.clone(),
                reason: format!("{err:#}"),
            }),
        }
    }

    /// Whether the configured container is running. A failed query is
    /// reported and counts as "not running".
    pub fn is_container_running(&self) -> bool {
        match self.engine.is_running(&self.config.container_name) {
            Ok(running) => running,
            Err(err) => {
                tracing::warn!("container query failed: {err:#}");
                if !self.cancel.is_cancelled() {
                    self.reporter
                        .error(&format!("Could not query the container engine: {err:#}"));
                }
                false
            }
        }
    }

    pub fn is_port_open(&self) -> bool {
        self.prober
            .is_open(&self.config.host, self.config.port, self.config.probe_timeout)
    }

    /// Prefer the compose file in the work dir; fall back to `docker run`.
    pub fn plan(&self) -> Result<LaunchPlan, LaunchError> {
        let cfg = &self.config;
        let compose = cfg.compose_path();
        if compose.is_file() {
            let argv = cfg
                .compose_argv()
                .map_err(|e| LaunchError::StartFailed(format!("{e:#}")))?;
            return Ok(LaunchPlan::Compose {
                argv,
                file: compose,
                work_dir: cfg.work_dir.clone(),
            });
        }

        Ok(LaunchPlan::Run {
            args: run_args(cfg),
        })
    }

    /// Make sure the container is up and its port answers.
    ///
    /// A running container is left alone. Otherwise the container is
    /// launched detached and the port is polled until `start_timeout`.
    /// Whatever was launched keeps running on failure.
    pub fn start_container(&self) -> Result<Started, LaunchError> {
        if self.is_container_running() {
            self.reporter.success("Container is already running");
            return Ok(Started::AlreadyRunning);
        }
        if self.cancel.is_cancelled() {
            return Err(LaunchError::Cancelled);
        }

        let plan = self.plan()?;
        let via = match &plan {
            LaunchPlan::Compose { file, .. } => file.display().to_string(),
            LaunchPlan::Run { .. } => format!("{} run", self.config.docker_bin),
        };
        tracing::info!(?plan, "launching container");
        self.reporter.step(&format!(
            "Starting container {} via {via}",
            self.config.container_name
        ));

        if let Err(err) = self.engine.launch(&plan) {
            self.reporter.finish_line(false);
            return Err(LaunchError::StartFailed(format!("{err:#}")));
        }
        self.reporter.finish_line(true);

        let spec = PollSpec {
            probe_timeout: self.config.probe_timeout,
            interval: self.config.start_poll_interval,
            ceiling: self.config.start_timeout,
        };
        self.reporter.step("Waiting for the app to start");
        match self.wait(spec) {
            WaitResult::Open => {
                self.reporter.finish_line(true);
                Ok(Started::Launched(plan))
            }
            WaitResult::TimedOut => {
                self.reporter.finish_line(false);
                Err(LaunchError::ReadinessTimeout {
                    port: self.config.port,
                    waited: spec.ceiling,
                })
            }
            WaitResult::Cancelled => {
                self.reporter.finish_line(false);
                Err(LaunchError::Cancelled)
            }
        }
    }

    /// Short secondary wait before the browser opens. `Ok(false)` means
    /// the app never answered; the caller opens the browser anyway.
    pub fn await_ready(&self) -> Result<bool, LaunchError> {
        let spec = PollSpec {
            probe_timeout: self.config.probe_timeout,
            interval: self.config.ready_poll_interval,
            ceiling: self.config.ready_timeout,
        };
        self.reporter.step("Checking that the app is ready");
        match self.wait(spec) {
            WaitResult::Open => {
                self.reporter.finish_line(true);
                Ok(true)
            }
            WaitResult::TimedOut => {
                self.reporter.finish_line(false);
                self.reporter.warn(&format!(
                    "Nothing answered on port {} yet; opening the browser anyway",
                    self.config.port
                ));
                Ok(false)
            }
            WaitResult::Cancelled => {
                self.reporter.finish_line(false);
                Err(LaunchError::Cancelled)
            }
        }
    }

    /// Hand the app URL to the desktop. Failures are logged, never fatal.
    pub fn open_in_browser(&self) {
        let url = self.config.url();
        if !self.config.open_browser {
            self.reporter.info(&format!("Browser disabled, the app is at {url}"));
            return;
        }
        self.reporter.info(&format!("Opening {url}"));
        if let Err(err) = self.browser.open(&url) {
            tracing::warn!(%url, "could not open browser: {err:#}");
        }
    }

    /// Run the whole sequence and report how it ended.
    pub fn run(&self) -> Outcome {
        self.reporter
            .banner(&format!("{} launcher", self.config.container_name));

        match self.run_stages() {
            Ok(true) => Outcome::Ready,
            Ok(false) => Outcome::Unconfirmed,
            Err(err) if err.is_cancelled() => {
                tracing::info!("launch cancelled");
                self.reporter.info("Shutting down...");
                Outcome::Cancelled
            }
            Err(err) => {
                tracing::error!("launch failed: {err}");
                self.reporter.error(&err.to_string());
                if let LaunchError::ToolMissing { .. } = err {
                    self.reporter
                        .hint(&format!("Download Docker: {DOCKER_DOWNLOAD_URL}"));
                }
                Outcome::Failed(err)
            }
        }
    }

    fn run_stages(&self) -> Result<bool, LaunchError> {
        self.check_tool()?;
        self.start_container()?;
        let ready = self.await_ready()?;
        self.open_in_browser();
        self.print_stop_hint();
        Ok(ready)
    }

    fn print_stop_hint(&self) {
        let cfg = &self.config;
        if cfg.open_browser {
            self.reporter.success("App is open! You can close this terminal.");
        } else {
            self.reporter.success("App is running. You can close this terminal.");
        }
        self.reporter.hint(&format!("URL: {}", cfg.url()));
        self.reporter.hint("To stop the app, run:");
        self.reporter
            .hint(&format!("{} down  (or)", cfg.compose_command));
        self.reporter
            .hint(&format!("{} stop {}", cfg.docker_bin, cfg.container_name));
    }

    fn wait(&self, spec: PollSpec) -> WaitResult {
        wait_for_port(
            &self.prober,
            &self.config.host,
            self.config.port,
            spec,
            &self.cancel,
            || self.reporter.tick(),
        )
    }
}

/// Arguments for `docker run`, excluding the binary.
pub fn run_args(cfg: &LaunchConfig) -> Vec<String> {
    vec![
        "run".into(),
        "-d".into(),
        "-p".into(),
        format!("{}:{}", cfg.port, cfg.container_port),
        "--name".into(),
        cfg.container_name.clone(),
        cfg.image.clone(),
    ]
}
