// Readiness probing — a bare TCP connect, no payload.
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use crate::docker::CancelToken;

/// Checks whether something accepts TCP connections on a port.
pub trait PortProber {
    /// True iff a connection to `host:port` is accepted within `timeout`.
    /// Never fails: every error means "not open".
    fn is_open(&self, host: &str, port: u16, timeout: Duration) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProber;

impl PortProber for TcpProber {
    fn is_open(&self, host: &str, port: u16, timeout: Duration) -> bool {
        let addrs = match (host, port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(err) => {
                tracing::debug!(host, port, %err, "address resolution failed");
                return false;
            }
        };

        // `localhost` may resolve to both ::1 and 127.0.0.1.
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(_) => return true,
                Err(err) => tracing::trace!(%addr, %err, "probe refused"),
            }
        }
        false
    }
}

/// How a polling wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitResult {
    Open,
    TimedOut,
    Cancelled,
}

/// Timing of one polling wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSpec {
    /// Timeout of each connect attempt.
    pub probe_timeout: Duration,
    pub interval: Duration,
    pub ceiling: Duration,
}

/// Poll `prober` every `spec.interval` until the port opens, the ceiling
/// passes, or `cancel` fires. `on_tick` runs after each failed attempt.
pub fn wait_for_port(
    prober: &impl PortProber,
    host: &str,
    port: u16,
    spec: PollSpec,
    cancel: &CancelToken,
    mut on_tick: impl FnMut(),
) -> WaitResult {
    let PollSpec {
        probe_timeout,
        interval,
        ceiling,
    } = spec;
    let start = Instant::now();
    // The first attempt always runs, so a zero ceiling still sees an open port.
    let mut attempt = if ceiling.is_zero() {
        probe_timeout
    } else {
        probe_timeout.min(ceiling)
    };
    loop {
        if cancel.is_cancelled() {
            return WaitResult::Cancelled;
        }
        if prober.is_open(host, port, attempt) {
            tracing::debug!(port, elapsed = ?start.elapsed(), "port open");
            return WaitResult::Open;
        }
        on_tick();

        let remaining = ceiling.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            break;
        }
        if !cancel.sleep(interval.min(remaining)) {
            return WaitResult::Cancelled;
        }
        // Never let a single attempt run past the ceiling.
        let remaining = ceiling.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            break;
        }
        attempt = probe_timeout.min(remaining);
    }
    tracing::debug!(port, ?ceiling, "gave up waiting for port");
    WaitResult::TimedOut
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    fn unused_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn closed_port_reports_false_within_timeout() {
        let port = unused_port();
        let start = Instant::now();
        assert!(!TcpProber.is_open("127.0.0.1", port, Duration::from_secs(1)));
        assert!(start.elapsed() <= Duration::from_millis(1500));
    }

    #[test]
    fn open_port_reports_true_promptly() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let start = Instant::now();
        assert!(TcpProber.is_open("127.0.0.1", port, Duration::from_secs(5)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn unresolvable_host_is_not_open() {
        assert!(!TcpProber.is_open("no-such-host.invalid", 80, Duration::from_millis(200)));
    }

    #[test]
    fn wait_gives_up_at_ceiling() {
        let port = unused_port();
        let mut ticks = 0;
        let start = Instant::now();
        let result = wait_for_port(
            &TcpProber,
            "127.0.0.1",
            port,
            PollSpec {
                probe_timeout: Duration::from_millis(50),
                interval: Duration::from_millis(20),
                ceiling: Duration::from_millis(200),
            },
            &CancelToken::new(),
            || ticks += 1,
        );
        assert_eq!(result, WaitResult::TimedOut);
        assert!(ticks > 0);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn zero_ceiling_still_probes_once() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let result = wait_for_port(
            &TcpProber,
            "127.0.0.1",
            port,
            PollSpec {
                probe_timeout: Duration::from_millis(500),
                interval: Duration::from_millis(20),
                ceiling: Duration::ZERO,
            },
            &CancelToken::new(),
            || {},
        );
        assert_eq!(result, WaitResult::Open);
    }

    #[test]
    fn zero_ceiling_on_closed_port_times_out_after_one_attempt() {
        let mut ticks = 0;
        let result = wait_for_port(
            &TcpProber,
            "127.0.0.1",
            unused_port(),
            PollSpec {
                probe_timeout: Duration::from_millis(50),
                interval: Duration::from_millis(20),
                ceiling: Duration::ZERO,
            },
            &CancelToken::new(),
            || ticks += 1,
        );
        assert_eq!(result, WaitResult::TimedOut);
        assert_eq!(ticks, 1);
    }

    #[test]
    fn wait_stops_when_cancelled() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = wait_for_port(
            &TcpProber,
            "127.0.0.1",
            unused_port(),
            PollSpec {
                probe_timeout: Duration::from_millis(50),
                interval: Duration::from_millis(20),
                ceiling: Duration::from_secs(10),
            },
            &cancel,
            || {},
        );
        assert_eq!(result, WaitResult::Cancelled);
    }
}
