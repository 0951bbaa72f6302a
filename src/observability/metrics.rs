//! Metrics collection and Prometheus export module.
//!
//! This module provides:
//! - Rate limiting for the metrics HTTP endpoint
//! - Prometheus recorder and a small HTTP server (`/metrics`, `/health/*`)
//! - Recording functions for bot and cell-check metrics

use anyhow::Result;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

use crate::observability_config::ObservabilityConfig;

static READY: AtomicBool = AtomicBool::new(false);

/// Mark the bot as ready to serve updates (flips `/health/ready` to OK)
pub fn mark_ready() {
    READY.store(true, Ordering::SeqCst);
}

/// Whether [`mark_ready`] has been called
pub fn is_ready() -> bool {
    READY.load(Ordering::SeqCst)
}

/// Simple rate limiter for HTTP requests
#[derive(Debug)]
pub struct RateLimiter {
    requests: Mutex<HashMap<String, Vec<Instant>>>,
    max_requests: u32,
    window_secs: u64,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
            max_requests,
            window_secs,
        }
    }

    /// Check if request is allowed for the given IP
    pub fn is_allowed(&self, ip: &str) -> bool {
        let now = Instant::now();
        let window = Duration::from_secs(self.window_secs);

        let mut requests = self.requests.lock();
        // Clients with no request inside the window are forgotten
        requests.retain(|_, times| {
            times.retain(|&time| now.duration_since(time) < window);
            !times.is_empty()
        });

        let client_requests = requests.entry(ip.to_string()).or_default();
        if client_requests.len() >= self.max_requests as usize {
            return false;
        }

        client_requests.push(now);
        true
    }

    /// Number of clients with requests inside the current window
    pub fn tracked_clients(&self) -> usize {
        self.requests.lock().len()
    }
}

/// Initialize metrics collection with Prometheus exporter and configuration
pub fn init_metrics_with_config(config: &ObservabilityConfig) -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    tracing::info!(
        metrics_enabled = %config.enable_metrics_export,
        "Metrics collection initialized"
    );
    Ok(handle)
}

fn text_response(status: hyper::StatusCode, body: &str) -> hyper::Response<String> {
    let mut response = hyper::Response::new(body.to_string());
    *response.status_mut() = status;
    response
}

/// Route one request of the metrics server
pub fn route_metrics_request(
    method: &hyper::Method,
    path: &str,
    metrics_handle: &PrometheusHandle,
) -> hyper::Response<String> {
    match (method, path) {
        (&hyper::Method::GET, "/metrics") => {
            let mut response = hyper::Response::new(metrics_handle.render());
            response.headers_mut().insert(
                "content-type",
                hyper::header::HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
            );
            response
        }
        (&hyper::Method::GET, "/health/live") => text_response(hyper::StatusCode::OK, "OK"),
        (&hyper::Method::GET, "/health/ready") => {
            if is_ready() {
                text_response(hyper::StatusCode::OK, "OK")
            } else {
                text_response(hyper::StatusCode::SERVICE_UNAVAILABLE, "NOT READY: bot is starting")
            }
        }
        _ => text_response(hyper::StatusCode::NOT_FOUND, "Not Found"),
    }
}

/// Start the metrics server in a background task
pub async fn start_metrics_server(metrics_handle: PrometheusHandle, port: u16) -> Result<()> {
    // localhost only unless explicitly configured
    let bind_all = std::env::var("METRICS_BIND_ALL_INTERFACES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    let addr = if bind_all {
        SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port)
    } else {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
    };

    let rate_limiter = Arc::new(RateLimiter::new(30, 60));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, bind_all, "Metrics server listening");

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, peer_addr)) => {
                    let metrics_handle = metrics_handle.clone();
                    let rate_limiter = rate_limiter.clone();

                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);

                        let service = hyper::service::service_fn(
                            move |req: hyper::Request<hyper::body::Incoming>| {
                                let metrics_handle = metrics_handle.clone();
                                let rate_limiter = rate_limiter.clone();
                                async move {
                                    if !rate_limiter.is_allowed(&peer_addr.ip().to_string()) {
                                        return Ok::<_, std::convert::Infallible>(text_response(
                                            hyper::StatusCode::TOO_MANY_REQUESTS,
                                            "Rate limit exceeded",
                                        ));
                                    }
                                    Ok(route_metrics_request(
                                        req.method(),
                                        req.uri().path(),
                                        &metrics_handle,
                                    ))
                                }
                            },
                        );

                        if let Err(err) = http1::Builder::new().serve_connection(io, service).await
                        {
                            tracing::warn!(
                                error = %err,
                                peer = %peer_addr,
                                "Error serving metrics connection"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "Error accepting metrics connection");
                }
            }
        }
    });

    Ok(())
}

/// Record request metrics
pub fn record_request_metrics(method: &str, status: u16, duration: Duration) {
    let method = method.to_string();
    let status = status.to_string();
    ::metrics::counter!("requests_total", "method" => method, "status" => status).increment(1);
    ::metrics::histogram!("request_duration_seconds").record(duration.as_secs_f64());
}

/// Record Telegram message processing metrics
pub fn record_telegram_message(message_type: &str) {
    let message_type = message_type.to_string();
    ::metrics::counter!("telegram_messages_total", "type" => message_type).increment(1);
}

/// Record one candidate generation run
pub fn record_candidate_generation(candidate_count: usize, rotated: bool, duration: Duration) {
    let rotated = if rotated { "true" } else { "false" };
    ::metrics::counter!("cell_generations_total", "rotated" => rotated).increment(1);
    ::metrics::histogram!("cell_candidates_count").record(candidate_count as f64);
    ::metrics::histogram!("cell_generation_duration_seconds").record(duration.as_secs_f64());
}

/// Record the outcome of a cell check request
pub fn record_cell_check(outcome: &'static str) {
    ::metrics::counter!("cell_checks_total", "outcome" => outcome).increment(1);
}

/// Record a maximum cell update attempt
pub fn record_max_cell_update(accepted: bool) {
    ::metrics::counter!(
        "max_cell_updates_total",
        "result" => if accepted { "accepted" } else { "rejected" }
    )
    .increment(1);
}

/// Record error metrics by type and component
pub fn record_error_metrics(error_type: &str, component: &str) {
    let error_type = error_type.to_string();
    let component = component.to_string();
    ::metrics::counter!("errors_total", "type" => error_type, "component" => component)
        .increment(1);
}

/// Record startup duration
pub fn record_startup_metrics(duration: Duration) {
    ::metrics::histogram!("startup_duration_seconds").record(duration.as_secs_f64());
}

/// Record user engagement metrics
pub fn record_user_action(chat_id: i64, action: UserAction, language_code: Option<&str>) {
    let action_str = action.as_str();
    ::metrics::counter!("user_actions_total", "action" => action_str).increment(1);

    if let Some(lang) = language_code {
        ::metrics::counter!("user_language_usage_total", "language" => lang.to_string())
            .increment(1);
    }

    tracing::debug!(
        chat_id = %chat_id,
        action = %action_str,
        language_code = ?language_code,
        "User action recorded"
    );
}

/// User action enumeration for engagement tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    StartCommand,
    HelpCommand,
    CheckCell,
    SetMaxCell,
    ShowMaxCell,
    Cancel,
    Reset,
}

impl UserAction {
    pub fn as_str(self) -> &'static str {
        match self {
            UserAction::StartCommand => "start_command",
            UserAction::HelpCommand => "help_command",
            UserAction::CheckCell => "check_cell",
            UserAction::SetMaxCell => "set_max_cell",
            UserAction::ShowMaxCell => "show_max_cell",
            UserAction::Cancel => "cancel",
            UserAction::Reset => "reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_window() {
        let limiter = RateLimiter::new(2, 60);
        assert!(limiter.is_allowed("127.0.0.1"));
        assert!(limiter.is_allowed("127.0.0.1"));
        assert!(!limiter.is_allowed("127.0.0.1"));
        // other clients are counted separately
        assert!(limiter.is_allowed("10.0.0.1"));
    }

    #[test]
    fn test_rate_limiter_forgets_idle_clients() {
        let limiter = RateLimiter::new(5, 0);
        for i in 0..100 {
            assert!(limiter.is_allowed(&format!("10.0.0.{}", i)));
        }
        // with a zero window every earlier request has expired
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_cell_check("candidates");
        record_candidate_generation(12, true, Duration::from_micros(40));
        record_max_cell_update(false);
        record_user_action(1, UserAction::CheckCell, Some("ru"));
    }

    #[test]
    fn test_metrics_routes() {
        let handle = PrometheusBuilder::new().build_recorder().handle();

        let live = route_metrics_request(&hyper::Method::GET, "/health/live", &handle);
        assert_eq!(live.status(), hyper::StatusCode::OK);

        let missing = route_metrics_request(&hyper::Method::GET, "/nope", &handle);
        assert_eq!(missing.status(), hyper::StatusCode::NOT_FOUND);

        let post = route_metrics_request(&hyper::Method::POST, "/metrics", &handle);
        assert_eq!(post.status(), hyper::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_user_action_labels() {
        assert_eq!(UserAction::CheckCell.as_str(), "check_cell");
        assert_eq!(UserAction::SetMaxCell.as_str(), "set_max_cell");
    }
}
