use std::time::Duration;

use pvekit_domain::PveError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// HTTP client with timeout and retry support for idempotent reads.
///
/// Only `GET` requests are retried, on a 5xx status or a connection failure.
/// Every other method is sent exactly once.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, PveError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Total attempts allowed for a `GET`.
    #[must_use]
    pub const fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Execute the provided request builder, retrying reads.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, PveError> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let cloned_builder = builder.try_clone().ok_or_else(|| {
                PveError::Internal(
                    "request body cannot be cloned; buffer the body to enable retries".into(),
                )
            })?;

            let request = cloned_builder.build().map_err(|err| {
                let infra: InfraError = err.into();
                PveError::from(infra)
            })?;

            let method = request.method().clone();
            let url = request.url().clone();
            let can_retry = attempt < self.attempts_for(&method);
            debug!(attempt, %method, %url, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");

                    if status.is_server_error() && can_retry {
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt, %method, %url, error = %err, "HTTP request failed");

                    if can_retry && is_transient(&err) {
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }

                    let infra: InfraError = err.into();
                    return Err(PveError::from(infra));
                }
            }
        }
    }

    fn attempts_for(&self, method: &Method) -> usize {
        if method == Method::GET {
            self.max_attempts
        } else {
            1
        }
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
    accept_invalid_certs: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 1,
            base_backoff: Duration::from_millis(200),
            user_agent: None,
            accept_invalid_certs: false,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts for `GET` (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Skip TLS certificate verification (self-signed hypervisor hosts).
    pub fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    pub fn build(self) -> Result<HttpClient, PveError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            PveError::from(infra)
        })?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn reads_retried(attempts: usize) -> HttpClient {
        HttpClient::builder()
            .base_backoff(Duration::from_millis(5))
            .max_attempts(attempts)
            .build()
            .expect("http client")
    }

    async fn status_of(client: &HttpClient, verb: Method, url: String) -> StatusCode {
        client.send(client.request(verb, url)).await.expect("response").status()
    }

    #[tokio::test]
    async fn status_read_recovers_after_two_bad_gateways() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api2/json/nodes/pve1/qemu/100/status/current"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api2/json/nodes/pve1/qemu/100/status/current"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/api2/json/nodes/pve1/qemu/100/status/current", server.uri());
        assert_eq!(status_of(&reads_retried(3), Method::GET, url).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn power_actions_and_deletes_are_sent_once() {
        let server = MockServer::start().await;
        for verb in ["POST", "PUT", "DELETE"] {
            Mock::given(method(verb))
                .respond_with(ResponseTemplate::new(503))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = reads_retried(5);
        for verb in [Method::POST, Method::PUT, Method::DELETE] {
            let url = format!("{}/api2/json/nodes/pve1/qemu/100", server.uri());
            assert_eq!(status_of(&client, verb, url).await, StatusCode::SERVICE_UNAVAILABLE);
        }
    }

    #[tokio::test]
    async fn reads_go_out_once_unless_configured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().expect("http client");
        assert_eq!(client.max_attempts(), 1);
        assert_eq!(
            status_of(&client, Method::GET, server.uri()).await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn missing_vm_answer_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(
            status_of(&reads_retried(3), Method::GET, server.uri()).await,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let client = HttpClient::builder()
            .base_backoff(Duration::from_millis(100))
            .build()
            .expect("http client");
        assert_eq!(client.backoff_delay(1), Duration::from_millis(100));
        assert_eq!(client.backoff_delay(3), Duration::from_millis(400));
        assert_eq!(client.backoff_delay(40), client.backoff_delay(9));
    }

    #[test]
    fn only_get_is_replayed() {
        let client = reads_retried(4);
        assert_eq!(client.attempts_for(&Method::GET), 4);
        assert_eq!(client.attempts_for(&Method::POST), 1);
        assert_eq!(client.attempts_for(&Method::DELETE), 1);
    }
}
