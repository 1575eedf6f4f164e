use std::sync::atomic::{AtomicUsize, Ordering};

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::debug;

use crate::error::TransportError;
use crate::settings::Settings;

/// Blocking page fetcher. Anything but a 2xx body is a `TransportError`.
pub trait Transport {
    fn get(&self, url: &str) -> Result<String, TransportError>;
}

/// reqwest-backed transport that rotates through the configured user agents.
pub struct HttpTransport {
    client: Client,
    user_agents: Vec<String>,
    next_agent: AtomicUsize,
}

impl HttpTransport {
    pub fn new(settings: &Settings) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            user_agents: settings.user_agents.clone(),
            next_agent: AtomicUsize::new(0),
        })
    }

    fn user_agent(&self) -> Option<&str> {
        if self.user_agents.is_empty() {
            return None;
        }
        let i = self.next_agent.fetch_add(1, Ordering::Relaxed) % self.user_agents.len();
        Some(self.user_agents[i].as_str())
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String, TransportError> {
        let mut req = self.client.get(url);
        if let Some(ua) = self.user_agent() {
            req = req.header(USER_AGENT, ua);
        }
        let resp = req.send()?;
        let status = resp.status();
        debug!(%url, %status, "GET");
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(resp.text()?)
    }
}
