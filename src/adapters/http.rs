use crate::config::HttpConfig;
use crate::domain::ports::PageFetcher;
use crate::utils::error::Result;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;

const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (compatible; uni-etl/0.1)";

/// Polite blocking-style fetcher: random pause before every attempt,
/// rotating user agent, linear backoff between attempts. Only HTTP 200
/// counts as success.
pub struct HttpFetcher {
    client: Client,
    settings: HttpConfig,
}

impl HttpFetcher {
    pub fn new(settings: HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        Ok(Self { client, settings })
    }

    fn user_agent(&self) -> String {
        self.settings
            .user_agents
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(|| FALLBACK_USER_AGENT.to_string())
    }

    fn polite_delay(&self) -> Duration {
        let low = self.settings.min_delay_ms;
        let high = self.settings.max_delay_ms.max(low);
        if high == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(low..=high))
    }

    async fn attempt(&self, url: &str) -> std::result::Result<Option<String>, reqwest::Error> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent())
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            tracing::debug!("Request failed ({}) for {}", response.status(), url);
            return Ok(None);
        }
        Ok(Some(response.text().await?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        let retries = self.settings.retries;
        for attempt in 1..=retries {
            let pause = self.polite_delay();
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }

            match self.attempt(url).await {
                Ok(Some(body)) => return Some(body),
                Ok(None) => {
                    tracing::warn!("Request failed for {} [attempt {}/{}]", url, attempt, retries)
                }
                Err(e) => tracing::warn!(
                    "Request error for {}: {} [attempt {}/{}]",
                    url,
                    e,
                    attempt,
                    retries
                ),
            }

            if attempt < retries && self.settings.backoff_ms > 0 {
                let backoff = self.settings.backoff_ms * u64::from(attempt);
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }
        }
        None
    }
}
