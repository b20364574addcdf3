use reqwest::{Client, Request, RequestBuilder, Response};
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};
use tracing::debug;

use crate::BoxError;

/// Requests the bucket holds when full.
pub const DEFAULT_BURST: u32 = 10;

/// One request per two seconds keeps under GitHub's authenticated search
/// quota of 30 requests per minute.
pub const DEFAULT_REFILL_INTERVAL: Duration = Duration::from_secs(2);

/// Token-bucket limiter. A token is added every `interval` up to `burst`;
/// each request consumes one.
pub struct RateLimiter {
    interval: Duration,
    burst: u32,
    max_wait: Option<Duration>,
    bucket: Mutex<Bucket>,
}

struct Bucket {
    tokens: f64,
    updated: Instant,
}

impl Bucket {
    fn refill(&mut self, now: Instant, interval: Duration, burst: u32) {
        let elapsed = now.saturating_duration_since(self.updated);
        self.tokens = (self.tokens + elapsed.as_secs_f64() / interval.as_secs_f64()).min(burst as f64);
        self.updated = now;
    }
}

impl RateLimiter {
    /// A limiter that starts with a full bucket.
    pub fn new(interval: Duration, burst: u32) -> Self {
        RateLimiter {
            interval,
            burst,
            max_wait: None,
            bucket: Mutex::new(Bucket {
                tokens: burst as f64,
                updated: Instant::now(),
            }),
        }
    }

    /// Fail instead of waiting when admission would take longer than `max_wait`.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Wait until the bucket admits one request.
    pub async fn acquire(&self) -> Result<(), BoxError> {
        if self.burst == 0 {
            return Err("rate limiter burst is zero, no request can be admitted".into());
        }
        if self.interval.is_zero() {
            return Ok(());
        }

        let mut bucket = self.bucket.lock().await;
        bucket.refill(Instant::now(), self.interval, self.burst);

        if bucket.tokens < 1.0 {
            let wait = self.interval.mul_f64(1.0 - bucket.tokens);
            if let Some(max_wait) = self.max_wait {
                if wait > max_wait {
                    return Err(format!(
                        "rate limiter would wait {:?}, longer than the allowed {:?}",
                        wait, max_wait
                    )
                    .into());
                }
            }

            debug!("Rate limiter waiting {:?}", wait);
            sleep(wait).await;
            bucket.refill(Instant::now(), self.interval, self.burst);
        }

        bucket.tokens = (bucket.tokens - 1.0).max(0.0);
        Ok(())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        RateLimiter::new(DEFAULT_REFILL_INTERVAL, DEFAULT_BURST)
    }
}

/// HTTP client that waits on a [`RateLimiter`] before every request.
pub struct RateLimitedClient {
    client: Client,
    limiter: RateLimiter,
}

impl RateLimitedClient {
    pub fn new(client: Client, limiter: RateLimiter) -> Self {
        RateLimitedClient { client, limiter }
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    /// Send a request once the limiter admits it. A limiter failure fails
    /// the request without touching the network.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, BoxError> {
        let request: Request = request.build()?;
        self.limiter.acquire().await?;
        debug!("Requesting URL: {}", request.url());
        Ok(self.client.execute(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_is_admitted_immediately() {
        let limiter = RateLimiter::new(Duration::from_secs(1), 3);
        let start = Instant::now();

        for _ in 0..3 {
            limiter.acquire().await.unwrap();
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_bucket_waits_for_refill() {
        let limiter = RateLimiter::new(Duration::from_secs(2), 1);
        let start = Instant::now();

        limiter.acquire().await.unwrap();
        limiter.acquire().await.unwrap();
        limiter.acquire().await.unwrap();

        assert!(start.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_time_refills_up_to_burst() {
        let limiter = RateLimiter::new(Duration::from_secs(1), 2);
        limiter.acquire().await.unwrap();
        limiter.acquire().await.unwrap();

        sleep(Duration::from_secs(60)).await;
        let start = Instant::now();
        limiter.acquire().await.unwrap();
        limiter.acquire().await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);

        limiter.acquire().await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_longer_than_bound_fails() {
        let limiter =
            RateLimiter::new(Duration::from_secs(10), 1).with_max_wait(Duration::from_secs(1));
        limiter.acquire().await.unwrap();

        let err = limiter.acquire().await.unwrap_err();
        assert!(err.to_string().contains("longer than the allowed"));
    }

    #[tokio::test]
    async fn zero_burst_never_admits() {
        let limiter = RateLimiter::new(Duration::from_secs(1), 0);
        assert!(limiter.acquire().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn limiter_error_fails_request_before_sending() {
        let limiter =
            RateLimiter::new(Duration::from_secs(10), 1).with_max_wait(Duration::from_millis(1));
        let client = RateLimitedClient::new(Client::new(), limiter);
        client.limiter.acquire().await.unwrap();

        // Port 9 is never contacted; the limiter rejects first.
        let err = client
            .send(client.get("http://127.0.0.1:9/search"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("rate limiter"));
    }
}
