use std::{num::NonZeroU32, sync::OnceLock, time::Duration};

use governor::{
    clock::{QuantaClock, QuantaInstant},
    middleware::NoOpMiddleware,
    state::InMemoryState,
};
use reqwest::{Client, Error as RequestError};
use tracing::{instrument, Level};
use url::Url;

pub fn make_client() -> Client {
    Client::builder()
        .gzip(true)
        .build()
        .expect("client creation should succeed")
}

static RATE_LIMIT: u32 = 2;
static DELAY_JITTER: u64 = 1;
static RATE_LIMITER: OnceLock<
    governor::RateLimiter<
        governor::state::NotKeyed,
        InMemoryState,
        QuantaClock,
        NoOpMiddleware<QuantaInstant>,
    >,
> = OnceLock::new();

/// Waits until the process-wide rate limiter allows another outbound call.
/// Shared by page fetches and place lookups.
pub async fn throttle() {
    let rate_limiter = RATE_LIMITER.get_or_init(|| {
        governor::RateLimiter::direct(governor::Quota::per_second(
            NonZeroU32::new(RATE_LIMIT).expect("rate limit is nonzero"),
        ))
    });
    let retry_jitter = governor::Jitter::new(Duration::ZERO, Duration::from_secs(DELAY_JITTER));
    rate_limiter.until_ready_with_jitter(retry_jitter).await;
}

/// Fetches a page body, treating non-2xx statuses as errors.
#[instrument(skip(client), level = Level::DEBUG)]
pub async fn page_text(client: &Client, url: &Url) -> Result<String, RequestError> {
    throttle().await;
    let start = std::time::Instant::now();
    let response = client.get(url.clone()).send().await?.error_for_status()?;
    let text = response.text().await?;
    log::trace!("Fetched {url} in {:?}", start.elapsed());
    Ok(text)
}
