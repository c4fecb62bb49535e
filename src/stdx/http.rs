use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;

pub static DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Sends a request, retrying transport errors and `429 Too Many Requests` up to
/// `tries` extra times with a jittered, growing back-off.
///
/// With `tries == 0` this is exactly one request.
pub struct Retry {
    request: RequestBuilder,
    tries: u8,
}

impl Retry {
    pub async fn send(self) -> Result<Response, reqwest::Error> {
        let Self { request, mut tries } = self;
        let mut wait = fastrand::u64(100..=300);

        loop {
            // Only fails to clone for streaming bodies. Nothing to retry with then.
            let Some(attempt) = request.try_clone() else {
                return request.send().await;
            };

            match attempt.send().await {
                Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS && tries > 0 => {
                    tracing::debug!(url = %response.url(), tries, "upstream rate limited, retrying");
                }
                Err(err) if tries > 0 => {
                    tracing::debug!(error = %err, tries, "upstream request failed, retrying");
                }
                result => return result,
            }

            tokio::time::sleep(Duration::from_millis(wait)).await;
            tries -= 1;
            wait += 300;
            wait += fastrand::u64(100..=300);
        }
    }
}

pub trait IRetry {
    fn retry(self, tries: u8) -> Retry;
}

impl IRetry for RequestBuilder {
    fn retry(self, tries: u8) -> Retry {
        Retry {
            request: self,
            tries,
        }
    }
}
