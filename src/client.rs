use std::{sync::Arc, time::Duration};

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    http::{HttpMethod, HttpRequest, Transport},
    Error, Result,
};

const TOO_MANY_REQUESTS: u16 = 429;
const NOT_FOUND: u16 = 404;

/// Strategy used to wait between two attempts of a rate-limited request.
pub trait RetryDelay {
    /// Block the calling thread for (at most) `interval`.
    fn wait(&self, interval: Duration);
}

/// Default [`RetryDelay`]: puts the calling thread to sleep for the full interval.
pub struct ThreadSleep;
impl RetryDelay for ThreadSleep {
    fn wait(&self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

impl<T: Fn(Duration)> RetryDelay for T {
    fn wait(&self, interval: Duration) {
        self(interval);
    }
}

/// A client for the LaunchDarkly REST API.
///
/// The client is stateless between calls and can be shared between threads. Every request
/// carries the raw access token in `Authorization` and a JSON `Content-Type`, including bodiless
/// `GET`/`DELETE` requests whose body is `null`.
#[derive(Clone)]
pub struct Client {
    access_token: String,
    transport: Arc<dyn Transport + Send + Sync>,
    retry_interval: Duration,
    retry_delay: Arc<dyn RetryDelay + Send + Sync>,
}

impl Client {
    pub(crate) fn new(
        access_token: String,
        transport: Arc<dyn Transport + Send + Sync>,
        retry_interval: Duration,
        retry_delay: Arc<dyn RetryDelay + Send + Sync>,
    ) -> Client {
        Client {
            access_token,
            transport,
            retry_interval,
            retry_delay,
        }
    }

    /// Execute a request and return its status with the raw response body.
    ///
    /// When `expected` is empty any status is accepted. Otherwise a status outside `expected`
    /// is an error, except 429 while `max_retries` is not exhausted: the request is then repeated
    /// unchanged after the retry interval.
    pub fn execute<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        url: &str,
        body: &B,
        expected: &[u16],
        max_retries: u32,
    ) -> Result<(u16, String)> {
        let request = HttpRequest {
            method,
            url: url.to_owned(),
            headers: vec![
                ("Authorization".to_owned(), self.access_token.clone()),
                (
                    "Content-Type".to_owned(),
                    "application/json; charset=utf-8".to_owned(),
                ),
            ],
            body: serde_json::to_string(body)?,
        };

        let mut retries_left = max_retries;
        loop {
            let response = self.transport.send(&request)?;
            log::debug!(target: "launchdarkly",
                        method:% = method,
                        url,
                        status = response.status;
                        "{method} {url} returned HTTP status {}", response.status);

            if expected.is_empty() || expected.contains(&response.status) {
                return Ok((response.status, response.body));
            }

            if response.status == TOO_MANY_REQUESTS && retries_left > 0 {
                retries_left -= 1;
                log::info!(target: "launchdarkly",
                           method:% = method,
                           url,
                           retries_left;
                           "will retry {method} {url} after {:?}", self.retry_interval);
                self.retry_delay.wait(self.retry_interval);
                continue;
            }

            return Err(Error::UnexpectedStatus {
                method: method.to_string(),
                url: url.to_owned(),
                status: response.status,
                body: response.body,
            });
        }
    }

    /// Fetch only the status of `url`. Never fails on a non-2xx status, used for existence
    /// checks.
    pub fn get_status(&self, url: &str) -> Result<u16> {
        let (status, _) = self.execute(HttpMethod::Get, url, &(), &[], 0)?;
        Ok(status)
    }

    /// `GET` a resource that must exist.
    pub fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let (_, body) = self.execute(HttpMethod::Get, url, &(), &[200], 0)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// `GET` a resource that may have been removed remotely. 404 yields `Ok(None)`.
    pub fn get_optional<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let (status, body) = self.execute(HttpMethod::Get, url, &(), &[200, NOT_FOUND], 0)?;
        if status == NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }

    /// `POST` `body` and decode the response.
    pub fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
        expected: &[u16],
    ) -> Result<T> {
        let (_, body) = self.execute(HttpMethod::Post, url, body, expected, 0)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// `PATCH` with a JSON Patch document, returning the raw response body.
    pub fn patch<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        expected: &[u16],
        max_retries: u32,
    ) -> Result<String> {
        let (_, body) = self.execute(HttpMethod::Patch, url, body, expected, max_retries)?;
        Ok(body)
    }

    /// `DELETE` a resource.
    pub fn delete(&self, url: &str, expected: &[u16]) -> Result<()> {
        self.execute(HttpMethod::Delete, url, &(), expected, 0)?;
        Ok(())
    }
}
