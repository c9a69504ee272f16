#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use spotcat::{
    config::Endpoints,
    error::NetworkError,
    spotify::http::{HttpExecutor, HttpRequest, HttpResponse},
    types::Credentials,
};

pub const TOKEN_URL: &str = "https://accounts.test/api/token";
pub const AUTHORIZE_URL: &str = "https://accounts.test/authorize";
pub const API_URL: &str = "https://api.test/v1";
pub const REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";

type Reply = Result<HttpResponse, NetworkError>;

pub fn endpoints() -> Endpoints {
    Endpoints {
        api_url: API_URL.to_string(),
        token_url: TOKEN_URL.to_string(),
        authorize_url: AUTHORIZE_URL.to_string(),
    }
}

pub fn credentials() -> Credentials {
    Credentials::new("client", "secret").unwrap()
}

pub fn user_credentials() -> Credentials {
    credentials()
        .with_authorization_code("auth-code")
        .with_redirect_uri(REDIRECT_URI)
}

pub fn token_body(access_token: &str, refresh_token: Option<&str>, expires_in: u64) -> String {
    match refresh_token {
        Some(refresh_token) => format!(
            r#"{{"access_token":"{}","token_type":"Bearer","refresh_token":"{}","expires_in":{}}}"#,
            access_token, refresh_token, expires_in
        ),
        None => format!(
            r#"{{"access_token":"{}","token_type":"Bearer","expires_in":{}}}"#,
            access_token, expires_in
        ),
    }
}

/// Records every request and answers from per-endpoint queues.
///
/// Once a queue is empty, the token endpoint hands out `token-1`, `token-2`,
/// ... and every other url answers `200 {}`.
#[derive(Default)]
pub struct MockExecutor {
    token_replies: Mutex<VecDeque<Reply>>,
    api_replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
    issued: AtomicUsize,
    delay: Option<Duration>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn token_reply(&self, status: u16, body: impl Into<String>) {
        self.token_replies.lock().push_back(Ok(HttpResponse {
            status,
            body: body.into(),
        }));
    }

    pub fn token_failure(&self, error: NetworkError) {
        self.token_replies.lock().push_back(Err(error));
    }

    pub fn api_reply(&self, status: u16, body: impl Into<String>) {
        self.api_replies.lock().push_back(Ok(HttpResponse {
            status,
            body: body.into(),
        }));
    }

    pub fn api_failure(&self, error: NetworkError) {
        self.api_replies.lock().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn token_requests(&self) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url == TOKEN_URL)
            .collect()
    }

    pub fn api_requests(&self) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url != TOKEN_URL)
            .collect()
    }
}

#[async_trait]
impl HttpExecutor for MockExecutor {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError> {
        let is_token = request.url == TOKEN_URL;
        self.requests.lock().push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let queued = if is_token {
            self.token_replies.lock().pop_front()
        } else {
            self.api_replies.lock().pop_front()
        };

        match queued {
            Some(reply) => reply,
            None if is_token => {
                let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(HttpResponse {
                    status: 200,
                    body: token_body(&format!("token-{}", n), None, 3600),
                })
            }
            None => Ok(HttpResponse {
                status: 200,
                body: "{}".to_string(),
            }),
        }
    }
}
