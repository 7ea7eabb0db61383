use std::time::Duration;

use hyper::ext::ReasonPhrase;
use log::{debug, error};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::Config;

/// How long a failed response gets to deliver its body before we give up
/// on it and report the status alone
pub const ERROR_BODY_GRACE: Duration = Duration::from_millis(250);

#[derive(Debug)]
pub struct ResponseErrorContext {
    pub body: String,
    pub code: StatusCode,
    /// Reason phrase exactly as the server sent it, when it differs from
    /// the standard one
    pub reason: Option<String>,
}

impl ResponseErrorContext {
    /// The reason phrase of the status line. Without a custom one we use
    /// the standard phrase, and codes without either fall back to the number
    pub fn status_text(&self) -> String {
        if let Some(reason) = &self.reason {
            return reason.clone();
        }
        match self.code.canonical_reason() {
            Some(reason) => reason.to_owned(),
            None => self.code.as_str().to_owned(),
        }
    }
}

fn sent_reason(response: &Response) -> Option<String> {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
        .filter(|reason| !reason.is_empty())
}

/// Wrapper for providing actual useful information about
/// why responses failed since reqwest throws that information
/// away when it encounters errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("{}", .0.status_text())]
    FailStatus(ResponseErrorContext),
    #[error("Unexpected body from {url}: {source}")]
    UnexpectedBody {
        url: Url,
        context: ResponseErrorContext,
        #[source]
        source: serde_json::Error,
    },
    #[error("Request error: {0}")]
    ReqwestError(#[from] reqwest::Error),
}

impl HttpError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::ReqwestError(err) if err.is_timeout())
    }
}

pub async fn parse_successful_response<T: DeserializeOwned>(
    response: Response,
) -> Result<T, HttpError> {
    let response_code = response.status();
    let url = response.url().clone();
    if !response_code.is_success() {
        // the status is the error, the body is only context and must not
        // hold the failure back
        let reason = sent_reason(&response);
        let body = match tokio::time::timeout(ERROR_BODY_GRACE, response.text()).await {
            Ok(Ok(body)) => body,
            Ok(Err(err)) => {
                debug!("Could not read error body from {}: {}", url, err);
                String::new()
            }
            Err(_) => {
                debug!("Error body from {} did not arrive in time", url);
                String::new()
            }
        };
        return Err(HttpError::FailStatus(ResponseErrorContext {
            body,
            code: response_code,
            reason,
        }));
    }
    let response_body = response.text().await?;
    serde_json::from_str::<T>(&response_body).map_err(|source| {
        error!("Failed to parse response from {}", url);
        HttpError::UnexpectedBody {
            url,
            context: ResponseErrorContext {
                body: response_body,
                code: response_code,
                reason: None,
            },
            source,
        }
    })
}

/// One client per process, its connection pool is shared by every load
pub fn build_client(config: &Config) -> reqwest::Result<Client> {
    let builder = Client::builder().user_agent(config.user_agent.as_str());
    let builder = match config.request_timeout {
        Some(timeout) => builder.timeout(timeout),
        None => builder,
    };
    builder.build()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::StatusCode;
    use serde::Deserialize;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{parse_successful_response, HttpError, ResponseErrorContext};

    #[derive(Debug, Deserialize)]
    struct Pong {
        ok: bool,
    }

    async fn respond_with(template: ResponseTemplate) -> reqwest::Response {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(template)
            .mount(&server)
            .await;
        reqwest::get(format!("{}/ping", server.uri())).await.unwrap()
    }

    /// Answers a single connection with `head` verbatim and then keeps the
    /// connection open without writing anything else
    async fn stalling_server(head: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            socket.write_all(head.as_bytes()).await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });
        format!("http://{}/ping", addr)
    }

    #[test]
    fn status_text_prefers_sent_reason() {
        let context = ResponseErrorContext {
            body: String::new(),
            code: StatusCode::INTERNAL_SERVER_ERROR,
            reason: Some("Upstream Exploded".to_owned()),
        };
        assert_eq!(context.status_text(), "Upstream Exploded");
    }

    #[test]
    fn status_text_uses_reason_phrase() {
        let context = ResponseErrorContext {
            body: String::new(),
            code: StatusCode::INTERNAL_SERVER_ERROR,
            reason: None,
        };
        assert_eq!(context.status_text(), "Internal Server Error");
    }

    #[test]
    fn status_text_falls_back_to_code() {
        let context = ResponseErrorContext {
            body: String::new(),
            code: StatusCode::from_u16(599).unwrap(),
            reason: None,
        };
        assert_eq!(context.status_text(), "599");
    }

    #[tokio::test]
    async fn decodes_successful_body() {
        let response = respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })),
        )
        .await;
        let pong = parse_successful_response::<Pong>(response).await.unwrap();
        assert!(pong.ok);
    }

    #[tokio::test]
    async fn failed_status_keeps_body() {
        let response =
            respond_with(ResponseTemplate::new(503).set_body_string("come back later")).await;
        match parse_successful_response::<Pong>(response).await {
            Err(HttpError::FailStatus(context)) => {
                assert_eq!(context.code, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(context.body, "come back later");
            }
            other => panic!("Expected FailStatus, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_status_displays_status_text() {
        let response = respond_with(ResponseTemplate::new(404)).await;
        let err = parse_successful_response::<Pong>(response)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Not Found");
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn unexpected_body_keeps_context() {
        let response = respond_with(ResponseTemplate::new(200).set_body_string("<html>")).await;
        match parse_successful_response::<Pong>(response).await {
            Err(HttpError::UnexpectedBody { url, context, .. }) => {
                assert_eq!(url.path(), "/ping");
                assert_eq!(context.code, StatusCode::OK);
                assert_eq!(context.body, "<html>");
            }
            other => panic!("Expected UnexpectedBody, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_status_does_not_wait_for_stalled_body() {
        let url = stalling_server(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\npartial",
        )
        .await;
        let response = reqwest::get(url).await.unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            parse_successful_response::<Pong>(response),
        )
        .await
        .expect("a failed status resolves without the full body");
        match result {
            Err(HttpError::FailStatus(context)) => {
                assert_eq!(context.code, StatusCode::INTERNAL_SERVER_ERROR);
                assert!(context.body.is_empty());
                assert_eq!(context.status_text(), "Internal Server Error");
            }
            other => panic!("Expected FailStatus, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_status_keeps_custom_reason() {
        let url = stalling_server(
            "HTTP/1.1 500 Upstream Exploded\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let response = reqwest::get(url).await.unwrap();

        let err = parse_successful_response::<Pong>(response)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Upstream Exploded");
    }
}
