// HTTP transport: one form POST per query, no retry
use crate::api::request::QueryWindow;
use crate::api::transport::{charset_from_content_type, CallsTransport, RawResponse};
use crate::error::{QueryError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

pub struct HttpTransport {
    client: Client,
    endpoint: String,
    token: String,
}

impl HttpTransport {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        connect_timeout: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .map_err(classify)?;

        Ok(HttpTransport {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }
}

#[async_trait::async_trait]
impl CallsTransport for HttpTransport {
    async fn fetch(&self, window: &QueryWindow) -> Result<RawResponse> {
        tracing::debug!(
            "POST {} ({} .. {})",
            self.endpoint,
            window.start(),
            window.end()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .form(&window.form(&self.token))
            .send()
            .await
            .map_err(classify)?
            .error_for_status()
            .map_err(classify)?;

        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_from_content_type);

        let body = response.bytes().await.map_err(classify)?.to_vec();
        tracing::debug!("received {} bytes (charset {:?})", body.len(), charset);

        Ok(RawResponse { body, charset })
    }
}

fn classify(e: reqwest::Error) -> QueryError {
    if e.is_timeout() {
        QueryError::RequestTimeout
    } else {
        QueryError::NetworkFailure(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Read one HTTP request (headers plus Content-Length body) from the socket.
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buffer).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buffer.len() >= header_end + 4 + content_length {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&buffer).to_string()
    }

    /// Serve a single canned response and hand back the request that was received.
    async fn serve_once(
        status: &'static str,
        content_type: &'static str,
        body: &'static [u8],
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/ws/index.php", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let head = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                content_type,
                body.len()
            );
            stream.write_all(head.as_bytes()).await.unwrap();
            stream.write_all(body).await.unwrap();
            stream.flush().await.unwrap();
            request
        });

        (url, handle)
    }

    fn transport(url: &str, timeout: Duration) -> HttpTransport {
        HttpTransport::new(url, "secret", Duration::from_secs(2), timeout).unwrap()
    }

    #[tokio::test]
    async fn test_posts_form_and_returns_body() {
        let (url, server) = serve_once(
            "200 OK",
            "text/html; charset=ISO-8859-1",
            b"{\"dados\":[]}",
        )
        .await;

        let window = QueryWindow::parse("05/03/2024").unwrap();
        let raw = transport(&url, Duration::from_secs(5))
            .fetch(&window)
            .await
            .expect("fetch failed");

        assert_eq!(raw.body, b"{\"dados\":[]}");
        assert_eq!(raw.charset.as_deref(), Some("ISO-8859-1"));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /ws/index.php"));
        assert!(request.contains("vToken=secret"));
        assert!(request.contains("vAct=getRetLigEntrante"));
        assert!(request.contains("vDataInicio=05%2F03%2F2024+00%3A00%3A00"));
        assert!(request.contains("vDataFim=05%2F03%2F2024+23%3A59%3A59"));
    }

    #[tokio::test]
    async fn test_error_status_is_network_failure() {
        let (url, server) = serve_once("500 Internal Server Error", "text/plain", b"boom").await;

        let window = QueryWindow::parse("05/03/2024").unwrap();
        let err = transport(&url, Duration::from_secs(5))
            .fetch(&window)
            .await
            .unwrap_err();

        assert!(matches!(err, QueryError::NetworkFailure(_)), "{:?}", err);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
            drop(stream);
        });

        let window = QueryWindow::parse("05/03/2024").unwrap();
        let err = transport(&url, Duration::from_millis(200))
            .fetch(&window)
            .await
            .unwrap_err();

        assert!(matches!(err, QueryError::RequestTimeout), "{:?}", err);
        server.abort();
    }

    #[tokio::test]
    async fn test_refused_connection_is_network_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let window = QueryWindow::parse("05/03/2024").unwrap();
        let err = transport(&url, Duration::from_secs(5))
            .fetch(&window)
            .await
            .unwrap_err();

        assert!(matches!(err, QueryError::NetworkFailure(_)), "{:?}", err);
    }
}
