//! Hand-framed HTTP/1.1 writes for fire-and-forget submissions.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::crypto::ring;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig as TlsConfig, RootCertStore};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Builds the raw POST request for `endpoint`.
pub fn frame_request(endpoint: &Url, body: &str) -> AppResult<String> {
    let host = endpoint
        .host_str()
        .ok_or_else(|| AppError::Configuration(format!("endpoint '{endpoint}' has no host")))?;
    let host_header = match endpoint.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    let mut target = endpoint.path().to_string();
    if let Some(query) = endpoint.query() {
        target.push('?');
        target.push_str(query);
    }

    Ok(format!(
        "POST {target} HTTP/1.1\r\n\
         Host: {host_header}\r\n\
         Content-Type: text/plain\r\n\
         Content-Length: {}\r\n\
         Connection: Close\r\n\
         \r\n\
         {body}",
        body.len()
    ))
}

/// Connects, writes the framed request and closes the connection without
/// reading a response. TLS is used for `https` endpoints.
pub async fn send_detached(
    endpoint: &Url,
    body: &str,
    connect_timeout: Duration,
    tls: &TlsConnector,
) -> AppResult<()> {
    let host = host_of(endpoint)?;
    let port = endpoint.port_or_known_default().ok_or_else(|| {
        AppError::Configuration(format!("endpoint '{endpoint}' has no usable port"))
    })?;
    let request = frame_request(endpoint, body)?;
    let address = format!("{host}:{port}");
    let server_name = match endpoint.scheme() {
        "https" => Some(tls_server_name(host)?),
        _ => None,
    };

    let tcp = timeout(connect_timeout, TcpStream::connect((host, port)))
        .await
        .map_err(|_| AppError::Timeout(address.clone()))??;

    match server_name {
        Some(server_name) => {
            let stream = timeout(connect_timeout, tls.connect(server_name, tcp))
                .await
                .map_err(|_| AppError::Timeout(address.clone()))??;
            write_and_close(stream, &request).await?;
        }
        None => write_and_close(tcp, &request).await?,
    }

    debug!(%address, bytes = request.len(), "wrote detached submission");
    Ok(())
}

async fn write_and_close<S>(mut stream: S, request: &str) -> AppResult<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(request.as_bytes()).await?;
    stream.flush().await?;
    stream.shutdown().await?;
    Ok(())
}

/// Connector trusting the webpki root set. Built once per transport.
pub fn tls_connector() -> AppResult<TlsConnector> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = TlsConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(|err| AppError::Tls(err.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(TlsConnector::from(Arc::new(config)))
}

fn tls_server_name(host: &str) -> AppResult<ServerName<'static>> {
    ServerName::try_from(host.to_string())
        .map_err(|err| AppError::Tls(format!("invalid server name '{host}': {err}")))
}

/// Host without IPv6 brackets, as the resolver and SNI expect it.
fn host_of(endpoint: &Url) -> AppResult<&str> {
    endpoint
        .host_str()
        .map(|host| host.trim_start_matches('[').trim_end_matches(']'))
        .ok_or_else(|| AppError::Configuration(format!("endpoint '{endpoint}' has no host")))
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    use super::*;

    #[test]
    fn frames_a_closing_post() {
        let endpoint = Url::parse("https://tickets.example.ac.uk/api/logTicket/index.php").unwrap();
        let request = frame_request(&endpoint, "[]").unwrap();
        assert_eq!(
            request,
            "POST /api/logTicket/index.php HTTP/1.1\r\n\
             Host: tickets.example.ac.uk\r\n\
             Content-Type: text/plain\r\n\
             Content-Length: 2\r\n\
             Connection: Close\r\n\
             \r\n\
             []"
        );
    }

    #[test]
    fn keeps_query_and_explicit_port() {
        let endpoint = Url::parse("http://localhost:8081/log?src=cron").unwrap();
        let request = frame_request(&endpoint, "é").unwrap();
        assert!(request.starts_with("POST /log?src=cron HTTP/1.1\r\nHost: localhost:8081\r\n"));
        assert!(request.contains("Content-Length: 2\r\n"));
    }

    #[test]
    fn keeps_brackets_around_ipv6_hosts() {
        let endpoint = Url::parse("http://[::1]:8080/log").unwrap();
        let request = frame_request(&endpoint, "[]").unwrap();
        assert!(request.contains("Host: [::1]:8080\r\n"));
        assert_eq!(host_of(&endpoint).unwrap(), "::1");
    }

    #[tokio::test]
    async fn rejects_hosts_unusable_as_tls_names() {
        let endpoint = Url::parse("https://-bad.example/log").unwrap();
        let err = send_detached(&endpoint, "[]", Duration::from_secs(5), &tls_connector().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Tls(ref message) if message.contains("-bad.example")));
    }

    #[tokio::test]
    async fn times_out_a_stalled_handshake() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let endpoint = Url::parse(&format!("https://127.0.0.1:{port}/log")).unwrap();
        let err = send_detached(
            &endpoint,
            "[]",
            Duration::from_millis(200),
            &tls_connector().unwrap(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Timeout(ref address) if address == &format!("127.0.0.1:{port}")));
        drop(listener);
    }

    #[tokio::test]
    async fn writes_the_request_and_hangs_up() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = String::new();
            socket.read_to_string(&mut received).await.unwrap();
            received
        });

        let endpoint = Url::parse(&format!("http://127.0.0.1:{port}/log")).unwrap();
        send_detached(
            &endpoint,
            r#"[{"Title":"x"}]"#,
            Duration::from_secs(5),
            &tls_connector().unwrap(),
        )
            .await
            .unwrap();

        let received = server.await.unwrap();
        assert!(received.starts_with("POST /log HTTP/1.1\r\n"));
        assert!(received.contains("Connection: Close\r\n"));
        assert!(received.ends_with("\r\n\r\n[{\"Title\":\"x\"}]"));
    }

    #[tokio::test]
    async fn surfaces_connection_failures() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let endpoint = Url::parse(&format!("http://127.0.0.1:{port}/log")).unwrap();
        let err = send_detached(&endpoint, "[]", Duration::from_secs(5), &tls_connector().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
