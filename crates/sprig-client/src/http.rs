use std::net::IpAddr;
use std::time::Duration;

use reqwest::{Client, Response};
use sprig_core::AppError;
use url::Url;

const USER_AGENT: &str = concat!("sprig/", env!("CARGO_PKG_VERSION"));

/// Shared reqwest client used by the page fetcher and the image downloader.
///
/// Requests to loopback, private and link-local addresses are refused unless
/// [`allow_private_urls`](Self::allow_private_urls) is called: image URLs come
/// from remote markup and must not be able to reach the local network.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout_secs: u64,
    block_private: bool,
}

impl HttpClient {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
            block_private: true,
        })
    }

    /// Allow requests to private/reserved addresses (local testing, intranet mirrors).
    pub fn allow_private_urls(mut self) -> Self {
        self.block_private = false;
        self
    }

    /// Send a GET request. Status codes are left to the caller.
    pub(crate) async fn get(&self, url: &str) -> Result<Response, AppError> {
        if self.block_private {
            check_public_url(url).await?;
        }

        self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })
    }
}

/// Reject non-http(s) URLs and hosts that resolve to non-public addresses.
async fn check_public_url(url: &str) -> Result<(), AppError> {
    let parsed = Url::parse(url).map_err(|e| AppError::HttpError(format!("Invalid URL {url}: {e}")))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(AppError::HttpError(format!(
            "URL scheme '{scheme}' is not allowed (only http/https)"
        )));
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| AppError::HttpError(format!("URL has no host: {url}")))?;
    let host = host.trim_start_matches('[').trim_end_matches(']');

    let addrs: Vec<IpAddr> = match host.parse::<IpAddr>() {
        Ok(ip) => vec![ip],
        Err(_) => {
            let port = parsed.port_or_known_default().unwrap_or(80);
            tokio::net::lookup_host((host, port))
                .await
                .map_err(|e| AppError::NetworkError(format!("DNS resolution failed for {host}: {e}")))?
                .map(|addr| addr.ip())
                .collect()
        }
    };

    if addrs.is_empty() {
        return Err(AppError::NetworkError(format!(
            "DNS resolution returned no addresses for {host}"
        )));
    }
    if let Some(ip) = addrs.into_iter().find(|ip| !is_public(*ip)) {
        return Err(AppError::HttpError(format!(
            "Blocked request to {host}: resolves to non-public address {ip}"
        )));
    }
    Ok(())
}

fn is_public(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, ..] = v4.octets();
            let shared = a == 100 && (b & 0xC0) == 64; // 100.64.0.0/10
            !(v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation()
                || shared)
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_public(IpAddr::V4(v4));
            }
            let first = v6.segments()[0];
            let link_local = (first & 0xFFC0) == 0xFE80;
            let unique_local = (first & 0xFE00) == 0xFC00;
            !(v6.is_loopback() || v6.is_unspecified() || link_local || unique_local)
        }
    }
}
