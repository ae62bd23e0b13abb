//! fldigi XML-RPC client

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::source::{FetchError, FetchResult, FrequencySource};
use crate::xmlrpc;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7362;

const GET_VFO: &str = "rig.get_vfo";
const LIST_METHODS: &str = "system.listMethods";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const KEEPALIVE: Duration = Duration::from_secs(30);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct FldigiClient {
    client: Client,
    url: String,
}

impl FldigiClient {
    /// Client for `http://{host}:{port}/RPC2`. Connections are made over
    /// IPv4 only; fldigi listens on an IPv4 socket.
    pub fn new(host: &str, port: u16) -> FetchResult<Self> {
        Self::with_url(format!("http://{host}:{port}/RPC2"))
    }

    pub fn with_url(url: impl Into<String>) -> FetchResult<Self> {
        let client = Client::builder()
            .local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
            .connect_timeout(CONNECT_TIMEOUT)
            .tcp_keepalive(KEEPALIVE)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call(&self, method: &str) -> FetchResult<String> {
        debug!("xml-rpc call {} -> {}", method, self.url);

        let response = self
            .client
            .post(&self.url)
            .header("content-type", "text/xml")
            .body(xmlrpc::method_call(method))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    /// Current VFO frequency in hertz.
    pub async fn get_frequency(&self) -> FetchResult<f64> {
        let body = self.call(GET_VFO).await?;
        xmlrpc::first_f64(&body)
    }

    /// Names of every XML-RPC method the remote exposes.
    pub async fn list_methods(&self) -> FetchResult<Vec<String>> {
        let body = self.call(LIST_METHODS).await?;
        xmlrpc::string_array(&body)
    }
}

#[async_trait::async_trait]
impl FrequencySource for FldigiClient {
    fn name(&self) -> &str {
        "fldigi"
    }

    async fn fetch_frequency(&self) -> FetchResult<f64> {
        self.get_frequency().await
    }
}
