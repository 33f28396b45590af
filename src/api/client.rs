//! Exposes a `Client` struct to interact with the API.

use std::time::Instant;

use serde::de::{DeserializeOwned, Error as _};

use super::{model, Error, Result};
use crate::config::Config;

fn elapsed_ms(start: &Instant) -> u128 {
    start.elapsed().as_millis()
}

/// Deserialize the response of `endpoint`.
///
/// Every record is a JSON object. The server answers `[]` to most endpoints
/// when the token is wrong, which serde would otherwise accept as a record
/// with every field defaulted.
pub fn decode<T: DeserializeOwned>(endpoint: &str, text: &str) -> Result<T> {
    let decode_error = |source| Error::Decode {
        endpoint: endpoint.to_string(),
        source,
    };

    let value: serde_json::Value = serde_json::from_str(text).map_err(decode_error)?;
    if !value.is_object() {
        return Err(decode_error(serde_json::Error::custom(format!(
            "expected a json object, got `{}`",
            value
        ))));
    }
    serde_json::from_value(value).map_err(decode_error)
}

pub struct Client {
    /// Use to make REST requests
    client: reqwest::Client,
    /// Example: `192.168.1.2` or `pi.hole`
    host: String,
    /// Appended as `auth` to every request
    token: Option<String>,
}

impl Client {
    /// Create a new client to interact with the Pi-hole API.
    ///
    /// Doesn't touch the network.
    pub fn new(config: &Config) -> Result<Client> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(Error::Build)?;

        Ok(Client {
            client,
            host: config.host.clone(),
            token: config.token.clone(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Example: `client.make_url("topItems=10")` will produce
    /// `http://{host}/admin/api.php?topItems=10&auth={token}`
    pub fn make_url(&self, endpoint: &str) -> String {
        let mut url = format!("http://{}/admin/api.php?{}", self.host, endpoint);
        if let Some(token) = self.token.as_deref() {
            url.push_str("&auth=");
            url.push_str(token);
        }
        url
    }

    /// Send a GET request for `endpoint` and return the body.
    pub async fn get(&self, endpoint: &str) -> Result<String> {
        let url = self.make_url(endpoint);
        // reqwest puts the url, and with it the token, into its messages
        let transport = |source: reqwest::Error| Error::Transport {
            endpoint: endpoint.to_string(),
            source: source.without_url(),
        };

        let now = Instant::now();
        let resp = self.client.get(&url).send().await.map_err(transport)?;
        let status = resp.status();

        if !status.is_success() {
            log::warn!("{} returned {} after {}ms", endpoint, status, elapsed_ms(&now));
            return Err(Error::Http {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        let text = resp.text().await.map_err(transport)?;

        log::info!(
            "{} request to {} ({}) took {}ms",
            endpoint,
            self.host,
            status.as_u16(),
            elapsed_ms(&now),
        );
        log::debug!("{} response: {}", endpoint, text);

        Ok(text)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let text = self.get(endpoint).await?;
        decode(endpoint, &text)
    }

    /// Backend type (`PHP` or `FTL`).
    pub async fn api_type(&self) -> Result<model::ApiType> {
        self.get_json("type").await
    }

    pub async fn version(&self) -> Result<model::ApiVersion> {
        self.get_json("version").await
    }

    /// Statistics of the current day as numbers.
    pub async fn summary_raw(&self) -> Result<model::SummaryRaw> {
        self.get_json("summaryRaw").await
    }

    /// Statistics of the current day as formatted strings.
    pub async fn summary(&self) -> Result<model::Summary> {
        self.get_json("summary").await
    }

    /// Queries and blocked ads per 10 minutes.
    pub async fn time_data(&self) -> Result<model::TimeData> {
        self.get_json("overTimeData10mins").await
    }

    /// The `n` most queried and most blocked domains.
    pub async fn top_items(&self, n: u32) -> Result<model::TopItems> {
        self.get_json(&format!("topItems={}", n)).await
    }

    /// The `n` clients with the most queries.
    pub async fn top_clients(&self, n: u32) -> Result<model::TopClients> {
        self.get_json(&format!("topClients={}", n)).await
    }

    pub async fn forward_destinations(&self) -> Result<model::ForwardDestinations> {
        self.get_json("getForwardDestinations").await
    }

    pub async fn query_types(&self) -> Result<model::QueryTypes> {
        self.get_json("getQueryTypes").await
    }

    /// Every query of the current day, in the order the server returns them.
    pub async fn queries(&self) -> Result<Vec<model::QueryEntry>> {
        const ENDPOINT: &str = "getAllQueries";

        let queries: model::Queries = self.get_json(ENDPOINT).await?;
        queries
            .data
            .into_iter()
            .map(model::QueryEntry::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|source| Error::Parse {
                endpoint: ENDPOINT.to_string(),
                source,
            })
    }

    pub async fn enable(&self) -> Result<()> {
        self.toggle("enable", "enabled").await
    }

    /// Disable blocking until it is enabled again.
    pub async fn disable(&self) -> Result<()> {
        self.toggle("disable", "disabled").await
    }

    /// Disable blocking, the server enables it again after `seconds`.
    pub async fn disable_for(&self, seconds: u64) -> Result<()> {
        self.toggle(&format!("disable={}", seconds), "disabled").await
    }

    async fn toggle(&self, endpoint: &str, expected: &'static str) -> Result<()> {
        let resp: model::ToggleStatus = self.get_json(endpoint).await?;
        if resp.status != expected {
            return Err(Error::UnexpectedStatus {
                expected,
                actual: resp.status,
            });
        }
        Ok(())
    }

    /// The most recently blocked domain, as plain text.
    pub async fn recent_blocked(&self) -> Result<String> {
        self.get("recentBlocked").await
    }
}
