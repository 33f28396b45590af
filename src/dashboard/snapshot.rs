use crate::api::{self, ApiType, ApiVersion, Client, Summary, TopClients, TopItems};

/// Fetched once when the dashboard starts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    pub version: ApiVersion,
    pub kind: ApiType,
}

impl Header {
    pub async fn fetch(client: &Client) -> api::Result<Header> {
        Ok(Header {
            version: client.version().await?,
            kind: client.api_type().await?,
        })
    }
}

/// Everything shown in the panels, fetched on every refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub recent_blocked: String,
    pub summary: Summary,
    pub top: TopItems,
    pub clients: TopClients,
}

impl Snapshot {
    /// One request after the other, the first error aborts the refresh.
    pub async fn fetch(client: &Client, count: u32) -> api::Result<Snapshot> {
        Ok(Snapshot {
            recent_blocked: client.recent_blocked().await?,
            summary: client.summary().await?,
            top: client.top_items(count).await?,
            clients: client.top_clients(count).await?,
        })
    }
}
