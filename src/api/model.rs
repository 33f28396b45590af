use std::collections::HashMap;
use std::fmt::Display;
use std::num::ParseIntError;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;

use super::de::map_or_empty_list;

/// Label (domain or client) to number of occurrences.
pub type FrequencyTable = HashMap<String, u64>;

/// Category to share in percent.
pub type Breakdown = HashMap<String, f64>;

/// Backend type, `PHP` or `FTL`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiType {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiVersion {
    pub version: f64,
}

/// Statistics for the current day as plain numbers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SummaryRaw {
    pub ads_blocked_today: u64,
    pub ads_percentage_today: f64,
    pub clients_ever_seen: u64,
    pub dns_queries_today: u64,
    pub domains_being_blocked: u64,
    pub queries_cached: u64,
    pub queries_forwarded: u64,
    pub status: String,
    pub unique_clients: u64,
    pub unique_domains: u64,
}

/// Same as [`SummaryRaw`] but every field is formatted by the server,
/// e.g. `"1,234"` or `"12.5"`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub ads_blocked_today: String,
    pub ads_percentage_today: String,
    pub clients_ever_seen: String,
    pub dns_queries_today: String,
    pub domains_being_blocked: String,
    pub queries_cached: String,
    pub queries_forwarded: String,
    pub status: String,
    pub unique_clients: String,
    pub unique_domains: String,
}

/// Number of queries and blocked ads per 10 minute slot.
///
/// Keys are unix timestamps of the start of each slot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimeData {
    #[serde(deserialize_with = "map_or_empty_list")]
    pub ads_over_time: FrequencyTable,
    #[serde(deserialize_with = "map_or_empty_list")]
    pub domains_over_time: FrequencyTable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBucket {
    pub start: DateTime<Utc>,
    pub domains: u64,
    pub ads: u64,
}

impl TimeData {
    /// Join both series into buckets ordered by time.
    ///
    /// A slot present in only one series counts zero in the other.
    pub fn buckets(&self) -> Result<Vec<TimeBucket>, ParseError> {
        let mut buckets: HashMap<i64, TimeBucket> = HashMap::new();

        for (key, &domains) in &self.domains_over_time {
            let start = parse_timestamp(key)?;
            buckets
                .entry(start.timestamp())
                .or_insert_with(|| TimeBucket::empty(start))
                .domains = domains;
        }
        for (key, &ads) in &self.ads_over_time {
            let start = parse_timestamp(key)?;
            buckets
                .entry(start.timestamp())
                .or_insert_with(|| TimeBucket::empty(start))
                .ads = ads;
        }

        let mut buckets: Vec<TimeBucket> = buckets.into_values().collect();
        buckets.sort_by_key(|b| b.start);
        Ok(buckets)
    }
}

impl TimeBucket {
    fn empty(start: DateTime<Utc>) -> TimeBucket {
        TimeBucket {
            start,
            domains: 0,
            ads: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TopItems {
    #[serde(rename = "top_queries", deserialize_with = "map_or_empty_list")]
    pub queries: FrequencyTable,
    #[serde(rename = "top_ads", deserialize_with = "map_or_empty_list")]
    pub blocked: FrequencyTable,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TopClients {
    #[serde(rename = "top_sources", deserialize_with = "map_or_empty_list")]
    pub clients: FrequencyTable,
}

/// Upstream servers and the share of queries forwarded to them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForwardDestinations {
    #[serde(rename = "forward_destinations", deserialize_with = "map_or_empty_list")]
    pub destinations: Breakdown,
}

/// Query types (`A (IPv4)`, `AAAA (IPv6)`, ...) and their share of all queries.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryTypes {
    #[serde(rename = "querytypes", deserialize_with = "map_or_empty_list")]
    pub types: Breakdown,
}

/// The whole `getAllQueries` response.
///
/// Each row is
///
/// - `[0]`: Unix timestamp (`"1500000000"`)
/// - `[1]`: Query type (`"A"`, `"AAAA"`, ...)
/// - `[2]`: Requested domain
/// - `[3]`: Requesting client
/// - `[4]`: Answer type, see [`Answer`]
///
/// Newer servers append more columns, those are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Queries {
    pub data: Vec<Vec<String>>,
}

/// How the server answered a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Answer {
    /// `1`
    Gravity,
    /// `2`
    Forwarded,
    /// `3`
    Cached,
    /// `4`
    Wildcard,
    Other(u32),
}

impl Answer {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Answer::Gravity | Answer::Wildcard)
    }
}

impl From<u32> for Answer {
    fn from(code: u32) -> Self {
        match code {
            1 => Answer::Gravity,
            2 => Answer::Forwarded,
            3 => Answer::Cached,
            4 => Answer::Wildcard,
            code => Answer::Other(code),
        }
    }
}

impl Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Answer::Gravity => f.write_str("blocked (gravity)"),
            Answer::Forwarded => f.write_str("forwarded"),
            Answer::Cached => f.write_str("cached"),
            Answer::Wildcard => f.write_str("blocked (wildcard)"),
            Answer::Other(code) => write!(f, "status {}", code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryEntry {
    pub timestamp: DateTime<Utc>,
    pub query_type: String,
    pub domain: String,
    pub client: String,
    pub answer: Answer,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing column `{0}`")]
    MissingColumn(&'static str),
    #[error("invalid number `{value}`: {source}")]
    Number {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("timestamp {0} out of range")]
    Timestamp(i64),
}

fn parse_number<T>(value: &str) -> Result<T, ParseError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    value.trim().parse().map_err(|source| ParseError::Number {
        value: value.to_string(),
        source,
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ParseError> {
    let secs = parse_number::<i64>(value)?;
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or(ParseError::Timestamp(secs))
}

impl TryFrom<Vec<String>> for QueryEntry {
    type Error = ParseError;
    fn try_from(row: Vec<String>) -> Result<Self, Self::Error> {
        let mut columns = row.into_iter();
        let mut next = |name: &'static str| columns.next().ok_or(ParseError::MissingColumn(name));

        let timestamp = next("timestamp")?;
        let query_type = next("query type")?;
        let domain = next("domain")?;
        let client = next("client")?;
        let answer = next("answer")?;

        Ok(QueryEntry {
            timestamp: parse_timestamp(&timestamp)?,
            query_type,
            domain,
            client,
            answer: Answer::from(parse_number::<u32>(&answer)?),
        })
    }
}

/// Reply to `enable` and `disable`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToggleStatus {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{
        Answer, ForwardDestinations, Queries, QueryEntry, QueryTypes, Summary, SummaryRaw,
        TimeData, ToggleStatus, TopClients, TopItems,
    };
    use crate::api::{decode, ParseError};

    const SUMMARY_RAW: &str = r#"{
        "domains_being_blocked": 120304,
        "dns_queries_today": 40,
        "ads_blocked_today": 5,
        "ads_percentage_today": 12.5,
        "unique_domains": 17,
        "queries_forwarded": 20,
        "queries_cached": 15,
        "clients_ever_seen": 4,
        "unique_clients": 3,
        "status": "enabled",
        "gravity_last_updated": {"file_exists": true, "absolute": 1500000000}
    }"#;

    #[test]
    fn summary_raw() {
        let summary: SummaryRaw = decode("summaryRaw", SUMMARY_RAW).unwrap();

        assert_eq!(summary.ads_blocked_today, 5);
        assert_eq!(summary.ads_percentage_today, 12.5);
        assert_eq!(summary.dns_queries_today, 40);
        assert_eq!(summary.domains_being_blocked, 120304);
        assert_eq!(summary.status, "enabled");
        assert_eq!(summary.unique_clients, 3);
    }

    #[test]
    fn summary_raw_missing_fields_are_zero() {
        let summary: SummaryRaw = decode("summaryRaw", r#"{"status": "disabled"}"#).unwrap();

        assert_eq!(summary.ads_blocked_today, 0);
        assert_eq!(summary.ads_percentage_today, 0.0);
        assert_eq!(summary.status, "disabled");
    }

    #[test]
    fn summary_raw_wrong_type() {
        let err = decode::<SummaryRaw>("summaryRaw", r#"{"ads_blocked_today": "5"}"#).unwrap_err();
        assert!(matches!(err, crate::Error::Decode { .. }));
    }

    #[test]
    fn decode_is_deterministic() {
        let a: SummaryRaw = decode("summaryRaw", SUMMARY_RAW).unwrap();
        let b: SummaryRaw = decode("summaryRaw", SUMMARY_RAW).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn list_instead_of_object() {
        fn is_decode_error<T: std::fmt::Debug>(result: crate::Result<T>) -> bool {
            matches!(result, Err(crate::Error::Decode { .. }))
        }

        assert!(is_decode_error(decode::<TopItems>("topItems=10", "[]")));
        assert!(is_decode_error(decode::<TopClients>("topClients=10", "[]")));
        assert!(is_decode_error(decode::<SummaryRaw>("summaryRaw", "[]")));
        assert!(is_decode_error(decode::<Summary>("summary", "[]")));
        assert!(is_decode_error(decode::<Queries>("getAllQueries", "[]")));
        assert!(is_decode_error(decode::<QueryTypes>("getQueryTypes", "[]")));
        assert!(is_decode_error(decode::<ForwardDestinations>(
            "getForwardDestinations",
            "[]"
        )));
        assert!(is_decode_error(decode::<ToggleStatus>("enable", "[]")));
        assert!(is_decode_error(decode::<TimeData>("overTimeData10mins", "42")));
    }

    #[test]
    fn malformed_json() {
        let err = decode::<SummaryRaw>("summaryRaw", r#"{"ads_blocked_today": "#).unwrap_err();
        assert!(matches!(err, crate::Error::Decode { .. }));
    }

    #[test]
    fn top_items_empty_list_is_empty_map() {
        let top: TopItems = decode("topItems=10", r#"{"top_queries": [], "top_ads": []}"#).unwrap();

        assert!(top.queries.is_empty());
        assert!(top.blocked.is_empty());
    }

    #[test]
    fn missing_maps_are_empty() {
        let top: TopItems = decode("topItems=10", r#"{"top_queries": {"example.com": 1}}"#).unwrap();
        assert_eq!(top.queries.len(), 1);
        assert!(top.blocked.is_empty());

        let time: TimeData = decode("overTimeData10mins", "{}").unwrap();
        assert_eq!(time, TimeData::default());

        let clients: TopClients = decode("topClients=10", "{}").unwrap();
        assert!(clients.clients.is_empty());

        let fd: ForwardDestinations = decode("getForwardDestinations", "{}").unwrap();
        assert!(fd.destinations.is_empty());

        let qt: QueryTypes = decode("getQueryTypes", "{}").unwrap();
        assert!(qt.types.is_empty());
    }

    #[test]
    fn top_items_non_empty_list() {
        let err = decode::<TopItems>("topItems=10", r#"{"top_queries": [1, 2]}"#).unwrap_err();
        assert!(matches!(err, crate::Error::Decode { .. }));
    }

    #[test]
    fn top_items() {
        let top: TopItems = decode(
            "topItems=10",
            r#"{"top_queries": {"example.com": 12, "pi.hole": 3}, "top_ads": {"ads.example.com": 7}}"#,
        )
        .unwrap();

        assert_eq!(top.queries.get("example.com"), Some(&12));
        assert_eq!(top.queries.get("pi.hole"), Some(&3));
        assert_eq!(top.blocked.get("ads.example.com"), Some(&7));
    }

    #[test]
    fn time_data_buckets() {
        let data: TimeData = decode(
            "overTimeData10mins",
            r#"{
                "domains_over_time": {"1500000600": 8, "1500000000": 10},
                "ads_over_time": {"1500000000": 2, "1500001200": 1}
            }"#,
        )
        .unwrap();

        let buckets = data.buckets().unwrap();
        let rows: Vec<_> = buckets
            .iter()
            .map(|b| (b.start.timestamp(), b.domains, b.ads))
            .collect();

        assert_eq!(
            rows,
            [(1500000000, 10, 2), (1500000600, 8, 0), (1500001200, 0, 1)]
        );
    }

    #[test]
    fn time_data_invalid_key() {
        let data: TimeData =
            decode("overTimeData10mins", r#"{"domains_over_time": {"noon": 1}}"#).unwrap();
        assert!(matches!(data.buckets(), Err(ParseError::Number { .. })));
    }

    #[test]
    fn query_entry() {
        let queries: Queries = decode(
            "getAllQueries",
            r#"{"data": [
                ["1500000000", "A", "ads.example.com", "192.168.1.2", "1"],
                ["1500000060", "AAAA", "example.com", "192.168.1.3", "3", "extra"]
            ]}"#,
        )
        .unwrap();

        let entries = queries
            .data
            .into_iter()
            .map(QueryEntry::try_from)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(
            entries[0],
            QueryEntry {
                timestamp: Utc.timestamp_opt(1500000000, 0).single().unwrap(),
                query_type: "A".to_string(),
                domain: "ads.example.com".to_string(),
                client: "192.168.1.2".to_string(),
                answer: Answer::Gravity,
            }
        );
        assert_eq!(entries[1].answer, Answer::Cached);
        assert!(entries[0].answer.is_blocked());
        assert!(!entries[1].answer.is_blocked());
    }

    #[test]
    fn query_entry_too_short() {
        let row = vec!["1500000000".to_string(), "A".to_string()];
        assert!(matches!(
            QueryEntry::try_from(row),
            Err(ParseError::MissingColumn("domain"))
        ));
    }

    #[test]
    fn answer_codes() {
        assert_eq!(Answer::from(2), Answer::Forwarded);
        assert_eq!(Answer::from(4), Answer::Wildcard);
        assert_eq!(Answer::from(9), Answer::Other(9));
        assert_eq!(Answer::Other(9).to_string(), "status 9");
    }
}
