//! Plain text rendering for the command line.

use std::collections::HashMap;
use std::fmt::Display;

use chrono::TimeZone;

use crate::api::{
    ApiType, ApiVersion, Breakdown, FrequencyTable, QueryEntry, SummaryRaw, TimeBucket,
};
use crate::rank;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn summary(s: &SummaryRaw) -> Vec<String> {
    vec![
        "=== 24h Summary:".to_string(),
        format!("- Status: {}", s.status),
        format!("- Blocked Domains: {}", s.ads_blocked_today),
        format!("- Blocked Percentage: {}%", s.ads_percentage_today),
        format!("- Queries: {}", s.dns_queries_today),
        format!("- Domains Being Blocked: {}", s.domains_being_blocked),
        format!("- Queries Cached: {}", s.queries_cached),
        format!("- Queries Forwarded: {}", s.queries_forwarded),
        format!("- Clients Ever Seen: {}", s.clients_ever_seen),
        format!("- Unique Clients: {}", s.unique_clients),
        format!("- Unique Domains: {}", s.unique_domains),
    ]
}

fn ranked<V>(title: &str, map: &HashMap<String, V>, suffix: &str) -> Vec<String>
where
    V: Copy + PartialOrd + Display,
{
    std::iter::once(title.to_string())
        .chain(
            rank::ranked(map)
                .into_iter()
                .map(|(label, value)| format!("- {} : {}{}", label, value, suffix)),
        )
        .collect()
}

pub fn top_blocked(blocked: &FrequencyTable) -> Vec<String> {
    ranked("=== Blocked domains over last 24h:", blocked, "")
}

pub fn top_queries(queries: &FrequencyTable) -> Vec<String> {
    ranked("=== Queries over last 24h:", queries, "")
}

pub fn top_clients(clients: &FrequencyTable) -> Vec<String> {
    ranked("=== Clients over last 24h:", clients, "")
}

pub fn forward_destinations(destinations: &Breakdown) -> Vec<String> {
    ranked("=== Forward destinations:", destinations, "%")
}

pub fn query_types(types: &Breakdown) -> Vec<String> {
    ranked("=== Query types:", types, "%")
}

pub fn api_type(t: &ApiType) -> String {
    format!("API type: {}", t.kind)
}

pub fn version(v: &ApiVersion) -> String {
    format!("API version: {}", v.version)
}

pub fn recent_blocked(domain: &str) -> String {
    format!("Last blocked: {}", domain.trim())
}

pub fn time_data<Tz>(buckets: &[TimeBucket], tz: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    std::iter::once("=== Queries over time (10 minutes):".to_string())
        .chain(buckets.iter().map(|b| {
            format!(
                "- {} : {} queries, {} blocked",
                b.start.with_timezone(tz).format(TIME_FORMAT),
                b.domains,
                b.ads
            )
        }))
        .collect()
}

pub fn queries<Tz>(entries: &[QueryEntry], tz: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    entries
        .iter()
        .map(|q| {
            format!(
                "{} {:<6} {} {} {}",
                q.timestamp.with_timezone(tz).format(TIME_FORMAT),
                q.query_type,
                q.domain,
                q.client,
                q.answer
            )
        })
        .collect()
}
