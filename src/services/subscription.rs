use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

use crate::constants::traffic::BYTES_PER_GB;
use crate::db::{Account, Node};

/// Whether an account may fetch its subscription feed at `now`.
#[must_use]
pub fn is_subscription_valid(account: &Account, now: DateTime<Utc>) -> bool {
    account.is_active && !account.is_expired_at(now)
}

#[allow(clippy::cast_precision_loss)]
fn as_gb(bytes: i64) -> f64 {
    bytes as f64 / BYTES_PER_GB as f64
}

/// Plain-text feed: an account summary followed by one
/// `protocol://address:port#name` line per node.
#[must_use]
pub fn render_subscription(account: &Account, nodes: &[Node]) -> String {
    let mut out = String::from("# wboard subscription\n");

    let expires = account.due_date.map_or_else(
        || "never".to_string(),
        |due| due.to_rfc3339_opts(SecondsFormat::Secs, true),
    );

    let _ = writeln!(out, "user: {}", account.username);
    let _ = writeln!(out, "traffic used: {:.2} GB", as_gb(account.traffic_used));
    let _ = writeln!(out, "traffic limit: {:.2} GB", as_gb(account.traffic_limit));
    let _ = writeln!(out, "expires: {expires}");
    out.push('\n');

    if nodes.is_empty() {
        out.push_str("# no nodes available\n");
        return out;
    }

    for node in nodes {
        let name: String = url::form_urlencoded::byte_serialize(node.name.as_bytes()).collect();
        let _ = writeln!(
            out,
            "{}://{}:{}#{}",
            node.protocol, node.address, node.port, name
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn account() -> Account {
        Account {
            id: 7,
            username: "alice".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            uuid: "5b0c6f7e-3c1a-4f59-9a3e-0d5b2b6d8f11".to_string(),
            traffic_limit: 50 * BYTES_PER_GB,
            traffic_used: BYTES_PER_GB / 2,
            due_date: None,
            is_admin: false,
            is_active: true,
        }
    }

    fn node(id: i32, name: &str) -> Node {
        Node {
            id,
            name: name.to_string(),
            address: "203.0.113.10".to_string(),
            port: 443,
            protocol: "vless".to_string(),
            config_details: None,
            is_active: true,
        }
    }

    #[test]
    fn renders_summary_and_nodes() {
        let feed = render_subscription(&account(), &[node(1, "Tokyo 1"), node(2, "Osaka")]);

        assert!(feed.contains("user: alice\n"));
        assert!(feed.contains("traffic used: 0.50 GB\n"));
        assert!(feed.contains("traffic limit: 50.00 GB\n"));
        assert!(feed.contains("expires: never\n"));
        assert!(feed.contains("vless://203.0.113.10:443#Tokyo+1\n"));
        assert!(feed.contains("vless://203.0.113.10:443#Osaka\n"));
    }

    #[test]
    fn renders_placeholder_without_nodes() {
        let feed = render_subscription(&account(), &[]);
        assert!(feed.ends_with("# no nodes available\n"));
    }

    #[test]
    fn validity_follows_active_flag_and_due_date() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut acc = account();
        assert!(is_subscription_valid(&acc, now));

        acc.due_date = Some(now + Duration::days(1));
        assert!(is_subscription_valid(&acc, now));

        acc.due_date = Some(now - Duration::seconds(1));
        assert!(!is_subscription_valid(&acc, now));

        acc.due_date = None;
        acc.is_active = false;
        assert!(!is_subscription_valid(&acc, now));
    }
}
