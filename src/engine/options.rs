use crate::engine::SessionEngineOptions;
use serde_json::Value;
use time::Duration;

/// Options understood by the memcached engine.
///
/// Parsed leniently: a value of the wrong type is ignored as if the key were
/// absent, and unknown keys are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemcachedOptions {
    pub servers: Option<Vec<String>>,
    pub prefix: Option<String>,
    pub strict: Option<bool>,
    pub max_age: Option<Duration>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: Option<bool>,
    pub http_only: Option<bool>,
}

impl MemcachedOptions {
    pub fn from_options(options: &SessionEngineOptions) -> Self {
        let string = |key: &str| options.get(key).and_then(Value::as_str).map(str::to_string);
        let boolean = |key: &str| options.get(key).and_then(Value::as_bool);
        MemcachedOptions {
            servers: options.get("servers").and_then(parse_servers),
            prefix: string("prefix"),
            strict: boolean("strict"),
            max_age: options
                .get("max_age")
                .and_then(Value::as_i64)
                .filter(|seconds| *seconds > 0)
                .map(Duration::seconds),
            path: string("path"),
            domain: string("domain"),
            secure: boolean("secure"),
            http_only: boolean("http_only"),
        }
    }
}

/// Accepts `"h1:p1,h2:p2"` or `["h1:p1", "h2:p2"]`. An empty list counts as
/// no servers.
fn parse_servers(value: &Value) -> Option<Vec<String>> {
    let servers: Vec<String> = match value {
        Value::String(servers) => servers
            .split(',')
            .map(str::trim)
            .filter(|server| !server.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(servers) => servers
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|server| !server.is_empty())
            .map(str::to_string)
            .collect(),
        _ => return None,
    };
    Some(servers).filter(|servers| !servers.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: Value) -> SessionEngineOptions {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn comma_list_matches_array() {
        let csv = MemcachedOptions::from_options(&options(json!({
            "servers": "192.168.1.1:11211,192.168.1.2:11211"
        })));
        let list = MemcachedOptions::from_options(&options(json!({
            "servers": ["192.168.1.1:11211", "192.168.1.2:11211"]
        })));
        assert_eq!(csv.servers, list.servers);
        assert_eq!(
            csv.servers.unwrap(),
            vec!["192.168.1.1:11211".to_string(), "192.168.1.2:11211".to_string()]
        );
    }

    #[test]
    fn single_server_string() {
        let parsed = MemcachedOptions::from_options(&options(json!({"servers": "10.0.0.5:11211"})));
        assert_eq!(parsed.servers, Some(vec!["10.0.0.5:11211".to_string()]));
    }

    #[test]
    fn wrong_types_are_ignored() {
        let parsed = MemcachedOptions::from_options(&options(json!({
            "servers": 11211,
            "prefix": 42,
            "strict": "yes",
            "max_age": "1h",
            "unknown": true,
        })));
        assert_eq!(parsed, MemcachedOptions::default());
    }

    #[test]
    fn cookie_and_policy_keys() {
        let parsed = MemcachedOptions::from_options(&options(json!({
            "prefix": "app:",
            "strict": true,
            "max_age": 3600,
            "path": "/app",
            "domain": "example.com",
            "secure": false,
            "http_only": false,
        })));
        assert_eq!(parsed.prefix.as_deref(), Some("app:"));
        assert_eq!(parsed.strict, Some(true));
        assert_eq!(parsed.max_age, Some(Duration::hours(1)));
        assert_eq!(parsed.path.as_deref(), Some("/app"));
        assert_eq!(parsed.domain.as_deref(), Some("example.com"));
        assert_eq!(parsed.secure, Some(false));
        assert_eq!(parsed.http_only, Some(false));
    }

    #[test]
    fn empty_server_lists_count_as_missing() {
        for servers in [json!(""), json!(" , "), json!([]), json!(["", " "])] {
            let parsed = MemcachedOptions::from_options(&options(json!({"servers": servers})));
            assert_eq!(parsed.servers, None);
        }
    }

    #[test]
    fn non_positive_max_age_is_ignored() {
        for max_age in [0, -5] {
            let parsed = MemcachedOptions::from_options(&options(json!({"max_age": max_age})));
            assert_eq!(parsed.max_age, None);
        }
        let parsed = MemcachedOptions::from_options(&options(json!({"max_age": 3_000_000_000i64})));
        assert_eq!(parsed.max_age, Some(Duration::seconds(3_000_000_000)));
    }
}
