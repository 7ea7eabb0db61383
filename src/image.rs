use chrono::{DateTime, Utc};

// Images come from a service that returns a random picture per request,
// a fresh query string keeps browsers from reusing the last one
pub fn cache_busted_url(base: &str, at: DateTime<Utc>) -> String {
    format!("{}?{}", base, at.timestamp_millis())
}
