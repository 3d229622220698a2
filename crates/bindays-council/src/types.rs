use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Body of `GET /addresses?postcode=…`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressesResponse {
    /// Missing or non-array means the upstream returned something else
    /// entirely (an error page, a rate-limit notice).
    #[serde(default)]
    pub addresses: Option<Vec<AddressRecord>>,
}

/// One candidate property for a postcode.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressRecord {
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub uprn: String,
}

/// Body of `GET /collections?uprn=…&postcode=…`.
///
/// The proxy calls general waste "rubbish" and food waste "food".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionsResponse {
    #[serde(default)]
    pub rubbish: Option<StreamDate>,
    #[serde(default)]
    pub recycling: Option<StreamDate>,
    #[serde(default)]
    pub food: Option<StreamDate>,
}

/// Per-stream date block. `iso` is a `YYYY-MM-DD` string or `"unknown"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamDate {
    #[serde(default)]
    pub iso: Option<Value>,
}

/// Error body the proxy sends alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// UPRNs are 12-digit numbers; some responses send them unquoted.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for uprn, got {other}"
        ))),
    }
}
