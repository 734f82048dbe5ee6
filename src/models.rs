use serde::{Deserialize, Deserializer, Serialize};

/// One row of the `/v1/containers/` response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PingRecord {
    #[serde(rename = "ip")]
    pub address: String,
    #[serde(rename = "ping_time")]
    pub latency_ms: f64,
    #[serde(
        rename = "last_successful",
        default,
        deserialize_with = "empty_as_none"
    )]
    pub last_success_at: Option<String>,
}

impl PingRecord {
    pub fn new(address: &str, latency_ms: f64, last_success_at: Option<&str>) -> PingRecord {
        PingRecord {
            address: address.to_string(),
            latency_ms,
            last_success_at: last_success_at.map(|s| s.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Health {
    pub status: String,
}

impl Health {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
