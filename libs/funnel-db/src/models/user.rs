use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Funnel progress of a user. Stored as the short wire strings
/// "mes" / "reg" / "dep" that the postback integrations send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunnelStatus {
    #[serde(rename = "mes")]
    Messaged,
    #[serde(rename = "reg")]
    Registered,
    #[serde(rename = "dep")]
    Deposited,
}

impl FunnelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStatus::Messaged => "mes",
            FunnelStatus::Registered => "reg",
            FunnelStatus::Deposited => "dep",
        }
    }
}

impl fmt::Display for FunnelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown funnel status: {0}")]
pub struct ParseStatusError(String);

impl FromStr for FunnelStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mes" => Ok(FunnelStatus::Messaged),
            "reg" => Ok(FunnelStatus::Registered),
            "dep" => Ok(FunnelStatus::Deposited),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub username: String,
    pub click_id: String,
    pub link: String,
    /// Completed quiz runs, one summary line per run.
    pub complete: Vec<String>,
    pub status: FunnelStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_wire_strings() {
        for s in [
            FunnelStatus::Messaged,
            FunnelStatus::Registered,
            FunnelStatus::Deposited,
        ] {
            assert_eq!(s.as_str().parse::<FunnelStatus>().unwrap(), s);
        }
    }

    #[test]
    fn bogus_status_is_rejected() {
        assert!("bogus".parse::<FunnelStatus>().is_err());
        assert!("".parse::<FunnelStatus>().is_err());
        assert!("MES".parse::<FunnelStatus>().is_err());
    }
}
