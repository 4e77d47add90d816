// src/api/models.rs
// Request and response bodies for the relay HTTP API

use serde::{Deserialize, Serialize};

use crate::alerts::history::AlertEntry;
use crate::alerts::ledger::AttackRecord;
use crate::alerts::models::{AttackEvent, BlockEvent, RawTimestamp};
use crate::error::{RelayError, Result};

/// Body of `POST /ddos-alert`. Fields are optional here so that missing
/// values are reported as validation errors rather than decode failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackAlertRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub ip: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<RawTimestamp>,
    pub end_time: Option<RawTimestamp>,
}

/// Body of `POST /ip-blocked`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpBlockedRequest {
    pub ip: Option<String>,
    pub timestamp: Option<RawTimestamp>,
}

fn required_text(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RelayError::Validation(format!("{} is required", field)))
}

fn required_time(value: Option<RawTimestamp>, field: &str) -> Result<RawTimestamp> {
    value
        .filter(|v| !v.is_blank())
        .ok_or_else(|| RelayError::Validation(format!("{} is required", field)))
}

impl TryFrom<AttackAlertRequest> for AttackEvent {
    type Error = RelayError;

    /// `start` needs ip, location and startTime; `end` needs only ip and endTime
    fn try_from(req: AttackAlertRequest) -> Result<Self> {
        let kind = required_text(req.kind, "type")?;
        let ip = required_text(req.ip, "ip")?;

        match kind.as_str() {
            "start" => {
                let location = required_text(req.location, "location")?;
                let start_time = required_time(req.start_time, "startTime")?.parse("startTime")?;
                Ok(AttackEvent::Start {
                    ip,
                    location,
                    start_time,
                })
            }
            "end" => {
                let end_time = required_time(req.end_time, "endTime")?.parse("endTime")?;
                Ok(AttackEvent::End { ip, end_time })
            }
            other => Err(RelayError::Validation(format!(
                "Invalid type '{}'. Use \"start\" or \"end\".",
                other
            ))),
        }
    }
}

impl TryFrom<IpBlockedRequest> for BlockEvent {
    type Error = RelayError;

    fn try_from(req: IpBlockedRequest) -> Result<Self> {
        let ip = required_text(req.ip, "ip")?;
        let timestamp = required_time(req.timestamp, "timestamp")?.parse("timestamp")?;
        Ok(BlockEvent { ip, timestamp })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OngoingAttacksResponse {
    pub attacks: Vec<AttackRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentAlertsResponse {
    pub alerts: Vec<AlertEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockedIpsResponse {
    #[serde(rename = "blockedIPs")]
    pub blocked_ips: Vec<String>,
}
