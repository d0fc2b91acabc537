use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Lead;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CallDirection {
    Outbound,
    Inbound,
    Missed,
}

impl CallDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallDirection::Outbound => "outbound",
            CallDirection::Inbound => "inbound",
            CallDirection::Missed => "missed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "outbound" => Some(CallDirection::Outbound),
            "inbound" => Some(CallDirection::Inbound),
            "missed" => Some(CallDirection::Missed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Initiated,
    Ringing,
    Connected,
    Ended,
    Failed,
    Busy,
    NoAnswer,
    Declined,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Initiated => "initiated",
            CallStatus::Ringing => "ringing",
            CallStatus::Connected => "connected",
            CallStatus::Ended => "ended",
            CallStatus::Failed => "failed",
            CallStatus::Busy => "busy",
            CallStatus::NoAnswer => "no_answer",
            CallStatus::Declined => "declined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "initiated" => Some(CallStatus::Initiated),
            "ringing" => Some(CallStatus::Ringing),
            "connected" => Some(CallStatus::Connected),
            "ended" => Some(CallStatus::Ended),
            "failed" => Some(CallStatus::Failed),
            "busy" => Some(CallStatus::Busy),
            "no_answer" => Some(CallStatus::NoAnswer),
            "declined" => Some(CallStatus::Declined),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    Successful,
    Voicemail,
    Busy,
    NoAnswer,
    WrongNumber,
    CallbackRequested,
    MeetingScheduled,
    ProposalRequested,
    NotInterested,
    FollowUpNeeded,
}

impl CallOutcome {
    /// Outcomes counted as a successful call in the history summary
    pub fn is_successful(&self) -> bool {
        matches!(
            self,
            CallOutcome::Successful | CallOutcome::MeetingScheduled | CallOutcome::ProposalRequested
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::Successful => "successful",
            CallOutcome::Voicemail => "voicemail",
            CallOutcome::Busy => "busy",
            CallOutcome::NoAnswer => "no_answer",
            CallOutcome::WrongNumber => "wrong_number",
            CallOutcome::CallbackRequested => "callback_requested",
            CallOutcome::MeetingScheduled => "meeting_scheduled",
            CallOutcome::ProposalRequested => "proposal_requested",
            CallOutcome::NotInterested => "not_interested",
            CallOutcome::FollowUpNeeded => "follow_up_needed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "successful" => Some(CallOutcome::Successful),
            "voicemail" => Some(CallOutcome::Voicemail),
            "busy" => Some(CallOutcome::Busy),
            "no_answer" => Some(CallOutcome::NoAnswer),
            "wrong_number" => Some(CallOutcome::WrongNumber),
            "callback_requested" => Some(CallOutcome::CallbackRequested),
            "meeting_scheduled" => Some(CallOutcome::MeetingScheduled),
            "proposal_requested" => Some(CallOutcome::ProposalRequested),
            "not_interested" => Some(CallOutcome::NotInterested),
            "follow_up_needed" => Some(CallOutcome::FollowUpNeeded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CallLog {
    pub id: i64,
    pub lead_id: Option<i64>,
    pub phone_number: String,
    pub contact_name: Option<String>,
    pub direction: CallDirection,
    pub status: CallStatus,
    pub started_at: i64,
    pub ended_at: Option<i64>,
    /// Seconds
    pub duration: i64,
    pub notes: Option<String>,
    pub outcome: Option<CallOutcome>,
    pub follow_up_required: bool,
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct CreateCallLogRequest {
    pub lead_id: Option<i64>,
    pub phone_number: String,
    pub contact_name: Option<String>,
    pub direction: CallDirection,
    pub status: CallStatus,
    pub started_at: i64,
    pub ended_at: Option<i64>,
    pub duration: i64,
    pub notes: Option<String>,
    pub outcome: Option<CallOutcome>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export)]
pub struct ListCallLogsRequest {
    /// Restricts the history to one lead's calls
    pub lead_id: Option<i64>,
    pub search: Option<String>,
    pub direction: Option<CallDirection>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Aggregate figures shown above the call history list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CallSummary {
    pub total_calls: usize,
    pub successful_calls: usize,
    pub total_duration: i64,
    pub average_duration: i64,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CallLogsResponse {
    pub call_logs: Vec<CallLog>,
    pub summary: CallSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfidence {
    None,
    Exact,
    Partial,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct PhoneMatchRequest {
    pub phone: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct PhoneMatchResponse {
    pub phone_number: String,
    pub normalized_number: String,
    pub matched_leads: Vec<Lead>,
    pub confidence: MatchConfidence,
    pub best_match: Option<Lead>,
}

/// Formats a call duration as `42s`, `3:07` or `1:02:03`.
pub fn format_call_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}:{:02}", seconds / 60, seconds % 60)
    } else {
        format!(
            "{}:{:02}:{:02}",
            seconds / 3600,
            (seconds % 3600) / 60,
            seconds % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_call_duration() {
        assert_eq!(format_call_duration(42), "42s");
        assert_eq!(format_call_duration(187), "3:07");
        assert_eq!(format_call_duration(3723), "1:02:03");
    }

    #[test]
    fn test_direction_round_trips_through_str() {
        for direction in [
            CallDirection::Outbound,
            CallDirection::Inbound,
            CallDirection::Missed,
        ] {
            assert_eq!(CallDirection::parse(direction.as_str()), Some(direction));
        }
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&CallOutcome::CallbackRequested).unwrap();
        assert_eq!(json, "\"callback_requested\"");
    }
}
