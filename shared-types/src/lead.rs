use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Pipeline stage of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Proposal,
    ClosedWon,
    ClosedLost,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Proposal => "proposal",
            LeadStatus::ClosedWon => "closed_won",
            LeadStatus::ClosedLost => "closed_lost",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(LeadStatus::New),
            "contacted" => Some(LeadStatus::Contacted),
            "qualified" => Some(LeadStatus::Qualified),
            "proposal" => Some(LeadStatus::Proposal),
            "closed_won" => Some(LeadStatus::ClosedWon),
            "closed_lost" => Some(LeadStatus::ClosedLost),
            _ => None,
        }
    }
}

/// Lead priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LeadPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl LeadPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadPriority::Low => "low",
            LeadPriority::Medium => "medium",
            LeadPriority::High => "high",
            LeadPriority::Urgent => "urgent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(LeadPriority::Low),
            "medium" => Some(LeadPriority::Medium),
            "high" => Some(LeadPriority::High),
            "urgent" => Some(LeadPriority::Urgent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub source: String,
    pub status: LeadStatus,
    pub priority: LeadPriority,
    pub value: Option<f64>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_contacted_at: Option<i64>,
    pub next_follow_up_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct CreateLeadRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub source: Option<String>,
    pub status: Option<LeadStatus>,
    pub priority: Option<LeadPriority>,
    pub value: Option<f64>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update; fields left out are kept as they are. Moving a lead
/// through the pipeline is an update of `status`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct UpdateLeadRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<LeadStatus>,
    pub priority: Option<LeadPriority>,
    pub value: Option<f64>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub next_follow_up_at: Option<i64>,
}

/// Query parameters for the lead list
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export)]
pub struct ListLeadsRequest {
    pub search: Option<String>,
    pub status: Option<LeadStatus>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeadsResponse {
    pub leads: Vec<Lead>,
    /// Matches across the whole list, not just this page
    pub total_count: usize,
}
