use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod call_log;
pub mod contact;
pub mod lead;
pub mod note;
pub mod permission;
pub mod settings;

pub use call_log::{
    format_call_duration, CallDirection, CallLog, CallLogsResponse, CallOutcome, CallStatus,
    CallSummary, CreateCallLogRequest, ListCallLogsRequest, MatchConfidence, PhoneMatchRequest,
    PhoneMatchResponse,
};
pub use contact::{
    Contact, ContactCategory, ContactsResponse, CreateContactRequest, FavoriteToggledResponse,
    ListContactsRequest,
};
pub use lead::{
    CreateLeadRequest, Lead, LeadPriority, LeadStatus, LeadsResponse, ListLeadsRequest,
    UpdateLeadRequest,
};
pub use note::{
    CreateNoteRequest, ListNotesRequest, Note, NoteTag, NotesResponse, UpdateNoteRequest,
};
pub use permission::{
    BatchOutcome, GateDecision, PermissionId, PermissionPrompt, PermissionStatus, PromptRemedy,
};
pub use settings::{PermissionPolicy, SettingsResponse};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

/// Dialer suggestions query
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct T9SearchRequest {
    pub digits: String,
    pub limit: Option<usize>,
}
