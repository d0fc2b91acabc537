use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum NoteTag {
    CallRelated,
    General,
    FollowUp,
    Custom,
}

impl NoteTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteTag::CallRelated => "call-related",
            NoteTag::General => "general",
            NoteTag::FollowUp => "follow-up",
            NoteTag::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "call-related" => Some(NoteTag::CallRelated),
            "general" => Some(NoteTag::General),
            "follow-up" => Some(NoteTag::FollowUp),
            "custom" => Some(NoteTag::Custom),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NoteTag::CallRelated => "Call Related",
            NoteTag::General => "General",
            NoteTag::FollowUp => "Follow Up",
            NoteTag::Custom => "Custom",
        }
    }
}

/// A note attached to a lead, optionally tied to one of its calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Note {
    pub id: i64,
    pub lead_id: i64,
    pub call_log_id: Option<i64>,
    pub content: String,
    pub tag: NoteTag,
    pub created_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct CreateNoteRequest {
    pub content: String,
    pub tag: Option<NoteTag>,
    pub created_by: Option<String>,
    pub call_log_id: Option<i64>,
}

/// Fields left out are kept as they are
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct UpdateNoteRequest {
    pub content: Option<String>,
    pub tag: Option<NoteTag>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export)]
pub struct ListNotesRequest {
    pub search: Option<String>,
    pub tag: Option<NoteTag>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NotesResponse {
    pub notes: Vec<Note>,
    pub total_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_wire_names() {
        assert_eq!(
            serde_json::to_string(&NoteTag::CallRelated).unwrap(),
            "\"call-related\""
        );
        assert_eq!(NoteTag::parse("follow-up"), Some(NoteTag::FollowUp));
        assert_eq!(NoteTag::FollowUp.label(), "Follow Up");
        assert_eq!(NoteTag::parse("misc"), None);
    }
}
