use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ContactCategory {
    Lead,
    Customer,
    Prospect,
    Partner,
    Vendor,
    Other,
}

impl ContactCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactCategory::Lead => "lead",
            ContactCategory::Customer => "customer",
            ContactCategory::Prospect => "prospect",
            ContactCategory::Partner => "partner",
            ContactCategory::Vendor => "vendor",
            ContactCategory::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lead" => Some(ContactCategory::Lead),
            "customer" => Some(ContactCategory::Customer),
            "prospect" => Some(ContactCategory::Prospect),
            "partner" => Some(ContactCategory::Partner),
            "vendor" => Some(ContactCategory::Vendor),
            "other" => Some(ContactCategory::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Contact {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub category: ContactCategory,
    pub is_favorite: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_contacted_at: Option<i64>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .next()
            .into_iter()
            .chain(self.last_name.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct CreateContactRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: ContactCategory,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export)]
pub struct ListContactsRequest {
    pub search: Option<String>,
    pub category: Option<ContactCategory>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ContactsResponse {
    pub contacts: Vec<Contact>,
    /// Matches across the whole list, not just this page
    pub total_count: usize,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct FavoriteToggledResponse {
    pub contact: Contact,
    pub message: String,
}
