//! Wire shape of a ticket and the fold that spreads per-entry custom fields
//! across the entries of a submission.
//!
//! The backend only accepts custom values (type, category, technical notes,
//! mail routing) attached to an entry. Each entry object carries the values
//! that changed since the previous entry object, so a bulk submission never
//! repeats an unchanged value.

use std::collections::{BTreeMap, HashMap};

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::domain::schema::{Category, TypeField};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketPayload {
    #[serde(rename = "Workspace")]
    pub workspace: u32,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Username", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "Priority")]
    pub priority: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Assignees")]
    pub assignees: Vec<String>,
    #[serde(rename = "PermanentCCs")]
    pub permanent_ccs: Vec<String>,
    #[serde(rename = "OneTimeCCs")]
    pub one_time_ccs: Vec<String>,
    #[serde(rename = "CI Links", skip_serializing_if = "Vec::is_empty")]
    pub ci_links: Vec<CiLink>,
    #[serde(rename = "Ticket Links", skip_serializing_if = "BTreeMap::is_empty")]
    pub ticket_links: BTreeMap<u32, Vec<String>>,
    #[serde(rename = "Entries")]
    pub entries: Vec<EntryPayload>,
}

/// Reference to a configuration item in the backend's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CiLink {
    #[serde(rename = "Type")]
    pub types: Vec<String>,
    #[serde(rename = "Name")]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryPayload {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Type of Ticket", skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<String>,
    #[serde(rename = "Change Type", skip_serializing_if = "Option::is_none")]
    pub change_type: Option<String>,
    #[serde(rename = "Category", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "Technical Notes", skip_serializing_if = "Option::is_none")]
    pub technical_notes: Option<String>,
    #[serde(rename = "SendMail", skip_serializing_if = "Option::is_none")]
    pub send_mail: Option<EmailRouting>,
}

impl EntryPayload {
    fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            ticket_type: None,
            change_type: None,
            category: None,
            technical_notes: None,
            send_mail: None,
        }
    }

    pub fn has_custom_fields(&self) -> bool {
        self.ticket_type.is_some()
            || self.change_type.is_some()
            || self.category.is_some()
            || self.technical_notes.is_some()
            || self.send_mail.is_some()
    }

    fn carry(&mut self, value: CustomValue) {
        match value {
            CustomValue::TicketType(kind) => self.ticket_type = Some(kind.to_string()),
            CustomValue::ChangeType(kind) => self.change_type = Some(kind.to_string()),
            CustomValue::Category(category) => self.category = Some(category.as_str().to_string()),
            CustomValue::TechnicalNotes(notes) => self.technical_notes = Some(notes),
            CustomValue::SendMail(routing) => self.send_mail = Some(routing),
        }
    }
}

/// Who the backend notifies about an update. Sent as 0/1 flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailRouting {
    pub assignees: bool,
    pub contact: bool,
    pub permanent_ccs: bool,
}

impl Default for EmailRouting {
    fn default() -> Self {
        Self {
            assignees: true,
            contact: true,
            permanent_ccs: true,
        }
    }
}

impl Serialize for EmailRouting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SendMail", 3)?;
        state.serialize_field("assignees", &u8::from(self.assignees))?;
        state.serialize_field("contact", &u8::from(self.contact))?;
        state.serialize_field("permanentCCs", &u8::from(self.permanent_ccs))?;
        state.end()
    }
}

/// Custom-field state of a ticket at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CustomFields {
    pub kind: &'static str,
    pub category: Option<Category>,
    pub technical_notes: Option<String>,
    pub email_routing: EmailRouting,
}

impl CustomFields {
    fn values(&self, type_field: TypeField) -> Vec<CustomValue> {
        let mut values = Vec::with_capacity(4);
        values.push(match type_field {
            TypeField::TicketType => CustomValue::TicketType(self.kind),
            TypeField::ChangeType => CustomValue::ChangeType(self.kind),
        });
        if let Some(category) = self.category {
            values.push(CustomValue::Category(category));
        }
        if let Some(notes) = &self.technical_notes {
            values.push(CustomValue::TechnicalNotes(notes.clone()));
        }
        values.push(CustomValue::SendMail(self.email_routing));
        values
    }
}

#[derive(Debug, Clone, PartialEq)]
enum CustomValue {
    TicketType(&'static str),
    ChangeType(&'static str),
    Category(Category),
    TechnicalNotes(String),
    SendMail(EmailRouting),
}

impl CustomValue {
    fn key(&self) -> &'static str {
        match self {
            CustomValue::TicketType(_) => TypeField::TicketType.key(),
            CustomValue::ChangeType(_) => TypeField::ChangeType.key(),
            CustomValue::Category(_) => "Category",
            CustomValue::TechnicalNotes(_) => "Technical Notes",
            CustomValue::SendMail(_) => "SendMail",
        }
    }
}

/// One free-text update. `sealed` holds the custom-field state this entry
/// is responsible for and is filled in when the next entry is appended;
/// only the last entry is unsealed.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub description: String,
    pub sealed: Option<CustomFields>,
}

pub(crate) fn fold_entries(
    entries: &[Entry],
    current: &CustomFields,
    type_field: TypeField,
) -> AppResult<Vec<EntryPayload>> {
    if entries.is_empty() {
        return Err(AppError::NoEntries);
    }

    let mut emitted: HashMap<&'static str, CustomValue> = HashMap::new();
    let payloads = entries
        .iter()
        .map(|entry| {
            let state = entry.sealed.as_ref().unwrap_or(current);
            let mut payload = EntryPayload::new(&entry.description);
            for value in state.values(type_field) {
                if emitted.get(value.key()) == Some(&value) {
                    continue;
                }
                emitted.insert(value.key(), value.clone());
                payload.carry(value);
            }
            payload
        })
        .collect();

    Ok(payloads)
}
