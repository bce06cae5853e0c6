use std::str::FromStr;

use crate::domain::workspace::Workspace;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Background,
    Normal,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Background,
        Priority::Normal,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Background => "Background",
            Priority::Normal => "Normal",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(value: &str) -> AppResult<Self> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == value)
            .ok_or_else(|| AppError::invalid("priority", value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    AvMedia,
    EmailCalendaring,
    FileStore,
    Hardware,
    ItAccount,
    Library,
    Network,
    Other,
    Software,
    Web,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::AvMedia,
        Category::EmailCalendaring,
        Category::FileStore,
        Category::Hardware,
        Category::ItAccount,
        Category::Library,
        Category::Network,
        Category::Other,
        Category::Software,
        Category::Web,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::AvMedia => "AV & Media",
            Category::EmailCalendaring => "Email and Calendaring",
            Category::FileStore => "File store",
            Category::Hardware => "Hardware",
            Category::ItAccount => "IT Account",
            Category::Library => "Library",
            Category::Network => "Network",
            Category::Other => "Other",
            Category::Software => "Software",
            Category::Web => "Web",
        }
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(value: &str) -> AppResult<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| AppError::invalid("category", value))
    }
}

/// Entry key the ticket type is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeField {
    TicketType,
    ChangeType,
}

impl TypeField {
    pub fn key(&self) -> &'static str {
        match self {
            TypeField::TicketType => "Type of Ticket",
            TypeField::ChangeType => "Change Type",
        }
    }
}

const SUPPORT_STATUSES: &[&str] = &[
    "Open",
    "Updated by Agent",
    "In Progress",
    "Waiting - Specified Time",
    "Waiting - External",
    "Waiting - User",
    "Waiting Kit Loan/Other",
    "Resolved",
    "Closed",
];

const SUPPORT_TYPES: &[&str] = &[
    "Incident",
    "Service Request - Service",
    "Service Request - Question",
    "Problem",
    "Quality and Standards",
];

const CHANGE_REQUEST_STATUSES: &[&str] = &[
    "Open",
    "Allocated",
    "In Progress",
    "Holding",
    "Paused - Waiting further info",
    "Paused - Waiting on another task",
    "Paused - Waiting external",
    "Paused - Waiting scheduled time",
    "Paused - Other work taking priority",
    "Agreed not to do",
    "In Alpha test",
    "Beta test",
    "Handed over",
    "Closed",
];

const CHANGE_REQUEST_TYPES: &[&str] = &[
    "Service Change Request",
    "Standard Change - Change Request",
    "Standard Change - System Booking",
    "System Booking",
    "Timesheet",
];

/// Vocabulary and defaults of one ticket flavour.
///
/// Every behavioural difference between a support ticket and a change
/// request lives here, so a schema revision with different labels is just
/// another value of this type. `initial_status` and `default_type` must be
/// members of their tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaVariant {
    pub workspace: Workspace,
    pub statuses: &'static [&'static str],
    pub initial_status: &'static str,
    pub types: &'static [&'static str],
    pub default_type: &'static str,
    pub type_field: TypeField,
    pub allows_category: bool,
    pub default_category: Option<Category>,
}

impl SchemaVariant {
    pub const SUPPORT: SchemaVariant = SchemaVariant {
        workspace: Workspace::Support,
        statuses: SUPPORT_STATUSES,
        initial_status: "Open",
        types: SUPPORT_TYPES,
        default_type: "Incident",
        type_field: TypeField::TicketType,
        allows_category: true,
        default_category: Some(Category::Web),
    };

    pub const CHANGE_REQUEST: SchemaVariant = SchemaVariant {
        workspace: Workspace::ChangeRequest,
        statuses: CHANGE_REQUEST_STATUSES,
        initial_status: "Open",
        types: CHANGE_REQUEST_TYPES,
        default_type: "Standard Change - Change Request",
        type_field: TypeField::ChangeType,
        allows_category: false,
        default_category: None,
    };

    pub fn status(&self, value: &str) -> AppResult<&'static str> {
        lookup(self.statuses, "status", value)
    }

    pub fn ticket_type(&self, value: &str) -> AppResult<&'static str> {
        lookup(self.types, "type", value)
    }
}

fn lookup(table: &'static [&'static str], field: &'static str, value: &str) -> AppResult<&'static str> {
    table
        .iter()
        .copied()
        .find(|candidate| *candidate == value)
        .ok_or_else(|| AppError::invalid(field, value))
}
