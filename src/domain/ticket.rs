use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::payload::{
    CiLink, CustomFields, EmailRouting, Entry, TicketPayload, fold_entries,
};
use crate::domain::schema::{Category, Priority, SchemaVariant};
use crate::domain::workspace::Workspace;
use crate::error::{AppError, AppResult};

const SERVER_LINK_TYPES: [&str; 2] = ["Server", "Virtual Server"];

/// A ticket being assembled for submission.
///
/// Setters validate against the ticket's [`SchemaVariant`] and fail fast;
/// nothing is coerced. Serialization never mutates the ticket.
#[derive(Debug, Clone)]
pub struct Ticket {
    schema: SchemaVariant,
    title: String,
    username: Option<String>,
    priority: Priority,
    status: &'static str,
    assignees: Vec<String>,
    permanent_ccs: Vec<String>,
    one_time_ccs: Vec<String>,
    ci_links: Vec<CiLink>,
    ticket_links: BTreeMap<Workspace, Vec<String>>,
    custom: CustomFields,
    entries: Vec<Entry>,
}

impl Ticket {
    pub fn new(title: impl Into<String>, schema: SchemaVariant) -> Self {
        Self {
            schema,
            title: title.into(),
            username: None,
            priority: Priority::Normal,
            status: schema.initial_status,
            assignees: Vec::new(),
            permanent_ccs: Vec::new(),
            one_time_ccs: Vec::new(),
            ci_links: Vec::new(),
            ticket_links: Workspace::ALL
                .into_iter()
                .map(|workspace| (workspace, Vec::new()))
                .collect(),
            custom: CustomFields {
                kind: schema.default_type,
                category: schema.default_category,
                technical_notes: None,
                email_routing: EmailRouting::default(),
            },
            entries: Vec::new(),
        }
    }

    pub fn support(title: impl Into<String>) -> Self {
        Self::new(title, SchemaVariant::SUPPORT)
    }

    pub fn change_request(title: impl Into<String>) -> Self {
        Self::new(title, SchemaVariant::CHANGE_REQUEST)
    }

    pub fn schema(&self) -> &SchemaVariant {
        &self.schema
    }

    pub fn workspace(&self) -> Workspace {
        self.schema.workspace
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn status(&self) -> &'static str {
        self.status
    }

    pub fn ticket_type(&self) -> &'static str {
        self.custom.kind
    }

    pub fn category(&self) -> Option<Category> {
        self.custom.category
    }

    pub fn technical_notes(&self) -> Option<&str> {
        self.custom.technical_notes.as_deref()
    }

    pub fn email_routing(&self) -> EmailRouting {
        self.custom.email_routing
    }

    pub fn assignees(&self) -> &[String] {
        &self.assignees
    }

    pub fn permanent_ccs(&self) -> &[String] {
        &self.permanent_ccs
    }

    pub fn one_time_ccs(&self) -> &[String] {
        &self.one_time_ccs
    }

    pub fn ci_links(&self) -> &[CiLink] {
        &self.ci_links
    }

    pub fn ticket_links(&self, workspace: Workspace) -> &[String] {
        self.ticket_links
            .get(&workspace)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.description.as_str())
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    pub fn set_user(&mut self, username: impl Into<String>) -> &mut Self {
        self.username = Some(username.into());
        self
    }

    pub fn set_priority(&mut self, priority: &str) -> AppResult<&mut Self> {
        self.priority = priority.parse()?;
        Ok(self)
    }

    pub fn set_status(&mut self, status: &str) -> AppResult<&mut Self> {
        self.status = self.schema.status(status)?;
        Ok(self)
    }

    pub fn set_type(&mut self, kind: &str) -> AppResult<&mut Self> {
        self.custom.kind = self.schema.ticket_type(kind)?;
        Ok(self)
    }

    pub fn set_category(&mut self, category: &str) -> AppResult<&mut Self> {
        if !self.schema.allows_category {
            return Err(AppError::UnsupportedOperation(format!(
                "cannot set the category of a {} ticket",
                self.schema.workspace.name()
            )));
        }
        self.custom.category = Some(category.parse()?);
        Ok(self)
    }

    /// Who the backend should mail about the next update.
    pub fn set_emails(&mut self, assignees: bool, contact: bool, permanent_ccs: bool) -> &mut Self {
        self.custom.email_routing = EmailRouting {
            assignees,
            contact,
            permanent_ccs,
        };
        self
    }

    pub fn add_technical_note(&mut self, note: &str) -> &mut Self {
        let notes = self.custom.technical_notes.get_or_insert_with(String::new);
        if !notes.is_empty() {
            notes.push_str("\n\n");
        }
        notes.push_str(note);
        self
    }

    pub fn add_assignee(&mut self, assignee: impl Into<String>) -> &mut Self {
        push_unique(&mut self.assignees, assignee.into());
        self
    }

    pub fn add_assignees<I, S>(&mut self, assignees: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for assignee in assignees {
            self.add_assignee(assignee);
        }
        self
    }

    pub fn add_cc(&mut self, cc: impl Into<String>, permanent: bool) -> &mut Self {
        let list = if permanent {
            &mut self.permanent_ccs
        } else {
            &mut self.one_time_ccs
        };
        push_unique(list, cc.into());
        self
    }

    pub fn add_ccs<I, S>(&mut self, ccs: I, permanent: bool) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for cc in ccs {
            self.add_cc(cc, permanent);
        }
        self
    }

    pub fn add_entry(&mut self, contents: impl Into<String>) -> AppResult<&mut Self> {
        let contents = contents.into();
        if contents.trim().is_empty() {
            return Err(AppError::EmptyEntry);
        }
        self.push_entry(contents);
        Ok(self)
    }

    /// Appends several entries. Nothing is appended if any of them is blank.
    pub fn add_entries<I, S>(&mut self, entries: I) -> AppResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        if entries.iter().any(|entry| entry.trim().is_empty()) {
            return Err(AppError::EmptyEntry);
        }
        for entry in entries {
            self.push_entry(entry);
        }
        Ok(self)
    }

    fn push_entry(&mut self, description: String) {
        if let Some(previous) = self.entries.last_mut() {
            previous.sealed = Some(self.custom.clone());
        }
        self.entries.push(Entry {
            description,
            sealed: None,
        });
    }

    pub fn add_ci_link<T, N, S1, S2>(&mut self, types: T, names: N) -> &mut Self
    where
        T: IntoIterator<Item = S1>,
        N: IntoIterator<Item = S2>,
        S1: Into<String>,
        S2: Into<String>,
    {
        self.ci_links.push(CiLink {
            types: types.into_iter().map(Into::into).collect(),
            names: names.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn add_server_link(&mut self, hostname: impl Into<String>) -> &mut Self {
        self.add_server_links([hostname.into()])
    }

    /// Links several hosts through a single CI link record.
    pub fn add_server_links<I, S>(&mut self, hostnames: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_ci_link(SERVER_LINK_TYPES, hostnames)
    }

    pub fn add_ticket_link(&mut self, number: impl Into<String>, workspace_id: u32) -> AppResult<&mut Self> {
        let workspace = Workspace::from_id(workspace_id)?;
        let bucket = self.ticket_links.entry(workspace).or_default();
        push_unique(bucket, number.into());
        Ok(self)
    }

    pub fn add_ticket_links<I, S>(&mut self, numbers: I, workspace_id: u32) -> AppResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Workspace::from_id(workspace_id)?;
        for number in numbers {
            self.add_ticket_link(number, workspace_id)?;
        }
        Ok(self)
    }

    pub fn add_change_request_link(&mut self, number: impl Into<String>) -> &mut Self {
        let bucket = self.ticket_links.entry(Workspace::ChangeRequest).or_default();
        push_unique(bucket, number.into());
        self
    }

    pub fn to_submission_payload(&self) -> AppResult<TicketPayload> {
        let entries = fold_entries(&self.entries, &self.custom, self.schema.type_field)?;

        let ticket_links = self
            .ticket_links
            .iter()
            .filter(|(_, numbers)| !numbers.is_empty())
            .map(|(workspace, numbers)| (workspace.id(), numbers.clone()))
            .collect();

        debug!(
            title = %self.title,
            workspace = self.schema.workspace.id(),
            entries = entries.len(),
            "built ticket payload"
        );

        Ok(TicketPayload {
            workspace: self.schema.workspace.id(),
            title: self.title.clone(),
            username: self.username.clone(),
            priority: self.priority.as_str().to_string(),
            status: self.status.to_string(),
            assignees: self.assignees.clone(),
            permanent_ccs: self.permanent_ccs.clone(),
            one_time_ccs: self.one_time_ccs.clone(),
            ci_links: self.ci_links.clone(),
            ticket_links,
            entries,
        })
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(&self.to_submission_payload()?)?)
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}
