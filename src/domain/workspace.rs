use crate::error::{AppError, AppResult};

/// Backend partition a ticket lives in. The discriminant is the id the
/// backend expects in `Workspace` and as a `Ticket Links` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Workspace {
    Support,
    ChangeRequest,
}

impl Workspace {
    pub const ALL: [Workspace; 2] = [Workspace::Support, Workspace::ChangeRequest];

    pub fn id(&self) -> u32 {
        match self {
            Workspace::Support => 2,
            Workspace::ChangeRequest => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Workspace::Support => "Support",
            Workspace::ChangeRequest => "Change Request",
        }
    }

    pub fn from_id(id: u32) -> AppResult<Self> {
        Self::ALL
            .into_iter()
            .find(|workspace| workspace.id() == id)
            .ok_or(AppError::UnknownWorkspace { id })
    }
}
