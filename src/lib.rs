//! Client for logging tickets and change requests with the Footprints
//! service desk.
//!
//! ```no_run
//! # async fn run() -> footprints::AppResult<()> {
//! use footprints::{SubmissionClient, Ticket};
//!
//! let mut ticket = Ticket::support("Nightly backup failed");
//! ticket.set_user("sk").add_assignee("Operations");
//! ticket.add_entry("The backup job exited with status 2.")?;
//! ticket.set_status("Resolved")?;
//!
//! let number = SubmissionClient::from_env()?.submit_ticket(&ticket).await?;
//! println!("logged as {number}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod services;

pub use client::{SubmissionClient, encode_batch};
pub use config::ClientConfig;
pub use domain::payload::{CiLink, EmailRouting, EntryPayload, TicketPayload};
pub use domain::receipt::{TicketNumber, parse_acknowledgement};
pub use domain::schema::{Category, Priority, SchemaVariant, TypeField};
pub use domain::ticket::Ticket;
pub use domain::workspace::Workspace;
pub use error::{AppError, AppResult};
pub use services::Transport;
