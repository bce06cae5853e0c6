use footprints::{AppResult, SubmissionClient, Ticket};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let mut ticket = Ticket::support("My Example Ticket");
    ticket
        .set_user("sk")
        .add_assignees(["Learning and Research Systems", "sk"])
        .add_server_link("web01.example.ac.uk");
    ticket.set_type("Incident")?.set_category("Web")?;

    ticket.add_entries([
        "We did this cool thing the other day!",
        "Oh, it isnt working.",
        "Fixed!",
    ])?;

    ticket.set_status("Resolved")?;

    SubmissionClient::from_env()?
        .submit_ticket_and_forget(&ticket)
        .await?;
    println!("Ticket sent; no acknowledgement requested.");
    Ok(())
}
