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
        .set_emails(false, false, false)
        .set_user("sk")
        .add_assignees(["Learning and Research Systems", "sk"]);
    ticket.set_priority("Normal")?.set_type("Incident")?.set_category("Web")?;

    ticket.add_entry("We did this cool thing the other day!")?;
    ticket.add_technical_note("Something is broken.");
    ticket.add_entry("Oh, it isnt working.")?;
    ticket.add_technical_note("Hah it was that function I wrote a long time ago.");
    ticket.add_entry("Fixed!")?;

    ticket.set_status("Resolved")?;

    let number = SubmissionClient::from_env()?.submit_ticket(&ticket).await?;
    println!("Ticket {number} logged.");
    Ok(())
}
