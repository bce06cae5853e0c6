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
    let mut change = Ticket::change_request("My Example Change Request");
    change
        .set_emails(false, false, false)
        .set_user("sk")
        .add_assignees(["Learning and Research Systems", "sk"]);
    change.set_priority("Normal")?;

    change.add_entry("We did this cool thing the other day!")?;
    change.add_technical_note("Something is broken.");
    change.add_entry("Oh, it isnt working.")?;
    change.add_technical_note("Hah it was that function I wrote a long time ago.");
    change.add_entry("Fixed!")?;

    change.set_status("Closed")?;

    let number = SubmissionClient::from_env()?.submit_ticket(&change).await?;
    println!("Change request {number} logged.");
    Ok(())
}
