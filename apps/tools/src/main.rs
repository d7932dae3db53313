use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{HttpSubmissionClient, SubmissionClient};
use shared::protocol::{CreateWishRequest, GradeSubmission};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server_url: String,
    /// Print raw JSON instead of a summary.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    ListWishes,
    ListGrades,
    SubmitWish { wish: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = HttpSubmissionClient::new(&cli.server_url)?;

    match cli.command {
        Command::ListWishes => {
            let wishes = client.list_wishes().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&wishes)?);
            } else {
                for wish in &wishes {
                    println!("{} {} {}", wish.created_at.to_rfc3339(), wish.id, wish.wish);
                }
                println!("{} wish(es)", wishes.len());
            }
        }
        Command::ListGrades => {
            let submissions = client.list_grade_submissions().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&submissions)?);
            } else {
                for submission in &submissions {
                    print_submission(submission);
                }
                println!("{} submission(s)", submissions.len());
            }
        }
        Command::SubmitWish { wish } => {
            let stored = client.create_wish(&CreateWishRequest { wish }).await?;
            println!("stored wish id={}", stored.id);
        }
    }

    Ok(())
}

fn print_submission(submission: &GradeSubmission) {
    println!("{} {}", submission.created_at.to_rfc3339(), submission.id);
    for subject in &submission.subjects {
        let marker = if subject.letter().is_some() { "" } else { " (off-scale)" };
        println!(
            "  {:<40} {:>3} sks  {}{}",
            subject.name, subject.sks, subject.grade, marker
        );
    }
}
