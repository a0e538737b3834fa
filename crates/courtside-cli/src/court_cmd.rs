//! Court subcommands: list, add, remove.

use std::io::{self, Write};

use courtside_store::{Court, Courtside, NewCourt};

use crate::Login;

#[derive(clap::Subcommand, Debug)]
pub enum CourtAction {
    /// List all courts.
    Courts {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Add a court.
    AddCourt {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        name: String,
        /// Court type, e.g. "tenis" or "fútbol".
        #[arg(long = "type")]
        court_type: String,
        #[arg(long)]
        capacity: i64,
        #[arg(long)]
        price: Option<f64>,
    },
    /// Delete a court by ID.
    RemoveCourt {
        #[command(flatten)]
        login: Login,
        id: String,
    },
}

pub async fn run(action: CourtAction, app: &Courtside) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        CourtAction::Courts { json } => {
            app.load_courts().await?;
            let courts = app.snapshot().courts;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&courts)?)?;
            } else if courts.is_empty() {
                writeln!(out, "No courts.")?;
            } else {
                for court in &courts {
                    writeln!(out, "{}", format_court(court))?;
                }
            }
        }
        CourtAction::AddCourt {
            login,
            name,
            court_type,
            capacity,
            price,
        } => {
            login.sign_in(app).await?;
            let court = app
                .add_court(NewCourt {
                    name,
                    court_type,
                    capacity,
                    price_per_hour: price,
                })
                .await?;
            writeln!(out, "Added {}", format_court(&court))?;
        }
        CourtAction::RemoveCourt { login, id } => {
            login.sign_in(app).await?;
            if app.delete_court(&id).await? {
                writeln!(out, "Court {id} deleted")?;
            } else {
                writeln!(out, "No court with ID {id}")?;
            }
        }
    }
    Ok(())
}

fn format_court(court: &Court) -> String {
    let price = court
        .price_per_hour
        .map_or_else(|| "-".to_string(), |p| format!("{p:.2}/h"));
    format!(
        "{:<38} {:<28} {:<12} cap {:<3} {}",
        court.id, court.name, court.court_type, court.capacity, price
    )
}
