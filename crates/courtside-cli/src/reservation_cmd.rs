//! Reservation subcommands: list, book, cancel, confirm, stats.

use std::io::{self, Write};

use courtside_store::summary::ReservationSummary;
use courtside_store::{AppState, Courtside, ReservationDraft, ReservationScope, ReservationStatus};

use crate::Login;

#[derive(clap::Subcommand, Debug)]
pub enum ReservationAction {
    /// List reservations.
    Reservations {
        #[command(flatten)]
        login: Login,
        /// Every user's reservations, not just your own.
        #[arg(long)]
        all: bool,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Book a court.
    Book {
        #[command(flatten)]
        login: Login,
        /// Court ID.
        #[arg(long)]
        court: String,
        /// Day as YYYY-MM-DD.
        #[arg(long)]
        date: String,
        /// Start time as HH:MM.
        #[arg(long)]
        time: String,
    },
    /// Cancel a reservation.
    Cancel {
        #[command(flatten)]
        login: Login,
        id: String,
    },
    /// Mark a reservation as confirmed.
    Confirm {
        #[command(flatten)]
        login: Login,
        id: String,
    },
    /// Count reservations per day, court, hour and status.
    Stats {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        all: bool,
        /// First day to include (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,
        /// Last day to include (YYYY-MM-DD).
        #[arg(long)]
        to: Option<String>,
    },
}

const fn scope(all: bool) -> ReservationScope {
    if all {
        ReservationScope::All
    } else {
        ReservationScope::CurrentUser
    }
}

pub async fn run(action: ReservationAction, app: &Courtside) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        ReservationAction::Reservations { login, all, json } => {
            login.sign_in(app).await?;
            if all {
                app.load_reservations(ReservationScope::All).await?;
            }
            let state = app.snapshot();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&state.reservations)?)?;
            } else {
                print_reservations(&mut out, &state)?;
            }
        }
        ReservationAction::Book {
            login,
            court,
            date,
            time,
        } => {
            login.sign_in(app).await?;
            let reservation = app
                .add_reservation(ReservationDraft {
                    court_id: court,
                    date,
                    time,
                    status: None,
                })
                .await?;
            writeln!(
                out,
                "Booked {} on {} at {} ({})",
                court_name(&app.snapshot(), &reservation.court_id),
                reservation.date,
                reservation.time,
                reservation.id
            )?;
        }
        ReservationAction::Cancel { login, id } => {
            login.sign_in(app).await?;
            app.set_reservation_status(&id, ReservationStatus::Cancelled)
                .await?;
            writeln!(out, "Reservation {id} cancelled")?;
        }
        ReservationAction::Confirm { login, id } => {
            login.sign_in(app).await?;
            app.set_reservation_status(&id, ReservationStatus::Confirmed)
                .await?;
            writeln!(out, "Reservation {id} confirmed")?;
        }
        ReservationAction::Stats {
            login,
            all,
            from,
            to,
        } => {
            login.sign_in(app).await?;
            app.load_reservations(scope(all)).await?;
            let summary =
                ReservationSummary::from_state(&app.snapshot(), from.as_deref(), to.as_deref());
            print_summary(&mut out, &summary)?;
        }
    }
    Ok(())
}

fn court_name<'a>(state: &'a AppState, court_id: &'a str) -> &'a str {
    state.court(court_id).map_or(court_id, |c| c.name.as_str())
}

fn print_reservations(out: &mut impl Write, state: &AppState) -> io::Result<()> {
    if state.reservations.is_empty() {
        return writeln!(out, "No reservations.");
    }
    for r in &state.reservations {
        writeln!(
            out,
            "{:<38} {} {}  {:<28} {}",
            r.id,
            r.date,
            r.time,
            court_name(state, &r.court_id),
            r.status
        )?;
    }
    Ok(())
}

fn print_summary(out: &mut impl Write, summary: &ReservationSummary) -> io::Result<()> {
    writeln!(out, "Total: {}", summary.total)?;
    writeln!(out, "Revenue: {:.2}", summary.revenue)?;
    for status in ReservationStatus::ALL {
        writeln!(out, "  {:<12} {}", status.as_str(), summary.count(status))?;
    }
    writeln!(out, "Per day:")?;
    for (day, n) in &summary.per_day {
        writeln!(out, "  {day}  {n}")?;
    }
    writeln!(out, "Per court:")?;
    for (court, n) in &summary.per_court {
        writeln!(out, "  {court:<28} {n}")?;
    }
    writeln!(out, "Per hour:")?;
    for (hour, n) in &summary.per_hour {
        writeln!(out, "  {hour}h  {n}")?;
    }
    Ok(())
}
