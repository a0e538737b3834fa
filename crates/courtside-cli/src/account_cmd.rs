//! Account subcommands: register, profile.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use courtside_store::{Courtside, NewUser, ProfileUpdate};

use crate::Login;

#[derive(clap::Subcommand, Debug)]
pub enum AccountAction {
    /// Create an account.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, env = "COURTSIDE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show or change the logged-in user's profile.
    Profile {
        #[command(flatten)]
        login: Login,
        /// New display name.
        #[arg(long)]
        name: Option<String>,
        /// New email address.
        #[arg(long)]
        new_email: Option<String>,
        /// New phone number.
        #[arg(long)]
        phone: Option<String>,
    },
}

pub async fn run(action: AccountAction, app: &Courtside) -> anyhow::Result<()> {
    match action {
        AccountAction::Register {
            name,
            email,
            phone,
            password,
        } => {
            let user = app
                .register(NewUser {
                    name,
                    email,
                    phone,
                    password,
                })
                .await?;
            let mut out = io::stdout();
            writeln!(out, "Registered {} <{}> ({})", user.name, user.email, user.id)?;
            Ok(())
        }
        AccountAction::Profile {
            login,
            name,
            new_email,
            phone,
        } => {
            login.sign_in(app).await?;
            let changes = ProfileUpdate {
                name,
                email: new_email,
                phone,
            };
            let unchanged =
                changes.name.is_none() && changes.email.is_none() && changes.phone.is_none();
            let user = if unchanged {
                app.user()
                    .ok_or_else(|| anyhow::anyhow!("Session was not established"))?
            } else {
                app.update_profile(changes).await?
            };

            let mut out = io::stdout();
            writeln!(out, "Name:  {}", user.name)?;
            writeln!(out, "Email: {}", user.email)?;
            writeln!(out, "Phone: {}", user.phone)?;
            Ok(())
        }
    }
}
