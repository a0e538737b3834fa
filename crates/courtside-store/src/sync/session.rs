//! Session commands: login, register, logout, profile updates.

use courtside_core::db::unix_timestamp;
use tracing::{info, instrument, warn};

use super::{Courtside, new_id};
use crate::credentials;
use crate::error::{StorageResultExt, StoreError};
use crate::state::ReservationScope;
use crate::storage::{Collection, NewUser, ProfileUpdate, User};

impl Courtside {
    /// Log in by email and password.
    ///
    /// Returns `Ok(false)` when the email is unknown or the password does not
    /// match; the session stays anonymous and the error slot reads
    /// `InvalidCredentials`. On success courts and the user's reservations
    /// are loaded before the session is set, so a failed load leaves the
    /// container anonymous.
    #[instrument(skip(self, password), fields(command = "login"))]
    pub async fn login(&self, email: &str, password: &str) -> Result<bool, StoreError> {
        self.run("login", self.login_inner(email, password)).await
    }

    async fn login_inner(&self, email: &str, password: &str) -> Result<bool, StoreError> {
        let user = self
            .store
            .user_by_email(email)
            .await
            .in_collection(Collection::Users)?;

        let Some(user) = user else {
            warn!(email, "Login for unknown email");
            self.state
                .record_error(StoreError::InvalidCredentials.descriptor());
            return Ok(false);
        };

        if !credentials::verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Failed login attempt");
            self.state
                .record_error(StoreError::InvalidCredentials.descriptor());
            return Ok(false);
        }

        self.establish_session(user).await?;
        Ok(true)
    }

    /// Register a new user and log them in.
    ///
    /// The email is checked against every stored user before anything is
    /// written, yielding `DuplicateEmail` rather than a store collision.
    #[instrument(skip(self, new_user), fields(command = "register", email = %new_user.email))]
    pub async fn register(&self, new_user: NewUser) -> Result<User, StoreError> {
        self.run("register", self.register_inner(new_user)).await
    }

    async fn register_inner(&self, new_user: NewUser) -> Result<User, StoreError> {
        if new_user.email.trim().is_empty() {
            return Err(StoreError::validation("email", "must not be empty"));
        }
        if new_user.password.is_empty() {
            return Err(StoreError::validation("password", "must not be empty"));
        }

        let users = self.store.all_users().await.in_collection(Collection::Users)?;
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail {
                email: new_user.email,
            });
        }

        let now = unix_timestamp();
        let user = User {
            id: new_id(),
            name: new_user.name,
            email: new_user.email,
            phone: new_user.phone,
            password_hash: credentials::hash_password(&new_user.password)?,
            created_at: now,
            updated_at: now,
        };
        let user = self
            .store
            .insert_user(&user)
            .await
            .in_collection(Collection::Users)?;

        info!(user_id = %user.id, "User registered");
        self.establish_session(user.clone()).await?;
        Ok(user)
    }

    /// Drop the session and every cached court and reservation. No durable write.
    pub fn logout(&self) {
        self.state.update(|state| {
            if let Some(user) = state.user.take() {
                info!(user_id = %user.id, "User logged out");
            }
            state.courts.clear();
            state.reservations.clear();
            state.reservation_scope = ReservationScope::default();
            state.error = None;
        });
    }

    /// Change name, email or phone of the logged-in user.
    ///
    /// An email already held by another user fails with `DuplicateEmail`
    /// before any write.
    #[instrument(skip(self, changes), fields(command = "update_profile"))]
    pub async fn update_profile(&self, changes: ProfileUpdate) -> Result<User, StoreError> {
        self.run("update_profile", self.update_profile_inner(changes))
            .await
    }

    async fn update_profile_inner(&self, changes: ProfileUpdate) -> Result<User, StoreError> {
        let current = self.session_user()?;

        if let Some(email) = changes.email.as_deref()
            && email != current.email
        {
            if email.trim().is_empty() {
                return Err(StoreError::validation("email", "must not be empty"));
            }
            let users = self.store.all_users().await.in_collection(Collection::Users)?;
            if users.iter().any(|u| u.email == email && u.id != current.id) {
                return Err(StoreError::DuplicateEmail {
                    email: email.to_string(),
                });
            }
        }

        let updated = User {
            name: changes.name.unwrap_or(current.name),
            email: changes.email.unwrap_or(current.email),
            phone: changes.phone.unwrap_or(current.phone),
            updated_at: unix_timestamp(),
            ..current
        };
        let updated = self
            .store
            .put_user(&updated)
            .await
            .in_collection(Collection::Users)?;

        let user = updated.clone();
        self.update_in_session(Some(updated.id.as_str()), |state| state.user = Some(user));
        info!(user_id = %updated.id, "Profile updated");
        Ok(updated)
    }

    /// Load courts and the user's reservations, then switch to Authenticated
    /// in a single transition.
    async fn establish_session(&self, user: User) -> Result<(), StoreError> {
        let courts = self
            .store
            .all_courts()
            .await
            .in_collection(Collection::Courts)?;
        let reservations = self
            .store
            .reservations_for_user(&user.id)
            .await
            .in_collection(Collection::Reservations)?;

        info!(
            user_id = %user.id,
            courts = courts.len(),
            reservations = reservations.len(),
            "Session established"
        );
        self.state.update(|state| {
            state.user = Some(user);
            state.courts = courts;
            state.reservations = reservations;
            state.reservation_scope = ReservationScope::CurrentUser;
        });
        Ok(())
    }
}
