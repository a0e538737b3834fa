//! Command surface tests: session lifecycle, write-through, observers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::Courtside;
use crate::state::{ErrorKind, ReservationScope, Session};
use crate::storage::{
    NewCourt, NewUser, ProfileUpdate, RecordStore, ReservationDraft, ReservationStatus,
};

async fn courtside() -> Courtside {
    let store = RecordStore::open_in_memory().await.unwrap();
    store.initialize().await.unwrap();
    Courtside::new(store)
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        name: "Ana".into(),
        email: email.into(),
        phone: "600000000".into(),
        password: "secret".into(),
    }
}

fn draft(court_id: &str, date: &str, time: &str) -> ReservationDraft {
    ReservationDraft {
        court_id: court_id.into(),
        date: date.into(),
        time: time.into(),
        status: None,
    }
}

fn new_court(name: &str) -> NewCourt {
    NewCourt {
        name: name.into(),
        court_type: "padel".into(),
        capacity: 4,
        price_per_hour: Some(20.0),
    }
}

/// A container with a registered, logged-in user.
async fn logged_in() -> Courtside {
    let app = courtside().await;
    app.register(new_user("a@b.com")).await.unwrap();
    app
}

// =========================================================================
// Session
// =========================================================================

#[tokio::test]
async fn register_logs_in_and_loads_courts() {
    let app = courtside().await;
    assert_eq!(app.snapshot().session(), Session::Anonymous);

    let user = app.register(new_user("a@b.com")).await.unwrap();

    let state = app.snapshot();
    assert_eq!(state.session(), Session::Authenticated);
    assert_eq!(state.user.as_ref().map(|u| u.id.as_str()), Some(user.id.as_str()));
    assert_eq!(state.courts.len(), 4);
    assert!(state.reservations.is_empty());
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn register_never_stores_plain_password() {
    let app = courtside().await;
    let user = app.register(new_user("a@b.com")).await.unwrap();

    let stored = app.store().get_user(&user.id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "secret");
    assert!(stored.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn register_duplicate_email_leaves_users_unchanged() {
    let app = logged_in().await;
    app.logout();

    let err = app.register(new_user("a@b.com")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicateEmail);
    assert_eq!(app.store().all_users().await.unwrap().len(), 1);
    let state = app.snapshot();
    assert_eq!(state.session(), Session::Anonymous);
    assert_eq!(state.error.map(|e| e.kind), Some(ErrorKind::DuplicateEmail));
}

#[tokio::test]
async fn register_rejects_empty_password() {
    let app = courtside().await;
    let mut user = new_user("a@b.com");
    user.password.clear();

    let err = app.register(user).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(app.store().all_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn login_with_correct_and_wrong_password() {
    let app = logged_in().await;
    app.logout();

    assert!(!app.login("a@b.com", "wrong").await.unwrap());
    let state = app.snapshot();
    assert_eq!(state.session(), Session::Anonymous);
    assert_eq!(
        state.error.map(|e| e.kind),
        Some(ErrorKind::InvalidCredentials)
    );

    assert!(app.login("a@b.com", "secret").await.unwrap());
    let state = app.snapshot();
    assert_eq!(state.session(), Session::Authenticated);
    assert!(state.error.is_none());
    assert_eq!(state.courts.len(), 4);
}

#[tokio::test]
async fn login_unknown_email_is_invalid_credentials() {
    let app = courtside().await;

    assert!(!app.login("nobody@b.com", "secret").await.unwrap());
    assert_eq!(
        app.snapshot().error.map(|e| e.kind),
        Some(ErrorKind::InvalidCredentials)
    );
}

#[tokio::test]
async fn login_loads_only_own_reservations() {
    let app = logged_in().await;
    app.add_reservation(draft("3", "2024-06-01", "09:00"))
        .await
        .unwrap();
    app.logout();

    app.register(new_user("c@d.com")).await.unwrap();
    app.add_reservation(draft("1", "2024-06-02", "10:00"))
        .await
        .unwrap();
    app.logout();

    assert!(app.login("a@b.com", "secret").await.unwrap());
    let state = app.snapshot();
    assert_eq!(state.reservations.len(), 1);
    assert_eq!(state.reservations[0].court_id, "3");
}

#[tokio::test]
async fn logout_clears_mirror() {
    let app = logged_in().await;
    app.add_reservation(draft("3", "2024-06-01", "09:00"))
        .await
        .unwrap();

    app.logout();

    let state = app.snapshot();
    assert_eq!(state.session(), Session::Anonymous);
    assert!(state.courts.is_empty());
    assert!(state.reservations.is_empty());
    // Durable data survives.
    assert_eq!(app.store().all_reservations().await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_profile_changes_session_user() {
    let app = logged_in().await;

    let updated = app
        .update_profile(ProfileUpdate {
            name: Some("Ana María".into()),
            email: None,
            phone: Some("611111111".into()),
        })
        .await
        .unwrap();

    assert_eq!(updated.email, "a@b.com");
    assert_eq!(app.user().map(|u| u.name), Some("Ana María".to_string()));
    let stored = app.store().get_user(&updated.id).await.unwrap().unwrap();
    assert_eq!(stored.phone, "611111111");
    assert_eq!(stored.password_hash, updated.password_hash);
}

#[tokio::test]
async fn update_profile_rejects_taken_email() {
    let app = logged_in().await;
    app.logout();
    app.register(new_user("c@d.com")).await.unwrap();

    let err = app
        .update_profile(ProfileUpdate {
            email: Some("a@b.com".into()),
            ..ProfileUpdate::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicateEmail);
    assert_eq!(app.user().map(|u| u.email), Some("c@d.com".to_string()));
}

// =========================================================================
// Session gating
// =========================================================================

#[tokio::test]
async fn commands_require_session() {
    let app = courtside().await;

    let errors = [
        app.add_reservation(draft("3", "2024-06-01", "09:00"))
            .await
            .unwrap_err(),
        app.update_reservation("r1", draft("3", "2024-06-01", "09:00"))
            .await
            .unwrap_err(),
        app.set_reservation_status("r1", ReservationStatus::Confirmed)
            .await
            .unwrap_err(),
        app.add_court(new_court("Pista 1")).await.unwrap_err(),
        app.update_court("9", new_court("Pista 9")).await.unwrap_err(),
        app.delete_court("1").await.unwrap_err(),
        app.delete_reservation("r1").await.unwrap_err(),
        app.load_reservations(ReservationScope::CurrentUser)
            .await
            .unwrap_err(),
        app.update_profile(ProfileUpdate::default())
            .await
            .unwrap_err(),
    ];

    for err in errors {
        assert_eq!(err.kind(), ErrorKind::SessionRequired);
    }
    assert!(app.store().all_reservations().await.unwrap().is_empty());
    assert_eq!(app.store().all_courts().await.unwrap().len(), 4);
    assert_eq!(
        app.snapshot().error.map(|e| e.kind),
        Some(ErrorKind::SessionRequired)
    );
}

#[tokio::test]
async fn courts_load_without_session() {
    let app = courtside().await;
    app.load_courts().await.unwrap();
    assert_eq!(app.snapshot().courts.len(), 4);
}

// =========================================================================
// Reservations
// =========================================================================

#[tokio::test]
async fn add_reservation_round_trip() {
    let app = logged_in().await;
    let user_id = app.user().unwrap().id;

    let added = app
        .add_reservation(draft("3", "2024-06-01", "09:00"))
        .await
        .unwrap();

    assert_eq!(added.user_id, user_id);
    assert_eq!(added.status, ReservationStatus::Pending);
    assert_eq!(app.snapshot().reservation(&added.id), Some(&added));
    let stored = app.store().get_reservation(&added.id).await.unwrap();
    assert_eq!(stored.as_ref(), Some(&added));

    app.load_reservations(ReservationScope::CurrentUser)
        .await
        .unwrap();
    let reloaded = app.snapshot().reservations;
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].status, ReservationStatus::Pending);
    assert_eq!(reloaded[0].user_id, user_id);
    assert_eq!((reloaded[0].date.as_str(), reloaded[0].time.as_str()), ("2024-06-01", "09:00"));
}

#[tokio::test]
async fn update_reservation_patches_in_place() {
    let app = logged_in().await;
    let first = app
        .add_reservation(draft("3", "2024-06-01", "09:00"))
        .await
        .unwrap();
    let second = app
        .add_reservation(draft("1", "2024-06-01", "10:00"))
        .await
        .unwrap();

    let mut change = draft("4", "2024-06-03", "11:00");
    change.status = Some(ReservationStatus::Confirmed);
    let updated = app.update_reservation(&first.id, change).await.unwrap();

    assert_eq!(updated.created_at, first.created_at);
    assert!(updated.updated_at.is_some());
    let ids: Vec<_> = app
        .snapshot()
        .reservations
        .iter()
        .map(|r| r.id.clone())
        .collect();
    assert_eq!(ids, [first.id.clone(), second.id]);
    assert_eq!(app.snapshot().reservation(&first.id), Some(&updated));
    assert_eq!(
        app.store().get_reservation(&first.id).await.unwrap(),
        Some(updated)
    );
}

#[tokio::test]
async fn update_reservation_without_status_keeps_stored_one() {
    let app = logged_in().await;
    let added = app
        .add_reservation(draft("3", "2024-06-01", "09:00"))
        .await
        .unwrap();
    app.set_reservation_status(&added.id, ReservationStatus::Confirmed)
        .await
        .unwrap();

    let updated = app
        .update_reservation(&added.id, draft("3", "2024-06-01", "12:00"))
        .await
        .unwrap();

    assert_eq!(updated.status, ReservationStatus::Confirmed);
    assert_eq!(updated.time, "12:00");
}

#[tokio::test]
async fn set_status_on_missing_reservation_is_not_found() {
    let app = logged_in().await;

    let err = app
        .set_reservation_status("nonexistent-id", ReservationStatus::Cancelled)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(app.store().all_reservations().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_reservation_removes_from_store_and_mirror() {
    let app = logged_in().await;
    let added = app
        .add_reservation(draft("3", "2024-06-01", "09:00"))
        .await
        .unwrap();

    assert!(app.delete_reservation(&added.id).await.unwrap());
    assert!(app.snapshot().reservations.is_empty());
    assert!(app.store().get_reservation(&added.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_missing_reservation_is_noop() {
    let app = logged_in().await;
    app.add_reservation(draft("3", "2024-06-01", "09:00"))
        .await
        .unwrap();
    let before = app.snapshot();

    assert!(!app.delete_reservation("nonexistent-id").await.unwrap());

    let after = app.snapshot();
    assert_eq!(after.reservations, before.reservations);
    assert!(after.error.is_none());
    assert_eq!(app.store().all_reservations().await.unwrap().len(), 1);
}

#[tokio::test]
async fn scope_all_sees_every_users_reservations() {
    let app = logged_in().await;
    app.add_reservation(draft("3", "2024-06-01", "09:00"))
        .await
        .unwrap();
    app.logout();
    app.register(new_user("c@d.com")).await.unwrap();
    app.add_reservation(draft("1", "2024-06-02", "10:00"))
        .await
        .unwrap();

    app.load_reservations(ReservationScope::All).await.unwrap();
    let state = app.snapshot();
    assert_eq!(state.reservation_scope, ReservationScope::All);
    assert_eq!(state.reservations.len(), 2);

    app.load_reservations(ReservationScope::CurrentUser)
        .await
        .unwrap();
    assert_eq!(app.snapshot().reservations.len(), 1);
}

#[tokio::test]
async fn status_change_on_other_users_reservation_under_scope_all() {
    let app = logged_in().await;
    let theirs = app
        .add_reservation(draft("3", "2024-06-01", "09:00"))
        .await
        .unwrap();
    app.logout();
    app.register(new_user("admin@b.com")).await.unwrap();
    app.load_reservations(ReservationScope::All).await.unwrap();

    let confirmed = app
        .set_reservation_status(&theirs.id, ReservationStatus::Confirmed)
        .await
        .unwrap();

    assert_eq!(confirmed.user_id, theirs.user_id);
    assert_eq!(
        app.snapshot().reservation(&theirs.id).map(|r| r.status),
        Some(ReservationStatus::Confirmed)
    );
}

// =========================================================================
// Courts
// =========================================================================

#[tokio::test]
async fn add_update_delete_court() {
    let app = logged_in().await;

    let court = app.add_court(new_court("Pista 1")).await.unwrap();
    assert_eq!(app.snapshot().courts.len(), 5);

    let mut change = new_court("Pista Central");
    change.capacity = 6;
    let updated = app.update_court(&court.id, change).await.unwrap();
    assert_eq!(updated.created_at, court.created_at);
    assert_eq!(app.snapshot().court(&court.id), Some(&updated));
    assert_eq!(app.snapshot().courts.len(), 5);

    assert!(app.delete_court(&court.id).await.unwrap());
    assert!(app.snapshot().court(&court.id).is_none());
    assert!(app.store().get_court(&court.id).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_court_name_leaves_mirror_unchanged() {
    let app = logged_in().await;
    let before = app.snapshot().courts;

    let err = app
        .add_court(new_court("Cancha de Tenis 1"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicateKey);
    assert_eq!(app.snapshot().courts, before);
    assert_eq!(app.store().all_courts().await.unwrap(), before);
}

#[tokio::test]
async fn invalid_court_is_rejected_before_write() {
    let app = logged_in().await;
    let mut court = new_court("Pista 1");
    court.capacity = 0;

    let err = app.add_court(court).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(app.store().count_courts().await.unwrap(), 4);
}

// =========================================================================
// Write-through atomicity
// =========================================================================

#[tokio::test]
async fn failed_write_leaves_mirror_unchanged() {
    let app = logged_in().await;
    app.add_reservation(draft("3", "2024-06-01", "09:00"))
        .await
        .unwrap();
    let before = app.snapshot();

    app.store().close().await;

    let err = app
        .add_reservation(draft("1", "2024-06-02", "10:00"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert!(app.delete_court("1").await.is_err());

    let after = app.snapshot();
    assert_eq!(after.mirror(), before.mirror());
    assert!(!after.loading);
    assert_eq!(after.error.map(|e| e.kind), Some(ErrorKind::Storage));
}

#[tokio::test]
async fn mirror_matches_store_after_commands() {
    let app = logged_in().await;
    let user_id = app.user().unwrap().id;
    let a = app
        .add_reservation(draft("3", "2024-06-01", "09:00"))
        .await
        .unwrap();
    app.add_reservation(draft("2", "2024-06-01", "10:00"))
        .await
        .unwrap();
    app.set_reservation_status(&a.id, ReservationStatus::Cancelled)
        .await
        .unwrap();
    app.add_court(new_court("Pista 1")).await.unwrap();

    let state = app.snapshot();
    assert_eq!(
        state.reservations,
        app.store().reservations_for_user(&user_id).await.unwrap()
    );
    assert_eq!(state.courts, app.store().all_courts().await.unwrap());
}

#[tokio::test]
async fn logout_during_booking_keeps_mirror_empty() {
    let app = logged_in().await;
    let other = app.clone();

    let (booked, ()) = tokio::join!(
        app.add_reservation(draft("3", "2024-06-01", "09:00")),
        async {
            tokio::task::yield_now().await;
            other.logout();
        }
    );

    // The write itself still lands.
    let booked = booked.unwrap();
    assert!(app.store().get_reservation(&booked.id).await.unwrap().is_some());
    let state = app.snapshot();
    assert_eq!(state.session(), Session::Anonymous);
    assert!(state.reservations.is_empty());
    assert!(state.courts.is_empty());
}

#[tokio::test]
async fn booking_does_not_leak_into_next_users_mirror() {
    let app = logged_in().await;
    let other = app.clone();

    let (booked, registered) = tokio::join!(
        app.add_reservation(draft("3", "2024-06-01", "09:00")),
        async {
            tokio::task::yield_now().await;
            other.logout();
            other.register(new_user("c@d.com")).await
        }
    );
    booked.unwrap();
    let second = registered.unwrap();

    let state = app.snapshot();
    assert_eq!(state.user.map(|u| u.id), Some(second.id.clone()));
    assert!(state.reservations.iter().all(|r| r.user_id == second.id));
}

#[tokio::test]
async fn profile_update_after_logout_does_not_restore_session() {
    let app = logged_in().await;
    let other = app.clone();

    let (updated, ()) = tokio::join!(
        app.update_profile(ProfileUpdate {
            name: Some("Ana María".into()),
            ..ProfileUpdate::default()
        }),
        async {
            tokio::task::yield_now().await;
            other.logout();
        }
    );

    updated.unwrap();
    assert_eq!(app.snapshot().session(), Session::Anonymous);
}

// =========================================================================
// Observers and busy flag
// =========================================================================

#[tokio::test]
async fn observers_see_busy_then_result() {
    let app = courtside().await;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let id = app.observe(move |state| {
        sink.lock()
            .unwrap()
            .push((state.loading, state.is_authenticated()));
    });

    app.register(new_user("a@b.com")).await.unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.first(), Some(&(true, false)));
    assert_eq!(seen.last(), Some(&(false, true)));
    assert!(seen.contains(&(true, true)));
    assert!(app.unobserve(id));
}

#[tokio::test]
async fn unobserved_callback_is_not_called() {
    let app = courtside().await;
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let id = app.observe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    app.unobserve(id);

    app.load_courts().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn busy_flag_clears_after_failure() {
    let app = courtside().await;

    app.add_court(new_court("Pista 1")).await.unwrap_err();

    assert!(!app.is_loading());
}

#[tokio::test]
async fn next_command_clears_error_slot() {
    let app = courtside().await;
    app.add_court(new_court("Pista 1")).await.unwrap_err();
    assert!(app.snapshot().error.is_some());

    app.load_courts().await.unwrap();

    assert!(app.snapshot().error.is_none());
}

#[tokio::test]
async fn subscribers_receive_final_state() {
    let app = courtside().await;
    let mut rx = app.subscribe();

    app.register(new_user("a@b.com")).await.unwrap();

    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert!(state.is_authenticated());
    assert!(!state.loading);
}
