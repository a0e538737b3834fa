//! Account passwords.
//!
//! `register` hashes here before a user record is written, and `login`
//! checks a typed password against the stored `password_hash`. Nothing
//! else in the crate handles plaintext.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

/// PHC string (`$argon2id$...`) for a new account password, salted per user.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Whether `password` matches a user's stored hash.
///
/// A wrong password is `Ok(false)`. A stored value that is not a PHC string
/// means the user row is corrupt and is reported as an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, Error> {
    let stored = PasswordHash::new(stored_hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}
