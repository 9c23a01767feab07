//! # Credentials Crate
//!
//! Generates the passwords handed to newly created database users.
//!
//! Every character is drawn independently and uniformly from [`PASSWORD_ALPHABET`]
//! using the operating system CSPRNG. If that source fails, the error is returned;
//! there is no fallback to a weaker generator.

pub mod error;
pub mod password;

pub use error::CredentialError;
pub use password::{
    DEFAULT_PASSWORD_LENGTH, PASSWORD_ALPHABET, generate_password, generate_password_with,
};
