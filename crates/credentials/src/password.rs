use crate::error::CredentialError;
use core_types::Password;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

/// Characters a generated password may contain. Quote characters and backslashes
/// are deliberately absent.
pub const PASSWORD_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!#%&";

pub const DEFAULT_PASSWORD_LENGTH: usize = 20;

/// Largest multiple of the alphabet size that fits in a byte. Bytes at or above it
/// are discarded so that every symbol is equally likely.
const ACCEPT_BELOW: u8 = (256 - 256 % PASSWORD_ALPHABET.len()) as u8;

/// Generates a password of `length` characters from the OS random source.
pub fn generate_password(length: usize) -> Result<Password, CredentialError> {
    generate_password_with(&mut OsRng, length)
}

/// Same as [`generate_password`] but with a caller-supplied cryptographic RNG.
pub fn generate_password_with<R>(rng: &mut R, length: usize) -> Result<Password, CredentialError>
where
    R: RngCore + CryptoRng,
{
    if length == 0 {
        return Err(CredentialError::InvalidLength);
    }

    let mut secret = String::with_capacity(length);
    let mut buf = [0u8; 64];
    while secret.len() < length {
        rng.try_fill_bytes(&mut buf)?;
        for &b in buf.iter().filter(|&&b| b < ACCEPT_BELOW) {
            if secret.len() == length {
                break;
            }
            secret.push(PASSWORD_ALPHABET[(b as usize) % PASSWORD_ALPHABET.len()] as char);
        }
    }

    Ok(Password::new(secret))
}
