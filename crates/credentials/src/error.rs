use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Secure random source unavailable: {0}")]
    RngUnavailable(#[from] rand::Error),

    #[error("Password length must be at least 1")]
    InvalidLength,
}
