use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Token missing subject")]
    MissingSubject,

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),
}
