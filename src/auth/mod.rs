//! Credential hashing and bearer token handling.

pub mod password;
pub mod token;

pub use password::{CredentialError, hash_password, verify_dummy, verify_password};
pub use token::{Claims, TokenError, TokenIssuer};
