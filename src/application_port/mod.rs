mod auth_service;
mod credential_verifier;
mod token_codec;

pub use auth_service::*;
pub use credential_verifier::*;
pub use token_codec::*;
