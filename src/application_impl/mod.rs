mod auth_pipeline;
mod credential_verifier_fake;
mod credential_verifier_impl;
mod reissue_protocol;
mod session_policy;
mod store_guard;
mod token_codec_jwt;

#[cfg(test)]
mod test_support;

pub use auth_pipeline::*;
pub use credential_verifier_fake::*;
pub use credential_verifier_impl::*;
pub use reissue_protocol::*;
pub use session_policy::*;
pub use token_codec_jwt::*;
