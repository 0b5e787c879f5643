mod refresh_token_store;
mod revocation_list;

pub use refresh_token_store::*;
pub use revocation_list::*;
