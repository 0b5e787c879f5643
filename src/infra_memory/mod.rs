//! In-process store adapters for the `memory` backend and tests.

mod refresh_token_store_memory;
mod revocation_list_memory;
mod ttl_map;

pub use refresh_token_store_memory::*;
pub use revocation_list_memory::*;
pub use ttl_map::*;
