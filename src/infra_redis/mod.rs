mod refresh_token_store_redis;
mod revocation_list_redis;

pub use refresh_token_store_redis::*;
pub use revocation_list_redis::*;

use std::time::Duration;

/// Redis rejects a zero expiry, so round up to one millisecond.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}
