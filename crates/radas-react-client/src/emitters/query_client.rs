use minijinja::{Value, context};

/// Failed queries are retried this many times, except on validation errors.
pub const MAX_QUERY_RETRIES: u32 = 3;

/// Minutes a query result stays fresh.
pub const STALE_MINUTES: u32 = 5;

/// Context for `queryClient.ts`. The module does not depend on the IR.
pub fn query_client_context() -> Value {
    context! {
        max_retries => MAX_QUERY_RETRIES,
        stale_minutes => STALE_MINUTES,
    }
}
