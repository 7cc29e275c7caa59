// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Every endpoint here is reachable by anyone holding a token, so inputs are
// validated before any store call and errors never echo record data.

pub mod invoice;
pub mod review;
pub mod utils;

pub use invoice::{invoice_get, invoice_get_lookup, invoice_lookup};
pub use review::{review_get, review_get_lookup, review_lookup};
