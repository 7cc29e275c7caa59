pub mod public_lookup;

pub use public_lookup::{InvoiceProjection, PublicInvoiceView, PublicLookupService, PublicReviewView, ReviewProjection};
