pub mod business;
pub mod invoice;
pub mod review;

pub use business::{BusinessProfile, BusinessSettings, UserAccount};
pub use invoice::{InvoiceRecord, InvoiceStatus};
pub use review::{ReviewRecord, ReviewStatus};
