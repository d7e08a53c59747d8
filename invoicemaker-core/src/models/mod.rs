pub mod activity;
pub mod business_profile;
pub mod id;
pub mod invoice;
pub mod template;
pub mod user;

pub use activity::ActivityLog;
pub use business_profile::BusinessProfile;
pub use id::{generate_id, InvoiceId, ProfileId, UserId};
pub use invoice::{Invoice, LineItem};
pub use template::InvoiceTemplate;
pub use user::{User, UserRole};
