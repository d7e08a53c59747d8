pub mod activity;
pub mod business_profile;
pub mod invoice;
pub mod template;
pub mod user;

pub use activity::ActivityLogRepository;
pub use business_profile::BusinessProfileRepository;
pub use invoice::InvoiceRepository;
pub use template::InvoiceTemplateRepository;
pub use user::UserRepository;
