pub use super::complaints::Entity as Complaints;
pub use super::students::Entity as Students;
