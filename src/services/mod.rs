pub mod cleanup;
pub use cleanup::{OrphanPhotoSweeper, SweepReport};

pub mod credentials;
pub use credentials::{Argon2PasswordEncoder, PasswordEncoder};

pub mod photo;
pub use photo::{PhotoError, PhotoStore};

pub mod student_service;
pub mod student_service_impl;
pub use student_service::{StudentError, StudentService};
pub use student_service_impl::SeaOrmStudentService;

pub mod complaint_service;
pub mod complaint_service_impl;
pub use complaint_service::{ComplaintError, ComplaintService};
pub use complaint_service_impl::SeaOrmComplaintService;
