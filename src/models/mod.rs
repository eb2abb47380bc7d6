pub mod complaint;
pub mod student;
