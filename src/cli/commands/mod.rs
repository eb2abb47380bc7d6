mod check;
mod complaints;
mod init;
mod students;
mod sweep;

pub use check::cmd_check;
pub use complaints::cmd_list_complaints;
pub use init::cmd_init;
pub use students::cmd_list_students;
pub use sweep::cmd_sweep_photos;
