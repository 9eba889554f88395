pub mod gradebook_handler;
pub mod session_handler;
