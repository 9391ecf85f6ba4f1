pub mod log_file;

pub use log_file::{LogFile, LogFileLoader};
