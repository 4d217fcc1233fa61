pub mod write_reports;

pub use write_reports::{save_reports, write_reports};
