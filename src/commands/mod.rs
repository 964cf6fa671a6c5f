mod analyze;
mod discover;

pub use analyze::run_analyze;
pub use discover::run_discover;
