pub mod analyze;
pub mod generate;

pub use analyze::analyze_command;
pub use generate::generate_command;
