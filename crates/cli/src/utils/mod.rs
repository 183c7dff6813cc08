pub mod file;

pub use file::collect_swift_files;
