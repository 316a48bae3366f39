pub mod addressing;
pub mod file_locator;
pub mod metadata;
