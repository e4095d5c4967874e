pub mod common;
pub mod host;
pub mod ini;
pub mod trimmer;
