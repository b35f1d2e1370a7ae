pub mod dev;
pub mod process;
