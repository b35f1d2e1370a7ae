pub mod channel;
pub mod command;
pub mod push;
