pub mod callback;
pub mod command;
