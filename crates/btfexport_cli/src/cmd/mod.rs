/// JSON export command.
pub mod export;
