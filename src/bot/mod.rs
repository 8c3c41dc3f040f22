pub mod command;
pub mod handlers;
pub mod telegram;

pub use command::{help_text, Command};
pub use handlers::CommandHandler;
