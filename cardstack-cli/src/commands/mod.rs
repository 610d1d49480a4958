mod config_cmd;
mod save_cmd;
mod stack;

pub use config_cmd::ConfigCommand;
pub use save_cmd::SaveCommand;
pub use stack::{SelectCommand, ShowCommand, SwipeCommand};
