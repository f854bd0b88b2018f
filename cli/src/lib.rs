pub mod screen_cmd;

pub use screen_cmd::{ScreenCli, ScreenSubcommand, exit_codes};
