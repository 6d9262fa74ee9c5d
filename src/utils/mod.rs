pub mod paths;
pub mod preview;

pub use paths::{get_app_dir, get_config_path, get_history_path};
pub use preview::{preview_line, strip_ansi_codes};
