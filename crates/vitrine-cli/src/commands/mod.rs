pub mod config;
pub mod names;
pub mod recommend;
pub mod shell;
pub mod status;

pub use names::list_names;
pub use recommend::{run_recommend, Target};
pub use shell::run_shell;
pub use status::show_status;
