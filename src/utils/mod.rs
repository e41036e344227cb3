pub mod environment;
pub mod paths;

pub use environment::get_data_dir;
pub use paths::{expand_tilde, normalize_lexically, project_hash};
