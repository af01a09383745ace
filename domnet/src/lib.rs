// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

pub use handlers::{BuildConfig, build_network, expand_path, format_similarity, write_outputs};
