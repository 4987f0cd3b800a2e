pub mod kvstore;
pub mod writer;

pub use kvstore::{project_kv, render_kv};
pub use writer::{read_json, render_json, write_all, FileError, RenderedFile};
