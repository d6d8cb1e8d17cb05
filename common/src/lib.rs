pub mod error;
pub mod models;

pub use error::{Error, FetchStage};
pub type Result<T> = std::result::Result<T, Error>;
