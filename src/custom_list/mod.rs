//! 自定义词表
pub mod manager;

pub use manager::{CustomListManager, ListAction, ListOutcome, ListRequest};
