//! 工具

pub mod encoding;
pub mod image;
pub mod log;
