//! 节点公共库
//!
//! 相关节点定义: ComfyUI/comfy/comfy_types/node_typing.py

pub mod category;
pub mod types;

#[cfg(feature = "comfyui")]
pub mod node;
#[cfg(feature = "comfyui")]
mod prompt_server;
#[cfg(feature = "comfyui")]
pub use prompt_server::PromptServer;
#[cfg(feature = "comfyui")]
pub mod tensor;
