//! 类型定义
//! 相关节点定义: ComfyUI/comfy/comfy_types/node_typing.py

pub const NODE_INT: &str = "INT";
pub const NODE_FLOAT: &str = "FLOAT";
pub const NODE_STRING: &str = "STRING";
pub const NODE_BOOLEAN: &str = "BOOLEAN";
pub const NODE_IMAGE: &str = "IMAGE";

/// 种子最大值
pub const NODE_SEED_MAX: u64 = 0xffffffffffffffffu64;
/// 批次最大值
pub const NODE_BATCH_MAX: usize = 1000;
