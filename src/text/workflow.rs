//! 工作流节点控件值
//!
//! 将显示的提示词写回工作流中对应节点的 `widgets_values`,
//! 保存图片时 PNG 元数据中的工作流会包含该内容。

use serde_json::Value;

/// 节点 id 可能是数字或字符串
fn node_id_matches(id: &Value, node_id: &str) -> bool {
    match id {
        Value::String(v) => v == node_id,
        Value::Number(v) => v.to_string() == node_id,
        _ => false,
    }
}

/// 更新工作流中指定节点的控件值
///
/// 返回是否找到该节点
pub fn apply_widget_values(workflow: &mut Value, node_id: &str, values: &[String]) -> bool {
    let nodes = match workflow.get_mut("nodes").and_then(Value::as_array_mut) {
        Some(nodes) => nodes,
        None => return false,
    };

    let mut found = false;
    for node in nodes.iter_mut() {
        let matched = node
            .get("id")
            .map(|id| node_id_matches(id, node_id))
            .unwrap_or(false);
        if !matched {
            continue;
        }

        if let Some(node) = node.as_object_mut() {
            node.insert(
                "widgets_values".to_string(),
                Value::Array(values.iter().cloned().map(Value::String).collect()),
            );
            found = true;
        }
    }
    found
}
