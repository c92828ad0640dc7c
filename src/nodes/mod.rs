//! ComfyUI 节点
use log::info;
use pyo3::{
    types::{PyModule, PyModuleMethods},
    Bound, PyResult, Python,
};

use crate::{core::node::NodeRegister, wildcard::library::node_class_name};

mod inputs;

mod prompt_list;
pub use prompt_list::PromptList;

mod all_in_one;
pub use all_in_one::AllInOne;

mod prompt_concat;
pub use prompt_concat::PromptConcat;

mod prompt_builder;
pub use prompt_builder::PromptBuilder;

mod keyword_picker;
pub use keyword_picker::KeywordPicker;

mod custom_list_manager;
pub use custom_list_manager::CustomListManager;

mod show_prompt;
pub use show_prompt::ShowPrompt;

mod text_input;
pub use text_input::TextInput;

mod prompt_generator;
pub use prompt_generator::PromptGenerator;

mod ollama_vision;
pub use ollama_vision::{ollama_models, OllamaVision};

/// 节点模块
pub fn submodule(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    let submodule = PyModule::new(py, "nodes")?;
    submodule.add_class::<PromptList>()?;
    submodule.add_class::<AllInOne>()?;
    submodule.add_class::<PromptConcat>()?;
    submodule.add_class::<PromptBuilder>()?;
    submodule.add_class::<KeywordPicker>()?;
    submodule.add_class::<CustomListManager>()?;
    submodule.add_class::<ShowPrompt>()?;
    submodule.add_class::<TextInput>()?;
    submodule.add_class::<PromptGenerator>()?;
    submodule.add_class::<OllamaVision>()?;
    Ok(submodule)
}

/// Node register
///
/// 数据目录下的每个子目录注册一个词表节点, 其后是固定节点
pub fn node_register(py: Python<'_>) -> PyResult<Vec<NodeRegister<'_>>> {
    let mut nodes: Vec<NodeRegister> = Vec::new();

    let folders = inputs::wildcard_library().subfolders();
    info!("prompt list folders: {folders:?}");
    for folder in folders {
        let name = node_class_name(&folder);
        nodes.push(NodeRegister::new(
            name.clone(),
            PromptList::folder_type(py, &folder)?,
            name,
        ));
    }

    nodes.extend(vec![
        NodeRegister::new(
            "WildPromptor_AllInOne",
            py.get_type::<AllInOne>(),
            "WildPromptor All-in-One 📋+🔀",
        ),
        NodeRegister::new(
            "PromptConcat",
            py.get_type::<PromptConcat>(),
            "Prompt Concat 🔀",
        ),
        NodeRegister::new(
            "PromptBuilder",
            py.get_type::<PromptBuilder>(),
            "Prompt Builder 🔀",
        ),
        NodeRegister::new(
            "KeywordPicker",
            py.get_type::<KeywordPicker>(),
            "Keyword Picker 🔀",
        ),
        NodeRegister::new(
            "CustomListManager",
            py.get_type::<CustomListManager>(),
            "Custom List Manager 📝",
        ),
        NodeRegister::new(
            "WildPromptor_ShowPrompt",
            py.get_type::<ShowPrompt>(),
            "Show Prompt 📃",
        ),
        NodeRegister::new(
            "WildPromptor_TextInput",
            py.get_type::<TextInput>(),
            "Text Input ⌨️",
        ),
        NodeRegister::new(
            "WildPromptorAI",
            py.get_type::<PromptGenerator>(),
            "Prompt Generator 🤖(WildPromptor)",
        ),
        NodeRegister::new(
            "WildPromptorOllamaVision",
            py.get_type::<OllamaVision>(),
            "Ollama Vision 🤖👁️(WildPromptor)",
        ),
    ]);
    Ok(nodes)
}
