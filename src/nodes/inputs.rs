//! 节点输入辅助函数

use std::collections::HashMap;

use pyo3::{
    types::{PyAnyMethods, PyDict, PyDictMethods},
    Bound, FromPyObject, PyResult, Python,
};

use crate::{
    config::{plugin_root, Config},
    core::types::{NODE_BATCH_MAX, NODE_BOOLEAN, NODE_INT, NODE_SEED_MAX},
    error::Error,
    wildcard::{BatchRequest, Category, PickMode, PromptSampler, Selection, WildcardLibrary},
};

/// 当前配置下的词表库
pub fn wildcard_library() -> WildcardLibrary {
    WildcardLibrary::from_config(Config::global(), plugin_root())
}

/// 读取关键字参数, 不存在或为 None 时返回 None
pub fn kwarg<'py, T>(kwargs: Option<&Bound<'py, PyDict>>, key: &str) -> Result<Option<T>, Error>
where
    T: FromPyObject<'py>,
{
    let kwargs = match kwargs {
        Some(kwargs) => kwargs,
        None => return Ok(None),
    };
    match kwargs.get_item(key)? {
        Some(value) if !value.is_none() => Ok(Some(value.extract::<T>()?)),
        _ => Ok(None),
    }
}

/// 字符串类型的关键字参数
pub fn string_kwargs(kwargs: Option<&Bound<'_, PyDict>>) -> HashMap<String, String> {
    let mut values = HashMap::new();
    let kwargs = match kwargs {
        Some(kwargs) => kwargs,
        None => return values,
    };
    for (key, value) in kwargs.iter() {
        if let (Ok(key), Ok(value)) = (key.extract::<String>(), value.extract::<String>()) {
            values.insert(key, value);
        }
    }
    values
}

/// 每个分类一个下拉框: 固定模式 + 选项标题
pub fn add_category_inputs<'py>(
    py: Python<'py>,
    optional: &Bound<'py, PyDict>,
    categories: &[Category],
) -> PyResult<()> {
    for category in categories {
        let mut options = PickMode::labels();
        options.extend(category.titles());
        optional.set_item(
            &category.key,
            (options, {
                let mode = PyDict::new(py);
                mode.set_item("default", PickMode::Disabled.to_string())?;
                mode
            }),
        )?;
    }
    Ok(())
}

/// 批量参数输入
pub fn add_batch_inputs<'py>(
    py: Python<'py>,
    optional: &Bound<'py, PyDict>,
    allow_duplicates: bool,
) -> PyResult<()> {
    optional.set_item(
        "batch_size",
        (NODE_INT, {
            let batch_size = PyDict::new(py);
            batch_size.set_item("default", 1)?;
            batch_size.set_item("min", 1)?;
            batch_size.set_item("max", NODE_BATCH_MAX)?;
            batch_size
        }),
    )?;
    optional.set_item(
        "allow_duplicates",
        (NODE_BOOLEAN, {
            let options = PyDict::new(py);
            options.set_item("default", allow_duplicates)?;
            options
        }),
    )?;
    optional.set_item(
        "seed",
        (NODE_INT, {
            let seed = PyDict::new(py);
            seed.set_item("default", 0)?;
            seed.set_item("min", 0)?;
            seed.set_item("max", NODE_SEED_MAX)?;
            seed
        }),
    )?;
    Ok(())
}

/// 读取批量参数
pub fn batch_request(
    kwargs: Option<&Bound<'_, PyDict>>,
    allow_duplicates: bool,
) -> Result<BatchRequest, Error> {
    Ok(BatchRequest::new(
        kwarg::<usize>(kwargs, "batch_size")?.unwrap_or(1),
        kwarg::<u64>(kwargs, "seed")?.unwrap_or_default(),
        kwarg::<bool>(kwargs, "allow_duplicates")?.unwrap_or(allow_duplicates),
    ))
}

/// 按节点输入对分类采样
pub fn sample_categories(
    categories: &[Category],
    kwargs: Option<&Bound<'_, PyDict>>,
    allow_duplicates: bool,
) -> Result<Vec<String>, Error> {
    let selections = Selection::from_widgets(categories, &string_kwargs(kwargs));
    let request = batch_request(kwargs, allow_duplicates)?;
    Ok(PromptSampler::new().sample(&selections, &request))
}
