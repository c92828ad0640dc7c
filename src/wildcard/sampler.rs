//! 多分类提示词采样
//!
//! 每个批次位置从每个启用的分类中各取一个选项, 按分类顺序以 `", "` 拼接。
//!
//! - 随机数生成器每次调用只按种子初始化一次, 固定种子与词表时输出确定
//! - 不允许重复时, 每个分类维护一个已使用窗口, 窗口用尽后清空重新开始
//! - 不允许重复且存在启用分类时, 批次大小不超过最大分类的选项数

use std::collections::{HashMap, HashSet};

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::wildcard::{
    category::{key_base, Category},
    mode::SelectionMode,
};

/// 字段分隔符
pub const FIELD_DELIMITER: &str = ", ";

/// 批量参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRequest {
    pub batch_size: usize,
    pub seed: u64,
    pub allow_duplicates: bool,
}

impl Default for BatchRequest {
    fn default() -> Self {
        Self {
            batch_size: 1,
            seed: 0,
            allow_duplicates: false,
        }
    }
}

impl BatchRequest {
    pub fn new(batch_size: usize, seed: u64, allow_duplicates: bool) -> Self {
        Self {
            batch_size,
            seed,
            allow_duplicates,
        }
    }
}

/// 已使用选项窗口
#[derive(Debug, Clone, Default)]
pub struct ExhaustionSet {
    used: HashSet<String>,
    distinct: usize,
}

impl ExhaustionSet {
    pub fn new(values: &[&str]) -> Self {
        let distinct = values.iter().collect::<HashSet<_>>().len();
        Self {
            used: HashSet::with_capacity(distinct),
            distinct,
        }
    }

    /// 所有不同的值都已使用时清空窗口
    pub fn reset_if_exhausted(&mut self) {
        if self.used.len() >= self.distinct {
            self.used.clear();
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.used.contains(value)
    }

    pub fn mark(&mut self, value: &str) {
        self.used.insert(value.to_string());
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

/// 分类与其选择模式
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub category: &'a Category,
    pub mode: SelectionMode,
}

impl<'a> Selection<'a> {
    pub fn new(category: &'a Category, mode: SelectionMode) -> Self {
        Self { category, mode }
    }

    /// 按节点输入值为每个分类确定选择模式
    ///
    /// 输入名称按去除数量后缀后的名称匹配, 词表行数变化后之前保存的输入仍然有效
    pub fn from_widgets(categories: &'a [Category], widgets: &HashMap<String, String>) -> Vec<Self> {
        let widgets: HashMap<&str, &str> = widgets
            .iter()
            .map(|(k, v)| (key_base(k), v.as_str()))
            .collect();

        categories
            .iter()
            .map(|category| {
                let mode = widgets
                    .get(key_base(&category.key))
                    .map(|v| SelectionMode::from_widget(v))
                    .unwrap_or_default();
                Selection::new(category, mode)
            })
            .collect()
    }
}

/// 单次调用中每个分类的状态
struct Slot<'a> {
    category: &'a Category,
    mode: &'a SelectionMode,
    contents: Vec<&'a str>,
    window: Option<ExhaustionSet>,
}

impl<'a> Slot<'a> {
    fn new(selection: &'a Selection<'a>, allow_duplicates: bool) -> Self {
        let contents = selection.category.contents();
        let window = if !allow_duplicates && selection.mode.is_active() && !contents.is_empty() {
            Some(ExhaustionSet::new(&contents))
        } else {
            None
        };
        Self {
            category: selection.category,
            mode: &selection.mode,
            contents,
            window,
        }
    }

    fn is_active(&self) -> bool {
        self.mode.is_active() && !self.contents.is_empty()
    }

    fn pick<R: Rng>(&mut self, index: usize, rng: &mut R) -> Option<&'a str> {
        match self.mode {
            SelectionMode::Disabled => None,
            SelectionMode::Explicit(title) => self.category.content_by_title(title),
            SelectionMode::Random => self.pick_random(rng),
            SelectionMode::Ordered => self.pick_ordered(index),
        }
    }

    fn pick_random<R: Rng>(&mut self, rng: &mut R) -> Option<&'a str> {
        if self.contents.is_empty() {
            return None;
        }

        let window = match &mut self.window {
            Some(window) => window,
            None => return Some(self.contents[rng.random_range(0..self.contents.len())]),
        };

        window.reset_if_exhausted();
        let available: Vec<&'a str> = self
            .contents
            .iter()
            .copied()
            .filter(|v| !window.contains(v))
            .collect();
        if available.is_empty() {
            return None;
        }

        let chosen = available[rng.random_range(0..available.len())];
        window.mark(chosen);
        Some(chosen)
    }

    fn pick_ordered(&mut self, index: usize) -> Option<&'a str> {
        let len = self.contents.len();
        if len == 0 {
            return None;
        }

        let index = index % len;
        let current = self.contents[index];

        let window = match &mut self.window {
            Some(window) => window,
            None => return Some(current),
        };

        window.reset_if_exhausted();
        if !window.contains(current) {
            window.mark(current);
            return Some(current);
        }

        // 从当前位置向后查找第一个未使用的值
        for offset in 0..len {
            let value = self.contents[(index + offset) % len];
            if !window.contains(value) {
                window.mark(value);
                return Some(value);
            }
        }
        None
    }
}

/// 提示词采样器
#[derive(Debug, Clone)]
pub struct PromptSampler {
    delimiter: String,
}

impl Default for PromptSampler {
    fn default() -> Self {
        Self {
            delimiter: FIELD_DELIMITER.to_string(),
        }
    }
}

impl PromptSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 实际批次大小
    pub fn effective_batch_size(selections: &[Selection<'_>], request: &BatchRequest) -> usize {
        if request.allow_duplicates {
            return request.batch_size;
        }

        let max_active = selections
            .iter()
            .filter(|v| v.mode.is_active() && !v.category.is_empty())
            .map(|v| v.category.len())
            .max();
        match max_active {
            Some(max) => request.batch_size.min(max),
            None => request.batch_size,
        }
    }

    /// 生成一批提示词, 结果至少包含一个元素
    pub fn sample(&self, selections: &[Selection<'_>], request: &BatchRequest) -> Vec<String> {
        let mut rng = ChaCha8Rng::seed_from_u64(request.seed);

        let mut slots: Vec<Slot> = selections
            .iter()
            .map(|v| Slot::new(v, request.allow_duplicates))
            .collect();

        let batch_size = Self::effective_batch_size(selections, request);
        debug!(
            "sample prompts, batch size: {batch_size}/{}, active categories: {}",
            request.batch_size,
            slots.iter().filter(|v| v.is_active()).count()
        );

        let mut prompts = Vec::with_capacity(batch_size);
        for index in 0..batch_size {
            let parts: Vec<&str> = slots
                .iter_mut()
                .filter_map(|slot| slot.pick(index, &mut rng))
                .collect();

            if !parts.is_empty() {
                prompts.push(parts.join(&self.delimiter));
            }
        }

        if prompts.is_empty() {
            return vec![String::new()];
        }
        prompts
    }
}
