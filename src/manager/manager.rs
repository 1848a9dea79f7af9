//! 模型类注册表核心定义

use crate::model::ModelClass;
use dashmap::DashMap;
use rat_logger::info;
use std::sync::Arc;

/// 模型类注册表 - 按名称管理已编译的模型类
#[derive(Debug)]
pub struct ModelRegistry {
    /// 模型类映射 (模型名 -> 模型类)
    pub(crate) model_registry: Arc<DashMap<String, ModelClass>>,
}

impl ModelRegistry {
    /// 创建新的模型类注册表
    pub fn new() -> Self {
        info!("创建模型类注册表");

        Self {
            model_registry: Arc::new(DashMap::new()),
        }
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
