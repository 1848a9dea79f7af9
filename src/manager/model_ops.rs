//! 模型类注册相关方法

use crate::error::QuickModelResult;
use crate::model::ModelClass;
use rat_logger::debug;

use super::ModelRegistry;

impl ModelRegistry {
    /// 注册模型类，同名的已有模型类会被替换
    pub fn register_model_class(&self, class: ModelClass) -> QuickModelResult<()> {
        let name = class.name().to_string();

        if name.is_empty() {
            return Err(crate::quick_error!(config, "模型类名称不能为空"));
        }

        // 检查是否已注册
        if self.model_registry.contains_key(&name) {
            debug!("模型类已存在，将更新: {}", name);
        }

        debug!("注册模型类: 名称={}, 字段数量={}", name, class.definitions().len());
        self.model_registry.insert(name, class);

        Ok(())
    }

    /// 获取模型类
    pub fn get_model_class(&self, name: &str) -> Option<ModelClass> {
        self.model_registry.get(name).map(|class| class.clone())
    }

    /// 检查模型类是否已注册
    pub fn has_model_class(&self, name: &str) -> bool {
        self.model_registry.contains_key(name)
    }

    /// 注销模型类，返回被移除的模型类
    pub fn unregister_model_class(&self, name: &str) -> Option<ModelClass> {
        let removed = self.model_registry.remove(name).map(|(_, class)| class);
        if removed.is_some() {
            debug!("注销模型类: {}", name);
        }
        removed
    }

    /// 获取所有已注册的模型类名称（按名称排序）
    pub fn registered_model_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .model_registry
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }
}
