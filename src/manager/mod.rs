//! 模型类注册表模块
//!
//! 进程内共享的模型类注册表，供持久化等外部协作方按名称取回模型类并还原实例

mod manager;
mod model_ops;

// 重新导出主要类型
pub use manager::ModelRegistry;

use crate::error::QuickModelResult;
use crate::model::ModelClass;
use once_cell::sync::Lazy;

/// 全局模型类注册表实例
pub static GLOBAL_MODEL_REGISTRY: Lazy<ModelRegistry> = Lazy::new(ModelRegistry::new);

/// 获取全局模型类注册表
pub(crate) fn get_global_registry() -> &'static ModelRegistry {
    &GLOBAL_MODEL_REGISTRY
}

/// 便捷函数 - 注册模型类
pub fn register_model_class(class: ModelClass) -> QuickModelResult<()> {
    get_global_registry().register_model_class(class)
}

/// 便捷函数 - 获取模型类
pub fn get_model_class(name: &str) -> Option<ModelClass> {
    get_global_registry().get_model_class(name)
}

/// 便捷函数 - 检查模型类是否已注册
pub fn has_model_class(name: &str) -> bool {
    get_global_registry().has_model_class(name)
}

/// 便捷函数 - 注销模型类
pub fn unregister_model_class(name: &str) -> Option<ModelClass> {
    get_global_registry().unregister_model_class(name)
}

/// 便捷函数 - 获取所有已注册的模型类名称
pub fn registered_model_names() -> Vec<String> {
    get_global_registry().registered_model_names()
}
