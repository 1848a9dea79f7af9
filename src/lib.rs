//! rat_quickmodel - 轻量级模型定义库
//!
//! 通过声明式的字段定义描述模型（类型、默认值、存储列名、验证规则），
//! 把松散类型的输入统一转换为标准类型，并按字段汇总验证失败。
//! 只在内存中计算和验证，不涉及持久化与网络。

// 导出所有公共模块
pub mod error;
pub mod types;
pub mod datatypes;
pub mod validation;
pub mod model;
pub mod manager;
pub mod config;
pub mod i18n;

// 重新导出常用类型和函数
pub use error::{QuickModelError, QuickModelResult};
pub use types::*;
pub use model::{
    Definition, FieldSchema, Model, ModelClass, ModelClassBuilder, ModelValidationError, RawSchema,
    ToDataValue, ValidationFailure, array_field, boolean_field, custom_field, date_field,
    enum_field, float_field, integer_field, list_field, mixed_field, object_field, string_field,
};
pub use manager::{
    get_model_class, has_model_class, register_model_class, registered_model_names,
    unregister_model_class,
};
pub use config::{
    AppConfig, AppConfigBuilder, Environment, GlobalConfig, GlobalConfigBuilder, LogLevel,
    LoggingConfig, LoggingConfigBuilder,
};

// 日志系统导入
use rat_logger::{LoggerBuilder, handler::term::TermConfig, info};

// 条件编译调试宏 - 只有在 debug 模式下才输出调试信息
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        rat_logger::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        // 在 release 模式下不输出调试信息
    };
}

/// 初始化rat_quickmodel库
///
/// 注册多语言错误消息，并从 `RAT_LANG` / `LANG` 环境变量选择语言
///
/// 注意：日志系统由调用者自行初始化，本库不会自动初始化日志
pub fn init() {
    i18n::ErrorMessageI18n::init();
}

/// 按配置初始化库
///
/// 使用配置中的语言；`logging.console` 为 true 时安装终端日志输出
pub fn init_with_config(config: &GlobalConfig) -> QuickModelResult<()> {
    i18n::ErrorMessageI18n::apply_language(&config.app.language);

    if config.logging.console {
        LoggerBuilder::new()
            .with_level(config.logging.level.to_level_filter())
            .add_terminal_with_config(TermConfig::default())
            .init()
            .map_err(|e| crate::quick_error!(config, format!("日志初始化失败: {}", e)))?;
    }

    info!(
        "{} 初始化完成: 应用={}, 环境={:?}",
        get_info(),
        config.app.name,
        config.app.environment
    );
    Ok(())
}

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
