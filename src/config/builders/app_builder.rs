//! # 应用配置构建器模块
//!
//! 提供应用配置的构建器实现，支持链式调用和严格验证

use crate::config::core::{AppConfig, Environment};
use crate::error::QuickModelError;
use rat_logger::info;

/// 应用配置构建器
#[derive(Debug)]
pub struct AppConfigBuilder {
    name: Option<String>,
    environment: Option<Environment>,
    language: Option<String>,
}
impl AppConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            name: None,
            environment: None,
            language: None,
        }
    }

    /// 设置应用名称
    ///
    /// # 参数
    ///
    /// * `name` - 应用名称
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 设置环境类型
    ///
    /// # 参数
    ///
    /// * `environment` - 环境类型
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// 设置错误消息语言
    ///
    /// # 参数
    ///
    /// * `language` - 语言代码，如 zh-CN、en-US、ja-JP
    pub fn language<S: Into<String>>(mut self, language: S) -> Self {
        self.language = Some(language.into());
        self
    }

    /// 构建应用配置
    ///
    /// # 错误
    ///
    /// 如果任何必需的配置项未设置，将返回错误
    pub fn build(self) -> Result<AppConfig, QuickModelError> {
        let name = self
            .name
            .ok_or_else(|| crate::quick_error!(config, "应用名称必须设置"))?;

        if name.trim().is_empty() {
            return Err(crate::quick_error!(config, "应用名称不能为空"));
        }

        let environment = self
            .environment
            .ok_or_else(|| crate::quick_error!(config, "环境类型必须设置"))?;

        let language = self
            .language
            .ok_or_else(|| crate::quick_error!(config, "语言必须设置"))?;

        info!(
            "创建应用配置: 名称={}, 环境={:?}, 语言={}",
            name, environment, language
        );

        Ok(AppConfig {
            name,
            environment,
            language,
        })
    }
}
impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
