//! 错误类型定义模块
//!
//! 区分两类错误：
//! - 配置错误（字段类型无效、多个主键、验证规则引用无效等），在模型类编译时立即返回
//! - 模型验证错误，由 `Model::validate` 汇总后一次性返回

use crate::model::validation_error::ModelValidationError;
use thiserror::Error;

/// 库统一错误类型
#[derive(Error, Debug)]
pub enum QuickModelError {
    /// 字段类型缺失或无法识别
    #[error("字段类型无效: {}", .datatype.as_deref().unwrap_or("null"))]
    InvalidDatatype {
        /// 字段名
        field: String,
        /// 声明的类型（缺失时为 None）
        datatype: Option<String>,
    },

    /// 同一模型声明了多个主键
    #[error("不能设置多个主键: {existing} 与 {field}")]
    MultiplePrimaryKeys {
        /// 已经声明为主键的字段
        existing: String,
        /// 再次声明主键的字段
        field: String,
    },

    /// 验证规则名称在规则库中不存在
    #[error("{rule} is not a validation function")]
    ValidationRuleNotFound {
        /// 字段名
        field: String,
        /// 规则名称
        rule: String,
    },

    /// 验证规则既不是名称也不是可调用对象
    #[error("{rule} is not a function or string")]
    ValidationRuleNotCallable {
        /// 字段名
        field: String,
        /// 规则的文本表示
        rule: String,
    },

    /// 正则参数既不是字符串也不是已编译的正则
    #[error("正则参数无效: {pattern}")]
    InvalidPattern {
        /// 参数的文本表示
        pattern: String,
    },

    /// 实例方法或静态方法不存在
    #[error("方法未找到: {name}")]
    MethodNotFound {
        /// 方法名
        name: String,
    },

    /// 模型验证失败（汇总错误）
    #[error(transparent)]
    ModelValidation(#[from] ModelValidationError),

    /// 配置错误
    #[error("配置错误: {message}")]
    ConfigError {
        /// 错误描述
        message: String,
    },

    /// 序列化错误
    #[error("序列化错误: {message}")]
    SerializationError {
        /// 错误描述
        message: String,
    },

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),
}

impl QuickModelError {
    /// 机器可读的错误码
    pub fn code(&self) -> &'static str {
        match self {
            QuickModelError::InvalidDatatype { .. } => "DATATYPE_NOT_VALID",
            QuickModelError::MultiplePrimaryKeys { .. } => "CANNOT_SET_MULTIPLE_PRIMARY_KEYS",
            QuickModelError::ValidationRuleNotFound { .. } => "VALIDATION_RULE_NOT_FOUND",
            QuickModelError::ValidationRuleNotCallable { .. } => "VALIDATION_RULE_NOT_CALLABLE",
            QuickModelError::InvalidPattern { .. } => "SETREGEX_NOT_REGEXP_OR_STRING",
            QuickModelError::MethodNotFound { .. } => "METHOD_NOT_FOUND",
            QuickModelError::ModelValidation(_) => "MODEL_VALIDATION_FAILED",
            QuickModelError::ConfigError { .. } => "CONFIG_ERROR",
            QuickModelError::SerializationError { .. } => "SERIALIZATION_ERROR",
            QuickModelError::IoError(_) => "IO_ERROR",
        }
    }

    /// 按当前语言输出的错误描述
    pub fn localized_message(&self) -> String {
        use crate::i18n::localized;

        match self {
            QuickModelError::InvalidDatatype { field, datatype } => localized(
                "error.invalid_datatype",
                &[("field", field), ("datatype", datatype.as_deref().unwrap_or("null"))],
            ),
            QuickModelError::MultiplePrimaryKeys { existing, field } => localized(
                "error.multiple_primary_keys",
                &[("existing", existing), ("field", field)],
            ),
            QuickModelError::ValidationRuleNotFound { field, rule } => {
                localized("error.rule_not_found", &[("field", field), ("rule", rule)])
            }
            QuickModelError::ValidationRuleNotCallable { field, rule } => {
                localized("error.rule_not_callable", &[("field", field), ("rule", rule)])
            }
            QuickModelError::MethodNotFound { name } => {
                localized("error.method_not_found", &[("name", name)])
            }
            QuickModelError::ModelValidation(err) => err.trace(),
            QuickModelError::ConfigError { message } => {
                localized("error.config", &[("message", message)])
            }
            QuickModelError::SerializationError { message } => {
                localized("error.serialization", &[("message", message)])
            }
            QuickModelError::InvalidPattern { .. } | QuickModelError::IoError(_) => self.to_string(),
        }
    }

    /// 是否为模型定义阶段的配置错误
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            QuickModelError::InvalidDatatype { .. }
                | QuickModelError::MultiplePrimaryKeys { .. }
                | QuickModelError::ValidationRuleNotFound { .. }
                | QuickModelError::ValidationRuleNotCallable { .. }
                | QuickModelError::ConfigError { .. }
        )
    }
}

impl From<serde_json::Error> for QuickModelError {
    fn from(err: serde_json::Error) -> Self {
        QuickModelError::SerializationError {
            message: err.to_string(),
        }
    }
}

/// 库统一结果类型
pub type QuickModelResult<T> = Result<T, QuickModelError>;

/// 便捷宏：构造常用错误
#[macro_export]
macro_rules! quick_error {
    (config, $msg:expr) => {
        $crate::error::QuickModelError::ConfigError {
            message: $msg.to_string(),
        }
    };
    (serialization, $msg:expr) => {
        $crate::error::QuickModelError::SerializationError {
            message: $msg.to_string(),
        }
    };
    (pattern, $pattern:expr) => {
        $crate::error::QuickModelError::InvalidPattern {
            pattern: $pattern.to_string(),
        }
    };
    (method, $name:expr) => {
        $crate::error::QuickModelError::MethodNotFound {
            name: $name.to_string(),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = QuickModelError::InvalidDatatype {
            field: "notSet".to_string(),
            datatype: None,
        };
        assert_eq!(err.code(), "DATATYPE_NOT_VALID");
        assert!(err.is_configuration_error());

        let err = quick_error!(pattern, "[1, 2]");
        assert_eq!(err.code(), "SETREGEX_NOT_REGEXP_OR_STRING");
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_rule_messages() {
        let err = QuickModelError::ValidationRuleNotFound {
            field: "str".to_string(),
            rule: "minimumLength".to_string(),
        };
        assert_eq!(err.to_string(), "minimumLength is not a validation function");
    }
}
