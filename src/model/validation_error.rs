//! 模型验证错误
//!
//! `Model::validate` 在遍历所有字段和规则之后，把全部失败记录按字段汇总成一个
//! `ModelValidationError` 返回。字段顺序与声明顺序一致，同一字段内的失败顺序与
//! 规则声明顺序一致。

use crate::i18n::localized;
use crate::types::DataValue;
use crate::validation::RuleFailure;
use indexmap::IndexMap;
use serde::Serialize;

/// 单条失败记录 `{message, value, params?}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationFailure {
    /// 错误码
    pub message: String,
    /// 失败的值
    pub value: DataValue,
    /// 规则参数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<DataValue>>,
}

impl From<RuleFailure> for ValidationFailure {
    fn from(failure: RuleFailure) -> Self {
        Self {
            message: failure.code,
            value: failure.value,
            params: failure.params,
        }
    }
}

/// 字段名到失败记录列表的有序映射
pub type FieldErrors = IndexMap<String, Vec<ValidationFailure>>;

/// 模型验证汇总错误
#[derive(Debug, Clone, PartialEq)]
pub struct ModelValidationError {
    model_name: String,
    errors: FieldErrors,
}

impl ModelValidationError {
    pub fn new(model_name: &str, errors: FieldErrors) -> Self {
        Self {
            model_name: model_name.to_string(),
            errors,
        }
    }

    /// 固定的错误类型标记
    pub fn error_type(&self) -> &'static str {
        "ModelError"
    }

    /// 全部失败记录
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// 指定字段的失败记录
    pub fn field_errors(&self, field: &str) -> Option<&[ValidationFailure]> {
        self.errors.get(field).map(|list| list.as_slice())
    }

    /// 产生错误的模型类名
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 可读的多行报告：本地化的标题行，随后每条失败一行
    pub fn trace(&self) -> String {
        let count = self.errors.len().to_string();
        let mut lines = vec![localized(
            "error.model_validation",
            &[("model", &self.model_name), ("count", &count)],
        )];

        for (field, failures) in &self.errors {
            for failure in failures {
                let mut line = format!("    at {}: {} (value: {:?}", field, failure.message, failure.value);
                if let Some(params) = &failure.params {
                    line.push_str(&format!(", params: {:?}", params));
                }
                line.push(')');
                lines.push(line);
            }
        }

        lines.join("\n")
    }

    /// 失败记录的 JSON 表示
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.errors).unwrap_or(serde_json::Value::Null)
    }
}

impl std::fmt::Display for ModelValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.errors.keys().map(|k| k.as_str()).collect();
        write!(f, "ModelError: {} [{}]", self.model_name, fields.join(", "))
    }
}

impl std::error::Error for ModelValidationError {}
