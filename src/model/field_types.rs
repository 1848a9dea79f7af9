//! 字段类型定义模块
//!
//! 定义模型字段的原始声明（`FieldSchema` / `RawSchema`）、
//! 字段类型（`Datatype`）以及编译后的字段定义（`Definition`）

use crate::datatypes;
use crate::error::{QuickModelError, QuickModelResult};
use crate::types::{json_value_to_data_value, DataMap, DataValue};
use crate::validation::{CustomRule, RuleId};
use indexmap::IndexMap;
use std::sync::Arc;

/// 自定义类型转换函数：`(输入值, 默认值) -> 结果`
#[derive(Clone)]
pub struct Coercer(Arc<dyn Fn(&DataValue, &DataValue) -> DataValue + Send + Sync>);

impl Coercer {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&DataValue, &DataValue) -> DataValue + Send + Sync + 'static,
    {
        Self(Arc::new(func))
    }

    pub fn call(&self, input: &DataValue, def: &DataValue) -> DataValue {
        (self.0)(input, def)
    }
}

impl std::fmt::Debug for Coercer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Coercer(..)")
    }
}

/// 字段声明中的类型：类型名称或自定义转换函数
#[derive(Debug, Clone)]
pub enum DatatypeSpec {
    Named(String),
    Custom(Coercer),
}

/// 验证规则的引用方式
#[derive(Debug, Clone)]
pub enum RuleRef {
    /// 规则库中的规则名称
    Named(String),
    /// 自定义规则函数
    Custom(CustomRule),
    /// 既不是名称也不是函数的值，编译时报错
    Invalid(DataValue),
}

/// 一条验证规则声明 `{rule, param}`
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub rule: RuleRef,
    pub param: Option<DataValue>,
}

impl RuleSpec {
    pub fn named(name: &str) -> Self {
        Self {
            rule: RuleRef::Named(name.to_string()),
            param: None,
        }
    }

    pub fn custom(rule: CustomRule) -> Self {
        Self {
            rule: RuleRef::Custom(rule),
            param: None,
        }
    }

    pub fn invalid(value: impl Into<DataValue>) -> Self {
        Self {
            rule: RuleRef::Invalid(value.into()),
            param: None,
        }
    }

    /// 设置规则参数：单个值或数组
    pub fn param(mut self, param: impl Into<DataValue>) -> Self {
        self.param = Some(param.into());
        self
    }
}

/// 单个字段的原始声明
#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    /// 字段类型
    pub datatype: Option<DatatypeSpec>,
    /// 默认值
    pub value: DataValue,
    /// 存储列名
    pub column: Option<String>,
    /// 验证规则
    pub validation: Vec<RuleSpec>,
    /// 是否主键
    pub primary_key: bool,
    /// 枚举可选值
    pub enum_values: Option<Vec<DataValue>>,
    /// 附加设置
    pub settings: DataMap,
}

impl FieldSchema {
    /// 创建未指定类型的字段声明
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建指定类型名称的字段声明
    pub fn typed(datatype: &str) -> Self {
        Self::new().datatype(datatype)
    }

    /// 设置类型名称
    pub fn datatype(mut self, datatype: &str) -> Self {
        self.datatype = Some(DatatypeSpec::Named(datatype.to_string()));
        self
    }

    /// 使用自定义转换函数作为类型
    pub fn custom_type<F>(mut self, func: F) -> Self
    where
        F: Fn(&DataValue, &DataValue) -> DataValue + Send + Sync + 'static,
    {
        self.datatype = Some(DatatypeSpec::Custom(Coercer::new(func)));
        self
    }

    /// 设置默认值
    pub fn default_value(mut self, value: impl Into<DataValue>) -> Self {
        self.value = value.into();
        self
    }

    /// 设置存储列名
    pub fn column(mut self, column: &str) -> Self {
        self.column = Some(column.to_string());
        self
    }

    /// 添加无参数的规则
    pub fn rule(mut self, name: &str) -> Self {
        self.validation.push(RuleSpec::named(name));
        self
    }

    /// 添加带参数的规则，数组参数会展开为多个参数
    pub fn rule_with(mut self, name: &str, param: impl Into<DataValue>) -> Self {
        self.validation.push(RuleSpec::named(name).param(param));
        self
    }

    /// 添加自定义规则
    pub fn custom_rule<F>(mut self, func: F) -> Self
    where
        F: Fn(&DataValue, &[DataValue]) -> Result<bool, String> + Send + Sync + 'static,
    {
        self.validation.push(RuleSpec::custom(CustomRule::new(func)));
        self
    }

    /// 添加带参数的自定义规则
    pub fn custom_rule_with<F>(mut self, func: F, param: impl Into<DataValue>) -> Self
    where
        F: Fn(&DataValue, &[DataValue]) -> Result<bool, String> + Send + Sync + 'static,
    {
        self.validation
            .push(RuleSpec::custom(CustomRule::new(func)).param(param));
        self
    }

    /// 直接添加规则声明
    pub fn validation(mut self, spec: RuleSpec) -> Self {
        self.validation.push(spec);
        self
    }

    /// 设置为主键
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// 设置枚举可选值
    pub fn enum_values<T: Into<DataValue>>(mut self, values: Vec<T>) -> Self {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// 添加附加设置
    pub fn setting(mut self, key: &str, value: impl Into<DataValue>) -> Self {
        self.settings.insert(key.to_string(), value.into());
        self
    }

    /// 从 JSON 字段声明解析；`null` 表示全部使用默认值
    fn from_json_entry(field: &str, entry: serde_json::Value) -> QuickModelResult<Option<Self>> {
        let mut object = match entry {
            serde_json::Value::Null => return Ok(None),
            serde_json::Value::Object(object) => object,
            other => {
                return Err(crate::quick_error!(
                    config,
                    format!("字段 {} 的声明必须是对象或 null，实际为: {}", field, other)
                ));
            }
        };

        let mut schema = FieldSchema::new();

        schema.datatype = match object.remove("type") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(name)) => Some(DatatypeSpec::Named(name)),
            Some(other) => Some(DatatypeSpec::Named(other.to_string())),
        };

        if let Some(value) = object.remove("value") {
            schema.value = json_value_to_data_value(value);
        }

        match object.remove("column") {
            None | Some(serde_json::Value::Null) => {}
            Some(serde_json::Value::String(column)) => schema.column = Some(column),
            Some(other) => {
                return Err(crate::quick_error!(
                    config,
                    format!("字段 {} 的 column 必须是字符串，实际为: {}", field, other)
                ));
            }
        }

        match object.remove("validation") {
            None | Some(serde_json::Value::Null) => {}
            Some(serde_json::Value::Array(rules)) => {
                for rule in rules {
                    schema.validation.push(Self::rule_from_json(rule));
                }
            }
            Some(other) => {
                return Err(crate::quick_error!(
                    config,
                    format!("字段 {} 的 validation 必须是数组，实际为: {}", field, other)
                ));
            }
        }

        if let Some(primary_key) = object.remove("primaryKey") {
            schema.primary_key = primary_key.as_bool().unwrap_or(false);
        }

        if let Some(serde_json::Value::Array(values)) = object.remove("enum") {
            schema.enum_values = Some(values.into_iter().map(json_value_to_data_value).collect());
        }

        if let Some(serde_json::Value::Object(settings)) = object.remove("settings") {
            schema.settings = settings
                .into_iter()
                .map(|(k, v)| (k, json_value_to_data_value(v)))
                .collect();
        }

        Ok(Some(schema))
    }

    fn rule_from_json(descriptor: serde_json::Value) -> RuleSpec {
        let mut object = match descriptor {
            serde_json::Value::Object(object) => object,
            other => return RuleSpec::invalid(json_value_to_data_value(other)),
        };

        let rule = match object.remove("rule") {
            Some(serde_json::Value::String(name)) => RuleRef::Named(name),
            Some(other) => RuleRef::Invalid(json_value_to_data_value(other)),
            None => RuleRef::Invalid(DataValue::Null),
        };

        RuleSpec {
            rule,
            param: object.remove("param").map(json_value_to_data_value),
        }
    }
}

/// 原始模型声明：字段名到字段声明的有序映射
#[derive(Debug, Clone, Default)]
pub struct RawSchema {
    fields: IndexMap<String, Option<FieldSchema>>,
}

impl RawSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加字段声明；`None` 表示声明缺失
    pub fn insert(&mut self, field: &str, schema: impl Into<Option<FieldSchema>>) {
        self.fields.insert(field.to_string(), schema.into());
    }

    /// 链式添加字段
    pub fn field(mut self, field: &str, schema: impl Into<Option<FieldSchema>>) -> Self {
        self.insert(field, schema);
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<FieldSchema>)> {
        self.fields.iter()
    }

    /// 从 JSON 对象解析模型声明
    ///
    /// ```
    /// use rat_quickmodel::model::RawSchema;
    /// let schema = RawSchema::from_json(r#"{"name": {"type": "string", "column": "user_name"}}"#).unwrap();
    /// assert_eq!(schema.len(), 1);
    /// ```
    pub fn from_json(json: &str) -> QuickModelResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// 从已解析的 JSON 值构造模型声明
    pub fn from_json_value(value: serde_json::Value) -> QuickModelResult<Self> {
        let object = match value {
            serde_json::Value::Object(object) => object,
            other => {
                return Err(crate::quick_error!(
                    config,
                    format!("模型声明必须是 JSON 对象，实际为: {}", other)
                ));
            }
        };

        let mut schema = RawSchema::new();
        for (field, entry) in object {
            let parsed = FieldSchema::from_json_entry(&field, entry)?;
            schema.fields.insert(field, parsed);
        }
        Ok(schema)
    }
}

/// 编译后的字段类型
#[derive(Debug, Clone)]
pub enum Datatype {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    Array,
    Object,
    Enum(Vec<DataValue>),
    Mixed,
    Custom(Coercer),
}

impl Datatype {
    /// 按名称解析类型；`enum` 使用字段声明中的可选值
    pub fn from_name(name: &str, enum_values: Option<&[DataValue]>) -> Option<Self> {
        let datatype = match name {
            "string" => Datatype::String,
            "integer" => Datatype::Integer,
            "float" => Datatype::Float,
            "boolean" => Datatype::Boolean,
            "date" => Datatype::Date,
            "array" => Datatype::Array,
            "object" => Datatype::Object,
            "enum" => Datatype::Enum(enum_values.map(|v| v.to_vec()).unwrap_or_default()),
            "mixed" => Datatype::Mixed,
            _ => return None,
        };
        Some(datatype)
    }

    /// 类型名称
    pub fn name(&self) -> &'static str {
        match self {
            Datatype::String => "string",
            Datatype::Integer => "integer",
            Datatype::Float => "float",
            Datatype::Boolean => "boolean",
            Datatype::Date => "date",
            Datatype::Array => "array",
            Datatype::Object => "object",
            Datatype::Enum(_) => "enum",
            Datatype::Mixed => "mixed",
            Datatype::Custom(_) => "function",
        }
    }

    /// 按类型转换输入值
    pub fn coerce(&self, input: &DataValue, def: &DataValue) -> DataValue {
        match self {
            Datatype::String => datatypes::to_string(input, def, None),
            Datatype::Integer => datatypes::to_integer(input, def),
            Datatype::Float => datatypes::to_float(input, def),
            Datatype::Boolean => datatypes::to_boolean(input, def),
            Datatype::Date => datatypes::to_date(input, def),
            Datatype::Array => datatypes::to_array(input, def),
            Datatype::Object => datatypes::to_object(input, def),
            Datatype::Enum(values) => datatypes::to_enum(input, values, def),
            Datatype::Mixed => datatypes::to_mixed(input, def),
            Datatype::Custom(coercer) => coercer.call(input, def),
        }
    }
}

/// 编译后的验证规则
#[derive(Debug, Clone)]
pub enum CompiledRule {
    /// 规则库中的规则
    Named { id: RuleId, params: Vec<DataValue> },
    /// 自定义规则
    Custom { rule: CustomRule, params: Vec<DataValue> },
}

/// 编译后的字段定义，编译完成后不再修改
#[derive(Debug, Clone)]
pub struct Definition {
    /// 字段名
    pub name: String,
    /// 字段类型
    pub datatype: Datatype,
    /// 默认值
    pub default_value: DataValue,
    /// 存储列名
    pub column: String,
    /// 验证规则（声明顺序）
    pub validation: Vec<CompiledRule>,
    /// 是否主键
    pub primary_key: bool,
    /// 附加设置
    pub settings: DataMap,
}

impl Definition {
    /// 编译单个字段声明
    ///
    /// 类型缺失或无法识别时返回 `InvalidDatatype`，规则引用无效时返回对应的配置错误
    pub fn compile(name: &str, schema: Option<&FieldSchema>) -> QuickModelResult<Self> {
        let schema = schema.ok_or_else(|| QuickModelError::InvalidDatatype {
            field: name.to_string(),
            datatype: None,
        })?;

        let datatype = match &schema.datatype {
            None => {
                return Err(QuickModelError::InvalidDatatype {
                    field: name.to_string(),
                    datatype: None,
                });
            }
            Some(DatatypeSpec::Custom(coercer)) => Datatype::Custom(coercer.clone()),
            Some(DatatypeSpec::Named(type_name)) => {
                Datatype::from_name(type_name, schema.enum_values.as_deref()).ok_or_else(|| {
                    QuickModelError::InvalidDatatype {
                        field: name.to_string(),
                        datatype: Some(type_name.clone()),
                    }
                })?
            }
        };

        let mut validation = Vec::with_capacity(schema.validation.len());
        for spec in &schema.validation {
            validation.push(Self::compile_rule(name, spec)?);
        }

        Ok(Self {
            name: name.to_string(),
            datatype,
            default_value: schema.value.clone(),
            column: schema.column.clone().unwrap_or_else(|| name.to_string()),
            validation,
            primary_key: schema.primary_key,
            settings: schema.settings.clone(),
        })
    }

    fn compile_rule(field: &str, spec: &RuleSpec) -> QuickModelResult<CompiledRule> {
        let params = crate::validation::normalize_params(spec.param.as_ref());

        match &spec.rule {
            RuleRef::Named(rule_name) => {
                let id = RuleId::from_name(rule_name).ok_or_else(|| {
                    QuickModelError::ValidationRuleNotFound {
                        field: field.to_string(),
                        rule: rule_name.clone(),
                    }
                })?;
                Ok(CompiledRule::Named { id, params })
            }
            RuleRef::Custom(rule) => Ok(CompiledRule::Custom {
                rule: rule.clone(),
                params,
            }),
            RuleRef::Invalid(value) => Err(QuickModelError::ValidationRuleNotCallable {
                field: field.to_string(),
                rule: describe_invalid_rule(value),
            }),
        }
    }

    /// 获取附加设置
    pub fn setting(&self, key: &str) -> Option<&DataValue> {
        self.settings.get(key)
    }

    /// 按字段类型转换输入值，无法转换时返回默认值
    pub fn coerce(&self, input: &DataValue) -> DataValue {
        self.datatype.coerce(input, &self.default_value)
    }
}

/// 无效规则引用的文本表示，对象统一显示为 `[object Object]`
fn describe_invalid_rule(value: &DataValue) -> String {
    match value {
        DataValue::Object(_) | DataValue::Model(_) => "[object Object]".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_schema_is_invalid_datatype() {
        let err = Definition::compile("notSet", None).unwrap_err();
        assert_eq!(err.code(), "DATATYPE_NOT_VALID");

        let err = Definition::compile("banana", Some(&FieldSchema::typed("banana"))).unwrap_err();
        match err {
            QuickModelError::InvalidDatatype { datatype, .. } => {
                assert_eq!(datatype.as_deref(), Some("banana"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_column_defaults_to_field_name() {
        let definition = Definition::compile("name", Some(&FieldSchema::typed("string"))).unwrap();
        assert_eq!(definition.column, "name");
        assert!(definition.default_value.is_null());
        assert!(definition.validation.is_empty());
        assert!(!definition.primary_key);
    }

    #[test]
    fn test_json_rule_object_not_callable() {
        let schema = RawSchema::from_json(
            r#"{"str": {"type": "string", "validation": [{"rule": {"key": "value"}}]}}"#,
        )
        .unwrap();
        let (name, entry) = schema.iter().next().unwrap();
        let err = Definition::compile(name, entry.as_ref()).unwrap_err();
        assert_eq!(err.to_string(), "[object Object] is not a function or string");
    }

    #[test]
    fn test_json_settings_and_enum() {
        let schema = RawSchema::from_json(
            r#"{"level": {"type": "enum", "enum": ["low", "high"], "settings": {"test": 222}}}"#,
        )
        .unwrap();
        let (name, entry) = schema.iter().next().unwrap();
        let definition = Definition::compile(name, entry.as_ref()).unwrap();
        assert_eq!(definition.setting("test"), Some(&DataValue::Int(222)));
        assert!(definition.setting("undefined").is_none());
        assert_eq!(definition.coerce(&DataValue::from("high")), DataValue::from("high"));
        assert!(definition.coerce(&DataValue::from("mid")).is_null());
    }
}
