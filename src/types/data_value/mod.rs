use crate::error::QuickModelResult;
use crate::model::Model;
use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// 有序的字段映射，保持字段声明顺序
pub type DataMap = IndexMap<String, DataValue>;

/// 通用数据值类型 - 模型字段接收、存储和输出的统一表示
#[derive(Clone, Default)]
pub enum DataValue {
    /// 空值（同时表示"未提供"）
    #[default]
    Null,
    /// 布尔值
    Bool(bool),
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// 字符串
    String(String),
    /// 日期时间
    DateTime(DateTime<FixedOffset>),
    /// 数组
    Array(Vec<DataValue>),
    /// 对象/文档
    Object(DataMap),
    /// 已编译的正则表达式
    Regex(Pattern),
    /// 可调用对象
    Function(ValueFn),
    /// 嵌套模型实例
    Model(Box<Model>),
}

/// 已编译的正则表达式，按源文本比较
#[derive(Clone)]
pub struct Pattern {
    source: String,
    case_insensitive: bool,
    regex: Regex,
}

impl Pattern {
    /// 编译正则表达式
    pub fn new(source: &str) -> QuickModelResult<Self> {
        Self::build(source, false)
    }

    /// 编译忽略大小写的正则表达式
    pub fn case_insensitive(source: &str) -> QuickModelResult<Self> {
        Self::build(source, true)
    }

    fn build(source: &str, case_insensitive: bool) -> QuickModelResult<Self> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| crate::quick_error!(pattern, format!("{} ({})", source, e)))?;

        Ok(Self {
            source: source.to_string(),
            case_insensitive,
            regex,
        })
    }

    /// 正则源文本
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// 是否忽略大小写
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// 是否匹配
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.case_insensitive == other.case_insensitive
    }
}

impl std::fmt::Debug for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flags = if self.case_insensitive { "i" } else { "" };
        write!(f, "/{}/{}", self.source, flags)
    }
}

/// 存放在 DataValue 中的可调用对象，按引用比较
#[derive(Clone)]
pub struct ValueFn(Arc<dyn Fn(&[DataValue]) -> DataValue + Send + Sync>);

impl ValueFn {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&[DataValue]) -> DataValue + Send + Sync + 'static,
    {
        Self(Arc::new(func))
    }

    /// 调用
    pub fn call(&self, args: &[DataValue]) -> DataValue {
        (self.0)(args)
    }

    /// 是否为同一个可调用对象
    pub fn ptr_eq(&self, other: &ValueFn) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for ValueFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[function]")
    }
}

impl std::fmt::Display for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataValue::Null => write!(f, "null"),
            DataValue::Bool(b) => write!(f, "{}", b),
            DataValue::Int(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            DataValue::Regex(p) => write!(f, "{:?}", p),
            DataValue::Function(func) => write!(f, "{:?}", func),
            DataValue::Array(_) | DataValue::Object(_) | DataValue::Model(_) => {
                let json_str = serde_json::to_string(&self.to_json_value()).unwrap_or_default();
                write!(f, "{}", json_str)
            }
        }
    }
}

impl std::fmt::Debug for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 字符串带引号，便于在断言和日志中区分 "1" 与 1
        match self {
            DataValue::String(s) => write!(f, "{:?}", s),
            _ => write!(f, "{}", self),
        }
    }
}

impl PartialEq for DataValue {
    fn eq(&self, other: &Self) -> bool {
        crate::datatypes::deep_equal(self, other)
    }
}

impl DataValue {
    /// 获取数据类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Bool(_) => "boolean",
            DataValue::Int(_) => "integer",
            DataValue::Float(_) => "float",
            DataValue::String(_) => "string",
            DataValue::DateTime(_) => "date",
            DataValue::Array(_) => "array",
            DataValue::Object(_) => "object",
            DataValue::Regex(_) => "regex",
            DataValue::Function(_) => "function",
            DataValue::Model(_) => "model",
        }
    }

    /// 判断是否为空值
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// 判断是否为数字
    pub fn is_number(&self) -> bool {
        matches!(self, DataValue::Int(_) | DataValue::Float(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DataValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// 数字统一按 f64 读取
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Int(i) => Some(*i as f64),
            DataValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<DataValue>> {
        match self {
            DataValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&DataMap> {
        match self {
            DataValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&Model> {
        match self {
            DataValue::Model(model) => Some(model),
            _ => None,
        }
    }

    /// 转换为 JSON 值
    ///
    /// 正则输出源文本，函数输出 null，嵌套模型输出其 to_object 投影
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            DataValue::Null => serde_json::Value::Null,
            DataValue::Bool(b) => serde_json::Value::Bool(*b),
            DataValue::Int(i) => serde_json::Value::Number(serde_json::Number::from(*i)),
            DataValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            DataValue::String(s) => serde_json::Value::String(s.clone()),
            DataValue::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            DataValue::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(|item| item.to_json_value()).collect())
            }
            DataValue::Object(obj) => serde_json::Value::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
            DataValue::Regex(p) => serde_json::Value::String(p.as_str().to_string()),
            DataValue::Function(_) => serde_json::Value::Null,
            DataValue::Model(model) => model.to_json(),
        }
    }

    /// 转换为 JSON 字符串
    pub fn to_json_string(&self) -> QuickModelResult<String> {
        serde_json::to_string(&self.to_json_value()).map_err(|e| {
            crate::quick_error!(serialization, format!("DataValue 转换为 JSON 失败: {}", e))
        })
    }

    /// 从 JSON 字符串解析
    pub fn from_json_string(json: &str) -> QuickModelResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
            crate::quick_error!(serialization, format!("JSON 解析为 DataValue 失败: {}", e))
        })?;
        Ok(json_value_to_data_value(value))
    }

    /// 期望Object类型，如果不是则返回错误
    pub fn expect_object(self) -> QuickModelResult<DataMap> {
        match self {
            DataValue::Object(map) => Ok(map),
            other => Err(crate::quick_error!(
                serialization,
                format!("期望Object类型，但收到: {}", other.type_name())
            )),
        }
    }
}

impl Serialize for DataValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DataValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(json_value_to_data_value(value))
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        DataValue::Int(value as i64)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Int(value)
    }
}

impl From<u32> for DataValue {
    fn from(value: u32) -> Self {
        DataValue::Int(value as i64)
    }
}

impl From<f32> for DataValue {
    fn from(value: f32) -> Self {
        DataValue::Float(value as f64)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Float(value)
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for DataValue {
    fn from(value: DateTime<Utc>) -> Self {
        DataValue::DateTime(value.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for DataValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        DataValue::DateTime(value)
    }
}

impl From<Pattern> for DataValue {
    fn from(value: Pattern) -> Self {
        DataValue::Regex(value)
    }
}

impl From<ValueFn> for DataValue {
    fn from(value: ValueFn) -> Self {
        DataValue::Function(value)
    }
}

impl From<Model> for DataValue {
    fn from(value: Model) -> Self {
        DataValue::Model(Box::new(value))
    }
}

impl From<DataMap> for DataValue {
    fn from(value: DataMap) -> Self {
        DataValue::Object(value)
    }
}

impl From<serde_json::Value> for DataValue {
    fn from(value: serde_json::Value) -> Self {
        json_value_to_data_value(value)
    }
}

impl<T> From<Vec<T>> for DataValue
where
    T: Into<DataValue>,
{
    fn from(value: Vec<T>) -> Self {
        DataValue::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T> From<Option<T>> for DataValue
where
    T: Into<DataValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => DataValue::Null,
        }
    }
}

/// 将 serde_json::Value 转换为对应的 DataValue 类型
pub fn json_value_to_data_value(value: serde_json::Value) -> DataValue {
    match value {
        serde_json::Value::Null => DataValue::Null,
        serde_json::Value::Bool(b) => DataValue::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                DataValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                DataValue::Float(f)
            } else {
                DataValue::Null
            }
        }
        serde_json::Value::String(s) => DataValue::String(s),
        serde_json::Value::Array(arr) => {
            DataValue::Array(arr.into_iter().map(json_value_to_data_value).collect())
        }
        serde_json::Value::Object(obj) => DataValue::Object(
            obj.into_iter()
                .map(|(k, v)| (k, json_value_to_data_value(v)))
                .collect(),
        ),
    }
}
