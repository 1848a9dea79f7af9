//! 基础类型的 ToDataValue 实现
//!
//! 为 String、数值类型、布尔类型、时间和 JSON 值实现 ToDataValue

use crate::model::Model;
use crate::model::conversion::ToDataValue;
use crate::types::{DataValue, Pattern};

// 字符串类型实现
impl ToDataValue for String {
    fn to_data_value(&self) -> DataValue {
        DataValue::String(self.clone())
    }
}

impl ToDataValue for &str {
    fn to_data_value(&self) -> DataValue {
        DataValue::String(self.to_string())
    }
}

// 整数类型实现
impl ToDataValue for i32 {
    fn to_data_value(&self) -> DataValue {
        DataValue::Int(*self as i64)
    }
}

impl ToDataValue for i64 {
    fn to_data_value(&self) -> DataValue {
        DataValue::Int(*self)
    }
}

impl ToDataValue for u32 {
    fn to_data_value(&self) -> DataValue {
        DataValue::Int(*self as i64)
    }
}

// 浮点类型实现
impl ToDataValue for f32 {
    fn to_data_value(&self) -> DataValue {
        DataValue::Float(*self as f64)
    }
}

impl ToDataValue for f64 {
    fn to_data_value(&self) -> DataValue {
        DataValue::Float(*self)
    }
}

// 布尔类型实现
impl ToDataValue for bool {
    fn to_data_value(&self) -> DataValue {
        DataValue::Bool(*self)
    }
}

// DateTime类型实现
impl ToDataValue for chrono::DateTime<chrono::Utc> {
    fn to_data_value(&self) -> DataValue {
        DataValue::DateTime(self.fixed_offset())
    }
}

impl ToDataValue for chrono::DateTime<chrono::FixedOffset> {
    fn to_data_value(&self) -> DataValue {
        DataValue::DateTime(*self)
    }
}

impl ToDataValue for Pattern {
    fn to_data_value(&self) -> DataValue {
        DataValue::Regex(self.clone())
    }
}

impl ToDataValue for DataValue {
    fn to_data_value(&self) -> DataValue {
        self.clone()
    }
}

// 嵌套模型作为值保存
impl ToDataValue for Model {
    fn to_data_value(&self) -> DataValue {
        DataValue::Model(Box::new(self.clone()))
    }
}

// JsonValue类型实现
impl ToDataValue for serde_json::Value {
    fn to_data_value(&self) -> DataValue {
        crate::types::json_value_to_data_value(self.clone())
    }
}

// Option类型实现
impl<T> ToDataValue for Option<T>
where
    T: ToDataValue,
{
    fn to_data_value(&self) -> DataValue {
        match self {
            Some(v) => v.to_data_value(),
            None => DataValue::Null,
        }
    }
}
