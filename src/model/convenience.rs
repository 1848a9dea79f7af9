//! 模型便捷函数模块
//!
//! 提供创建各种字段声明的便捷函数

use crate::model::field_types::FieldSchema;
use crate::types::DataValue;

/// 便捷函数：创建字符串字段
pub fn string_field() -> FieldSchema {
    FieldSchema::typed("string")
}

/// 便捷函数：创建整数字段
pub fn integer_field() -> FieldSchema {
    FieldSchema::typed("integer")
}

/// 便捷函数：创建浮点数字段
pub fn float_field() -> FieldSchema {
    FieldSchema::typed("float")
}

/// 便捷函数：创建布尔字段
pub fn boolean_field() -> FieldSchema {
    FieldSchema::typed("boolean")
}

/// 便捷函数：创建日期时间字段
pub fn date_field() -> FieldSchema {
    FieldSchema::typed("date")
}

/// 便捷函数：创建数组字段
pub fn array_field() -> FieldSchema {
    FieldSchema::typed("array")
}

/// 便捷函数：创建列表字段（array_field 的别名）
pub fn list_field() -> FieldSchema {
    array_field()
}

/// 便捷函数：创建对象字段
pub fn object_field() -> FieldSchema {
    FieldSchema::typed("object")
}

/// 便捷函数：创建任意类型字段
pub fn mixed_field() -> FieldSchema {
    FieldSchema::typed("mixed")
}

/// 便捷函数：创建枚举字段
pub fn enum_field<T: Into<DataValue>>(values: Vec<T>) -> FieldSchema {
    FieldSchema::typed("enum").enum_values(values)
}

/// 便捷函数：使用自定义转换函数作为类型的字段
pub fn custom_field<F>(func: F) -> FieldSchema
where
    F: Fn(&DataValue, &DataValue) -> DataValue + Send + Sync + 'static,
{
    FieldSchema::new().custom_type(func)
}
