//! 模型相关的宏定义
//!
//! 提供便捷的宏来构造数据值和定义模型类

/// 便捷宏：构造有序对象值
///
/// ```
/// use rat_quickmodel::data_object;
/// let value = data_object! { "name" => "Test", "age" => 30 };
/// assert_eq!(value.as_object().map(|o| o.len()), Some(2));
/// ```
#[macro_export]
macro_rules! data_object {
    () => {
        $crate::types::DataValue::Object($crate::types::DataMap::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::types::DataMap::new();
        $(
            map.insert($key.to_string(), $crate::types::DataValue::from($value));
        )+
        $crate::types::DataValue::Object(map)
    }};
}

/// 便捷宏：构造数组值，元素可以是不同类型
#[macro_export]
macro_rules! data_array {
    () => {
        $crate::types::DataValue::Array(Vec::new())
    };
    ($($value:expr),+ $(,)?) => {
        $crate::types::DataValue::Array(vec![$($crate::types::DataValue::from($value)),+])
    };
}

/// 便捷宏：定义模型类并注册到全局注册表
///
/// 展开为 `QuickModelResult<ModelClass>`，字段按书写顺序声明
#[macro_export]
macro_rules! define_model_class {
    (
        name = $name:expr,
        fields = {
            $(
                $field_name:expr => $field_def:expr,
            )*
        }
    ) => {{
        let mut raw_schema = $crate::model::field_types::RawSchema::new();
        $(
            raw_schema.insert($field_name, $field_def);
        )*

        $crate::model::class::ModelClass::builder($name)
            .schema(raw_schema)
            .build()
            .and_then(|class| {
                $crate::manager::register_model_class(class.clone())?;
                $crate::debug_log!("✅ 模型类自动注册成功: {}", class.name());
                Ok(class)
            })
    }};
}

#[cfg(test)]
mod tests {
    use crate::types::DataValue;

    #[test]
    fn test_data_array_mixed_types() {
        let value = data_array![1, "two", true, DataValue::Null];
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[1], DataValue::from("two"));
        assert!(items[3].is_null());
    }

    #[test]
    fn test_empty_object() {
        let value = data_object! {};
        assert_eq!(value.as_object().unwrap().len(), 0);
    }
}
