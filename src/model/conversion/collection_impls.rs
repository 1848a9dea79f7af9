//! 集合类型的 ToDataValue 实现
//!
//! 为 Vec、HashMap、BTreeMap 等集合类型实现 ToDataValue

use crate::model::conversion::ToDataValue;
use crate::types::{DataMap, DataValue};
use std::collections::{BTreeMap, HashMap};

impl<T> ToDataValue for Vec<T>
where
    T: ToDataValue,
{
    fn to_data_value(&self) -> DataValue {
        DataValue::Array(self.iter().map(|item| item.to_data_value()).collect())
    }
}

impl<T> ToDataValue for [T]
where
    T: ToDataValue,
{
    fn to_data_value(&self) -> DataValue {
        DataValue::Array(self.iter().map(|item| item.to_data_value()).collect())
    }
}

// HashMap 没有固定顺序，按键排序后输出以保证结果稳定
impl<T> ToDataValue for HashMap<String, T>
where
    T: ToDataValue,
{
    fn to_data_value(&self) -> DataValue {
        let mut keys: Vec<&String> = self.keys().collect();
        keys.sort();

        let mut map = DataMap::new();
        for key in keys {
            if let Some(value) = self.get(key) {
                map.insert(key.clone(), value.to_data_value());
            }
        }
        DataValue::Object(map)
    }
}

impl<T> ToDataValue for BTreeMap<String, T>
where
    T: ToDataValue,
{
    fn to_data_value(&self) -> DataValue {
        DataValue::Object(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_data_value()))
                .collect(),
        )
    }
}

impl<T> ToDataValue for indexmap::IndexMap<String, T>
where
    T: ToDataValue,
{
    fn to_data_value(&self) -> DataValue {
        DataValue::Object(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_data_value()))
                .collect(),
        )
    }
}
