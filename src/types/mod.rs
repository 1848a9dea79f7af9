//! 通用数据类型
//!
//! 定义模型字段在转换、存储、验证和序列化过程中使用的统一值类型

pub mod data_value;

pub use data_value::{json_value_to_data_value, DataMap, DataValue, Pattern, ValueFn};
