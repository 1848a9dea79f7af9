//! ToDataValue trait 定义
//!
//! 定义了将各种类型转换为 DataValue 的统一接口

use crate::types::DataValue;

/// 支持直接转换为 DataValue 的 trait
///
/// 用户结构体实现该 trait 后可以直接作为模型的输入数据
pub trait ToDataValue {
    fn to_data_value(&self) -> DataValue;
}
