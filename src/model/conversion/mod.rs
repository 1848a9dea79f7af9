//! 数据转换模块
//!
//! 提供 ToDataValue trait 及其实现，用于将各种 Rust 类型转换为 DataValue

pub mod collection_impls;
pub mod primitive_impls;
pub mod to_data_value;

// 重新导出核心 trait
pub use to_data_value::ToDataValue;
