//! 模型定义系统模块
//!
//! 字段声明编译为字段定义，实例通过类型转换写入属性，
//! 再由声明式验证规则检查并汇总错误

pub mod class;
pub mod convenience;
pub mod conversion;
pub mod field_types;
pub mod instance;
pub mod macros;
pub mod validation_error;

// 重新导出核心类型
pub use class::{ModelClass, ModelClassBuilder, StaticMember};
pub use convenience::*;
pub use conversion::ToDataValue;
pub use field_types::{
    Coercer, CompiledRule, Datatype, DatatypeSpec, Definition, FieldSchema, RawSchema, RuleRef,
    RuleSpec,
};
pub use instance::Model;
pub use validation_error::{FieldErrors, ModelValidationError, ValidationFailure};
