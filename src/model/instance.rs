//! 模型实例
//!
//! 每个实例独占自己的属性存储，字段定义等只读表来自所属的 `ModelClass`。

use crate::error::QuickModelResult;
use crate::model::class::ModelClass;
use crate::model::field_types::{CompiledRule, Definition};
use crate::model::validation_error::{FieldErrors, ModelValidationError, ValidationFailure};
use crate::types::{DataMap, DataValue};
use crate::validation::RuleId;
use rat_logger::debug;

/// 模型实例
#[derive(Debug, Clone)]
pub struct Model {
    class: ModelClass,
    attributes: DataMap,
}

impl Model {
    /// 先为所有字段写入类型安全的默认值，再按声明顺序应用输入中的同名字段
    pub(crate) fn construct(class: ModelClass, input: DataValue) -> QuickModelResult<Self> {
        let mut attributes = DataMap::with_capacity(class.definitions().len());
        for (name, definition) in class.definitions() {
            attributes.insert(name.clone(), definition.coerce(&DataValue::Null));
        }

        let mut model = Self { class, attributes };

        let input = match input {
            DataValue::Object(map) => map,
            _ => return Ok(model),
        };

        let fields: Vec<String> = model.class.definitions().keys().cloned().collect();
        for field in fields {
            if let Some(value) = input.get(&field) {
                model.set(&field, value.clone())?;
            }
        }

        Ok(model)
    }

    /// 所属模型类
    pub fn model_class(&self) -> &ModelClass {
        &self.class
    }

    /// 原始属性存储
    pub(crate) fn attributes(&self) -> &DataMap {
        &self.attributes
    }

    /// 读取字段值；存在自定义 getter 时经由 getter，未声明的字段返回 None
    pub fn get(&self, field: &str) -> Option<DataValue> {
        if let Some(getter) = self.class.getter(field) {
            if self.class.definition(field).is_some() {
                return Some(getter.call(self));
            }
        }
        self.attributes.get(field).cloned()
    }

    /// 读取属性存储中的原始值，不经过 getter
    pub fn attribute(&self, field: &str) -> Option<&DataValue> {
        self.attributes.get(field)
    }

    /// 设置字段值
    ///
    /// 未声明的字段忽略并返回 `Ok(None)`。存在自定义 setter 时完全交给 setter
    /// 处理并返回它的返回值，否则按字段类型转换后写入并返回 `Ok(None)`。
    pub fn set(&mut self, field: &str, value: impl Into<DataValue>) -> QuickModelResult<Option<DataValue>> {
        let value = value.into();

        let default_value = match self.class.definition(field) {
            Some(definition) => definition.default_value.clone(),
            None => {
                debug!("忽略未声明的字段: {}.{}", self.class.name(), field);
                return Ok(None);
            }
        };

        if let Some(setter) = self.class.setter(field).cloned() {
            return setter.call(self, value, &default_value);
        }

        self.store(field, value);
        Ok(None)
    }

    /// 通用写入路径：按字段类型转换后写入属性存储，不经过自定义 setter
    ///
    /// 返回是否写入（未声明的字段返回 false）
    pub fn store(&mut self, field: &str, value: impl Into<DataValue>) -> bool {
        let coerced = match self.class.definition(field) {
            Some(definition) => definition.coerce(&value.into()),
            None => return false,
        };
        self.attributes.insert(field.to_string(), coerced);
        true
    }

    /// 以字段名为键输出全部字段
    pub fn to_object(&self) -> DataMap {
        self.class
            .definitions()
            .keys()
            .map(|field| {
                let value = self.attributes.get(field).cloned().unwrap_or_default();
                (field.clone(), value)
            })
            .collect()
    }

    /// 以存储列名为键输出全部字段
    pub fn to_data(&self) -> DataMap {
        self.class
            .definitions()
            .iter()
            .map(|(field, definition)| {
                let value = self.attributes.get(field).cloned().unwrap_or_default();
                (definition.column.clone(), value)
            })
            .collect()
    }

    /// `to_object` 的 JSON 表示
    pub fn to_json(&self) -> serde_json::Value {
        DataValue::Object(self.to_object()).to_json_value()
    }

    /// 获取字段定义
    pub fn get_definition(&self, field: &str) -> Option<&Definition> {
        self.class.definition(field)
    }

    /// 主键字段名
    pub fn primary_key(&self) -> Option<&str> {
        self.class.primary_key()
    }

    /// 主键字段的当前值；未声明主键时返回 None
    pub fn primary_key_value(&self) -> Option<DataValue> {
        self.class.primary_key().and_then(|field| self.get(field))
    }

    /// 是否有任一字段持有非空值
    pub fn is_set(&self) -> bool {
        self.attributes.values().any(|value| !value.is_null())
    }

    /// 调用实例方法
    pub fn call(&mut self, method: &str, args: &[DataValue]) -> QuickModelResult<DataValue> {
        match self.class.method(method).cloned() {
            Some(func) => func.call(self, args),
            None => Err(crate::quick_error!(method, method)),
        }
    }

    /// 是否是给定类（或其子类）的实例
    pub fn is_instance_of(&self, class: &ModelClass) -> bool {
        self.class.is_subclass_of(class)
    }

    /// 是否是同一个实例（按引用比较）
    pub fn is_same_instance(&self, other: &Model) -> bool {
        std::ptr::eq(self, other)
    }

    /// 按声明顺序对每个字段执行全部验证规则并汇总失败
    ///
    /// 字段值为 null 时跳过 `required` 与 `match` 以外的规则库规则，自定义规则始终执行
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        let mut errors = FieldErrors::new();

        for (field, definition) in self.class.definitions() {
            let value = self.attributes.get(field).cloned().unwrap_or_default();

            for rule in &definition.validation {
                let outcome = match rule {
                    CompiledRule::Named { id, params } => {
                        if value.is_null() && !matches!(id, RuleId::Required | RuleId::Match) {
                            continue;
                        }
                        if *id == RuleId::Match {
                            let other = self.match_target(params);
                            id.run(&value, &[other])
                        } else {
                            id.run(&value, params)
                        }
                    }
                    CompiledRule::Custom { rule, params } => rule.run(&value, params),
                };

                if let Err(failure) = outcome {
                    errors
                        .entry(field.clone())
                        .or_default()
                        .push(ValidationFailure::from(failure));
                }
            }
        }

        if errors.is_empty() {
            return Ok(());
        }

        debug!(
            "模型验证失败: {}, 失败字段: {:?}",
            self.class.name(),
            errors.keys().collect::<Vec<_>>()
        );
        Err(ModelValidationError::new(self.class.name(), errors))
    }

    /// `match` 规则比较对象：被引用字段在验证时的当前值
    fn match_target(&self, params: &[DataValue]) -> DataValue {
        params
            .first()
            .and_then(|target| target.as_str())
            .and_then(|target| self.attributes.get(target))
            .cloned()
            .unwrap_or_default()
    }
}
