//! 模型类
//!
//! `ModelClass` 持有编译后的字段定义以及 setter/getter/实例方法/静态成员表。
//! 模型类一经构建便不可修改，多个实例共享同一份只读表；`extend` 通过合并父类
//! 的表（同名项后写覆盖）生成子类。

use crate::datatypes::InstanceOf;
use crate::error::{QuickModelError, QuickModelResult};
use crate::model::conversion::ToDataValue;
use crate::model::field_types::{Definition, FieldSchema, RawSchema};
use crate::model::instance::Model;
use crate::types::{DataMap, DataValue};
use indexmap::IndexMap;
use rat_logger::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// 自定义字段 setter：`(实例, 原始值, 字段默认值) -> 返回值`
///
/// setter 负责自行写入属性（通常调用 `Model::store`）
#[derive(Clone)]
pub struct SetterFn(
    Arc<dyn Fn(&mut Model, DataValue, &DataValue) -> QuickModelResult<Option<DataValue>> + Send + Sync>,
);

impl SetterFn {
    pub fn call(&self, model: &mut Model, value: DataValue, def: &DataValue) -> QuickModelResult<Option<DataValue>> {
        (self.0)(model, value, def)
    }
}

/// 自定义字段 getter
#[derive(Clone)]
pub struct GetterFn(Arc<dyn Fn(&Model) -> DataValue + Send + Sync>);

impl GetterFn {
    pub fn call(&self, model: &Model) -> DataValue {
        (self.0)(model)
    }
}

/// 实例方法
#[derive(Clone)]
pub struct MethodFn(Arc<dyn Fn(&mut Model, &[DataValue]) -> QuickModelResult<DataValue> + Send + Sync>);

impl MethodFn {
    pub fn call(&self, model: &mut Model, args: &[DataValue]) -> QuickModelResult<DataValue> {
        (self.0)(model, args)
    }
}

/// 静态方法
#[derive(Clone)]
pub struct StaticFn(Arc<dyn Fn(&ModelClass, &[DataValue]) -> QuickModelResult<DataValue> + Send + Sync>);

impl StaticFn {
    pub fn call(&self, class: &ModelClass, args: &[DataValue]) -> QuickModelResult<DataValue> {
        (self.0)(class, args)
    }
}

macro_rules! opaque_debug {
    ($($name:ident),+) => {
        $(
            impl std::fmt::Debug for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, concat!(stringify!($name), "(..)"))
                }
            }
        )+
    };
}

opaque_debug!(SetterFn, GetterFn, MethodFn, StaticFn);

/// 静态成员：常量或静态方法
#[derive(Debug, Clone)]
pub enum StaticMember {
    Value(DataValue),
    Function(StaticFn),
}

#[derive(Debug)]
struct ClassInner {
    id: u64,
    name: String,
    /// 自身及所有祖先的类 id
    lineage: Vec<u64>,
    definitions: IndexMap<String, Definition>,
    primary_key: Option<String>,
    setters: HashMap<String, SetterFn>,
    getters: HashMap<String, GetterFn>,
    methods: HashMap<String, MethodFn>,
    statics: HashMap<String, StaticMember>,
}

/// 编译后的模型类
#[derive(Debug, Clone)]
pub struct ModelClass {
    inner: Arc<ClassInner>,
}

impl ModelClass {
    /// 开始定义一个根模型类
    pub fn builder(name: &str) -> ModelClassBuilder {
        ModelClassBuilder::new(name, None)
    }

    /// 以当前类为父类开始定义子类
    pub fn extend(&self, name: &str) -> ModelClassBuilder {
        ModelClassBuilder::new(name, Some(self.clone()))
    }

    /// 类 id，进程内唯一
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// 类名
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// 是否是另一个类本身或其子类
    pub fn is_subclass_of(&self, other: &ModelClass) -> bool {
        self.inner.lineage.contains(&other.inner.id)
    }

    /// 全部字段定义（声明顺序）
    pub fn definitions(&self) -> &IndexMap<String, Definition> {
        &self.inner.definitions
    }

    /// 获取字段定义
    pub fn definition(&self, field: &str) -> Option<&Definition> {
        self.inner.definitions.get(field)
    }

    /// 主键字段名
    pub fn primary_key(&self) -> Option<&str> {
        self.inner.primary_key.as_deref()
    }

    pub(crate) fn setter(&self, field: &str) -> Option<&SetterFn> {
        self.inner.setters.get(field)
    }

    pub(crate) fn getter(&self, field: &str) -> Option<&GetterFn> {
        self.inner.getters.get(field)
    }

    pub(crate) fn method(&self, name: &str) -> Option<&MethodFn> {
        self.inner.methods.get(name)
    }

    /// 是否定义了实例方法
    pub fn has_method(&self, name: &str) -> bool {
        self.inner.methods.contains_key(name)
    }

    /// 读取静态常量
    pub fn static_value(&self, name: &str) -> Option<&DataValue> {
        match self.inner.statics.get(name) {
            Some(StaticMember::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// 调用静态方法
    pub fn call_static(&self, name: &str, args: &[DataValue]) -> QuickModelResult<DataValue> {
        match self.inner.statics.get(name) {
            Some(StaticMember::Function(func)) => func.call(self, args),
            _ => Err(crate::quick_error!(method, name)),
        }
    }

    /// 由输入数据构造实例；`Null` 或非对象输入表示不覆盖任何字段
    pub fn create(&self, input: impl Into<DataValue>) -> QuickModelResult<Model> {
        Model::construct(self.clone(), input.into())
    }

    /// 由实现了 `ToDataValue` 的值构造实例
    pub fn create_from<T: ToDataValue + ?Sized>(&self, source: &T) -> QuickModelResult<Model> {
        self.create(source.to_data_value())
    }

    /// 由 JSON 字符串构造实例
    pub fn create_from_json(&self, json: &str) -> QuickModelResult<Model> {
        self.create(DataValue::from_json_string(json)?)
    }

    /// 由存储列名为键的数据构造实例，未知的键被忽略
    pub fn to_model(&self, row: impl Into<DataValue>) -> QuickModelResult<Model> {
        let row = match row.into() {
            DataValue::Object(row) => row,
            _ => return self.create(DataValue::Null),
        };

        let mut input = DataMap::new();
        for (field, definition) in self.definitions() {
            if let Some(value) = row.get(&definition.column) {
                input.insert(field.clone(), value.clone());
            }
        }

        self.create(DataValue::Object(input))
    }
}

impl PartialEq for ModelClass {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl InstanceOf for ModelClass {
    fn is_instance(&self, value: &DataValue) -> bool {
        match value {
            DataValue::Model(model) => model.is_instance_of(self),
            _ => false,
        }
    }
}

/// 模型类构建器
pub struct ModelClassBuilder {
    name: String,
    parent: Option<ModelClass>,
    schema: RawSchema,
    setters: HashMap<String, SetterFn>,
    getters: HashMap<String, GetterFn>,
    methods: HashMap<String, MethodFn>,
    statics: HashMap<String, StaticMember>,
}

impl ModelClassBuilder {
    fn new(name: &str, parent: Option<ModelClass>) -> Self {
        Self {
            name: name.to_string(),
            parent,
            schema: RawSchema::new(),
            setters: HashMap::new(),
            getters: HashMap::new(),
            methods: HashMap::new(),
            statics: HashMap::new(),
        }
    }

    /// 声明字段；`None` 表示声明缺失，构建时报 `InvalidDatatype`
    pub fn field(mut self, name: &str, schema: impl Into<Option<FieldSchema>>) -> Self {
        self.schema.insert(name, schema);
        self
    }

    /// 按顺序声明一组字段
    pub fn schema(mut self, schema: RawSchema) -> Self {
        for (name, entry) in schema.iter() {
            self.schema.insert(name, entry.clone());
        }
        self
    }

    /// 注册字段 setter
    pub fn setter<F>(mut self, field: &str, func: F) -> Self
    where
        F: Fn(&mut Model, DataValue, &DataValue) -> QuickModelResult<Option<DataValue>>
            + Send
            + Sync
            + 'static,
    {
        self.setters.insert(field.to_string(), SetterFn(Arc::new(func)));
        self
    }

    /// 注册字段 getter
    pub fn getter<F>(mut self, field: &str, func: F) -> Self
    where
        F: Fn(&Model) -> DataValue + Send + Sync + 'static,
    {
        self.getters.insert(field.to_string(), GetterFn(Arc::new(func)));
        self
    }

    /// 添加实例方法
    pub fn method<F>(mut self, name: &str, func: F) -> Self
    where
        F: Fn(&mut Model, &[DataValue]) -> QuickModelResult<DataValue> + Send + Sync + 'static,
    {
        self.methods.insert(name.to_string(), MethodFn(Arc::new(func)));
        self
    }

    /// 添加静态常量
    pub fn static_value(mut self, name: &str, value: impl Into<DataValue>) -> Self {
        self.statics
            .insert(name.to_string(), StaticMember::Value(value.into()));
        self
    }

    /// 添加静态方法
    pub fn static_fn<F>(mut self, name: &str, func: F) -> Self
    where
        F: Fn(&ModelClass, &[DataValue]) -> QuickModelResult<DataValue> + Send + Sync + 'static,
    {
        self.statics.insert(
            name.to_string(),
            StaticMember::Function(StaticFn(Arc::new(func))),
        );
        self
    }

    /// 编译字段声明并生成模型类
    ///
    /// 字段类型无效、验证规则引用无效或声明了多个主键时立即失败
    pub fn build(self) -> QuickModelResult<ModelClass> {
        let (mut definitions, mut setters, mut getters, mut methods, mut statics, mut lineage) =
            match &self.parent {
                Some(parent) => {
                    let inner = &parent.inner;
                    (
                        inner.definitions.clone(),
                        inner.setters.clone(),
                        inner.getters.clone(),
                        inner.methods.clone(),
                        inner.statics.clone(),
                        inner.lineage.clone(),
                    )
                }
                None => Default::default(),
            };

        for (name, entry) in self.schema.iter() {
            let definition = Definition::compile(name, entry.as_ref())?;
            definitions.insert(name.clone(), definition);
        }

        let primary_key = Self::resolve_primary_key(&definitions)?;
        Self::check_match_rules(&definitions)?;

        setters.extend(self.setters);
        getters.extend(self.getters);
        methods.extend(self.methods);
        statics.extend(self.statics);

        let id = NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed);
        lineage.push(id);

        match &self.parent {
            Some(parent) => info!(
                "模型类编译完成: {} (继承自 {}), 字段数: {}",
                self.name,
                parent.name(),
                definitions.len()
            ),
            None => info!("模型类编译完成: {}, 字段数: {}", self.name, definitions.len()),
        }
        debug!("模型类 {} 的字段: {:?}", self.name, definitions.keys().collect::<Vec<_>>());

        Ok(ModelClass {
            inner: Arc::new(ClassInner {
                id,
                name: self.name,
                lineage,
                definitions,
                primary_key,
                setters,
                getters,
                methods,
                statics,
            }),
        })
    }

    fn resolve_primary_key(definitions: &IndexMap<String, Definition>) -> QuickModelResult<Option<String>> {
        let mut primary_key: Option<String> = None;

        for (name, definition) in definitions {
            if !definition.primary_key {
                continue;
            }
            if let Some(existing) = &primary_key {
                return Err(QuickModelError::MultiplePrimaryKeys {
                    existing: existing.clone(),
                    field: name.clone(),
                });
            }
            primary_key = Some(name.clone());
        }

        Ok(primary_key)
    }

    /// `match` 规则必须只带一个指向已声明字段的字符串参数
    fn check_match_rules(definitions: &IndexMap<String, Definition>) -> QuickModelResult<()> {
        use crate::model::field_types::CompiledRule;
        use crate::validation::RuleId;

        for (name, definition) in definitions {
            for rule in &definition.validation {
                let CompiledRule::Named { id: RuleId::Match, params } = rule else {
                    continue;
                };

                let target = match params.as_slice() {
                    [DataValue::String(target)] => target,
                    _ => {
                        return Err(crate::quick_error!(
                            config,
                            format!("字段 {} 的 match 规则必须只有一个字段名参数", name)
                        ));
                    }
                };

                if !definitions.contains_key(target) {
                    return Err(crate::quick_error!(
                        config,
                        format!("字段 {} 的 match 规则引用了未声明的字段: {}", name, target)
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::convenience::*;

    #[test]
    fn test_multiple_primary_keys_rejected() {
        let err = ModelClass::builder("Keys")
            .field("id", integer_field().primary_key())
            .field("other", integer_field().primary_key())
            .build()
            .unwrap_err();
        assert_eq!(err.code(), "CANNOT_SET_MULTIPLE_PRIMARY_KEYS");
    }

    #[test]
    fn test_child_redeclared_field_keeps_position() {
        let parent = ModelClass::builder("Parent")
            .field("a", string_field())
            .field("b", float_field())
            .build()
            .unwrap();
        let child = parent
            .extend("Child")
            .field("b", integer_field())
            .field("c", boolean_field())
            .build()
            .unwrap();

        let fields: Vec<&String> = child.definitions().keys().collect();
        assert_eq!(fields, vec!["a", "b", "c"]);
        assert_eq!(child.definition("b").unwrap().datatype.name(), "integer");
        assert_eq!(parent.definition("b").unwrap().datatype.name(), "float");
        assert!(child.is_subclass_of(&parent));
        assert!(!parent.is_subclass_of(&child));
    }

    #[test]
    fn test_match_rule_target_must_exist() {
        let err = ModelClass::builder("Passwords")
            .field("password2", string_field().rule_with("match", "password"))
            .build()
            .unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
