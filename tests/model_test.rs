//! 模型定义系统测试

#[cfg(test)]
mod tests {
    use rat_quickmodel::model::{FieldSchema, RawSchema, RuleSpec};
    use rat_quickmodel::*;

    fn s(value: &str) -> DataValue {
        DataValue::from(value)
    }

    fn user_class() -> ModelClass {
        ModelClass::builder("User")
            .field("id", integer_field().column("_id").primary_key())
            .field("name", string_field().rule("required"))
            .field("emailAddress", string_field().column("email").rule("email"))
            .field("age", integer_field().default_value(18))
            .field("active", boolean_field().default_value(true))
            .field("tags", array_field())
            .field("created", date_field())
            .field("meta", object_field())
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults_when_no_input() {
        println!("🔍 测试默认值");

        let user = user_class().create(DataValue::Null).unwrap();
        assert_eq!(user.get("id"), Some(DataValue::Null));
        assert_eq!(user.get("name"), Some(DataValue::Null));
        assert_eq!(user.get("age"), Some(DataValue::Int(18)));
        assert_eq!(user.get("active"), Some(DataValue::Bool(true)));
        assert_eq!(user.get("tags"), Some(DataValue::Null));
        assert!(user.get("notAField").is_none());
        assert!(user.is_set());
        println!("✅ 默认值正确");
    }

    #[test]
    fn test_create_coerces_input() {
        let user = user_class()
            .create(data_object! {
                "id" => "12",
                "name" => 27,
                "age" => "not a number",
                "active" => "N",
                "tags" => data_array!["a", "b"],
                "created" => "2013-02-07 10:20:30",
                "meta" => data_array![],
                "unknown" => "ignored",
            })
            .unwrap();

        assert_eq!(user.get("id"), Some(DataValue::Int(12)));
        assert_eq!(user.get("name"), Some(s("27")));
        assert_eq!(user.get("age"), Some(DataValue::Int(18)));
        assert_eq!(user.get("active"), Some(DataValue::Bool(false)));
        assert_eq!(user.get("tags"), Some(data_array!["a", "b"]));
        assert!(matches!(user.get("created"), Some(DataValue::DateTime(_))));
        assert_eq!(user.get("meta"), Some(DataValue::Null));
        assert!(user.get("unknown").is_none());
        assert_eq!(user.primary_key(), Some("id"));
        assert_eq!(user.primary_key_value(), Some(DataValue::Int(12)));
    }

    #[test]
    fn test_to_data_and_to_model_round_trip() {
        println!("🔍 测试存储列名往返");

        let class = user_class();
        let user = class
            .create(data_object! { "id" => 3, "name" => "Test", "emailAddress" => "test@test.com" })
            .unwrap();

        let data = user.to_data();
        assert_eq!(data["_id"], DataValue::Int(3));
        assert_eq!(data["email"], s("test@test.com"));
        assert!(!data.contains_key("emailAddress"));

        let restored = class.to_model(DataValue::Object(data.clone())).unwrap();
        assert_eq!(restored.to_object(), user.to_object());
        assert_eq!(restored.to_data(), data);

        // 以字段名为键的数据不会被 to_model 识别
        let by_field = class.to_model(data_object! { "emailAddress" => "x@test.com" }).unwrap();
        assert_eq!(by_field.get("emailAddress"), Some(DataValue::Null));
        println!("✅ 往返正确");
    }

    #[test]
    fn test_to_json_and_create_from_json() {
        let class = user_class();
        let user = class
            .create_from_json(r#"{"id": 1, "name": "Json", "tags": [1, 2]}"#)
            .unwrap();
        let json = user.to_json();
        assert_eq!(json["id"], serde_json::json!(1));
        assert_eq!(json["name"], serde_json::json!("Json"));
        assert_eq!(json["tags"], serde_json::json!([1, 2]));
        assert_eq!(json["age"], serde_json::json!(18));

        let again = class.create_from_json(&json.to_string()).unwrap();
        assert_eq!(again.to_object(), user.to_object());
    }

    #[test]
    fn test_create_from_native_map() {
        let mut input = std::collections::HashMap::new();
        input.insert("name".to_string(), "Map".to_string());
        let user = user_class().create_from(&input).unwrap();
        assert_eq!(user.get("name"), Some(s("Map")));
    }

    #[test]
    fn test_set_generic_path_returns_none() {
        let mut user = user_class().create(DataValue::Null).unwrap();
        assert_eq!(user.set("age", "42").unwrap(), None);
        assert_eq!(user.get("age"), Some(DataValue::Int(42)));

        user.set("age", "forty").unwrap();
        assert_eq!(user.get("age"), Some(DataValue::Int(18)));
    }

    #[test]
    fn test_custom_setter_and_getter() {
        println!("🔍 测试自定义 setter/getter");

        let class = ModelClass::builder("Prefixed")
            .field("name", string_field())
            .field("size", integer_field().default_value(1))
            .setter("name", |model, value, _def| {
                model.store("name", format!("test-{}", value));
                Ok(Some(DataValue::Bool(true)))
            })
            .setter("size", |model, value, def| {
                let doubled = match value.as_i64() {
                    Some(n) => DataValue::Int(n * 2),
                    None => def.clone(),
                };
                model.store("size", doubled);
                Ok(None)
            })
            .getter("size", |model| {
                let raw = model.attribute("size").and_then(|v| v.as_i64()).unwrap_or(0);
                DataValue::from(format!("{} units", raw))
            })
            .build()
            .unwrap();

        let mut item = class.create(data_object! { "name" => "value" }).unwrap();
        assert_eq!(item.get("name"), Some(s("test-value")));
        assert_eq!(item.set("name", "other").unwrap(), Some(DataValue::Bool(true)));
        assert_eq!(item.get("name"), Some(s("test-other")));

        item.set("size", 4).unwrap();
        assert_eq!(item.attribute("size"), Some(&DataValue::Int(8)));
        assert_eq!(item.get("size"), Some(s("8 units")));
        assert_eq!(item.to_object()["size"], DataValue::Int(8));
        println!("✅ setter/getter 正确");
    }

    #[test]
    fn test_enum_mixed_and_function_types() {
        let class = ModelClass::builder("Typed")
            .field("level", enum_field(vec!["low", "high"]).default_value("low"))
            .field("anything", mixed_field())
            .field(
                "func",
                custom_field(|value, def| DataValue::from(format!("value is {} default is {}", value, def)))
                    .default_value("def"),
            )
            .build()
            .unwrap();

        let mut model = class
            .create(data_object! { "level" => "high", "anything" => data_array![1, "a"], "func" => "hello" })
            .unwrap();
        assert_eq!(model.get("level"), Some(s("high")));
        assert_eq!(model.get("anything"), Some(data_array![1, "a"]));
        assert_eq!(model.get("func"), Some(s("value is hello default is def")));

        model.set("level", "medium").unwrap();
        assert_eq!(model.get("level"), Some(s("low")));
        assert_eq!(model.get_definition("func").unwrap().datatype.name(), "function");
    }

    #[test]
    fn test_methods_and_statics() {
        let class = ModelClass::builder("Counter")
            .field("count", integer_field().default_value(0))
            .method("increment", |model, args| {
                let by = args.first().and_then(|v| v.as_i64()).unwrap_or(1);
                let current = model.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
                model.set("count", current + by)?;
                Ok(DataValue::Int(current + by))
            })
            .static_value("TABLE", "counters")
            .static_fn("describe", |class, _| Ok(DataValue::from(class.name())))
            .build()
            .unwrap();

        let mut counter = class.create(DataValue::Null).unwrap();
        assert_eq!(counter.call("increment", &[]).unwrap(), DataValue::Int(1));
        assert_eq!(counter.call("increment", &[DataValue::Int(5)]).unwrap(), DataValue::Int(6));
        assert!(class.has_method("increment"));

        let err = counter.call("decrement", &[]).unwrap_err();
        assert_eq!(err.code(), "METHOD_NOT_FOUND");

        assert_eq!(class.static_value("TABLE"), Some(&s("counters")));
        assert_eq!(class.call_static("describe", &[]).unwrap(), s("Counter"));
        assert!(class.static_value("describe").is_none());
        assert_eq!(class.call_static("TABLE", &[]).unwrap_err().code(), "METHOD_NOT_FOUND");
    }

    #[test]
    fn test_settings() {
        let class = ModelClass::builder("Settings")
            .field("name", string_field().setting("test", 222).setting("label", "Name"))
            .build()
            .unwrap();
        let definition = class.definition("name").unwrap();
        assert_eq!(definition.setting("test"), Some(&DataValue::Int(222)));
        assert_eq!(definition.setting("label"), Some(&s("Name")));
        assert!(definition.setting("undefined").is_none());
    }

    #[test]
    fn test_inheritance() {
        println!("🔍 测试模型继承");

        let parent = ModelClass::builder("Parent")
            .field("name", string_field())
            .field("score", float_field())
            .method("greet", |model, _| {
                Ok(DataValue::from(format!("hello {}", model.get("name").unwrap_or_default())))
            })
            .build()
            .unwrap();
        let child = parent
            .extend("Child")
            .field("score", integer_field())
            .field("extra", boolean_field())
            .build()
            .unwrap();

        let mut instance = child
            .create(data_object! { "name" => "kid", "score" => "2.5", "extra" => "yes" })
            .unwrap();
        assert!(instance.get("score").unwrap().is_null());
        instance.set("score", 3).unwrap();
        assert_eq!(instance.get("score"), Some(DataValue::Int(3)));
        assert_eq!(instance.get("extra"), Some(DataValue::Bool(true)));
        assert_eq!(instance.call("greet", &[]).unwrap(), s("hello kid"));

        assert!(instance.is_instance_of(&child));
        assert!(instance.is_instance_of(&parent));

        let parent_instance = parent.create(data_object! { "score" => "2.5" }).unwrap();
        assert_eq!(parent_instance.get("score"), Some(DataValue::Float(2.5)));
        assert!(!parent_instance.is_instance_of(&child));
        println!("✅ 继承正确");
    }

    #[test]
    fn test_configuration_errors() {
        println!("🔍 测试模型配置错误");

        let err = ModelClass::builder("Broken").field("notSet", None::<FieldSchema>).build().unwrap_err();
        assert_eq!(err.code(), "DATATYPE_NOT_VALID");
        assert!(err.is_configuration_error());

        let err = ModelClass::builder("Broken")
            .field("banana", FieldSchema::typed("banana"))
            .build()
            .unwrap_err();
        assert_eq!(err.code(), "DATATYPE_NOT_VALID");

        let err = ModelClass::builder("Broken")
            .field("str", string_field().rule("minimumLength"))
            .build()
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_RULE_NOT_FOUND");
        assert_eq!(err.to_string(), "minimumLength is not a validation function");

        let err = ModelClass::builder("Broken")
            .field("str", string_field().validation(RuleSpec::invalid(2)))
            .build()
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_RULE_NOT_CALLABLE");
        assert_eq!(err.to_string(), "2 is not a function or string");

        let err = ModelClass::builder("Broken")
            .field("a", integer_field().primary_key())
            .field("b", string_field().primary_key())
            .build()
            .unwrap_err();
        assert_eq!(err.code(), "CANNOT_SET_MULTIPLE_PRIMARY_KEYS");
        println!("✅ 配置错误正确");
    }

    #[test]
    fn test_schema_from_json() {
        let schema = RawSchema::from_json(
            r#"{
                "id": {"type": "integer", "column": "_id", "primaryKey": true},
                "code": {"type": "string", "validation": [{"rule": "lengthBetween", "param": [2, 4]}]}
            }"#,
        )
        .unwrap();
        let class = ModelClass::builder("FromJson").schema(schema).build().unwrap();
        assert_eq!(class.primary_key(), Some("id"));

        let model = class.create(data_object! { "code" => "x" }).unwrap();
        let err = model.validate().unwrap_err();
        let failures = err.field_errors("code").unwrap();
        assert_eq!(failures[0].message, "VALUE_NOT_BETWEEN_MINLENGTH_AND_MAXLENGTH");
        assert_eq!(failures[0].params, Some(vec![DataValue::Int(2), DataValue::Int(4)]));
    }

    #[test]
    fn test_validation_collects_all_failures() {
        println!("🔍 测试验证错误汇总");

        let class = ModelClass::builder("Signup")
            .field("name", string_field().rule("required").rule_with("minLength", 3))
            .field("email", string_field().rule("email"))
            .field("age", integer_field().rule_with("greaterThanOrEqual", 18))
            .field("nickname", string_field().rule_with("minLength", 3))
            .build()
            .unwrap();

        let model = class
            .create(data_object! { "name" => "", "email" => "nope", "age" => 12 })
            .unwrap();
        let err = model.validate().unwrap_err();

        assert_eq!(err.error_type(), "ModelError");
        assert_eq!(err.model_name(), "Signup");
        let fields: Vec<&String> = err.errors().keys().collect();
        assert_eq!(fields, vec!["name", "email", "age"]);

        let name_failures = err.field_errors("name").unwrap();
        assert_eq!(name_failures.len(), 2);
        assert_eq!(name_failures[0].message, "VALUE_REQUIRED");
        assert_eq!(name_failures[1].message, "VALUE_LESS_THAN_MIN_LENGTH");
        assert_eq!(name_failures[1].params, Some(vec![DataValue::Int(3)]));

        assert_eq!(err.field_errors("email").unwrap()[0].message, "VALUE_NOT_EMAIL");
        assert_eq!(err.field_errors("age").unwrap()[0].value, DataValue::Int(12));
        assert!(err.field_errors("nickname").is_none());

        assert_eq!(err.to_string(), "ModelError: Signup [name, email, age]");
        assert_eq!(err.trace().lines().count(), 5);

        let wrapped: QuickModelError = err.into();
        assert_eq!(wrapped.code(), "MODEL_VALIDATION_FAILED");
        println!("✅ 验证错误汇总正确");
    }

    #[test]
    fn test_validation_passes_and_is_idempotent() {
        let class = ModelClass::builder("Valid")
            .field("name", string_field().rule("required"))
            .field("flag", boolean_field().rule("required"))
            .build()
            .unwrap();
        let model = class.create(data_object! { "name" => "ok", "flag" => false }).unwrap();
        assert!(model.validate().is_ok());
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_custom_rules() {
        let class = ModelClass::builder("Custom")
            .field(
                "even",
                integer_field().custom_rule(|value, _| Ok(value.as_i64().map(|n| n % 2 == 0).unwrap_or(false))),
            )
            .field(
                "limit",
                integer_field().custom_rule_with(
                    |value, params| {
                        let max = params.first().and_then(|p| p.as_i64()).unwrap_or(0);
                        match value.as_i64() {
                            Some(n) if n > max => Err("TOO_LARGE".to_string()),
                            _ => Ok(true),
                        }
                    },
                    10,
                ),
            )
            .build()
            .unwrap();

        let model = class.create(data_object! { "even" => 3, "limit" => 11 }).unwrap();
        let err = model.validate().unwrap_err();
        let even = &err.field_errors("even").unwrap()[0];
        assert_eq!(even.message, "CUSTOM_VALIDATION_FAILED");
        assert!(even.params.is_none());
        assert_eq!(err.field_errors("limit").unwrap()[0].message, "TOO_LARGE");

        // 自定义规则在值为 null 时也会执行
        let empty = class.create(DataValue::Null).unwrap();
        let err = empty.validate().unwrap_err();
        assert!(err.field_errors("even").is_some());
        assert!(err.field_errors("limit").is_none());
    }

    #[test]
    fn test_match_rule() {
        let class = ModelClass::builder("Password")
            .field("password", string_field().rule("required"))
            .field("password2", string_field().rule_with("match", "password"))
            .build()
            .unwrap();

        let ok = class
            .create(data_object! { "password" => "secret", "password2" => "secret" })
            .unwrap();
        assert!(ok.validate().is_ok());

        let mut bad = class
            .create(data_object! { "password" => "secret", "password2" => "secrets" })
            .unwrap();
        let err = bad.validate().unwrap_err();
        let failure = &err.field_errors("password2").unwrap()[0];
        assert_eq!(failure.message, "VALUE_DOES_NOT_MATCH");
        assert_eq!(failure.params, Some(vec![s("secret")]));

        bad.set("password", "secrets").unwrap();
        assert!(bad.validate().is_ok());

        // 确认字段未填写时 match 仍然执行
        let missing = class.create(data_object! { "password" => "secret" }).unwrap();
        let err = missing.validate().unwrap_err();
        let failures = err.field_errors("password2").unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message, "VALUE_DOES_NOT_MATCH");
        assert!(failures[0].value.is_null());
        assert_eq!(failures[0].params, Some(vec![s("secret")]));

        let both_empty = class.create(data_object! { "password" => "" }).unwrap();
        let err = both_empty.validate().unwrap_err();
        assert!(err.field_errors("password2").is_some());
    }

    #[test]
    fn test_required_and_email_on_null_reports_only_required() {
        let class = ModelClass::builder("Contact")
            .field("email", string_field().rule("required").rule("email"))
            .build()
            .unwrap();

        let contact = class.create(DataValue::Null).unwrap();
        let err = contact.validate().unwrap_err();
        let failures = err.field_errors("email").unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message, "VALUE_REQUIRED");
        assert!(failures[0].value.is_null());
    }

    #[test]
    fn test_nested_model_through_setter() {
        println!("🔍 测试嵌套模型");

        let address = ModelClass::builder("Address")
            .field("street", string_field())
            .field("city", string_field())
            .build()
            .unwrap();

        let address_class = address.clone();
        let person = ModelClass::builder("Person")
            .field("name", string_field())
            .field("address", FieldSchema::typed("object"))
            .setter("address", move |model, value, _def| {
                let nested = match value {
                    DataValue::Model(m) if m.is_instance_of(&address_class) => *m,
                    other => address_class.create(other)?,
                };
                model.store("address", nested);
                Ok(None)
            })
            .build()
            .unwrap();

        let someone = person
            .create(data_object! {
                "name" => "Someone",
                "address" => data_object! { "street" => "1 Road", "city" => "Town" },
            })
            .unwrap();

        let nested = someone.get("address").unwrap();
        let nested = nested.as_model().unwrap();
        assert!(nested.is_instance_of(&address));
        assert!(nested.is_set());
        assert_eq!(nested.get("city"), Some(s("Town")));

        let json = someone.to_json();
        assert_eq!(json["address"], serde_json::json!({"street": "1 Road", "city": "Town"}));

        let empty = person.create(data_object! { "address" => DataValue::Null }).unwrap();
        assert!(!empty.get("address").unwrap().as_model().unwrap().is_set());
        println!("✅ 嵌套模型正确");
    }

    #[test]
    fn test_define_model_class_registers() {
        let class = define_model_class!(
            name = "RegisteredArticle",
            fields = {
                "title" => string_field().rule("required"),
                "views" => integer_field().default_value(0),
            }
        )
        .unwrap();

        assert!(has_model_class("RegisteredArticle"));
        let fetched = get_model_class("RegisteredArticle").unwrap();
        assert_eq!(fetched, class);
        assert!(registered_model_names().contains(&"RegisteredArticle".to_string()));

        let article = fetched.to_model(data_object! { "title" => "Hello" }).unwrap();
        assert_eq!(article.get("views"), Some(DataValue::Int(0)));

        assert!(unregister_model_class("RegisteredArticle").is_some());
        assert!(get_model_class("RegisteredArticle").is_none());
    }
}
