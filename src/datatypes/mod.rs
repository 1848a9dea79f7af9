//! 类型转换库
//!
//! 把任意输入规整为固定的几种标准类型。每个转换函数都是全函数：
//! 输入无法转换时原样返回调用方提供的默认值，从不因为输入值本身报错。
//! 唯一的例外是 `to_pattern`，当正则参数本身无效时返回 `InvalidPattern`。

mod equality;

pub use equality::{deep_equal, strict_equal};

use crate::error::QuickModelResult;
use crate::types::{DataValue, Pattern};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static INTEGER_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[+-]?\d+$").ok());

static FLOAT_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").ok());

/// 类构造器能力：判断一个值是否是某个"类"的实例
pub trait InstanceOf {
    /// 值是否为该类（或其子类）的实例
    fn is_instance(&self, value: &DataValue) -> bool;
}

/// 内置值种类，作为 `to_instance_of` 的构造器参数使用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Boolean,
    Number,
    String,
    Date,
    Array,
    Object,
    Regex,
    Function,
    Model,
}

impl InstanceOf for ValueKind {
    fn is_instance(&self, value: &DataValue) -> bool {
        match self {
            ValueKind::Boolean => matches!(value, DataValue::Bool(_)),
            ValueKind::Number => value.is_number(),
            ValueKind::String => matches!(value, DataValue::String(_)),
            ValueKind::Date => matches!(value, DataValue::DateTime(_)),
            ValueKind::Array => matches!(value, DataValue::Array(_)),
            // 日期、正则和嵌套模型同样是对象
            ValueKind::Object => matches!(
                value,
                DataValue::Object(_)
                    | DataValue::DateTime(_)
                    | DataValue::Regex(_)
                    | DataValue::Model(_)
            ),
            ValueKind::Regex => matches!(value, DataValue::Regex(_)),
            ValueKind::Function => matches!(value, DataValue::Function(_)),
            ValueKind::Model => matches!(value, DataValue::Model(_)),
        }
    }
}

/// 数组：序列原样返回
pub fn to_array(input: &DataValue, def: &DataValue) -> DataValue {
    match input {
        DataValue::Array(_) => input.clone(),
        _ => def.clone(),
    }
}

/// 布尔值
///
/// 字符串 Y/1/TRUE/T/YES 和 N/0/FALSE/F/NO（不区分大小写），数字 1 和 0
pub fn to_boolean(input: &DataValue, def: &DataValue) -> DataValue {
    match input {
        DataValue::Bool(_) => input.clone(),
        DataValue::String(s) => match s.to_uppercase().as_str() {
            "Y" | "1" | "TRUE" | "T" | "YES" => DataValue::Bool(true),
            "N" | "0" | "FALSE" | "F" | "NO" => DataValue::Bool(false),
            _ => def.clone(),
        },
        DataValue::Int(1) => DataValue::Bool(true),
        DataValue::Int(0) => DataValue::Bool(false),
        DataValue::Float(f) if *f == 1.0 => DataValue::Bool(true),
        DataValue::Float(f) if *f == 0.0 => DataValue::Bool(false),
        _ => def.clone(),
    }
}

/// 日期时间
pub fn to_date(input: &DataValue, def: &DataValue) -> DataValue {
    match input {
        DataValue::DateTime(_) => input.clone(),
        DataValue::String(s) => match parse_date(s.trim()) {
            Some(dt) => DataValue::DateTime(dt),
            None => def.clone(),
        },
        _ => def.clone(),
    }
}

/// 解析 ISO-8601 以及常见的 `YYYY-MM-DD[ HH:MM:SS]` 格式，无时区的按 UTC 处理
fn parse_date(s: &str) -> Option<DateTime<FixedOffset>> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// 浮点数：数字或十进制数字字符串
pub fn to_float(input: &DataValue, def: &DataValue) -> DataValue {
    match input {
        DataValue::Int(i) => DataValue::Float(*i as f64),
        DataValue::Float(f) if f.is_finite() => input.clone(),
        DataValue::String(s) => {
            let trimmed = s.trim();
            let is_decimal = FLOAT_PATTERN
                .as_ref()
                .map(|re| re.is_match(trimmed))
                .unwrap_or(false);
            if !is_decimal {
                return def.clone();
            }
            match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() => DataValue::Float(f),
                _ => def.clone(),
            }
        }
        _ => def.clone(),
    }
}

/// 整数：带可选符号的纯数字字符串或整数值，拒绝带小数部分的值
pub fn to_integer(input: &DataValue, def: &DataValue) -> DataValue {
    match input {
        DataValue::Int(_) => input.clone(),
        DataValue::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                DataValue::Int(*f as i64)
            } else {
                def.clone()
            }
        }
        DataValue::String(s) => {
            let is_integer = INTEGER_PATTERN
                .as_ref()
                .map(|re| re.is_match(s))
                .unwrap_or(false);
            if !is_integer {
                return def.clone();
            }
            s.trim_start_matches('+')
                .parse::<i64>()
                .map(DataValue::Int)
                .unwrap_or_else(|_| def.clone())
        }
        _ => def.clone(),
    }
}

/// 字符串：字符串与有限数字（转为文本）
///
/// 提供 `allowed` 时结果必须出现在列表中
pub fn to_string(input: &DataValue, def: &DataValue, allowed: Option<&[DataValue]>) -> DataValue {
    let text = match input {
        DataValue::String(s) => s.clone(),
        DataValue::Int(i) => i.to_string(),
        DataValue::Float(f) if f.is_finite() => format_number(*f),
        _ => return def.clone(),
    };

    let value = DataValue::String(text);
    match allowed {
        Some(list) if !list.iter().any(|item| strict_equal(item, &value)) => def.clone(),
        _ => value,
    }
}

/// 数字的文本形式：绝对值不小于 1e21 或小于 1e-6 时使用指数形式（`1e+21`、`1.5e-7`）
fn format_number(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }

    let magnitude = f.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let formatted = format!("{:e}", f);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }

    f.to_string()
}

/// 对象：非数组、非函数的对象（包括日期、正则和嵌套模型）
pub fn to_object(input: &DataValue, def: &DataValue) -> DataValue {
    match input {
        DataValue::Object(_)
        | DataValue::DateTime(_)
        | DataValue::Regex(_)
        | DataValue::Model(_) => input.clone(),
        _ => def.clone(),
    }
}

/// 枚举：输入严格等于允许值列表中的某一项则原样返回
pub fn to_enum(input: &DataValue, allowed: &[DataValue], def: &DataValue) -> DataValue {
    if allowed.iter().any(|item| strict_equal(item, input)) {
        input.clone()
    } else {
        def.clone()
    }
}

/// 实例：输入是给定构造器的实例则原样返回；未提供构造器时返回默认值
pub fn to_instance_of(input: &DataValue, ctor: Option<&dyn InstanceOf>, def: &DataValue) -> DataValue {
    match ctor {
        Some(ctor) if ctor.is_instance(input) => input.clone(),
        _ => def.clone(),
    }
}

/// 可调用对象
pub fn to_function(input: &DataValue, def: &DataValue) -> DataValue {
    match input {
        DataValue::Function(_) => input.clone(),
        _ => def.clone(),
    }
}

/// 任意值：非空输入原样返回
pub fn to_mixed(input: &DataValue, def: &DataValue) -> DataValue {
    if input.is_null() {
        def.clone()
    } else {
        input.clone()
    }
}

/// 正则模板：输入先按字符串转换，匹配则返回该字符串
///
/// `pattern` 必须是字符串或已编译的正则，否则返回 `InvalidPattern`。
/// 输入无法转为字符串时不检查 `pattern`，直接返回默认值。
pub fn to_pattern(input: &DataValue, pattern: &DataValue, def: &DataValue) -> QuickModelResult<DataValue> {
    let text = match to_string(input, &DataValue::Null, None) {
        DataValue::String(s) => s,
        _ => return Ok(def.clone()),
    };

    let compiled = resolve_pattern(pattern)?;
    if compiled.is_match(&text) {
        Ok(DataValue::String(text))
    } else {
        Ok(def.clone())
    }
}

/// 把字符串或已编译正则统一为 `Pattern`
pub(crate) fn resolve_pattern(pattern: &DataValue) -> QuickModelResult<Pattern> {
    match pattern {
        DataValue::Regex(p) => Ok(p.clone()),
        DataValue::String(source) => Pattern::new(source),
        other => Err(crate::quick_error!(pattern, other)),
    }
}
