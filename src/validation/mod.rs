//! 验证规则库
//!
//! 每条规则对已转换的值做检查，通过时返回 `Ok(())`，失败时返回带有
//! 固定错误码、失败值和规则参数的 `RuleFailure`。

use crate::datatypes::{self, deep_equal};
use crate::types::DataValue;
use once_cell::sync::Lazy;
use regex::RegexBuilder;
use serde::Serialize;
use std::sync::Arc;

/// 邮箱格式（不是完整的 RFC 校验）
static EMAIL_PATTERN: Lazy<Option<regex::Regex>> = Lazy::new(|| {
    RegexBuilder::new(r"^([a-z0-9+_\-]+)(\.[a-z0-9+_\-]+)*@([a-z0-9\-]+\.)+[a-z]{2,6}$")
        .case_insensitive(true)
        .build()
        .ok()
});

/// 自定义规则返回 false 时的错误码
pub const CUSTOM_VALIDATION_FAILED: &str = "CUSTOM_VALIDATION_FAILED";

/// 单条规则的失败记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleFailure {
    /// 错误码
    pub code: String,
    /// 失败的值
    pub value: DataValue,
    /// 规则参数（规则无参数时为 None）
    pub params: Option<Vec<DataValue>>,
}

impl RuleFailure {
    pub fn new(code: &str, value: &DataValue) -> Self {
        Self {
            code: code.to_string(),
            value: value.clone(),
            params: None,
        }
    }

    pub fn with_params(code: &str, value: &DataValue, params: Vec<DataValue>) -> Self {
        Self {
            code: code.to_string(),
            value: value.clone(),
            params: Some(params),
        }
    }
}

/// 规则检查结果
pub type RuleResult = Result<(), RuleFailure>;

/// 规则库中的规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    Required,
    Email,
    MinLength,
    MaxLength,
    Length,
    LengthBetween,
    Regex,
    Equal,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Match,
}

impl RuleId {
    /// 按名称查找规则
    pub fn from_name(name: &str) -> Option<Self> {
        let rule = match name {
            "required" => RuleId::Required,
            "email" => RuleId::Email,
            "minLength" => RuleId::MinLength,
            "maxLength" => RuleId::MaxLength,
            "length" => RuleId::Length,
            "lengthBetween" => RuleId::LengthBetween,
            "regex" => RuleId::Regex,
            "equal" => RuleId::Equal,
            "greaterThan" => RuleId::GreaterThan,
            "greaterThanOrEqual" => RuleId::GreaterThanOrEqual,
            "lessThan" => RuleId::LessThan,
            "lessThanOrEqual" => RuleId::LessThanOrEqual,
            "match" => RuleId::Match,
            _ => return None,
        };
        Some(rule)
    }

    /// 规则名称
    pub fn name(&self) -> &'static str {
        match self {
            RuleId::Required => "required",
            RuleId::Email => "email",
            RuleId::MinLength => "minLength",
            RuleId::MaxLength => "maxLength",
            RuleId::Length => "length",
            RuleId::LengthBetween => "lengthBetween",
            RuleId::Regex => "regex",
            RuleId::Equal => "equal",
            RuleId::GreaterThan => "greaterThan",
            RuleId::GreaterThanOrEqual => "greaterThanOrEqual",
            RuleId::LessThan => "lessThan",
            RuleId::LessThanOrEqual => "lessThanOrEqual",
            RuleId::Match => "match",
        }
    }

    /// 以展开后的参数列表执行规则，缺少的参数按 Null 处理
    pub fn run(&self, value: &DataValue, args: &[DataValue]) -> RuleResult {
        let arg = |index: usize| args.get(index).unwrap_or(&DataValue::Null);

        match self {
            RuleId::Required => required(value),
            RuleId::Email => email(value),
            RuleId::MinLength => min_length(value, arg(0)),
            RuleId::MaxLength => max_length(value, arg(0)),
            RuleId::Length => length(value, arg(0)),
            RuleId::LengthBetween => length_between(value, arg(0), arg(1)),
            RuleId::Regex => regex(value, arg(0)),
            RuleId::Equal => equal(value, arg(0)),
            RuleId::GreaterThan => greater_than(value, arg(0)),
            RuleId::GreaterThanOrEqual => greater_than_or_equal(value, arg(0)),
            RuleId::LessThan => less_than(value, arg(0)),
            RuleId::LessThanOrEqual => less_than_or_equal(value, arg(0)),
            RuleId::Match => match_value(value, arg(0)),
        }
    }
}

/// 自定义规则：返回 `Ok(false)` 或 `Err(message)` 表示失败
#[derive(Clone)]
pub struct CustomRule(Arc<dyn Fn(&DataValue, &[DataValue]) -> Result<bool, String> + Send + Sync>);

impl CustomRule {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&DataValue, &[DataValue]) -> Result<bool, String> + Send + Sync + 'static,
    {
        Self(Arc::new(func))
    }

    /// 执行自定义规则；失败记录不带参数
    pub fn run(&self, value: &DataValue, args: &[DataValue]) -> RuleResult {
        match (self.0)(value, args) {
            Ok(true) => Ok(()),
            Ok(false) => Err(RuleFailure::new(CUSTOM_VALIDATION_FAILED, value)),
            Err(message) => Err(RuleFailure::new(&message, value)),
        }
    }
}

impl std::fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CustomRule(..)")
    }
}

/// 必填：null、空字符串和 NaN 视为未填写，0 和 false 是有效值
pub fn required(value: &DataValue) -> RuleResult {
    let missing = match value {
        DataValue::Null => true,
        DataValue::String(s) => s.is_empty(),
        DataValue::Float(f) => f.is_nan(),
        _ => false,
    };

    if missing {
        Err(RuleFailure::new("VALUE_REQUIRED", value))
    } else {
        Ok(())
    }
}

/// 邮箱格式
pub fn email(value: &DataValue) -> RuleResult {
    let text = value
        .as_str()
        .ok_or_else(|| RuleFailure::new("VALUE_NOT_EMAIL_NOT_STRING", value))?;

    let matched = EMAIL_PATTERN
        .as_ref()
        .map(|re| re.is_match(text))
        .unwrap_or(false);

    if matched {
        Ok(())
    } else {
        Err(RuleFailure::new("VALUE_NOT_EMAIL", value))
    }
}

/// 字符串按字符数、数组按元素数、对象按键数计算长度
fn measure(value: &DataValue) -> Option<usize> {
    match value {
        DataValue::String(s) => Some(s.chars().count()),
        DataValue::Array(arr) => Some(arr.len()),
        DataValue::Object(obj) => Some(obj.len()),
        _ => None,
    }
}

/// 长度参数检查用到的错误码
struct LengthCodes {
    not_integer: &'static str,
    less_than_zero: &'static str,
}

const MIN_LENGTH_CODES: LengthCodes = LengthCodes {
    not_integer: "MIN_LENGTH_NOT_INTEGER",
    less_than_zero: "MIN_LENGTH_LESS_THAN_ZERO",
};

const MAX_LENGTH_CODES: LengthCodes = LengthCodes {
    not_integer: "MAX_LENGTH_NOT_INTEGER",
    less_than_zero: "MAX_LENGTH_LESS_THAN_ZERO",
};

const LENGTH_CODES: LengthCodes = LengthCodes {
    not_integer: "LENGTH_NOT_INTEGER",
    less_than_zero: "LENGTH_LESS_THAN_ZERO",
};

/// 把长度参数转换为非负整数
///
/// 不是整数时失败记录带原始参数，为负数时带转换后的整数
fn length_param(
    value: &DataValue,
    param: &DataValue,
    codes: &LengthCodes,
    params_for_failure: impl Fn(DataValue) -> Vec<DataValue>,
) -> Result<i64, RuleFailure> {
    match datatypes::to_integer(param, &DataValue::Null) {
        DataValue::Int(n) if n < 0 => Err(RuleFailure::with_params(
            codes.less_than_zero,
            value,
            params_for_failure(DataValue::Int(n)),
        )),
        DataValue::Int(n) => Ok(n),
        _ => Err(RuleFailure::with_params(
            codes.not_integer,
            value,
            params_for_failure(param.clone()),
        )),
    }
}

/// 最小长度
pub fn min_length(value: &DataValue, length: &DataValue) -> RuleResult {
    let min = length_param(value, length, &MIN_LENGTH_CODES, |p| vec![p])?;
    let params = vec![DataValue::Int(min)];

    let actual = measure(value).ok_or_else(|| {
        RuleFailure::with_params("VALUE_MIN_LENGTH_NOT_STRING", value, params.clone())
    })?;

    if (actual as i64) < min {
        return Err(RuleFailure::with_params("VALUE_LESS_THAN_MIN_LENGTH", value, params));
    }
    Ok(())
}

/// 最大长度
pub fn max_length(value: &DataValue, length: &DataValue) -> RuleResult {
    let max = length_param(value, length, &MAX_LENGTH_CODES, |p| vec![p])?;
    let params = vec![DataValue::Int(max)];

    let actual = measure(value).ok_or_else(|| {
        RuleFailure::with_params("VALUE_MAX_LENGTH_NOT_STRING", value, params.clone())
    })?;

    if (actual as i64) > max {
        return Err(RuleFailure::with_params("VALUE_GREATER_THAN_MAX_LENGTH", value, params));
    }
    Ok(())
}

/// 精确长度
pub fn length(value: &DataValue, length: &DataValue) -> RuleResult {
    let expected = length_param(value, length, &LENGTH_CODES, |p| vec![p])?;
    let params = vec![DataValue::Int(expected)];

    let actual = measure(value).ok_or_else(|| {
        RuleFailure::with_params("VALUE_LENGTH_NOT_STRING", value, params.clone())
    })?;

    if actual as i64 != expected {
        return Err(RuleFailure::with_params("VALUE_NOT_EQUAL_TO_LENGTH", value, params));
    }
    Ok(())
}

/// 长度区间（闭区间）
pub fn length_between(value: &DataValue, min: &DataValue, max: &DataValue) -> RuleResult {
    let min_value = length_param(value, min, &MIN_LENGTH_CODES, |p| vec![p, max.clone()])?;
    let max_value = length_param(value, max, &MAX_LENGTH_CODES, |p| {
        vec![DataValue::Int(min_value), p]
    })?;
    let params = vec![DataValue::Int(min_value), DataValue::Int(max_value)];

    if max_value < min_value {
        return Err(RuleFailure::with_params("MAX_LENGTH_LESS_THAN_MIN_LENGTH", value, params));
    }

    let actual = measure(value).ok_or_else(|| {
        RuleFailure::with_params("VALUE_LENGTH_BETWEEN_NOT_STRING", value, params.clone())
    })? as i64;

    if actual < min_value || actual > max_value {
        return Err(RuleFailure::with_params(
            "VALUE_NOT_BETWEEN_MINLENGTH_AND_MAXLENGTH",
            value,
            params,
        ));
    }
    Ok(())
}

/// 正则匹配，字符串形式的正则先编译
pub fn regex(value: &DataValue, pattern: &DataValue) -> RuleResult {
    let params = vec![pattern.clone()];

    let compiled = datatypes::resolve_pattern(pattern).map_err(|_| {
        RuleFailure::with_params("REGEX_NOT_REGEXP_OR_STRING", value, params.clone())
    })?;

    let text = value.as_str().ok_or_else(|| {
        RuleFailure::with_params("VALUE_REGEX_NOT_STRING", value, params.clone())
    })?;

    if compiled.is_match(text) {
        Ok(())
    } else {
        Err(RuleFailure::with_params("VALUE_REGEX_FAILED", value, params))
    }
}

/// 相等：标量直接比较，非标量做深度结构比较
pub fn equal(value: &DataValue, expected: &DataValue) -> RuleResult {
    if deep_equal(value, expected) {
        Ok(())
    } else {
        Err(RuleFailure::with_params(
            "VALUE_NOT_EQUAL",
            value,
            vec![expected.clone()],
        ))
    }
}

/// 与另一个字段的当前值比较
pub fn match_value(value: &DataValue, other: &DataValue) -> RuleResult {
    if deep_equal(value, other) {
        Ok(())
    } else {
        Err(RuleFailure::with_params(
            "VALUE_DOES_NOT_MATCH",
            value,
            vec![other.clone()],
        ))
    }
}

/// 两个操作数都转换为数字后比较
fn compare_numbers(
    value: &DataValue,
    target: &DataValue,
    not_number_code: &str,
    failed_code: &str,
    accept: impl Fn(f64, f64) -> bool,
) -> RuleResult {
    let params = vec![target.clone()];
    let as_number = |v: &DataValue| datatypes::to_float(v, &DataValue::Null).as_f64();

    match (as_number(value), as_number(target)) {
        (Some(left), Some(right)) => {
            if accept(left, right) {
                Ok(())
            } else {
                Err(RuleFailure::with_params(failed_code, value, params))
            }
        }
        _ => Err(RuleFailure::with_params(not_number_code, value, params)),
    }
}

/// 大于
pub fn greater_than(value: &DataValue, target: &DataValue) -> RuleResult {
    compare_numbers(
        value,
        target,
        "VALUE_GREATER_THAN_NOT_NUMBER",
        "VALUE_NOT_GREATER_THAN",
        |l, r| l > r,
    )
}

/// 大于等于
pub fn greater_than_or_equal(value: &DataValue, target: &DataValue) -> RuleResult {
    compare_numbers(
        value,
        target,
        "VALUE_GREATER_THAN_OR_EQUAL_NOT_NUMBER",
        "VALUE_NOT_GREATER_THAN_OR_EQUAL",
        |l, r| l >= r,
    )
}

/// 小于
pub fn less_than(value: &DataValue, target: &DataValue) -> RuleResult {
    compare_numbers(
        value,
        target,
        "VALUE_LESS_THAN_NOT_NUMBER",
        "VALUE_NOT_LESS_THAN",
        |l, r| l < r,
    )
}

/// 小于等于
pub fn less_than_or_equal(value: &DataValue, target: &DataValue) -> RuleResult {
    compare_numbers(
        value,
        target,
        "VALUE_LESS_THAN_OR_EQUAL_NOT_NUMBER",
        "VALUE_NOT_LESS_THAN_OR_EQUAL",
        |l, r| l <= r,
    )
}

/// 把规则声明的参数展开为参数列表：无参数为空，数组逐项展开，其他值作为唯一参数
pub fn normalize_params(param: Option<&DataValue>) -> Vec<DataValue> {
    match param {
        None => Vec::new(),
        Some(DataValue::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
    }
}
