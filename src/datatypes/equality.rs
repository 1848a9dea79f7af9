//! 结构相等比较

use crate::types::{DataMap, DataValue};

/// 深度结构相等
///
/// - 两个 NaN 视为相等
/// - 整数与浮点数按数值比较
/// - 数组逐元素比较，对象要求键集合一致且逐键相等（与键顺序无关）
/// - 嵌套模型要求同一个类且属性逐一相等
/// - 函数按引用比较，正则按源文本比较
pub fn deep_equal(a: &DataValue, b: &DataValue) -> bool {
    let mut visited = Vec::new();
    equal_inner(a, b, &mut visited)
}

/// 严格相等，用于允许值列表的成员判断
///
/// 标量按值比较（NaN 与任何值都不相等，整数与浮点数按数值比较），
/// 函数按引用比较；数组、对象、日期、正则和嵌套模型是独立的值，从不相等
pub fn strict_equal(a: &DataValue, b: &DataValue) -> bool {
    match (a, b) {
        (DataValue::Null, DataValue::Null) => true,
        (DataValue::Bool(x), DataValue::Bool(y)) => x == y,
        (DataValue::Int(x), DataValue::Int(y)) => x == y,
        (DataValue::Float(x), DataValue::Float(y)) => x == y,
        (DataValue::Int(x), DataValue::Float(y)) | (DataValue::Float(y), DataValue::Int(x)) => {
            (*x as f64) == *y
        }
        (DataValue::String(x), DataValue::String(y)) => x == y,
        (DataValue::Function(x), DataValue::Function(y)) => x.ptr_eq(y),
        _ => false,
    }
}

fn equal_inner(a: &DataValue, b: &DataValue, visited: &mut Vec<(usize, usize)>) -> bool {
    match (a, b) {
        (DataValue::Null, DataValue::Null) => true,
        (DataValue::Bool(x), DataValue::Bool(y)) => x == y,
        (DataValue::Int(x), DataValue::Int(y)) => x == y,
        (DataValue::Float(x), DataValue::Float(y)) => float_equal(*x, *y),
        (DataValue::Int(x), DataValue::Float(y)) | (DataValue::Float(y), DataValue::Int(x)) => {
            (*x as f64) == *y
        }
        (DataValue::String(x), DataValue::String(y)) => x == y,
        (DataValue::DateTime(x), DataValue::DateTime(y)) => x == y,
        (DataValue::Regex(x), DataValue::Regex(y)) => x == y,
        (DataValue::Function(x), DataValue::Function(y)) => x.ptr_eq(y),
        (DataValue::Array(x), DataValue::Array(y)) => {
            if x.len() != y.len() {
                return false;
            }
            guarded(a, b, visited, |visited| {
                x.iter().zip(y.iter()).all(|(l, r)| equal_inner(l, r, visited))
            })
        }
        (DataValue::Object(x), DataValue::Object(y)) => {
            guarded(a, b, visited, |visited| maps_equal(x, y, visited))
        }
        (DataValue::Model(x), DataValue::Model(y)) => {
            if x.model_class().id() != y.model_class().id() {
                return false;
            }
            guarded(a, b, visited, |visited| {
                maps_equal(x.attributes(), y.attributes(), visited)
            })
        }
        _ => false,
    }
}

fn float_equal(x: f64, y: f64) -> bool {
    (x.is_nan() && y.is_nan()) || x == y
}

fn maps_equal(x: &DataMap, y: &DataMap, visited: &mut Vec<(usize, usize)>) -> bool {
    if x.len() != y.len() {
        return false;
    }
    x.iter().all(|(key, left)| match y.get(key) {
        Some(right) => equal_inner(left, right, visited),
        None => false,
    })
}

/// 在当前递归分支上记录已访问的节点对，重复出现的节点对视为相等
fn guarded<F>(a: &DataValue, b: &DataValue, visited: &mut Vec<(usize, usize)>, compare: F) -> bool
where
    F: FnOnce(&mut Vec<(usize, usize)>) -> bool,
{
    let pair = (a as *const DataValue as usize, b as *const DataValue as usize);
    if visited.contains(&pair) {
        return true;
    }

    visited.push(pair);
    let result = compare(visited);
    visited.pop();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_object;

    #[test]
    fn test_strict_equal_scalars_only() {
        assert!(strict_equal(&DataValue::from("a"), &DataValue::from("a")));
        assert!(strict_equal(&DataValue::Int(2), &DataValue::Float(2.0)));
        assert!(!strict_equal(&DataValue::Float(f64::NAN), &DataValue::Float(f64::NAN)));
        assert!(!strict_equal(&data_object! {}, &data_object! {}));
        assert!(!strict_equal(&DataValue::Int(1), &DataValue::from("1")));
    }

    #[test]
    fn test_nan_equals_nan() {
        assert!(deep_equal(&DataValue::Float(f64::NAN), &DataValue::Float(f64::NAN)));
        assert!(!deep_equal(&DataValue::Float(f64::NAN), &DataValue::Float(1.0)));
    }

    #[test]
    fn test_object_key_order_ignored() {
        let a = data_object! { "a" => 1, "b" => vec![1, 2] };
        let b = data_object! { "b" => vec![1, 2], "a" => 1 };
        assert!(deep_equal(&a, &b));

        let c = data_object! { "a" => 1 };
        assert!(!deep_equal(&a, &c));
    }

    #[test]
    fn test_mismatched_kinds() {
        assert!(!deep_equal(&DataValue::from("1"), &DataValue::Int(1)));
        assert!(!deep_equal(&DataValue::Null, &DataValue::Bool(false)));
    }
}
