//! # **Join Module** - *Recursive join with separator and cycle detection (spec §4.E)*
//!
//! "Recursive join with a separator; detect cycles via the same recursion guard as
//! inspect; concatenate preserving the character-encoding compatibility rules of the
//! embedding string type (external collaborator)." The encoding-compatibility part is
//! explicitly an external-collaborator concern (spec §1); this crate's `Value::Str` is
//! a plain `Rc<str>` (always valid UTF-8), so there is no compatibility rule left to
//! enforce here.

use std::rc::Rc;

use crate::enums::error::ArrayError;
use crate::enums::value::Value;
use crate::structs::array::RArray;

pub fn join(arr: &RArray, sep: &str) -> Result<String, ArrayError> {
    let mut out = String::new();
    let mut need_sep = false;
    let mut stack: Vec<*const RArray> = vec![arr as *const RArray];
    join_rec(arr, sep, &mut out, &mut need_sep, &mut stack)?;
    Ok(out)
}

fn join_rec(
    arr: &RArray,
    sep: &str,
    out: &mut String,
    need_sep: &mut bool,
    stack: &mut Vec<*const RArray>,
) -> Result<(), ArrayError> {
    for v in arr.to_vec() {
        match v {
            Value::Array(handle) => {
                let ptr = Rc::as_ptr(&handle.0);
                if stack.contains(&ptr) {
                    return Err(ArrayError::Cycle);
                }
                stack.push(ptr);
                join_rec(&handle.0, sep, out, need_sep, stack)?;
                stack.pop();
            }
            other => {
                if *need_sep {
                    out.push_str(sep);
                }
                out.push_str(&value_to_string(&other));
                *need_sep = true;
            }
        }
    }
    Ok(())
}

fn value_to_string(v: &Value) -> String {
    match v {
        Value::Nil => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Str(s) => s.to_string(),
        Value::Custom(c) => format!("{c:?}"),
        Value::Array(_) => unreachable!("Value::Array is handled by join_rec before reaching here"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::value::ArrayHandle;

    #[test]
    fn join_flattens_nested_arrays() {
        let inner = RArray::from_vec(vec![Value::Int(2), Value::Int(3)]);
        let outer = RArray::from_vec(vec![
            Value::Int(1),
            Value::Array(ArrayHandle::new(inner)),
            Value::Int(4),
        ]);
        assert_eq!(join(&outer, "-").unwrap(), "1-2-3-4");
    }

    #[test]
    fn join_detects_cycle() {
        let a = Rc::new(RArray::from_vec(vec![Value::Int(1)]));
        a.push(Value::Array(ArrayHandle(a.clone()))).unwrap();
        assert_eq!(join(&a, ",").unwrap_err(), ArrayError::Cycle);
    }
}
