//! Typst literals for form data.
//!
//! Form data is handed to the templates as one Typst dictionary. Keys keep
//! their insertion order so the generated source is stable between runs.

use super::common::escape_typst_string;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
    Array(Vec<Value>),
    Dict(Vec<(&'static str, Value)>),
}

impl Value {
    /// Array of strings.
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Array(items.into_iter().map(|item| Value::Str(item.into())).collect())
    }

    /// Array of string rows, the shape the templates expect for tables.
    pub fn table<R, I, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Array(rows.into_iter().map(Value::strings).collect())
    }

    pub fn to_source(&self) -> String {
        let mut out = String::new();
        self.write(&mut out, 0);
        out
    }

    fn write(&self, out: &mut String, depth: usize) {
        match self {
            Value::None => out.push_str("none"),
            Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
            Value::Int(number) => out.push_str(&number.to_string()),
            Value::Str(text) => {
                out.push('"');
                out.push_str(&escape_typst_string(text));
                out.push('"');
            }
            Value::Array(items) if items.is_empty() => out.push_str("()"),
            Value::Array(items) => {
                out.push('(');
                for item in items {
                    newline(out, depth + 1);
                    item.write(out, depth + 1);
                    // A trailing comma keeps one-element arrays arrays.
                    out.push(',');
                }
                newline(out, depth);
                out.push(')');
            }
            Value::Dict(entries) if entries.is_empty() => out.push_str("(:)"),
            Value::Dict(entries) => {
                out.push('(');
                for (key, value) in entries {
                    newline(out, depth + 1);
                    out.push_str(key);
                    out.push_str(": ");
                    value.write(out, depth + 1);
                    out.push(',');
                }
                newline(out, depth);
                out.push(')');
            }
        }
    }
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str("  ");
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<Dict> for Value {
    fn from(value: Dict) -> Self {
        Value::Dict(value.0)
    }
}

/// Builder for [`Value::Dict`].
#[derive(Debug, Default)]
pub struct Dict(Vec<(&'static str, Value)>);

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        self.0.push((key, value.into()));
        self
    }
}
