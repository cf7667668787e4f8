use serde_json::Value;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("merge conflict at '{path}': found {existing}, refusing to merge {incoming}")]
    MergeConflict {
        path: String,
        existing: &'static str,
        incoming: &'static str,
    },
    #[error("key nests deeper than the supported limit of {limit} segments")]
    TooDeep { limit: usize },
    #[error("unsupported top level value, it expected an Object or an Array, found {0}")]
    UnsupportedTopLevelValue(&'static str),
}

pub type Result<T> = std::result::Result<T, self::Error>;

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "Value::Null",
        Value::Bool(_) => "Value::Bool",
        Value::Number(_) => "Value::Number",
        Value::String(_) => "Value::String",
        Value::Array(_) => "Value::Array",
        Value::Object(_) => "Value::Object",
    }
}
