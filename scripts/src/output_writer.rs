//! Printing of query results.

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Serializer, Value};

use crate::errors::ScriptError;

/// Render a value as JSON with a 4 spaces indent, keys in insertion order
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, ScriptError> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
    String::from_utf8(out).map_err(|e| ScriptError::JsonOutputError(e.to_string()))
}

/// Print `value` as indented JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<(), ScriptError> {
    println!("{}", to_pretty_json(value)?);
    Ok(())
}

/// JSON object of `entries`, keeping their order
pub fn keyed<K, T, I>(entries: I) -> Result<Value, ScriptError>
where
    K: ToString,
    T: Serialize,
    I: IntoIterator<Item = (K, T)>,
{
    let mut map = Map::new();
    for (key, value) in entries {
        let value =
            serde_json::to_value(value).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
        map.insert(key.to_string(), value);
    }
    Ok(Value::Object(map))
}
