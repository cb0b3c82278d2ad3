//! Argument and response helpers shared by the commands

use serde::Serialize;
use serde_json::{json, Value};

use crate::types::{CommandResult, SwitchError};

/// Extract command arguments from `commands/call` params
pub fn extract_arguments(params: &Value) -> Value {
    params
        .get("arguments")
        .cloned()
        .unwrap_or(Value::Object(serde_json::Map::new()))
}

/// Extract the command name from `commands/call` params
pub fn extract_command_name(params: &Value) -> Option<&str> {
    params.get("name").and_then(|v| v.as_str())
}

/// Optional string argument
pub fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}

/// Required string argument
pub fn required_str<'a>(args: &'a Value, key: &str) -> CommandResult<&'a str> {
    optional_str(args, key)
        .ok_or_else(|| SwitchError::InvalidInput(format!("missing string argument '{}'", key)).into())
}

/// Build a command response
///
/// `content` carries the human-readable message the CLI would print and
/// `data` the structured result for front ends.
pub fn command_response<T: Serialize>(message: String, data: &T) -> CommandResult<Value> {
    Ok(json!({
        "content": [{
            "type": "text",
            "text": message
        }],
        "data": serde_json::to_value(data)?,
    }))
}
