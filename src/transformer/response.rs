//! Wire response → unified response mapping
//!
//! Every read is optional with an explicit default, so mapping never fails no
//! matter which fields the provider left out. A default replaces a value only
//! when it is absent or falsy (`null`, `false`, `0`, `""`); anything else is
//! copied through as sent. Only the first choice is consulted.

use serde_json::Value;

use super::is_truthy;
use crate::types::response::{
    Choice, Delta, DeltaChoice, DeltaToolCall, ResponseMessage, ResponseToolCall, StreamChunk,
    ToolCallFunction, UnifiedResponse, Usage,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseMapper;

impl ResponseMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map a complete (non-streamed) chat completion.
    pub fn map(&self, raw: &Value) -> UnifiedResponse {
        let choice = first_choice(raw);
        let message = choice.and_then(|c| c.get("message"));

        let tool_calls: Vec<ResponseToolCall> = message
            .and_then(|m| m.get("tool_calls"))
            .and_then(Value::as_array)
            .map(|calls| calls.iter().map(map_tool_call).collect())
            .unwrap_or_default();

        UnifiedResponse {
            id: field(raw, "id"),
            choices: vec![Choice {
                finish_reason: choice.and_then(|c| truthy_field(c, "finish_reason")),
                index: choice_index(choice),
                message: ResponseMessage {
                    content: message.and_then(|m| truthy_field(m, "content")),
                    role: message
                        .and_then(|m| truthy_field(m, "role"))
                        .unwrap_or_else(|| Value::from("assistant")),
                    tool_calls: if tool_calls.is_empty() {
                        None
                    } else {
                        Some(tool_calls)
                    },
                },
            }],
            created: field(raw, "created"),
            model: field(raw, "model"),
            object: field(raw, "object"),
            usage: raw.get("usage").map(map_usage).unwrap_or_default(),
        }
    }

    /// Map one streamed chunk; same defaults as [`ResponseMapper::map`] applied to a `delta`.
    pub fn map_chunk(&self, raw: &Value) -> StreamChunk {
        let choice = first_choice(raw);
        let delta = choice.and_then(|c| c.get("delta"));

        let tool_calls = delta
            .and_then(|d| d.get("tool_calls"))
            .and_then(Value::as_array)
            .map(|calls| calls.iter().map(map_delta_tool_call).collect());

        StreamChunk {
            id: field(raw, "id"),
            object: field(raw, "object"),
            created: field(raw, "created"),
            model: field(raw, "model"),
            choices: vec![DeltaChoice {
                index: choice_index(choice),
                delta: Delta {
                    role: delta.and_then(|d| field(d, "role")),
                    content: delta.and_then(|d| field(d, "content")),
                    tool_calls,
                },
                finish_reason: choice.and_then(|c| truthy_field(c, "finish_reason")),
            }],
            usage: raw.get("usage").filter(|u| is_truthy(u)).map(map_usage),
        }
    }
}

fn first_choice(raw: &Value) -> Option<&Value> {
    raw.get("choices")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
}

fn choice_index(choice: Option<&Value>) -> Value {
    choice
        .and_then(|c| truthy_field(c, "index"))
        .unwrap_or_else(|| Value::from(0))
}

/// The value as sent, `null` included.
fn field(v: &Value, key: &str) -> Option<Value> {
    v.get(key).cloned()
}

fn truthy_field(v: &Value, key: &str) -> Option<Value> {
    v.get(key).filter(|x| is_truthy(x)).cloned()
}

fn map_usage(usage: &Value) -> Usage {
    Usage {
        completion_tokens: field(usage, "completion_tokens"),
        prompt_tokens: field(usage, "prompt_tokens"),
        total_tokens: field(usage, "total_tokens"),
    }
}

fn map_tool_call(call: &Value) -> ResponseToolCall {
    let function = call.get("function");
    ResponseToolCall {
        id: field(call, "id"),
        call_type: field(call, "type"),
        function: ToolCallFunction {
            name: function.and_then(|f| field(f, "name")),
            arguments: function
                .and_then(|f| truthy_field(f, "arguments"))
                .unwrap_or_else(|| Value::from("{}")),
        },
    }
}

fn map_delta_tool_call(call: &Value) -> DeltaToolCall {
    let function = call.get("function");
    DeltaToolCall {
        index: field(call, "index"),
        id: field(call, "id"),
        call_type: field(call, "type"),
        function: ToolCallFunction {
            name: function.and_then(|f| field(f, "name")),
            arguments: function
                .and_then(|f| truthy_field(f, "arguments"))
                .unwrap_or_else(|| Value::from("")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_without_usage() {
        let raw = json!({
            "id": "1",
            "choices": [{"message": {"role": "assistant", "content": "hello"}}],
            "created": 1,
            "model": "gpt-4",
            "object": "chat.completion"
        });
        let resp = ResponseMapper::new().map(&raw);

        assert_eq!(resp.usage, Usage::default());
        assert_eq!(resp.choices[0].message.tool_calls, None);
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({
                "id": "1",
                "choices": [{
                    "finish_reason": null,
                    "index": 0,
                    "message": {"content": "hello", "role": "assistant"}
                }],
                "created": 1,
                "model": "gpt-4",
                "object": "chat.completion",
                "usage": {}
            })
        );
    }

    #[test]
    fn test_response_defaults_on_empty_object() {
        let resp = ResponseMapper::new().map(&json!({}));
        let v = serde_json::to_value(&resp).unwrap();
        for key in ["id", "choices", "created", "model", "object", "usage"] {
            assert!(v.get(key).is_some(), "missing {}", key);
        }
        let choice = &resp.choices[0];
        assert_eq!(choice.finish_reason, None);
        assert_eq!(choice.index, json!(0));
        assert_eq!(choice.message.content, None);
        assert_eq!(choice.message.role, json!("assistant"));
    }

    #[test]
    fn test_response_tolerates_non_array_choices() {
        let raw = json!({
            "id": 42,
            "choices": "nope",
            "usage": {"prompt_tokens": "ten", "completion_tokens": 3}
        });
        let resp = ResponseMapper::new().map(&raw);
        assert_eq!(resp.id, Some(json!(42)));
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.choices[0].message.role, json!("assistant"));
        assert_eq!(resp.usage.prompt_tokens, Some(json!("ten")));
        assert_eq!(resp.usage.completion_tokens, Some(json!(3)));
    }

    #[test]
    fn test_response_keeps_non_string_values() {
        let raw = json!({
            "id": 7,
            "choices": [{
                "index": 2,
                "finish_reason": "stop",
                "message": {
                    "role": "assistant",
                    "content": [{"type": "text", "text": "hello"}],
                    "tool_calls": [
                        {"id": "call_1", "type": "function",
                         "function": {"name": "get_weather", "arguments": {"city": "Paris"}}}
                    ]
                }
            }],
            "created": 1.5e9,
            "model": "gpt-4o",
            "usage": {"prompt_tokens": 10.0, "completion_tokens": null}
        });
        let resp = ResponseMapper::new().map(&raw);
        let choice = &resp.choices[0];

        assert_eq!(resp.id, Some(json!(7)));
        assert_eq!(resp.created, Some(json!(1.5e9)));
        assert_eq!(choice.index, json!(2));
        assert_eq!(
            choice.message.content,
            Some(json!([{"type": "text", "text": "hello"}]))
        );
        let calls = choice.message.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.arguments, json!({"city": "Paris"}));
        assert_eq!(resp.usage.prompt_tokens, Some(json!(10.0)));
        assert_eq!(resp.usage.completion_tokens, Some(Value::Null));
        assert_eq!(resp.usage.total_tokens, None);

        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["usage"], json!({"prompt_tokens": 10.0, "completion_tokens": null}));
    }

    #[test]
    fn test_response_falsy_values_take_defaults() {
        let raw = json!({
            "choices": [{
                "index": 0,
                "finish_reason": "",
                "message": {
                    "role": "",
                    "content": "",
                    "tool_calls": [{"function": {"name": "noop", "arguments": ""}}]
                }
            }]
        });
        let resp = ResponseMapper::new().map(&raw);
        let choice = &resp.choices[0];
        assert_eq!(choice.finish_reason, None);
        assert_eq!(choice.message.content, None);
        assert_eq!(choice.message.role, json!("assistant"));
        let calls = choice.message.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.arguments, json!("{}"));
    }

    #[test]
    fn test_response_tool_calls_keep_argument_string() {
        let raw = json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "finish_reason": "tool_calls",
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [
                        {"id": "call_1", "type": "function",
                         "function": {"name": "get_weather", "arguments": "{\"city\":\"Paris\"}"}},
                        {"id": "call_2", "type": "function", "function": {"name": "noop"}}
                    ]
                }
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        });
        let resp = ResponseMapper::new().map(&raw);
        let choice = &resp.choices[0];
        assert_eq!(choice.finish_reason, Some(json!("tool_calls")));
        assert_eq!(choice.message.content, None);

        let calls = choice.message.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.arguments, json!("{\"city\":\"Paris\"}"));
        assert_eq!(calls[1].function.arguments, json!("{}"));
        assert_eq!(resp.usage.total_tokens, Some(json!(15)));
    }

    #[test]
    fn test_only_first_choice_is_used() {
        let raw = json!({
            "choices": [
                {"index": 0, "message": {"content": "first"}},
                {"index": 1, "message": {"content": "second"}}
            ]
        });
        let resp = ResponseMapper::new().map(&raw);
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.choices[0].message.content, Some(json!("first")));
    }

    #[test]
    fn test_chunk_passes_delta_fields_through() {
        let raw = json!({
            "id": "c1",
            "object": "chat.completion.chunk",
            "created": 7,
            "model": "gpt-4o",
            "choices": [{"index": 0, "delta": {"role": "assistant", "content": ""}}]
        });
        let chunk = ResponseMapper::new().map_chunk(&raw);
        let delta = &chunk.choices[0].delta;
        assert_eq!(delta.role, Some(json!("assistant")));
        assert_eq!(delta.content, Some(json!("")));
        assert_eq!(delta.tool_calls, None);
        assert_eq!(chunk.usage, None);
        assert_eq!(chunk.choices[0].finish_reason, None);
    }

    #[test]
    fn test_chunk_tool_call_fragments() {
        let raw = json!({
            "choices": [{"delta": {"tool_calls": [
                {"index": 0, "id": "call_abc", "type": "function",
                 "function": {"name": "get_weather", "arguments": ""}},
                {"index": 1, "function": {"arguments": "{\"lo"}},
                {"index": 2}
            ]}}]
        });
        let chunk = ResponseMapper::new().map_chunk(&raw);
        let calls = chunk.choices[0].delta.tool_calls.as_ref().unwrap();

        assert_eq!(calls[0].index, Some(json!(0)));
        assert_eq!(calls[0].function.name, Some(json!("get_weather")));
        assert_eq!(calls[1].function.name, None);
        assert_eq!(calls[1].function.arguments, json!("{\"lo"));
        assert_eq!(calls[2].function.arguments, json!(""));

        let v = serde_json::to_value(&calls[1]).unwrap();
        assert_eq!(v, json!({"index": 1, "function": {"arguments": "{\"lo"}}));
    }

    #[test]
    fn test_chunk_usage_on_terminal_frame() {
        let raw = json!({
            "choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21}
        });
        let chunk = ResponseMapper::new().map_chunk(&raw);
        assert_eq!(chunk.choices[0].finish_reason, Some(json!("stop")));
        assert_eq!(
            chunk.usage,
            Some(Usage {
                completion_tokens: Some(json!(12)),
                prompt_tokens: Some(json!(9)),
                total_tokens: Some(json!(21)),
            })
        );
    }

    #[test]
    fn test_chunk_keeps_non_string_values() {
        let raw = json!({
            "id": 99,
            "created": 1.7e9,
            "choices": [{"index": 1, "delta": {
                "content": [{"type": "text", "text": "par"}],
                "tool_calls": [{"index": 0, "function": {"arguments": {"a": 1}}}]
            }}],
            "usage": {"total_tokens": 3.0}
        });
        let chunk = ResponseMapper::new().map_chunk(&raw);
        let choice = &chunk.choices[0];

        assert_eq!(chunk.id, Some(json!(99)));
        assert_eq!(chunk.created, Some(json!(1.7e9)));
        assert_eq!(choice.index, json!(1));
        assert_eq!(
            choice.delta.content,
            Some(json!([{"type": "text", "text": "par"}]))
        );
        let calls = choice.delta.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.arguments, json!({"a": 1}));
        assert_eq!(chunk.usage.as_ref().unwrap().total_tokens, Some(json!(3.0)));
    }

    #[test]
    fn test_chunk_explicit_null_content_is_kept() {
        let raw = json!({"choices": [{"delta": {"role": "assistant", "content": null}}]});
        let chunk = ResponseMapper::new().map_chunk(&raw);
        assert_eq!(chunk.choices[0].delta.content, Some(Value::Null));

        let v = serde_json::to_value(&chunk).unwrap();
        assert!(v["choices"][0]["delta"]["content"].is_null());
        assert!(v["choices"][0]["delta"].get("tool_calls").is_none());
    }
}
