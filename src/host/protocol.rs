use crate::parser::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const LOAD_HYDROGEN_LOG: &str = "loadHydrogenLog";
pub const GET_PHASE_TEXT: &str = "getPhaseText";
pub const LOAD: &str = "load";
pub const DISCONNECT: &str = "disconnect";

pub const LOADED_EVENT: &str = "loaded";

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub seq: u64,
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(flatten)]
    pub content: MessageContent,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Request {
        command: String,
        arguments: Option<Value>,
    },
    Response {
        request_seq: u64,
        success: bool,
        command: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<Value>,
    },
    Event {
        event: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<Value>,
    },
}

#[derive(Debug, Deserialize)]
pub struct PathArguments {
    pub path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeArguments {
    pub start_line: usize,
    pub end_line: usize,
}

#[derive(Debug, Serialize)]
pub struct MethodsBody<'a> {
    pub methods: &'a [Method],
}

#[derive(Debug, Serialize)]
pub struct TextBody {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CodeBody {
    pub code: String,
}
