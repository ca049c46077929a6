use serde::{Deserialize, Serialize};

/// Body of `POST /api/ask-chatgpt`.
#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    #[serde(default)]
    pub tasks: Vec<TaskBrief>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskBrief {
    pub task_name: String,
    pub description: String,
    pub due_date: String,
    pub assigned_to: String,
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub message: String,
}

// Wire types for the chat-completions endpoint.

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub content: String,
}
