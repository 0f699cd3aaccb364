//! The browser front-end: one page with the upload form, the conversation
//! and the chat box. Both forms post back and are redirected to `/`.

use axum::{
    extract::{Multipart, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;

use super::documents::read_file_field;
use crate::api::{error::HtmlError, state::AppState};
use crate::domain::{Message, MessageRole};

const TITLE: &str = "AI Chatbot for Documents";

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2rem; }
.chat-container { max-width: 800px; margin: auto; }
.user-message {
    background-color: #DCF8C6;
    padding: 10px;
    border-radius: 10px;
    margin: 5px 0;
    text-align: right;
    word-wrap: break-word;
    white-space: pre-wrap;
}
.assistant-message {
    background-color: #F1F0F0;
    padding: 10px;
    border-radius: 10px;
    margin: 5px 0;
    text-align: left;
    word-wrap: break-word;
    white-space: pre-wrap;
}
.notice { background-color: #E6F4EA; padding: 10px; border-radius: 6px; }
"#;

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut workspace = state.workspace.lock().await;
    let notice = workspace.take_notice();
    Html(render_page(
        workspace.conversation().messages(),
        notice.as_deref(),
    ))
}

pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, HtmlError> {
    let (name, bytes) = read_file_field(multipart).await?;

    let mut workspace = state.workspace.lock().await;
    workspace.upload(&name, &bytes).await?;

    Ok(Redirect::to("/"))
}

pub async fn chat(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> Result<Redirect, HtmlError> {
    if !form.message.trim().is_empty() {
        let mut workspace = state.workspace.lock().await;
        workspace.ask(&form.message).await?;
    }
    Ok(Redirect::to("/"))
}

pub fn render_page(messages: &[Message], notice: Option<&str>) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!doctype html>\n<html><head><meta charset=\"utf-8\">");
    html.push_str(&format!("<title>{TITLE}</title><style>{STYLE}</style></head><body>"));
    html.push_str(&format!("<h1>&#128196; {TITLE}</h1>"));

    html.push_str(
        "<form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\
         <label>Upload a document (PDF or TXT) \
         <input type=\"file\" name=\"file\" accept=\".pdf,.txt\" required></label> \
         <button type=\"submit\">Upload</button></form>",
    );

    if let Some(notice) = notice {
        html.push_str(&format!("<p class=\"notice\">{}</p>", escape_html(notice)));
    }

    html.push_str("<div class=\"chat-container\">");
    for message in messages {
        let class = match message.role {
            MessageRole::User => "user-message",
            MessageRole::Assistant => "assistant-message",
        };
        html.push_str(&format!(
            "<div class=\"{class}\">{}</div>",
            escape_html(&message.content)
        ));
    }
    html.push_str("</div>");

    html.push_str(
        "<form action=\"/chat\" method=\"post\">\
         <label>Your message: <input type=\"text\" name=\"message\" autocomplete=\"off\" autofocus></label> \
         <button type=\"submit\">Send</button></form>",
    );

    html.push_str("</body></html>");
    html
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
