use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response, Window};

use doodleboard_shared::{CreatedDrawing, DrawingRecord, ErrorBody, NewDrawing, API_DRAWINGS_PATH};

/// Lists saved drawings. The gallery is optional, so any failure is logged
/// and reported as an empty list.
pub async fn fetch_drawings(window: &Window) -> Vec<DrawingRecord> {
    match try_fetch_drawings(window).await {
        Ok(records) => records,
        Err(error) => {
            log::warn!("Failed to load drawings: {error:?}");
            Vec::new()
        }
    }
}

async fn try_fetch_drawings(window: &Window) -> Result<Vec<DrawingRecord>, JsValue> {
    let request = drawings_request("GET", None)?;
    let response = send(window, &request).await?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "Server responded with {}",
            response.status()
        )));
    }
    let text = response_text(&response).await?;
    serde_json::from_str(&text)
        .map_err(|error| JsValue::from_str(&format!("Invalid drawing list: {error}")))
}

/// Why an upload did not go through.
#[derive(Debug)]
pub enum PostError {
    /// The server refused the drawing with a message meant for the user.
    Rejected(String),
    /// Network trouble or a server fault; retrying may help.
    Failed(JsValue),
}

impl From<JsValue> for PostError {
    fn from(error: JsValue) -> Self {
        PostError::Failed(error)
    }
}

pub async fn post_drawing(window: &Window, drawing: &NewDrawing) -> Result<CreatedDrawing, PostError> {
    let body = serde_json::to_string(drawing)
        .map_err(|error| JsValue::from_str(&format!("Failed to encode drawing: {error}")))?;
    let request = drawings_request("POST", Some(&body))?;
    let response = send(window, &request).await?;
    let text = response_text(&response).await.unwrap_or_default();
    if !response.ok() {
        return Err(match rejection_message(response.status(), &text) {
            Some(message) => PostError::Rejected(message),
            None => PostError::Failed(JsValue::from_str(&format!(
                "Server responded with {}",
                response.status()
            ))),
        });
    }
    serde_json::from_str(&text)
        .map_err(|error| JsValue::from_str(&format!("Invalid save response: {error}")).into())
}

/// The user facing message of a 4xx error body, if there is one.
fn rejection_message(status: u16, body: &str) -> Option<String> {
    if !(400..500).contains(&status) {
        return None;
    }
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|body| body.error)
        .filter(|message| !message.trim().is_empty())
}

fn drawings_request(method: &str, body: Option<&str>) -> Result<Request, JsValue> {
    let init = RequestInit::new();
    init.set_method(method);
    if let Some(body) = body {
        init.set_body(&JsValue::from_str(body));
    }
    let request = Request::new_with_str_and_init(API_DRAWINGS_PATH, &init)?;
    request.headers().set("Accept", "application/json")?;
    if body.is_some() {
        request.headers().set("Content-Type", "application/json")?;
    }
    Ok(request)
}

async fn send(window: &Window, request: &Request) -> Result<Response, JsValue> {
    let value = JsFuture::from(window.fetch_with_request(request)).await?;
    value.dyn_into::<Response>()
}

async fn response_text(response: &Response) -> Result<String, JsValue> {
    JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("Response body is not text"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_carry_the_server_message() {
        assert_eq!(
            rejection_message(400, r#"{"error":"Author must be at most 80 characters."}"#)
                .as_deref(),
            Some("Author must be at most 80 characters.")
        );
    }

    #[test]
    fn server_faults_and_odd_bodies_are_not_shown() {
        assert_eq!(rejection_message(500, r#"{"error":"disk full"}"#), None);
        assert_eq!(rejection_message(413, "Payload Too Large"), None);
        assert_eq!(rejection_message(400, r#"{"error":"  "}"#), None);
    }
}
