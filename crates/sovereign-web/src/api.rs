//! API Client

use serde::{Deserialize, Serialize};

const SESSION_HEADER: &str = "x-session-id";

/// Input widget on a panel, as described by the server catalogue
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FieldDto {
    pub name: String,
    pub label: String,
    pub kind: String,
    #[serde(default)]
    pub options: Vec<String>,
}

/// One tab of the desk
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PanelDto {
    pub slug: String,
    pub title: String,
    pub heading: String,
    pub button: String,
    pub output_label: String,
    pub uses_dataset: bool,
    #[serde(default)]
    pub fields: Vec<FieldDto>,
}

#[derive(Deserialize)]
struct CatalogueDto {
    panels: Vec<PanelDto>,
}

/// Result of a CSV upload
#[derive(Clone, Debug, Deserialize)]
pub struct UploadDto {
    pub session_id: String,
    pub message: String,
    pub columns: Vec<String>,
    pub rows: usize,
}

/// Values typed into a panel
#[derive(Clone, Debug, Default, Serialize)]
pub struct PanelRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_type: Option<String>,
}

impl PanelRequest {
    /// Set the field named by the catalogue
    pub fn set(&mut self, name: &str, value: String) {
        match name {
            "text" => self.text = Some(value),
            "question" => self.question = Some(value),
            "context" => self.context = Some(value),
            "form_type" => self.form_type = Some(value),
            _ => {}
        }
    }
}

#[derive(Deserialize)]
struct ReportDto {
    output: String,
}

/// reqwest on wasm needs absolute URLs
fn url(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into());
    format!("{origin}{path}")
}

async fn error_text(response: reqwest::Response) -> String {
    let data: serde_json::Value = response.json().await.unwrap_or_default();
    data["error"].as_str().unwrap_or("Request failed").to_string()
}

/// Fetch the panel catalogue in tab order
pub async fn fetch_panels() -> Result<Vec<PanelDto>, String> {
    let response = reqwest::get(url("/api/panels"))
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        let data: CatalogueDto = response.json().await.map_err(|e| e.to_string())?;
        Ok(data.panels)
    } else {
        Err(error_text(response).await)
    }
}

/// Upload CSV text, reusing the session when one exists
pub async fn upload_csv(csv: String, session: Option<String>) -> Result<UploadDto, String> {
    let mut request = reqwest::Client::new()
        .post(url("/api/dataset"))
        .header("content-type", "text/csv")
        .body(csv);
    if let Some(id) = session {
        request = request.header(SESSION_HEADER, id);
    }

    let response = request.send().await.map_err(|e| e.to_string())?;
    if response.status().is_success() {
        response.json().await.map_err(|e| e.to_string())
    } else {
        Err(error_text(response).await)
    }
}

/// Run a panel. `Err` carries the inline validation message.
pub async fn run_panel(
    slug: &str,
    input: &PanelRequest,
    session: Option<String>,
) -> Result<String, String> {
    let mut request = reqwest::Client::new()
        .post(url(&format!("/api/panels/{slug}")))
        .json(input);
    if let Some(id) = session {
        request = request.header(SESSION_HEADER, id);
    }

    let response = request.send().await.map_err(|e| e.to_string())?;
    if response.status().is_success() {
        let data: ReportDto = response.json().await.map_err(|e| e.to_string())?;
        Ok(data.output)
    } else {
        Err(error_text(response).await)
    }
}
