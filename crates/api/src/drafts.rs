use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use extract::{DocumentGenerator, DocumentHandle, DocumentRequest};

pub const BLANK: &str = "__________ [NOT PROVIDED]";

/// Writes plain-text form drafts into a directory.
pub struct DraftWriter {
    dir: PathBuf,
}

impl DraftWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn render(request: &DocumentRequest) -> String {
        let mut out = String::new();
        out.push_str("PROJECT NYAYA - DRAFT\n");
        out.push_str(request.title);
        out.push('\n');
        out.push_str("This draft is for informational purposes only. It is NOT legal advice.\n");
        out.push_str(&"=".repeat(72));
        out.push_str("\n\n");

        let mut blanks = Vec::new();
        for field in &request.fields {
            let value = match &field.value {
                Some(value) => value.display(),
                None => {
                    if field.required {
                        blanks.push(field.label);
                    }
                    BLANK.to_string()
                }
            };
            out.push_str(&format!("{}: {}\n", field.label, value));
        }

        if !blanks.is_empty() {
            out.push_str(&format!(
                "\nINCOMPLETE: {} required detail(s) missing: {}\n",
                blanks.len(),
                blanks.join(", ")
            ));
        }

        out.push_str("\nGenerated by Project Nyaya | Not a substitute for professional legal counsel\n");
        out
    }
}

#[async_trait]
impl DocumentGenerator for DraftWriter {
    async fn generate(&self, request: &DocumentRequest) -> Result<DocumentHandle> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create drafts directory {:?}", self.dir))?;

        let document_id = Uuid::new_v4().to_string();
        let path = self.dir.join(format!("{}.txt", document_id));

        tokio::fs::write(&path, Self::render(request))
            .await
            .with_context(|| format!("Failed to write draft {:?}", path))?;

        info!(document_id = %document_id, intent = %request.intent, "Draft written");
        Ok(DocumentHandle {
            document_id,
            location: path.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus::Category;
    use extract::FormRecord;
    use serde_json::json;

    fn dv_request() -> DocumentRequest {
        let mut record = FormRecord::new(Category::DomesticViolence);
        record.set_json("complainant_name", &json!("Sunita Sharma")).unwrap();
        record.set_json("nature_of_violence", &json!(["Physical", "Economic"])).unwrap();
        DocumentRequest::from_record(&record)
    }

    #[test]
    fn test_absent_fields_render_as_blanks() {
        let text = DraftWriter::render(&dv_request());

        assert!(text.contains("Aggrieved person: Sunita Sharma"));
        assert!(text.contains("Nature of violence: Physical, Economic"));
        assert!(text.contains(&format!("Witnesses: {}", BLANK)));
        assert!(text.contains(&format!("Children: {}", BLANK)));
        assert!(text.contains("INCOMPLETE:"));
        assert!(!text.contains("INCOMPLETE: 0"));
    }

    #[tokio::test]
    async fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DraftWriter::new(dir.path().join("drafts"));

        let handle = writer.generate(&dv_request()).await.unwrap();

        let written = tokio::fs::read_to_string(&handle.location).await.unwrap();
        assert!(written.contains("Section 12"));
        assert!(handle.location.ends_with(&format!("{}.txt", handle.document_id)));
    }

    #[tokio::test]
    async fn test_unwritable_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        tokio::fs::write(&blocker, "not a directory").await.unwrap();

        let writer = DraftWriter::new(blocker.join("drafts"));
        assert!(writer.generate(&dv_request()).await.is_err());
    }
}
