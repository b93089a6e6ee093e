//! Multipart bodies for the upload path.

use pdfconnect_common::{CollectionName, Result};
use reqwest::multipart::{Form, Part};

pub const FILES_FIELD: &str = "files";
pub const COLLECTION_FIELD: &str = "collection";

/// Used when the browser sent no usable content type.
pub const DEFAULT_CONTENT_TYPE: &str = "application/pdf";

/// One PDF picked by the user.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    /// Content type the browser declared for this part, if any.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), content_type: None, bytes }
    }

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type.filter(|c| !c.trim().is_empty());
        self
    }

    /// Browsers submit an unnamed, empty part when no file was chosen.
    pub fn is_placeholder(&self) -> bool {
        self.file_name.is_empty() && self.bytes.is_empty()
    }

    fn into_part(self) -> Result<Part> {
        let mime = self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(mime)?;
        Ok(part)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub files: Vec<UploadFile>,
    pub collection: Option<CollectionName>,
}

impl UploadRequest {
    pub fn new(files: Vec<UploadFile>, collection: Option<CollectionName>) -> Self {
        let files = files.into_iter().filter(|f| !f.is_placeholder()).collect();
        Self { files, collection }
    }

    /// Repeated `files` parts, then `collection` only when one was chosen.
    pub fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        for file in self.files {
            form = form.part(FILES_FIELD, file.into_part()?);
        }
        if let Some(collection) = self.collection {
            form = form.text(COLLECTION_FIELD, collection.to_string());
        }
        Ok(form)
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.file_name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_parts_are_dropped() {
        let request = UploadRequest::new(
            vec![
                UploadFile::new("", Vec::new()),
                UploadFile::new("guide.pdf", b"%PDF-1.4".to_vec()),
            ],
            None,
        );
        assert_eq!(request.file_names(), vec!["guide.pdf"]);
    }

    #[test]
    fn test_named_empty_file_is_kept() {
        // A real zero-byte file still has a name; the backend decides what to do with it.
        let file = UploadFile::new("empty.pdf", Vec::new());
        assert!(!file.is_placeholder());
    }

    #[test]
    fn test_form_boundary_is_set() {
        let request = UploadRequest::new(
            vec![UploadFile::new("a.pdf", b"%PDF".to_vec())],
            Some(CollectionName::new("recipe_collection")),
        );
        let form = request.into_form().unwrap();
        assert!(!form.boundary().is_empty());
    }

    #[test]
    fn test_blank_content_type_means_default() {
        let file = UploadFile::new("a.pdf", b"%PDF".to_vec()).with_content_type(Some("  ".to_string()));
        assert_eq!(file.content_type, None);

        let file = UploadFile::new("a.pdf", b"%PDF".to_vec()).with_content_type(None);
        assert_eq!(file.content_type, None);

        let file = UploadFile::new("scan.pdf", b"%PDF".to_vec())
            .with_content_type(Some("application/octet-stream".to_string()));
        assert_eq!(file.content_type.as_deref(), Some("application/octet-stream"));
    }

    #[test]
    fn test_malformed_content_type_is_an_error() {
        let request = UploadRequest::new(
            vec![UploadFile::new("a.pdf", b"%PDF".to_vec()).with_content_type(Some("not a mime".to_string()))],
            None,
        );
        assert!(request.into_form().is_err());
    }
}
