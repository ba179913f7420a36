//! Multipart bodies that can be sent more than once.

use reqwest::multipart::{Form, Part};

use crate::errors::Result;

/// Description of a `multipart/form-data` body.
///
/// `reqwest`'s [`Form`] is consumed when sent, while a logical request may be
/// sent twice (original and retry after a reissue). `FormData` keeps the parts
/// and renders a fresh [`Form`] per attempt.
///
/// ```
/// # use stayone::FormData;
/// let form = FormData::new()
///     .text("title", "Ocean view room")
///     .file("image", b"\x89PNG...".to_vec(), Some("room.png"), Some("image/png"));
/// assert_eq!(form.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormData {
    parts: Vec<FormPart>,
}

#[derive(Debug, Clone)]
struct FormPart {
    name: String,
    value: PartValue,
}

#[derive(Debug, Clone)]
enum PartValue {
    Text(String),
    File {
        bytes: Vec<u8>,
        file_name: Option<String>,
        mime: Option<String>,
    },
}

impl FormData {
    /// Empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: PartValue::Text(value.into()),
        });
        self
    }

    /// Append a file part.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        bytes: Vec<u8>,
        file_name: Option<&str>,
        mime: Option<&str>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: PartValue::File {
                bytes,
                file_name: file_name.map(str::to_string),
                mime: mime.map(str::to_string),
            },
        });
        self
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// True if the form has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Render a fresh reqwest form. Fails on an unparsable MIME type.
    pub(crate) fn to_multipart(&self) -> Result<Form> {
        let mut form = Form::new();
        for part in &self.parts {
            form = match &part.value {
                PartValue::Text(value) => form.text(part.name.clone(), value.clone()),
                PartValue::File {
                    bytes,
                    file_name,
                    mime,
                } => {
                    let mut file = Part::bytes(bytes.clone());
                    if let Some(name) = file_name {
                        file = file.file_name(name.clone());
                    }
                    if let Some(mime) = mime {
                        file = file.mime_str(mime)?;
                    }
                    form.part(part.name.clone(), file)
                }
            };
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_repeatedly() {
        let form = FormData::new()
            .text("name", "Hanok stay")
            .file("photo", vec![1, 2, 3], Some("a.jpg"), Some("image/jpeg"));
        assert!(form.to_multipart().is_ok());
        assert!(form.to_multipart().is_ok());
        assert!(!form.is_empty());
    }

    #[test]
    fn bad_mime_is_an_error() {
        let form = FormData::new().file("photo", vec![], None, Some("not a mime"));
        assert!(form.to_multipart().is_err());
    }
}
