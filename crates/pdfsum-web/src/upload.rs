use axum::extract::Multipart;

use pdfsum_core::{Document, SummarizerError};

/// Parse a multipart form upload into the uploaded PDF.
///
/// The file is expected in the `pdf` field; other fields are ignored.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<Document, SummarizerError> {
    let mut document: Option<Document> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| invalid(format!("Failed to read form field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "pdf" => {
                let filename = field.file_name().unwrap_or("upload.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| invalid(format!("Failed to read file data: {}", e)))?
                    .to_vec();

                check_pdf(&data)?;
                document = Some(Document { filename, data });
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    document.ok_or_else(|| invalid("No file uploaded".to_string()))
}

/// Accept only non-empty uploads carrying the PDF magic bytes.
pub fn check_pdf(data: &[u8]) -> Result<(), SummarizerError> {
    if data.is_empty() {
        return Err(invalid("The uploaded file is empty".to_string()));
    }
    if !data.starts_with(b"%PDF-") {
        return Err(invalid(
            "Unsupported file type. Please upload a PDF file.".to_string(),
        ));
    }
    Ok(())
}

fn invalid(message: String) -> SummarizerError {
    SummarizerError::InvalidRequest(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_magic_is_required() {
        assert!(check_pdf(b"%PDF-1.7\n...").is_ok());
        assert!(check_pdf(b"PK\x03\x04").is_err());
        assert!(check_pdf(b"").is_err());
    }
}
