//! Decoding and persisting label documents returned by `/AwbDocuments`.

use std::path::{Path, PathBuf};

use base64::Engine;

use crate::client::unquote;
use crate::error::{CarrierError, Result};
use crate::session::WaybillId;

/// Decode the base64 document body.
///
/// The service may answer with the bare base64 text or with it wrapped as a
/// JSON string literal; both are accepted.
pub fn decode_document(body: &str) -> Result<Vec<u8>> {
    let encoded = unquote(body);
    Ok(base64::engine::general_purpose::STANDARD.decode(encoded.trim())?)
}

/// Write `bytes` to `<waybill_id>.pdf` in `dir`, replacing any existing file.
///
/// Ids that would resolve outside `dir` are refused.
pub async fn write_document(dir: &Path, waybill_id: &WaybillId, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(waybill_id.label_file_name());
    if !waybill_id.is_plain_file_stem() {
        return Err(CarrierError::Write {
            path,
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "waybill id is not a plain file name",
            ),
        });
    }
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|source| CarrierError::Write {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF: &[u8] = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n1 0 obj\n<<>>\nendobj\n%%EOF";

    fn encode(bytes: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn test_decode_bare_and_quoted() {
        let encoded = encode(PDF);
        assert_eq!(decode_document(&encoded).unwrap(), PDF);
        assert_eq!(decode_document(&format!("\"{}\"", encoded)).unwrap(), PDF);
        assert_eq!(decode_document(&format!("{}\n", encoded)).unwrap(), PDF);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_document("not base64 !!").unwrap_err();
        assert!(matches!(err, CarrierError::Decode(_)));
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let id = WaybillId::new("AWB1");

        std::fs::write(dir.path().join("AWB1.pdf"), b"old contents that are longer").unwrap();
        let path = write_document(dir.path(), &id, PDF).await.unwrap();

        assert_eq!(path, dir.path().join("AWB1.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), PDF);
    }

    #[tokio::test]
    async fn test_write_refuses_escaping_ids() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();

        for id in ["../escaped", "/tmp/escaped", "sub/escaped"] {
            let err = write_document(&out, &WaybillId::new(id), PDF)
                .await
                .unwrap_err();
            assert!(matches!(err, CarrierError::Write { .. }), "{:?}", err);
        }
        assert!(!dir.path().join("escaped.pdf").exists());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_write_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = write_document(&missing, &WaybillId::new("AWB1"), PDF)
            .await
            .unwrap_err();
        assert!(matches!(err, CarrierError::Write { .. }));
    }
}
