//! `.zcag` 形状文档
//!
//! 固定长度的文件头后接 Zstd 压缩的 MessagePack 文档。

use crate::document::{DocumentMetadata, NamedShape, ShapeDocument};
use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const MAGIC: [u8; 4] = *b"ZCAG";
const FORMAT_VERSION: u32 = 1;
const COMPRESSION_LEVEL: i32 = 3;
const HEADER_LEN: usize = 16;

/// 魔数之后依次是版本、保留标志与压缩载荷长度，均为小端 u32
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    version: u32,
    payload_len: u32,
}

impl Header {
    fn encode(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[..4].copy_from_slice(&MAGIC);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[12..].copy_from_slice(&self.payload_len.to_le_bytes());
        bytes
    }

    fn decode(bytes: &[u8; HEADER_LEN]) -> Result<Self, FileError> {
        if bytes[..4] != MAGIC {
            return Err(FileError::InvalidFormat("Invalid magic number, not a ZCAG file".to_string()));
        }
        let word = |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        let header = Header {
            version: word(4),
            payload_len: word(12),
        };
        if header.version > FORMAT_VERSION {
            return Err(FileError::UnsupportedVersion(format!(
                "File version {} is newer than supported version {}",
                header.version, FORMAT_VERSION
            )));
        }
        Ok(header)
    }
}

/// 可序列化的文件内容
#[derive(Debug, Serialize, Deserialize)]
struct FileContent {
    metadata: DocumentMetadata,
    shapes: Vec<NamedShape>,
}

/// 写入任意输出流，返回压缩载荷的字节数
pub fn write_document(document: &ShapeDocument, writer: &mut impl Write) -> Result<usize, FileError> {
    let content = FileContent {
        metadata: document.metadata.clone(),
        shapes: document.shapes.clone(),
    };
    let payload = zstd::encode_all(rmp_serde::to_vec(&content)?.as_slice(), COMPRESSION_LEVEL)?;
    let payload_len =
        u32::try_from(payload.len()).map_err(|_| FileError::InvalidFormat("Document too large".to_string()))?;

    writer.write_all(&Header { version: FORMAT_VERSION, payload_len }.encode())?;
    writer.write_all(&payload)?;
    Ok(payload.len())
}

/// 从任意输入流读取
pub fn read_document(reader: &mut impl Read) -> Result<ShapeDocument, FileError> {
    let mut bytes = [0u8; HEADER_LEN];
    reader.read_exact(&mut bytes)?;
    let header = Header::decode(&bytes)?;

    let mut payload = vec![0u8; header.payload_len as usize];
    reader.read_exact(&mut payload)?;
    let content: FileContent = rmp_serde::from_slice(&zstd::decode_all(payload.as_slice())?)?;
    Ok(ShapeDocument {
        metadata: content.metadata,
        shapes: content.shapes,
    })
}

/// 保存文档到文件
pub fn save(document: &ShapeDocument, path: &Path) -> Result<(), FileError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let compressed = write_document(document, &mut writer)?;
    writer.flush()?;

    tracing::info!(
        "Saved {} shapes to {} ({} bytes compressed)",
        document.len(),
        path.display(),
        compressed
    );
    Ok(())
}

/// 从文件加载文档
pub fn load(path: &Path) -> Result<ShapeDocument, FileError> {
    let mut reader = BufReader::new(File::open(path)?);
    let document = read_document(&mut reader)?;
    tracing::info!("Loaded {} shapes from {}", document.len(), path.display());
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zcag_core::path::Path as ShapePath;

    #[test]
    fn test_document_survives_file() {
        let file_path = std::env::temp_dir().join("zcag_test_document.zcag");
        let mut doc = ShapeDocument::new();
        doc.metadata.title = "Rings".to_string();
        doc.add_shape("ring", ShapePath::ellipse(0.0, 0.0, 10.0, 10.0));

        save(&doc, &file_path).expect("Failed to save");
        let raw = std::fs::read(&file_path).expect("Failed to read");
        let header = Header::decode(raw[..HEADER_LEN].try_into().unwrap()).unwrap();
        assert_eq!(header.version, FORMAT_VERSION);
        assert_eq!(header.payload_len as usize, raw.len() - HEADER_LEN);
        assert_eq!(load(&file_path).expect("Failed to load"), doc);

        std::fs::remove_file(&file_path).ok();
    }

    #[test]
    fn test_foreign_bytes_rejected() {
        let mut data = b"DXF\0".to_vec();
        data.extend_from_slice(&[0u8; 12]);
        let result = read_document(&mut data.as_slice());
        assert!(matches!(result, Err(FileError::InvalidFormat(_))));
    }

    #[test]
    fn test_future_version_rejected() {
        let mut data = Vec::new();
        write_document(&ShapeDocument::new(), &mut data).unwrap();
        data[4..8].copy_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());
        let result = read_document(&mut data.as_slice());
        assert!(matches!(result, Err(FileError::UnsupportedVersion(_))));
    }

    #[test]
    fn test_truncated_payload_is_io_error() {
        let mut data = Vec::new();
        write_document(&ShapeDocument::new(), &mut data).unwrap();
        data.truncate(data.len() - 1);
        assert!(matches!(read_document(&mut data.as_slice()), Err(FileError::Io(_))));
    }
}
