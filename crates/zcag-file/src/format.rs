//! 按扩展名选择文件格式

use crate::document::ShapeDocument;
use crate::error::FileError;
use crate::{native, shapes};
use std::path::Path;
use zcag_core::path::PathSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// 每行一个形状的文本
    Shapes,
    /// MessagePack + Zstd 原生格式
    Native,
    Json,
}

impl FileFormat {
    /// 未知扩展名按 `.shapes` 文本处理
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase) {
            Some(ext) if ext == "zcag" => FileFormat::Native,
            Some(ext) if ext == "json" => FileFormat::Json,
            _ => FileFormat::Shapes,
        }
    }
}

/// 读取任意支持格式的文档
pub fn open_document(path: &Path) -> Result<ShapeDocument, FileError> {
    match FileFormat::from_path(path) {
        FileFormat::Native => native::load(path),
        FileFormat::Json => ShapeDocument::from_json(&std::fs::read_to_string(path)?),
        FileFormat::Shapes => Ok(ShapeDocument::from_paths(shapes::read_shapes(path)?)),
    }
}

/// 按扩展名保存文档
pub fn save_document(document: &ShapeDocument, path: &Path) -> Result<(), FileError> {
    match FileFormat::from_path(path) {
        FileFormat::Native => native::save(document, path),
        FileFormat::Json => {
            std::fs::write(path, document.to_json()?)?;
            tracing::info!("Exported {} shapes to {}", document.len(), path.display());
            Ok(())
        }
        FileFormat::Shapes => {
            let sources: Vec<&dyn PathSource> = document.shapes.iter().map(|s| &s.path as &dyn PathSource).collect();
            shapes::write_shapes(path, &sources)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zcag_core::path::Path as ShapePath;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a.ZCAG")), FileFormat::Native);
        assert_eq!(FileFormat::from_path(Path::new("a.json")), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("a.shapes")), FileFormat::Shapes);
        assert_eq!(FileFormat::from_path(Path::new("noext")), FileFormat::Shapes);
    }

    #[test]
    fn test_save_open_each_format() {
        let doc = ShapeDocument::from_paths(vec![ShapePath::rectangle(0.0, 0.0, 3.0, 3.0)]);
        for name in ["zcag_test_fmt.zcag", "zcag_test_fmt.json", "zcag_test_fmt.shapes"] {
            let file_path = std::env::temp_dir().join(name);
            save_document(&doc, &file_path).expect("Failed to save");
            let loaded = open_document(&file_path).expect("Failed to open");
            assert_eq!(loaded.shapes[0].path, doc.shapes[0].path);
            std::fs::remove_file(&file_path).ok();
        }
    }
}
