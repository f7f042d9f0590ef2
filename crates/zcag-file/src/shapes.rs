//! `.shapes` 文本文件
//!
//! 每个非空行一个形状，`#` 开始注释。

use crate::error::FileError;
use crate::shape_text::{format_shape, parse_shape_at};
use std::fs;
use std::path::Path as FsPath;
use zcag_core::path::{Path, PathSource};

/// 解析多行文本
pub fn parse_shapes(text: &str) -> Result<Vec<Path>, FileError> {
    let mut shapes = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = match raw.find('#') {
            Some(at) => &raw[..at],
            None => raw,
        };
        if line.trim().is_empty() {
            continue;
        }
        shapes.push(parse_shape_at(line, i + 1)?);
    }
    Ok(shapes)
}

pub fn format_shapes(shapes: &[&dyn PathSource]) -> String {
    let mut out = String::new();
    for shape in shapes {
        out.push_str(&format_shape(*shape));
        out.push('\n');
    }
    out
}

/// 读取 `.shapes` 文件
pub fn read_shapes(path: &FsPath) -> Result<Vec<Path>, FileError> {
    let text = fs::read_to_string(path)?;
    let shapes = parse_shapes(&text)?;
    tracing::info!("Loaded {} shapes from {}", shapes.len(), path.display());
    Ok(shapes)
}

/// 写入 `.shapes` 文件
pub fn write_shapes(path: &FsPath, shapes: &[&dyn PathSource]) -> Result<(), FileError> {
    fs::write(path, format_shapes(shapes))?;
    tracing::info!("Saved {} shapes to {}", shapes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_blank_lines() {
        let text = "# two squares\n\nm 0 0 l 1 0 l 1 1 z\n   \nm 5 5 l 6 5 l 6 6 z # second\n";
        let shapes = parse_shapes(text).unwrap();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[1].commands.len(), 4);
    }

    #[test]
    fn test_error_reports_file_line() {
        let err = parse_shapes("m 0 0 l 1 1 z\n\nm 0 0 l oops 1").unwrap_err();
        assert!(matches!(err, FileError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_write_read_file() {
        let file_path = std::env::temp_dir().join("zcag_test_shapes.shapes");
        let a = Path::rectangle(0.0, 0.0, 4.0, 4.0);
        let b = Path::ellipse(1.0, 1.0, 2.0, 2.0);
        write_shapes(&file_path, &[&a, &b]).expect("Failed to write");

        let loaded = read_shapes(&file_path).expect("Failed to read");
        assert_eq!(loaded, vec![a, b]);

        std::fs::remove_file(&file_path).ok();
    }
}
