//! 形状文档

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use zcag_core::area::Area;
use zcag_core::path::Path;

/// 文档元数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub description: String,
}

/// 带名称的形状
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedShape {
    pub name: String,
    pub path: Path,
}

/// 一组命名形状
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeDocument {
    pub metadata: DocumentMetadata,
    pub shapes: Vec<NamedShape>,
}

impl ShapeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由无名形状构造，依次命名为 shape-1、shape-2……
    pub fn from_paths(paths: Vec<Path>) -> Self {
        let shapes = paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| NamedShape {
                name: format!("shape-{}", i + 1),
                path,
            })
            .collect();
        Self {
            metadata: DocumentMetadata::default(),
            shapes,
        }
    }

    pub fn add_shape(&mut self, name: impl Into<String>, path: Path) {
        self.shapes.push(NamedShape {
            name: name.into(),
            path,
        });
    }

    pub fn shape(&self, name: &str) -> Option<&NamedShape> {
        self.shapes.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// 所有形状的并集
    pub fn union_area(&self) -> Result<Area, FileError> {
        let area = Area::new();
        for shape in &self.shapes {
            area.enqueue_path(zcag_core::rules::OperationKind::Add, &shape.path)?;
        }
        area.process_queue();
        Ok(area)
    }

    pub fn to_json(&self) -> Result<String, FileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, FileError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_json_round_trip() {
        let mut doc = ShapeDocument::new();
        doc.metadata.title = "Test Document".to_string();
        doc.add_shape("square", Path::rectangle(0.0, 0.0, 2.0, 2.0));
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"square\""));
        assert_eq!(ShapeDocument::from_json(&json).unwrap(), doc);
    }

    #[test]
    fn test_union_area() {
        let doc = ShapeDocument::from_paths(vec![
            Path::rectangle(0.0, 0.0, 4.0, 4.0),
            Path::rectangle(2.0, 0.0, 4.0, 4.0),
        ]);
        assert_eq!(doc.shape("shape-2").map(|s| s.name.as_str()), Some("shape-2"));
        let area = doc.union_area().unwrap();
        assert_relative_eq!(area.area(), 24.0, epsilon = 1e-9);
    }
}
