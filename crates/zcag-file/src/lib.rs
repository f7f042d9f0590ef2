//! ZCAG 文件格式处理
//!
//! 支持：
//! - 形状文本格式与 `.shapes` 行文件
//! - `.zcag` 原生格式（MessagePack + Zstd）
//! - JSON 导出

pub mod document;
pub mod error;
pub mod format;
pub mod native;
pub mod shape_text;
pub mod shapes;

pub use document::{DocumentMetadata, NamedShape, ShapeDocument};
pub use error::FileError;
pub use format::{open_document, save_document, FileFormat};
pub use shape_text::{format_shape, parse_shape};
