//! ZCAG 核心引擎
//!
//! 构造面积几何（CAG）：由直线、二次和三次贝塞尔边界围成的二维区域，
//! 支持并、差、交、异或运算以及点、矩形、形状之间的包含与相交查询。
//!
//! # 架构设计
//!
//! - `Segment` / `Curve`：边界段与 y 单调曲线
//! - `intersect`：曲线两两求交
//! - `crossings`：扫描线穿越计数
//! - `sweep`：布尔运算扫描
//! - `Body`：不可变的已消解形状
//! - `AreaRules`：可替换的运算队列折叠规则
//! - `Area`：带延迟运算队列的线程安全门面
//!
//! # 示例
//!
//! ```rust
//! use zcag_core::prelude::*;
//!
//! let a = Area::from_source(&Path::rectangle(0.0, 0.0, 10.0, 10.0)).unwrap();
//! let b = Area::from_source(&Path::ellipse(5.0, 5.0, 10.0, 10.0)).unwrap();
//! a.subtract(&b);
//!
//! // 查询时才执行队列
//! println!("Area: {}", a.area());
//! ```

pub mod area;
pub mod body;
pub mod config;
pub mod crossings;
pub mod curve;
pub mod error;
pub mod intersect;
pub mod math;
pub mod path;
pub mod relationship;
pub mod roots;
pub mod rules;
pub mod segment;
pub mod sweep;
pub mod transform;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::area::Area;
    pub use crate::body::Body;
    pub use crate::config::EngineConfig;
    pub use crate::error::{AreaError, Result};
    pub use crate::intersect::intersects;
    pub use crate::math::{BoundingBox2, Point2, Vector2};
    pub use crate::path::{Path, PathCommand, PathSource, WindingRule};
    pub use crate::relationship::Relationship;
    pub use crate::rules::{AreaRules, MinimalRules, Operand, Operation, OperationKind};
    pub use crate::segment::Segment;
    pub use crate::transform::Transform2D;
}
