//! 曲线段
//!
//! 有方向的边界片段（直线 / 二次 / 三次贝塞尔）。端点顺序保留路径方向，
//! `top()` / `bottom()` 给出与方向无关的规范上下端点，
//! `bounding_polygon()` 给出相交测试粗筛用的凸包多边形。

use crate::intersect;
use crate::math::{BoundingBox2, Point2};
use crate::path::PathCommand;
use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    Line {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    },
    Quad {
        x0: f64,
        y0: f64,
        cx: f64,
        cy: f64,
        x1: f64,
        y1: f64,
    },
    Cubic {
        x0: f64,
        y0: f64,
        cx0: f64,
        cy0: f64,
        cx1: f64,
        cy1: f64,
        x1: f64,
        y1: f64,
    },
}

impl Segment {
    pub fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Segment::Line { x0, y0, x1, y1 }
    }

    pub fn quad(x0: f64, y0: f64, cx: f64, cy: f64, x1: f64, y1: f64) -> Self {
        Segment::Quad {
            x0,
            y0,
            cx,
            cy,
            x1,
            y1,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn cubic(x0: f64, y0: f64, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x1: f64, y1: f64) -> Self {
        Segment::Cubic {
            x0,
            y0,
            cx0,
            cy0,
            cx1,
            cy1,
            x1,
            y1,
        }
    }

    /// 从当前点出发的路径命令构造曲线段；MoveTo / Close 返回 `None`
    pub fn from_command(from: (f64, f64), cmd: &PathCommand) -> Option<Self> {
        let (x0, y0) = from;
        match *cmd {
            PathCommand::LineTo { x, y } => Some(Segment::line(x0, y0, x, y)),
            PathCommand::QuadTo { cx, cy, x, y } => Some(Segment::quad(x0, y0, cx, cy, x, y)),
            PathCommand::CubicTo {
                cx1,
                cy1,
                cx2,
                cy2,
                x,
                y,
            } => Some(Segment::cubic(x0, y0, cx1, cy1, cx2, cy2, x, y)),
            PathCommand::MoveTo { .. } | PathCommand::Close => None,
        }
    }

    /// 1 = 直线, 2 = 二次, 3 = 三次
    pub fn order(&self) -> usize {
        match self {
            Segment::Line { .. } => 1,
            Segment::Quad { .. } => 2,
            Segment::Cubic { .. } => 3,
        }
    }

    pub fn is_curved(&self) -> bool {
        self.order() > 1
    }

    pub fn start(&self) -> Point2 {
        match *self {
            Segment::Line { x0, y0, .. }
            | Segment::Quad { x0, y0, .. }
            | Segment::Cubic { x0, y0, .. } => Point2::new(x0, y0),
        }
    }

    pub fn end(&self) -> Point2 {
        match *self {
            Segment::Line { x1, y1, .. }
            | Segment::Quad { x1, y1, .. }
            | Segment::Cubic { x1, y1, .. } => Point2::new(x1, y1),
        }
    }

    /// 控制点（不含端点）
    pub fn control_points(&self) -> ArrayVec<Point2, 2> {
        let mut pts = ArrayVec::new();
        match *self {
            Segment::Line { .. } => {}
            Segment::Quad { cx, cy, .. } => pts.push(Point2::new(cx, cy)),
            Segment::Cubic {
                cx0, cy0, cx1, cy1, ..
            } => {
                pts.push(Point2::new(cx0, cy0));
                pts.push(Point2::new(cx1, cy1));
            }
        }
        pts
    }

    /// 按路径顺序的全部点
    pub fn points(&self) -> ArrayVec<Point2, 4> {
        let mut pts = ArrayVec::new();
        pts.push(self.start());
        pts.extend(self.control_points());
        pts.push(self.end());
        pts
    }

    /// 规范上端点：(y, x) 字典序较小的端点
    pub fn top(&self) -> Point2 {
        let (s, e) = (self.start(), self.end());
        if compare_yx(&s, &e) == Ordering::Greater {
            e
        } else {
            s
        }
    }

    /// 规范下端点
    pub fn bottom(&self) -> Point2 {
        let (s, e) = (self.start(), self.end());
        if compare_yx(&s, &e) == Ordering::Greater {
            s
        } else {
            e
        }
    }

    pub fn top_x(&self) -> f64 {
        self.top().x
    }

    pub fn top_y(&self) -> f64 {
        self.top().y
    }

    pub fn bot_x(&self) -> f64 {
        self.bottom().x
    }

    pub fn bot_y(&self) -> f64 {
        self.bottom().y
    }

    /// 首尾重合且没有伸出的控制点
    pub fn is_degenerate(&self) -> bool {
        let (s, e) = (self.start(), self.end());
        s == e && self.control_points().iter().all(|p| *p == s)
    }

    pub fn reversed(&self) -> Segment {
        match *self {
            Segment::Line { x0, y0, x1, y1 } => Segment::line(x1, y1, x0, y0),
            Segment::Quad {
                x0,
                y0,
                cx,
                cy,
                x1,
                y1,
            } => Segment::quad(x1, y1, cx, cy, x0, y0),
            Segment::Cubic {
                x0,
                y0,
                cx0,
                cy0,
                cx1,
                cy1,
                x1,
                y1,
            } => Segment::cubic(x1, y1, cx1, cy1, cx0, cy0, x0, y0),
        }
    }

    /// 控制多边形包围盒（保守估计）
    pub fn hull_bounds(&self) -> BoundingBox2 {
        BoundingBox2::from_points(&self.points())
    }

    /// 相交粗筛用的凸包多边形：三角形或四边形
    pub fn bounding_polygon(&self) -> ArrayVec<Point2, 4> {
        let mut coords = [0.0; 8];
        let count = match *self {
            Segment::Line { x0, y0, x1, y1 } => {
                coords[..4].copy_from_slice(&[x0, y0, x1, y1]);
                2
            }
            Segment::Quad {
                x0,
                y0,
                cx,
                cy,
                x1,
                y1,
            } => intersect::define_quad_polygon(&mut coords, [x0, y0, cx, cy, x1, y1]),
            Segment::Cubic {
                x0,
                y0,
                cx0,
                cy0,
                cx1,
                cy1,
                x1,
                y1,
            } => intersect::define_cubic_polygon(&mut coords, [x0, y0, cx0, cy0, cx1, cy1, x1, y1]),
        };
        (0..count)
            .map(|i| Point2::new(coords[2 * i], coords[2 * i + 1]))
            .collect()
    }

    /// 按路径顺序的坐标数组
    pub fn coords(&self) -> ArrayVec<f64, 8> {
        self.points().iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// 转换为路径命令（不含起点）
    pub fn to_command(&self) -> PathCommand {
        match *self {
            Segment::Line { x1, y1, .. } => PathCommand::LineTo { x: x1, y: y1 },
            Segment::Quad { cx, cy, x1, y1, .. } => PathCommand::QuadTo {
                cx,
                cy,
                x: x1,
                y: y1,
            },
            Segment::Cubic {
                cx0,
                cy0,
                cx1,
                cy1,
                x1,
                y1,
                ..
            } => PathCommand::CubicTo {
                cx1: cx0,
                cy1: cy0,
                cx2: cx1,
                cy2: cy1,
                x: x1,
                y: y1,
            },
        }
    }
}

/// (y, x) 字典序比较
pub fn compare_yx(a: &Point2, b: &Point2) -> Ordering {
    a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
}

/// 把路径命令展开为曲线段，Close 与新子路径前的隐式闭合线也包含在内
///
/// 长度为零的闭合线与退化为一点的线段都被跳过。
pub fn segments_from_commands<I>(commands: I) -> Vec<Segment>
where
    I: IntoIterator<Item = PathCommand>,
{
    let mut segments = Vec::new();
    let mut start = (0.0, 0.0);
    let mut current = (0.0, 0.0);
    let close = |segments: &mut Vec<Segment>, from: (f64, f64), to: (f64, f64)| {
        if from != to {
            segments.push(Segment::line(from.0, from.1, to.0, to.1));
        }
    };
    for cmd in commands {
        match cmd {
            PathCommand::MoveTo { x, y } => {
                close(&mut segments, current, start);
                start = (x, y);
                current = start;
            }
            PathCommand::Close => {
                close(&mut segments, current, start);
                current = start;
            }
            _ => {
                if let Some(seg) = Segment::from_command(current, &cmd).filter(|s| !s.is_degenerate()) {
                    segments.push(seg);
                }
                if let Some(end) = cmd.end_point() {
                    current = end;
                }
            }
        }
    }
    close(&mut segments, current, start);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_orientation() {
        let down = Segment::line(0.0, 0.0, 3.0, 5.0);
        let up = down.reversed();
        assert_eq!(down.top(), up.top());
        assert_eq!(down.bottom(), up.bottom());
        assert_eq!(up.top(), Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_horizontal_top_uses_x() {
        let seg = Segment::line(5.0, 2.0, 1.0, 2.0);
        assert_eq!(seg.top_x(), 1.0);
        assert_eq!(seg.bot_x(), 5.0);
    }

    #[test]
    fn test_quad_polygon_is_triangle() {
        let q = Segment::quad(0.0, 0.0, 5.0, 10.0, 10.0, 0.0);
        assert_eq!(q.bounding_polygon().len(), 3);
        assert!(q.is_curved());
        assert_eq!(q.order(), 2);
    }

    #[test]
    fn test_cubic_polygon_collapses_to_triangle() {
        // 第一个控制点位于其余三点构成的三角形内
        let c = Segment::cubic(0.0, 0.0, 4.0, 2.0, 5.0, 10.0, 10.0, 0.0);
        assert_eq!(c.bounding_polygon().len(), 3);
    }

    #[test]
    fn test_cubic_polygon_quad() {
        let c = Segment::cubic(0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0, 0.0);
        assert_eq!(c.bounding_polygon().len(), 4);
    }

    #[test]
    fn test_from_command() {
        let seg = Segment::from_command((1.0, 1.0), &PathCommand::QuadTo {
            cx: 2.0,
            cy: 3.0,
            x: 4.0,
            y: 1.0,
        })
        .unwrap();
        assert_eq!(seg, Segment::quad(1.0, 1.0, 2.0, 3.0, 4.0, 1.0));
        assert!(Segment::from_command((0.0, 0.0), &PathCommand::Close).is_none());
    }

    #[test]
    fn test_segments_include_implicit_close() {
        let commands = vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 4.0, y: 0.0 },
            PathCommand::LineTo { x: 4.0, y: 4.0 },
            PathCommand::MoveTo { x: 10.0, y: 10.0 },
            PathCommand::LineTo { x: 12.0, y: 10.0 },
            PathCommand::Close,
        ];
        let segs = segments_from_commands(commands);
        assert_eq!(segs.len(), 5);
        assert_eq!(segs[2], Segment::line(4.0, 4.0, 0.0, 0.0));
        assert_eq!(segs[4], Segment::line(12.0, 10.0, 10.0, 10.0));
    }

    #[test]
    fn test_segments_skip_collapsed() {
        let commands = vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 5.0, y: 5.0 },
            PathCommand::QuadTo {
                cx: 5.0,
                cy: 5.0,
                x: 5.0,
                y: 5.0,
            },
            PathCommand::Close,
        ];
        let segs = segments_from_commands(commands);
        assert!(segs.iter().all(|s| !s.is_degenerate()));
        assert_eq!(segs, vec![Segment::line(0.0, 0.0, 5.0, 5.0), Segment::line(5.0, 5.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_degenerate() {
        assert!(Segment::line(1.0, 1.0, 1.0, 1.0).is_degenerate());
        assert!(!Segment::quad(1.0, 1.0, 2.0, 2.0, 1.0, 1.0).is_degenerate());
    }
}
