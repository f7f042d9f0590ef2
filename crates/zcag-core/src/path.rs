//! 路径数据与边界源契约
//!
//! - `PathCommand`：MoveTo / LineTo / QuadTo / CubicTo / Close
//! - `WindingRule`：奇偶规则或非零环绕规则
//! - `PathSource`：可重复、惰性、有限的路径命令序列，引擎既消费也实现它
//! - `Path`：可构建、可序列化的路径

use crate::math::BoundingBox2;
use crate::roots::solve_quadratic;
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};

/// 环绕规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindingRule {
    /// 奇偶规则
    EvenOdd,
    /// 非零环绕规则
    #[default]
    NonZero,
}

/// 单条路径命令
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    QuadTo {
        cx: f64,
        cy: f64,
        x: f64,
        y: f64,
    },
    CubicTo {
        cx1: f64,
        cy1: f64,
        cx2: f64,
        cy2: f64,
        x: f64,
        y: f64,
    },
    Close,
}

impl PathCommand {
    /// 应用仿射变换
    pub fn transformed(&self, t: &Transform2D) -> PathCommand {
        match *self {
            PathCommand::MoveTo { x, y } => {
                let (x, y) = t.apply(x, y);
                PathCommand::MoveTo { x, y }
            }
            PathCommand::LineTo { x, y } => {
                let (x, y) = t.apply(x, y);
                PathCommand::LineTo { x, y }
            }
            PathCommand::QuadTo { cx, cy, x, y } => {
                let (cx, cy) = t.apply(cx, cy);
                let (x, y) = t.apply(x, y);
                PathCommand::QuadTo { cx, cy, x, y }
            }
            PathCommand::CubicTo {
                cx1,
                cy1,
                cx2,
                cy2,
                x,
                y,
            } => {
                let (cx1, cy1) = t.apply(cx1, cy1);
                let (cx2, cy2) = t.apply(cx2, cy2);
                let (x, y) = t.apply(x, y);
                PathCommand::CubicTo {
                    cx1,
                    cy1,
                    cx2,
                    cy2,
                    x,
                    y,
                }
            }
            PathCommand::Close => PathCommand::Close,
        }
    }

    /// 终点坐标（Close 没有终点）
    pub fn end_point(&self) -> Option<(f64, f64)> {
        match *self {
            PathCommand::MoveTo { x, y }
            | PathCommand::LineTo { x, y }
            | PathCommand::QuadTo { x, y, .. }
            | PathCommand::CubicTo { x, y, .. } => Some((x, y)),
            PathCommand::Close => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            PathCommand::MoveTo { x, y } | PathCommand::LineTo { x, y } => {
                x.is_finite() && y.is_finite()
            }
            PathCommand::QuadTo { cx, cy, x, y } => {
                [cx, cy, x, y].iter().all(|v| v.is_finite())
            }
            PathCommand::CubicTo {
                cx1,
                cy1,
                cx2,
                cy2,
                x,
                y,
            } => [cx1, cy1, cx2, cy2, x, y].iter().all(|v| v.is_finite()),
            PathCommand::Close => true,
        }
    }
}

/// 边界源：可以被引擎读取的形状
///
/// `path_iter` 每次调用都从头开始产生命令序列；`None` 表示恒等变换。
pub trait PathSource {
    fn winding_rule(&self) -> WindingRule;

    fn path_iter(&self, transform: Option<&Transform2D>) -> Box<dyn Iterator<Item = PathCommand> + '_>;
}

/// 可构建的路径
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub winding_rule: WindingRule,
    pub commands: Vec<PathCommand>,
}

impl Path {
    pub fn new(winding_rule: WindingRule) -> Self {
        Self {
            winding_rule,
            commands: Vec::new(),
        }
    }

    /// 收集任意边界源的命令
    pub fn from_source(source: &dyn PathSource, transform: Option<&Transform2D>) -> Self {
        Self {
            winding_rule: source.winding_rule(),
            commands: source.path_iter(transform).collect(),
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::MoveTo { x, y });
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::LineTo { x, y });
        self
    }

    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::QuadTo { cx, cy, x, y });
        self
    }

    pub fn cubic_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::CubicTo {
            cx1,
            cy1,
            cx2,
            cy2,
            x,
            y,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// 轴对齐矩形
    pub fn rectangle(x: f64, y: f64, w: f64, h: f64) -> Self {
        let mut path = Path::new(WindingRule::NonZero);
        path.move_to(x, y)
            .line_to(x + w, y)
            .line_to(x + w, y + h)
            .line_to(x, y + h)
            .close();
        path
    }

    /// 多边形（自动闭合）
    pub fn polygon(points: &[(f64, f64)]) -> Self {
        let mut path = Path::new(WindingRule::NonZero);
        for (i, &(x, y)) in points.iter().enumerate() {
            if i == 0 {
                path.move_to(x, y);
            } else {
                path.line_to(x, y);
            }
        }
        if !points.is_empty() {
            path.close();
        }
        path
    }

    /// 外接矩形内的椭圆，四段三次贝塞尔近似
    pub fn ellipse(x: f64, y: f64, w: f64, h: f64) -> Self {
        const KAPPA: f64 = 0.552_284_749_831;
        let (rx, ry) = (w / 2.0, h / 2.0);
        let (cx, cy) = (x + rx, y + ry);
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);
        let mut path = Path::new(WindingRule::NonZero);
        path.move_to(cx + rx, cy)
            .cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry)
            .cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy)
            .cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry)
            .cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy)
            .close();
        path
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn is_finite(&self) -> bool {
        self.commands.iter().all(PathCommand::is_finite)
    }

    pub fn bounds(&self) -> Option<BoundingBox2> {
        path_bounds(self, None)
    }

    /// 把曲线细分为折线，`flatness` 为控制点到弦的最大允许距离
    pub fn flatten(&self, flatness: f64) -> Path {
        flatten_commands(self.commands.iter().copied(), self.winding_rule, flatness)
    }
}

impl PathSource for Path {
    fn winding_rule(&self) -> WindingRule {
        self.winding_rule
    }

    fn path_iter(&self, transform: Option<&Transform2D>) -> Box<dyn Iterator<Item = PathCommand> + '_> {
        let transform = transform.copied();
        Box::new(self.commands.iter().map(move |cmd| match &transform {
            Some(t) => cmd.transformed(t),
            None => *cmd,
        }))
    }
}

/// 一维曲线极值参数（导数为零且位于 (0,1) 内）
fn quad_extrema(p0: f64, p1: f64, p2: f64) -> Option<f64> {
    let denom = p0 - 2.0 * p1 + p2;
    if denom == 0.0 {
        return None;
    }
    let t = (p0 - p1) / denom;
    (t > 0.0 && t < 1.0).then_some(t)
}

fn cubic_extrema(p0: f64, p1: f64, p2: f64, p3: f64) -> impl Iterator<Item = f64> {
    let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
    let b = 2.0 * (p0 - 2.0 * p1 + p2);
    let c = p1 - p0;
    solve_quadratic(a, b, c)
        .into_iter()
        .filter(|t| *t > 0.0 && *t < 1.0)
}

fn eval_quad(p0: f64, p1: f64, p2: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * p0 + 2.0 * u * t * p1 + t * t * p2
}

fn eval_cubic(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// 精确包围盒（包含曲线极值，不含控制点外凸部分）
///
/// 路径不含任何点时返回 `None`。
pub fn path_bounds(source: &dyn PathSource, transform: Option<&Transform2D>) -> Option<BoundingBox2> {
    let mut bbox = BoundingBox2::empty();
    let (mut mx, mut my) = (0.0, 0.0);
    let (mut lx, mut ly) = (0.0, 0.0);
    for cmd in source.path_iter(transform) {
        match cmd {
            PathCommand::MoveTo { x, y } => {
                bbox.add_xy(x, y);
                (mx, my) = (x, y);
                (lx, ly) = (x, y);
            }
            PathCommand::LineTo { x, y } => {
                bbox.add_xy(x, y);
                (lx, ly) = (x, y);
            }
            PathCommand::QuadTo { cx, cy, x, y } => {
                bbox.add_xy(x, y);
                if let Some(t) = quad_extrema(lx, cx, x) {
                    bbox.add_xy(eval_quad(lx, cx, x, t), eval_quad(ly, cy, y, t));
                }
                if let Some(t) = quad_extrema(ly, cy, y) {
                    bbox.add_xy(eval_quad(lx, cx, x, t), eval_quad(ly, cy, y, t));
                }
                (lx, ly) = (x, y);
            }
            PathCommand::CubicTo {
                cx1,
                cy1,
                cx2,
                cy2,
                x,
                y,
            } => {
                bbox.add_xy(x, y);
                let ts = cubic_extrema(lx, cx1, cx2, x).chain(cubic_extrema(ly, cy1, cy2, y));
                for t in ts {
                    bbox.add_xy(
                        eval_cubic(lx, cx1, cx2, x, t),
                        eval_cubic(ly, cy1, cy2, y, t),
                    );
                }
                (lx, ly) = (x, y);
            }
            PathCommand::Close => (lx, ly) = (mx, my),
        }
    }
    (!bbox.is_empty()).then_some(bbox)
}

/// 细分递归上限
const MAX_FLATTEN_DEPTH: u32 = 10;

/// 点到直线（过 a、b）的距离
fn distance_to_line(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let (dx, dy) = (bx - ax, by - ay);
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }
    ((px - ax) * dy - (py - ay) * dx).abs() / len
}

fn flatten_quad(out: &mut Path, pts: [f64; 6], flatness: f64, depth: u32) {
    let [x0, y0, cx, cy, x1, y1] = pts;
    if depth >= MAX_FLATTEN_DEPTH || distance_to_line(cx, cy, x0, y0, x1, y1) <= flatness {
        out.line_to(x1, y1);
        return;
    }
    let (ax, ay) = ((x0 + cx) / 2.0, (y0 + cy) / 2.0);
    let (bx, by) = ((cx + x1) / 2.0, (cy + y1) / 2.0);
    let (mx, my) = ((ax + bx) / 2.0, (ay + by) / 2.0);
    flatten_quad(out, [x0, y0, ax, ay, mx, my], flatness, depth + 1);
    flatten_quad(out, [mx, my, bx, by, x1, y1], flatness, depth + 1);
}

fn flatten_cubic(out: &mut Path, pts: [f64; 8], flatness: f64, depth: u32) {
    let [x0, y0, c1x, c1y, c2x, c2y, x1, y1] = pts;
    let d = distance_to_line(c1x, c1y, x0, y0, x1, y1).max(distance_to_line(c2x, c2y, x0, y0, x1, y1));
    if depth >= MAX_FLATTEN_DEPTH || d <= flatness {
        out.line_to(x1, y1);
        return;
    }
    let (ax, ay) = ((x0 + c1x) / 2.0, (y0 + c1y) / 2.0);
    let (bx, by) = ((c1x + c2x) / 2.0, (c1y + c2y) / 2.0);
    let (cx, cy) = ((c2x + x1) / 2.0, (c2y + y1) / 2.0);
    let (abx, aby) = ((ax + bx) / 2.0, (ay + by) / 2.0);
    let (bcx, bcy) = ((bx + cx) / 2.0, (by + cy) / 2.0);
    let (mx, my) = ((abx + bcx) / 2.0, (aby + bcy) / 2.0);
    flatten_cubic(out, [x0, y0, ax, ay, abx, aby, mx, my], flatness, depth + 1);
    flatten_cubic(out, [mx, my, bcx, bcy, cx, cy, x1, y1], flatness, depth + 1);
}

/// 将命令序列细分为只含直线的路径
pub fn flatten_commands(
    commands: impl IntoIterator<Item = PathCommand>,
    winding_rule: WindingRule,
    flatness: f64,
) -> Path {
    let mut out = Path::new(winding_rule);
    let (mut mx, mut my) = (0.0, 0.0);
    let (mut lx, mut ly) = (0.0, 0.0);
    for cmd in commands {
        match cmd {
            PathCommand::MoveTo { x, y } => {
                out.move_to(x, y);
                (mx, my) = (x, y);
                (lx, ly) = (x, y);
            }
            PathCommand::LineTo { x, y } => {
                out.line_to(x, y);
                (lx, ly) = (x, y);
            }
            PathCommand::QuadTo { cx, cy, x, y } => {
                flatten_quad(&mut out, [lx, ly, cx, cy, x, y], flatness, 0);
                (lx, ly) = (x, y);
            }
            PathCommand::CubicTo {
                cx1,
                cy1,
                cx2,
                cy2,
                x,
                y,
            } => {
                flatten_cubic(&mut out, [lx, ly, cx1, cy1, cx2, cy2, x, y], flatness, 0);
                (lx, ly) = (x, y);
            }
            PathCommand::Close => {
                out.close();
                (lx, ly) = (mx, my);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangle_commands() {
        let rect = Path::rectangle(1.0, 2.0, 3.0, 4.0);
        assert_eq!(rect.commands.len(), 5);
        assert_eq!(rect.commands[0], PathCommand::MoveTo { x: 1.0, y: 2.0 });
        assert_eq!(rect.commands[4], PathCommand::Close);
        let bounds = rect.bounds().unwrap();
        assert_eq!(bounds, BoundingBox2::from_xywh(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_path_iter_is_restartable() {
        let path = Path::polygon(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]);
        let first: Vec<_> = path.path_iter(None).collect();
        let second: Vec<_> = path.path_iter(None).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_path_iter_with_transform() {
        let path = Path::rectangle(0.0, 0.0, 1.0, 1.0);
        let t = Transform2D::translation(5.0, -1.0);
        let moved = path_bounds(&path, Some(&t)).unwrap();
        assert_eq!(moved, BoundingBox2::from_xywh(5.0, -1.0, 1.0, 1.0));
    }

    #[test]
    fn test_quad_bounds_exclude_control_point() {
        let mut path = Path::new(WindingRule::NonZero);
        path.move_to(0.0, 0.0).quad_to(5.0, 10.0, 10.0, 0.0).close();
        let b = path.bounds().unwrap();
        assert_relative_eq!(b.max.y, 5.0);
        assert_relative_eq!(b.max.x, 10.0);
    }

    #[test]
    fn test_ellipse_bounds() {
        let e = Path::ellipse(-2.0, -1.0, 4.0, 2.0);
        let b = e.bounds().unwrap();
        assert_relative_eq!(b.min.x, -2.0, epsilon = 1e-9);
        assert_relative_eq!(b.max.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(b.min.y, -1.0, epsilon = 1e-9);
        assert_relative_eq!(b.max.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_path_has_no_bounds() {
        assert!(Path::default().bounds().is_none());
    }

    #[test]
    fn test_flatten_produces_lines_only() {
        let flat = Path::ellipse(0.0, 0.0, 100.0, 100.0).flatten(0.1);
        assert!(flat.commands.iter().all(|c| matches!(
            c,
            PathCommand::MoveTo { .. } | PathCommand::LineTo { .. } | PathCommand::Close
        )));
        assert!(flat.commands.len() > 8);
    }

    #[test]
    fn test_curve_after_close_starts_at_subpath_start() {
        let mut path = Path::new(WindingRule::NonZero);
        path.move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .line_to(10.0, 10.0)
            .close()
            .quad_to(5.0, -20.0, 10.0, 0.0)
            .close();
        let b = path.bounds().unwrap();
        assert_relative_eq!(b.min.y, -10.0, epsilon = 1e-9);

        let flat = path.flatten(0.01);
        let flat_bounds = flat.bounds().unwrap();
        assert_relative_eq!(flat_bounds.min.y, -10.0, epsilon = 0.05);
        assert_relative_eq!(flat_bounds.min.x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_non_finite_detection() {
        let mut path = Path::new(WindingRule::EvenOdd);
        path.move_to(0.0, 0.0).line_to(f64::NAN, 1.0);
        assert!(!path.is_finite());
    }
}
