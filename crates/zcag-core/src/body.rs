//! 形状主体
//!
//! `Body` 是一个已消解形状的不可变表示：一组互不重叠的单调曲线，
//! 按子路径顺序排列，每个子路径以锚点开头。所有修改操作都返回新的
//! `Body`，克隆只增加引用计数。
//!
//! 通过 `Body::create(.., resolve = false)` 构造的主体保留原始曲线，
//! 第一次使用时按环绕规则消解并缓存结果。

use crate::crossings::{crossing_count, find_crossings};
use crate::curve::{curves_from_commands, Curve};
use crate::math::{BoundingBox2, EPSILON};
use crate::path::{PathCommand, PathSource, WindingRule};
use crate::segment::Segment;
use crate::sweep::{self, SweepOp};
use crate::transform::Transform2D;
use arrayvec::ArrayVec;
use std::sync::{Arc, OnceLock};

/// 切变分量低于该值时按轴对齐变换处理
const SHEAR_TOLERANCE: f64 = 1e-7;

#[derive(Debug)]
struct BodyInner {
    curves: Vec<Curve>,
    /// 尚未消解时记录要使用的环绕规则
    pending: Option<SweepOp>,
    resolved: OnceLock<Body>,
    bounds: OnceLock<BoundingBox2>,
}

#[derive(Debug, Clone)]
pub struct Body {
    inner: Arc<BodyInner>,
}

impl Body {
    fn new_resolved(curves: Vec<Curve>) -> Self {
        Self {
            inner: Arc::new(BodyInner {
                curves,
                pending: None,
                resolved: OnceLock::new(),
                bounds: OnceLock::new(),
            }),
        }
    }

    /// 空形状单例
    pub fn empty() -> Body {
        static EMPTY: OnceLock<Body> = OnceLock::new();
        EMPTY.get_or_init(|| Body::new_resolved(Vec::new())).clone()
    }

    /// 由已经消解的曲线构造
    pub(crate) fn from_resolved(curves: Vec<Curve>) -> Body {
        if curves.is_empty() {
            Body::empty()
        } else {
            Body::new_resolved(curves)
        }
    }

    /// 由路径命令构造
    ///
    /// 开放子路径被隐式闭合，`rule` 决定自交区域的归属。
    /// `resolve` 为 `false` 时延迟到第一次使用再消解。
    pub fn create<I>(commands: I, rule: WindingRule, resolve: bool) -> Body
    where
        I: IntoIterator<Item = PathCommand>,
    {
        let curves = curves_from_commands(commands);
        let op = match rule {
            WindingRule::EvenOdd => SweepOp::EvenOdd,
            WindingRule::NonZero => SweepOp::NonZero,
        };
        if resolve {
            return Body::from_resolved(sweep::calculate(op, &curves, &[]));
        }
        if curves.iter().all(|c| c.order() == 0) {
            return Body::empty();
        }
        Self {
            inner: Arc::new(BodyInner {
                curves,
                pending: Some(op),
                resolved: OnceLock::new(),
                bounds: OnceLock::new(),
            }),
        }
    }

    /// 由任意边界源构造并立即消解
    pub fn from_source(source: &dyn PathSource, transform: Option<&Transform2D>) -> Body {
        Body::create(source.path_iter(transform), source.winding_rule(), true)
    }

    /// 是否已经消解
    pub fn is_resolved(&self) -> bool {
        self.inner.pending.is_none()
    }

    /// 返回消解后的主体，结果被缓存
    pub fn resolve(&self) -> Body {
        match self.inner.pending {
            None => self.clone(),
            Some(op) => self.resolved_body(op).clone(),
        }
    }

    fn resolved_body(&self, op: SweepOp) -> &Body {
        self.inner.resolved.get_or_init(|| {
            let curves = sweep::calculate(op, &self.inner.curves, &[]);
            tracing::debug!(raw = self.inner.curves.len(), resolved = curves.len(), "body resolved");
            Body::from_resolved(curves)
        })
    }

    /// 消解后的曲线
    pub fn curves(&self) -> &[Curve] {
        match self.inner.pending {
            None => &self.inner.curves,
            Some(op) => &self.resolved_body(op).inner.curves,
        }
    }

    pub fn len(&self) -> usize {
        self.curves().len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves().is_empty()
    }

    /// 只含直线
    pub fn is_polygonal(&self) -> bool {
        self.curves().iter().all(|c| c.order() <= 1)
    }

    /// 快速矩形判断：锚点加两条上下对齐的竖直边
    ///
    /// 只识别消解后恰好由三条曲线构成的矩形。
    pub fn is_rectangular(&self) -> bool {
        let curves = self.curves();
        if curves.is_empty() {
            return true;
        }
        if curves.len() != 3 {
            return false;
        }
        let (c1, c2) = (&curves[1], &curves[2]);
        if c1.order() != 1 || c2.order() != 1 {
            return false;
        }
        if c1.x_top() != c1.x_bot() || c2.x_top() != c2.x_bot() {
            return false;
        }
        c1.y_top() == c2.y_top() && c1.y_bot() == c2.y_bot()
    }

    /// 至多一个闭合子路径
    pub fn is_singular(&self) -> bool {
        let curves = self.curves();
        curves.len() < 3 || curves.iter().skip(1).all(|c| c.order() != 0)
    }

    /// 精确包围盒；空形状返回原点处的零尺寸包围盒
    pub fn bounds(&self) -> BoundingBox2 {
        if let Some(op) = self.inner.pending {
            return self.resolved_body(op).bounds();
        }
        *self.inner.bounds.get_or_init(|| {
            let curves = &self.inner.curves;
            let Some(first) = curves.first() else {
                return BoundingBox2::default();
            };
            let (x, y) = first.start();
            let mut r = BoundingBox2::from_xywh(x, y, 0.0, 0.0);
            for c in &curves[1..] {
                c.enlarge(&mut r);
            }
            r
        })
    }

    /// 向外取整的包围盒
    pub fn integer_bounds(&self) -> BoundingBox2 {
        self.bounds().to_integer_bounds()
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        if !self.bounds().contains_point(x, y) {
            return false;
        }
        crossing_count(self.curves(), x, y) & 1 == 1
    }

    pub fn contains_rect(&self, x: f64, y: f64, w: f64, h: f64) -> bool {
        if w < 0.0 || h < 0.0 || !self.bounds().contains_rect(x, y, w, h) {
            return false;
        }
        find_crossings(self.curves(), x, y, x + w, y + h).is_some_and(|c| c.covers(y, y + h))
    }

    pub fn intersects_rect(&self, x: f64, y: f64, w: f64, h: f64) -> bool {
        if w < 0.0 || h < 0.0 || !self.bounds().intersects_rect(x, y, w, h) {
            return false;
        }
        find_crossings(self.curves(), x, y, x + w, y + h).is_none_or(|c| !c.is_empty())
    }

    fn combine(&self, op: SweepOp, rhs: &Body) -> Body {
        let curves = sweep::calculate(op, self.curves(), rhs.curves());
        Body::from_resolved(curves)
    }

    /// 并集
    pub fn add(&self, rhs: &Body) -> Body {
        if self.is_empty() {
            return rhs.resolve();
        }
        if rhs.is_empty() {
            return self.resolve();
        }
        self.combine(SweepOp::Add, rhs)
    }

    /// 差集
    pub fn subtract(&self, rhs: &Body) -> Body {
        if self.is_empty() || rhs.is_empty() {
            return self.resolve();
        }
        self.combine(SweepOp::Subtract, rhs)
    }

    /// 交集
    pub fn intersect(&self, rhs: &Body) -> Body {
        if self.is_empty() {
            return self.resolve();
        }
        if rhs.is_empty() {
            return rhs.resolve();
        }
        self.combine(SweepOp::Intersect, rhs)
    }

    /// 对称差
    pub fn xor(&self, rhs: &Body) -> Body {
        if self.is_empty() {
            return rhs.resolve();
        }
        if rhs.is_empty() {
            return self.resolve();
        }
        self.combine(SweepOp::Xor, rhs)
    }

    /// 直接拼接两个已知互不重叠的主体
    pub fn merge(&self, other: &Body) -> Body {
        Body::merge_all([self, other])
    }

    pub fn merge_all<'a, I>(bodies: I) -> Body
    where
        I: IntoIterator<Item = &'a Body>,
    {
        let mut curves = Vec::new();
        for body in bodies {
            curves.extend_from_slice(body.curves());
        }
        Body::from_resolved(curves)
    }

    /// 仿射变换
    ///
    /// 只含缩放和平移时逐条变换曲线，y 翻转时反转曲线方向；
    /// 其他情况沿路径迭代器重建。
    pub fn transform(&self, t: &Transform2D) -> Body {
        if t.is_identity() || self.is_empty() {
            return self.resolve();
        }
        let (sx, sy) = (t.scale_x(), t.scale_y());
        let axis_aligned =
            t.shear_x().abs() < SHEAR_TOLERANCE && t.shear_y().abs() < SHEAR_TOLERANCE && sx != 0.0 && sy != 0.0;
        if axis_aligned {
            let (tx, ty) = (t.translate_x(), t.translate_y());
            let mapped: Option<Vec<Curve>> = self.curves().iter().map(|c| c.scaled(sx, tx, sy, ty)).collect();
            if let Some(curves) = mapped {
                return Body::from_resolved(curves);
            }
            tracing::debug!("axis-aligned transform collapsed a curve, rebuilding");
        }
        Body::create(self.iter_path(Some(t)), WindingRule::NonZero, true)
    }

    /// 两个主体描述同一区域
    pub fn equals(&self, other: &Body) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        let (a, b) = (self.curves(), other.curves());
        if a.is_empty() || b.is_empty() {
            return a.is_empty() && b.is_empty();
        }
        let (ba, bb) = (self.bounds(), other.bounds());
        let scale = 1.0 + ba.min.x.abs().max(ba.min.y.abs()).max(ba.max.x.abs()).max(ba.max.y.abs());
        if !ba.approx_eq(&bb, EPSILON * scale) {
            return false;
        }
        if a == b {
            return true;
        }
        self.xor(other).is_empty()
    }

    /// 面积
    ///
    /// 沿边界积分 x·dy，三点 Gauss–Legendre 对三次以内的曲线精确。
    pub fn area(&self) -> f64 {
        let nodes = [
            (0.5 - 0.5 * (0.6f64).sqrt(), 5.0 / 18.0),
            (0.5, 8.0 / 18.0),
            (0.5 + 0.5 * (0.6f64).sqrt(), 5.0 / 18.0),
        ];
        let mut total = 0.0;
        for seg in self.curves().iter().filter_map(Curve::to_segment) {
            let coords = seg.coords();
            let xs: ArrayVec<f64, 4> = coords.iter().step_by(2).copied().collect();
            let ys: ArrayVec<f64, 4> = coords.iter().skip(1).step_by(2).copied().collect();
            for (t, w) in nodes {
                total += w * bezier(&xs, t) * bezier_derivative(&ys, t);
            }
        }
        total.abs()
    }

    /// 路径迭代器，环绕规则为非零
    pub fn iter_path(&self, transform: Option<&Transform2D>) -> BodyPathIter<'_> {
        BodyPathIter {
            curves: self.curves(),
            index: 0,
            after_gap: false,
            transform: transform.copied(),
        }
    }

    /// 边界上的全部曲线段，包括连接线和闭合线
    pub fn boundary_segments(&self) -> Vec<Segment> {
        crate::segment::segments_from_commands(self.iter_path(None))
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::empty()
    }
}

impl PartialEq for Body {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl PathSource for Body {
    fn winding_rule(&self) -> WindingRule {
        WindingRule::NonZero
    }

    fn path_iter(&self, transform: Option<&Transform2D>) -> Box<dyn Iterator<Item = PathCommand> + '_> {
        Box::new(self.iter_path(transform))
    }
}

/// 按子路径输出主体边界
///
/// 相邻曲线首尾不相接时插入一条 LineTo，子路径末尾输出 Close。
#[derive(Debug, Clone)]
pub struct BodyPathIter<'a> {
    curves: &'a [Curve],
    index: usize,
    after_gap: bool,
    transform: Option<Transform2D>,
}

impl Iterator for BodyPathIter<'_> {
    type Item = PathCommand;

    fn next(&mut self) -> Option<PathCommand> {
        let current = self.curves.get(self.index);
        let cmd = if self.after_gap {
            match current {
                Some(c) if c.order() != 0 => {
                    let (x, y) = c.start();
                    PathCommand::LineTo { x, y }
                }
                _ => PathCommand::Close,
            }
        } else {
            current?.path_command()
        };

        if self.after_gap {
            self.after_gap = false;
        } else {
            let prev = &self.curves[self.index];
            self.index += 1;
            self.after_gap = match self.curves.get(self.index) {
                Some(next) => next.order() == 0 || prev.end() != next.start(),
                None => true,
            };
        }
        Some(match &self.transform {
            Some(t) => cmd.transformed(t),
            None => cmd,
        })
    }
}

fn bezier(points: &[f64], t: f64) -> f64 {
    let mut work: ArrayVec<f64, 4> = points.iter().copied().collect();
    let mut n = work.len();
    while n > 1 {
        for i in 0..n - 1 {
            work[i] += (work[i + 1] - work[i]) * t;
        }
        n -= 1;
    }
    work.first().copied().unwrap_or(0.0)
}

fn bezier_derivative(points: &[f64], t: f64) -> f64 {
    let degree = points.len().saturating_sub(1) as f64;
    let diffs: ArrayVec<f64, 4> = points.windows(2).map(|w| degree * (w[1] - w[0])).collect();
    bezier(&diffs, t)
}
