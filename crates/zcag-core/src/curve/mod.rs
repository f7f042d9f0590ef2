//! 单调曲线
//!
//! 扫描线算法使用的边界表示：每条曲线在 y 上单调，按上端点在前存储，
//! 并用 [`Direction`] 记录原始路径是自上而下还是自下而上。
//! 锚点（[`Curve::Anchor`]）标记一条子路径的起点。
//!
//! 路径中的非单调曲线在插入时按 y 极值处切分，水平线段被丢弃。

mod cubic;
mod line;
mod quad;

pub use cubic::CubicCurve;
pub use line::LineCurve;
pub use quad::QuadCurve;

use crate::crossings::Crossings;
use crate::math::BoundingBox2;
use crate::path::PathCommand;
use crate::segment::Segment;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 曲线原始走向相对 y 轴的方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// 路径自上而下（y 增大）
    Increasing,
    /// 路径自下而上
    Decreasing,
}

impl Direction {
    pub fn sign(self) -> i32 {
        match self {
            Direction::Increasing => 1,
            Direction::Decreasing => -1,
        }
    }

    pub fn reversed(self) -> Direction {
        match self {
            Direction::Increasing => Direction::Decreasing,
            Direction::Decreasing => Direction::Increasing,
        }
    }
}

/// 相交搜索停止细分的参数宽度
const T_MIN: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    /// 子路径起点
    Anchor { x: f64, y: f64 },
    Line(LineCurve),
    Quad(QuadCurve),
    Cubic(CubicCurve),
}

impl Curve {
    pub fn anchor(x: f64, y: f64) -> Self {
        Curve::Anchor { x, y }
    }

    /// 0 = 锚点, 1 = 直线, 2 = 二次, 3 = 三次
    pub fn order(&self) -> usize {
        match self {
            Curve::Anchor { .. } => 0,
            Curve::Line(_) => 1,
            Curve::Quad(_) => 2,
            Curve::Cubic(_) => 3,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Curve::Anchor { .. } => Direction::Increasing,
            Curve::Line(c) => c.direction,
            Curve::Quad(c) => c.direction,
            Curve::Cubic(c) => c.direction,
        }
    }

    pub fn x_top(&self) -> f64 {
        match self {
            Curve::Anchor { x, .. } => *x,
            Curve::Line(c) => c.x0,
            Curve::Quad(c) => c.x0,
            Curve::Cubic(c) => c.x0,
        }
    }

    pub fn y_top(&self) -> f64 {
        match self {
            Curve::Anchor { y, .. } => *y,
            Curve::Line(c) => c.y0,
            Curve::Quad(c) => c.y0,
            Curve::Cubic(c) => c.y0,
        }
    }

    pub fn x_bot(&self) -> f64 {
        match self {
            Curve::Anchor { x, .. } => *x,
            Curve::Line(c) => c.x1,
            Curve::Quad(c) => c.x1,
            Curve::Cubic(c) => c.x1,
        }
    }

    pub fn y_bot(&self) -> f64 {
        match self {
            Curve::Anchor { y, .. } => *y,
            Curve::Line(c) => c.y1,
            Curve::Quad(c) => c.y1,
            Curve::Cubic(c) => c.y1,
        }
    }

    pub fn x_min(&self) -> f64 {
        match self {
            Curve::Anchor { x, .. } => *x,
            Curve::Line(c) => c.x_min(),
            Curve::Quad(c) => c.x_min(),
            Curve::Cubic(c) => c.x_min(),
        }
    }

    pub fn x_max(&self) -> f64 {
        match self {
            Curve::Anchor { x, .. } => *x,
            Curve::Line(c) => c.x_max(),
            Curve::Quad(c) => c.x_max(),
            Curve::Cubic(c) => c.x_max(),
        }
    }

    /// 路径方向上的起点
    pub fn start(&self) -> (f64, f64) {
        match self.direction() {
            Direction::Increasing => (self.x_top(), self.y_top()),
            Direction::Decreasing => (self.x_bot(), self.y_bot()),
        }
    }

    /// 路径方向上的终点
    pub fn end(&self) -> (f64, f64) {
        match self.direction() {
            Direction::Increasing => (self.x_bot(), self.y_bot()),
            Direction::Decreasing => (self.x_top(), self.y_top()),
        }
    }

    pub fn x_for_y(&self, y: f64) -> f64 {
        match self {
            Curve::Anchor { x, .. } => *x,
            Curve::Line(c) => c.x_for_y(y),
            Curve::Quad(c) => c.x_for_y(y),
            Curve::Cubic(c) => c.x_for_y(y),
        }
    }

    pub fn t_for_y(&self, y: f64) -> f64 {
        match self {
            Curve::Anchor { .. } => 0.0,
            Curve::Line(c) => c.t_for_y(y),
            Curve::Quad(c) => c.t_for_y(y),
            Curve::Cubic(c) => c.t_for_y(y),
        }
    }

    pub fn x_for_t(&self, t: f64) -> f64 {
        match self {
            Curve::Anchor { x, .. } => *x,
            Curve::Line(c) => c.x_for_t(t),
            Curve::Quad(c) => c.x_for_t(t),
            Curve::Cubic(c) => c.x_for_t(t),
        }
    }

    pub fn y_for_t(&self, t: f64) -> f64 {
        match self {
            Curve::Anchor { y, .. } => *y,
            Curve::Line(c) => c.y_for_t(t),
            Curve::Quad(c) => c.y_for_t(t),
            Curve::Cubic(c) => c.y_for_t(t),
        }
    }

    /// (t0, t1) 内下一个 x 方向极值的参数，没有则返回 t1
    pub fn next_vertical(&self, t0: f64, t1: f64) -> f64 {
        match self {
            Curve::Anchor { .. } | Curve::Line(_) => t1,
            Curve::Quad(c) => c.next_vertical(t0, t1),
            Curve::Cubic(c) => c.next_vertical(t0, t1),
        }
    }

    /// 从 (x, y) 向右的射线与本曲线的交点数（0 或 1），y 区间上闭下开
    pub fn crossings_for(&self, x: f64, y: f64) -> i32 {
        if self.order() == 0 {
            return 0;
        }
        if y >= self.y_top() && y < self.y_bot() && x < self.x_max() && (x < self.x_min() || x < self.x_for_y(y)) {
            return 1;
        }
        0
    }

    /// 把本曲线穿过矩形左侧的 y 区间记入 `c`
    ///
    /// 返回 `true` 表示曲线穿入矩形内部，调用方可以立即得出结论。
    pub fn accumulate_crossings(&self, c: &mut Crossings) -> bool {
        match self {
            Curve::Anchor { x, y } => *x > c.xlo() && *x < c.xhi() && *y > c.ylo() && *y < c.yhi(),
            Curve::Line(line) => line.accumulate_crossings(c),
            _ => self.accumulate_curved_crossings(c),
        }
    }

    fn accumulate_curved_crossings(&self, c: &mut Crossings) -> bool {
        let (xlo, ylo, xhi, yhi) = (c.xlo(), c.ylo(), c.xhi(), c.yhi());
        if self.x_min() >= xhi {
            return false;
        }
        let (y0, y1) = (self.y_top(), self.y_bot());
        let (mut tstart, ystart) = if y0 < ylo {
            if y1 <= ylo {
                return false;
            }
            (self.t_for_y(ylo), ylo)
        } else {
            if y0 >= yhi {
                return false;
            }
            (0.0, y0)
        };
        let (tend, yend) = if y1 > yhi {
            (self.t_for_y(yhi), yhi)
        } else {
            (1.0, y1)
        };
        let mut hit_lo = false;
        let mut hit_hi = false;
        loop {
            let x = self.x_for_t(tstart);
            if x < xhi {
                if hit_hi || x > xlo {
                    return true;
                }
                hit_lo = true;
            } else {
                if hit_lo {
                    return true;
                }
                hit_hi = true;
            }
            if tstart >= tend {
                break;
            }
            tstart = self.next_vertical(tstart, tend);
        }
        if hit_lo {
            c.record(ystart, yend, self.direction());
        }
        false
    }

    pub fn enlarge(&self, r: &mut BoundingBox2) {
        match self {
            Curve::Anchor { x, y } => r.add_xy(*x, *y),
            Curve::Line(c) => c.enlarge(r),
            Curve::Quad(c) => c.enlarge(r),
            Curve::Cubic(c) => c.enlarge(r),
        }
    }

    /// 截取 [ystart, yend] 之间的部分并指定方向
    pub fn sub_curve(&self, ystart: f64, yend: f64, dir: Direction) -> Curve {
        match self {
            Curve::Anchor { .. } => *self,
            Curve::Line(c) => Curve::Line(c.sub_curve(ystart, yend, dir)),
            Curve::Quad(c) => Curve::Quad(c.sub_curve(ystart, yend, dir)),
            Curve::Cubic(c) => Curve::Cubic(c.sub_curve(ystart, yend, dir)),
        }
    }

    pub fn with_direction(&self, dir: Direction) -> Curve {
        match self {
            Curve::Anchor { .. } => *self,
            Curve::Line(c) => Curve::Line(c.with_direction(dir)),
            Curve::Quad(c) => Curve::Quad(c.with_direction(dir)),
            Curve::Cubic(c) => Curve::Cubic(c.with_direction(dir)),
        }
    }

    pub fn reversed(&self) -> Curve {
        self.with_direction(self.direction().reversed())
    }

    /// 仅含缩放与平移的变换；结果退化为水平时返回 `None`
    pub fn scaled(&self, sx: f64, tx: f64, sy: f64, ty: f64) -> Option<Curve> {
        let curve = match self {
            Curve::Anchor { x, y } => return Some(Curve::anchor(x * sx + tx, y * sy + ty)),
            Curve::Line(c) => Curve::Line(c.scaled(sx, tx, sy, ty)),
            Curve::Quad(c) => Curve::Quad(c.scaled(sx, tx, sy, ty)),
            Curve::Cubic(c) => Curve::Cubic(c.scaled(sx, tx, sy, ty)),
        };
        (curve.y_top() < curve.y_bot()).then_some(curve)
    }

    /// 按路径方向输出的路径命令（锚点为 MoveTo）
    pub fn path_command(&self) -> PathCommand {
        match self {
            Curve::Anchor { x, y } => PathCommand::MoveTo { x: *x, y: *y },
            _ => match self.to_segment() {
                Some(seg) => seg.to_command(),
                None => PathCommand::Close,
            },
        }
    }

    /// 按路径方向的曲线段；锚点没有对应的段
    pub fn to_segment(&self) -> Option<Segment> {
        let seg = match self {
            Curve::Anchor { .. } => return None,
            Curve::Line(c) => Segment::line(c.x0, c.y0, c.x1, c.y1),
            Curve::Quad(c) => Segment::quad(c.x0, c.y0, c.cx0, c.cy0, c.x1, c.y1),
            Curve::Cubic(c) => Segment::cubic(c.x0, c.y0, c.cx0, c.cy0, c.cx1, c.cy1, c.x1, c.y1),
        };
        Some(match self.direction() {
            Direction::Increasing => seg,
            Direction::Decreasing => seg.reversed(),
        })
    }

    /// 在 `yrange` 内比较两条曲线的左右次序
    ///
    /// `yrange[1]` 会被收缩到次序保持不变的最大范围。`Equal` 表示两条
    /// 曲线在收缩后的区间内重合。
    pub fn compare_to(&self, that: &Curve, yrange: &mut [f64; 2]) -> Ordering {
        if let (Curve::Line(a), Curve::Line(b)) = (self, that) {
            return a.compare_lines(b, yrange);
        }
        let y0 = yrange[0];
        let y1 = yrange[1].min(self.y_bot()).min(that.y_bot());
        if y1 <= y0 {
            tracing::warn!(y0, y1, "curve comparison range is empty");
            return order_of(self.x_for_y(y0), that.x_for_y(y0));
        }
        yrange[1] = y1;
        if self.x_max() <= that.x_min() {
            return if self.x_min() == that.x_max() {
                Ordering::Equal
            } else {
                Ordering::Less
            };
        }
        if self.x_min() >= that.x_max() {
            return Ordering::Greater;
        }

        // s 为本曲线参数，t 为另一条曲线参数
        let mut s0 = self.t_for_y(y0);
        let mut ys0 = self.y_for_t(s0);
        if ys0 < y0 {
            s0 = self.refine_t_for_y(s0, y0);
            ys0 = self.y_for_t(s0);
        }
        let mut s1 = self.t_for_y(y1);
        if self.y_for_t(s1) < y0 {
            s1 = self.refine_t_for_y(s1, y0);
        }
        let mut t0 = that.t_for_y(y0);
        let mut yt0 = that.y_for_t(t0);
        if yt0 < y0 {
            t0 = that.refine_t_for_y(t0, y0);
            yt0 = that.y_for_t(t0);
        }
        let mut t1 = that.t_for_y(y1);
        if that.y_for_t(t1) < y0 {
            t1 = that.refine_t_for_y(t1, y0);
        }
        let mut xs0 = self.x_for_t(s0);
        let mut xt0 = that.x_for_t(t0);
        let scale = y0.abs().max(y1.abs());
        let ymin = (scale * 1e-14).max(1e-300);
        if fairly_close(xs0, xt0) {
            // 从顶部开始探测两条曲线保持重合的最大范围
            let mut bump = ymin;
            let max_bump = (ymin * 1e13).min((y1 - y0) * 0.1);
            let mut y = y0 + bump;
            while y <= y1 {
                if fairly_close(self.x_for_y(y), that.x_for_y(y)) {
                    bump *= 2.0;
                    if bump > max_bump {
                        bump = max_bump;
                    }
                } else {
                    y -= bump;
                    loop {
                        bump /= 2.0;
                        let newy = y + bump;
                        if newy <= y {
                            break;
                        }
                        if fairly_close(self.x_for_y(newy), that.x_for_y(newy)) {
                            y = newy;
                        }
                    }
                    break;
                }
                y += bump;
            }
            if y > y0 {
                if y < y1 {
                    yrange[1] = y;
                }
                return Ordering::Equal;
            }
        }
        while s0 < s1 && t0 < t1 {
            let sh = self.next_vertical(s0, s1);
            let xsh = self.x_for_t(sh);
            let ysh = self.y_for_t(sh);
            let th = that.next_vertical(t0, t1);
            let xth = that.x_for_t(th);
            let yth = that.y_for_t(th);
            let this_span = Span::new(s0, xs0, ys0, sh, xsh, ysh);
            let that_span = Span::new(t0, xt0, yt0, th, xth, yth);
            if self.find_intersect(that, yrange, this_span, that_span) {
                break;
            }
            if ysh < yth {
                if ysh > yrange[0] {
                    if ysh < yrange[1] {
                        yrange[1] = ysh;
                    }
                    break;
                }
                s0 = sh;
                xs0 = xsh;
                ys0 = ysh;
            } else {
                if yth > yrange[0] {
                    if yth < yrange[1] {
                        yrange[1] = yth;
                    }
                    break;
                }
                t0 = th;
                xt0 = xth;
                yt0 = yth;
            }
        }
        let ymid = (yrange[0] + yrange[1]) / 2.0;
        order_of(self.x_for_y(ymid), that.x_for_y(ymid))
    }

    /// 在两段 x 单调的参数区间内二分查找交点，找到则把 `yrange[1]` 收缩到交点
    fn find_intersect(&self, that: &Curve, yrange: &mut [f64; 2], s: Span, t: Span) -> bool {
        if s.y0 > t.y1 || t.y0 > s.y1 {
            return false;
        }
        if s.x0.min(s.x1) > t.x0.max(t.x1) || s.x0.max(s.x1) < t.x0.min(t.x1) {
            return false;
        }
        let split_s = s.t1 - s.t0 > T_MIN;
        let split_t = t.t1 - t.t0 > T_MIN;
        if split_s {
            let (s_lo, s_hi) = s.bisect(self);
            if split_t {
                let (t_lo, t_hi) = t.bisect(that);
                let (ys, yt) = (s_lo.y1, t_lo.y1);
                if ys >= t.y0 && yt >= s.y0 && self.find_intersect(that, yrange, s_lo, t_lo) {
                    return true;
                }
                if ys >= yt && self.find_intersect(that, yrange, s_lo, t_hi) {
                    return true;
                }
                if yt >= ys && self.find_intersect(that, yrange, s_hi, t_lo) {
                    return true;
                }
                if s.y1 >= yt && t.y1 >= ys && self.find_intersect(that, yrange, s_hi, t_hi) {
                    return true;
                }
            } else {
                let ys = s_lo.y1;
                if ys >= t.y0 && self.find_intersect(that, yrange, s_lo, t) {
                    return true;
                }
                if t.y1 >= ys && self.find_intersect(that, yrange, s_hi, t) {
                    return true;
                }
            }
        } else if split_t {
            let (t_lo, t_hi) = t.bisect(that);
            let yt = t_lo.y1;
            if yt >= s.y0 && self.find_intersect(that, yrange, s, t_lo) {
                return true;
            }
            if s.y1 >= yt && self.find_intersect(that, yrange, s, t_hi) {
                return true;
            }
        } else {
            // 足够小，按弦求交
            let xlk = s.x1 - s.x0;
            let ylk = s.y1 - s.y0;
            let xnm = t.x1 - t.x0;
            let ynm = t.y1 - t.y0;
            let xmk = t.x0 - s.x0;
            let ymk = t.y0 - s.y0;
            let det = xnm * ylk - ynm * xlk;
            if det != 0.0 {
                let detinv = 1.0 / det;
                let sp = (xnm * ymk - ynm * xmk) * detinv;
                let tp = (xlk * ymk - ylk * xmk) * detinv;
                if (0.0..=1.0).contains(&sp) && (0.0..=1.0).contains(&tp) {
                    let sp = s.t0 + sp * (s.t1 - s.t0);
                    let tp = t.t0 + tp * (t.t1 - t.t0);
                    let y = (self.y_for_t(sp) + that.y_for_t(tp)) / 2.0;
                    if y <= yrange[1] && y > yrange[0] {
                        yrange[1] = y;
                        return true;
                    }
                }
            }
        }
        false
    }

    /// 二分修正 t，使 y(t) 不低于 y0
    fn refine_t_for_y(&self, mut t0: f64, y0: f64) -> f64 {
        let mut t1 = 1.0;
        loop {
            let th = (t0 + t1) / 2.0;
            if th == t0 || th == t1 {
                return t1;
            }
            let y = self.y_for_t(th);
            if y < y0 {
                t0 = th;
            } else if y > y0 {
                t1 = th;
            } else {
                return t1;
            }
        }
    }
}

/// 曲线上一段参数区间及其端点坐标
#[derive(Debug, Clone, Copy)]
struct Span {
    t0: f64,
    x0: f64,
    y0: f64,
    t1: f64,
    x1: f64,
    y1: f64,
}

impl Span {
    fn new(t0: f64, x0: f64, y0: f64, t1: f64, x1: f64, y1: f64) -> Self {
        Self {
            t0,
            x0,
            y0,
            t1,
            x1,
            y1,
        }
    }

    fn bisect(&self, curve: &Curve) -> (Span, Span) {
        let t = (self.t0 + self.t1) / 2.0;
        let (x, y) = (curve.x_for_t(t), curve.y_for_t(t));
        (
            Span::new(self.t0, self.x0, self.y0, t, x, y),
            Span::new(t, x, y, self.t1, self.x1, self.y1),
        )
    }
}

pub(crate) fn order_of(x1: f64, x2: f64) -> Ordering {
    if x1 < x2 {
        Ordering::Less
    } else if x1 > x2 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

fn fairly_close(v1: f64, v2: f64) -> bool {
    (v1 - v2).abs() < v1.abs().max(v2.abs()) * 1e-10
}

/// 插入子路径起点
pub fn insert_move(curves: &mut Vec<Curve>, x: f64, y: f64) {
    curves.push(Curve::anchor(x, y));
}

/// 插入直线，水平线被丢弃
pub fn insert_line(curves: &mut Vec<Curve>, x0: f64, y0: f64, x1: f64, y1: f64) {
    if y0 < y1 {
        curves.push(Curve::Line(LineCurve::new(x0, y0, x1, y1, Direction::Increasing)));
    } else if y0 > y1 {
        curves.push(Curve::Line(LineCurve::new(x1, y1, x0, y0, Direction::Decreasing)));
    }
}

/// 插入二次曲线，在 y 极值处切分为单调段
pub fn insert_quad(curves: &mut Vec<Curve>, x0: f64, y0: f64, cx: f64, cy: f64, x1: f64, y1: f64) {
    let (pts, dir) = if y0 > y1 {
        ([x1, y1, cx, cy, x0, y0], Direction::Decreasing)
    } else if y0 == y1 && y0 == cy {
        return;
    } else {
        ([x0, y0, cx, cy, x1, y1], Direction::Increasing)
    };
    match quad::horizontal_param(pts[1], pts[3], pts[5]) {
        None => add_quad(curves, pts, dir),
        Some(t) => {
            let (first, second) = quad::split(pts, t);
            let (a, b) = match dir {
                Direction::Increasing => (first, second),
                Direction::Decreasing => (second, first),
            };
            add_quad(curves, a, dir);
            add_quad(curves, b, dir);
        }
    }
}

/// 插入三次曲线，在 y 极值处切分为至多三段单调曲线
#[allow(clippy::too_many_arguments)]
pub fn insert_cubic(
    curves: &mut Vec<Curve>,
    x0: f64,
    y0: f64,
    cx0: f64,
    cy0: f64,
    cx1: f64,
    cy1: f64,
    x1: f64,
    y1: f64,
) {
    let (pts, dir) = if y0 > y1 {
        ([x1, y1, cx1, cy1, cx0, cy0, x0, y0], Direction::Decreasing)
    } else if y0 == y1 && y0 == cy0 && y0 == cy1 {
        return;
    } else {
        ([x0, y0, cx0, cy0, cx1, cy1, x1, y1], Direction::Increasing)
    };
    let params = cubic::horizontal_params(pts[1], pts[3], pts[5], pts[7]);
    let mut pieces: Vec<[f64; 8]> = Vec::with_capacity(3);
    let mut rest = pts;
    let mut consumed = 0.0;
    for t in params {
        // 后续参数相对剩余区间重新归一化
        let local = (t - consumed) / (1.0 - consumed);
        let (head, tail) = cubic::split(rest, local);
        pieces.push(head);
        rest = tail;
        consumed = t;
    }
    pieces.push(rest);
    if dir == Direction::Decreasing {
        pieces.reverse();
    }
    for piece in pieces {
        add_cubic(curves, piece, dir);
    }
}

fn add_quad(curves: &mut Vec<Curve>, p: [f64; 6], dir: Direction) {
    let [x0, y0, cx, cy, x1, y1] = p;
    if y0 > y1 {
        curves.push(Curve::Quad(QuadCurve::new(x1, y1, cx, cy, x0, y0, dir.reversed())));
    } else if y1 > y0 {
        curves.push(Curve::Quad(QuadCurve::new(x0, y0, cx, cy, x1, y1, dir)));
    }
}

fn add_cubic(curves: &mut Vec<Curve>, p: [f64; 8], dir: Direction) {
    let [x0, y0, cx0, cy0, cx1, cy1, x1, y1] = p;
    if y0 > y1 {
        curves.push(Curve::Cubic(CubicCurve::new(
            x1,
            y1,
            cx1,
            cy1,
            cx0,
            cy0,
            x0,
            y0,
            dir.reversed(),
        )));
    } else if y1 > y0 {
        curves.push(Curve::Cubic(CubicCurve::new(x0, y0, cx0, cy0, cx1, cy1, x1, y1, dir)));
    }
}

/// 把路径命令序列转换为单调曲线列表
///
/// 每个子路径起点前以及末尾都会补一条回到起点的闭合线。
pub fn curves_from_commands<I>(commands: I) -> Vec<Curve>
where
    I: IntoIterator<Item = PathCommand>,
{
    let mut curves = Vec::new();
    let (mut movx, mut movy) = (0.0, 0.0);
    let (mut curx, mut cury) = (0.0, 0.0);
    for cmd in commands {
        match cmd {
            PathCommand::MoveTo { x, y } => {
                insert_line(&mut curves, curx, cury, movx, movy);
                movx = x;
                movy = y;
                curx = x;
                cury = y;
                insert_move(&mut curves, x, y);
            }
            PathCommand::LineTo { x, y } => {
                insert_line(&mut curves, curx, cury, x, y);
                curx = x;
                cury = y;
            }
            PathCommand::QuadTo { cx, cy, x, y } => {
                insert_quad(&mut curves, curx, cury, cx, cy, x, y);
                curx = x;
                cury = y;
            }
            PathCommand::CubicTo {
                cx1,
                cy1,
                cx2,
                cy2,
                x,
                y,
            } => {
                insert_cubic(&mut curves, curx, cury, cx1, cy1, cx2, cy2, x, y);
                curx = x;
                cury = y;
            }
            PathCommand::Close => {
                insert_line(&mut curves, curx, cury, movx, movy);
                curx = movx;
                cury = movy;
            }
        }
    }
    insert_line(&mut curves, curx, cury, movx, movy);
    curves
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_insert_line_orients_top_down() {
        let mut curves = Vec::new();
        insert_line(&mut curves, 0.0, 10.0, 5.0, 0.0);
        insert_line(&mut curves, 0.0, 3.0, 5.0, 3.0);
        assert_eq!(curves.len(), 1);
        let c = &curves[0];
        assert_eq!(c.y_top(), 0.0);
        assert_eq!(c.direction(), Direction::Decreasing);
        assert_eq!(c.start(), (0.0, 10.0));
    }

    #[test]
    fn test_insert_quad_splits_at_extremum() {
        let mut curves = Vec::new();
        insert_quad(&mut curves, 0.0, 0.0, 5.0, 10.0, 10.0, 0.0);
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].direction(), Direction::Increasing);
        assert_eq!(curves[1].direction(), Direction::Decreasing);
        // 两段在路径上首尾相接
        let (ex, ey) = curves[0].end();
        let (sx, sy) = curves[1].start();
        assert_relative_eq!(ex, sx);
        assert_relative_eq!(ey, sy);
    }

    #[test]
    fn test_insert_cubic_three_pieces_in_path_order() {
        let mut curves = Vec::new();
        insert_cubic(&mut curves, 0.0, 10.0, 3.0, -5.0, 6.0, 15.0, 9.0, 0.0);
        assert_eq!(curves.len(), 3);
        assert_eq!(curves[0].start(), (0.0, 10.0));
        assert_eq!(curves[2].end(), (9.0, 0.0));
        for pair in curves.windows(2) {
            let (ex, ey) = pair[0].end();
            let (sx, sy) = pair[1].start();
            assert_relative_eq!(ex, sx, epsilon = 1e-9);
            assert_relative_eq!(ey, sy, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_curves_from_commands_closes_subpaths() {
        let commands = vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 10.0, y: 0.0 },
            PathCommand::LineTo { x: 10.0, y: 10.0 },
        ];
        let curves = curves_from_commands(commands);
        // 锚点 + 右边 + 隐式闭合的对角线
        assert_eq!(curves.len(), 3);
        assert_eq!(curves[0].order(), 0);
    }

    #[test]
    fn test_crossings_for() {
        let mut curves = Vec::new();
        insert_line(&mut curves, 5.0, 0.0, 5.0, 10.0);
        let c = &curves[0];
        assert_eq!(c.crossings_for(0.0, 5.0), 1);
        assert_eq!(c.crossings_for(6.0, 5.0), 0);
        assert_eq!(c.crossings_for(0.0, 10.0), 0);
        assert_eq!(c.crossings_for(0.0, 0.0), 1);
    }

    #[test]
    fn test_compare_curve_with_line() {
        let mut curves = Vec::new();
        insert_quad(&mut curves, 0.0, 0.0, 10.0, 5.0, 0.0, 10.0);
        insert_line(&mut curves, 20.0, 0.0, 20.0, 10.0);
        let mut yrange = [0.0, 10.0];
        assert_eq!(curves[0].compare_to(&curves[1], &mut yrange), Ordering::Less);
        let mut yrange = [0.0, 10.0];
        assert_eq!(curves[1].compare_to(&curves[0], &mut yrange), Ordering::Greater);
    }

    #[test]
    fn test_compare_crossing_curves_limits_range() {
        let mut curves = Vec::new();
        insert_quad(&mut curves, 0.0, 0.0, 10.0, 5.0, 10.0, 10.0);
        insert_quad(&mut curves, 10.0, 0.0, 0.0, 5.0, 0.0, 10.0);
        let mut yrange = [0.0, 10.0];
        assert_eq!(curves[0].compare_to(&curves[1], &mut yrange), Ordering::Less);
        assert!(yrange[1] < 10.0);
        assert!(yrange[1] > 0.0);
    }

    #[test]
    fn test_identical_curves_compare_equal() {
        let mut curves = Vec::new();
        insert_quad(&mut curves, 1.0, 0.0, 9.0, 5.0, 1.0, 10.0);
        insert_quad(&mut curves, 1.0, 10.0, 9.0, 5.0, 1.0, 0.0);
        let mut yrange = [0.0, 10.0];
        assert_eq!(curves[0].compare_to(&curves[1], &mut yrange), Ordering::Equal);
        assert_eq!(yrange[1], 10.0);
    }

    #[test]
    fn test_segment_follows_path_direction() {
        let mut curves = Vec::new();
        insert_quad(&mut curves, 0.0, 10.0, 5.0, 5.0, 10.0, 0.0);
        let seg = curves[0].to_segment().unwrap();
        assert_eq!(seg, Segment::quad(0.0, 10.0, 5.0, 5.0, 10.0, 0.0));
        assert_eq!(
            curves[0].path_command(),
            PathCommand::QuadTo {
                cx: 5.0,
                cy: 5.0,
                x: 10.0,
                y: 0.0
            }
        );
    }

    #[test]
    fn test_scaled_rejects_flattened_curve() {
        let mut curves = Vec::new();
        insert_line(&mut curves, 0.0, 0.0, 1.0, 1.0);
        assert!(curves[0].scaled(1.0, 0.0, 0.0, 0.0).is_none());
        let c = curves[0].scaled(2.0, 1.0, 3.0, 0.0).unwrap();
        assert_eq!(c.x_bot(), 3.0);
        assert_eq!(c.y_bot(), 3.0);
    }
}
