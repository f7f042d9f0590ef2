//! 曲线相交测试
//!
//! 对 {直线, 二次, 三次} 的每种组合判断两段曲线是否相交：
//! - 控制点完全相同时直接判定相交（共边）
//! - 用凸包多边形做粗筛，多边形互不相交且互不包含时直接返回 false
//! - 直线与曲线：把曲线旋转到直线坐标系，解 y = 常数 的多项式方程
//! - 曲线与曲线：按导数零点把参数域切成单调区间，再逐对二分搜索，
//!   弦包围盒小于 `TOLERANCE` 仍可能重叠即视为相交
//!
//! 宁可误报也不漏报。

pub mod pool;

use crate::segment::Segment;
use pool::{Scratch, ScratchPool};
use std::cmp::Ordering;

/// 二分搜索终止的绝对容差
pub const TOLERANCE: f64 = 1e-10;

/// 直线与曲线共线判定的相对容差
const COLLINEAR_TOLERANCE: f64 = 1e-9;

/// 全局缓冲池
static SCRATCH: ScratchPool = ScratchPool::new(32);

/// 任意两段曲线是否相交；结果与参数顺序无关
pub fn intersects(a: &Segment, b: &Segment) -> bool {
    // 同阶曲线按坐标排序，保证对称
    let (a, b) = if a.order() == b.order() && compare_coords(a, b) == Ordering::Greater {
        (b, a)
    } else {
        (a, b)
    };
    match (*a, *b) {
        (Segment::Line { x0, y0, x1, y1 }, Segment::Line { .. }) => {
            line_line([x0, y0, x1, y1], line_coords(b))
        }
        (Segment::Line { x0, y0, x1, y1 }, Segment::Quad { .. }) => {
            line_quad([x0, y0, x1, y1], quad_coords(b))
        }
        (Segment::Quad { .. }, Segment::Line { x0, y0, x1, y1 }) => {
            line_quad([x0, y0, x1, y1], quad_coords(a))
        }
        (Segment::Line { x0, y0, x1, y1 }, Segment::Cubic { .. }) => {
            line_cubic([x0, y0, x1, y1], cubic_coords(b))
        }
        (Segment::Cubic { .. }, Segment::Line { x0, y0, x1, y1 }) => {
            line_cubic([x0, y0, x1, y1], cubic_coords(a))
        }
        (Segment::Quad { .. }, Segment::Quad { .. }) => quad_quad(quad_coords(a), quad_coords(b)),
        (Segment::Quad { .. }, Segment::Cubic { .. }) => quad_cubic(quad_coords(a), cubic_coords(b)),
        (Segment::Cubic { .. }, Segment::Quad { .. }) => quad_cubic(quad_coords(b), cubic_coords(a)),
        (Segment::Cubic { .. }, Segment::Cubic { .. }) => {
            cubic_cubic(cubic_coords(a), cubic_coords(b))
        }
    }
}

fn compare_coords(a: &Segment, b: &Segment) -> Ordering {
    let (ca, cb) = (a.coords(), b.coords());
    ca.iter()
        .zip(cb.iter())
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

fn line_coords(s: &Segment) -> [f64; 4] {
    let c = s.coords();
    [c[0], c[1], c[2], c[3]]
}

fn quad_coords(s: &Segment) -> [f64; 6] {
    let c = s.coords();
    [c[0], c[1], c[2], c[3], c[4], c[5]]
}

fn cubic_coords(s: &Segment) -> [f64; 8] {
    let c = s.coords();
    [c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]
}

/// 点 p 相对有向线段 (x1,y1)->(x2,y2) 的位置：-1 / 0 / 1
pub fn relative_ccw(x1: f64, y1: f64, x2: f64, y2: f64, px: f64, py: f64) -> i32 {
    let (x2, y2) = (x2 - x1, y2 - y1);
    let (mut px, mut py) = (px - x1, py - y1);
    let mut ccw = px * y2 - py * x2;
    if ccw == 0.0 {
        ccw = px * x2 + py * y2;
        if ccw > 0.0 {
            px -= x2;
            py -= y2;
            ccw = px * x2 + py * y2;
            if ccw < 0.0 {
                ccw = 0.0;
            }
        }
    }
    if ccw < 0.0 {
        -1
    } else if ccw > 0.0 {
        1
    } else {
        0
    }
}

/// 两条线段是否相交（端点接触也算）
#[allow(clippy::too_many_arguments)]
pub fn lines_intersect(x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64, x4: f64, y4: f64) -> bool {
    relative_ccw(x1, y1, x2, y2, x3, y3) * relative_ccw(x1, y1, x2, y2, x4, y4) <= 0
        && relative_ccw(x3, y3, x4, y4, x1, y1) * relative_ccw(x3, y3, x4, y4, x2, y2) <= 0
}

pub fn line_line(a: [f64; 4], b: [f64; 4]) -> bool {
    if a == b {
        return true;
    }
    lines_intersect(a[0], a[1], a[2], a[3], b[0], b[1], b[2], b[3])
}

/// 旋转到以直线方向为 x 轴的坐标系
fn rotate_into_line(line: [f64; 4], pts: &mut [f64]) -> (f64, f64, f64) {
    let theta = -(line[3] - line[1]).atan2(line[2] - line[0]);
    let (sin, cos) = theta.sin_cos();
    let rot = |x: f64, y: f64| (cos * x - sin * y, sin * x + cos * y);
    for p in pts.chunks_exact_mut(2) {
        let (x, y) = rot(p[0], p[1]);
        p[0] = x;
        p[1] = y;
    }
    let (ax, ay) = rot(line[0], line[1]);
    let (bx, _) = rot(line[2], line[3]);
    (ax.min(bx), ax.max(bx), ay)
}

/// 曲线整体落在直线上时，比较 x 区间
fn collinear_overlap(xs: &[f64], min_x: f64, max_x: f64) -> bool {
    let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    lo <= max_x && hi >= min_x
}

fn coordinate_scale(pts: &[f64]) -> f64 {
    pts.iter().fold(1.0_f64, |m, v| m.max(v.abs()))
}

pub fn line_quad(line: [f64; 4], quad: [f64; 6]) -> bool {
    let mut buf = SCRATCH.checkout();
    let size = define_quad_polygon(&mut buf[..], quad);
    if !line_polygon(line, &buf[..], size) {
        return false;
    }

    buf[..6].copy_from_slice(&quad);
    let (min_x, max_x, line_y) = rotate_into_line(line, &mut buf[..6]);
    let [x0, y0, cx, cy, x1, y1] = [buf[0], buf[1], buf[2], buf[3], buf[4], buf[5]];

    let ax = x0 - 2.0 * cx + x1;
    let bx = -2.0 * x0 + 2.0 * cx;
    let ay = y0 - 2.0 * cy + y1;
    let by = -2.0 * y0 + 2.0 * cy;
    let c = y0 - line_y;

    let tol = COLLINEAR_TOLERANCE * coordinate_scale(&buf[..6]);
    if ay.abs() <= tol && by.abs() <= tol && c.abs() <= tol {
        return collinear_overlap(&[x0, cx, x1], min_x, max_x);
    }

    crate::roots::solve_quadratic(ay, by, c)
        .into_iter()
        .filter(|t| (0.0..=1.0).contains(t))
        .any(|t| {
            let x = (ax * t + bx) * t + x0;
            min_x <= x && x <= max_x
        })
}

pub fn line_cubic(line: [f64; 4], cubic: [f64; 8]) -> bool {
    let mut buf = SCRATCH.checkout();
    let size = define_cubic_polygon(&mut buf[..], cubic);
    if !line_polygon(line, &buf[..], size) {
        return false;
    }

    buf[..8].copy_from_slice(&cubic);
    let (min_x, max_x, line_y) = rotate_into_line(line, &mut buf[..8]);
    let [x0, y0, cx0, cy0, cx1, cy1, x1, y1] =
        [buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7]];

    let (ax, bx, cx, dx) = cubic_poly(x0, cx0, cx1, x1);
    let (ay, by, cy, dy) = cubic_poly(y0, cy0, cy1, y1);
    let d = dy - line_y;

    let tol = COLLINEAR_TOLERANCE * coordinate_scale(&buf[..8]);
    if ay.abs() <= tol && by.abs() <= tol && cy.abs() <= tol && d.abs() <= tol {
        return collinear_overlap(&[x0, cx0, cx1, x1], min_x, max_x);
    }

    crate::roots::solve_cubic(ay, by, cy, d)
        .into_iter()
        .filter(|t| (0.0..=1.0).contains(t))
        .any(|t| {
            let x = ((ax * t + bx) * t + cx) * t + dx;
            min_x <= x && x <= max_x
        })
}

/// 三次贝塞尔的幂基系数 (t³, t², t, 1)
fn cubic_poly(p0: f64, p1: f64, p2: f64, p3: f64) -> (f64, f64, f64, f64) {
    (
        -p0 + 3.0 * p1 - 3.0 * p2 + p3,
        3.0 * p0 - 6.0 * p1 + 3.0 * p2,
        -3.0 * p0 + 3.0 * p1,
        p0,
    )
}

/// 二次贝塞尔的幂基系数，按三次形式补零
fn quad_poly(p0: f64, p1: f64, p2: f64) -> (f64, f64, f64, f64) {
    (0.0, p0 - 2.0 * p1 + p2, -2.0 * p0 + 2.0 * p1, p0)
}

/// 参数曲线 x(t), y(t)，系数按降幂排列
#[derive(Debug, Clone, Copy)]
struct Parametric {
    x: [f64; 4],
    y: [f64; 4],
}

impl Parametric {
    fn quad(c: [f64; 6]) -> Self {
        let (ax, bx, cx, dx) = quad_poly(c[0], c[2], c[4]);
        let (ay, by, cy, dy) = quad_poly(c[1], c[3], c[5]);
        Self {
            x: [ax, bx, cx, dx],
            y: [ay, by, cy, dy],
        }
    }

    fn cubic(c: [f64; 8]) -> Self {
        let (ax, bx, cx, dx) = cubic_poly(c[0], c[2], c[4], c[6]);
        let (ay, by, cy, dy) = cubic_poly(c[1], c[3], c[5], c[7]);
        Self {
            x: [ax, bx, cx, dx],
            y: [ay, by, cy, dy],
        }
    }

    fn at(&self, t: f64) -> (f64, f64) {
        let [ax, bx, cx, dx] = self.x;
        let [ay, by, cy, dy] = self.y;
        (
            ((ax * t + bx) * t + cx) * t + dx,
            ((ay * t + by) * t + cy) * t + dy,
        )
    }

    /// 把 [0,1] 切分为 x、y 均单调的区间端点，写入 `dest`，返回数量
    fn critical_times(&self, dest: &mut [f64]) -> usize {
        dest[0] = 0.0;
        dest[1] = 1.0;
        let mut size = 2;
        for [a, b, c, _] in [self.x, self.y] {
            let roots: arrayvec::ArrayVec<f64, 2> = if a == 0.0 {
                // 二次：导数 2b·t + c
                let mut r = arrayvec::ArrayVec::new();
                r.push(-c / (2.0 * b));
                r
            } else {
                crate::roots::solve_quadratic(3.0 * a, 2.0 * b, c)
            };
            for t in roots {
                if t > 0.0 && t < 1.0 && !dest[..size].contains(&t) {
                    dest[size] = t;
                    size += 1;
                }
            }
        }
        dest[..size].sort_by(f64::total_cmp);
        size
    }
}

/// 两条弦的包围盒是否重叠（闭区间）
fn chord_boxes_overlap(a0: (f64, f64), a1: (f64, f64), b0: (f64, f64), b1: (f64, f64)) -> bool {
    let (min_xa, max_xa) = (a0.0.min(a1.0), a0.0.max(a1.0));
    let (min_ya, max_ya) = (a0.1.min(a1.1), a0.1.max(a1.1));
    let (min_xb, max_xb) = (b0.0.min(b1.0), b0.0.max(b1.0));
    let (min_yb, max_yb) = (b0.1.min(b1.1), b0.1.max(b1.1));
    max_xa >= min_xb && max_ya >= min_yb && min_xa <= max_xb && min_ya <= max_yb
}

fn chord_splittable(start: (f64, f64), end: (f64, f64)) -> bool {
    (start.0 - end.0).abs() > TOLERANCE || (start.1 - end.1).abs() > TOLERANCE
}

/// 在两个单调参数区间内二分搜索可能的交点
///
/// 只有一个象限重叠时原地收缩，否则递归探索所有重叠象限。
fn binary_search(c0: &Parametric, mut t0: (f64, f64), c1: &Parametric, mut t1: (f64, f64)) -> bool {
    let (mut s0, mut e0) = (c0.at(t0.0), c0.at(t0.1));
    let (mut s1, mut e1) = (c1.at(t1.0), c1.at(t1.1));

    if !chord_boxes_overlap(s0, e0, s1, e1) {
        return false;
    }

    loop {
        let split0 = chord_splittable(s0, e0);
        let split1 = chord_splittable(s1, e1);

        match (split0, split1) {
            (false, false) => return true,
            (true, true) => {
                let m0t = (t0.0 + t0.1) / 2.0;
                let m1t = (t1.0 + t1.1) / 2.0;
                let (m0, m1) = (c0.at(m0t), c1.at(m1t));
                let q1 = chord_boxes_overlap(s0, m0, s1, m1);
                let q2 = chord_boxes_overlap(m0, e0, s1, m1);
                let q3 = chord_boxes_overlap(s0, m0, m1, e1);
                let q4 = chord_boxes_overlap(m0, e0, m1, e1);
                match (q1, q2, q3, q4) {
                    (true, false, false, false) => {
                        (t0.1, e0, t1.1, e1) = (m0t, m0, m1t, m1);
                    }
                    (false, true, false, false) => {
                        (t0.0, s0, t1.1, e1) = (m0t, m0, m1t, m1);
                    }
                    (false, false, true, false) => {
                        (t0.1, e0, t1.0, s1) = (m0t, m0, m1t, m1);
                    }
                    (false, false, false, true) => {
                        (t0.0, s0, t1.0, s1) = (m0t, m0, m1t, m1);
                    }
                    _ => {
                        return (q1 && binary_search(c0, (t0.0, m0t), c1, (t1.0, m1t)))
                            || (q2 && binary_search(c0, (m0t, t0.1), c1, (t1.0, m1t)))
                            || (q3 && binary_search(c0, (t0.0, m0t), c1, (m1t, t1.1)))
                            || (q4 && binary_search(c0, (m0t, t0.1), c1, (m1t, t1.1)));
                    }
                }
            }
            (true, false) => {
                let m0t = (t0.0 + t0.1) / 2.0;
                let m0 = c0.at(m0t);
                let q1 = chord_boxes_overlap(s0, m0, s1, e1);
                let q2 = chord_boxes_overlap(m0, e0, s1, e1);
                match (q1, q2) {
                    (true, false) => (t0.1, e0) = (m0t, m0),
                    (false, true) => (t0.0, s0) = (m0t, m0),
                    _ => {
                        return (q1 && binary_search(c0, (t0.0, m0t), c1, t1))
                            || (q2 && binary_search(c0, (m0t, t0.1), c1, t1));
                    }
                }
            }
            (false, true) => {
                let m1t = (t1.0 + t1.1) / 2.0;
                let m1 = c1.at(m1t);
                let q1 = chord_boxes_overlap(s0, e0, s1, m1);
                let q2 = chord_boxes_overlap(s0, e0, m1, e1);
                match (q1, q2) {
                    (true, false) => (t1.1, e1) = (m1t, m1),
                    (false, true) => (t1.0, s1) = (m1t, m1),
                    _ => {
                        return (q1 && binary_search(c0, t0, c1, (t1.0, m1t)))
                            || (q2 && binary_search(c0, t0, c1, (m1t, t1.1)));
                    }
                }
            }
        }
    }
}

/// 单调区间两两组合做二分搜索
fn curve_curve(c0: &Parametric, c1: &Parametric, buf0: &mut Scratch, buf1: &mut Scratch) -> bool {
    let n0 = c0.critical_times(&mut buf0[..]);
    let n1 = c1.critical_times(&mut buf1[..]);
    for i in 0..n0 - 1 {
        for j in 0..n1 - 1 {
            if binary_search(c0, (buf0[i], buf0[i + 1]), c1, (buf1[j], buf1[j + 1])) {
                return true;
            }
        }
    }
    false
}

pub fn quad_quad(a: [f64; 6], b: [f64; 6]) -> bool {
    if a == b {
        return true;
    }
    let mut buf0 = SCRATCH.checkout();
    let mut buf1 = SCRATCH.checkout();
    let n0 = define_quad_polygon(&mut buf0[..], a);
    let n1 = define_quad_polygon(&mut buf1[..], b);
    if !polygon_polygon(&buf0[..], n0, &buf1[..], n1) {
        return false;
    }
    curve_curve(&Parametric::quad(a), &Parametric::quad(b), &mut buf0, &mut buf1)
}

pub fn quad_cubic(a: [f64; 6], b: [f64; 8]) -> bool {
    let mut buf0 = SCRATCH.checkout();
    let mut buf1 = SCRATCH.checkout();
    let n0 = define_quad_polygon(&mut buf0[..], a);
    let n1 = define_cubic_polygon(&mut buf1[..], b);
    if !polygon_polygon(&buf0[..], n0, &buf1[..], n1) {
        return false;
    }
    curve_curve(&Parametric::quad(a), &Parametric::cubic(b), &mut buf0, &mut buf1)
}

pub fn cubic_cubic(a: [f64; 8], b: [f64; 8]) -> bool {
    if a == b {
        return true;
    }
    let mut buf0 = SCRATCH.checkout();
    let mut buf1 = SCRATCH.checkout();
    let n0 = define_cubic_polygon(&mut buf0[..], a);
    let n1 = define_cubic_polygon(&mut buf1[..], b);
    if !polygon_polygon(&buf0[..], n0, &buf1[..], n1) {
        return false;
    }
    curve_curve(&Parametric::cubic(a), &Parametric::cubic(b), &mut buf0, &mut buf1)
}

/// 二次曲线的凸包：三个控制点构成的三角形
pub fn define_quad_polygon(dest: &mut [f64], quad: [f64; 6]) -> usize {
    dest[..6].copy_from_slice(&quad);
    3
}

/// 三次曲线的凸包：某点落在其余三点三角形内时取三角形，否则取凸四边形
pub fn define_cubic_polygon(dest: &mut [f64], cubic: [f64; 8]) -> usize {
    let [x0, y0, cx0, cy0, cx1, cy1, x1, y1] = cubic;
    let candidates = [
        ([x0, y0, cx1, cy1, x1, y1], (cx0, cy0)),
        ([x0, y0, cx0, cy0, x1, y1], (cx1, cy1)),
        ([x0, y0, cx0, cy0, cx1, cy1], (x1, y1)),
        ([x1, y1, cx0, cy0, cx1, cy1], (x0, y0)),
    ];
    for (triangle, (px, py)) in candidates {
        if polygon_contains(px, py, &triangle, 3) {
            dest[..6].copy_from_slice(&triangle);
            return 3;
        }
    }

    let quad = if relative_ccw(x0, y0, x1, y1, cx0, cy0) == relative_ccw(x0, y0, x1, y1, cx1, cy1) {
        if lines_intersect(x0, y0, cx0, cy0, cx1, cy1, x1, y1) {
            [x0, y0, cx1, cy1, cx0, cy0, x1, y1]
        } else {
            [x0, y0, cx0, cy0, cx1, cy1, x1, y1]
        }
    } else {
        [x0, y0, cx0, cy0, x1, y1, cx1, cy1]
    };
    dest[..8].copy_from_slice(&quad);
    4
}

/// 线段与多边形是否相交（含线段完全位于多边形内部）
pub fn line_polygon(line: [f64; 4], coords: &[f64], count: usize) -> bool {
    let [x0, y0, x1, y1] = line;
    let hit = (0..count).any(|a| {
        let b = (a + 1) % count;
        lines_intersect(
            x0,
            y0,
            x1,
            y1,
            coords[a * 2],
            coords[a * 2 + 1],
            coords[b * 2],
            coords[b * 2 + 1],
        )
    });
    hit || polygon_contains(x0, y0, coords, count)
}

/// 两个多边形是否相交或包含
pub fn polygon_polygon(coords1: &[f64], count1: usize, coords2: &[f64], count2: usize) -> bool {
    for a in 0..count1 {
        let a2 = (a + 1) % count1;
        for b in 0..count2 {
            let b2 = (b + 1) % count2;
            if lines_intersect(
                coords1[a * 2],
                coords1[a * 2 + 1],
                coords1[a2 * 2],
                coords1[a2 * 2 + 1],
                coords2[b * 2],
                coords2[b * 2 + 1],
                coords2[b2 * 2],
                coords2[b2 * 2 + 1],
            ) {
                return true;
            }
        }
    }

    // 边不相交时，由较宽的多边形判断是否包含另一个
    let width = |coords: &[f64], count: usize| {
        let xs = (0..count).map(|i| coords[2 * i]);
        let (lo, hi) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
        hi - lo
    };
    let (w1, w2) = (width(coords1, count1), width(coords2, count2));
    if w1 > w2 {
        polygon_contains(coords2[0], coords2[1], coords1, count1)
    } else if w2 > w1 {
        polygon_contains(coords1[0], coords1[1], coords2, count2)
    } else {
        polygon_contains(coords1[0], coords1[1], coords2, count2)
            || polygon_contains(coords2[0], coords2[1], coords1, count1)
    }
}

/// 奇偶规则的点在多边形内测试
pub fn polygon_contains(x: f64, y: f64, coords: &[f64], count: usize) -> bool {
    if count == 0 {
        return false;
    }
    let mut hits = 0;
    for i in 0..count {
        let j = if i == 0 { count - 1 } else { i - 1 };
        let (curx, cury) = (coords[2 * i], coords[2 * i + 1]);
        let (lastx, lasty) = (coords[2 * j], coords[2 * j + 1]);

        if cury == lasty {
            continue;
        }
        let leftx = if curx < lastx {
            if x >= lastx {
                continue;
            }
            curx
        } else {
            if x >= curx {
                continue;
            }
            lastx
        };

        let (test1, test2) = if cury < lasty {
            if y < cury || y >= lasty {
                continue;
            }
            if x < leftx {
                hits += 1;
                continue;
            }
            (x - curx, y - cury)
        } else {
            if y < lasty || y >= cury {
                continue;
            }
            if x < leftx {
                hits += 1;
                continue;
            }
            (x - lastx, y - lasty)
        };

        if test1 < test2 / (lasty - cury) * (lastx - curx) {
            hits += 1;
        }
    }
    hits & 1 != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_pairs_symmetric(segments: &[Segment]) {
        for a in segments {
            for b in segments {
                assert_eq!(intersects(a, b), intersects(b, a), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_line_line() {
        assert!(line_line([0.0, 0.0, 10.0, 10.0], [0.0, 10.0, 10.0, 0.0]));
        assert!(!line_line([0.0, 0.0, 10.0, 0.0], [0.0, 1.0, 10.0, 1.0]));
        // 端点接触
        assert!(line_line([0.0, 0.0, 5.0, 0.0], [5.0, 0.0, 5.0, 5.0]));
        // 完全相同
        assert!(line_line([1.0, 2.0, 3.0, 4.0], [1.0, 2.0, 3.0, 4.0]));
    }

    #[test]
    fn test_line_quad() {
        let arch = [0.0, 0.0, 5.0, 10.0, 10.0, 0.0];
        assert!(line_quad([0.0, 2.0, 10.0, 2.0], arch));
        assert!(!line_quad([0.0, 6.0, 10.0, 6.0], arch));
        // 控制三角形相交但曲线不相交
        assert!(!line_quad([4.0, 5.5, 6.0, 5.5], arch));
    }

    #[test]
    fn test_line_quad_degenerate_control_point() {
        // 控制点与端点共线，曲线退化为直线
        let quad = [0.0, 0.0, 5.0, 5.0, 10.0, 10.0];
        assert!(line_quad([0.0, 10.0, 10.0, 0.0], quad));
        assert!(line_quad([2.0, 2.0, 8.0, 8.0], quad));
        assert!(!line_quad([20.0, 20.0, 30.0, 30.0], quad));
        assert!(!line_quad([0.0, 1.0, 1.0, 2.0], quad));
    }

    #[test]
    fn test_line_cubic() {
        let s = [0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0, 0.0];
        assert!(line_cubic([-1.0, 5.0, 11.0, 5.0], s));
        assert!(!line_cubic([-1.0, 8.0, 11.0, 8.0], s));
        assert!(line_cubic([5.0, -1.0, 5.0, 20.0], s));
    }

    #[test]
    fn test_quad_quad() {
        let a = [0.0, 0.0, 5.0, 10.0, 10.0, 0.0];
        let b = [0.0, 5.0, 5.0, -5.0, 10.0, 5.0];
        assert!(quad_quad(a, b));
        let far = [20.0, 0.0, 25.0, 10.0, 30.0, 0.0];
        assert!(!quad_quad(a, far));
        assert!(quad_quad(a, a));
    }

    #[test]
    fn test_quad_cubic() {
        let q = [0.0, 0.0, 5.0, 10.0, 10.0, 0.0];
        let c = [0.0, 4.0, 3.0, 4.0, 7.0, 4.0, 10.0, 4.0];
        assert!(quad_cubic(q, c));
        let c_above = [0.0, 8.0, 3.0, 8.0, 7.0, 8.0, 10.0, 8.0];
        assert!(!quad_cubic(q, c_above));
    }

    #[test]
    fn test_cubic_cubic() {
        let a = [0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0, 0.0];
        let b = [0.0, 10.0, 0.0, 0.0, 10.0, 0.0, 10.0, 10.0];
        assert!(cubic_cubic(a, b));
        let inner = [2.0, 3.0, 2.0, 4.0, 8.0, 4.0, 8.0, 3.0];
        // 粗筛会通过（多边形包含），但曲线不相交
        assert!(!cubic_cubic(a, inner));
    }

    #[test]
    fn test_polygon_contains() {
        let square = [0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0];
        assert!(polygon_contains(5.0, 5.0, &square, 4));
        assert!(!polygon_contains(15.0, 5.0, &square, 4));
    }

    #[test]
    fn test_polygon_containment_counts_as_hit() {
        let big = [0.0, 0.0, 100.0, 0.0, 50.0, 100.0];
        let small = [40.0, 10.0, 50.0, 20.0, 60.0, 10.0];
        assert!(polygon_polygon(&big, 3, &small, 3));
        assert!(polygon_polygon(&small, 3, &big, 3));
    }

    #[test]
    fn test_symmetry() {
        let segments = [
            Segment::line(0.0, 0.0, 10.0, 10.0),
            Segment::line(0.0, 5.0, 10.0, 5.0),
            Segment::quad(0.0, 0.0, 5.0, 10.0, 10.0, 0.0),
            Segment::quad(0.0, 5.0, 5.0, -5.0, 10.0, 5.0),
            Segment::quad(0.0, 0.0, 5.0, 5.0, 10.0, 10.0),
            Segment::cubic(0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0, 0.0),
            Segment::cubic(2.0, 3.0, 2.0, 4.0, 8.0, 4.0, 8.0, 3.0),
            Segment::cubic(20.0, 0.0, 25.0, 5.0, 30.0, 5.0, 35.0, 0.0),
        ];
        all_pairs_symmetric(&segments);
    }
}
