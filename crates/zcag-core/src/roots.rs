//! 低阶多项式求根
//!
//! 系数按降幂排列。首项系数相对其他系数接近零时退化为低一阶的方程，
//! 常数方程返回空结果。

use arrayvec::ArrayVec;

/// 首项系数相对阈值
const DEGENERATE_RATIO: f64 = 1e-12;

/// 求解 a·t² + b·t + c = 0 的实根
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> ArrayVec<f64, 2> {
    let mut roots = ArrayVec::new();
    if a == 0.0 || a.abs() <= DEGENERATE_RATIO * (b.abs() + c.abs()) {
        if b != 0.0 {
            roots.push(-c / b);
        }
        return roots;
    }
    let mut d = b * b - 4.0 * a * c;
    if d < 0.0 {
        return roots;
    }
    d = d.sqrt();
    if b < 0.0 {
        d = -d;
    }
    let q = (b + d) / -2.0;
    roots.push(q / a);
    if q != 0.0 {
        roots.push(c / q);
    }
    roots
}

/// 求解 a·t³ + b·t² + c·t + d = 0 的实根
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> ArrayVec<f64, 3> {
    let mut roots = ArrayVec::new();
    if a == 0.0 || a.abs() <= DEGENERATE_RATIO * (b.abs() + c.abs() + d.abs()) {
        roots.extend(solve_quadratic(b, c, d));
        return roots;
    }
    let (p, q, r) = (b / a, c / a, d / a);
    let qq = (p * p - 3.0 * q) / 9.0;
    let mut rr = (2.0 * p * p * p - 9.0 * p * q + 27.0 * r) / 54.0;
    let r2 = rr * rr;
    let q3 = qq * qq * qq;
    let shift = p / 3.0;
    if r2 < q3 {
        let theta = (rr / q3.sqrt()).clamp(-1.0, 1.0).acos();
        let m = -2.0 * qq.sqrt();
        let tau = std::f64::consts::PI * 2.0;
        roots.push(m * (theta / 3.0).cos() - shift);
        roots.push(m * ((theta + tau) / 3.0).cos() - shift);
        roots.push(m * ((theta - tau) / 3.0).cos() - shift);
    } else {
        let neg = rr < 0.0;
        let s = (r2 - q3).sqrt();
        if neg {
            rr = -rr;
        }
        let mut big_a = (rr + s).cbrt();
        if !neg {
            big_a = -big_a;
        }
        let big_b = if big_a == 0.0 { 0.0 } else { qq / big_a };
        roots.push(big_a + big_b - shift);
    }
    for root in roots.iter_mut() {
        *root = polish(a, b, c, d, *root);
    }
    roots
}

/// 牛顿迭代修正根
fn polish(a: f64, b: f64, c: f64, d: f64, mut t: f64) -> f64 {
    for _ in 0..3 {
        let f = ((a * t + b) * t + c) * t + d;
        let df = (3.0 * a * t + 2.0 * b) * t + c;
        if df == 0.0 || !f.is_finite() {
            break;
        }
        let next = t - f / df;
        if !next.is_finite() {
            break;
        }
        t = next;
    }
    t
}
