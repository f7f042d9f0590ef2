//! 扫描线穿越计数
//!
//! 点包含：统计从点向右的射线穿过的曲线数。
//! 矩形包含 / 相交：记录穿过矩形左边界的曲线所覆盖的 y 区间，
//! 任何曲线进入矩形内部时立即返回 `None`。

use crate::curve::{curves_from_commands, Curve, Direction};
use crate::path::{PathSource, WindingRule};
use crate::transform::Transform2D;

/// 非零规则下的一段 y 区间及其环绕数
#[derive(Debug, Clone, Copy, PartialEq)]
struct WindingSpan {
    lo: f64,
    hi: f64,
    count: i32,
}

#[derive(Debug, Clone, PartialEq)]
enum Tally {
    /// 成对存放的 [lo, hi) 区间，按 y 升序
    EvenOdd(Vec<f64>),
    NonZero(Vec<WindingSpan>),
}

/// 矩形左边界上的穿越记录
#[derive(Debug, Clone, PartialEq)]
pub struct Crossings {
    xlo: f64,
    ylo: f64,
    xhi: f64,
    yhi: f64,
    tally: Tally,
}

impl Crossings {
    pub fn new(rule: WindingRule, xlo: f64, ylo: f64, xhi: f64, yhi: f64) -> Self {
        let tally = match rule {
            WindingRule::EvenOdd => Tally::EvenOdd(Vec::new()),
            WindingRule::NonZero => Tally::NonZero(Vec::new()),
        };
        Self {
            xlo,
            ylo,
            xhi,
            yhi,
            tally,
        }
    }

    pub fn xlo(&self) -> f64 {
        self.xlo
    }

    pub fn ylo(&self) -> f64 {
        self.ylo
    }

    pub fn xhi(&self) -> f64 {
        self.xhi
    }

    pub fn yhi(&self) -> f64 {
        self.yhi
    }

    /// 没有任何曲线穿过左边界
    pub fn is_empty(&self) -> bool {
        match &self.tally {
            Tally::EvenOdd(ranges) => ranges.is_empty(),
            Tally::NonZero(spans) => spans.is_empty(),
        }
    }

    /// [ystart, yend] 整段都在形状内部
    pub fn covers(&self, ystart: f64, yend: f64) -> bool {
        match &self.tally {
            Tally::EvenOdd(ranges) => ranges.len() == 2 && ranges[0] <= ystart && ranges[1] >= yend,
            Tally::NonZero(spans) => {
                let mut ystart = ystart;
                for span in spans {
                    if ystart >= span.hi {
                        continue;
                    }
                    if ystart < span.lo {
                        return false;
                    }
                    if yend <= span.hi {
                        return true;
                    }
                    ystart = span.hi;
                }
                ystart >= yend
            }
        }
    }

    /// 记录一条曲线在 [ystart, yend) 上穿过左边界
    pub fn record(&mut self, ystart: f64, yend: f64, direction: Direction) {
        if ystart >= yend {
            return;
        }
        match &mut self.tally {
            Tally::EvenOdd(ranges) => *ranges = toggle_range(ranges, ystart, yend),
            Tally::NonZero(spans) => *spans = add_winding(spans, ystart, yend, direction.sign()),
        }
    }
}

/// 奇偶规则：新区间与已有区间做对称差
fn toggle_range(ranges: &[f64], mut ystart: f64, mut yend: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(ranges.len() + 2);
    let mut from = 0;
    while from < ranges.len() && ystart > ranges[from + 1] {
        out.extend_from_slice(&ranges[from..from + 2]);
        from += 2;
    }
    while from < ranges.len() {
        let yrlo = ranges[from];
        let yrhi = ranges[from + 1];
        from += 2;
        if yend < yrlo {
            out.push(ystart);
            out.push(yend);
            ystart = yrlo;
            yend = yrhi;
            continue;
        }
        let (yll, mut ylh) = if ystart < yrlo { (ystart, yrlo) } else { (yrlo, ystart) };
        let (mut yhl, yhh) = if yend < yrhi { (yend, yrhi) } else { (yrhi, yend) };
        if ylh == yhl {
            ystart = yll;
            yend = yhh;
        } else {
            if ylh > yhl {
                std::mem::swap(&mut ylh, &mut yhl);
            }
            if yll != ylh {
                out.push(yll);
                out.push(ylh);
            }
            ystart = yhl;
            yend = yhh;
        }
        if ystart >= yend {
            break;
        }
    }
    out.extend_from_slice(&ranges[from..]);
    if ystart < yend {
        out.push(ystart);
        out.push(yend);
    }
    out
}

/// 非零规则：在 [ystart, yend) 上累加方向，丢弃环绕数为零的区间
fn add_winding(spans: &[WindingSpan], ystart: f64, yend: f64, delta: i32) -> Vec<WindingSpan> {
    let mut cuts: Vec<f64> = spans
        .iter()
        .flat_map(|s| [s.lo, s.hi])
        .chain([ystart, yend])
        .collect();
    cuts.sort_by(f64::total_cmp);
    cuts.dedup();

    let mut out: Vec<WindingSpan> = Vec::with_capacity(spans.len() + 2);
    let mut idx = 0;
    for w in cuts.windows(2) {
        let (a, b) = (w[0], w[1]);
        while idx < spans.len() && spans[idx].hi <= a {
            idx += 1;
        }
        let mut count = match spans.get(idx) {
            Some(span) if span.lo <= a => span.count,
            _ => 0,
        };
        if a >= ystart && b <= yend {
            count += delta;
        }
        if count == 0 {
            continue;
        }
        if let Some(last) = out.last_mut() {
            if last.hi == a && last.count == count {
                last.hi = b;
                continue;
            }
        }
        out.push(WindingSpan { lo: a, hi: b, count });
    }
    out
}

/// 统计矩形左边界上的穿越
///
/// 返回 `None` 表示有边界穿入矩形内部，矩形必然与形状边界相交。
pub fn find_crossings(curves: &[Curve], xlo: f64, ylo: f64, xhi: f64, yhi: f64) -> Option<Crossings> {
    find_crossings_with_rule(curves, WindingRule::EvenOdd, xlo, ylo, xhi, yhi)
}

pub fn find_crossings_with_rule(
    curves: &[Curve],
    rule: WindingRule,
    xlo: f64,
    ylo: f64,
    xhi: f64,
    yhi: f64,
) -> Option<Crossings> {
    let mut cross = Crossings::new(rule, xlo, ylo, xhi, yhi);
    for curve in curves {
        if curve.accumulate_crossings(&mut cross) {
            return None;
        }
    }
    Some(cross)
}

/// 从 (x, y) 向右的射线穿过的曲线数
pub fn crossing_count(curves: &[Curve], x: f64, y: f64) -> i32 {
    curves.iter().map(|c| c.crossings_for(x, y)).sum()
}

/// 带方向的穿越数之和
pub fn winding_number(curves: &[Curve], x: f64, y: f64) -> i32 {
    curves
        .iter()
        .map(|c| c.crossings_for(x, y) * c.direction().sign())
        .sum()
}

/// 任意边界源的点包含测试，遵循源自身的环绕规则
pub fn path_contains(source: &dyn PathSource, transform: Option<&Transform2D>, x: f64, y: f64) -> bool {
    let curves = curves_from_commands(source.path_iter(transform));
    match source.winding_rule() {
        WindingRule::EvenOdd => crossing_count(&curves, x, y) & 1 == 1,
        WindingRule::NonZero => winding_number(&curves, x, y) != 0,
    }
}

/// 任意边界源的矩形包含测试，遵循源自身的环绕规则
pub fn path_contains_rect(
    source: &dyn PathSource,
    transform: Option<&Transform2D>,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
) -> bool {
    if w < 0.0 || h < 0.0 {
        return false;
    }
    let curves = curves_from_commands(source.path_iter(transform));
    find_crossings_with_rule(&curves, source.winding_rule(), x, y, x + w, y + h)
        .is_some_and(|c| c.covers(y, y + h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path;

    fn ranges(c: &Crossings) -> Vec<f64> {
        match &c.tally {
            Tally::EvenOdd(r) => r.clone(),
            Tally::NonZero(s) => s.iter().flat_map(|s| [s.lo, s.hi]).collect(),
        }
    }

    #[test]
    fn test_even_odd_toggles() {
        let mut c = Crossings::new(WindingRule::EvenOdd, 0.0, 0.0, 1.0, 10.0);
        c.record(0.0, 10.0, Direction::Increasing);
        assert!(c.covers(0.0, 10.0));
        c.record(2.0, 4.0, Direction::Decreasing);
        assert_eq!(ranges(&c), vec![0.0, 2.0, 4.0, 10.0]);
        assert!(!c.covers(0.0, 10.0));
        c.record(2.0, 4.0, Direction::Decreasing);
        assert_eq!(ranges(&c), vec![0.0, 10.0]);
    }

    #[test]
    fn test_even_odd_disjoint_insert_keeps_order() {
        let mut c = Crossings::new(WindingRule::EvenOdd, 0.0, 0.0, 1.0, 10.0);
        c.record(6.0, 8.0, Direction::Increasing);
        c.record(1.0, 2.0, Direction::Increasing);
        assert_eq!(ranges(&c), vec![1.0, 2.0, 6.0, 8.0]);
    }

    #[test]
    fn test_non_zero_counts_overlap() {
        let mut c = Crossings::new(WindingRule::NonZero, 0.0, 0.0, 1.0, 10.0);
        c.record(0.0, 10.0, Direction::Increasing);
        c.record(2.0, 4.0, Direction::Increasing);
        assert!(c.covers(0.0, 10.0));
        c.record(0.0, 10.0, Direction::Decreasing);
        assert_eq!(ranges(&c), vec![2.0, 4.0]);
        c.record(2.0, 4.0, Direction::Decreasing);
        assert!(c.is_empty());
    }

    #[test]
    fn test_find_crossings_rectangle_inside_square() {
        let square = Path::rectangle(0.0, 0.0, 10.0, 10.0);
        let curves = curves_from_commands(square.commands.iter().copied());
        let c = find_crossings(&curves, 2.0, 2.0, 4.0, 4.0).unwrap();
        assert!(c.covers(2.0, 4.0));
        // 跨越右边界
        assert!(find_crossings(&curves, 8.0, 2.0, 12.0, 4.0).is_none());
        let outside = find_crossings(&curves, 20.0, 2.0, 24.0, 4.0).unwrap();
        assert!(outside.is_empty());
    }

    #[test]
    fn test_path_contains_respects_rule() {
        // 同向嵌套的两个正方形
        let mut path = Path::new(WindingRule::NonZero);
        path.move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .line_to(10.0, 10.0)
            .line_to(0.0, 10.0)
            .close()
            .move_to(2.0, 2.0)
            .line_to(8.0, 2.0)
            .line_to(8.0, 8.0)
            .line_to(2.0, 8.0)
            .close();
        assert!(path_contains(&path, None, 5.0, 5.0));
        path.winding_rule = WindingRule::EvenOdd;
        assert!(!path_contains(&path, None, 5.0, 5.0));
        assert!(path_contains(&path, None, 1.0, 5.0));
        let shift = Transform2D::translation(100.0, 0.0);
        assert!(path_contains(&path, Some(&shift), 101.0, 5.0));
    }

    #[test]
    fn test_path_contains_rect_respects_rule() {
        let mut path = Path::new(WindingRule::NonZero);
        path.move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .line_to(10.0, 10.0)
            .line_to(0.0, 10.0)
            .close()
            .move_to(2.0, 2.0)
            .line_to(8.0, 2.0)
            .line_to(8.0, 8.0)
            .line_to(2.0, 8.0)
            .close();
        assert!(path_contains_rect(&path, None, 3.0, 3.0, 2.0, 2.0));
        assert!(!path_contains_rect(&path, None, 1.0, 1.0, 2.0, 2.0));
        assert!(!path_contains_rect(&path, None, 3.0, 3.0, -1.0, 2.0));
        path.winding_rule = WindingRule::EvenOdd;
        assert!(!path_contains_rect(&path, None, 3.0, 3.0, 2.0, 2.0));
        assert!(path_contains_rect(&path, None, 0.5, 3.0, 1.0, 2.0));
    }
}
