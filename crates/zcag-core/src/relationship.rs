//! 两个形状的位置关系

use crate::body::Body;
use crate::crossings::{path_contains, path_contains_rect};
use crate::math::EPSILON;
use crate::intersect::intersects;
use crate::path::{path_bounds, PathCommand, PathSource};
use crate::segment::segments_from_commands;
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};

/// 位置关系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    /// 左侧形状完全包含右侧形状
    LhsContains,
    /// 右侧形状完全包含左侧形状
    RhsContains,
    /// 边界相交或部分重叠
    Complex,
    /// 互不相交
    None,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::LhsContains => "lhs-contains",
            Relationship::RhsContains => "rhs-contains",
            Relationship::Complex => "complex",
            Relationship::None => "none",
        }
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 计算 `lhs` 与任意边界源 `rhs` 的位置关系
///
/// 依次做包围盒排除、右侧子路径起点的包含测试、边界段两两求交，
/// 最后用左侧子路径起点判断右侧是否包含左侧。共享边界计为相交。
/// 只有当左侧没有任何子路径起点落在右侧内部时才返回 `LhsContains`。
pub fn relationship(
    lhs: &Body,
    lhs_transform: Option<&Transform2D>,
    rhs: &dyn PathSource,
    rhs_transform: Option<&Transform2D>,
) -> Relationship {
    let lhs = match lhs_transform {
        Some(t) => lhs.transform(t),
        None => lhs.resolve(),
    };
    if lhs.is_empty() {
        return Relationship::None;
    }
    let Some(rhs_bounds) = path_bounds(rhs, rhs_transform) else {
        return Relationship::None;
    };
    if !lhs.bounds().intersects(&rhs_bounds) {
        return Relationship::None;
    }

    // 右侧严格覆盖左侧包围盒即为包含
    let lb = lhs.bounds();
    let pad = EPSILON.max(lb.width().max(lb.height()) * 1e-9);
    if path_contains_rect(
        rhs,
        rhs_transform,
        lb.min.x - pad,
        lb.min.y - pad,
        lb.width() + 2.0 * pad,
        lb.height() + 2.0 * pad,
    ) {
        return Relationship::RhsContains;
    }

    let starts: Vec<(f64, f64)> = rhs
        .path_iter(rhs_transform)
        .filter_map(|cmd| match cmd {
            PathCommand::MoveTo { x, y } => Some((x, y)),
            _ => None,
        })
        .collect();
    let inside = starts.iter().filter(|&&(x, y)| lhs.contains_point(x, y)).count();
    if inside != 0 && inside != starts.len() {
        return Relationship::Complex;
    }

    let rhs_segments = segments_from_commands(rhs.path_iter(rhs_transform));
    let lhs_segments = lhs.boundary_segments();
    for a in &rhs_segments {
        let hull = a.hull_bounds();
        for b in &lhs_segments {
            if hull.intersects(&b.hull_bounds()) && intersects(a, b) {
                tracing::debug!("boundaries intersect");
                return Relationship::Complex;
            }
        }
    }

    let anchors: Vec<(f64, f64)> = lhs
        .curves()
        .iter()
        .filter(|c| c.order() == 0)
        .map(|c| c.start())
        .collect();
    let covered = anchors
        .iter()
        .filter(|&&(x, y)| path_contains(rhs, rhs_transform, x, y))
        .count();
    if inside > 0 {
        // 左侧的某个子路径（例如洞）落在右侧内部时不算包含
        return if covered == 0 {
            Relationship::LhsContains
        } else {
            Relationship::Complex
        };
    }
    match covered {
        0 => Relationship::None,
        n if n == anchors.len() => Relationship::RhsContains,
        _ => Relationship::Complex,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path;

    fn square(x: f64, y: f64, size: f64) -> Body {
        Body::from_source(&Path::rectangle(x, y, size, size), None)
    }

    #[test]
    fn test_containment_both_ways() {
        let big = square(0.0, 0.0, 10.0);
        let small = Path::rectangle(2.0, 2.0, 3.0, 3.0);
        assert_eq!(relationship(&big, None, &small, None), Relationship::LhsContains);
        let small_body = Body::from_source(&small, None);
        let big_path = Path::rectangle(0.0, 0.0, 10.0, 10.0);
        assert_eq!(relationship(&small_body, None, &big_path, None), Relationship::RhsContains);
    }

    #[test]
    fn test_overlap_is_complex() {
        let a = square(0.0, 0.0, 10.0);
        let b = Path::rectangle(5.0, 5.0, 10.0, 10.0);
        assert_eq!(relationship(&a, None, &b, None), Relationship::Complex);
    }

    #[test]
    fn test_disjoint_is_none() {
        let a = square(0.0, 0.0, 10.0);
        assert_eq!(
            relationship(&a, None, &Path::rectangle(50.0, 50.0, 1.0, 1.0), None),
            Relationship::None
        );
        // 包围盒重叠但形状不相交
        let tri = Path::polygon(&[(9.0, 9.0), (20.0, 11.0), (11.0, 20.0)]);
        let l = Body::from_source(&Path::polygon(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]), None);
        assert_eq!(relationship(&l, None, &tri, None), Relationship::None);
    }

    #[test]
    fn test_shared_edge_never_contains() {
        let a = square(0.0, 0.0, 8.0);
        let b = Path::rectangle(8.0, 0.0, 8.0, 8.0);
        let rel = relationship(&a, None, &b, None);
        assert!(matches!(rel, Relationship::None | Relationship::Complex));
    }

    #[test]
    fn test_shape_in_hole_is_none() {
        let ring = square(0.0, 0.0, 10.0).subtract(&square(2.0, 2.0, 6.0));
        let inner = Path::rectangle(3.0, 3.0, 2.0, 2.0);
        assert_eq!(relationship(&ring, None, &inner, None), Relationship::None);
    }

    #[test]
    fn test_rhs_rule_decides_containment() {
        // 同向嵌套的两个正方形，非零规则下中间也被覆盖
        let mut nested = Path::new(crate::path::WindingRule::NonZero);
        nested
            .move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .line_to(10.0, 10.0)
            .line_to(0.0, 10.0)
            .close()
            .move_to(2.0, 2.0)
            .line_to(8.0, 2.0)
            .line_to(8.0, 8.0)
            .line_to(2.0, 8.0)
            .close();
        let small = square(4.0, 4.0, 1.0);
        assert_eq!(relationship(&small, None, &nested, None), Relationship::RhsContains);
        nested.winding_rule = crate::path::WindingRule::EvenOdd;
        assert_eq!(relationship(&small, None, &nested, None), Relationship::None);
    }

    #[test]
    fn test_hole_inside_rhs_is_complex() {
        let ring = square(0.0, 0.0, 10.0).subtract(&square(2.0, 2.0, 6.0));
        let cover = Path::rectangle(1.0, 1.0, 8.0, 8.0);
        assert_eq!(relationship(&ring, None, &cover, None), Relationship::Complex);
        // 洞之外的小方块仍被包含
        let corner = Path::rectangle(0.5, 0.5, 1.0, 1.0);
        assert_eq!(relationship(&ring, None, &corner, None), Relationship::LhsContains);
    }

    #[test]
    fn test_transforms_apply_to_each_side() {
        let a = square(0.0, 0.0, 10.0);
        let b = Path::rectangle(0.0, 0.0, 2.0, 2.0);
        let far = Transform2D::translation(100.0, 100.0);
        assert_eq!(relationship(&a, Some(&far), &b, None), Relationship::None);
        assert_eq!(
            relationship(&a, Some(&far), &b, Some(&Transform2D::translation(104.0, 104.0))),
            Relationship::LhsContains
        );
    }
}
