//! 扫描线布尔运算
//!
//! 把两组单调曲线按上端点排序后自上而下扫描。每一行（活动边的 x 次序
//! 保持不变的最大 y 区间）内按 x 从左到右对边分类：进入结果、离开结果
//! 或忽略。被保留的边片段串成链，链在闭合时成为输出的子路径。
//!
//! 边、链接与链端都存放在数组中，通过下标相互引用。

use crate::curve::{Curve, Direction};
use std::cmp::Ordering;
use std::mem;

/// 扫描运算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SweepOp {
    Add,
    Subtract,
    Intersect,
    Xor,
    /// 按奇偶规则消解单个形状
    EvenOdd,
    /// 按非零规则消解单个形状
    NonZero,
}

impl SweepOp {
    /// 是否为需要两个已消解操作数的布尔运算
    pub fn is_boolean(self) -> bool {
        !matches!(self, SweepOp::EvenOdd | SweepOp::NonZero)
    }

    fn combine(self, in_left: bool, in_right: bool) -> bool {
        match self {
            SweepOp::Add => in_left || in_right,
            SweepOp::Subtract => in_left && !in_right,
            SweepOp::Intersect => in_left && in_right,
            SweepOp::Xor => in_left != in_right,
            SweepOp::EvenOdd | SweepOp::NonZero => in_left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurveTag {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeTag {
    Ignore,
    Enter,
    Exit,
}

impl EdgeTag {
    fn direction(self) -> Direction {
        match self {
            EdgeTag::Exit => Direction::Decreasing,
            EdgeTag::Enter | EdgeTag::Ignore => Direction::Increasing,
        }
    }
}

/// 一行内从左到右的内外状态
#[derive(Debug, Clone, Copy)]
struct Classifier {
    op: SweepOp,
    in_left: bool,
    in_right: bool,
    in_result: bool,
    count: i32,
}

impl Classifier {
    fn new(op: SweepOp) -> Self {
        Self {
            op,
            in_left: false,
            in_right: false,
            in_result: false,
            count: 0,
        }
    }

    fn new_row(&mut self) {
        self.in_left = false;
        self.in_right = false;
        self.in_result = false;
        self.count = 0;
    }

    fn classify(&mut self, ctag: CurveTag, direction: Direction) -> EdgeTag {
        match self.op {
            SweepOp::EvenOdd => {
                self.in_result = !self.in_result;
                if self.in_result {
                    EdgeTag::Enter
                } else {
                    EdgeTag::Exit
                }
            }
            SweepOp::NonZero => {
                let tag = if self.count == 0 {
                    EdgeTag::Enter
                } else {
                    EdgeTag::Ignore
                };
                self.count += direction.sign();
                if self.count == 0 {
                    EdgeTag::Exit
                } else {
                    tag
                }
            }
            op => {
                match ctag {
                    CurveTag::Left => self.in_left = !self.in_left,
                    CurveTag::Right => self.in_right = !self.in_right,
                }
                let class = op.combine(self.in_left, self.in_right);
                if self.in_result == class {
                    return EdgeTag::Ignore;
                }
                self.in_result = class;
                if class {
                    EdgeTag::Enter
                } else {
                    EdgeTag::Exit
                }
            }
        }
    }

    fn inside(&self) -> bool {
        match self.op {
            SweepOp::NonZero => self.count != 0,
            _ => self.in_result,
        }
    }
}

#[derive(Debug, Clone)]
struct Edge {
    curve: Curve,
    ctag: CurveTag,
    etag: EdgeTag,
    active_y: f64,
    equivalence: usize,
    // 上一次比较的缓存
    last_edge: Option<usize>,
    last_limit: f64,
    last_result: Ordering,
}

impl Edge {
    fn new(curve: Curve, ctag: CurveTag) -> Self {
        Self {
            curve,
            ctag,
            etag: EdgeTag::Ignore,
            active_y: 0.0,
            equivalence: 0,
            last_edge: None,
            last_limit: 0.0,
            last_result: Ordering::Equal,
        }
    }

    fn record(&mut self, yend: f64, etag: EdgeTag) {
        self.active_y = yend;
        self.etag = etag;
    }

    fn is_active_for(&self, y: f64, etag: EdgeTag) -> bool {
        self.etag == etag && self.active_y >= y
    }
}

/// 一条边在 [ytop, ybot] 上被保留的片段
#[derive(Debug, Clone, Copy)]
struct Link {
    edge: usize,
    ytop: f64,
    ybot: f64,
    etag: EdgeTag,
    next: Option<usize>,
}

/// 未闭合链的一端
#[derive(Debug, Clone, Copy)]
struct ChainEnd {
    head: usize,
    tail: usize,
    partner: Option<usize>,
    etag: EdgeTag,
}

struct Sweep {
    classifier: Classifier,
    edges: Vec<Edge>,
    links: Vec<Link>,
    ends: Vec<ChainEnd>,
    chains: Vec<usize>,
    subcurves: Vec<usize>,
}

/// 对两组曲线执行扫描运算，返回消解后的曲线列表
///
/// 布尔运算要求两组曲线各自已经消解；`EvenOdd` / `NonZero` 只使用 `left`。
pub fn calculate(op: SweepOp, left: &[Curve], right: &[Curve]) -> Vec<Curve> {
    let mut edges = Vec::with_capacity(left.len() + right.len());
    edges.extend(left.iter().filter(|c| c.order() > 0).map(|c| Edge::new(*c, CurveTag::Left)));
    edges.extend(right.iter().filter(|c| c.order() > 0).map(|c| Edge::new(*c, CurveTag::Right)));
    if edges.len() < 2 {
        return Vec::new();
    }
    let mut sweep = Sweep {
        classifier: Classifier::new(op),
        edges,
        links: Vec::new(),
        ends: Vec::new(),
        chains: Vec::new(),
        subcurves: Vec::new(),
    };
    sweep.prune_edges();
    let result = sweep.emit();
    tracing::debug!(?op, edges = sweep.edges.len(), curves = result.len(), "sweep finished");
    result
}

/// 下一条边在 v1 处是否挡住当前边与位于 v2 的候选边的连接
///
/// 进入型链要求四连通，离开型链允许八连通。
fn obstructs(v1: f64, v2: f64, phase: usize) -> bool {
    if phase & 1 == 0 {
        v1 <= v2
    } else {
        v1 < v2
    }
}

impl Sweep {
    fn curve(&self, edge: usize) -> &Curve {
        &self.edges[edge].curve
    }

    fn prune_edges(&mut self) {
        let numedges = self.edges.len();
        let mut order: Vec<usize> = (0..numedges).collect();
        order.sort_by(|&a, &b| {
            let (ca, cb) = (&self.edges[a].curve, &self.edges[b].curve);
            ca.y_top()
                .total_cmp(&cb.y_top())
                .then(ca.x_top().total_cmp(&cb.x_top()))
        });

        let mut left = 0usize;
        let mut right = 0usize;
        let mut yrange = [0.0f64; 2];
        let mut new_links = Vec::new();
        // 活动边位于 [left, right)
        while left < numedges {
            let mut y = yrange[0];
            // 移除已经结束的活动边
            let mut next = right;
            let mut cur = right;
            while cur > left {
                cur -= 1;
                let e = order[cur];
                if self.curve(e).y_bot() > y {
                    next -= 1;
                    if next > cur {
                        order[next] = e;
                    }
                }
            }
            left = next;
            if left >= right {
                if right >= numedges {
                    break;
                }
                y = self.curve(order[right]).y_top();
                if y > yrange[0] {
                    self.finalize_sub_curves();
                }
                yrange[0] = y;
            }
            while right < numedges && self.curve(order[right]).y_top() <= y {
                right += 1;
            }
            yrange[1] = self.curve(order[left]).y_bot();
            if right < numedges {
                let ytop = self.curve(order[right]).y_top();
                if yrange[1] > ytop {
                    yrange[1] = ytop;
                }
            }

            // 按 x 插入排序，同时确定次序保持不变的 y 范围
            let mut nexteq = 1;
            for cur in left..right {
                let e = order[cur];
                self.edges[e].equivalence = 0;
                let mut next = cur;
                while next > left {
                    let prev = order[next - 1];
                    let ordering = self.compare_edges(e, prev, &mut yrange);
                    if yrange[1] <= yrange[0] {
                        tracing::warn!(from = yrange[0], to = yrange[1], "sweep range backstepped");
                        self.finalize_sub_curves();
                        return;
                    }
                    if ordering != Ordering::Less {
                        if ordering == Ordering::Equal {
                            // 重合的边标记为等价组，抵消时不产生多余片段
                            let mut eq = self.edges[prev].equivalence;
                            if eq == 0 {
                                eq = nexteq;
                                nexteq += 1;
                                self.edges[prev].equivalence = eq;
                            }
                            self.edges[e].equivalence = eq;
                        }
                        break;
                    }
                    order[next] = prev;
                    next -= 1;
                }
                order[next] = e;
            }

            self.classifier.new_row();
            let ystart = yrange[0];
            let yend = yrange[1];
            let mut cur = left;
            while cur < right {
                let mut e = order[cur];
                let eq = self.edges[e].equivalence;
                let etag = if eq != 0 {
                    // 等价组内优先选择上一行仍活动的边，其次选向下延伸最远的边
                    let orig_inside = self.classifier.inside();
                    let wanted = if orig_inside { EdgeTag::Exit } else { EdgeTag::Enter };
                    let mut active_match = None;
                    let mut longest_match = e;
                    let mut furthest_y = yend;
                    loop {
                        let edge = &self.edges[e];
                        self.classifier.classify(edge.ctag, edge.curve.direction());
                        if active_match.is_none() && edge.is_active_for(ystart, wanted) {
                            active_match = Some(e);
                        }
                        let ybot = edge.curve.y_bot();
                        if ybot > furthest_y {
                            longest_match = e;
                            furthest_y = ybot;
                        }
                        cur += 1;
                        if cur >= right {
                            break;
                        }
                        e = order[cur];
                        if self.edges[e].equivalence != eq {
                            break;
                        }
                    }
                    cur -= 1;
                    if self.classifier.inside() == orig_inside {
                        EdgeTag::Ignore
                    } else {
                        e = active_match.unwrap_or(longest_match);
                        wanted
                    }
                } else {
                    let edge = &self.edges[e];
                    self.classifier.classify(edge.ctag, edge.curve.direction())
                };
                if etag != EdgeTag::Ignore {
                    self.edges[e].record(yend, etag);
                    new_links.push(self.push_link(e, ystart, yend, etag));
                }
                cur += 1;
            }
            if self.classifier.inside() {
                tracing::warn!(y = ystart, "row ended inside the result");
            }
            self.resolve_links(&new_links);
            new_links.clear();
            yrange[0] = yend;
        }
        self.finalize_sub_curves();
    }

    fn compare_edges(&mut self, e: usize, other: usize, yrange: &mut [f64; 2]) -> Ordering {
        let this = &self.edges[e];
        if this.last_edge == Some(other) && yrange[0] < this.last_limit {
            if yrange[1] > this.last_limit {
                yrange[1] = this.last_limit;
            }
            return this.last_result;
        }
        let that = &self.edges[other];
        if that.last_edge == Some(e) && yrange[0] < that.last_limit {
            if yrange[1] > that.last_limit {
                yrange[1] = that.last_limit;
            }
            return that.last_result.reverse();
        }
        let result = this.curve.compare_to(&that.curve, yrange);
        let this = &mut self.edges[e];
        this.last_edge = Some(other);
        this.last_limit = yrange[1];
        this.last_result = result;
        result
    }

    fn push_link(&mut self, edge: usize, ytop: f64, ybot: f64, etag: EdgeTag) -> usize {
        self.links.push(Link {
            edge,
            ytop,
            ybot,
            etag,
            next: None,
        });
        self.links.len() - 1
    }

    fn push_end(&mut self, link: usize, partner: Option<usize>) -> usize {
        self.ends.push(ChainEnd {
            head: link,
            tail: link,
            partner,
            etag: self.links[link].etag,
        });
        self.ends.len() - 1
    }

    fn link_x(&self, link: usize) -> f64 {
        let l = &self.links[link];
        self.curve(l.edge).x_for_y(l.ytop)
    }

    fn link_x_bot(&self, link: usize) -> f64 {
        let l = &self.links[link];
        self.curve(l.edge).x_for_y(l.ybot)
    }

    fn end_x(&self, end: usize) -> f64 {
        let ce = &self.ends[end];
        if ce.etag == EdgeTag::Enter {
            self.link_x_bot(ce.tail)
        } else {
            self.link_x_bot(ce.head)
        }
    }

    fn add_link(&mut self, end: usize, link: usize) {
        let ce = self.ends[end];
        if ce.etag == EdgeTag::Enter {
            self.links[ce.tail].next = Some(link);
            self.ends[end].tail = link;
        } else {
            self.links[link].next = Some(ce.head);
            self.ends[end].head = link;
        }
    }

    /// 连接两个链端；形成闭合子路径时返回其首个链接
    fn link_to(&mut self, this: usize, that: usize) -> Option<usize> {
        let (etag, that_etag) = (self.ends[this].etag, self.ends[that].etag);
        if etag == EdgeTag::Ignore || that_etag == EdgeTag::Ignore {
            tracing::warn!("chain end linked more than once");
            return None;
        }
        if etag == that_etag {
            tracing::warn!(?etag, "linking chains of the same type");
            return None;
        }
        let (enter, exit) = if etag == EdgeTag::Enter {
            (this, that)
        } else {
            (that, this)
        };
        self.ends[this].etag = EdgeTag::Ignore;
        self.ends[that].etag = EdgeTag::Ignore;

        let enter_tail = self.ends[enter].tail;
        self.links[enter_tail].next = Some(self.ends[exit].head);
        self.ends[enter].tail = self.ends[exit].tail;
        if self.ends[this].partner == Some(that) {
            return Some(self.ends[enter].head);
        }

        // 把本链接入由两个伙伴端组成的链的一端
        let (Some(other_enter), Some(other_exit)) = (self.ends[exit].partner, self.ends[enter].partner) else {
            tracing::warn!("chain end without partner");
            return None;
        };
        self.ends[other_enter].partner = Some(other_exit);
        self.ends[other_exit].partner = Some(other_enter);
        let enter_head = self.ends[enter].head;
        let other_head = self.ends[other_enter].head;
        if self.links[enter_head].ytop < self.links[other_head].ytop {
            let tail = self.ends[enter].tail;
            self.links[tail].next = Some(other_head);
            self.ends[other_enter].head = enter_head;
        } else {
            let other_tail = self.ends[other_exit].tail;
            self.links[other_tail].next = Some(enter_head);
            self.ends[other_exit].tail = self.ends[enter].tail;
        }
        None
    }

    fn finalize_sub_curves(&mut self) {
        let chains = mem::take(&mut self.chains);
        if chains.len() % 2 != 0 {
            tracing::warn!(count = chains.len(), "odd number of chains");
        }
        for pair in chains.chunks_exact(2) {
            if let Some(head) = self.link_to(pair[0], pair[1]) {
                self.subcurves.push(head);
            }
        }
    }

    /// 把本行新产生的链接接到已有链上，或开启新链
    fn resolve_links(&mut self, new_links: &[usize]) {
        if new_links.len() % 2 != 0 {
            tracing::warn!(count = new_links.len(), "odd number of new links");
        }
        let old_chains = mem::take(&mut self.chains);
        if old_chains.len() % 2 != 0 {
            tracing::warn!(count = old_chains.len(), "odd number of chains");
        }
        let mut curchain = 0usize;
        let mut curlink = 0usize;
        let mut chain = old_chains.first().copied();
        let mut nextchain = old_chains.get(1).copied();
        let mut link = new_links.first().copied();
        let mut nextlink = new_links.get(1).copied();
        while chain.is_some() || link.is_some() {
            // 只剩一类时直接两两连接
            let mut connect_chains = link.is_none();
            let mut connect_links = chain.is_none();
            if let (Some(ch), Some(ln)) = (chain, link) {
                let cx = self.end_x(ch);
                let lx = self.link_x(ln);
                // 闭合一块开放区域
                connect_chains = curchain & 1 == 0 && nextchain.is_some_and(|n| self.end_x(n) == cx);
                connect_links = curlink & 1 == 0 && nextlink.is_some_and(|n| self.link_x(n) == lx);
                if !connect_chains && !connect_links {
                    // 后继位于两者之间时先连接后继
                    connect_chains = nextchain.is_some_and(|n| cx < lx && obstructs(self.end_x(n), lx, curchain));
                    connect_links = nextlink.is_some_and(|n| lx < cx && obstructs(self.link_x(n), cx, curlink));
                }
            }
            if connect_chains {
                match (chain, nextchain) {
                    (Some(a), Some(b)) => {
                        if let Some(head) = self.link_to(a, b) {
                            self.subcurves.push(head);
                        }
                    }
                    _ => tracing::warn!("unpaired chain end"),
                }
                curchain += 2;
                chain = old_chains.get(curchain).copied();
                nextchain = old_chains.get(curchain + 1).copied();
            }
            if connect_links {
                match (link, nextlink) {
                    (Some(a), Some(b)) => {
                        let open = self.push_end(a, None);
                        let close = self.push_end(b, Some(open));
                        self.ends[open].partner = Some(close);
                        self.chains.push(open);
                        self.chains.push(close);
                    }
                    _ => tracing::warn!("unpaired link"),
                }
                curlink += 2;
                link = new_links.get(curlink).copied();
                nextlink = new_links.get(curlink + 1).copied();
            }
            if !connect_chains && !connect_links {
                if let (Some(ch), Some(ln)) = (chain, link) {
                    self.add_link(ch, ln);
                    self.chains.push(ch);
                }
                curchain += 1;
                chain = nextchain;
                nextchain = old_chains.get(curchain + 1).copied();
                curlink += 1;
                link = nextlink;
                nextlink = new_links.get(curlink + 1).copied();
            }
        }
        if self.chains.len() % 2 != 0 {
            tracing::warn!(count = self.chains.len(), "odd number of chains after resolving");
        }
    }

    fn link_curve(&self, link: &Link) -> Curve {
        let curve = self.curve(link.edge);
        let dir = link.etag.direction();
        if link.ytop == curve.y_top() && link.ybot == curve.y_bot() {
            curve.with_direction(dir)
        } else {
            curve.sub_curve(link.ytop, link.ybot, dir)
        }
    }

    /// 沿每个闭合链输出锚点和曲线，同一条边上相邻的片段合并
    fn emit(&self) -> Vec<Curve> {
        let mut out = Vec::new();
        for &head in &self.subcurves {
            let mut current = self.links[head];
            out.push(Curve::anchor(self.link_x(head), current.ytop));
            let mut next = current.next;
            let mut guard = self.links.len();
            while let Some(n) = next {
                if guard == 0 {
                    tracing::warn!("cyclic link chain");
                    break;
                }
                guard -= 1;
                let candidate = self.links[n];
                let absorbed = candidate.edge == current.edge
                    && candidate.etag == current.etag
                    && current.ybot >= candidate.ytop
                    && current.ytop <= candidate.ybot;
                if absorbed {
                    current.ytop = current.ytop.min(candidate.ytop);
                    current.ybot = current.ybot.max(candidate.ybot);
                } else {
                    out.push(self.link_curve(&current));
                    current = candidate;
                }
                next = candidate.next;
            }
            out.push(self.link_curve(&current));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::curves_from_commands;
    use crate::path::Path;

    fn curves(path: &Path) -> Vec<Curve> {
        curves_from_commands(path.commands.iter().copied())
    }

    fn resolved(path: &Path) -> Vec<Curve> {
        calculate(SweepOp::NonZero, &curves(path), &[])
    }

    #[test]
    fn test_square_resolves_to_anchor_and_two_sides() {
        let out = resolved(&Path::rectangle(0.0, 0.0, 10.0, 10.0));
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], Curve::anchor(0.0, 0.0));
        assert_eq!(out[1].direction(), Direction::Increasing);
        assert_eq!(out[1].x_top(), 0.0);
        assert_eq!(out[2].direction(), Direction::Decreasing);
        assert_eq!(out[2].x_top(), 10.0);
    }

    #[test]
    fn test_single_edge_yields_nothing() {
        let mut single = Vec::new();
        crate::curve::insert_line(&mut single, 0.0, 0.0, 0.0, 10.0);
        assert!(calculate(SweepOp::EvenOdd, &single, &[]).is_empty());
    }

    #[test]
    fn test_union_of_overlapping_squares() {
        let a = resolved(&Path::rectangle(0.0, 0.0, 10.0, 10.0));
        let b = resolved(&Path::rectangle(5.0, 5.0, 10.0, 10.0));
        let out = calculate(SweepOp::Add, &a, &b);
        let anchors = out.iter().filter(|c| c.order() == 0).count();
        assert_eq!(anchors, 1);
        let xmax = out.iter().map(|c| c.x_max()).fold(f64::MIN, f64::max);
        let ybot = out.iter().map(|c| c.y_bot()).fold(f64::MIN, f64::max);
        assert_eq!(xmax, 15.0);
        assert_eq!(ybot, 15.0);
    }

    #[test]
    fn test_intersect_of_disjoint_squares_is_empty() {
        let a = resolved(&Path::rectangle(0.0, 0.0, 10.0, 10.0));
        let b = resolved(&Path::rectangle(20.0, 0.0, 10.0, 10.0));
        assert!(calculate(SweepOp::Intersect, &a, &b).is_empty());
    }

    #[test]
    fn test_even_odd_hole() {
        let mut path = Path::rectangle(0.0, 0.0, 10.0, 10.0);
        path.commands.extend(Path::rectangle(2.0, 2.0, 6.0, 6.0).commands);
        let out = calculate(SweepOp::EvenOdd, &curves(&path), &[]);
        assert_eq!(out.iter().filter(|c| c.order() == 0).count(), 2);
        let out = calculate(SweepOp::NonZero, &curves(&path), &[]);
        assert_eq!(out.iter().filter(|c| c.order() == 0).count(), 1);
    }

    #[test]
    fn test_coincident_edges_cancel() {
        let a = resolved(&Path::rectangle(0.0, 0.0, 10.0, 10.0));
        let b = resolved(&Path::rectangle(10.0, 0.0, 10.0, 10.0));
        let out = calculate(SweepOp::Add, &a, &b);
        // 共享边不出现在结果中
        assert!(out.iter().all(|c| c.order() == 0 || c.x_min() != 10.0 || c.x_max() != 10.0));
        assert_eq!(out.len(), 3);
    }
}
