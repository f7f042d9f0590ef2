//! 形状门面
//!
//! `Area` 是应用程序持有的句柄。布尔运算只把操作追加到队列，
//! 任何查询都会先通过规则把队列折叠进主体，再基于结果回答。
//! 每个公共方法在整个调用期间持有同一把实例锁，可以跨线程共享。

use crate::body::Body;
use crate::error::{AreaError, Result};
use crate::math::BoundingBox2;
use crate::path::{Path, PathCommand, PathSource, WindingRule};
use crate::relationship::{relationship, Relationship};
use crate::rules::{default_rules, AreaRules, Operand, Operation, OperationKind};
use crate::transform::Transform2D;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct AreaState {
    body: Body,
    queue: Vec<Operation>,
    rules: Arc<dyn AreaRules>,
}

impl AreaState {
    /// 折叠队列，返回最新主体
    fn drain(&mut self) -> &Body {
        if !self.queue.is_empty() {
            let ops = std::mem::take(&mut self.queue);
            self.body = self.rules.execute(&self.body, &ops);
        }
        &self.body
    }
}

#[derive(Debug)]
pub struct Area {
    state: Mutex<AreaState>,
}

impl Area {
    /// 空形状，使用进程级默认规则
    pub fn new() -> Self {
        Self::from_body(Body::empty())
    }

    pub fn from_body(body: Body) -> Self {
        Self::with_state(body, default_rules())
    }

    /// 由边界源构造；坐标含 NaN 或无穷时返回错误
    pub fn from_source(source: &dyn PathSource) -> Result<Self> {
        Ok(Self::from_body(Body::from_source(&validated(source)?, None)))
    }

    fn with_state(body: Body, rules: Arc<dyn AreaRules>) -> Self {
        Self {
            state: Mutex::new(AreaState {
                body,
                queue: Vec::new(),
                rules,
            }),
        }
    }

    /// 替换规则后返回自身
    pub fn with_rules(self, rules: Arc<dyn AreaRules>) -> Self {
        self.set_rules(rules);
        self
    }

    pub fn set_rules(&self, rules: Arc<dyn AreaRules>) {
        self.state().rules = rules;
    }

    pub fn rules(&self) -> Arc<dyn AreaRules> {
        self.state().rules.clone()
    }

    fn state(&self) -> MutexGuard<'_, AreaState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 尚未执行的运算数
    pub fn pending(&self) -> usize {
        self.state().queue.len()
    }

    /// 追加一次运算，不触发计算
    pub fn enqueue(&self, kind: OperationKind, operand: Operand) {
        self.state().queue.push(Operation::new(kind, operand));
    }

    /// 以任意边界源为右操作数追加运算
    pub fn enqueue_path(&self, kind: OperationKind, rhs: &dyn PathSource) -> Result<()> {
        let path = validated(rhs)?;
        self.enqueue(kind, Operand::Path(path));
        Ok(())
    }

    pub fn add(&self, rhs: &Area) {
        self.enqueue(OperationKind::Add, Operand::Body(rhs.body()));
    }

    pub fn subtract(&self, rhs: &Area) {
        self.enqueue(OperationKind::Subtract, Operand::Body(rhs.body()));
    }

    pub fn intersect(&self, rhs: &Area) {
        self.enqueue(OperationKind::Intersect, Operand::Body(rhs.body()));
    }

    pub fn xor(&self, rhs: &Area) {
        self.enqueue(OperationKind::Xor, Operand::Body(rhs.body()));
    }

    /// 清空队列并重置为空形状，不调用规则
    pub fn reset(&self) {
        let mut state = self.state();
        state.queue.clear();
        state.body = Body::empty();
    }

    /// 立即执行队列
    pub fn process_queue(&self) {
        self.state().drain();
    }

    /// 折叠队列后的主体
    pub fn body(&self) -> Body {
        self.state().drain().clone()
    }

    fn execute(&self, kind: OperationKind, rhs: &Area) {
        let rhs = rhs.body();
        let mut state = self.state();
        let body = kind.apply(state.drain(), &rhs);
        state.body = body;
    }

    /// 先折叠队列，再绕过规则同步执行一次并集
    pub fn execute_add(&self, rhs: &Area) {
        self.execute(OperationKind::Add, rhs);
    }

    pub fn execute_subtract(&self, rhs: &Area) {
        self.execute(OperationKind::Subtract, rhs);
    }

    pub fn execute_intersect(&self, rhs: &Area) {
        self.execute(OperationKind::Intersect, rhs);
    }

    pub fn execute_xor(&self, rhs: &Area) {
        self.execute(OperationKind::Xor, rhs);
    }

    pub fn is_empty(&self) -> bool {
        self.state().drain().is_empty()
    }

    pub fn is_polygonal(&self) -> bool {
        self.state().drain().is_polygonal()
    }

    pub fn is_rectangular(&self) -> bool {
        self.state().drain().is_rectangular()
    }

    pub fn is_singular(&self) -> bool {
        self.state().drain().is_singular()
    }

    pub fn bounds(&self) -> BoundingBox2 {
        self.state().drain().bounds()
    }

    pub fn integer_bounds(&self) -> BoundingBox2 {
        self.state().drain().integer_bounds()
    }

    pub fn area(&self) -> f64 {
        self.state().drain().area()
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.state().drain().contains_point(x, y)
    }

    pub fn contains_rect(&self, x: f64, y: f64, w: f64, h: f64) -> Result<bool> {
        check_extent(w, h)?;
        Ok(self.state().drain().contains_rect(x, y, w, h))
    }

    pub fn intersects_rect(&self, x: f64, y: f64, w: f64, h: f64) -> Result<bool> {
        check_extent(w, h)?;
        Ok(self.state().drain().intersects_rect(x, y, w, h))
    }

    /// 与任意边界源的位置关系，两侧可各带一个变换
    pub fn relationship(
        &self,
        lhs_transform: Option<&Transform2D>,
        rhs: &dyn PathSource,
        rhs_transform: Option<&Transform2D>,
    ) -> Relationship {
        let body = self.body();
        relationship(&body, lhs_transform, rhs, rhs_transform)
    }

    pub fn contains_shape(&self, rhs: &dyn PathSource) -> bool {
        self.relationship(None, rhs, None) == Relationship::LhsContains
    }

    pub fn intersects_shape(&self, rhs: &dyn PathSource) -> bool {
        self.relationship(None, rhs, None) != Relationship::None
    }

    /// 原地变换
    pub fn transform(&self, t: &Transform2D) -> Result<()> {
        check_transform(t)?;
        let mut state = self.state();
        let body = state.drain().transform(t);
        state.body = body;
        Ok(())
    }

    /// 返回变换后的新形状，沿用当前规则
    pub fn create_transformed_area(&self, t: &Transform2D) -> Result<Area> {
        check_transform(t)?;
        let mut state = self.state();
        let body = state.drain().transform(t);
        Ok(Area::with_state(body, state.rules.clone()))
    }

    /// 展平为折线路径
    pub fn flattened_path(&self, flatness: f64) -> Path {
        let body = self.body();
        Path::from_source(&body, None).flatten(flatness)
    }
}

impl Default for Area {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Area {
    fn clone(&self) -> Self {
        let mut state = self.state();
        let body = state.drain().clone();
        Area::with_state(body, state.rules.clone())
    }
}

impl PartialEq for Area {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        let lhs = self.body();
        let rhs = other.body();
        lhs.equals(&rhs)
    }
}

impl From<Body> for Area {
    fn from(body: Body) -> Self {
        Area::from_body(body)
    }
}

impl PathSource for Area {
    fn winding_rule(&self) -> WindingRule {
        WindingRule::NonZero
    }

    fn path_iter(&self, transform: Option<&Transform2D>) -> Box<dyn Iterator<Item = PathCommand> + '_> {
        let body = self.body();
        let commands: Vec<PathCommand> = body.iter_path(transform).collect();
        Box::new(commands.into_iter())
    }
}

/// 复制边界源并检查坐标有限
fn validated(source: &dyn PathSource) -> Result<Path> {
    let path = Path::from_source(source, None);
    if !path.is_finite() {
        return Err(AreaError::InvalidArgument("path contains non-finite coordinates".to_string()));
    }
    Ok(path)
}

fn check_extent(w: f64, h: f64) -> Result<()> {
    if w < 0.0 || h < 0.0 {
        return Err(AreaError::InvalidArgument(format!("negative rectangle extent: {w} x {h}")));
    }
    Ok(())
}

fn check_transform(t: &Transform2D) -> Result<()> {
    if !t.is_finite() {
        return Err(AreaError::InvalidArgument("transform contains non-finite values".to_string()));
    }
    Ok(())
}
