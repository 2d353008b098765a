//! # 求值模块
//!
//! 对表达式树做纯遍历，得到数值结果。
//!
//! ## 设计原则
//!
//! - 求值**不修改**环境，同一棵树在相同绑定下多次求值结果相同
//! - 变量在求值时查找，并对其绑定的子树递归求值
//! - 定义域错误直接向上传播，不做局部恢复；除以零按 `0` 处理

use crate::environment::Environment;
use crate::error::EvalError;
use crate::expr::Expr;

/// 表达式求值上下文
///
/// 提供变量绑定查找能力
pub trait EvalContext {
    /// 获取变量当前绑定的子树
    fn binding(&self, name: &str) -> Option<&Expr>;
}

impl EvalContext for Environment {
    fn binding(&self, name: &str) -> Option<&Expr> {
        Environment::binding(self, name)
    }
}

/// 对表达式求值
///
/// # 参数
///
/// - `expr`: 要求值的表达式
/// - `ctx`: 求值上下文（提供变量查找）
///
/// # 返回
///
/// 求值结果或错误
pub fn evaluate(expr: &Expr, ctx: &impl EvalContext) -> Result<f64, EvalError> {
    Evaluator {
        ctx,
        resolving: Vec::new(),
    }
    .eval(expr)
}

struct Evaluator<'a, C> {
    ctx: &'a C,
    /// 正在展开的变量，用于发现循环引用
    resolving: Vec<String>,
}

impl<C: EvalContext> Evaluator<'_, C> {
    fn eval(&mut self, expr: &Expr) -> Result<f64, EvalError> {
        match expr {
            Expr::Number(value) => Ok(*value),

            Expr::Const { value, .. } => Ok(*value),

            Expr::Var(name) => {
                if self.resolving.iter().any(|n| n == name) {
                    return Err(EvalError::CyclicReference { name: name.clone() });
                }
                let ctx = self.ctx;
                let bound = ctx
                    .binding(name)
                    .ok_or_else(|| EvalError::UndefinedReference { name: name.clone() })?;

                self.resolving.push(name.clone());
                let result = self.eval(bound);
                self.resolving.pop();
                result
            }

            Expr::Unary { op, operand, .. } => {
                let value = self.eval(operand)?;
                op.apply(value)
            }

            Expr::Binary {
                op, left, right, ..
            } => {
                let left_val = self.eval(left)?;
                let right_val = self.eval(right)?;
                op.apply(left_val, right_val)
            }

            Expr::Grouped(inner) => self.eval(inner),
        }
    }
}
