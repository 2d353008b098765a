//! # 表达式模块
//!
//! 定义表达式树。两种解析策略构建同一种树，求值器遍历它。
//!
//! ## 设计原则
//!
//! - 树自顶向下独占子节点，没有共享、没有环
//! - 括号保留为 [`Expr::Grouped`] 节点，便于检查括号边界
//! - 变量只保存名字，求值时才到环境里查找

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::operator::{BinaryOp, UnaryOp};

/// 表达式树节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// 数字字面量
    Number(f64),

    /// 命名常量（`pi`、`e`）
    Const { name: String, value: f64 },

    /// 变量引用
    Var(String),

    /// 一元运算
    Unary {
        op: UnaryOp,
        priority: u32,
        operand: Box<Expr>,
    },

    /// 二元运算
    Binary {
        op: BinaryOp,
        priority: u32,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// 被一对括号完整包围的子表达式
    Grouped(Box<Expr>),
}

impl Expr {
    /// 创建数字字面量
    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }

    /// 创建常量
    pub fn constant(name: impl Into<String>, value: f64) -> Self {
        Self::Const {
            name: name.into(),
            value,
        }
    }

    /// 创建变量引用
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// 创建一元运算，优先级取自运算符
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::Unary {
            op,
            priority: op.priority(),
            operand: Box::new(operand),
        }
    }

    /// 创建二元运算，优先级取自运算符
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::Binary {
            op,
            priority: op.priority(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// 创建括号分组
    pub fn grouped(inner: Expr) -> Self {
        Self::Grouped(Box::new(inner))
    }

    /// 节点优先级，叶子与分组没有优先级
    pub fn priority(&self) -> Option<u32> {
        match self {
            Self::Unary { priority, .. } | Self::Binary { priority, .. } => Some(*priority),
            _ => None,
        }
    }

    /// 收集树中引用到的所有变量名
    pub fn references(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Self::Number(_) | Self::Const { .. } => {}
            Self::Var(name) => {
                names.insert(name.as_str());
            }
            Self::Unary { operand, .. } => operand.collect_references(names),
            Self::Binary { left, right, .. } => {
                left.collect_references(names);
                right.collect_references(names);
            }
            Self::Grouped(inner) => inner.collect_references(names),
        }
    }
}

/// 以全括号前缀形式输出，例如 `(+ 2 (* 3 4))`
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Const { name, .. } | Self::Var(name) => f.write_str(name),
            Self::Unary { op, operand, .. } => write!(f, "({} {operand})", op.name()),
            Self::Binary {
                op, left, right, ..
            } => write!(f, "({} {left} {right})", op.symbol()),
            Self::Grouped(inner) => write!(f, "(group {inner})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_fill_priority() {
        let expr = Expr::binary(BinaryOp::Mul, Expr::number(2.0), Expr::var("x"));
        assert_eq!(expr.priority(), Some(2));

        let expr = Expr::unary(UnaryOp::Sqrt, Expr::number(4.0));
        assert_eq!(expr.priority(), Some(4));

        assert_eq!(Expr::grouped(Expr::number(1.0)).priority(), None);
    }

    #[test]
    fn test_display_prefix_form() {
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::number(2.0),
            Expr::grouped(Expr::binary(
                BinaryOp::Pow,
                Expr::var("x"),
                Expr::unary(UnaryOp::Neg, Expr::constant("pi", std::f64::consts::PI)),
            )),
        );
        insta::assert_snapshot!(expr.to_string(), @"(+ 2 (group (^ x (neg pi))))");
    }

    #[test]
    fn test_references() {
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::var("y"),
            Expr::binary(BinaryOp::Mul, Expr::var("x"), Expr::var("y")),
        );
        let names: Vec<&str> = expr.references().into_iter().collect();
        assert_eq!(names, vec!["x", "y"]);
        assert!(Expr::number(1.0).references().is_empty());
    }

    #[test]
    fn test_serde_roundtrip() {
        let expr = Expr::grouped(Expr::binary(
            BinaryOp::Sub,
            Expr::var("x"),
            Expr::number(1.0),
        ));
        let json = serde_json::to_string(&expr).unwrap();
        let back: Expr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expr);
    }
}
