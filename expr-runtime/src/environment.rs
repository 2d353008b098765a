//! # Environment 模块
//!
//! 变量名 → 表达式子树的映射，以及固定的常量表。
//!
//! - 变量绑定的是**子树**而不是数值：`x = y+1` 之后，每次对 `x` 求值都会
//!   重新查找 `y`。
//! - 变量槽位先声明后绑定；tokenizer 只把已声明的名字识别为变量。
//! - 环境由调用方显式持有并传入 compile / evaluate，不存在全局状态。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::expr::Expr;

/// 预声明的变量槽位
pub const DEFAULT_VARIABLES: [&str; 3] = ["x", "y", "z"];

/// 内置常量表
pub const CONSTANTS: [(&str, f64); 2] = [("pi", std::f64::consts::PI), ("e", std::f64::consts::E)];

/// 求值环境
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// 变量槽位，`None` 表示已声明但未绑定
    variables: HashMap<String, Option<Expr>>,
    /// 常量
    constants: HashMap<String, f64>,
}

impl Environment {
    /// 创建带默认槽位（`x` `y` `z`）与常量（`pi` `e`）的环境
    pub fn new() -> Self {
        Self {
            variables: DEFAULT_VARIABLES
                .iter()
                .map(|name| (name.to_string(), None))
                .collect(),
            constants: CONSTANTS
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
        }
    }

    /// 声明变量槽位；已存在的绑定保持不变
    pub fn declare(&mut self, name: impl Into<String>) {
        self.variables.entry(name.into()).or_insert(None);
    }

    /// 绑定变量到子树，未声明的名字会被声明
    pub fn bind(&mut self, name: impl Into<String>, value: Expr) {
        self.variables.insert(name.into(), Some(value));
    }

    /// 绑定变量到数字
    pub fn bind_number(&mut self, name: impl Into<String>, value: f64) {
        self.bind(name, Expr::Number(value));
    }

    /// 解除绑定，槽位保留
    pub fn unbind(&mut self, name: &str) -> Option<Expr> {
        self.variables.get_mut(name).and_then(Option::take)
    }

    /// 是否是已声明的变量名
    pub fn is_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// 查找常量
    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }

    /// 查找变量的当前绑定
    pub fn binding(&self, name: &str) -> Option<&Expr> {
        self.variables.get(name).and_then(Option::as_ref)
    }

    /// 所有已声明变量（名字、是否已绑定），按名字排序
    pub fn variables(&self) -> Vec<(&str, bool)> {
        let mut vars: Vec<(&str, bool)> = self
            .variables
            .iter()
            .map(|(name, value)| (name.as_str(), value.is_some()))
            .collect();
        vars.sort_unstable_by_key(|(name, _)| *name);
        vars
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_slots_and_constants() {
        let env = Environment::new();
        for name in DEFAULT_VARIABLES {
            assert!(env.is_variable(name));
            assert!(env.binding(name).is_none());
        }
        assert!(!env.is_variable("w"));
        assert_eq!(env.constant("pi"), Some(std::f64::consts::PI));
        assert_eq!(env.constant("e"), Some(std::f64::consts::E));
        assert_eq!(env.constant("tau"), None);
    }

    #[test]
    fn test_bind_and_unbind() {
        let mut env = Environment::new();
        env.bind_number("x", 5.0);
        assert_eq!(env.binding("x"), Some(&Expr::Number(5.0)));

        assert_eq!(env.unbind("x"), Some(Expr::Number(5.0)));
        assert!(env.is_variable("x"));
        assert!(env.binding("x").is_none());
        assert_eq!(env.unbind("missing"), None);
    }

    #[test]
    fn test_declare_keeps_existing_binding() {
        let mut env = Environment::new();
        env.bind_number("y", 2.0);
        env.declare("y");
        assert_eq!(env.binding("y"), Some(&Expr::Number(2.0)));

        env.declare("w");
        assert!(env.is_variable("w"));
        assert!(env.binding("w").is_none());
    }

    #[test]
    fn test_bind_declares_unknown_name() {
        let mut env = Environment::new();
        env.bind("t", Expr::var("x"));
        assert!(env.is_variable("t"));
        assert_eq!(
            env.variables(),
            vec![("t", true), ("x", false), ("y", false), ("z", false)]
        );
    }
}
