//! # Session 模块
//!
//! 持有环境与编译选项的上下文对象，适合"编译一次、多次求值"的调用方。
//!
//! ## 使用模型
//!
//! ```text
//! compile(text) -> Expr
//! evaluate(&Expr, bindings) -> f64   （可重复调用）
//! ```
//!
//! 每个 `Session` 拥有独立的 [`Environment`]，不同 `Session` 之间互不影响。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::error::ExprResult;
use crate::expr::Expr;
use crate::parser::Strategy;

/// 编译选项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// 解析策略
    #[serde(default)]
    pub strategy: Strategy,

    /// 编译前去除空白字符
    ///
    /// tokenizer 本身不接受空白。
    #[serde(default)]
    pub strip_whitespace: bool,
}

/// 表达式会话
///
/// # 使用示例
///
/// ```ignore
/// let mut session = Session::new();
/// let tree = session.compile("x^2+1")?;
/// for i in -10..10 {
///     let y = session.evaluate_at(&tree, "x", f64::from(i))?;
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// 求值环境
    env: Environment,
    /// 编译选项
    options: CompileOptions,
}

impl Session {
    /// 使用默认环境与默认选项创建会话
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用指定选项创建会话
    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            env: Environment::new(),
            options,
        }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// 编译表达式；表达式中的赋值会写入本会话的环境
    pub fn compile(&mut self, text: &str) -> ExprResult<Expr> {
        if self.options.strip_whitespace {
            let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            crate::compile_with(&stripped, &mut self.env, self.options.strategy)
        } else {
            crate::compile_with(text, &mut self.env, self.options.strategy)
        }
    }

    /// 先写入 `bindings`，再对树求值
    pub fn evaluate(&mut self, tree: &Expr, bindings: &HashMap<String, f64>) -> ExprResult<f64> {
        crate::evaluate(tree, &mut self.env, bindings)
    }

    /// 只绑定一个变量后求值
    pub fn evaluate_at(&mut self, tree: &Expr, name: &str, value: f64) -> ExprResult<f64> {
        self.env.bind_number(name, value);
        Ok(crate::eval::evaluate(tree, &self.env)?)
    }

    /// 编译并立即求值
    pub fn calculate(&mut self, text: &str, bindings: &HashMap<String, f64>) -> ExprResult<f64> {
        let tree = self.compile(text)?;
        self.evaluate(&tree, bindings)
    }
}
