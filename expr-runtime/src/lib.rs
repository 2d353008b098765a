//! # Expr Runtime
//!
//! 算术表达式的编译与求值核心库。
//!
//! ## 架构概述
//!
//! ```text
//! 文本 ──► tokenize ──► Vec<Token> ──► ParseStrategy ──► Expr ──► evaluate ──► f64
//!                                        │                          ▲
//!                                        └── 赋值写入 ──► Environment ┘
//! ```
//!
//! `expr-runtime` 是纯逻辑核心，不依赖 IO。所有可变状态都在调用方持有的
//! [`Environment`] 里，通过参数显式传入。
//!
//! ## 核心类型
//!
//! - [`Token`]：词法单元
//! - [`Expr`]：表达式树
//! - [`Environment`]：变量绑定与常量表
//! - [`Strategy`]：解析策略（递归拆分 / 调度场）
//! - [`Session`]：环境 + 编译选项的上下文对象
//!
//! ## 使用示例
//!
//! ```ignore
//! use std::collections::HashMap;
//! use expr_runtime::{Environment, compile, evaluate};
//!
//! let mut env = Environment::new();
//! let tree = compile("2x+1", &mut env)?;
//! let bindings = HashMap::from([("x".to_string(), 3.0)]);
//! assert_eq!(evaluate(&tree, &mut env, &bindings)?, 7.0);
//! ```
//!
//! ## 模块结构
//!
//! - [`operator`]：运算符与优先级
//! - [`token`]：Token 定义
//! - [`tokenizer`]：词法分析
//! - [`expr`]：表达式树
//! - [`parser`]：两种解析策略
//! - [`environment`]：求值环境
//! - [`eval`]：求值器
//! - [`session`]：会话
//! - [`error`]：错误类型定义

pub mod environment;
pub mod error;
pub mod eval;
pub mod expr;
pub mod operator;
pub mod parser;
pub mod session;
pub mod token;
pub mod tokenizer;

use std::collections::HashMap;

use tracing::debug;

// 重导出核心类型
pub use environment::Environment;
pub use error::{BalanceError, EvalError, ExprError, ExprResult, ParseError, TokenizeError};
pub use eval::EvalContext;
pub use expr::Expr;
pub use operator::{BinaryOp, UnaryOp};
pub use parser::{ParseStrategy, RecursiveParser, ShuntingYardParser, Strategy};
pub use session::{CompileOptions, Session};
pub use token::{Bracket, Token};
pub use tokenizer::tokenize;

/// 使用默认策略编译表达式
///
/// 表达式中的赋值会写入 `env`。
pub fn compile(text: &str, env: &mut Environment) -> ExprResult<Expr> {
    compile_with(text, env, Strategy::default())
}

/// 使用指定策略编译表达式
pub fn compile_with(text: &str, env: &mut Environment, strategy: Strategy) -> ExprResult<Expr> {
    let tokens = tokenize(text, env)?;
    let parser = strategy.parser();
    let tree = parser.parse(&tokens, env)?;
    debug!(
        strategy = parser.name(),
        tokens = tokens.len(),
        tree = %tree,
        "表达式编译完成"
    );
    Ok(tree)
}

/// 对表达式树求值
///
/// `bindings` 中的每一项先以数字叶子写入 `env`（覆盖原有绑定），
/// 未出现的变量保持原绑定。
pub fn evaluate(
    tree: &Expr,
    env: &mut Environment,
    bindings: &HashMap<String, f64>,
) -> ExprResult<f64> {
    for (name, value) in bindings {
        env.bind_number(name.clone(), *value);
    }
    Ok(eval::evaluate(tree, env)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let mut env = Environment::new();
        let tree = compile("1+1", &mut env).unwrap();
        assert_eq!(evaluate(&tree, &mut env, &HashMap::new()).unwrap(), 2.0);

        let _session = Session::new();
        let _strategy = Strategy::ShuntingYard;
        let _token = Token::Assign;
    }

    #[test]
    fn test_bindings_overwrite_environment() {
        let mut env = Environment::new();
        let tree = compile("x*10", &mut env).unwrap();
        env.bind_number("x", 1.0);

        let bindings = HashMap::from([("x".to_string(), 4.0)]);
        assert_eq!(evaluate(&tree, &mut env, &bindings).unwrap(), 40.0);
        // 覆盖后的绑定会保留下来
        assert_eq!(evaluate(&tree, &mut env, &HashMap::new()).unwrap(), 40.0);
    }
}
