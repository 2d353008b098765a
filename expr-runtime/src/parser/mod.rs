//! # Parser 模块
//!
//! 两种可互换的解析策略，输入同一 token 序列，输出同一种表达式树。
//!
//! ## 架构
//!
//! ```text
//!                 ┌─ RecursiveParser ───── 按最低优先级递归拆分 ─┐
//! Vec<Token> ─────┤                                              ├──► Expr
//!                 └─ ShuntingYardParser ── 重排 → 组装（两阶段） ─┘
//! ```
//!
//! ## 赋值时机
//!
//! 两种策略的赋值时机不同，这是有意保留的差异：
//!
//! - `RecursiveParser`：在**解析过程中**遇到 `=` 即写入环境，链式赋值
//!   `y=x=3` 会绑定所有目标。
//! - `ShuntingYardParser`：在**组装阶段**遇到赋值项才写入环境，并立即返回，
//!   因此每个表达式只生效一次赋值。
//!
//! ## 模块结构
//!
//! - `scanner`: 最低优先级扫描
//! - `recursive`: 递归拆分解析器
//! - `shunting_yard`: 调度场解析器

mod recursive;
mod scanner;
mod shunting_yard;


use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::error::ParseError;
use crate::expr::Expr;
use crate::token::Token;

pub use recursive::RecursiveParser;
pub use scanner::find_min_priority;
pub use shunting_yard::ShuntingYardParser;

/// 解析策略接口
pub trait ParseStrategy {
    /// 策略名，用于日志
    fn name(&self) -> &'static str;

    /// 把 token 序列解析为表达式树
    ///
    /// 遇到赋值时会写入 `env`，写入时机由具体策略决定。
    fn parse(&self, tokens: &[Token], env: &mut Environment) -> Result<Expr, ParseError>;
}

/// 解析策略选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// 递归最低优先级拆分
    #[default]
    Recursive,
    /// 调度场两阶段重排
    ShuntingYard,
}

impl Strategy {
    /// 所有策略，按声明顺序
    pub const ALL: [Strategy; 2] = [Strategy::Recursive, Strategy::ShuntingYard];

    /// 获取策略对应的解析器
    pub fn parser(self) -> &'static dyn ParseStrategy {
        match self {
            Self::Recursive => &RecursiveParser,
            Self::ShuntingYard => &ShuntingYardParser,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.parser().name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recursive" => Ok(Self::Recursive),
            "shunting_yard" | "shunting-yard" => Ok(Self::ShuntingYard),
            other => Err(format!(
                "未知解析策略 '{other}'，可选: recursive, shunting_yard"
            )),
        }
    }
}
