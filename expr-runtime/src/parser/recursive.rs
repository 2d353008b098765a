//! # 递归拆分解析器
//!
//! 每次在区间的最低优先级运算符处拆分，左右两侧递归解析。
//! 并列优先级取最左边的运算符，因此同级二元运算向右结合：
//! `8-2-1` 解析为 `8-(2-1)`。

use tracing::trace;

use super::ParseStrategy;
use super::scanner::find_min_priority;
use crate::environment::Environment;
use crate::error::ParseError;
use crate::expr::Expr;
use crate::token::{Token, render_span};

/// 递归最低优先级拆分解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct RecursiveParser;

impl ParseStrategy for RecursiveParser {
    fn name(&self) -> &'static str {
        "recursive"
    }

    fn parse(&self, tokens: &[Token], env: &mut Environment) -> Result<Expr, ParseError> {
        parse_span(tokens, env)
    }
}

fn parse_span(tokens: &[Token], env: &mut Environment) -> Result<Expr, ParseError> {
    match tokens {
        [] => return Err(ParseError::EmptySpan),
        [single] => return leaf(single),
        _ => {}
    }

    if let Some(inner) = wrapped_interior(tokens) {
        return Ok(Expr::grouped(parse_span(inner, env)?));
    }

    let no_operator = || ParseError::NoOperator {
        fragment: render_span(tokens),
    };
    let index = find_min_priority(tokens).ok_or_else(no_operator)?;
    let (before, rest) = tokens.split_at(index);
    let (token, after) = rest.split_first().ok_or_else(no_operator)?;

    match token {
        Token::Binary(op) => {
            let left = parse_span(before, env)?;
            let right = parse_span(after, env)?;
            Ok(Expr::binary(*op, left, right))
        }

        Token::Unary(op) => {
            if !before.is_empty() {
                return Err(ParseError::UnexpectedToken {
                    token: render_span(before),
                });
            }
            Ok(Expr::unary(*op, parse_span(after, env)?))
        }

        // 赋值在解析时立即生效，`=` 本身不进入树
        Token::Assign => {
            let [Token::Var(name)] = before else {
                return Err(ParseError::InvalidAssignTarget {
                    target: render_span(before),
                });
            };
            let value = parse_span(after, env)?;
            trace!(name = %name, value = %value, "解析时绑定变量");
            env.bind(name.clone(), value.clone());
            Ok(value)
        }

        other => Err(ParseError::UnexpectedToken {
            token: other.to_string(),
        }),
    }
}

/// 单个 token 转叶子节点
fn leaf(token: &Token) -> Result<Expr, ParseError> {
    match token {
        Token::Number(value) => Ok(Expr::Number(*value)),
        Token::Const { name, value } => Ok(Expr::constant(name.clone(), *value)),
        Token::Var(name) => Ok(Expr::Var(name.clone())),
        other => Err(ParseError::UnexpectedToken {
            token: other.to_string(),
        }),
    }
}

/// 区间是否被一对括号完整包围；是则返回括号内部
///
/// 第一个左括号的配对位置按深度确定，必须恰好是最后一个 token，
/// 且括号类型一致。`(1)+(2)` 不算完整包围。
fn wrapped_interior(tokens: &[Token]) -> Option<&[Token]> {
    let Some(Token::Open { bracket, .. }) = tokens.first() else {
        return None;
    };
    let last = tokens.len() - 1;

    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::Open { .. } => depth += 1,
            Token::Close(close) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return (index == last && close == bracket).then(|| &tokens[1..last]);
                }
            }
            _ => {}
        }
    }
    None
}
