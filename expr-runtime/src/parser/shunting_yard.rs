//! # 调度场解析器
//!
//! 两阶段解析：
//!
//! ```text
//! Vec<Token> → [阶段1: 重排] → Vec<Postfix> → [阶段2: 组装] → Expr
//! ```
//!
//! - 阶段 1 按优先级把 token 重排为后缀序列；括号闭合时输出一个
//!   [`Postfix::Group`]，使组装出的树保留括号节点。
//! - 阶段 2 用工作队列组装树，队首是最近入队的项；
//!   二元运算先取右操作数、再取左操作数。
//!
//! 阶段 1 同时检查值与运算符交替出现，接受的输入与
//! [`RecursiveParser`](super::RecursiveParser) 相同。
//!
//! 弹栈条件是栈顶优先级**严格大于**当前运算符，同级运算符因此向右结合，
//! 与 [`RecursiveParser`](super::RecursiveParser) 的结果一致。

use std::collections::VecDeque;

use tracing::trace;

use super::ParseStrategy;
use crate::environment::Environment;
use crate::error::ParseError;
use crate::expr::Expr;
use crate::operator::{BinaryOp, UnaryOp};
use crate::token::Token;

/// 调度场两阶段解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct ShuntingYardParser;

impl ParseStrategy for ShuntingYardParser {
    fn name(&self) -> &'static str {
        "shunting_yard"
    }

    fn parse(&self, tokens: &[Token], env: &mut Environment) -> Result<Expr, ParseError> {
        let postfix = rearrange(tokens)?;
        assemble(postfix, env)
    }
}

/// 阶段 1 的输出项
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Postfix {
    Leaf(Expr),
    Unary(UnaryOp),
    Binary(BinaryOp),
    /// 一对括号闭合
    Group,
    /// 延后的赋值，携带目标变量名
    Assign(String),
}

/// 阶段 1：按优先级重排为后缀序列
pub(crate) fn rearrange(tokens: &[Token]) -> Result<Vec<Postfix>, ParseError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<&Token> = Vec::new();
    let mut assignments = Vec::new();
    // 上一个 token 是否结束了一个值（叶子或右括号）
    let mut after_value = false;

    for (index, token) in tokens.iter().enumerate() {
        check_position(token, after_value)?;
        after_value = matches!(
            token,
            Token::Number(_) | Token::Const { .. } | Token::Var(_) | Token::Close(_)
        );

        match token {
            Token::Number(value) => output.push(Postfix::Leaf(Expr::Number(*value))),
            Token::Const { name, value } => {
                output.push(Postfix::Leaf(Expr::constant(name.clone(), *value)));
            }
            Token::Var(name) => output.push(Postfix::Leaf(Expr::Var(name.clone()))),

            // 前缀运算符入栈时不弹出任何运算符
            Token::Unary(_) => operators.push(token),

            Token::Binary(op) => {
                while let Some(top) = operators.last() {
                    let higher = match top {
                        Token::Unary(_) | Token::Binary(_) => {
                            top.priority().is_some_and(|p| p > op.priority())
                        }
                        _ => false,
                    };
                    if !higher {
                        break;
                    }
                    if let Some(popped) = operators.pop() {
                        output.push(emit(popped)?);
                    }
                }
                operators.push(token);
            }

            Token::Open { .. } => operators.push(token),

            Token::Close(bracket) => {
                loop {
                    match operators.pop() {
                        Some(Token::Open { bracket: open, .. }) if open == bracket => break,
                        Some(popped @ (Token::Unary(_) | Token::Binary(_))) => {
                            output.push(emit(popped)?);
                        }
                        _ => {
                            return Err(ParseError::UnexpectedToken {
                                token: token.to_string(),
                            });
                        }
                    }
                }
                output.push(Postfix::Group);
            }

            // 目标是紧挨 `=` 的单个变量，且位于输入开头、左括号或另一个 `=` 之后；
            // 它与 `=` 一起移入赋值队列
            Token::Assign => match output.pop() {
                Some(Postfix::Leaf(Expr::Var(name))) if is_assign_target(&tokens[..index]) => {
                    assignments.push(Postfix::Assign(name));
                }
                other => {
                    return Err(ParseError::InvalidAssignTarget {
                        target: other.map(|item| describe(&item)).unwrap_or_default(),
                    });
                }
            },
        }
    }

    while let Some(op) = operators.pop() {
        output.push(emit(op)?);
    }
    output.extend(assignments);

    Ok(output)
}

/// 阶段 2：组装表达式树
///
/// 遇到赋值项时写入环境并立即返回，其后的项不再处理。
pub(crate) fn assemble(items: Vec<Postfix>, env: &mut Environment) -> Result<Expr, ParseError> {
    // 队首是最近入队的项
    let mut working: VecDeque<Expr> = VecDeque::new();

    for item in items {
        match item {
            Postfix::Leaf(expr) => working.push_front(expr),

            Postfix::Unary(op) => {
                let operand = take(&mut working, op.name())?;
                working.push_front(Expr::unary(op, operand));
            }

            Postfix::Binary(op) => {
                let right = take(&mut working, op.symbol())?;
                let left = take(&mut working, op.symbol())?;
                working.push_front(Expr::binary(op, left, right));
            }

            Postfix::Group => {
                let inner = take(&mut working, "()")?;
                working.push_front(Expr::grouped(inner));
            }

            Postfix::Assign(name) => {
                let value = take(&mut working, "=")?;
                if !working.is_empty() {
                    return Err(ParseError::DanglingOperands {
                        count: working.len() + 1,
                    });
                }
                trace!(name = %name, value = %value, "组装时绑定变量");
                env.bind(name, value.clone());
                return Ok(value);
            }
        }
    }

    match (working.pop_front(), working.len()) {
        (Some(expr), 0) => Ok(expr),
        (first, rest) => Err(ParseError::DanglingOperands {
            count: rest + usize::from(first.is_some()),
        }),
    }
}

/// 值与运算符必须交替出现
///
/// 值之后不能紧跟值、左括号或前缀运算符；二元运算符和右括号之前必须是值。
fn check_position(token: &Token, after_value: bool) -> Result<(), ParseError> {
    match token {
        Token::Number(_)
        | Token::Const { .. }
        | Token::Var(_)
        | Token::Open { .. }
        | Token::Unary(_)
            if after_value =>
        {
            Err(ParseError::UnexpectedToken {
                token: token.to_string(),
            })
        }
        Token::Binary(op) if !after_value => Err(ParseError::MissingOperand {
            operator: op.symbol().to_string(),
        }),
        Token::Close(_) if !after_value => Err(ParseError::UnexpectedToken {
            token: token.to_string(),
        }),
        _ => Ok(()),
    }
}

fn is_assign_target(before: &[Token]) -> bool {
    matches!(
        before,
        [Token::Var(_)] | [.., Token::Open { .. } | Token::Assign, Token::Var(_)]
    )
}

fn take(working: &mut VecDeque<Expr>, operator: &str) -> Result<Expr, ParseError> {
    working.pop_front().ok_or_else(|| ParseError::MissingOperand {
        operator: operator.to_string(),
    })
}

/// 运算符 token 转后缀项
fn emit(token: &Token) -> Result<Postfix, ParseError> {
    match token {
        Token::Unary(op) => Ok(Postfix::Unary(*op)),
        Token::Binary(op) => Ok(Postfix::Binary(*op)),
        other => Err(ParseError::UnexpectedToken {
            token: other.to_string(),
        }),
    }
}

fn describe(item: &Postfix) -> String {
    match item {
        Postfix::Leaf(expr) => expr.to_string(),
        Postfix::Unary(op) => op.name().to_string(),
        Postfix::Binary(op) => op.symbol().to_string(),
        Postfix::Group => "()".to_string(),
        Postfix::Assign(name) => format!("{name}="),
    }
}
