//! # Token 模块
//!
//! tokenizer 产出、解析器消费的词法单元。
//! token 是一次性的：每次解析都消费一份新的 token 序列。

use std::fmt;

use crate::operator::{ASSIGN_PRIORITY, BRACKET_PRIORITY, BinaryOp, UnaryOp};

/// 括号类型
///
/// 左右括号是否配对只比较类型，不比较位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bracket {
    /// `( )`
    Round,
    /// `[ ]`
    Square,
    /// `{ }`
    Curly,
}

impl Bracket {
    pub fn from_open(c: char) -> Option<Self> {
        match c {
            '(' => Some(Self::Round),
            '[' => Some(Self::Square),
            '{' => Some(Self::Curly),
            _ => None,
        }
    }

    pub fn from_close(c: char) -> Option<Self> {
        match c {
            ')' => Some(Self::Round),
            ']' => Some(Self::Square),
            '}' => Some(Self::Curly),
            _ => None,
        }
    }

    pub fn open_char(self) -> char {
        match self {
            Self::Round => '(',
            Self::Square => '[',
            Self::Curly => '{',
        }
    }

    pub fn close_char(self) -> char {
        match self {
            Self::Round => ')',
            Self::Square => ']',
            Self::Curly => '}',
        }
    }
}

/// 词法单元
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// 整数字面量
    Number(f64),

    /// 命名常量，值在词法分析时确定
    Const { name: String, value: f64 },

    /// 变量引用，求值时才查找
    Var(String),

    /// 二元运算符
    Binary(BinaryOp),

    /// 一元运算符
    Unary(UnaryOp),

    /// 赋值号 `=`
    Assign,

    /// 左括号
    ///
    /// `priority` = 括号基础优先级 + 字符位置。
    Open { bracket: Bracket, priority: u32 },

    /// 右括号
    Close(Bracket),
}

impl Token {
    /// 创建左括号，位置作为并列时的区分
    pub fn open(bracket: Bracket, position: usize) -> Self {
        let offset = u32::try_from(position).unwrap_or(u32::MAX - BRACKET_PRIORITY);
        Self::Open {
            bracket,
            priority: BRACKET_PRIORITY.saturating_add(offset),
        }
    }

    /// 优先级，叶子 token 没有优先级
    pub fn priority(&self) -> Option<u32> {
        match self {
            Self::Number(_) | Self::Const { .. } | Self::Var(_) => None,
            Self::Binary(op) => Some(op.priority()),
            Self::Unary(op) => Some(op.priority()),
            Self::Assign => Some(ASSIGN_PRIORITY),
            Self::Open { priority, .. } => Some(*priority),
            Self::Close(_) => Some(BRACKET_PRIORITY),
        }
    }

    /// 是否是叶子（数字、常量、变量）
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Number(_) | Self::Const { .. } | Self::Var(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Const { name, .. } | Self::Var(name) => f.write_str(name),
            Self::Binary(op) => f.write_str(op.symbol()),
            Self::Unary(UnaryOp::Neg) => f.write_str("-"),
            Self::Unary(op) => f.write_str(op.name()),
            Self::Assign => f.write_str("="),
            Self::Open { bracket, .. } => write!(f, "{}", bracket.open_char()),
            Self::Close(bracket) => write!(f, "{}", bracket.close_char()),
        }
    }
}

/// 把 token 片段还原为文本，用于错误信息
pub fn render_span(tokens: &[Token]) -> String {
    tokens.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_pairs() {
        for (open, close) in [('(', ')'), ('[', ']'), ('{', '}')] {
            let a = Bracket::from_open(open).unwrap();
            let b = Bracket::from_close(close).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.close_char(), close);
            assert_eq!(b.open_char(), open);
        }
        assert_ne!(Bracket::from_open('('), Bracket::from_close(']'));
        assert_eq!(Bracket::from_open(')'), None);
    }

    #[test]
    fn test_priority_of_tokens() {
        assert_eq!(Token::Number(1.0).priority(), None);
        assert_eq!(Token::Var("x".to_string()).priority(), None);
        assert_eq!(Token::Assign.priority(), Some(0));
        assert_eq!(Token::Binary(BinaryOp::Mul).priority(), Some(2));
        assert_eq!(Token::open(Bracket::Round, 3).priority(), Some(1003));
        assert_eq!(Token::Close(Bracket::Curly).priority(), Some(1000));
    }

    #[test]
    fn test_render_span() {
        let tokens = vec![
            Token::Unary(UnaryOp::Neg),
            Token::open(Bracket::Square, 1),
            Token::Number(2.0),
            Token::Binary(BinaryOp::Pow),
            Token::Var("x".to_string()),
            Token::Close(Bracket::Square),
        ];
        assert_eq!(render_span(&tokens), "-[2^x]");
    }
}
