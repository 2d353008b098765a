//! # 最低优先级扫描

use crate::operator::BRACKET_PRIORITY;
use crate::token::Token;

/// 找到区间内顶层（不在括号内）优先级最低的运算符
///
/// 从左到右扫描并维护括号深度；并列时取第一个出现的位置。
/// 没有可选的运算符时返回 `None`。
pub fn find_min_priority(tokens: &[Token]) -> Option<usize> {
    let mut min_priority = BRACKET_PRIORITY;
    let mut min_index = None;
    let mut depth: usize = 0;

    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::Open { .. } => depth += 1,
            Token::Close(_) => depth = depth.saturating_sub(1),
            _ if depth == 0 => {
                if let Some(priority) = token.priority()
                    && priority < min_priority
                {
                    min_priority = priority;
                    min_index = Some(index);
                }
            }
            _ => {}
        }
    }

    min_index
}
