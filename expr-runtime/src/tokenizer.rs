//! # Tokenizer 模块
//!
//! 把表达式文本转换成扁平的 token 序列。
//!
//! ## 流程
//!
//! ```text
//! 文本 → [括号平衡检查] → [逐字符扫描] → Vec<Token>
//! ```
//!
//! 括号检查先于一切扫描进行，失败时返回 [`BalanceError`]；
//! 扫描阶段遇到无法识别的字符或单词时返回 [`TokenizeError`]。
//! 空白字符同样不被识别，由调用方在进入 tokenizer 之前去除。

use tracing::trace;

use crate::environment::Environment;
use crate::error::{BalanceError, ExprResult, TokenizeError};
use crate::operator::{BinaryOp, UnaryOp};
use crate::token::{Bracket, Token};

/// 检查括号是否平衡
///
/// 每个右括号必须与最近一个未闭合的左括号类型一致。
pub fn check_balance(text: &str) -> Result<(), BalanceError> {
    let mut stack: Vec<(Bracket, usize)> = Vec::new();

    for (position, c) in text.chars().enumerate() {
        if let Some(bracket) = Bracket::from_open(c) {
            stack.push((bracket, position));
        } else if let Some(bracket) = Bracket::from_close(c) {
            match stack.pop() {
                None => {
                    return Err(BalanceError::UnexpectedClose { position, found: c });
                }
                Some((open, _)) if open != bracket => {
                    return Err(BalanceError::Mismatched {
                        position,
                        expected: open.close_char(),
                        found: c,
                    });
                }
                Some(_) => {}
            }
        }
    }

    match stack.pop() {
        Some((open, position)) => Err(BalanceError::Unclosed {
            position,
            open: open.open_char(),
        }),
        None => Ok(()),
    }
}

/// 词法分析
///
/// 单词按 常量 → 已声明变量 → 函数名 的顺序识别，因此变量名需要先在
/// `env` 中声明。
pub fn tokenize(text: &str, env: &Environment) -> ExprResult<Vec<Token>> {
    check_balance(text)?;

    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut idx = 0;

    while idx < chars.len() {
        let c = chars[idx];

        if c == '-' {
            // 开头、`=` 之后、左括号之后的 `-` 是取负
            let unary = idx == 0
                || chars[idx - 1] == '='
                || Bracket::from_open(chars[idx - 1]).is_some();
            tokens.push(if unary {
                Token::Unary(UnaryOp::Neg)
            } else {
                Token::Binary(BinaryOp::Sub)
            });
            idx += 1;
        } else if let Some(op) = BinaryOp::from_char(c) {
            tokens.push(Token::Binary(op));
            idx += 1;
        } else if c.is_ascii_digit() {
            let start = idx;
            while idx < chars.len() && chars[idx].is_ascii_digit() {
                idx += 1;
            }
            let value = chars[start..idx].iter().fold(0.0, |acc, d| {
                acc * 10.0 + f64::from(d.to_digit(10).unwrap_or_default())
            });
            tokens.push(Token::Number(value));
        } else if c == '=' {
            tokens.push(Token::Assign);
            idx += 1;
        } else if let Some(bracket) = Bracket::from_open(c) {
            tokens.push(Token::open(bracket, idx));
            idx += 1;
        } else if let Some(bracket) = Bracket::from_close(c) {
            tokens.push(Token::Close(bracket));
            idx += 1;
        } else if c.is_ascii_alphabetic() {
            // 数字紧跟单词（`2x`）时补一个隐式乘号
            if idx > 0 && chars[idx - 1].is_ascii_digit() {
                tokens.push(Token::Binary(BinaryOp::Mul));
            }
            let start = idx;
            while idx < chars.len() && chars[idx].is_ascii_alphabetic() {
                idx += 1;
            }
            let word: String = chars[start..idx].iter().collect();
            tokens.push(classify_word(word, start, env)?);
        } else {
            return Err(TokenizeError::UnexpectedChar {
                position: idx,
                found: c,
            }
            .into());
        }
    }

    trace!(text = %text, count = tokens.len(), "词法分析完成");
    Ok(tokens)
}

/// 识别单词：常量 → 变量 → 函数
fn classify_word(
    word: String,
    position: usize,
    env: &Environment,
) -> Result<Token, TokenizeError> {
    if let Some(value) = env.constant(&word) {
        return Ok(Token::Const { name: word, value });
    }
    if env.is_variable(&word) {
        return Ok(Token::Var(word));
    }
    if let Some(op) = UnaryOp::from_name(&word) {
        return Ok(Token::Unary(op));
    }
    Err(TokenizeError::UnknownWord { position, word })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExprError;

    fn lex(text: &str) -> Vec<Token> {
        tokenize(text, &Environment::new()).unwrap()
    }

    fn var(name: &str) -> Token {
        Token::Var(name.to_string())
    }

    #[test]
    fn test_balance_ok() {
        assert!(check_balance("").is_ok());
        assert!(check_balance("([{}])").is_ok());
        assert!(check_balance("(1+2)*[3]").is_ok());
    }

    #[test]
    fn test_balance_errors() {
        assert_eq!(
            check_balance("("),
            Err(BalanceError::Unclosed {
                position: 0,
                open: '('
            })
        );
        assert_eq!(
            check_balance("(1+2"),
            Err(BalanceError::Unclosed {
                position: 0,
                open: '('
            })
        );
        assert_eq!(
            check_balance("1)"),
            Err(BalanceError::UnexpectedClose {
                position: 1,
                found: ')'
            })
        );
        assert_eq!(
            check_balance("(1]"),
            Err(BalanceError::Mismatched {
                position: 2,
                expected: ')',
                found: ']'
            })
        );
    }

    #[test]
    fn test_balance_checked_before_characters() {
        // `#` 也非法，但括号错误优先
        let err = tokenize("(#", &Environment::new()).unwrap_err();
        assert!(matches!(err, ExprError::Balance(_)));
    }

    #[test]
    fn test_operators_and_numbers() {
        assert_eq!(
            lex("12+3*45"),
            vec![
                Token::Number(12.0),
                Token::Binary(BinaryOp::Add),
                Token::Number(3.0),
                Token::Binary(BinaryOp::Mul),
                Token::Number(45.0),
            ]
        );
        assert_eq!(
            lex("1/2%3^4"),
            vec![
                Token::Number(1.0),
                Token::Binary(BinaryOp::Div),
                Token::Number(2.0),
                Token::Binary(BinaryOp::Mod),
                Token::Number(3.0),
                Token::Binary(BinaryOp::Pow),
                Token::Number(4.0),
            ]
        );
    }

    #[test]
    fn test_minus_classification() {
        assert_eq!(lex("-5")[0], Token::Unary(UnaryOp::Neg));
        assert_eq!(lex("5-3")[1], Token::Binary(BinaryOp::Sub));
        assert_eq!(lex("(-5)")[1], Token::Unary(UnaryOp::Neg));
        assert_eq!(lex("[-5]")[1], Token::Unary(UnaryOp::Neg));
        assert_eq!(lex("x=-5")[2], Token::Unary(UnaryOp::Neg));
        // 运算符之后的 `-` 仍按减号处理
        assert_eq!(lex("2*-3")[2], Token::Binary(BinaryOp::Sub));
    }

    #[test]
    fn test_brackets_carry_position_priority() {
        let tokens = lex("(1)+{2}");
        assert_eq!(
            tokens[0],
            Token::Open {
                bracket: Bracket::Round,
                priority: 1000
            }
        );
        assert_eq!(tokens[2], Token::Close(Bracket::Round));
        assert_eq!(
            tokens[4],
            Token::Open {
                bracket: Bracket::Curly,
                priority: 1004
            }
        );
        assert_eq!(tokens[6], Token::Close(Bracket::Curly));
    }

    #[test]
    fn test_words() {
        let tokens = lex("sqrt(pi)");
        assert_eq!(tokens[0], Token::Unary(UnaryOp::Sqrt));
        assert_eq!(
            tokens[2],
            Token::Const {
                name: "pi".to_string(),
                value: std::f64::consts::PI
            }
        );
        assert_eq!(lex("x=y"), vec![var("x"), Token::Assign, var("y")]);
    }

    #[test]
    fn test_constant_wins_over_variable() {
        let mut env = Environment::new();
        env.declare("e");
        let tokens = tokenize("e", &env).unwrap();
        assert!(matches!(tokens[0], Token::Const { .. }));
    }

    #[test]
    fn test_declared_variable_is_recognized() {
        let mut env = Environment::new();
        assert!(tokenize("w", &env).is_err());
        env.declare("w");
        assert_eq!(tokenize("w", &env).unwrap(), vec![var("w")]);
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(
            lex("2x"),
            vec![Token::Number(2.0), Token::Binary(BinaryOp::Mul), var("x")]
        );
        assert_eq!(lex("3+12sin(x)")[3], Token::Binary(BinaryOp::Mul));
    }

    #[test]
    fn test_implicit_multiplication_only_digit_before_word() {
        // `x2`、`2(` 不补乘号
        assert_eq!(lex("x2"), vec![var("x"), Token::Number(2.0)]);
        assert_eq!(lex("2(1)")[1], Token::open(Bracket::Round, 1));
    }

    #[test]
    fn test_unknown_character() {
        let err = tokenize("2#3", &Environment::new()).unwrap_err();
        assert_eq!(
            err,
            ExprError::Tokenize(TokenizeError::UnexpectedChar {
                position: 1,
                found: '#'
            })
        );
    }

    #[test]
    fn test_whitespace_is_rejected() {
        let err = tokenize("1 + 2", &Environment::new()).unwrap_err();
        assert!(matches!(
            err,
            ExprError::Tokenize(TokenizeError::UnexpectedChar { found: ' ', .. })
        ));
    }

    #[test]
    fn test_unknown_word() {
        let err = tokenize("2+foo", &Environment::new()).unwrap_err();
        assert_eq!(
            err,
            ExprError::Tokenize(TokenizeError::UnknownWord {
                position: 2,
                word: "foo".to_string()
            })
        );
        // 单词按最长匹配，`sinx` 不会拆成 `sin x`
        assert!(tokenize("sinx", &Environment::new()).is_err());
    }
}
