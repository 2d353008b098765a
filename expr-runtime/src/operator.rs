//! # 运算符模块
//!
//! 运算符是封闭枚举，优先级固定，求值通过纯函数 [`BinaryOp::apply`] /
//! [`UnaryOp::apply`] 分派。
//!
//! ## 优先级
//!
//! | 运算符 | 优先级 |
//! |--------|--------|
//! | `=`    | 0      |
//! | `+ -`  | 1      |
//! | `* / %`| 2      |
//! | `^`、取负 | 3   |
//! | 函数   | 4      |
//!
//! 数值越小结合越松（递归解析器先在它上面拆分）。

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// 赋值号的优先级
pub const ASSIGN_PRIORITY: u32 = 0;

/// 括号的基础优先级，只作为扫描屏障，远高于任何运算符
pub const BRACKET_PRIORITY: u32 = 1000;

/// 二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinaryOp {
    /// 由单个字符识别运算符（`-` 另行处理，见 tokenizer）
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            '%' => Some(Self::Mod),
            '^' => Some(Self::Pow),
            _ => None,
        }
    }

    pub fn priority(self) -> u32 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div | Self::Mod => 2,
            Self::Pow => 3,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^",
        }
    }

    /// 对两个操作数求值
    ///
    /// 除以零返回 `0`，不报错。
    pub fn apply(self, left: f64, right: f64) -> Result<f64, EvalError> {
        match self {
            Self::Add => Ok(left + right),
            Self::Sub => Ok(left - right),
            Self::Mul => Ok(left * right),
            Self::Div => Ok(if right == 0.0 { 0.0 } else { left / right }),
            Self::Mod => {
                if right == 0.0 {
                    return Err(self.domain(format!("{left} % 0")));
                }
                // 向下取整的取模：结果与除数同号
                let rem = left % right;
                if rem != 0.0 && (rem < 0.0) != (right < 0.0) {
                    Ok(rem + right)
                } else {
                    Ok(rem)
                }
            }
            Self::Pow => {
                if left == 0.0 && right < 0.0 {
                    return Err(self.domain(format!("0 ^ {right}")));
                }
                let value = left.powf(right);
                if value.is_nan() {
                    return Err(self.domain(format!("{left} ^ {right}")));
                }
                Ok(value)
            }
        }
    }

    fn domain(self, detail: String) -> EvalError {
        EvalError::Domain {
            operator: self.symbol(),
            detail,
        }
    }
}

/// 一元运算符（取负与内置函数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Neg,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Ln,
    Log,
}

impl UnaryOp {
    /// 按函数名查找，`Neg` 没有名字
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sqrt" => Some(Self::Sqrt),
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tan" => Some(Self::Tan),
            "ln" => Some(Self::Ln),
            "log" => Some(Self::Log),
            _ => None,
        }
    }

    pub fn priority(self) -> u32 {
        match self {
            Self::Neg => 3,
            _ => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Neg => "neg",
            Self::Sqrt => "sqrt",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Ln => "ln",
            Self::Log => "log",
        }
    }

    /// 对操作数求值，定义域之外返回 [`EvalError::Domain`]
    pub fn apply(self, value: f64) -> Result<f64, EvalError> {
        match self {
            Self::Neg => Ok(-value),
            Self::Sqrt => {
                if value < 0.0 {
                    return Err(self.domain(value));
                }
                Ok(value.sqrt())
            }
            Self::Sin | Self::Cos | Self::Tan => {
                if value.is_infinite() {
                    return Err(self.domain(value));
                }
                Ok(match self {
                    Self::Sin => value.sin(),
                    Self::Cos => value.cos(),
                    _ => value.tan(),
                })
            }
            Self::Ln | Self::Log => {
                if value <= 0.0 {
                    return Err(self.domain(value));
                }
                Ok(if self == Self::Ln {
                    value.ln()
                } else {
                    value.log10()
                })
            }
        }
    }

    fn domain(self, value: f64) -> EvalError {
        EvalError::Domain {
            operator: self.name(),
            detail: format!("{}({value})", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priorities() {
        assert_eq!(BinaryOp::Add.priority(), 1);
        assert_eq!(BinaryOp::Sub.priority(), 1);
        assert_eq!(BinaryOp::Mul.priority(), 2);
        assert_eq!(BinaryOp::Div.priority(), 2);
        assert_eq!(BinaryOp::Mod.priority(), 2);
        assert_eq!(BinaryOp::Pow.priority(), 3);
        assert_eq!(UnaryOp::Neg.priority(), 3);
        assert_eq!(UnaryOp::Sqrt.priority(), 4);
        assert!(ASSIGN_PRIORITY < BinaryOp::Add.priority());
        assert!(BRACKET_PRIORITY > UnaryOp::Log.priority());
    }

    #[test]
    fn test_division_by_zero_is_zero() {
        assert_eq!(BinaryOp::Div.apply(4.0, 0.0).unwrap(), 0.0);
        assert_eq!(BinaryOp::Div.apply(-4.0, 0.0).unwrap(), 0.0);
        assert_eq!(BinaryOp::Div.apply(9.0, 2.0).unwrap(), 4.5);
    }

    #[test]
    fn test_modulo_is_floored() {
        assert_eq!(BinaryOp::Mod.apply(7.0, 3.0).unwrap(), 1.0);
        assert_eq!(BinaryOp::Mod.apply(-7.0, 3.0).unwrap(), 2.0);
        assert_eq!(BinaryOp::Mod.apply(7.0, -3.0).unwrap(), -2.0);
        assert_eq!(BinaryOp::Mod.apply(6.0, 3.0).unwrap(), 0.0);
        assert!(matches!(
            BinaryOp::Mod.apply(1.0, 0.0),
            Err(EvalError::Domain { operator: "%", .. })
        ));
    }

    #[test]
    fn test_power_domain() {
        assert_eq!(BinaryOp::Pow.apply(2.0, 10.0).unwrap(), 1024.0);
        assert_eq!(BinaryOp::Pow.apply(4.0, 0.5).unwrap(), 2.0);
        assert!(BinaryOp::Pow.apply(0.0, -1.0).is_err());
        assert!(BinaryOp::Pow.apply(-8.0, 0.5).is_err());
    }

    #[test]
    fn test_unary_domain() {
        assert_eq!(UnaryOp::Sqrt.apply(16.0).unwrap(), 4.0);
        assert!(UnaryOp::Sqrt.apply(-1.0).is_err());
        assert!(UnaryOp::Ln.apply(0.0).is_err());
        assert!(UnaryOp::Log.apply(-10.0).is_err());
        assert!((UnaryOp::Log.apply(1000.0).unwrap() - 3.0).abs() < 1e-12);
        assert!((UnaryOp::Ln.apply(std::f64::consts::E).unwrap() - 1.0).abs() < 1e-12);
        assert!(UnaryOp::Sin.apply(f64::INFINITY).is_err());
        assert_eq!(UnaryOp::Neg.apply(5.0).unwrap(), -5.0);
    }

    #[test]
    fn test_lookup_tables() {
        assert_eq!(BinaryOp::from_char('^'), Some(BinaryOp::Pow));
        assert_eq!(BinaryOp::from_char('#'), None);
        assert_eq!(UnaryOp::from_name("cos"), Some(UnaryOp::Cos));
        assert_eq!(UnaryOp::from_name("neg"), None);
        assert_eq!(UnaryOp::from_name("exp"), None);
    }
}
