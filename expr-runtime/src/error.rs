//! # Error 模块
//!
//! 定义 expr-runtime 中使用的错误类型。
//!
//! 错误按阶段划分：括号检查 → 词法 → 语法 → 求值。
//! 任一阶段失败都会立即中止整个调用，不做局部恢复。

use thiserror::Error;

/// 括号平衡错误
///
/// 在词法分析之前对整段文本检查，位置均为字符下标。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BalanceError {
    /// 右括号前没有任何未闭合的左括号
    #[error("位置 {position}：多余的右括号 '{found}'")]
    UnexpectedClose { position: usize, found: char },

    /// 右括号与最近一个左括号类型不一致
    #[error("位置 {position}：期望 '{expected}'，实际为 '{found}'")]
    Mismatched {
        position: usize,
        expected: char,
        found: char,
    },

    /// 文本结束时仍有左括号未闭合
    #[error("位置 {position}：左括号 '{open}' 未闭合")]
    Unclosed { position: usize, open: char },
}

/// 词法错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenizeError {
    /// 无法识别的字符
    #[error("位置 {position}：无法识别的字符 '{found}'")]
    UnexpectedChar { position: usize, found: char },

    /// 既不是常量、已声明变量，也不是函数名的单词
    #[error("位置 {position}：未知标识符 '{word}'")]
    UnknownWord { position: usize, word: String },
}

/// 语法错误
///
/// 出现在解析器的决策点上，通常意味着 token 序列的结构不完整。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// 需要一个子表达式，但 token 区间为空
    #[error("缺少操作数（空的子表达式）")]
    EmptySpan,

    /// 在当前位置出现了不该出现的 token
    #[error("意外的 token '{token}'")]
    UnexpectedToken { token: String },

    /// 区间内没有可拆分的顶层运算符
    #[error("无法拆分的表达式片段 '{fragment}'")]
    NoOperator { fragment: String },

    /// 赋值号左侧不是单个变量
    #[error("赋值目标必须是单个变量，实际为 '{target}'")]
    InvalidAssignTarget { target: String },

    /// 运算符缺少操作数
    #[error("运算符 '{operator}' 缺少操作数")]
    MissingOperand { operator: String },

    /// 组装结束时剩余操作数数量不是 1
    #[error("表达式组装后剩余 {count} 个操作数，期望 1 个")]
    DanglingOperands { count: usize },
}

/// 求值错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// 变量未声明或未绑定
    #[error("变量 '{name}' 未定义")]
    UndefinedReference { name: String },

    /// 运算超出数学定义域
    #[error("'{operator}' 超出定义域: {detail}")]
    Domain {
        operator: &'static str,
        detail: String,
    },

    /// 变量的绑定直接或间接引用了自身
    #[error("变量 '{name}' 存在循环引用")]
    CyclicReference { name: String },
}

/// expr-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// 括号错误
    #[error("括号错误: {0}")]
    Balance(#[from] BalanceError),

    /// 词法错误
    #[error("词法错误: {0}")]
    Tokenize(#[from] TokenizeError),

    /// 语法错误
    #[error("语法错误: {0}")]
    Parse(#[from] ParseError),

    /// 求值错误
    #[error("求值错误: {0}")]
    Eval(#[from] EvalError),
}

/// Result 类型别名
pub type ExprResult<T> = Result<T, ExprError>;
