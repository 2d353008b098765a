//! # Config 模块
//!
//! 采样工具配置，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (JSON)
//! 3. 默认值（最低）

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use expr_runtime::{CompileOptions, Strategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// 单次运行允许的最大采样点数
pub const MAX_SAMPLES: usize = 1_000_000;

/// 输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 制表符分隔的两列文本
    #[default]
    Table,
    /// JSON 数组
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("未知输出格式 '{other}'，可选: table, json")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Json => "json",
        })
    }
}

/// 采样配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// 区间下界（包含）
    #[serde(default = "default_lower")]
    pub lower: f64,

    /// 区间上界（不包含）
    #[serde(default = "default_upper")]
    pub upper: f64,

    /// 采样步长
    #[serde(default = "default_step")]
    pub step: f64,

    /// 自变量名
    #[serde(default = "default_variable")]
    pub variable: String,

    /// 编译选项
    #[serde(default = "default_compile_options")]
    pub compile: CompileOptions,

    /// 输出格式
    #[serde(default)]
    pub format: OutputFormat,

    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_lower() -> f64 {
    -100.0
}

fn default_upper() -> f64 {
    100.0
}

fn default_step() -> f64 {
    1.0
}

fn default_variable() -> String {
    "x".to_string()
}

/// 命令行输入通常带空格，默认去除
fn default_compile_options() -> CompileOptions {
    CompileOptions {
        strategy: Strategy::default(),
        strip_whitespace: true,
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            lower: default_lower(),
            upper: default_upper(),
            step: default_step(),
            variable: default_variable(),
            compile: default_compile_options(),
            format: OutputFormat::default(),
            log_level: default_log_level(),
        }
    }
}

/// 命令行覆盖项，`None` 表示沿用配置文件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub step: Option<f64>,
    pub variable: Option<String>,
    pub strategy: Option<Strategy>,
    pub format: Option<OutputFormat>,
    pub log_level: Option<String>,
}

impl SamplerConfig {
    /// 从文件加载配置
    ///
    /// 文件不存在时使用默认配置；内容无法解析时返回错误。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = ?path, "配置文件不存在，使用默认配置");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 从命令行指定的文件加载配置
    ///
    /// 此时日志尚未初始化，文件不存在直接返回错误，而不是静默使用默认配置。
    pub fn load_required(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::Io(format!(
                "配置文件不存在: {}",
                path.display()
            )));
        }
        Self::load(path)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialization(e.to_string()))?;
        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// 应用命令行覆盖项
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(lower) = overrides.lower {
            self.lower = lower;
        }
        if let Some(upper) = overrides.upper {
            self.upper = upper;
        }
        if let Some(step) = overrides.step {
            self.step = step;
        }
        if let Some(variable) = overrides.variable {
            self.variable = variable;
        }
        if let Some(strategy) = overrides.strategy {
            self.compile.strategy = strategy;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
    }

    /// 采样点数量
    pub fn sample_count(&self) -> usize {
        if self.step <= 0.0 || self.upper <= self.lower {
            return 0;
        }
        // 上界不包含
        let span = (self.upper - self.lower) / self.step;
        let count = span.ceil();
        if count >= MAX_SAMPLES as f64 {
            MAX_SAMPLES + 1
        } else {
            count as usize
        }
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.lower.is_finite() || !self.upper.is_finite() {
            return Err(ConfigError::Validation("区间边界必须是有限数".to_string()));
        }

        if self.lower >= self.upper {
            return Err(ConfigError::Validation(format!(
                "下界 {} 必须小于上界 {}",
                self.lower, self.upper
            )));
        }

        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ConfigError::Validation(format!(
                "步长必须为正数，实际为 {}",
                self.step
            )));
        }

        if self.sample_count() > MAX_SAMPLES {
            return Err(ConfigError::Validation(format!(
                "采样点过多，最多 {MAX_SAMPLES} 个"
            )));
        }

        if self.variable.is_empty() || !self.variable.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Validation(format!(
                "自变量名只能由字母组成，实际为 '{}'",
                self.variable
            )));
        }

        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::Validation(format!(
                "未知日志级别 '{}'",
                self.log_level
            )));
        }

        Ok(())
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    Serialization(String),

    /// 解析失败
    #[error("配置解析失败: {0}")]
    Parse(String),

    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    Validation(String),
}
