//! # Host CLI
//!
//! 表达式采样工具：读入一个表达式，在数值区间上反复求值，输出采样点。
//!
//! ```text
//! 表达式 ──► Session::compile ──► Expr ──► sample(区间) ──► render(table/json)
//! ```
//!
//! ## 模块结构
//!
//! - [`config`]：配置文件与命令行覆盖
//! - [`sampler`]：区间采样
//! - [`render`]：输出

pub mod config;
pub mod render;
pub mod sampler;

pub use config::{ConfigError, OutputFormat, Overrides, SamplerConfig};
pub use render::render;
pub use sampler::{Sample, domain, sample};
