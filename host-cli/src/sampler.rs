//! # 采样模块
//!
//! 在配置的区间上对编译好的表达式反复求值。
//! 单个采样点求值失败（如 `sqrt(x)` 在负半轴）不会中止整体采样，
//! 该点记为空值。

use expr_runtime::{Expr, Session};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::SamplerConfig;

/// 一个采样点
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub x: f64,
    /// 求值失败时为 `None`
    pub y: Option<f64>,
}

/// 区间内的全部自变量取值
pub fn domain(config: &SamplerConfig) -> impl Iterator<Item = f64> + '_ {
    (0..config.sample_count()).map(move |i| config.lower + config.step * i as f64)
}

/// 对区间内每个点求值
pub fn sample(session: &mut Session, tree: &Expr, config: &SamplerConfig) -> Vec<Sample> {
    let mut failed = 0usize;

    let samples: Vec<Sample> = domain(config)
        .map(|x| match session.evaluate_at(tree, &config.variable, x) {
            Ok(y) => Sample { x, y: Some(y) },
            Err(e) => {
                debug!(x = x, error = %e, "采样点求值失败");
                failed += 1;
                Sample { x, y: None }
            }
        })
        .collect();

    if failed > 0 {
        warn!(
            failed = failed,
            total = samples.len(),
            "部分采样点求值失败，已记为空值"
        );
    }
    samples
}
