//! # 输出模块
//!
//! 把采样点写成文本表格或 JSON。

use std::io::{self, Write};

use crate::config::OutputFormat;
use crate::sampler::Sample;

/// 按格式输出采样点
pub fn render(samples: &[Sample], format: OutputFormat, out: &mut impl Write) -> io::Result<()> {
    match format {
        OutputFormat::Table => render_table(samples, out),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, samples)?;
            writeln!(out)
        }
    }
}

/// 制表符分隔，失败的点 y 列留空
fn render_table(samples: &[Sample], out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "x\ty")?;
    for sample in samples {
        match sample.y {
            Some(y) => writeln!(out, "{}\t{}", sample.x, y)?,
            None => writeln!(out, "{}\t", sample.x)?,
        }
    }
    Ok(())
}
