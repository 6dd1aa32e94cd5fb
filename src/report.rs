// Rendering of run reports for stdout
//
// csv:  one line per metric, same shape as the rest of the benchmark suite
//       hist,threads,strategy=local,dist=uniform,N=1000,R=16,W=4,seed=1,pad=0,affinity=0,t_gen,0.000123,sec
// text: total counts=<N> then the four phase timings on one line
// json: the serialized RunReport

use crate::engine::RunReport;
use crate::error::HistoError;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "text" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format: {other} (use csv|text|json)")),
        }
    }
}

pub fn render(report: &RunReport, format: OutputFormat) -> Result<String, HistoError> {
    match format {
        OutputFormat::Csv => Ok(render_csv(report)),
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => Ok(serde_json::to_string(report)?),
    }
}

fn csv_prefix(report: &RunReport) -> String {
    let c = &report.config;
    format!(
        "hist,{},strategy={},dist={},N={},R={},W={},seed={},pad={},affinity={}",
        c.scheduler,
        c.strategy,
        c.distribution,
        c.elements,
        c.range,
        c.workers,
        c.seed,
        u8::from(c.padded),
        u8::from(c.affinity)
    )
}

pub fn render_csv(report: &RunReport) -> String {
    let prefix = csv_prefix(report);
    let t = &report.timings;
    let mut out = String::new();

    for (metric, value) in [
        ("t_gen", t.generation),
        ("t_count", t.counting),
        ("t_merge", t.merge),
        ("total", t.total),
    ] {
        out.push_str(&format!("{prefix},{metric},{:.6},sec\n", value.as_secs_f64()));
    }
    out.push_str(&format!("{prefix},checksum,{},count\n", report.checksum));
    out.push_str(&format!("{prefix},correct,{},boolean\n", u8::from(report.is_consistent())));
    out
}

pub fn render_text(report: &RunReport) -> String {
    let t = &report.timings;
    format!(
        "total counts={}\nt_gen={:.6} t_count={:.6} t_merge={:.6} total={:.6}\n",
        report.checksum,
        t.generation.as_secs_f64(),
        t.counting.as_secs_f64(),
        t.merge.as_secs_f64(),
        t.total.as_secs_f64()
    )
}
