use std::fmt::Write as _;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use kubepeek_core::StatusLabel;
use kubepeek_ingest::ParseOptions;
use kubepeek_report::{build_report_with, Report, ReportBuilder};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "kubepeek", version, about = "Summarize `kubectl get ... -o yaml` output")]
struct Cli {
    /// YAML stream to read; `-` reads stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t = Output::Human)]
    output: Output,

    /// Refuse inputs larger than this many bytes
    #[arg(long = "max-bytes", env = "KUBEPEEK_MAX_YAML_BYTES", default_value_t = 64 * 1024 * 1024)]
    max_bytes: usize,

    /// Drop `kind: List` items that have no kind of their own
    #[arg(long = "strict-items", env = "KUBEPEEK_STRICT_ITEMS", action = ArgAction::SetTrue)]
    strict_items: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Output { Human, Json }

fn init_tracing() {
    let env = std::env::var("KUBEPEEK_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env).unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr).init();
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn check_input(blob: &str, max_bytes: usize) -> Result<()> {
    if blob.len() > max_bytes {
        bail!("input too large ({} bytes > {} byte limit)", blob.len(), max_bytes);
    }
    if blob.trim().is_empty() {
        bail!("no data in input");
    }
    Ok(())
}

fn render_human(report: &Report) -> String {
    let mut out = String::new();
    let mut tally = [0usize; 4];
    for v in &report.resources {
        let slot = match v.status {
            StatusLabel::Running => 0,
            StatusLabel::Pending => 1,
            StatusLabel::Failed => 2,
            StatusLabel::Unknown => 3,
        };
        tally[slot] += 1;
    }
    let _ = writeln!(
        out,
        "resources: {}  kinds: {}  namespaces: {}  (running {} / pending {} / failed {} / unknown {})",
        report.total_resources,
        report.kind_stats.len(),
        report.namespace_count,
        tally[0], tally[1], tally[2], tally[3]
    );
    for ks in &report.kind_stats {
        let _ = writeln!(out, "  {:<24} {}", ks.kind, ks.count);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<20} {:<16} {:<40} {:<8} {}", "KIND", "NAMESPACE", "NAME", "STATUS", "AGE");
    for v in &report.resources {
        let ns = if v.namespace.is_empty() { "-" } else { v.namespace.as_str() };
        let _ = writeln!(out, "{:<20} {:<16} {:<40} {:<8} {}", v.kind, ns, v.name, v.status, v.age);
    }
    out
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let blob = read_input(&cli.input)?;
    check_input(&blob, cli.max_bytes)?;

    let opts = ParseOptions { require_item_kind: cli.strict_items };
    let builder = ReportBuilder::new().source(cli.input.display().to_string());
    let report = build_report_with(&blob, opts, &builder);
    if report.total_resources == 0 {
        warn!("input contained no Kubernetes resources");
    }
    info!(
        resources = report.total_resources,
        kinds = report.kind_stats.len(),
        namespaces = report.namespace_count,
        "report ready"
    );

    match cli.output {
        Output::Human => print!("{}", render_human(&report)),
        Output::Json => println!("{}", report.to_json_pretty().context("encoding report as JSON")?),
    }
    Ok(())
}
