use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vmassess_core::config::Config;
use vmassess_core::history::History;
use vmassess_core::report::{commas, money, AnalysisResult};
use vmassess_core::sample::{sample_inventory, write_inventory_csv, Template};
use vmassess_core::types::OsStatus;
use vmassess_core::{analyze_file, AnalyzeOptions};

#[derive(Parser, Debug)]
#[command(
    name = "vmassess",
    version,
    about = "VM inventory migration assessment (estimated)"
)]
struct Cli {
    /// Emit log events as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(visible_alias = "analyse")]
    Analyze {
        #[arg(long)]
        input: PathBuf,

        #[arg(long, default_value = "vmassess-out")]
        out: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "all")]
        output_format: OutputFormat,

        /// Worksheet to read from a spreadsheet inventory.
        #[arg(long)]
        sheet: Option<String>,

        #[arg(long)]
        history: Option<PathBuf>,

        #[arg(long)]
        no_history: bool,
    },
    /// List recorded assessments, newest first.
    History {
        #[arg(long)]
        history: Option<PathBuf>,

        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write a demo inventory CSV.
    Sample {
        #[arg(long, default_value_t = 50)]
        count: usize,

        #[arg(long, default_value = "sample-inventory.csv")]
        out: PathBuf,
    },
    /// Write a blank inventory template CSV.
    Template {
        #[arg(long, default_value = "rvtools")]
        kind: TemplateKind,

        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
    Csv,
    All,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum TemplateKind {
    Rvtools,
    Vmware,
    Manual,
}

impl From<TemplateKind> for Template {
    fn from(kind: TemplateKind) -> Self {
        match kind {
            TemplateKind::Rvtools => Template::RvTools,
            TemplateKind::Vmware => Template::Vmware,
            TemplateKind::Manual => Template::Manual,
        }
    }
}

struct Style {
    bold: &'static str,
    dim: &'static str,
    red: &'static str,
    green: &'static str,
    yellow: &'static str,
    orange: &'static str,
    reset: &'static str,
}

const COLOR: Style = Style {
    bold: "\x1b[1m",
    dim: "\x1b[2m",
    red: "\x1b[31m",
    green: "\x1b[32m",
    yellow: "\x1b[33m",
    orange: "\x1b[38;5;208m",
    reset: "\x1b[0m",
};

const PLAIN: Style = Style {
    bold: "",
    dim: "",
    red: "",
    green: "",
    yellow: "",
    orange: "",
    reset: "",
};

fn style() -> &'static Style {
    if std::env::var_os("NO_COLOR").is_some() {
        &PLAIN
    } else {
        &COLOR
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(std::env::var_os("NO_COLOR").is_none()),
            )
            .init();
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let res = match cli.cmd {
        Commands::Analyze {
            input,
            out,
            config,
            output_format,
            sheet,
            history,
            no_history,
        } => {
            let cfg = load_config(config.as_deref());
            let history = (!no_history).then(|| history.unwrap_or_else(|| cfg.history_path()));
            let mut opts = AnalyzeOptions::from_config(&cfg);
            opts.sheet = sheet.or(opts.sheet);
            run_analyze(
                &input,
                &out,
                &opts,
                &output_format,
                history.as_deref(),
                cfg.history_limit(),
            )
        }
        Commands::History {
            history,
            limit,
            config,
        } => {
            let cfg = load_config(config.as_deref());
            let path = history.unwrap_or_else(|| cfg.history_path());
            run_history(&path, limit.unwrap_or_else(|| cfg.history_limit()))
        }
        Commands::Sample { count, out } => run_sample(count, &out),
        Commands::Template { kind, out } => run_template(kind.into(), out.as_deref()),
    };

    match res {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            let s = style();
            eprintln!(
                "{}{red}error:{reset} {:#}",
                s.bold,
                e,
                red = s.red,
                reset = s.reset
            );
            std::process::ExitCode::from(1)
        }
    }
}

fn print_banner() {
    let s = style();
    eprintln!(
        "\n  {bold}vm{reset}{orange}|{reset}{dim}assess{reset}  {dim}migration assessment{reset}\n",
        bold = s.bold,
        orange = s.orange,
        dim = s.dim,
        reset = s.reset,
    );
}

fn readiness_color(cloud_ready: i64) -> &'static str {
    let s = style();
    if cloud_ready >= 70 {
        s.green
    } else if cloud_ready >= 40 {
        s.yellow
    } else {
        s.red
    }
}

fn status_color(status: OsStatus) -> &'static str {
    let s = style();
    match status {
        OsStatus::Eol => s.red,
        OsStatus::Extended => s.yellow,
        OsStatus::Active => s.green,
        OsStatus::Unknown => s.dim,
    }
}

fn print_metric(label: &str, value: &str, color: &str) {
    let s = style();
    eprintln!(
        "  {dim}{:<18}{reset}{color}{bold}{}{reset}",
        label,
        value,
        dim = s.dim,
        bold = s.bold,
        color = color,
        reset = s.reset
    );
}

fn print_result(result: &AnalysisResult, written: &[PathBuf]) {
    let s = style();
    let sm = &result.summary;
    let c = &result.costs;
    let f = &result.funding;

    print_metric("total_vms", &commas(sm.total_vms as u64), "");
    print_metric(
        "cloud_ready",
        &format!("{}%", sm.cloud_ready),
        readiness_color(sm.cloud_ready),
    );
    print_metric("current_monthly", &money(c.current), "");
    print_metric("aws_byol", &money(c.aws_byol), "");
    print_metric(
        "savings",
        &format!("{} ({}%)", money(c.savings), c.savings_percent),
        s.green,
    );
    print_metric("total_funding", &money(f.total_funding), "");
    print_metric("net_year1", &money(f.net_year1), "");

    eprintln!();
    for status in [
        OsStatus::Eol,
        OsStatus::Extended,
        OsStatus::Active,
        OsStatus::Unknown,
    ] {
        let n = sm.os_count(status);
        if n > 0 {
            print_metric(status.as_str(), &n.to_string(), status_color(status));
        }
    }

    if !sm.critical_servers.is_empty() {
        eprintln!();
        for server in &sm.critical_servers {
            let vm = &server.vm;
            eprintln!(
                "  {sc}{:<8}{reset}  {}  {dim}{} -> {}{reset}",
                server.priority.to_string(),
                vm.record.name,
                vm.record.os,
                vm.strategy,
                sc = status_color(vm.os_status),
                dim = s.dim,
                reset = s.reset
            );
        }
    }

    eprintln!();
    for path in written {
        eprintln!(
            "  {dim}\u{2192} {}{reset}",
            path.display(),
            dim = s.dim,
            reset = s.reset
        );
    }
    eprintln!();
}

fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(p) => Config::load(p).unwrap_or_else(|e| {
            eprintln!(
                "{}{}warning:{} failed to load config {}: {:#}",
                style().bold,
                style().yellow,
                style().reset,
                p.display(),
                e
            );
            Config::default()
        }),
        None => {
            let cfg = Config::discover();
            tracing::debug!(found = cfg.is_some(), "config discovery");
            cfg.unwrap_or_default()
        }
    }
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> anyhow::Result<PathBuf> {
    std::fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(path.to_path_buf())
}

fn run_analyze(
    input: &Path,
    out: &Path,
    opts: &AnalyzeOptions,
    output_format: &OutputFormat,
    history: Option<&Path>,
    history_limit: usize,
) -> anyhow::Result<()> {
    print_banner();

    let result = analyze_file(input, opts)?;
    tracing::debug!(input = %input.display(), out = %out.display(), "analysis finished");

    std::fs::create_dir_all(out).with_context(|| format!("create out dir {}", out.display()))?;

    let write_json = matches!(output_format, OutputFormat::Json | OutputFormat::All);
    let write_md = matches!(output_format, OutputFormat::Markdown | OutputFormat::All);
    let write_csv = matches!(output_format, OutputFormat::Csv | OutputFormat::All);

    let mut written = Vec::new();
    if write_json {
        let json = serde_json::to_vec_pretty(&result).context("serialize assessment json")?;
        written.push(write_file(&out.join("assessment.json"), json)?);
    }
    if write_md {
        written.push(write_file(&out.join("assessment.md"), result.to_markdown())?);
    }
    if write_csv {
        written.push(write_file(
            &out.join("vm_details.csv"),
            result.vm_details_csv()?,
        )?);
    }

    if let Some(path) = history {
        let mut h = History::load(path, history_limit)?;
        h.record(&result);
        h.save(path)?;
        tracing::debug!(path = %path.display(), entries = h.len(), "history updated");
        written.push(path.to_path_buf());
    }

    // Machine-parseable line on stdout
    println!(
        "total_vms={} critical_eol={} cloud_ready={} savings_percent={} funding_coverage={}",
        result.summary.total_vms,
        result.summary.critical_eol,
        result.summary.cloud_ready,
        result.costs.savings_percent,
        result.funding.coverage
    );

    print_result(&result, &written);
    Ok(())
}

fn run_history(path: &Path, limit: usize) -> anyhow::Result<()> {
    let history = History::load(path, limit)?;
    if history.is_empty() {
        let s = style();
        eprintln!(
            "  {dim}no assessments recorded in {}{reset}",
            path.display(),
            dim = s.dim,
            reset = s.reset
        );
        return Ok(());
    }
    for entry in history.entries() {
        println!(
            "id={} date={} total_vms={} critical_eol={} funding_coverage={}",
            entry.id,
            entry.timestamp.format("%Y-%m-%d"),
            entry.summary.total_vms,
            entry.summary.critical_eol,
            entry.funding.coverage
        );
    }
    Ok(())
}

fn run_sample(count: usize, out: &Path) -> anyhow::Result<()> {
    write_inventory_csv(out, &sample_inventory(count))?;
    let s = style();
    eprintln!(
        "  {green}wrote {} sample VMs{reset} {dim}\u{2192} {}{reset}",
        count,
        out.display(),
        green = s.green,
        dim = s.dim,
        reset = s.reset
    );
    Ok(())
}

fn run_template(template: Template, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            let f = std::fs::File::create(path)
                .with_context(|| format!("create {}", path.display()))?;
            template.write_csv(f)
        }
        None => template.write_csv(std::io::stdout().lock()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn readiness_color_thresholds() {
        assert_eq!(readiness_color(85), style().green);
        assert_eq!(readiness_color(40), style().yellow);
        assert_eq!(readiness_color(17), style().red);
    }

    #[test]
    fn status_color_by_lifecycle() {
        assert_eq!(status_color(OsStatus::Eol), style().red);
        assert_eq!(status_color(OsStatus::Extended), style().yellow);
        assert_eq!(status_color(OsStatus::Active), style().green);
        assert_eq!(status_color(OsStatus::Unknown), style().dim);
    }

    #[test]
    fn template_kind_maps_to_template() {
        assert_eq!(Template::from(TemplateKind::Vmware), Template::Vmware);
        assert_eq!(Template::from(TemplateKind::Rvtools), Template::RvTools);
    }

    #[test]
    #[serial]
    fn style_respects_no_color() {
        std::env::set_var("NO_COLOR", "1");
        assert_eq!(style().bold, "");
        std::env::remove_var("NO_COLOR");
        assert_ne!(style().bold, "");
    }

    #[test]
    #[serial]
    fn unreadable_config_falls_back_to_defaults() {
        let cfg = load_config(Some(Path::new("does-not-exist.toml")));
        assert_eq!(cfg.history_limit(), 10);
        assert!(cfg.sheet.is_none());
    }
}
