use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;

use entree::TestDecisionTree;
use entree::evaluation::Snapshot;
use entree::tasks::{ClassifyTask, HoldoutEvaluator, TrainTask};
use entree::ui::cli::args::{ClassifyArgs, Cli, Command, EvaluateArgs, SchemaKind, TrainArgs};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GREEN: &str = "\x1b[32m";
const FG_MAGENTA: &str = "\x1b[35m";
const FG_BLUE: &str = "\x1b[34m";
const FG_GREY: &str = "\x1b[90m";

const RULE: &str = "────────────────────────────────────────────────────────────────────────";

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Train(args) => train(args),
        Command::Classify(args) => classify(args),
        Command::Evaluate(args) => evaluate(args),
        Command::Inspect(args) => inspect(&args.model),
        Command::Schema(args) => schema(args.kind),
    }
}

fn header_lines(title: &str, detail: String) -> Vec<String> {
    vec![
        format!("{BOLD}{FG_CYAN}▶ {title}{RESET}"),
        format!("{DIM}{detail}{RESET}  {}", timestamp_now()),
        format!("{FG_GREY}{RULE}{RESET}"),
    ]
}

fn train(args: TrainArgs) -> Result<()> {
    let config = args
        .config
        .load()
        .context("failed to load training configuration")?;
    for line in header_lines(
        "Train",
        format!(
            "entropy_threshold={}  score_threshold={}",
            config.entropy_threshold, config.score_threshold
        ),
    ) {
        println!("{line}");
    }

    let report = TrainTask::new(args.input, args.output.clone(), config)
        .run()
        .context("training failed")?;

    println!(
        "{FG_GREEN}{BOLD}items{RESET} {:>7}  \
         {FG_CYAN}{BOLD}weight{RESET} {:>9.3}  \
         {FG_MAGENTA}{BOLD}nodes{RESET} {:>5} {DIM}({} tests, {} leaves, depth {}){RESET}  \
         {DIM}t{RESET} {:>7.6}s",
        report.items,
        report.weight,
        report.stats.nodes,
        report.stats.tests,
        report.stats.leaves,
        report.stats.depth,
        report.cpu_seconds
    );
    println!(
        "{FG_BLUE}goal{RESET} {}  {DIM}saved to{RESET} {}",
        report.goal,
        args.output.display()
    );
    Ok(())
}

fn classify(args: ClassifyArgs) -> Result<()> {
    let to_stdout = args.output.is_none();
    let report = ClassifyTask::new(args.model, args.input, args.output, args.format)
        .run()
        .context("classification failed")?;

    // Predictions may own stdout; the summary goes to stderr then.
    let summary = match &report.evaluation {
        Some(snapshot) => format!(
            "{FG_GREEN}{BOLD}predicted{RESET} {:>7}  {}",
            report.predictions,
            format_status(snapshot)
        ),
        None => format!(
            "{FG_GREEN}{BOLD}predicted{RESET} {:>7}  {DIM}(no goal column to score against){RESET}",
            report.predictions
        ),
    };
    if to_stdout {
        eprintln!("{summary}");
    } else {
        println!("{summary}");
    }
    Ok(())
}

fn evaluate(args: EvaluateArgs) -> Result<()> {
    let config = args
        .config
        .load()
        .context("failed to load training configuration")?;
    for line in header_lines(
        "Holdout Evaluation",
        format!(
            "holdout_fraction={}  seed={}",
            config.holdout_fraction, config.seed
        ),
    ) {
        println!("{line}");
    }

    let report = HoldoutEvaluator::new(args.input, config)
        .run()
        .context("evaluation failed")?;

    println!(
        "{DIM}train{RESET} {}  {DIM}test{RESET} {}  {DIM}nodes{RESET} {}  {DIM}depth{RESET} {}",
        report.train_items, report.test_items, report.stats.nodes, report.stats.depth
    );
    println!("{}", format_status(&report.snapshot));
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let model = TestDecisionTree::load(path)
        .with_context(|| format!("failed to load model {}", path.display()))?;
    let meta = model.metadata();
    let stats = model.stats();

    for line in header_lines("Model", path.display().to_string()) {
        println!("{line}");
    }
    println!("{FG_BLUE}{BOLD}goal{RESET} {}", model.goal_attribute().name());
    if let Some(at) = &meta.trained_at {
        println!("{DIM}trained at{RESET} {at}");
    }
    if let (Some(e), Some(s)) = (meta.entropy_threshold, meta.score_threshold) {
        println!("{DIM}entropy_threshold{RESET} {e}  {DIM}score_threshold{RESET} {s}");
    }
    if let Some(w) = meta.training_weight {
        println!("{DIM}training weight{RESET} {w:.3}");
    }
    print!("{}", model.attribute_set());
    println!(
        "{FG_MAGENTA}{BOLD}nodes{RESET} {}  {DIM}tests{RESET} {}  {DIM}leaves{RESET} {}  {DIM}open{RESET} {}  {DIM}depth{RESET} {}",
        stats.nodes, stats.tests, stats.leaves, stats.open, stats.depth
    );
    println!("{FG_GREY}{RULE}{RESET}");
    print!("{}", &*model);
    Ok(())
}

fn schema(kind: SchemaKind) -> Result<()> {
    let json = serde_json::to_string_pretty(&kind.schema())
        .with_context(|| format!("failed to render {kind} schema"))?;
    println!("{json}");
    Ok(())
}

fn format_status(s: &Snapshot) -> String {
    let mut line = format!(
        "{FG_GREEN}{BOLD}seen{RESET} {:>9}  \
         {FG_CYAN}{BOLD}acc{RESET} {:>7}% \
         {FG_MAGENTA}{BOLD}κ{RESET} {:>7}%  \
         {DIM}t{RESET} {:>7.6}s",
        s.items_seen,
        fmtf(s.accuracy * 100.0, 3),
        fmtf(s.kappa * 100.0, 3),
        s.seconds
    );
    if s.items_skipped > 0 {
        line.push_str(&format!("  {DIM}skipped{RESET} {}", s.items_skipped));
    }
    line
}

fn fmtf(x: f64, prec: usize) -> String {
    if x.is_nan() {
        format!("{DIM}NaN{RESET}")
    } else {
        format!("{:>1$.prec$}", x, 6, prec = prec)
    }
}

fn timestamp_now() -> String {
    use chrono::{Local, SecondsFormat};
    let now = Local::now();
    format!(
        "{DIM}{}{}",
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
        RESET
    )
}
