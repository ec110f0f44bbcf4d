mod logic;
mod util;

use anyhow::{Context, Result, bail};
use boardroom_game::{GameEngine, ScenarioKey, StaticCatalogLoader};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{Driver, GameTester, RunPlan, ScenarioResult, Strategy, Track, resolve_seed_inputs};
use util::{split_csv, wants_all};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    /// Five-level stock price walk
    Ticker,
    /// Industry/crisis storylines scored on four dimensions
    Scorecard,
    /// Both games
    Both,
}

impl VariantArg {
    const fn includes_ticker(self) -> bool {
        matches!(self, Self::Ticker | Self::Both)
    }

    const fn includes_scorecard(self) -> bool {
        matches!(self, Self::Scorecard | Self::Both)
    }
}

#[derive(Debug, Parser)]
#[command(name = "boardroom-tester", version = "0.1.0")]
#[command(about = "Automated QA sweeps for the Boardroom decision game")]
struct Args {
    /// Which game to sweep
    #[arg(long, value_enum, default_value_t = VariantArg::Both)]
    variant: VariantArg,

    /// Scorecard storylines as industry:crisis (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// Strategies to run (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    strategies: String,

    /// List all scorecard storylines and strategies, then exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds or share codes (comma-separated; "fresh" mints new codes)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Runs per seed for seeded strategies
    #[arg(long, default_value_t = 5)]
    iterations: usize,

    /// Also play every path of each storyline once
    #[arg(long)]
    exhaustive: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let engine = GameEngine::new(StaticCatalogLoader);
    let tester = GameTester::new(&engine, args.verbose).context("loading bundled catalogs")?;

    if maybe_list_scenarios(&args, &tester)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let plans = build_plans(&args, &tester)?;
    log::info!("running {} plans over {} seeds", plans.len(), seeds.len());

    let results: Vec<ScenarioResult> = plans
        .iter()
        .map(|plan| tester.run_plan(plan, &seeds, args.iterations))
        .collect();

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args, tester: &GameTester) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for key in tester.scenario_keys() {
        writeln!(
            output_target.writer(),
            "  {:25} - {} / {}",
            key.to_string(),
            key.industry.name(),
            key.crisis.name()
        )?;
    }
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in Strategy::ALL {
        writeln!(output_target.writer(), "  {:25} - {}", strategy.key(), strategy.label())?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "📈 Boardroom Automated Tester".bright_cyan().bold());
    println!("{}", "=============================".cyan());
}

fn parse_strategies(arg: &str) -> Result<Vec<Strategy>> {
    let tokens = split_csv(arg);
    if wants_all(&tokens) {
        return Ok(Strategy::ALL.to_vec());
    }
    tokens
        .iter()
        .map(|token| token.parse::<Strategy>().map_err(anyhow::Error::msg))
        .collect()
}

fn parse_scenarios(arg: &str, tester: &GameTester) -> Result<Vec<ScenarioKey>> {
    let available = tester.scenario_keys();
    let tokens = split_csv(arg);
    if wants_all(&tokens) {
        return Ok(available);
    }
    let mut keys = Vec::with_capacity(tokens.len());
    for token in tokens {
        let key: ScenarioKey = token.parse().map_err(anyhow::Error::msg)?;
        if !available.contains(&key) {
            bail!("Scenario {key} is not in the catalog");
        }
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    Ok(keys)
}

fn build_plans(args: &Args, tester: &GameTester) -> Result<Vec<RunPlan>> {
    let strategies = parse_strategies(&args.strategies)?;
    let mut tracks = Vec::new();
    if args.variant.includes_ticker() {
        tracks.push(Track::Ticker);
    }
    if args.variant.includes_scorecard() {
        tracks.extend(
            parse_scenarios(&args.scenarios, tester)?
                .into_iter()
                .map(Track::Scorecard),
        );
    }

    let mut drivers: Vec<Driver> = strategies.into_iter().map(Driver::Strategy).collect();
    if args.exhaustive {
        drivers.push(Driver::Exhaustive);
    }

    Ok(tracks
        .iter()
        .flat_map(|&track| drivers.iter().map(move |&driver| RunPlan { track, driver }))
        .collect())
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(output_target.writer(), results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Boardroom Sweep Results\n\n_No plans executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(output_target.writer(), results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No plans executed.")?;
            } else {
                logic::reports::generate_console_report(
                    output_target.writer(),
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardroom_game::{Crisis, Industry};

    fn base_args() -> Args {
        Args {
            variant: VariantArg::Both,
            scenarios: "all".to_string(),
            strategies: "all".to_string(),
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            exhaustive: false,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    fn tester() -> GameTester {
        GameTester::new(&GameEngine::new(StaticCatalogLoader), false).unwrap()
    }

    #[test]
    fn default_plans_cover_every_track_and_strategy() {
        let plans = build_plans(&base_args(), &tester()).unwrap();
        assert_eq!(plans.len(), 17 * Strategy::ALL.len());
    }

    #[test]
    fn exhaustive_adds_one_plan_per_track() {
        let mut args = base_args();
        args.variant = VariantArg::Ticker;
        args.strategies = "greedy".to_string();
        args.exhaustive = true;
        let plans = build_plans(&args, &tester()).unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[1].driver, Driver::Exhaustive);
    }

    #[test]
    fn plans_without_a_matching_seed_fail() {
        let mut args = base_args();
        args.scenarios = "tech:product".to_string();
        args.strategies = "greedy".to_string();
        let t = tester();
        let plans = build_plans(&args, &t).unwrap();
        let seeds = resolve_seed_inputs(&["TK-PIVOT42".to_string()]).unwrap();
        let results: Vec<ScenarioResult> = plans
            .iter()
            .map(|plan| t.run_plan(plan, &seeds, 1))
            .collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].passed, "{:?}", results[0].failures);
        assert!(!results[1].passed);
        assert_eq!(results[1].iterations_run, 0);
    }

    #[test]
    fn scenario_filter_parses_keys_and_rejects_unknown_tokens() {
        let t = tester();
        let keys = parse_scenarios("tech:product, tech:product,retail:market", &t).unwrap();
        assert_eq!(
            keys,
            vec![
                ScenarioKey::new(Industry::Tech, Crisis::Product),
                ScenarioKey::new(Industry::Retail, Crisis::Market),
            ]
        );
        assert!(parse_scenarios("tech:lawsuit", &t).is_err());
        assert!(parse_strategies("greedy,coin-flip").is_err());
    }

    #[test]
    fn write_reports_to_file() {
        let mut args = base_args();
        let path = std::env::temp_dir().join("boardroom-tester-report.json");
        args.output = Some(path.clone());
        write_reports(&args, &[], Instant::now()).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text.trim(), "[]");
    }
}
