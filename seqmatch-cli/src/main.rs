use clap::Parser;
use seqmatch::{
    localize_traverse, localize_traverse_par, AnyLocalizer, Descriptors, LocalizerKind,
    QueryOutcome, ReferenceMap, SeqMatchConfig, TraverseReport,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "SeqMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum LocalizerConfig {
    #[default]
    Sequence,
    Single,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SequenceConfigJson {
    seq_len: usize,
    contrast_window: usize,
    num_velocities: usize,
    v_min: f64,
    v_max: f64,
    match_window: usize,
    enhance: bool,
    parallel: bool,
}

impl Default for SequenceConfigJson {
    fn default() -> Self {
        let cfg = SeqMatchConfig::default();
        Self {
            seq_len: cfg.seq_len,
            contrast_window: cfg.contrast_window,
            num_velocities: cfg.num_velocities,
            v_min: cfg.v_min,
            v_max: cfg.v_max,
            match_window: cfg.match_window,
            enhance: cfg.enhance,
            parallel: cfg.parallel,
        }
    }
}

impl From<SequenceConfigJson> for SeqMatchConfig {
    fn from(value: SequenceConfigJson) -> Self {
        Self {
            seq_len: value.seq_len,
            contrast_window: value.contrast_window,
            num_velocities: value.num_velocities,
            v_min: value.v_min,
            v_max: value.v_max,
            match_window: value.match_window,
            enhance: value.enhance,
            parallel: value.parallel,
        }
    }
}

/// One descriptor type: a reference map and the traverses localized against it.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunConfig {
    name: String,
    reference_path: String,
    query_paths: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    runs: Vec<RunConfig>,
    output_path: Option<String>,
    localizer: LocalizerConfig,
    normalize_descriptors: bool,
    parallel_sweep: bool,
    sequence: SequenceConfigJson,
}

type Pose = Vec<f64>;

#[derive(Debug, Deserialize)]
struct ReferenceFile {
    poses: Vec<Pose>,
    descriptors: Vec<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct QueryFile {
    #[serde(default)]
    poses: Vec<Pose>,
    windows: Vec<Vec<Vec<f32>>>,
}

#[derive(Debug, Serialize)]
struct QueryRecord {
    query: usize,
    ground_truth: Option<Pose>,
    proposal: Option<Pose>,
    index: Option<usize>,
    score: Option<f32>,
    time_s: f64,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct TraverseOutput {
    run: String,
    query_path: String,
    seq_len: Option<usize>,
    localized: usize,
    failed: usize,
    total_time_s: f64,
    records: Vec<QueryRecord>,
}

#[derive(Debug, Serialize)]
struct Output {
    model: &'static str,
    traverses: Vec<TraverseOutput>,
}

fn load_descriptors(
    rows: &[Vec<f32>],
    normalize: bool,
) -> Result<Descriptors, Box<dyn std::error::Error>> {
    let mut desc = Descriptors::from_rows(rows)?;
    if normalize {
        desc.l2_normalize_rows();
    }
    Ok(desc)
}

fn record(outcome: QueryOutcome<Pose>, gt: &[Pose]) -> QueryRecord {
    let ground_truth = gt.get(outcome.query).cloned();
    let time_s = outcome.elapsed.as_secs_f64();
    match outcome.result {
        Ok(loc) => QueryRecord {
            query: outcome.query,
            ground_truth,
            proposal: Some(loc.pose),
            index: Some(loc.index),
            score: Some(loc.score),
            time_s,
            error: None,
        },
        Err(err) => QueryRecord {
            query: outcome.query,
            ground_truth,
            proposal: None,
            index: None,
            score: None,
            time_s,
            error: Some(err.to_string()),
        },
    }
}

fn traverse_output(
    run: &str,
    query_path: &str,
    report: TraverseReport<Pose>,
    gt: &[Pose],
    seq_len: Option<usize>,
) -> TraverseOutput {
    TraverseOutput {
        run: run.to_string(),
        query_path: query_path.to_string(),
        seq_len,
        localized: report.num_localized(),
        failed: report.num_failed(),
        total_time_s: report.total_time().as_secs_f64(),
        records: report
            .outcomes
            .into_iter()
            .map(|o| record(o, gt))
            .collect(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("seqmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.runs.is_empty() {
        return Err("config must list at least one run".into());
    }

    let (kind, seq_len) = match config.localizer {
        LocalizerConfig::Sequence => {
            let cfg = SeqMatchConfig::from(config.sequence);
            let seq_len = cfg.seq_len;
            (LocalizerKind::Sequence(cfg), Some(seq_len))
        }
        LocalizerConfig::Single => (LocalizerKind::SingleImage, None),
    };

    let mut model = "";
    let mut traverses = Vec::new();
    for run in &config.runs {
        if run.reference_path.is_empty() || run.query_paths.is_empty() {
            return Err(format!("run '{}' needs reference_path and query_paths", run.name).into());
        }
        let reference: ReferenceFile =
            serde_json::from_str(&fs::read_to_string(&run.reference_path)?)?;
        let descriptors = load_descriptors(&reference.descriptors, config.normalize_descriptors)?;
        let map = Arc::new(ReferenceMap::new(reference.poses, descriptors)?);
        let localizer = AnyLocalizer::build(map, kind.clone())?;

        for query_path in &run.query_paths {
            let query: QueryFile = serde_json::from_str(&fs::read_to_string(query_path)?)?;
            let windows = query
                .windows
                .iter()
                .map(|w| load_descriptors(w, config.normalize_descriptors))
                .collect::<Result<Vec<_>, _>>()?;

            let report = if config.parallel_sweep {
                localize_traverse_par(&localizer, &windows)
            } else {
                localize_traverse(&localizer, &windows)
            };
            model = report.model;
            tracing::info!(
                run = run.name.as_str(),
                query = query_path.as_str(),
                localized = report.num_localized(),
                failed = report.num_failed(),
                "traverse done"
            );
            traverses.push(traverse_output(
                &run.name,
                query_path,
                report,
                &query.poses,
                seq_len,
            ));
        }
    }

    let json = serde_json::to_string_pretty(&Output { model, traverses })?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
