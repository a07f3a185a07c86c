use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use wavyte_path::{PathId, SmartPath, SmartPathStore};

#[derive(Parser, Debug)]
#[command(name = "wavyte-path", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the SVG path data of one keyframe.
    Outline(OutlineArgs),
    /// Print both keyframes reconciled against each other.
    Reconcile(PairArgs),
    /// Print blended outlines between two keyframes.
    Blend(BlendArgs),
}

#[derive(Parser, Debug)]
struct OutlineArgs {
    /// Input path JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct PairArgs {
    /// First keyframe path JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Second keyframe path JSON (same node count).
    #[arg(long)]
    to: PathBuf,
}

#[derive(Parser, Debug)]
struct BlendArgs {
    #[command(flatten)]
    pair: PairArgs,

    /// Blend weight in [0, 1]; ignored when `--steps` is given.
    #[arg(long, default_value_t = 0.5)]
    weight: f64,

    /// Print this many evenly spaced frames, both keyframes included.
    #[arg(long)]
    steps: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Outline(args) => cmd_outline(args),
        Command::Reconcile(args) => cmd_reconcile(args),
        Command::Blend(args) => cmd_blend(args),
    }
}

fn read_path_json(path: &Path) -> anyhow::Result<SmartPath> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read path '{}'", path.display()))?;
    let parsed = SmartPath::from_json_str(&text)
        .with_context(|| format!("parse path JSON '{}'", path.display()))?;
    Ok(parsed)
}

fn load_pair(args: &PairArgs) -> anyhow::Result<(SmartPathStore, PathId, PathId)> {
    let mut store = SmartPathStore::new();
    let a = store.insert(read_path_json(&args.in_path)?);
    let b = store.insert(read_path_json(&args.to)?);
    store
        .link(a, b)
        .with_context(|| "relate the two keyframes")?;
    Ok((store, a, b))
}

fn cmd_outline(args: OutlineArgs) -> anyhow::Result<()> {
    let path = read_path_json(&args.in_path)?;
    println!("{}", path.outline_at()?.to_svg());
    Ok(())
}

fn cmd_reconcile(args: PairArgs) -> anyhow::Result<()> {
    let (store, a, b) = load_pair(&args)?;
    println!("{}", store.outline_for_next(a)?.to_svg());
    println!("{}", store.outline_for_prev(b)?.to_svg());
    Ok(())
}

fn cmd_blend(args: BlendArgs) -> anyhow::Result<()> {
    let (store, a, _) = load_pair(&args.pair)?;
    let weights: Vec<f64> = match args.steps {
        Some(0) => anyhow::bail!("--steps must be at least 1"),
        Some(1) => vec![0.0],
        Some(n) => (0..n).map(|i| f64::from(i) / f64::from(n - 1)).collect(),
        None => vec![args.weight],
    };
    for w in weights {
        let frame = store
            .interpolate_with_next(a, w)
            .with_context(|| format!("blend at weight {w}"))?;
        println!("{}", frame.to_svg());
    }
    Ok(())
}
