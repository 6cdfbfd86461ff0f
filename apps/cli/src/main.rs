use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use synesis_core::{
    BoxGeometry, EdgeRouter, EntityPosition, ProjectGraph, ReplayOptions, TabCommand, TabManager,
};
use synesis_settings::{Preferences, PreferencesStore};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "synesis-cli",
    about = "Workspace tab and project canvas utilities for Synesis",
    author,
    version
)]
struct Cli {
    /// 指定工作區根目錄；預設為目前目錄。 / Workspace root (defaults to current directory).
    #[arg(long, global = true, value_name = "PATH")]
    workspace: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 計算兩個方塊之間連線的錨點。 / Choose edge anchors between two boxes.
    Route(RouteArgs),
    /// 為整個專案圖計算連線。 / Route every link of a project graph file.
    Graph(GraphArgs),
    /// 重播標籤指令並輸出最終狀態。 / Replay tab commands and print the resulting workspace.
    Tabs(TabsArgs),
    /// 檢視或匯入/匯出偏好設定。 / Show, import or export preferences.
    #[command(subcommand)]
    Preferences(PreferencesCommand),
}

#[derive(Args)]
struct RouteArgs {
    /// 來源方塊左上角。 / Top-left corner of the source box, as `X,Y`.
    #[arg(long, value_name = "X,Y", value_parser = parse_position, allow_hyphen_values = true)]
    source: EntityPosition,

    /// 目標方塊左上角。 / Top-left corner of the target box, as `X,Y`.
    #[arg(long, value_name = "X,Y", value_parser = parse_position, allow_hyphen_values = true)]
    target: EntityPosition,

    /// 覆寫偏好設定中的方塊寬度。 / Override the box width from preferences.
    #[arg(long, value_name = "WIDTH")]
    box_width: Option<f64>,
}

#[derive(Args)]
struct GraphArgs {
    /// 專案圖 JSON 檔案。 / Project graph JSON (`nodes` and `links`).
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// 覆寫偏好設定中的方塊寬度。 / Override the box width from preferences.
    #[arg(long, value_name = "WIDTH")]
    box_width: Option<f64>,
}

#[derive(Args)]
struct TabsArgs {
    /// 標籤指令 JSON 陣列。 / JSON array of tab commands.
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

#[derive(Subcommand)]
enum PreferencesCommand {
    /// 顯示目前的偏好設定。 / Print the effective preferences.
    Show,
    /// 匯出偏好設定。 / Export preferences to a file.
    Export(PreferencesExportArgs),
    /// 匯入偏好設定。 / Import preferences from a file.
    Import(PreferencesImportArgs),
}

#[derive(Args)]
struct PreferencesExportArgs {
    /// 輸出檔案路徑。 / Destination file path.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
}

#[derive(Args)]
struct PreferencesImportArgs {
    /// 輸入檔案路徑。 / Source preferences JSON.
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let Cli { workspace, command } = Cli::parse();
    let workspace_root = resolve_workspace(workspace)?;
    debug!(workspace = %workspace_root.display(), "resolved workspace");
    match command {
        Commands::Route(args) => execute_route(args, &workspace_root),
        Commands::Graph(args) => execute_graph(args, &workspace_root),
        Commands::Tabs(args) => execute_tabs(args, &workspace_root),
        Commands::Preferences(subcommand) => {
            execute_preferences_command(subcommand, &workspace_root)
        }
    }
}

fn execute_route(args: RouteArgs, workspace_root: &Path) -> Result<()> {
    let router = build_router(args.box_width, workspace_root)?;
    debug!(
        box_width = router.geometry().width,
        source = %args.source,
        target = %args.target,
        "routing edge"
    );
    let edge = router.route(args.source, args.target)?;
    print_json(&edge)
}

fn execute_graph(args: GraphArgs, workspace_root: &Path) -> Result<()> {
    let router = build_router(args.box_width, workspace_root)?;
    let graph: ProjectGraph = read_json(&args.input)?;
    let routed = graph
        .route_edges(&router)
        .with_context(|| format!("failed to route {}", args.input.display()))?;
    info!(
        edges = routed.len(),
        box_width = router.geometry().width,
        "routed project graph"
    );
    print_json(&routed)
}

fn execute_tabs(args: TabsArgs, workspace_root: &Path) -> Result<()> {
    let preferences = load_preferences(workspace_root)?;
    let commands: Vec<TabCommand> = read_json(&args.input)?;
    let options = ReplayOptions {
        restore_project_on_close: preferences.workspace.restore_project_on_close,
    };

    let manager = TabManager::replay_with(&commands, options);
    info!(
        commands = commands.len(),
        open = manager.len(),
        "replayed tab commands"
    );
    print_json(&manager.snapshot())
}

fn execute_preferences_command(command: PreferencesCommand, workspace_root: &Path) -> Result<()> {
    let path = preferences_path(workspace_root);
    match command {
        PreferencesCommand::Show => {
            let store = PreferencesStore::load(&path)?;
            print_json(store.preferences())
        }
        PreferencesCommand::Export(args) => {
            let store = PreferencesStore::load(&path)?;
            store
                .export_to(&args.output)
                .with_context(|| format!("failed to export to {}", args.output.display()))?;
            println!(
                "Exported preferences from {} to {}",
                store.path().display(),
                args.output.display()
            );
            Ok(())
        }
        PreferencesCommand::Import(args) => {
            let mut store = PreferencesStore::load(&path)?;
            store
                .import_from(&args.input)
                .with_context(|| format!("failed to import {}", args.input.display()))?;
            println!(
                "Imported preferences from {} into {}",
                args.input.display(),
                store.path().display()
            );
            Ok(())
        }
    }
}

fn build_router(box_width: Option<f64>, workspace_root: &Path) -> Result<EdgeRouter> {
    let geometry = match box_width {
        Some(width) if width.is_finite() && width > 0.0 => BoxGeometry { width },
        Some(width) => bail!("--box-width must be a positive number, got {width}"),
        None => load_preferences(workspace_root)?.canvas.box_geometry(),
    };
    Ok(EdgeRouter::new(geometry))
}

fn load_preferences(workspace_root: &Path) -> Result<Preferences> {
    let store = PreferencesStore::load(preferences_path(workspace_root))?;
    Ok(store.preferences().clone())
}

fn preferences_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(".synesis").join("preferences.json")
}

fn resolve_workspace(workspace: Option<PathBuf>) -> Result<PathBuf> {
    let path = match workspace {
        Some(path) => path,
        None => std::env::current_dir().context("failed to determine current directory")?,
    };
    if !path.is_dir() {
        bail!("workspace {} is not a directory", path.display());
    }
    Ok(path)
}

fn parse_position(value: &str) -> Result<EntityPosition> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("expected X,Y but got '{value}'"))?;
    let x: f64 = x
        .trim()
        .parse()
        .with_context(|| format!("invalid x coordinate '{x}'"))?;
    let y: f64 = y
        .trim()
        .parse()
        .with_context(|| format!("invalid y coordinate '{y}'"))?;
    Ok(EntityPosition::new(x, y))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
