use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "clipforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the clips active at a time with their resolved transforms.
    Active(ActiveArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Export a project as JSON, a PNG sequence, or raw RGBA frames.
    Export(ExportArgs),
    /// Manage the saved-project library.
    Library(LibraryArgs),
}

#[derive(Parser, Debug)]
struct ActiveArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Timeline time in seconds.
    #[arg(long)]
    time: f64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Timeline time in seconds.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Directory media URLs resolve against (defaults to the project's directory).
    #[arg(long)]
    assets: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// json, images, video or gif.
    #[arg(long, default_value = "json")]
    format: clipforge::ExportFormat,

    /// Output path: a file for json/video/gif, a directory for images.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Directory media URLs resolve against (defaults to the project's directory).
    #[arg(long)]
    assets: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct LibraryArgs {
    /// Library file.
    #[arg(long, default_value = "projects.json")]
    store: PathBuf,

    #[command(subcommand)]
    cmd: LibraryCommand,
}

#[derive(Subcommand, Debug)]
enum LibraryCommand {
    /// List saved projects.
    List,
    /// Save a project file into the library.
    Save {
        #[arg(long = "in")]
        in_path: PathBuf,
        /// Record id; a new `project-<millis>` id is allocated if omitted.
        #[arg(long)]
        id: Option<String>,
    },
    /// Write a saved project back out as a project file.
    Load {
        #[arg(long)]
        id: String,
        #[arg(long)]
        out: PathBuf,
    },
    /// Delete a saved project.
    Remove {
        #[arg(long)]
        id: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Active(args) => cmd_active(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Export(args) => cmd_export(args),
        Command::Library(args) => cmd_library(args),
    }
}

fn load_state(path: &Path) -> anyhow::Result<clipforge::EditorState> {
    let doc = clipforge::ProjectDocument::read_from(path)?;
    Ok(doc.into_state()?)
}

fn assets_root(in_path: &Path, assets: Option<PathBuf>) -> PathBuf {
    assets.unwrap_or_else(|| {
        in_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    })
}

fn cpu_backend(
    state: &clipforge::EditorState,
    root: PathBuf,
) -> anyhow::Result<Box<dyn clipforge::RenderBackend>> {
    let assets = clipforge::AssetStore::prepare(state, root)?;
    Ok(clipforge::create_backend(
        clipforge::BackendKind::Cpu,
        &clipforge::RenderSettings::default(),
        assets,
    )?)
}

fn cmd_active(args: ActiveArgs) -> anyhow::Result<()> {
    let state = load_state(&args.in_path)?;
    let frame = clipforge::Evaluator::eval_frame(&state, args.time)?;
    println!("{}", serde_json::to_string_pretty(&frame)?);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let state = load_state(&args.in_path)?;
    let mut backend = cpu_backend(&state, assets_root(&args.in_path, args.assets))?;
    let frame = clipforge::render_frame(&state, args.time, backend.as_mut())?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    clipforge::write_png(&frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    use clipforge::ExportFormat;

    let state = load_state(&args.in_path)?;
    let opts = clipforge::ExportOptions::new(args.format);
    let out = args.out.unwrap_or_else(|| match args.format {
        ExportFormat::Json => PathBuf::from(format!("project-{}.json", clipforge::now_millis())),
        ExportFormat::Images => PathBuf::from("frames"),
        ExportFormat::Video | ExportFormat::Gif => PathBuf::from("frames.rgba"),
    });

    let mut last_decile = -1i64;
    let mut report = |pct: f64| {
        let decile = (pct / 10.0).floor() as i64;
        if decile != last_decile {
            last_decile = decile;
            eprintln!("export {pct:.0}%");
        }
    };

    match args.format {
        ExportFormat::Json => {
            // No frames are rendered for json, so skip the system font scan.
            let mut backend = clipforge::CpuBackend::with_rasterizer(
                clipforge::RenderSettings::default(),
                clipforge::AssetStore::default(),
                clipforge::SvgRasterizer::with_fontdb(usvg::fontdb::Database::new()),
            );
            let mut sink = clipforge::InMemorySink::new();
            let output =
                clipforge::export_project(&state, &opts, &mut backend, &mut sink, &mut report)?;
            if let clipforge::ExportOutput::Json(json) = output {
                std::fs::write(&out, json)
                    .with_context(|| format!("write '{}'", out.display()))?;
            }
        }
        ExportFormat::Images => {
            let mut backend = cpu_backend(&state, assets_root(&args.in_path, args.assets))?;
            let mut sink = clipforge::PngSequenceSink::new(&out);
            clipforge::export_project(&state, &opts, backend.as_mut(), &mut sink, &mut report)?;
        }
        ExportFormat::Video | ExportFormat::Gif => {
            let mut backend = cpu_backend(&state, assets_root(&args.in_path, args.assets))?;
            let mut sink = clipforge::RawFrameSink::new(&out);
            clipforge::export_project(&state, &opts, backend.as_mut(), &mut sink, &mut report)?;
            eprintln!(
                "raw rgba {}x{} @ {} fps; encode with an external tool",
                state.resolution.width, state.resolution.height, state.fps
            );
        }
    }

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_library(args: LibraryArgs) -> anyhow::Result<()> {
    let mut lib = clipforge::ProjectLibrary::load_from(&args.store);
    match args.cmd {
        LibraryCommand::List => {
            for r in lib.list() {
                let clips = r.document().map(|d| d.clips.len()).unwrap_or(0);
                println!("{}\t{}\t{} clips", r.id, r.timestamp, clips);
            }
        }
        LibraryCommand::Save { in_path, id } => {
            let doc = clipforge::ProjectDocument::read_from(&in_path)?;
            let id = lib.save(id.as_deref(), &doc)?;
            eprintln!("saved {id}");
        }
        LibraryCommand::Load { id, out } => {
            let record = lib
                .get(&id)
                .with_context(|| format!("no project '{id}' in '{}'", args.store.display()))?;
            record.document()?.write_to(&out)?;
            eprintln!("wrote {}", out.display());
        }
        LibraryCommand::Remove { id } => {
            if lib.remove(&id)? {
                eprintln!("removed {id}");
            } else {
                eprintln!("no project '{id}'");
            }
        }
    }
    Ok(())
}
