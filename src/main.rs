mod config;
mod demo;

use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use strata_compile::Section;
use strata_geom::{SectionPos, Vec3};
use strata_mesh::{RenderPass, VertexFormat};
use strata_runtime::{CompileJob, CompileOutcome, CompileRuntime};

use crate::config::StrataConfig;
use crate::demo::DemoWorld;

const SECTION_LAYERS: i32 = 2;
const RESULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatArg {
    Standard,
    Compact,
}

impl From<FormatArg> for VertexFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Standard => VertexFormat::Standard,
            FormatArg::Compact => VertexFormat::Compact,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "strata", about = "Compile a block of demo terrain sections into meshes")]
struct Cli {
    /// Config file; defaults to ./strata.toml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sections generated on each side of the origin column
    #[arg(long, default_value_t = 2)]
    radius: i32,

    #[arg(long, default_value_t = 1337)]
    seed: i32,

    /// Keep translucent geometry in emission order
    #[arg(long)]
    no_sort: bool,

    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Worker threads (0 = available parallelism)
    #[arg(long)]
    workers: Option<usize>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut cfg = StrataConfig::load(cli.config.as_deref())?;
    if cli.no_sort {
        cfg.compile.translucency_sorting = false;
    }
    if let Some(f) = cli.format {
        cfg.compile.vertex_format = f.into();
    }
    if let Some(w) = cli.workers {
        cfg.runtime.workers = w;
    }
    log::debug!("config: {cfg:?}");

    let world = Arc::new(DemoWorld::new(cli.seed));
    let runtime = CompileRuntime::new(cfg.runtime_config(), demo::resolvers(world.clone()))?;

    let r = cli.radius.max(0);
    let camera = Vec3::new(8.0, 40.0, 8.0);
    let t0 = Instant::now();
    let mut submitted = 0usize;
    for sy in 0..SECTION_LAYERS {
        for sz in -r..=r {
            for sx in -r..=r {
                let pos = SectionPos::new(sx, sy, sz);
                let section = Section::new(pos, submitted as u32);
                let snapshot = Arc::new(world.snapshot(pos));
                runtime.submit(CompileJob::new(section, snapshot, camera, 0));
                submitted += 1;
            }
        }
    }
    log::info!("submitted {} sections", submitted);

    let (mut built, mut failed, mut cancelled) = (0usize, 0usize, 0usize);
    let mut vertices = 0usize;
    for _ in 0..submitted {
        let Some(outcome) = runtime.recv_result(RESULT_TIMEOUT) else {
            let (q, f) = runtime.queue_debug_counts();
            return Err(format!("timed out waiting for results (queued={q} in_flight={f})").into());
        };
        match outcome {
            CompileOutcome::Built(result) => {
                built += 1;
                vertices += result.vertex_count();
                let passes: Vec<String> = RenderPass::ALL
                    .iter()
                    .filter_map(|&p| result.mesh(p).map(|m| format!("{p:?}={}", m.vertex_count())))
                    .collect();
                let bounds = match result.bounds.local() {
                    Some(b) => format!("{}..{}", b.min, b.max),
                    None => "empty".to_string(),
                };
                log::info!(
                    "section {} passes=[{}] bounds={} closed={} attached={}",
                    result.section,
                    passes.join(" "),
                    bounds,
                    result.occlusion.closed_count(),
                    result.attached.len()
                );
            }
            CompileOutcome::Cancelled { section, .. } => {
                cancelled += 1;
                log::info!("section {} cancelled", section);
            }
            CompileOutcome::Failed(err) => {
                failed += 1;
                log::error!("{err}");
            }
        }
    }

    log::info!(
        "compiled {} sections in {} ms: {} vertices, {} cancelled, {} failed",
        built,
        t0.elapsed().as_millis(),
        vertices,
        cancelled,
        failed
    );
    if failed > 0 {
        return Err(format!("{failed} section(s) failed to compile").into());
    }
    Ok(())
}
