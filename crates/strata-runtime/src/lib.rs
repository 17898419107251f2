//! Runtime job queue and worker orchestration for section compiles.
#![forbid(unsafe_code)]

mod cancel;
mod pool;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use strata_compile::{
    CompileConfig, CompileError, CompileRequest, RenderResult, Resolvers, Section, SectionCompiler,
};
use strata_geom::Vec3;
use strata_slice::SectionSnapshot;
use thiserror::Error;

pub use cancel::CancellationToken;
pub use pool::{BuilderPool, PooledAssembler};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to start compile workers: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

#[derive(Clone, Debug, Default)]
pub struct RuntimeConfig {
    pub compile: CompileConfig,
    /// Worker threads; 0 picks the available parallelism.
    pub workers: usize,
}

#[derive(Clone, Debug)]
pub struct CompileJob {
    pub section: Section,
    pub snapshot: Arc<SectionSnapshot>,
    pub camera: Vec3,
    pub frame: u64,
    pub cancel: CancellationToken,
}

impl CompileJob {
    pub fn new(section: Section, snapshot: Arc<SectionSnapshot>, camera: Vec3, frame: u64) -> Self {
        Self {
            section,
            snapshot,
            camera,
            frame,
            cancel: CancellationToken::new(),
        }
    }
}

#[derive(Debug)]
pub enum CompileOutcome {
    Built(RenderResult),
    Cancelled { section: Section, frame: u64 },
    Failed(CompileError),
}

impl CompileOutcome {
    pub fn section(&self) -> Section {
        match self {
            CompileOutcome::Built(r) => r.section,
            CompileOutcome::Cancelled { section, .. } => *section,
            CompileOutcome::Failed(e) => e.section(),
        }
    }
}

fn process_compile_job(
    job: CompileJob,
    compiler: &SectionCompiler,
    pool: &BuilderPool,
    tx: &Sender<CompileOutcome>,
) {
    let CompileJob {
        section,
        snapshot,
        camera,
        frame,
        cancel,
    } = job;

    if cancel.is_cancelled() {
        let _ = tx.send(CompileOutcome::Cancelled { section, frame });
        return;
    }

    let t0 = Instant::now();
    let outcome = {
        let mut asm = pool.acquire(|| compiler.new_assembler());
        let req = CompileRequest {
            section,
            frame,
            camera,
            slice: snapshot.as_ref(),
        };
        match compiler.compile(&req, &mut asm, &cancel) {
            Ok(Some(result)) => CompileOutcome::Built(result),
            Ok(None) => CompileOutcome::Cancelled { section, frame },
            Err(err) => {
                log::warn!(target: "compile", "section {} frame {} failed: {}", section, frame, err);
                CompileOutcome::Failed(err)
            }
        }
    };
    log::trace!(
        target: "compile",
        "ms={} job section={} frame={} done",
        t0.elapsed().as_millis(),
        section,
        frame
    );
    let _ = tx.send(outcome);
}

/// Worker pool compiling sections off the caller's thread.
pub struct CompileRuntime {
    job_tx: Sender<CompileJob>,
    res_rx: Receiver<CompileOutcome>,
    _pool: ThreadPool,
    builders: Arc<BuilderPool>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    pub workers: usize,
}

impl CompileRuntime {
    pub fn new(config: RuntimeConfig, resolvers: Resolvers) -> Result<Self, RuntimeError> {
        let (job_tx, job_rx) = unbounded::<CompileJob>();
        let (res_tx, res_rx) = unbounded::<CompileOutcome>();

        let workers = if config.workers > 0 {
            config.workers
        } else {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(8)
        };
        let compiler = Arc::new(SectionCompiler::new(config.compile, resolvers));
        let builders = Arc::new(BuilderPool::with_capacity_from_workers(workers));
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("strata-compile-{i}"))
            .build()?;
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let compiler = compiler.clone();
            let builders = builders.clone();
            let queued = queued.clone();
            let inflight = inflight.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_compile_job(job, compiler.as_ref(), builders.as_ref(), &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }
        log::info!(
            "compile runtime started: {} workers, {} assemblers max",
            workers,
            builders.capacity()
        );

        Ok(Self {
            job_tx,
            res_rx,
            _pool: pool,
            builders,
            queued,
            inflight,
            workers,
        })
    }

    /// Queues a compile and returns the token that cancels it.
    pub fn submit(&self, job: CompileJob) -> CancellationToken {
        let token = job.cancel.clone();
        self.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx.send(job).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
        }
        token
    }

    /// Every outcome finished since the last drain, in completion order.
    pub fn drain_results(&self) -> Vec<CompileOutcome> {
        self.res_rx.try_iter().collect()
    }

    /// Blocks up to `timeout` for the next outcome.
    pub fn recv_result(&self, timeout: Duration) -> Option<CompileOutcome> {
        match self.res_rx.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// `(queued, in_flight)`.
    pub fn queue_debug_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }

    pub fn builder_pool(&self) -> &BuilderPool {
        &self.builders
    }
}
