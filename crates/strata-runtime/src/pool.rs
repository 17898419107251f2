use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use strata_mesh::MeshAssembler;

/// Lock-free pool of mesh assemblers shared by the compile workers.
///
/// At most `max_assemblers` exist at once; `acquire` blocks when all are checked out.
pub struct BuilderPool {
    available_tx: Sender<MeshAssembler>,
    available_rx: Receiver<MeshAssembler>,
    allocated: AtomicUsize,
    max_assemblers: usize,
}

impl BuilderPool {
    pub fn new(max_assemblers: usize) -> Self {
        let max_assemblers = max_assemblers.max(1);
        let (tx, rx) = bounded(max_assemblers);
        Self {
            available_tx: tx,
            available_rx: rx,
            allocated: AtomicUsize::new(0),
            max_assemblers,
        }
    }

    /// Two assemblers per worker.
    pub fn with_capacity_from_workers(worker_count: usize) -> Self {
        Self::new(worker_count.max(1) * 2)
    }

    /// Checks out an idle assembler, creating one with `make` while under capacity.
    pub fn acquire<'pool>(&'pool self, make: impl FnOnce() -> MeshAssembler) -> PooledAssembler<'pool> {
        if let Ok(asm) = self.available_rx.try_recv() {
            return PooledAssembler {
                asm: Some(asm),
                pool: self,
            };
        }

        loop {
            let current = self.allocated.load(Ordering::Acquire);
            if current < self.max_assemblers {
                let prev = self.allocated.fetch_add(1, Ordering::AcqRel);
                if prev < self.max_assemblers {
                    log::trace!(target: "pool", "allocating assembler {}/{}", prev + 1, self.max_assemblers);
                    return PooledAssembler {
                        asm: Some(make()),
                        pool: self,
                    };
                }
                self.allocated.fetch_sub(1, Ordering::AcqRel);
            }

            // Pool owns both channel ends, so recv only fails if that invariant breaks
            if let Ok(asm) = self.available_rx.recv() {
                return PooledAssembler {
                    asm: Some(asm),
                    pool: self,
                };
            }
        }
    }

    /// Assemblers created so far.
    #[inline]
    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Acquire)
    }

    /// Assemblers currently idle in the pool.
    #[inline]
    pub fn idle(&self) -> usize {
        self.available_rx.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_assemblers
    }

    fn release(&self, asm: MeshAssembler) {
        if let Err(err) = self.available_tx.try_send(asm) {
            log::warn!(target: "pool", "assembler returned to a full pool; destroying it");
            let mut asm = err.into_inner();
            asm.destroy();
            self.allocated.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

impl Drop for BuilderPool {
    fn drop(&mut self) {
        let mut destroyed = 0usize;
        for mut asm in self.available_rx.try_iter() {
            asm.destroy();
            destroyed += 1;
        }
        log::debug!(target: "pool", "builder pool dropped, destroyed {destroyed} assemblers");
    }
}

/// Checked-out assembler; goes back to its pool when dropped.
pub struct PooledAssembler<'pool> {
    asm: Option<MeshAssembler>,
    pool: &'pool BuilderPool,
}

impl<'pool> Deref for PooledAssembler<'pool> {
    type Target = MeshAssembler;

    fn deref(&self) -> &Self::Target {
        self.asm.as_ref().expect("assembler already released")
    }
}

impl<'pool> DerefMut for PooledAssembler<'pool> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.asm.as_mut().expect("assembler already released")
    }
}

impl<'pool> Drop for PooledAssembler<'pool> {
    fn drop(&mut self) {
        if let Some(asm) = self.asm.take() {
            self.pool.release(asm);
        }
    }
}
