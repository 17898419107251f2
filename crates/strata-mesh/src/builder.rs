use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::VertexFormat;
use crate::pass::Material;
use crate::vertex::Vertex;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("no vertex data in buffer")]
    Empty,

    #[error("vertex buffer used after destroy")]
    Destroyed,

    #[error("vertex batch of {len} exceeds the {max}-vertex polygon limit")]
    BatchTooLarge { len: usize, max: usize },
}

/// What `start` does with capacity grown during the previous compile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityPolicy {
    /// Drop back to a fresh allocation of the initial capacity.
    #[default]
    ResetToInitial,
    /// Keep the largest allocation seen so far.
    RetainPeak,
}

/// Growable, stride-packed vertex byte buffer for one render pass.
///
/// Capacity is counted in vertices. A batch is never split: growth happens first,
/// then the whole batch is encoded contiguously.
#[derive(Debug)]
pub struct VertexBufferBuilder {
    format: VertexFormat,
    stride: usize,
    initial_capacity: usize,
    policy: CapacityPolicy,
    buffer: Option<Vec<u8>>,
    groups: Vec<u8>,
    count: usize,
    capacity: usize,
    tag: u32,
}

impl VertexBufferBuilder {
    /// Largest vertex batch accepted by `push`.
    pub const MAX_BATCH: usize = u8::MAX as usize;

    /// Creates an unallocated builder; the first `start` allocates.
    pub fn new(format: VertexFormat, initial_capacity: usize, policy: CapacityPolicy) -> Self {
        Self {
            format,
            stride: format.stride(),
            initial_capacity: initial_capacity.max(1),
            policy,
            buffer: None,
            groups: Vec::new(),
            count: 0,
            capacity: 0,
            tag: 0,
        }
    }

    /// Resets the write cursor and tags every following vertex with `tag`.
    pub fn start(&mut self, tag: u32) {
        self.count = 0;
        self.tag = tag;
        self.groups.clear();

        let reuse = match self.policy {
            CapacityPolicy::RetainPeak => true,
            CapacityPolicy::ResetToInitial => self.capacity == self.initial_capacity,
        };
        if let (true, Some(buf)) = (reuse, self.buffer.as_mut()) {
            buf.clear();
            return;
        }
        self.buffer = Some(Vec::with_capacity(self.initial_capacity * self.stride));
        self.capacity = self.initial_capacity;
    }

    /// Appends one polygon's vertices encoded with `material`.
    pub fn push(&mut self, vertices: &[Vertex], material: Material) -> Result<(), BufferError> {
        let n = vertices.len();
        if n == 0 {
            return Ok(());
        }
        if n > Self::MAX_BATCH {
            return Err(BufferError::BatchTooLarge {
                len: n,
                max: Self::MAX_BATCH,
            });
        }
        if self.buffer.is_none() {
            return Err(BufferError::Destroyed);
        }

        if self.count + n > self.capacity {
            self.grow(n);
        }

        let (format, tag) = (self.format, self.tag);
        let buf = self.buffer.as_mut().ok_or(BufferError::Destroyed)?;
        for v in vertices {
            format.encode(v, material, tag, buf);
        }
        self.count += n;
        self.groups.push(n as u8);
        debug_assert_eq!(buf.len(), self.count * self.stride);
        Ok(())
    }

    fn grow(&mut self, batch: usize) {
        // At least as large as the write it needs to service
        let cap = (self.capacity * 2).max(self.capacity + batch);
        if let Some(buf) = self.buffer.as_mut() {
            buf.reserve_exact(cap * self.stride - buf.len());
        }
        log::trace!(
            target: "mesh",
            "vertex buffer grow {} -> {} vertices (tag {})",
            self.capacity,
            cap,
            self.tag
        );
        self.capacity = cap;
    }

    /// Releases the backing allocation. The builder is unusable until the next `start`.
    pub fn destroy(&mut self) {
        self.buffer = None;
        self.groups = Vec::new();
        self.count = 0;
        self.capacity = 0;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Read-only view of exactly the bytes written since `start`.
    pub fn slice(&self) -> Result<&[u8], BufferError> {
        let buf = self.buffer.as_deref().ok_or(BufferError::Destroyed)?;
        if self.is_empty() {
            return Err(BufferError::Empty);
        }
        Ok(&buf[..self.count * self.stride])
    }

    /// Vertex count of every batch pushed since `start`, in push order.
    #[inline]
    pub fn groups(&self) -> &[u8] {
        &self.groups
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn format(&self) -> VertexFormat {
        self.format
    }

    #[inline]
    pub fn tag(&self) -> u32 {
        self.tag
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.buffer.is_some()
    }
}
