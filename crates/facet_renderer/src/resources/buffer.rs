//! Fixed-capacity typed GPU buffer with a host-side mirror.
//!
//! A [`Buffer<T>`] is sized once at construction and never grows.  Every
//! write goes to the CPU mirror first; what happens next depends on the
//! context's [`StorageMode`]:
//!
//! * `Shared`: the written range is uploaded immediately, so the GPU sees it
//!   on the next submission without further work.
//! * `Managed`: the written range is merged into a dirty range that
//!   [`Buffer::flush`] uploads in one go.  Call it before submitting.
//!
//! Uploads go through `Queue::write_buffer`, which wgpu orders before any
//! later `submit`, so a flushed write is visible to the next frame.

use std::ops::Range;
use std::sync::Arc;

use facet_core::context::{GpuContext, StorageMode};

use crate::error::BufferError;

/// CPU copy of a buffer's contents plus the element range not yet uploaded.
#[derive(Debug, Clone)]
pub struct HostMirror<T> {
    data: Vec<T>,
    dirty: Option<Range<usize>>,
}

impl<T: bytemuck::Pod> HostMirror<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![T::zeroed(); capacity],
            dirty: None,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Copies `src` to `offset`, or fails without touching anything.
    pub fn write(&mut self, offset: usize, src: &[T]) -> Result<Range<usize>, BufferError> {
        let end = offset
            .checked_add(src.len())
            .filter(|&end| end <= self.data.len())
            .ok_or(BufferError::OutOfBounds {
                offset,
                len: src.len(),
                capacity: self.data.len(),
            })?;
        self.data[offset..end].copy_from_slice(src);
        Ok(offset..end)
    }

    pub fn mark_dirty(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        self.dirty = Some(match self.dirty.take() {
            Some(d) => d.start.min(range.start)..d.end.max(range.end),
            None => range,
        });
    }

    pub fn take_dirty(&mut self) -> Option<Range<usize>> {
        self.dirty.take()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }
}

/// Typed GPU buffer holding exactly `capacity` elements of `T`.
pub struct Buffer<T> {
    raw: wgpu::Buffer,
    queue: Arc<wgpu::Queue>,
    mirror: HostMirror<T>,
    mode: StorageMode,
    label: String,
}

impl<T: bytemuck::Pod> Buffer<T> {
    /// Allocates room for `capacity` elements.  `COPY_DST` is always added to
    /// `usage`.  A zero-capacity buffer still gets one element of backing
    /// store so it can be bound.
    pub fn new(
        context: &GpuContext,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Result<Self, BufferError> {
        let stride = std::mem::size_of::<T>() as u64;
        let bytes = (capacity.max(1) as u64).saturating_mul(stride);
        let allocation_error = |reason: String| BufferError::Allocation {
            label: label.to_string(),
            bytes,
            reason,
        };

        let max = context.device.limits().max_buffer_size;
        if bytes > max {
            return Err(allocation_error(format!("exceeds device limit of {max} bytes")));
        }

        let device = &context.device;
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let raw = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: bytes,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let validation = pollster::block_on(device.pop_error_scope());
        let oom = pollster::block_on(device.pop_error_scope());
        if let Some(err) = validation.or(oom) {
            return Err(allocation_error(err.to_string()));
        }

        log::debug!("allocated buffer `{label}`: {capacity} x {stride} bytes");

        Ok(Self {
            raw,
            queue: context.queue.clone(),
            mirror: HostMirror::new(capacity),
            mode: context.storage_mode(),
            label: label.to_string(),
        })
    }

    /// Writes `data` starting at element `offset`.  Fails with
    /// [`BufferError::OutOfBounds`] and writes nothing when
    /// `offset + data.len() > capacity`.
    pub fn write(&mut self, offset: usize, data: &[T]) -> Result<(), BufferError> {
        let range = self.mirror.write(offset, data)?;
        match self.mode {
            StorageMode::Shared => self.upload(range),
            StorageMode::Managed => self.mirror.mark_dirty(range),
        }
        Ok(())
    }

    /// Uploads the pending dirty range, if any.  A no-op for shared storage.
    pub fn flush(&mut self) {
        if let Some(range) = self.mirror.take_dirty() {
            self.upload(range);
        }
    }

    fn upload(&self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let stride = std::mem::size_of::<T>() as u64;
        let bytes: &[u8] = bytemuck::cast_slice(&self.mirror.as_slice()[range.clone()]);
        self.queue
            .write_buffer(&self.raw, range.start as u64 * stride, bytes);
    }

    /// Number of elements the buffer holds.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.mirror.capacity()
    }

    /// Same as [`capacity`](Self::capacity); buffers are always "full".
    #[inline]
    pub fn len(&self) -> usize {
        self.capacity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.capacity() == 0
    }

    /// Host copy of the contents, including writes not yet flushed.
    #[inline]
    pub fn contents(&self) -> &[T] {
        self.mirror.as_slice()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.mirror.is_dirty()
    }

    #[inline]
    pub fn storage_mode(&self) -> StorageMode {
        self.mode
    }

    #[inline]
    pub fn raw(&self) -> &wgpu::Buffer {
        &self.raw
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Binding covering the whole buffer.
    pub fn as_entire_binding(&self) -> wgpu::BindingResource<'_> {
        self.raw.as_entire_binding()
    }

    /// Vertex-buffer slice covering the whole buffer.
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.raw.slice(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_inside_bounds_lands_in_the_mirror() {
        let mut m = HostMirror::<u32>::new(4);
        assert_eq!(m.write(1, &[7, 8]), Ok(1..3));
        assert_eq!(m.as_slice(), &[0, 7, 8, 0]);
        // filling exactly to capacity is fine
        assert_eq!(m.write(0, &[1, 2, 3, 4]), Ok(0..4));
    }

    #[test]
    fn out_of_bounds_write_changes_nothing() {
        let mut m = HostMirror::<u32>::new(3);
        m.write(0, &[1, 2, 3]).unwrap();
        let err = m.write(2, &[9, 9]).unwrap_err();
        assert_eq!(
            err,
            BufferError::OutOfBounds {
                offset: 2,
                len: 2,
                capacity: 3
            }
        );
        assert_eq!(m.as_slice(), &[1, 2, 3]);
        assert!(m.write(usize::MAX, &[1]).is_err());
    }

    #[test]
    fn zero_capacity_rejects_everything_but_empty_writes() {
        let mut m = HostMirror::<f32>::new(0);
        assert!(m.write(0, &[]).is_ok());
        assert!(m.write(0, &[1.0]).is_err());
    }

    #[test]
    fn dirty_ranges_merge() {
        let mut m = HostMirror::<u8>::new(16);
        assert!(!m.is_dirty());
        m.mark_dirty(4..6);
        m.mark_dirty(10..12);
        m.mark_dirty(5..5);
        assert_eq!(m.take_dirty(), Some(4..12));
        assert!(!m.is_dirty());
    }
}
