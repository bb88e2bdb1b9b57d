//! Spectrum frame reassembly and downsampling.

/// Reassembles fixed-size spectrum frames from arbitrary read chunks.
///
/// The analyzer writes one byte per frequency bar. Reads from the pipe can
/// split a frame anywhere, so partial bytes are carried over until a full
/// frame is available. Only complete frames replace the current one; a
/// half-updated spectrum is never visible.
#[derive(Debug)]
pub struct FrameAssembler {
    frame_len: usize,
    pending: Vec<u8>,
    current: Vec<f32>,
}

impl FrameAssembler {
    pub fn new(frame_len: usize) -> Self {
        Self {
            frame_len,
            pending: Vec::with_capacity(frame_len),
            current: vec![0.0; frame_len],
        }
    }

    /// Discard carried-over bytes and zero the current frame.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.current.fill(0.0);
    }

    /// Bytes still needed to complete the frame in progress.
    pub fn missing(&self) -> usize {
        self.frame_len - self.pending.len()
    }

    /// Feed a chunk of raw bytes, completing frames as they fill up.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
        while self.pending.len() >= self.frame_len {
            for (slot, &byte) in self.current.iter_mut().zip(&self.pending) {
                *slot = f32::from(byte) / 255.0;
            }
            self.pending.drain(..self.frame_len);
        }
    }

    /// The most recently completed frame, amplitudes in `[0, 1]`.
    pub fn frame(&self) -> &[f32] {
        &self.current
    }
}

/// Downsample `frame` into `bins` contiguous averages.
///
/// The frame is split into consecutive runs; when the lengths do not divide
/// evenly the first `frame.len() % bins` runs take one extra sample. Each
/// bin is the mean of its run. Zero bins, as produced by a zero LED count
/// in the settings, yield an empty result.
pub fn aggregate_bins(frame: &[f32], bins: usize) -> Vec<f32> {
    if bins == 0 {
        return Vec::new();
    }
    let base = frame.len() / bins;
    let remainder = frame.len() % bins;

    let mut result = Vec::with_capacity(bins);
    let mut start = 0;
    for bin in 0..bins {
        let size = base + usize::from(bin < remainder);
        if size == 0 {
            result.push(0.0);
            continue;
        }
        let sum: f32 = frame[start..start + size].iter().sum();
        result.push(sum / size as f32);
        start += size;
    }
    result
}
