//! Short-time Fourier transform.
//!
//! Frames the canonical buffer with overlap, applies a Hann window and a
//! forward FFT per frame, and collects the magnitude spectra into a
//! [`Spectrogram`]. Frames are independent and are computed in parallel.

use std::sync::Arc;

use rayon::prelude::*;
use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::config::{CANONICAL_SAMPLE_RATE, DEFAULT_FFT_SIZE};
use crate::error::{Error, Result};
use crate::preprocess::hann_window;

/// A magnitude spectrogram over a canonical-rate buffer.
///
/// Magnitudes are stored in a single flat buffer in time-major order:
/// `data[t * frequency_bins + f]`.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    pub data: Vec<f32>,
    pub time_frames: usize,
    pub frequency_bins: usize,
    /// Seconds per frame (`hop_size / 11025`).
    pub time_resolution: f32,
    /// Hz per bin (`11025 / fft_size`).
    pub freq_resolution: f32,
}

impl Spectrogram {
    /// Magnitude at `(time_frame, frequency_bin)`.
    pub fn magnitude(&self, time_frame: usize, frequency_bin: usize) -> f32 {
        self.data[time_frame * self.frequency_bins + frequency_bin]
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Time at the start of `frame`, in seconds.
    pub fn frame_to_seconds(&self, frame: usize) -> f32 {
        frame as f32 * self.time_resolution
    }

    /// Frequency at the centre of `bin`, in Hz.
    pub fn bin_to_hz(&self, bin: usize) -> f32 {
        bin as f32 * self.freq_resolution
    }

    /// Nearest bin for a frequency; negative frequencies clamp to bin 0
    /// and anything past Nyquist clamps to the last bin.
    pub fn hz_to_bin(&self, hz: f32) -> usize {
        let bin = (hz.max(0.0) / self.freq_resolution).round() as usize;
        bin.min(self.frequency_bins.saturating_sub(1))
    }
}

/// Forward real-input FFT plus STFT driver.
///
/// Owns the planned transform for one `fft_size`; the plan is shared
/// read-only across the parallel frame loop. Hold one engine per pipeline.
pub struct FftEngine {
    fft_size: usize,
    fft: Arc<dyn Fft<f32>>,
}

impl FftEngine {
    /// Plan a forward FFT. `fft_size` must be a positive power of two.
    pub fn new(fft_size: usize) -> Result<Self> {
        if fft_size == 0 || !fft_size.is_power_of_two() {
            return Err(Error::InvalidFftSize(fft_size));
        }
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        Ok(Self { fft_size, fft })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Compute the magnitude spectrogram of a canonical-rate buffer.
    ///
    /// Frame `t` covers samples `[t * hop_size, t * hop_size + window_size)`
    /// with zero-padding past the end of the buffer; each frame is Hann
    /// windowed and zero-padded to the FFT size. The result has
    /// `fft_size / 2 + 1` frequency bins per frame.
    pub fn stft(&self, samples: &[f32], window_size: usize, hop_size: usize) -> Result<Spectrogram> {
        if samples.is_empty() {
            return Err(Error::EmptyInput);
        }
        if window_size > self.fft_size {
            return Err(Error::WindowExceedsFft {
                window: window_size,
                fft: self.fft_size,
            });
        }
        if hop_size == 0 || hop_size > window_size {
            return Err(Error::InvalidHop {
                hop: hop_size,
                window: window_size,
            });
        }

        let time_frames = samples.len().saturating_sub(window_size) / hop_size + 1;
        let frequency_bins = self.fft_size / 2 + 1;
        let window = hann_window(window_size);

        let frames: Vec<Vec<f32>> = (0..time_frames)
            .into_par_iter()
            .map(|t| self.frame_magnitudes(samples, t * hop_size, &window))
            .collect();

        let mut data = Vec::with_capacity(time_frames * frequency_bins);
        for frame in frames {
            data.extend_from_slice(&frame);
        }

        Ok(Spectrogram {
            data,
            time_frames,
            frequency_bins,
            time_resolution: hop_size as f32 / CANONICAL_SAMPLE_RATE as f32,
            freq_resolution: CANONICAL_SAMPLE_RATE as f32 / self.fft_size as f32,
        })
    }

    fn frame_magnitudes(&self, samples: &[f32], start: usize, window: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); self.fft_size];
        for (i, w) in window.iter().enumerate() {
            let sample = samples.get(start + i).copied().unwrap_or(0.0);
            buffer[i] = Complex::new(sample * w, 0.0);
        }

        self.fft.process(&mut buffer);

        buffer[..self.fft_size / 2 + 1]
            .iter()
            .map(|c| (c.re * c.re + c.im * c.im).sqrt())
            .collect()
    }
}

/// Compute an STFT with a default-sized engine.
pub fn stft(samples: &[f32], window_size: usize, hop_size: usize) -> Result<Spectrogram> {
    FftEngine::new(DEFAULT_FFT_SIZE)?.stft(samples, window_size, hop_size)
}
