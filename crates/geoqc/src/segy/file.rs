//! Memory-mapped SEG-Y file handle.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::error::{GeoQcError, Result};

use super::text::decode_text_header;

const TEXT_HEADER_LEN: usize = 3200;
const BIN_HEADER_LEN: usize = 400;
const HEADERS_LEN: usize = TEXT_HEADER_LEN + BIN_HEADER_LEN;
const TRACE_HEADER_LEN: usize = 240;

// Binary header field offsets (absolute file offsets, SEG-Y Rev 1).
const BIN_INTERVAL: usize = 3216;
const BIN_SAMPLES: usize = 3220;
const BIN_FORMAT: usize = 3224;
const BIN_SORTING: usize = 3228;
const BIN_MEASUREMENT: usize = 3254;

/// How a SEG-Y file was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegyMode {
    /// No geometry assumptions; tolerant of irregular 2D lines.
    TwoD,
    /// Inline/crossline axes built at open time.
    ThreeD,
}

impl std::fmt::Display for SegyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegyMode::TwoD => write!(f, "2D"),
            SegyMode::ThreeD => write!(f, "3D"),
        }
    }
}

/// Trace header fields by their standard byte position (1-based, Rev 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceField {
    /// Original field record number (byte 9).
    FieldRecord,
    /// CDP ensemble number (byte 21).
    Cdp,
    /// Source coordinate X/Y (bytes 73/77).
    SourceX,
    SourceY,
    /// Group coordinate X/Y (bytes 81/85).
    GroupX,
    GroupY,
    /// CDP coordinate X/Y (bytes 181/185).
    CdpX,
    CdpY,
    /// 3D poststack inline/crossline numbers (bytes 189/193).
    Inline3d,
    Crossline3d,
}

impl TraceField {
    /// Zero-based byte offset within the 240-byte trace header.
    fn offset(self) -> usize {
        match self {
            TraceField::FieldRecord => 8,
            TraceField::Cdp => 20,
            TraceField::SourceX => 72,
            TraceField::SourceY => 76,
            TraceField::GroupX => 80,
            TraceField::GroupY => 84,
            TraceField::CdpX => 180,
            TraceField::CdpY => 184,
            TraceField::Inline3d => 188,
            TraceField::Crossline3d => 192,
        }
    }
}

/// An open SEG-Y file.
///
/// All multi-byte fields are decoded big-endian per the SEG-Y standard.
/// Trace data is accessed lazily through the memory map; nothing beyond
/// the headers is touched at open time except the 3D geometry scan.
pub struct SegyFile {
    mmap: Mmap,
    path: PathBuf,
    mode: SegyMode,
    trace_count: usize,
    samples_per_trace: usize,
    sample_interval_us: u16,
    format_code: i16,
    bytes_per_sample: usize,
    ilines: Vec<i32>,
    xlines: Vec<i32>,
}

impl std::fmt::Debug for SegyFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegyFile")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("trace_count", &self.trace_count)
            .field("samples_per_trace", &self.samples_per_trace)
            .field("format_code", &self.format_code)
            .finish()
    }
}

impl SegyFile {
    /// Open in 2D mode: no inline/crossline geometry is constructed.
    pub fn open_2d(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path.as_ref(), SegyMode::TwoD)
    }

    /// Open in 3D mode: builds sorted unique inline/crossline axes from the
    /// trace headers. Fails with [`GeoQcError::NoGeometry`] when the file
    /// carries no 3D grid information.
    pub fn open_3d(path: impl AsRef<Path>) -> Result<Self> {
        let mut segy = Self::open(path.as_ref(), SegyMode::ThreeD)?;
        segy.build_geometry()?;
        Ok(segy)
    }

    fn open(path: &Path, mode: SegyMode) -> Result<Self> {
        let file = File::open(path).map_err(|e| GeoQcError::io(path, e))?;
        // Safety: the map is read-only and the file is not written through
        // this process while the handle is alive.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| GeoQcError::io(path, e))?;

        if mmap.len() < HEADERS_LEN {
            return Err(GeoQcError::Segy(format!(
                "file too small for SEG-Y headers ({} bytes)",
                mmap.len()
            )));
        }

        let samples_per_trace = read_u16_be(&mmap, BIN_SAMPLES) as usize;
        let sample_interval_us = read_u16_be(&mmap, BIN_INTERVAL);
        let format_code = read_i16_be(&mmap, BIN_FORMAT);

        let bytes_per_sample = match format_code {
            1 | 2 | 5 => 4,
            3 => 2,
            8 => 1,
            other => {
                return Err(GeoQcError::Segy(format!(
                    "unsupported data format code {other}"
                )))
            }
        };

        if samples_per_trace == 0 {
            return Err(GeoQcError::Segy("zero samples per trace".to_string()));
        }

        let trace_size = TRACE_HEADER_LEN + samples_per_trace * bytes_per_sample;
        let trace_count = (mmap.len() - HEADERS_LEN) / trace_size;
        if trace_count == 0 {
            return Err(GeoQcError::Segy("no complete traces".to_string()));
        }

        Ok(Self {
            mmap,
            path: path.to_path_buf(),
            mode,
            trace_count,
            samples_per_trace,
            sample_interval_us,
            format_code,
            bytes_per_sample,
            ilines: Vec::new(),
            xlines: Vec::new(),
        })
    }

    /// Scan every trace header and collect the sorted unique inline and
    /// crossline values.
    fn build_geometry(&mut self) -> Result<()> {
        let mut ilines = Vec::new();
        let mut xlines = Vec::new();

        for i in 0..self.trace_count {
            let il = self.header_i32(i, TraceField::Inline3d)?;
            let xl = self.header_i32(i, TraceField::Crossline3d)?;
            if il != 0 {
                ilines.push(il);
            }
            if xl != 0 {
                xlines.push(xl);
            }
        }

        ilines.sort_unstable();
        ilines.dedup();
        xlines.sort_unstable();
        xlines.dedup();

        if ilines.is_empty() || xlines.is_empty() {
            return Err(GeoQcError::NoGeometry(
                self.path.display().to_string(),
            ));
        }

        self.ilines = ilines;
        self.xlines = xlines;
        Ok(())
    }

    /// File name without path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Full path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open mode (2D or 3D).
    pub fn mode(&self) -> SegyMode {
        self.mode
    }

    /// Number of complete traces.
    pub fn trace_count(&self) -> usize {
        self.trace_count
    }

    /// Samples per trace from the binary header.
    pub fn samples_per_trace(&self) -> usize {
        self.samples_per_trace
    }

    /// Sample interval in microseconds, as stored in the binary header.
    pub fn sample_interval_us(&self) -> u16 {
        self.sample_interval_us
    }

    /// Sample interval in milliseconds.
    pub fn sample_interval_ms(&self) -> f64 {
        f64::from(self.sample_interval_us) / 1000.0
    }

    /// Trace data format code from the binary header.
    pub fn format_code(&self) -> i16 {
        self.format_code
    }

    /// Trace sorting code from the binary header.
    pub fn sorting_code(&self) -> i16 {
        read_i16_be(&self.mmap, BIN_SORTING)
    }

    /// Measurement system from the binary header (1 = meters, 2 = feet).
    pub fn measurement_system(&self) -> i16 {
        read_i16_be(&self.mmap, BIN_MEASUREMENT)
    }

    /// Sorted unique inline numbers (3D mode only; empty for 2D opens).
    pub fn ilines(&self) -> &[i32] {
        &self.ilines
    }

    /// Sorted unique crossline numbers (3D mode only; empty for 2D opens).
    pub fn xlines(&self) -> &[i32] {
        &self.xlines
    }

    /// Decoded 3200-byte textual header, wrapped to 40 card-image lines.
    pub fn text_header(&self) -> String {
        decode_text_header(&self.mmap[..TEXT_HEADER_LEN])
    }

    /// Read a trace header field as a big-endian i32.
    pub fn header_i32(&self, trace_index: usize, field: TraceField) -> Result<i32> {
        let base = self.trace_offset(trace_index)?;
        Ok(read_i32_be(&self.mmap, base + field.offset()))
    }

    /// Decode the sample array of one trace as f64.
    pub fn trace(&self, trace_index: usize) -> Result<Vec<f64>> {
        let base = self.trace_offset(trace_index)? + TRACE_HEADER_LEN;
        let n = self.samples_per_trace;
        let mut samples = Vec::with_capacity(n);

        match self.format_code {
            1 => {
                for i in 0..n {
                    let bits = read_u32_be(&self.mmap, base + i * 4);
                    samples.push(ibm_to_f64(bits));
                }
            }
            2 => {
                for i in 0..n {
                    samples.push(f64::from(read_i32_be(&self.mmap, base + i * 4)));
                }
            }
            3 => {
                for i in 0..n {
                    samples.push(f64::from(read_i16_be(&self.mmap, base + i * 2)));
                }
            }
            5 => {
                for i in 0..n {
                    let bits = read_u32_be(&self.mmap, base + i * 4);
                    samples.push(f64::from(f32::from_bits(bits)));
                }
            }
            8 => {
                for i in 0..n {
                    samples.push(f64::from(self.mmap[base + i] as i8));
                }
            }
            other => {
                return Err(GeoQcError::Segy(format!(
                    "unsupported data format code {other}"
                )))
            }
        }

        Ok(samples)
    }

    fn trace_offset(&self, trace_index: usize) -> Result<usize> {
        if trace_index >= self.trace_count {
            return Err(GeoQcError::Segy(format!(
                "trace index {trace_index} out of range ({} traces)",
                self.trace_count
            )));
        }
        let trace_size = TRACE_HEADER_LEN + self.samples_per_trace * self.bytes_per_sample;
        Ok(HEADERS_LEN + trace_index * trace_size)
    }
}

fn read_u16_be(buf: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([buf[offset], buf[offset + 1]])
}

fn read_i16_be(buf: &[u8], offset: usize) -> i16 {
    i16::from_be_bytes([buf[offset], buf[offset + 1]])
}

fn read_u32_be(buf: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

fn read_i32_be(buf: &[u8], offset: usize) -> i32 {
    i32::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

/// Decode an IBM System/360 hexadecimal float.
///
/// Sign bit, 7-bit base-16 exponent biased by 64, 24-bit fraction.
fn ibm_to_f64(bits: u32) -> f64 {
    if bits & 0x7fff_ffff == 0 {
        return 0.0;
    }
    let sign = if bits >> 31 == 1 { -1.0 } else { 1.0 };
    let exponent = ((bits >> 24) & 0x7f) as i32 - 64;
    let fraction = f64::from(bits & 0x00ff_ffff) / f64::from(1u32 << 24);
    sign * fraction * 16f64.powi(exponent)
}
