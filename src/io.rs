//! File boundary: montage files and safetensors recordings.
//!
//! Reader: parses `raw.safetensors` holding a `data` [C, T] F32 tensor and a
//! `ch_names` U8 tensor (newline-separated labels).
//! Writer: emits a derived signal in the same layout, so it can be read back.
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

use crate::config::MontageConfig;
use crate::definition::{self, MontageDefinition};
use crate::diagnostics::DiagnosticSink;
use crate::signal::{DerivedSignal, RawSignal};

/// Read and parse a montage file.
pub fn read_definition(
    path: &Path,
    config: &MontageConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<MontageDefinition> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading montage file {}", path.display()))?;
    definition::load(&text, config, sink)
        .with_context(|| format!("parsing montage file {}", path.display()))
}

// ── Low-level safetensors parser ─────────────────────────────────────────────

fn parse_header(bytes: &[u8]) -> Result<(HashMap<String, serde_json::Value>, usize)> {
    if bytes.len() < 8 {
        bail!("safetensors file too small");
    }
    let n = u64::from_le_bytes(bytes[..8].try_into()?);
    let end = usize::try_from(n)
        .ok()
        .and_then(|n| n.checked_add(8))
        .with_context(|| format!("safetensors header length {n} overflows"))?;
    let raw_header = bytes
        .get(8..end)
        .with_context(|| format!("safetensors header truncated ({n} bytes declared)"))?;
    let header: HashMap<String, serde_json::Value> =
        serde_json::from_slice(raw_header)
            .context("failed to parse safetensors header")?;
    Ok((header, end))
}

fn tensor_bytes<'a>(
    bytes: &'a [u8],
    data_start: usize,
    name: &str,
    entry: &serde_json::Value,
) -> Result<&'a [u8]> {
    let offsets = entry["data_offsets"]
        .as_array()
        .with_context(|| format!("'{name}': missing data_offsets"))?;
    let bound = |i: usize| -> Result<usize> {
        offsets
            .get(i)
            .and_then(|v| v.as_u64())
            .and_then(|v| usize::try_from(v).ok())
            .and_then(|v| data_start.checked_add(v))
            .with_context(|| format!("'{name}': bad data_offsets"))
    };
    let (s, e) = (bound(0)?, bound(1)?);
    if s > e {
        bail!("'{name}': data_offsets start after end");
    }
    bytes
        .get(s..e)
        .with_context(|| format!("'{name}': data_offsets out of range"))
}

fn shape_of(name: &str, entry: &serde_json::Value) -> Result<Vec<usize>> {
    entry["shape"]
        .as_array()
        .with_context(|| format!("'{name}': missing shape"))?
        .iter()
        .map(|v| {
            v.as_u64()
                .map(|d| d as usize)
                .with_context(|| format!("'{name}': non-integer dimension"))
        })
        .collect()
}

// ── Reader ───────────────────────────────────────────────────────────────────

/// A recording loaded from `raw.safetensors`.
pub struct RawRecording {
    /// Channel label → samples, in file order.
    pub signal: RawSignal,
    /// Sampling rate (Hz), when the file carries an `sfreq` tensor.
    pub sfreq: Option<f32>,
}

impl RawRecording {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let (header, data_start) = parse_header(&bytes)?;

        let data_entry = header.get("data").context("missing 'data' key")?;
        if data_entry["dtype"].as_str() != Some("F32") {
            bail!("'data' must be F32");
        }
        let data_shape = shape_of("data", data_entry)?;
        if data_shape.len() != 2 {
            bail!("'data' must be 2-D, got shape {:?}", data_shape);
        }
        let data_vec: Vec<f32> = tensor_bytes(&bytes, data_start, "data", data_entry)?
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        let data = ndarray::Array2::from_shape_vec((data_shape[0], data_shape[1]), data_vec)?;

        // Labels are mandatory here: the montage is keyed by them.
        let names_entry = header.get("ch_names").context("missing 'ch_names' key")?;
        let raw_str = std::str::from_utf8(tensor_bytes(&bytes, data_start, "ch_names", names_entry)?)
            .context("'ch_names' is not UTF-8")?;
        let ch_names: Vec<String> = raw_str
            .split('\n')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let sfreq = match header.get("sfreq") {
            Some(e) => tensor_bytes(&bytes, data_start, "sfreq", e)?
                .get(..4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            None => None,
        };

        let signal = RawSignal::from_rows(&ch_names, &data)?;
        log::debug!(
            "loaded {}: {} ch × {} samples",
            path.display(),
            data.nrows(),
            data.ncols()
        );
        Ok(RawRecording { signal, sfreq })
    }
}

// ── Writer ───────────────────────────────────────────────────────────────────

/// Minimal safetensors writer for F32, I32 and U8 tensors.
///
/// ```rust,no_run
/// use exg_montage::io::StWriter;
/// use std::path::Path;
/// let mut w = StWriter::new();
/// w.add_f32("signal", &[1.0f32, 2.0, 3.0], &[1, 3]);
/// w.add_text("ch_names", "FP1-F7\nF7-T3");
/// w.write(Path::new("/tmp/out.safetensors")).unwrap();
/// ```
#[derive(Default)]
pub struct StWriter {
    entries: Vec<(String, Vec<u8>, &'static str, Vec<usize>)>,
}

impl StWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_f32(&mut self, name: &str, data: &[f32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F32", shape.to_vec()));
    }

    pub fn add_f32_arr2(&mut self, name: &str, arr: &ndarray::Array2<f32>) {
        let data: Vec<f32> = arr.iter().copied().collect();
        self.add_f32(name, &data, &[arr.nrows(), arr.ncols()]);
    }

    pub fn add_i32(&mut self, name: &str, data: &[i32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "I32", shape.to_vec()));
    }

    /// Store a UTF-8 string as a 1-D U8 tensor.
    pub fn add_text(&mut self, name: &str, text: &str) {
        let bytes = text.as_bytes().to_vec();
        let len = bytes.len();
        self.entries.push((name.to_string(), bytes, "U8", vec![len]));
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        use std::io::Write;
        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for (name, data, dtype, shape) in &self.entries {
            header_map.insert(name.clone(), serde_json::json!({
                "dtype": dtype,
                "shape": shape,
                "data_offsets": [offset, offset + data.len()],
            }));
            offset += data.len();
        }
        let hdr_bytes = serde_json::to_vec(&header_map)?;
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        let padded: Vec<u8> = hdr_bytes.into_iter()
            .chain(std::iter::repeat(b' ').take(pad))
            .collect();
        let mut f = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        f.write_all(&(padded.len() as u64).to_le_bytes())?;
        f.write_all(&padded)?;
        for (_, data, _, _) in &self.entries {
            f.write_all(data)?;
        }
        Ok(())
    }
}

/// Write a derived signal to `path` as `data` [C, T] + `ch_names`.
///
/// `sfreq` is stored when known. Fails if channels have unequal lengths.
pub fn write_derived(signal: &DerivedSignal, sfreq: Option<f32>, path: &Path) -> Result<()> {
    let (names, data) = signal.to_array2()?;
    let mut w = StWriter::new();
    w.add_f32_arr2("data", &data);
    w.add_text("ch_names", &names.join("\n"));
    w.add_i32("n_channels", &[names.len() as i32], &[1]);
    if let Some(sfreq) = sfreq {
        w.add_f32("sfreq", &[sfreq], &[1]);
    }
    w.write(path)
}
