/// Shared helpers for building recordings and scratch files.
use exg_montage::RawSignal;
use ndarray::Array1;
use std::path::PathBuf;

/// The 19 electrodes referenced by the TCP montage.
#[allow(unused)]
pub const TCP_ELECTRODES: &[&str] = &[
    "FP1", "F7", "T3", "T5", "O1", "FP2", "F8", "T4", "T6", "O2",
    "A1", "C3", "CZ", "C4", "A2", "F3", "P3", "F4", "P4",
];

#[allow(unused)]
/// Signal with the given labels, in order.
pub fn signal_from(chs: &[(&str, Vec<f32>)]) -> RawSignal {
    let mut s = RawSignal::new();
    for (label, v) in chs {
        s.insert(*label, Array1::from_vec(v.clone())).unwrap();
    }
    s
}

#[allow(unused)]
/// TUH-style recording: `EEG <electrode>-<suffix>` for every TCP electrode,
/// `n` samples each, channel `c` holding `c * 100 + t`.
pub fn tuh_recording(suffix: &str, n: usize) -> RawSignal {
    let mut s = RawSignal::new();
    for (c, el) in TCP_ELECTRODES.iter().enumerate() {
        let v = Array1::from_shape_fn(n, |t| (c * 100 + t) as f32);
        s.insert(format!("EEG {el}-{suffix}"), v).unwrap();
    }
    s
}

#[allow(unused)]
/// Unique scratch path under the system temp dir.
pub fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("exg-montage-{}-{name}", std::process::id()))
}
