mod common;
use common::{signal_from, tuh_recording, TCP_ELECTRODES};
use exg_montage::{
    apply, validate, Diagnostic, DiagnosticKind, Montage, MontageConfig, MontageDefinition,
    MontageError, NullSink, TCP_AR,
};

const TWO_ROWS: &str = "\
montage = 0, FP1-F7: EEG FP1-REF -- EEG F7-REF
montage = 1, F7-T3: EEG F7-REF -- EEG T3-REF
";

#[test]
fn two_row_montage_yields_two_channels_in_order() {
    let n = 256;
    let raw = signal_from(&[
        ("EEG FP1-REF", vec![1.0; n]),
        ("EEG F7-REF", vec![0.25; n]),
        ("EEG T3-REF", vec![-1.0; n]),
    ]);
    let def = MontageDefinition::parse(TWO_ROWS).unwrap();
    let mut diags: Vec<Diagnostic> = Vec::new();
    let out = apply(&raw, &def, &mut diags).unwrap();

    assert_eq!(out.channel_names(), ["FP1-F7", "F7-T3"]);
    assert_eq!(out.get("FP1-F7").unwrap().len(), n);
    assert_eq!(out.get("F7-T3").unwrap().len(), n);
    for &v in out.get("F7-T3").unwrap().iter() {
        approx::assert_abs_diff_eq!(v, 1.25_f32, epsilon = 1e-6);
    }
    assert!(diags.is_empty());
}

#[test]
fn passthrough_is_identity() {
    let samples = vec![0.5, -3.0, 7.25, 1e-3];
    let raw = signal_from(&[("C1", samples.clone())]);
    let def = MontageDefinition::parse("montage = 0, C1: C1\n").unwrap();
    let out = apply(&raw, &def, &mut NullSink).unwrap();
    assert_eq!(out.get("C1").unwrap().to_vec(), samples);
}

#[test]
fn subtraction_correctness() {
    let raw = signal_from(&[("A", vec![1.0, 2.0, 3.0]), ("B", vec![0.0, 1.0, 1.0])]);
    let def = MontageDefinition::parse("montage = 0, A-B: A -- B\n").unwrap();
    let out = apply(&raw, &def, &mut NullSink).unwrap();
    assert_eq!(out.get("A-B").unwrap().to_vec(), vec![1.0, 1.0, 2.0]);
}

#[test]
fn missing_operand_omits_only_that_channel() {
    // No T3 at all: F7-T3 is dropped, FP1-F7 survives.
    let raw = signal_from(&[("EEG FP1-REF", vec![1.0; 4]), ("EEG F7-REF", vec![0.0; 4])]);
    let def = MontageDefinition::parse(TWO_ROWS).unwrap();
    let mut diags: Vec<Diagnostic> = Vec::new();
    let out = apply(&raw, &def, &mut diags).unwrap();

    assert_eq!(out.channel_names(), ["FP1-F7"]);
    assert!(out.get("F7-T3").is_none());
    assert_eq!(
        diags,
        vec![Diagnostic::new(
            "F7-T3",
            DiagnosticKind::UnmatchedSubtrahend { expected: "EEG T3".into() },
        )]
    );
}

#[test]
fn token_match_does_not_confuse_fp1_and_fp10() {
    let def = MontageDefinition::parse("montage = 0, FP1: FP1\n").unwrap();

    let hit = signal_from(&[("EEG FP1-REF", vec![1.0])]);
    assert_eq!(apply(&hit, &def, &mut NullSink).unwrap().len(), 1);

    let miss = signal_from(&[("EEG FP10-REF", vec![1.0])]);
    let mut diags: Vec<Diagnostic> = Vec::new();
    assert!(apply(&miss, &def, &mut diags).unwrap().is_empty());
    assert_eq!(diags.len(), 1);
}

#[test]
fn validate_is_stricter_than_apply() {
    // Montage written for -REF labels, recording referenced to linked ears.
    let raw = tuh_recording("LE", 16);
    let def = MontageDefinition::parse(TCP_AR).unwrap();

    let v = validate(&raw, &def);
    assert!(!v.is_complete());
    assert_eq!(v.missing.len(), TCP_ELECTRODES.len());
    assert_eq!(v.missing[0], "EEG FP1-REF");

    // Token matching still resolves every channel.
    let out = apply(&raw, &def, &mut NullSink).unwrap();
    assert_eq!(out.len(), 22);
}

#[test]
fn validate_reports_every_missing_operand_once() {
    let raw = signal_from(&[("EEG F7-REF", vec![0.0])]);
    let def = MontageDefinition::parse(TWO_ROWS).unwrap();
    let v = validate(&raw, &def);
    assert_eq!(v.missing, vec!["EEG FP1-REF", "EEG T3-REF"]);
    assert!(matches!(v.into_result(), Err(MontageError::MissingChannels { .. })));
}

#[test]
fn tcp_values_are_differences() {
    let raw = tuh_recording("REF", 8);
    let def = MontageDefinition::parse(TCP_AR).unwrap();
    let out = apply(&raw, &def, &mut NullSink).unwrap();
    assert_eq!(out.channel_names(), def.montage_order());

    // FP1 is channel 0, F7 channel 1: (0*100 + t) - (1*100 + t) = -100.
    for &v in out.get("FP1-F7").unwrap().iter() {
        approx::assert_abs_diff_eq!(v, -100.0_f32);
    }
}

#[test]
fn output_is_subsequence_of_montage_order() {
    let mut raw = tuh_recording("REF", 4);
    // Drop CZ by rebuilding without it.
    raw = {
        let mut s = exg_montage::RawSignal::new();
        for (label, v) in raw.iter().filter(|(l, _)| !l.contains("CZ")) {
            s.insert(label, v.clone()).unwrap();
        }
        s
    };
    let def = MontageDefinition::parse(TCP_AR).unwrap();
    let out = apply(&raw, &def, &mut NullSink).unwrap();
    assert_eq!(out.len(), 20);
    let expected: Vec<&str> = def
        .montage_order()
        .iter()
        .map(String::as_str)
        .filter(|n| !n.contains("CZ"))
        .collect();
    assert_eq!(out.channel_names(), expected);
}

#[test]
fn process_enforces_completeness_policy() {
    let raw = tuh_recording("LE", 4);

    let strict = Montage::with_definition(
        MontageConfig { require_complete: true, ..MontageConfig::default() },
        MontageDefinition::parse(TCP_AR).unwrap(),
    );
    assert!(matches!(
        strict.process(&raw, &mut NullSink),
        Err(MontageError::MissingChannels { missing }) if missing.len() == 19
    ));

    let partial = signal_from(&[("EEG FP1-REF", vec![0.0]), ("EEG F7-REF", vec![0.0])]);
    let capped = Montage::with_definition(
        MontageConfig { max_omitted: Some(0), ..MontageConfig::default() },
        MontageDefinition::parse(TWO_ROWS).unwrap(),
    );
    assert_eq!(
        capped.process(&partial, &mut NullSink),
        Err(MontageError::IncompleteMontage { omitted: 1, limit: 0 })
    );

    let lenient = Montage::with_definition(
        MontageConfig { max_omitted: Some(1), ..MontageConfig::default() },
        MontageDefinition::parse(TWO_ROWS).unwrap(),
    );
    assert_eq!(lenient.process(&partial, &mut NullSink).unwrap().len(), 1);
}

#[test]
fn shared_definition_across_threads() {
    let def = MontageDefinition::parse(TCP_AR).unwrap();
    let recordings: Vec<_> = (1..=4).map(|n| tuh_recording("REF", n * 32)).collect();

    let lens: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = recordings
            .iter()
            .map(|raw| {
                let def = &def;
                scope.spawn(move || {
                    let out = apply(raw, def, &mut NullSink).unwrap();
                    assert_eq!(out.len(), 22);
                    out.get("C3-CZ").unwrap().len()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(lens, vec![32, 64, 96, 128]);
}

#[test]
fn dimension_mismatch_leaves_definition_usable() {
    let def = MontageDefinition::parse(TWO_ROWS).unwrap();
    let bad = signal_from(&[
        ("EEG FP1-REF", vec![0.0; 3]),
        ("EEG F7-REF", vec![0.0; 2]),
        ("EEG T3-REF", vec![0.0; 2]),
    ]);
    assert!(matches!(
        apply(&bad, &def, &mut NullSink),
        Err(MontageError::DimensionMismatch { ref channel, minuend: 3, subtrahend: 2 }) if channel == "FP1-F7"
    ));

    let good = signal_from(&[
        ("EEG FP1-REF", vec![0.0; 2]),
        ("EEG F7-REF", vec![0.0; 2]),
        ("EEG T3-REF", vec![0.0; 2]),
    ]);
    assert_eq!(apply(&good, &def, &mut NullSink).unwrap().len(), 2);
}
