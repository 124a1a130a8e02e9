use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use exg_montage::{
    io::{read_definition, write_derived, RawRecording},
    load, preset, Diagnostic, DiagnosticSink, DuplicatePolicy, LogSink, Montage, MontageConfig,
};

#[derive(Parser)]
#[command(name = "montage", about = "Apply an EEG montage to a recording")]
struct Args {
    /// Montage file (`montage = <index>, <name>: <a> [-- <b>]` rows)
    #[arg(long, conflicts_with = "preset")]
    montage: Option<PathBuf>,

    /// Built-in montage instead of a file (tcp_ar, tcp_le)
    #[arg(long)]
    preset: Option<String>,

    /// raw.safetensors with `data` [C, T] and `ch_names`
    #[arg(long, required_unless_present = "print_order")]
    input: Option<PathBuf>,

    /// Output path for the derived signal
    #[arg(long, required_unless_present = "print_order")]
    output: Option<PathBuf>,

    /// Fail unless every operand is an exact channel label
    #[arg(long)]
    require_complete: bool,

    /// Fail when more than this many derived channels are omitted
    #[arg(long)]
    max_omitted: Option<usize>,

    /// Accept repeated derived channel names (last row wins)
    #[arg(long)]
    allow_duplicates: bool,

    /// Print channel and montage order, then exit
    #[arg(long)]
    print_order: bool,
}

/// Logs each diagnostic and keeps a copy for the summary line.
struct Collect(Vec<Diagnostic>);

impl DiagnosticSink for Collect {
    fn report(&mut self, diagnostic: Diagnostic) {
        LogSink.report(diagnostic.clone());
        self.0.push(diagnostic);
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cfg = MontageConfig {
        duplicates: if args.allow_duplicates {
            DuplicatePolicy::Overwrite
        } else {
            DuplicatePolicy::Reject
        },
        require_complete: args.require_complete,
        max_omitted: args.max_omitted,
        ..MontageConfig::default()
    };

    let mut sink = Collect(Vec::new());
    let definition = match (&args.montage, &args.preset) {
        (Some(path), _) => read_definition(path, &cfg, &mut sink)?,
        (None, Some(name)) => {
            let text = preset(name).with_context(|| format!("unknown preset '{name}'"))?;
            load(text, &cfg, &mut sink)?
        }
        (None, None) => bail!("one of --montage or --preset is required"),
    };
    println!("Loaded montage: {} derived channels", definition.len());

    if args.print_order {
        println!("channel order: {}", definition.channel_order().join(", "));
        println!("montage order: {}", definition.montage_order().join(", "));
        return Ok(());
    }

    let (Some(input), Some(output)) = (&args.input, &args.output) else {
        bail!("--input and --output are required");
    };

    let raw = RawRecording::load(input)?;
    println!("Loaded {} channels from {}", raw.signal.len(), input.display());

    let montage = Montage::with_definition(cfg, definition);
    let validation = montage.validate(&raw.signal)?;
    if !validation.is_complete() && !montage.config().require_complete {
        log::info!(
            "{} operand(s) are not exact labels, falling back to token matching: {}",
            validation.missing.len(),
            validation.missing.join(", ")
        );
    }

    sink.0.clear();
    let derived = montage.process(&raw.signal, &mut sink)?;
    println!(
        "Produced {} derived channels ({} omitted)",
        derived.len(),
        sink.0.iter().filter(|d| d.is_omission()).count()
    );

    write_derived(&derived, raw.sfreq, output)?;
    println!("Written → {}", output.display());

    Ok(())
}
