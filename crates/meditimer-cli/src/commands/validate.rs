use clap::Args;
use meditimer_core::{Config, Segment, SegmentSpec, Sequencer};

use super::{format_hms, session_for};

#[derive(Args)]
pub struct ValidateArgs {
    /// Segments as M:SS[@label]; defaults to the configured plan
    pub segments: Vec<SegmentSpec>,
    /// Print the validated session as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let session = session_for(&args.segments, &config);

    // Same check a real start performs; the session is discarded afterwards.
    Sequencer::new(|_: &Segment| {}).start(&mut session.clone())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
        return Ok(());
    }

    for (i, segment) in session.segments().iter().enumerate() {
        let label = if segment.label.is_empty() {
            "(unlabeled)"
        } else {
            segment.label.as_str()
        };
        println!("{:>2}. {}  {}", i + 1, segment.configured, label);
    }
    println!(
        "ok: {} segment(s), {} total",
        session.segments().len(),
        format_hms(session.store().total_configured_secs())
    );
    Ok(())
}
