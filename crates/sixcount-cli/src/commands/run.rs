//! Live workout runner.
//!
//! Drives the session state machine on a 100 ms tokio interval -- the same
//! single-scheduler model the core assumes -- printing cues through the
//! terminal sink and a status line on each state change.

use std::time::Duration;

use clap::Args;
use sixcount_core::config::format_time;
use sixcount_core::{
    AppConfig, CalloutManifest, CueDispatcher, CueStyle, Event, Phase, WorkoutSession,
};

use super::WorkoutArgs;
use crate::sink::TerminalSink;

/// Fine-grained elapsed/duration tick period.
const TICK_MS: u64 = 100;

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub workout: WorkoutArgs,
    /// Ring the terminal bell on tone cues
    #[arg(long)]
    pub bell: bool,
    /// Emit every session event as JSON lines instead of a status line
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let app = AppConfig::load_or_default();
    let config = args.workout.apply(app.workout);

    let style = if args.workout.voice {
        CueStyle::Voice
    } else {
        app.cue_style
    };

    let mut dispatcher = CueDispatcher::new(style, Box::new(TerminalSink::new(args.bell)));
    if style == CueStyle::Voice {
        if let Some(path) = &app.manifest_path {
            match CalloutManifest::load(path) {
                Ok(manifest) => dispatcher = dispatcher.with_manifest(manifest),
                // A missing manifest is non-fatal: speech covers every cue.
                Err(e) => eprintln!("warning: {e}"),
            }
        }
    }

    let session = WorkoutSession::new(config, dispatcher)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(drive(session, args.json))?;
    Ok(())
}

async fn drive(
    mut session: WorkoutSession,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let started = session.start_workout()?;
    if json {
        println!("{}", serde_json::to_string(&started)?);
    }

    let mut interval = tokio::time::interval(Duration::from_millis(TICK_MS));
    loop {
        interval.tick().await;
        let events = session.tick();
        for event in &events {
            if json {
                println!("{}", serde_json::to_string(event)?);
            } else {
                print_status(&session, event);
            }
        }
        if session.phase() == Phase::Stopped {
            break;
        }
    }

    if !json {
        println!(
            "done: {} reps in {}",
            session.current_rep(),
            format_time(session.elapsed_ms())
        );
    }
    Ok(())
}

fn print_status(session: &WorkoutSession, event: &Event) {
    match event {
        Event::CountdownTick { remaining, .. } => {
            println!("  starting in {remaining}...");
        }
        Event::RepCompleted { rep, .. } => {
            println!(
                "  rep {rep}/{} @ {}",
                session.config().target_reps,
                format_time(session.elapsed_ms())
            );
        }
        Event::RestStarted { seconds, .. } => {
            println!("  rest {seconds:.1}s");
        }
        Event::SetStarted { set, .. } => {
            println!("  set {set}");
        }
        _ => {}
    }
}
