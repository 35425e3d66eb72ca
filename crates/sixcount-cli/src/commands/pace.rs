use clap::Args;
use sixcount_core::{compute_pacing, AppConfig};

use super::WorkoutArgs;

#[derive(Args)]
pub struct PaceArgs {
    #[command(flatten)]
    pub workout: WorkoutArgs,
}

pub fn run(args: PaceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let app = AppConfig::load_or_default();
    let config = args.workout.apply(app.workout);
    let plan = compute_pacing(&config, args.workout.voice)?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
