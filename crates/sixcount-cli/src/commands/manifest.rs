use std::path::PathBuf;

use clap::Subcommand;
use sixcount_core::CalloutManifest;

#[derive(Subcommand)]
pub enum ManifestAction {
    /// Summarize a callout manifest
    Show {
        /// Path to the manifest JSON
        path: PathBuf,
    },
    /// Check whether a count or rep number has a recorded clip
    Check {
        /// Path to the manifest JSON
        path: PathBuf,
        /// Count number to check
        #[arg(long)]
        count: Option<u32>,
        /// Rep number to check
        #[arg(long)]
        rep: Option<u32>,
    },
}

pub fn run(action: ManifestAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ManifestAction::Show { path } => {
            let manifest = CalloutManifest::load(&path)?;
            let mut counts: Vec<u32> = manifest.counts.keys().copied().collect();
            counts.sort_unstable();
            let mut reps: Vec<u32> = manifest.reps.keys().copied().collect();
            reps.sort_unstable();
            println!("audio file: {}", manifest.audio_file);
            println!("counts:     {counts:?}");
            println!("reps:       {reps:?}");
        }
        ManifestAction::Check { path, count, rep } => {
            let manifest = CalloutManifest::load(&path)?;
            if let Some(n) = count {
                match manifest.count(n) {
                    Some(segment) => println!(
                        "count {n}: {:.2}s-{:.2}s \"{}\"",
                        segment.start, segment.end, segment.text
                    ),
                    None => println!("count {n}: no clip (speech fallback)"),
                }
            }
            if let Some(n) = rep {
                match manifest.rep(n) {
                    Some(segment) => println!(
                        "rep {n}: {:.2}s-{:.2}s \"{}\"",
                        segment.start, segment.end, segment.text
                    ),
                    None => println!("rep {n}: no clip (speech fallback)"),
                }
            }
        }
    }
    Ok(())
}
