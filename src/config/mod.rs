pub mod scenario;

pub use scenario::ScenarioConfig;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_path, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "subway")]
    #[command(about = "Replay subway line scenarios against an in-memory network")]
    pub struct CliConfig {
        /// Path to TOML scenario file
        #[arg(short, long, default_value = "scenario.toml")]
        pub scenario: String,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Pretty-print the JSON report")]
        pub pretty: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,

        /// Dry run - validate the scenario without executing it
        #[arg(long)]
        pub dry_run: bool,
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("scenario", &self.scenario)
        }
    }
}
