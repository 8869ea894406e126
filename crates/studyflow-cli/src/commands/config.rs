use clap::Subcommand;
use studyflow_core::{ConfigError, SchedulerConfig};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a single value
    Get {
        /// Key, dot paths allowed (e.g. "day_start_hour", "blackouts.0.start_hour")
        key: String,
    },
    /// Change a value and persist it
    Set { key: String, value: String },
    /// Print every value as JSON
    List,
    /// Write the defaults back to disk
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = SchedulerConfig::load_or_default();

    match action {
        ConfigAction::Get { key } => match config.get(&key) {
            Some(value) => println!("{value}"),
            None => {
                eprintln!("unknown key: {key}");
                std::process::exit(1);
            }
        },
        ConfigAction::Set { key, value } => match config.set(&key, &value) {
            // Echo the stored value; numbers may normalize on the way in
            Ok(()) => println!("{key} = {}", config.get(&key).unwrap_or(value)),
            Err(e @ (ConfigError::InvalidValue { .. } | ConfigError::MissingKey(_))) => {
                eprintln!("rejected: {e}");
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        },
        ConfigAction::List => println!("{}", serde_json::to_string_pretty(&config)?),
        ConfigAction::Reset => {
            SchedulerConfig::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
