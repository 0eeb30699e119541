use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "workout_planner", version, about = "Interactive workout menu planner backed by an LLM")]
pub struct Args {
    /// TOML configuration file.
    #[arg(long)]
    pub config: Option<String>,

    /// SQLite database file; overrides the config value.
    #[arg(long)]
    pub db: Option<String>,

    /// Model name; overrides the config value.
    #[arg(long)]
    pub model: Option<String>,

    /// Directory for prompt/response transcripts.
    #[arg(long)]
    pub transcripts: Option<String>,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
