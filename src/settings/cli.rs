use super::Parser;

#[derive(Parser, Debug)]
#[command(about = "Stateless session service with rotating refresh tokens")]
pub struct Cli {
    /// Path to a TOML settings file.
    #[arg(long)]
    pub settings: Option<String>,
}
