use std::path::PathBuf;

use crate::engine::EngineCommand;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port the service listens on
    pub port: u16,
    /// Directory staged request payloads are written to
    pub staging_dir: PathBuf,
    /// Directory the engine writes produced images to (served at /outputs)
    pub outputs_dir: PathBuf,
    /// Image reference returned to clients; the engine writes to a fixed name
    pub image_url: String,
    /// Generation engine command line; the staged path (and `--benchmark`
    /// when requested) is appended per invocation
    pub engine_command: Vec<String>,
    /// Validation engine command line; the staged path is appended
    pub validator_command: Vec<String>,
    /// Working directory for the validation command, if it needs one
    pub validator_workdir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            port: env_parse("RENDERD_PORT", 3000)?,
            staging_dir: PathBuf::from(env_str("RENDERD_STAGING_DIR", "./temp")),
            outputs_dir: PathBuf::from(env_str("RENDERD_OUTPUTS_DIR", "./plotter/output")),
            image_url: env_str("RENDERD_IMAGE_URL", "/outputs/main.png"),
            engine_command: env_command("RENDERD_ENGINE_COMMAND", "python scripts/generate.py")?,
            validator_command: env_command(
                "RENDERD_VALIDATOR_COMMAND",
                "cargo run --bin neuron-cli validate",
            )?,
            validator_workdir: std::env::var("RENDERD_VALIDATOR_WORKDIR")
                .ok()
                .map(PathBuf::from),
        })
    }

    /// Full generation command for one staged artifact.
    /// Benchmark mode is a flag on the same command, not a separate path.
    pub fn generate_command(&self, staged: &std::path::Path, benchmark: bool) -> EngineCommand {
        let mut cmd = EngineCommand::from_parts(&self.engine_command, None);
        cmd.args.push(staged.display().to_string());
        if benchmark {
            cmd.args.push("--benchmark".to_string());
        }
        cmd
    }

    /// Full validation command for one staged artifact.
    pub fn validate_command(&self, staged: &std::path::Path) -> EngineCommand {
        let mut cmd =
            EngineCommand::from_parts(&self.validator_command, self.validator_workdir.clone());
        cmd.args.push(staged.display().to_string());
        cmd
    }
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse env var {key}={val}: {e}")),
        Err(_) => Ok(default),
    }
}

/// Whitespace-split command line from the environment. Rejects empty values
/// so a misconfigured engine fails at startup, not per request.
fn env_command(key: &str, default: &str) -> anyhow::Result<Vec<String>> {
    let raw = env_str(key, default);
    let parts: Vec<String> = raw.split_whitespace().map(ToString::to_string).collect();
    if parts.is_empty() {
        return Err(anyhow::anyhow!("{key} must name a command to run"));
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            port: 0,
            staging_dir: PathBuf::from("/tmp/staging"),
            outputs_dir: PathBuf::from("/tmp/output"),
            image_url: "/outputs/main.png".to_string(),
            engine_command: vec!["python".into(), "scripts/generate.py".into()],
            validator_command: vec!["neuron-cli".into(), "validate".into()],
            validator_workdir: Some(PathBuf::from("/srv/validator")),
        }
    }

    #[test]
    fn generate_command_appends_staged_path() {
        let cmd = test_config().generate_command(std::path::Path::new("/tmp/arch-01.json"), false);
        assert_eq!(cmd.program, "python");
        assert_eq!(cmd.args, vec!["scripts/generate.py", "/tmp/arch-01.json"]);
        assert!(cmd.workdir.is_none());
    }

    #[test]
    fn benchmark_flag_rides_the_same_command() {
        let cmd = test_config().generate_command(std::path::Path::new("/tmp/arch-01.json"), true);
        assert_eq!(cmd.args.last().map(String::as_str), Some("--benchmark"));
    }

    #[test]
    fn validate_command_carries_its_workdir() {
        let cmd = test_config().validate_command(std::path::Path::new("/tmp/validate-01.json"));
        assert_eq!(cmd.program, "neuron-cli");
        assert_eq!(cmd.workdir, Some(PathBuf::from("/srv/validator")));
    }
}
