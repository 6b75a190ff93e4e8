use crate::adapters::fleet::FleetEnv;
use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::core::{Request, Verb};
use crate::utils::error::Result;
use crate::utils::validation::{validate_group_name, Validate};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "groupctl")]
#[command(about = "Manage groups of templated unit files on a fleet cluster")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// fleet HTTP API endpoint (overrides config file and FLEET_ENDPOINT)
    #[arg(long, global = true)]
    pub fleet_endpoint: Option<String>,

    /// Directory that contains one subdirectory per group
    #[arg(long, global = true)]
    pub groups_dir: Option<PathBuf>,

    /// Timeout for each fleet request, in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Load the units of a group into the cluster without starting them
    Submit(GroupArgs),
    /// Start the submitted units of a group
    Start(GroupArgs),
    /// Stop the running units of a group
    Stop(GroupArgs),
    /// Remove the units of a group from the cluster
    Destroy(GroupArgs),
    /// Show the state of every unit of a group
    Status(GroupArgs),
}

#[derive(Debug, Clone, Args)]
pub struct GroupArgs {
    /// Group name, a directory below the groups dir
    pub group: String,

    /// Slice IDs to instantiate, e.g. 1 2 3
    pub slice_ids: Vec<String>,
}

impl Command {
    pub fn verb(&self) -> Verb {
        match self {
            Command::Submit(_) => Verb::Submit,
            Command::Start(_) => Verb::Start,
            Command::Stop(_) => Verb::Stop,
            Command::Destroy(_) => Verb::Destroy,
            Command::Status(_) => Verb::GetStatus,
        }
    }

    pub fn args(&self) -> &GroupArgs {
        match self {
            Command::Submit(args)
            | Command::Start(args)
            | Command::Stop(args)
            | Command::Destroy(args)
            | Command::Status(args) => args,
        }
    }

    /// Unloaded request for the group named on the command line.
    pub fn request(&self) -> Request {
        let args = self.args();
        Request::new(args.group.clone()).with_slice_ids(args.slice_ids.iter().cloned())
    }
}

impl CliConfig {
    /// 合併設定：命令列 > 設定檔 > 環境變數 > 預設值
    pub fn settings(&self) -> Result<Settings> {
        self.settings_with_env(&FleetEnv::read())
    }

    /// Resolves each field from the highest layer that sets it and validates
    /// the merged result once. Environment values shadowed by the config
    /// file or a flag are never parsed.
    pub fn settings_with_env(&self, env: &FleetEnv) -> Result<Settings> {
        let file_config = match &self.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None => None,
        };
        let file = file_config.as_ref();
        let defaults = Settings::default();

        let fleet_endpoint = self
            .fleet_endpoint
            .clone()
            .or_else(|| file.and_then(TomlConfig::fleet_endpoint).map(str::to_string))
            .or_else(|| env.endpoint.clone())
            .unwrap_or(defaults.fleet_endpoint);

        let timeout_secs = match self
            .timeout_secs
            .or_else(|| file.and_then(TomlConfig::timeout_secs))
        {
            Some(timeout) => timeout,
            None => env
                .parsed_timeout_secs()?
                .unwrap_or(defaults.timeout_secs),
        };

        let groups_dir = self
            .groups_dir
            .clone()
            .or_else(|| file.and_then(TomlConfig::groups_dir).map(Path::to_path_buf))
            .unwrap_or(defaults.groups_dir);

        let settings = Settings {
            fleet_endpoint,
            groups_dir,
            timeout_secs,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_group_name("group", &self.command.args().group)
    }
}
