use clap::{Parser, Subcommand, ValueEnum};
use notas::context::ContextType;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.1.0" for releases, "0.1.0@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "notas", bin_name = "notas", version = get_version())]
#[command(about = "Quick-capture notes with templates and context suggestions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Do not write log files
    #[arg(long, global = true)]
    pub no_log: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ContextArg {
    Time,
    #[value(alias = "app")]
    Application,
}

impl From<ContextArg> for ContextType {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::Time => ContextType::Time,
            ContextArg::Application => ContextType::Application,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print line, word and character counts of a file
    Stats {
        file: PathBuf,

        /// Print the counts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a file with its statistics
    #[command(alias = "o")]
    Open {
        file: PathBuf,
    },

    /// List the quick-capture templates
    #[command(alias = "t")]
    Templates,

    /// Create a note from a template and save it to the notes directory
    #[command(alias = "c")]
    Capture {
        /// Template name (e.g. meeting, todo, bug)
        #[arg(short, long)]
        template: Option<String>,

        /// Note title; defaults to the template's title
        #[arg(long)]
        title: Option<String>,

        /// Replace the template skeleton with this content
        #[arg(long)]
        content: Option<String>,

        /// Pick the template from a context instead
        #[arg(long, value_enum, conflicts_with = "template", requires = "value")]
        context: Option<ContextArg>,

        /// Context value, e.g. `morning` or `firefox`
        #[arg(long, requires = "context")]
        value: Option<String>,
    },

    /// Suggest a note for the current time, or for an application
    Suggest {
        #[arg(long)]
        app: Option<String>,
    },

    /// Render a markdown file to HTML
    Preview {
        file: PathBuf,

        /// Only print the first 100 characters
        #[arg(short, long)]
        short: bool,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        setting: Option<SettingCommand>,
    },

    /// Run a shell command and report when it finishes
    Run {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum SettingCommand {
    /// Show or set dark mode
    DarkMode {
        #[arg(value_enum)]
        value: Option<Toggle>,
    },
}
