use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "merisadak",
    version,
    about = "MERI SADAK road records management CLI",
    long_about = "MERI SADAK manages a local working set of road records with role-based access control, facet filtering, and pagination.\n\nExamples:\n  merisadak login -e central@rms.com -p central123\n  merisadak records --state rajasthan --status open --page 2\n  merisadak records --since 2024-01-01 --format json -o report.json\n\nTip: demo accounts are central@rms.com, state@rms.com, and user@rms.com."
)]
pub struct CliArgs {
    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.merisadak/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "dd",
        visible_alias = "data-dir",
        value_name = "DIR",
        help_heading = "Input",
        help = "Directory for the durable session/records store."
    )]
    pub data_dir: Option<String>,

    #[arg(
        long = "ru",
        visible_alias = "records-url",
        value_name = "URL",
        help_heading = "Input",
        help = "URL of the records JSON dataset fetched when no cache exists."
    )]
    pub records_url: Option<String>,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in with demo credentials and start a session.
    Login {
        #[arg(
            short = 'e',
            long = "em",
            visible_alias = "email",
            value_name = "EMAIL",
            help_heading = "Credentials",
            help = "Account email address."
        )]
        email: String,

        #[arg(
            short = 'p',
            long = "pw",
            visible_alias = "password",
            value_name = "PASSWORD",
            help_heading = "Credentials",
            help = "Account password."
        )]
        password: String,
    },

    /// End the current session.
    Logout,

    /// Show the current session and its capability gates.
    Whoami,

    /// List records visible to the current session.
    Records(RecordsArgs),

    /// List the states the current session may select.
    States,

    /// List the districts of one state.
    Districts {
        #[arg(value_name = "STATE", help = "State name or key, e.g. rajasthan.")]
        state: String,
    },

    /// Replace the records working set from a local JSON file.
    Import {
        #[arg(value_name = "FILE", help = "JSON file containing an array of records.")]
        file: String,
    },

    /// Drop the cached records and refetch from the configured URL.
    Sync,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RecordsArgs {
    #[arg(
        short = 's',
        long = "st",
        visible_alias = "state",
        value_name = "STATE",
        help_heading = "Filters",
        help = "Only records in this state ('all' clears)."
    )]
    pub state: Option<String>,

    #[arg(
        short = 'd',
        long = "dc",
        visible_alias = "district",
        value_name = "DISTRICT",
        help_heading = "Filters",
        help = "Only records in this district ('all' clears)."
    )]
    pub district: Option<String>,

    #[arg(
        short = 't',
        long = "ty",
        visible_alias = "type",
        value_name = "TYPE",
        help_heading = "Filters",
        help = "Only records of this type, e.g. road-damage ('all' clears)."
    )]
    pub kind: Option<String>,

    #[arg(
        short = 'u',
        long = "ss",
        visible_alias = "status",
        value_name = "STATUS",
        help_heading = "Filters",
        help = "Only records with this status: open, in-progress, or closed."
    )]
    pub status: Option<String>,

    #[arg(
        short = 'P',
        long = "pr",
        visible_alias = "priority",
        value_name = "PRIORITY",
        help_heading = "Filters",
        help = "Only records with this priority: low, medium, high, or urgent."
    )]
    pub priority: Option<String>,

    #[arg(
        short = 'D',
        long = "sn",
        visible_alias = "since",
        value_name = "DATE",
        help_heading = "Filters",
        help = "Only records dated on or after this day (YYYY-MM-DD)."
    )]
    pub since: Option<String>,

    #[arg(
        short = 'g',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "Paging",
        help = "Page of the filtered set to show (9 records per page)."
    )]
    pub page: Option<usize>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text or json)."
    )]
    pub format: Option<String>,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the report to a file (requires the download-report capability)."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'S',
        long = "sy",
        visible_alias = "sync",
        help_heading = "Input",
        help = "Drop the cached records and refetch before filtering."
    )]
    pub sync: bool,
}
