//! Clap derive structures for the `refdesk` CLI.
//!
//! Only clap types live here; `build.rs` includes this file to render man
//! pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// refdesk -- command-line console for the reference-data admin backend
#[derive(Debug, Parser)]
#[command(
    name = "refdesk",
    version,
    about = "Manage branches, clients, employees and other reference data",
    long_about = "Command-line console for the refdesk admin backend.\n\n\
        Lists are paginated, sortable and searchable; create and update\n\
        report validation errors per field.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Profile to use
    #[arg(long, short = 'p', env = "REFDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, short = 'u', env = "REFDESK_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Bearer token (overrides keyring and profile)
    #[arg(long, env = "REFDESK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "REFDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "REFDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "REFDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage branches (regions and sub-regions)
    #[command(alias = "br")]
    Branches(BranchesArgs),

    /// Manage orients (landmarks within a branch)
    Orients(OrientsArgs),

    /// Manage categories
    #[command(alias = "cat")]
    Categories(CategoriesArgs),

    /// Manage clients
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// Manage employees
    #[command(alias = "emp")]
    Employees(EmployeesArgs),

    /// Manage roles and their permissions
    Roles(RolesArgs),

    /// Picklists used by the create and update forms
    Options(OptionsArgs),

    /// Page through a list interactively
    Browse(BrowseArgs),

    /// Log in and store the session token
    Login(LoginArgs),

    /// End the session and forget the stored token
    Logout,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Paging, sorting and search for every list command.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Rows per page (defaults to the profile's page size)
    #[arg(long, short = 'n')]
    pub per_page: Option<u32>,

    /// Sort field
    #[arg(long, default_value = "id")]
    pub sort: String,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Search text
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

/// Filters shared by client and employee lists.
#[derive(Debug, Clone, Args)]
pub struct PersonFilterArgs {
    /// Only this branch
    #[arg(long)]
    pub branch: Option<u64>,

    /// Phone verification
    #[arg(long, value_parser = ["all", "verified", "unverified"])]
    pub verified: Option<String>,

    /// Account status
    #[arg(long, value_parser = ["all", "active", "inactive", "trashed"])]
    pub activity: Option<String>,
}

/// Fields shared by client and employee forms.
#[derive(Debug, Clone, Args)]
pub struct PersonFields {
    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// Phone number (digits, with country code)
    #[arg(long)]
    pub phone: Option<String>,

    /// Birthday (YYYY-MM-DD)
    #[arg(long)]
    pub birthday: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Account password (prompted when given without a value)
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub password: Option<String>,

    /// Whether the account is active
    #[arg(long)]
    pub active: Option<bool>,

    /// Branch id
    #[arg(long)]
    pub branch: Option<u64>,

    /// Read the form as JSON; flags override its fields
    #[arg(long, short = 'f')]
    pub from_file: Option<PathBuf>,
}

// ── Branches ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BranchesArgs {
    #[command(subcommand)]
    pub command: BranchesCommand,
}

#[derive(Debug, Subcommand)]
pub enum BranchesCommand {
    /// List branches
    #[command(alias = "ls")]
    List(ListArgs),

    /// Regions followed by their sub-regions
    Tree {
        /// Use the nested tree endpoint instead of the flat picklist
        #[arg(long)]
        nested: bool,
    },

    /// Show one branch
    Get { id: u64 },

    /// Create a branch
    Create(BranchFields),

    /// Update a branch
    Update {
        id: u64,
        #[command(flatten)]
        fields: BranchFields,
    },

    /// Delete a branch
    #[command(alias = "rm")]
    Delete { id: u64 },
}

#[derive(Debug, Clone, Args)]
pub struct BranchFields {
    #[arg(long)]
    pub name: Option<String>,

    /// Parent region id (0 makes it a region)
    #[arg(long)]
    pub parent: Option<u64>,

    /// Whether the branch is a warehouse
    #[arg(long)]
    pub warehouse: Option<bool>,

    /// Read the form as JSON; flags override its fields
    #[arg(long, short = 'f')]
    pub from_file: Option<PathBuf>,
}

// ── Orients ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OrientsArgs {
    #[command(subcommand)]
    pub command: OrientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrientsCommand {
    /// List orients
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only this branch
        #[arg(long)]
        branch: Option<u64>,
    },

    /// Show one orient
    Get { id: u64 },

    /// Create an orient
    Create(OrientFields),

    /// Update an orient
    Update {
        id: u64,
        #[command(flatten)]
        fields: OrientFields,
    },

    /// Delete an orient
    #[command(alias = "rm")]
    Delete { id: u64 },
}

#[derive(Debug, Clone, Args)]
pub struct OrientFields {
    #[arg(long)]
    pub name: Option<String>,

    /// Branch id
    #[arg(long)]
    pub branch: Option<u64>,

    /// Read the form as JSON; flags override its fields
    #[arg(long, short = 'f')]
    pub from_file: Option<PathBuf>,
}

// ── Categories ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// List categories
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one category
    Get { id: u64 },

    /// Create a category
    Create(CategoryFields),

    /// Update a category
    Update {
        id: u64,
        #[command(flatten)]
        fields: CategoryFields,
    },

    /// Delete a category
    #[command(alias = "rm")]
    Delete { id: u64 },
}

#[derive(Debug, Clone, Args)]
pub struct CategoryFields {
    #[arg(long)]
    pub name: Option<String>,

    /// Read the form as JSON; flags override its fields
    #[arg(long, short = 'f')]
    pub from_file: Option<PathBuf>,
}

// ── Clients ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List clients
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        #[command(flatten)]
        filters: PersonFilterArgs,

        /// Only clients of this manager
        #[arg(long)]
        manager: Option<u64>,
    },

    /// Show one client
    Get { id: u64 },

    /// Create a client
    Create {
        #[command(flatten)]
        fields: PersonFields,

        /// Manager (employee) id
        #[arg(long)]
        manager: Option<u64>,
    },

    /// Update a client
    Update {
        id: u64,

        #[command(flatten)]
        fields: PersonFields,

        /// Manager (employee) id
        #[arg(long)]
        manager: Option<u64>,
    },

    /// Delete a client
    #[command(alias = "rm")]
    Delete { id: u64 },
}

// ── Employees ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EmployeesArgs {
    #[command(subcommand)]
    pub command: EmployeesCommand,
}

#[derive(Debug, Subcommand)]
pub enum EmployeesCommand {
    /// List employees
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        #[command(flatten)]
        filters: PersonFilterArgs,

        /// Only employees with this role
        #[arg(long)]
        role: Option<String>,
    },

    /// Show one employee
    Get { id: u64 },

    /// Create an employee
    Create {
        #[command(flatten)]
        fields: PersonFields,

        /// Role name (repeatable)
        #[arg(long = "role")]
        roles: Vec<String>,
    },

    /// Update an employee
    Update {
        id: u64,

        #[command(flatten)]
        fields: PersonFields,

        /// Role name (repeatable, replaces the current roles)
        #[arg(long = "role")]
        roles: Vec<String>,
    },

    /// Delete an employee
    #[command(alias = "rm")]
    Delete { id: u64 },
}

// ── Roles ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RolesArgs {
    #[command(subcommand)]
    pub command: RolesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RolesCommand {
    /// List roles
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one role with its permissions
    Get { id: u64 },

    /// Create a role
    Create(RoleFields),

    /// Update a role
    Update {
        id: u64,
        #[command(flatten)]
        fields: RoleFields,
    },

    /// Delete a role
    #[command(alias = "rm")]
    Delete { id: u64 },
}

#[derive(Debug, Clone, Args)]
pub struct RoleFields {
    #[arg(long)]
    pub name: Option<String>,

    /// Permission id (repeatable, replaces the current set)
    #[arg(long = "permission")]
    pub permissions: Vec<u64>,

    /// Read the form as JSON; flags override its fields
    #[arg(long, short = 'f')]
    pub from_file: Option<PathBuf>,
}

// ── Picklists ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OptionsArgs {
    #[command(subcommand)]
    pub command: OptionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum OptionsCommand {
    /// Branches in picker order
    Branches,

    /// Roles, optionally leaving one out
    Roles {
        #[arg(long)]
        without: Option<String>,
    },

    /// Orients of one branch
    Orients {
        #[arg(long)]
        branch: u64,
    },

    /// Employees that can manage clients
    Managers,

    /// Permissions assignable to roles
    Permissions,
}

// ── Browse ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    Branches,
    Orients,
    Categories,
    Clients,
    Employees,
    Roles,
}

#[derive(Debug, Args)]
#[command(after_help = "Commands while browsing:\n  \
    n / p          next / previous page\n  \
    page N         jump to page N\n  \
    size N         rows per page\n  \
    sort FIELD     sort by FIELD (again to reverse)\n  \
    /TEXT          search (applied after typing stops)\n  \
    filter K V     set a list filter, `unfilter K` to clear\n  \
    del ID         delete a row (confirm with y / n)\n  \
    r              reload\n  \
    q              quit")]
pub struct BrowseArgs {
    /// List to browse
    pub entity: Entity,

    /// Rows per page
    #[arg(long, short = 'n')]
    pub per_page: Option<u32>,
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Phone number (defaults to the profile's phone)
    #[arg(long)]
    pub phone: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Set a profile value
    Set {
        /// Key: base_url, phone, token_env, insecure, timeout, page_size,
        /// search_debounce_ms, ca_cert
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a bearer token for the active profile in the system keyring
    SetToken,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
