use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint, builder::BoolishValueParser};
use url::Url;

use crate::domain::categories::{Category, CategoryFilter};

/// Command-line arguments for the MyBlog binary.
#[derive(Debug, Parser)]
#[command(name = "myblog", version, about = "MyBlog: a personal blog kept in a local data file")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "MYBLOG_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    /// How command results are printed.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the data file holding the persisted slots.
    #[arg(long = "data-file", value_name = "PATH", value_hint = ValueHint::FilePath, global = true)]
    pub data_file: Option<PathBuf>,

    /// Override the base URL used for share links.
    #[arg(long = "site-base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Override the time zone used to date new posts.
    #[arg(long = "site-timezone", value_name = "TZ", global = true)]
    pub timezone: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Show the newest posts, as on the home page.
    Home,
    /// List the archive, optionally filtered by search text and category.
    List(ListArgs),
    /// Show a single post.
    Show(ShowArgs),
    /// Write a new post.
    Create(Box<CreateArgs>),
    /// Print a link that carries a post without any server.
    Share(ShareArgs),
    /// Open a shared link and show the post it carries.
    Open(OpenArgs),
    /// Show or toggle the light/dark theme flag.
    Theme(ThemeArgs),
    /// List the categories and their display labels.
    Categories,
}

#[derive(Debug, Args, Clone)]
pub struct ListArgs {
    /// Case-insensitive text matched against titles and content.
    #[arg(long, short = 's', default_value = "")]
    pub search: String,

    /// Category identifier or label; "all" disables the filter.
    #[arg(long, short = 'c', default_value = "all")]
    pub category: CategoryFilter,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Id of the post to show.
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(Debug, Args, Clone, Default)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub excerpt: Option<String>,

    /// Body text; blank lines separate paragraphs.
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,

    /// Read the body text from a file.
    #[arg(long = "content-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub content_file: Option<PathBuf>,

    /// Category identifier or label.
    #[arg(long, default_value = "technology")]
    pub category: Category,

    #[arg(long)]
    pub author: Option<String>,

    /// Local image file embedded into the post as a data URL.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath, conflicts_with = "image_url")]
    pub image: Option<PathBuf>,

    /// Remote image URL.
    #[arg(long = "image-url", value_name = "URL")]
    pub image_url: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ShareArgs {
    /// Id of the post to share.
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(Debug, Args, Clone)]
pub struct OpenArgs {
    /// A link produced by `myblog share`.
    #[arg(value_name = "URL")]
    pub url: Url,
}

#[derive(Debug, Args, Clone, Default)]
pub struct ThemeArgs {
    /// Flip between light and dark and persist the choice.
    #[arg(long)]
    pub toggle: bool,
}
