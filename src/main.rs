use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use spotcat::{
    cli, config, error,
    spotify::{browse::BrowseArgs, request::RequestArgs, search::SearchArgs},
    utils,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize access to your account and print the resulting refresh token
    Authorize,

    /// Fetch a catalog resource
    Get(GetOptions),

    /// Search the catalog
    Search(SearchOptions),

    /// Browse categories, featured playlists and new releases
    Browse(BrowseOptions),

    /// Read player state or skip and queue tracks
    Player(PlayerOptions),

    /// List the supported resources and what they accept
    Resources,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct GetOptions {
    /// Resource name, e.g. albums, artists, playlists (see `resources`)
    pub resource: String,

    /// One id or a comma-separated list of ids
    pub ids: Option<String>,

    /// Sub-object, e.g. tracks, top-tracks, audio-features
    #[clap(long)]
    pub obj: Option<String>,

    /// Scope the request to the authorized user
    #[clap(long)]
    pub me: bool,

    /// List resources of another user
    #[clap(long)]
    pub user: Option<String>,

    /// Extra query parameter; can be repeated
    #[clap(
        long = "param",
        value_parser = utils::parse_key_value,
        action = ArgAction::Append,
        num_args = 1
    )]
    pub params: Vec<(String, String)>,

    #[clap(long)]
    pub limit: Option<u32>,

    #[clap(long)]
    pub offset: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Free text
    #[clap(default_value = "")]
    pub query: String,

    /// Result type(s): album, artist, playlist, track, show, episode
    #[clap(
        long = "type",
        default_value = "track",
        action = ArgAction::Append,
        num_args = 1
    )]
    pub types: Vec<String>,

    /// Field filter such as artist=Muse or year=2001; can be repeated
    #[clap(
        long = "filter",
        value_parser = utils::parse_key_value,
        action = ArgAction::Append,
        num_args = 1
    )]
    pub filters: Vec<(String, String)>,

    #[clap(long)]
    pub market: Option<String>,

    #[clap(long)]
    pub limit: Option<u32>,

    #[clap(long)]
    pub offset: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct BrowseOptions {
    /// categories, featured-playlists or new-releases
    pub kind: String,

    /// Category id (categories only)
    #[clap(long)]
    pub category: Option<String>,

    /// Category sub-object, e.g. playlists
    #[clap(long)]
    pub obj: Option<String>,

    /// Local time for featured playlists (YYYY-MM-DDTHH:MM:SS)
    #[clap(long, value_parser = utils::parse_timestamp)]
    pub timestamp: Option<chrono::NaiveDateTime>,

    #[clap(long)]
    pub country: Option<String>,

    #[clap(long)]
    pub locale: Option<String>,

    #[clap(long)]
    pub limit: Option<u32>,

    #[clap(long)]
    pub offset: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlayerOptions {
    /// next, previous or queue; reads player state when omitted
    pub action: Option<String>,

    /// Sub-object to read: devices, currently-playing, recently-played
    #[clap(long, conflicts_with = "action")]
    pub obj: Option<String>,

    /// Item to queue
    #[clap(long)]
    pub uri: Option<String>,

    #[clap(long)]
    pub device_id: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Authorize => cli::authorize().await,
        Command::Get(opt) => {
            let mut args = RequestArgs::new()
                .own(opt.me)
                .page(opt.limit, opt.offset);
            if let Some(ids) = &opt.ids {
                args = args.id_list(ids);
            }
            if let Some(obj) = opt.obj {
                args = args.sub_object(obj);
            }
            if let Some(user) = opt.user {
                args = args.user(user);
            }
            for (key, value) in opt.params {
                args = args.param(key, value);
            }
            cli::get(&opt.resource, args).await
        }
        Command::Search(opt) => {
            let mut args = SearchArgs::new(opt.query).page(opt.limit, opt.offset);
            for kind in opt.types {
                args = args.kind(kind);
            }
            for (key, value) in opt.filters {
                args = args.filter(key, value);
            }
            if let Some(market) = opt.market {
                args = args.market(market);
            }
            cli::search(args).await
        }
        Command::Browse(opt) => {
            let mut args = BrowseArgs::new(opt.kind).page(opt.limit, opt.offset);
            if let Some(category) = opt.category {
                args = args.category(category);
            }
            if let Some(obj) = opt.obj {
                args = args.category_obj(obj);
            }
            if let Some(timestamp) = opt.timestamp {
                args = args.timestamp(timestamp);
            }
            if let Some(country) = opt.country {
                args = args.country(country);
            }
            if let Some(locale) = opt.locale {
                args = args.locale(locale);
            }
            cli::browse(args).await
        }
        Command::Player(opt) => cli::player(opt.action, opt.obj, opt.uri, opt.device_id).await,
        Command::Resources => cli::resources(),
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
