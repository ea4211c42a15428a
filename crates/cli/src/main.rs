use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use command::{
    AddPayload, CommandAction, CommandRequest, CommandResponse, DeletePayload, FilterPayload,
    ImportPayload, ImportReport, LinksPayload, ListOutput, ListPayload, MutationOutput,
    RecommendOutput, RecommendPayload, UpdatePayload,
};
use dinepick_catalog::{Config, CuisineType, PriceTier, Recommendation, RecordPatch};
use dinepick_protocol::{serialize_json, HintKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

mod command;
mod report;

const CONFIG_ENV: &str = "DINEPICK_CONFIG";
const DATA_FILE_ENV: &str = "DINEPICK_DATA_FILE";

#[derive(Parser)]
#[command(name = "dinepick")]
#[command(about = "Restaurant catalog with random lunch recommendations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Config file (overrides DINEPICK_CONFIG and ./dinepick.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog JSON file (overrides DINEPICK_DATA_FILE and the config)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a JSON Command API request
    Command(CommandArgs),

    /// Pick one random restaurant matching the filters
    Recommend(RecommendArgs),

    /// List restaurants, optionally searching by name or menu
    List(ListArgs),

    /// Register a new restaurant
    Add(AddArgs),

    /// Edit every restaurant with the given name
    Update(UpdateArgs),

    /// Delete every restaurant with the given name
    Delete(DeleteArgs),

    /// Merge a JSON upload into the catalog
    Import(ImportArgs),

    /// Print map and web-search links for a restaurant
    Links(LinksArgs),
}

#[derive(Args)]
struct CommandArgs {
    /// Inline JSON payload (mutually exclusive with --file)
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Path to file containing JSON payload
    #[arg(long)]
    file: Option<PathBuf>,

    /// Pretty-print JSON response
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct FilterArgs {
    /// Cuisine to include (repeatable; Korean label or english name)
    #[arg(long = "cuisine")]
    cuisines: Vec<CuisineType>,

    /// Price tier to include (repeatable; Korean label or english name)
    #[arg(long = "price")]
    prices: Vec<PriceTier>,
}

impl FilterArgs {
    fn into_payload(self) -> FilterPayload {
        FilterPayload {
            cuisines: self.cuisines,
            prices: self.prices,
        }
    }
}

#[derive(Args)]
struct RecommendArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Output JSON response
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ListArgs {
    /// Substring matched against name and menu
    #[arg(long, short, default_value = "")]
    query: String,

    #[command(flatten)]
    filter: FilterArgs,

    /// Output JSON response
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    name: String,

    #[arg(long, default_value = "")]
    address: String,

    #[arg(long, default_value = "")]
    menu: String,

    #[arg(long, default_value = "")]
    contact: String,

    #[arg(long, default_value = "한식")]
    cuisine: CuisineType,

    #[arg(long, default_value = "보통")]
    price: PriceTier,

    /// Output JSON response
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct UpdateArgs {
    /// Current name of the restaurant to edit
    target: String,

    /// New name
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    menu: Option<String>,

    #[arg(long)]
    contact: Option<String>,

    #[arg(long)]
    cuisine: Option<CuisineType>,

    #[arg(long)]
    price: Option<PriceTier>,

    /// Output JSON response
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct DeleteArgs {
    name: String,

    /// Confirm the delete
    #[arg(long, short)]
    yes: bool,

    /// Output JSON response
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ImportArgs {
    /// JSON file holding a list of restaurant rows
    file: PathBuf,

    /// Output JSON response
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct LinksArgs {
    name: String,

    /// Output JSON response
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let json_output = match &cli.command {
        Commands::Command(_) => true,
        Commands::Recommend(args) => args.json,
        Commands::List(args) => args.json,
        Commands::Add(args) => args.json,
        Commands::Update(args) => args.json,
        Commands::Delete(args) => args.json,
        Commands::Import(args) => args.json,
        Commands::Links(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            let response = CommandResponse::error(&err, None, Default::default());
            if json_output {
                println!("{}", serialize_json(&response, true)?);
            } else {
                eprintln!("Error: {err:#}");
            }
            std::process::exit(1);
        }
    };
    log::debug!("catalog file: {}", config.data_file.display());

    match cli.command {
        Commands::Command(args) => run_command(args, config)?,
        Commands::Recommend(args) => run_recommend(args, config)?,
        Commands::List(args) => run_list(args, config)?,
        Commands::Add(args) => run_add(args, config)?,
        Commands::Update(args) => run_update(args, config)?,
        Commands::Delete(args) => run_delete(args, config)?,
        Commands::Import(args) => run_import(args, config)?,
        Commands::Links(args) => run_links(args, config)?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let explicit = cli
        .config
        .clone()
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));
    let data_file = cli
        .data_file
        .clone()
        .or_else(|| env::var_os(DATA_FILE_ENV).map(PathBuf::from));
    let cwd = env::current_dir().context("Failed to resolve current directory")?;
    let config = Config::discover(explicit.as_deref(), &cwd)?;
    Ok(config.with_data_file(data_file))
}

fn run_command(args: CommandArgs, config: Config) -> Result<()> {
    let raw = read_payload(&args)?;
    let request: CommandRequest =
        serde_json::from_str(&raw).context("Invalid JSON passed to --json/--file")?;

    let response = command::execute(request, config);
    println!("{}", serialize_json(&response, args.pretty)?);

    if response.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn read_payload(args: &CommandArgs) -> Result<String> {
    if let Some(raw) = &args.json {
        return Ok(raw.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read JSON from stdin")?;

    if buffer.trim().is_empty() {
        anyhow::bail!("Command request is empty. Provide --json, --file, or pipe JSON via stdin.");
    }

    Ok(buffer)
}

fn run_recommend(args: RecommendArgs, config: Config) -> Result<()> {
    let payload = RecommendPayload {
        filter: args.filter.into_payload(),
    };
    let response = dispatch(CommandAction::Recommend, payload, config)?;
    finish::<RecommendOutput>(response, args.json, report::render_recommendation)
}

fn run_list(args: ListArgs, config: Config) -> Result<()> {
    let payload = ListPayload {
        query: args.query,
        filter: args.filter.into_payload(),
    };
    let response = dispatch(CommandAction::List, payload, config)?;
    finish::<ListOutput>(response, args.json, report::render_list)
}

fn run_add(args: AddArgs, config: Config) -> Result<()> {
    let payload = AddPayload {
        name: args.name,
        address: args.address,
        menu: args.menu,
        contact: args.contact,
        cuisine: args.cuisine,
        price: args.price,
    };
    let response = dispatch(CommandAction::Add, payload, config)?;
    finish::<MutationOutput>(response, args.json, report::render_mutation)
}

fn run_update(args: UpdateArgs, config: Config) -> Result<()> {
    let payload = UpdatePayload {
        name: args.target,
        changes: RecordPatch {
            name: args.name,
            address: args.address,
            menu: args.menu,
            contact: args.contact,
            cuisine: args.cuisine,
            price: args.price,
        },
    };
    let response = dispatch(CommandAction::Update, payload, config)?;
    finish::<MutationOutput>(response, args.json, report::render_mutation)
}

fn run_delete(args: DeleteArgs, config: Config) -> Result<()> {
    let payload = DeletePayload {
        name: args.name,
        confirm: args.yes,
    };
    let response = dispatch(CommandAction::Delete, payload, config)?;
    finish::<MutationOutput>(response, args.json, report::render_mutation)
}

fn run_import(args: ImportArgs, config: Config) -> Result<()> {
    let payload = ImportPayload {
        path: Some(args.file),
        content: None,
    };
    let response = dispatch(CommandAction::Import, payload, config)?;
    finish::<ImportReport>(response, args.json, report::render_import)
}

fn run_links(args: LinksArgs, config: Config) -> Result<()> {
    let payload = LinksPayload { name: args.name };
    let response = dispatch(CommandAction::Links, payload, config)?;
    finish::<Recommendation>(response, args.json, report::render_links)
}

fn dispatch<P: Serialize>(
    action: CommandAction,
    payload: P,
    config: Config,
) -> Result<CommandResponse> {
    let request = CommandRequest {
        action,
        payload: serde_json::to_value(payload)?,
    };
    Ok(command::execute(request, config))
}

fn finish<T: DeserializeOwned>(
    response: CommandResponse,
    json: bool,
    render: fn(&T) -> String,
) -> Result<()> {
    if json {
        println!("{}", serialize_json(&response, true)?);
        if response.is_error() {
            std::process::exit(1);
        }
        return Ok(());
    }

    for hint in &response.hints {
        match hint.kind {
            HintKind::Warn => eprintln!("warning: {}", hint.text),
            HintKind::Info | HintKind::Action => eprintln!("{}", hint.text),
        }
    }
    if response.is_error() {
        eprintln!(
            "Error: {}",
            response.message.as_deref().unwrap_or("Unknown error")
        );
        std::process::exit(1);
    }

    let out: T = serde_json::from_value(response.data)
        .context("Unexpected response shape from command handler")?;
    print!("{}", render(&out));
    Ok(())
}
