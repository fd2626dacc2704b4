use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use timewarp::config::DEFAULT_TRACKED_FILE;
use timewarp::{eval, global_env, read_str, Config, Reader};

mod repl;

#[derive(Parser, Debug)]
#[command(name = "timewarp", version, about = "A Lisp whose globals live in git history")]
struct Cli {
    /// Working directory of the repository that unbound names are looked up in
    #[arg(long, env = "TIMEWARP_REPO", default_value = ".")]
    repo: PathBuf,

    /// File, relative to the repository, holding each revision's definition
    #[arg(long, env = "TIMEWARP_FILE", default_value = DEFAULT_TRACKED_FILE)]
    file: PathBuf,

    /// Log git activity and evaluation details
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read lines from stdin and evaluate each one (the default)
    Repl,
    /// Evaluate every expression in a file, in order
    Run { path: PathBuf },
    /// Print the first expression of SOURCE as JSON without evaluating it
    Parse { source: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = Config::new(cli.repo, cli.file);
    log::debug!("{:?}", config);

    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => {
            let env = global_env(&config);
            let summary = repl::run(io::stdin().lock(), &env)?;
            log::debug!("read loop finished: {:?}", summary);
        }
        Command::Run { path } => {
            let env = global_env(&config);
            let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
            for expr in Reader::new(BufReader::new(file)) {
                eval(&expr?, &env)?;
            }
        }
        Command::Parse { source } => {
            let expr = read_str(&source)?;
            println!("{}", serde_json::to_string(&expr)?);
        }
    }
    Ok(())
}
