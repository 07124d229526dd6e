use std::fs;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};
use docopt_codegen::output::{OutputFormat, format_inspection};
use docopt_codegen::{Compilation, GeneratorConfig, LineEnding, Templates};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Module stem used when no output name is given.
const DEFAULT_MODULE: &str = "docopt";

#[derive(Debug, Parser)]
#[command(name = "docopt-codegen")]
#[command(about = "Generate C argument parsers from docopt usage grammars")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the C header and source for a grammar.
    Generate(GenerateArgs),
    /// Show what the generator derives from a grammar.
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Grammar file; read from stdin when omitted.
    docopt: Option<PathBuf>,
    /// Base name of the generated files (<NAME>.h and <NAME>.c).
    #[arg(short, long)]
    output_name: Option<PathBuf>,
    /// Template base name (<TEMPLATE>.h and <TEMPLATE>.c).
    #[arg(short, long)]
    module: Option<PathBuf>,
    /// Generator configuration file (YAML).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Subcommand to extract usage and help fragments for (repeatable).
    #[arg(long = "subcommand", value_name = "NAME")]
    subcommands: Vec<String>,
    /// Remove "<program> " from emitted text literals.
    #[arg(long)]
    strip_program_name: bool,
    /// Newline escape used inside text literals.
    #[arg(long)]
    line_ending: Option<LineEnding>,
    /// Fail when the grammar would produce broken field names.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Args)]
struct InspectArgs {
    /// Grammar file; read from stdin when omitted.
    docopt: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Generator configuration file (YAML).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Inspect(args) => run_inspect(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let mut config = load_config(args.config.as_deref())?;
    if !args.subcommands.is_empty() {
        config.subcommands = Some(args.subcommands);
    }
    if args.strip_program_name {
        config.strip_program_name = true;
    }
    if let Some(line_ending) = args.line_ending {
        config.line_ending = line_ending;
    }
    if args.strict {
        config.strict = true;
    }

    let templates = match args.module.as_ref().or(config.template.as_ref()) {
        Some(base) => Templates::load(base).map_err(|e| e.to_string())?,
        None => Templates::bundled(),
    };

    let doc = read_grammar(args.docopt.as_deref())?;
    let module = args
        .output_name
        .as_deref()
        .and_then(Path::file_stem)
        .map_or_else(|| DEFAULT_MODULE.to_string(), |stem| stem.to_string_lossy().into_owned());
    debug!(module = %module, "Generating");

    let (_, artifacts) =
        docopt_codegen::compile(&doc, &config, &templates, &module).map_err(|e| e.to_string())?;

    match args.output_name {
        Some(base) => {
            let (header, source) = artifacts.write(&base).map_err(|e| e.to_string())?;
            println!("Wrote '{}' and '{}'.", header.display(), source.display());
        }
        None => print!("{}", artifacts.to_stdout_text()),
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let doc = read_grammar(args.docopt.as_deref())?;
    let compilation = Compilation::analyze(&doc, &config).map_err(|e| e.to_string())?;
    println!("{}", format_inspection(&compilation, args.format)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, String> {
    match path {
        Some(path) => GeneratorConfig::load(path).map_err(|e| e.to_string()),
        None => Ok(GeneratorConfig::default()),
    }
}

/// Reads the grammar from `path`, or from stdin when it is piped.
fn read_grammar(path: Option<&Path>) -> Result<String, String> {
    if let Some(path) = path {
        return fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()));
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(format!(
            "no grammar given; pass a file or pipe one on stdin\n\n{}",
            Cli::command().render_usage()
        ));
    }
    let mut doc = String::new();
    stdin
        .lock()
        .read_to_string(&mut doc)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    Ok(doc)
}
