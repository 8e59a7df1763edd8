use anyhow::{Context, Result, bail};
use std::{
    env,
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process,
};
use textile_config::Config;

const USAGE: &str = "Usage: textile [--config PATH] [FILE...]
       textile [--config PATH] --init

Renders Textile markup to HTML. With no FILE, reads standard input.

Options:
  --config PATH  Read settings from PATH instead of the default config file
  --init         Write a default config file and exit
  -h, --help     Show this message";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Render(Options),
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    config: Option<PathBuf>,
    init: bool,
    files: Vec<PathBuf>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--config" => match args.next() {
                Some(path) => options.config = Some(PathBuf::from(path)),
                None => bail!("--config requires a path"),
            },
            "--init" => options.init = true,
            "--" => {
                options.files.extend(args.by_ref().map(PathBuf::from));
            }
            flag if flag.starts_with('-') => bail!("unknown option '{flag}'"),
            file => options.files.push(PathBuf::from(file)),
        }
    }

    Ok(Command::Render(options))
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let (config_path, config) = match explicit {
        Some(path) => {
            let config = Config::load_from_path(path)?;
            if config.is_none() {
                bail!("config file '{}' does not exist", path.display());
            }
            (path.to_path_buf(), config)
        }
        None => (Config::config_path(), Config::load()?),
    };

    match config {
        Some(config) => {
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        }
        None => {
            log::debug!("No config at {}, using defaults", config_path.display());
            Ok(Config::default())
        }
    }
}

/// Write a default config, refusing to replace an existing one.
fn init_config(explicit: Option<&Path>) -> Result<PathBuf> {
    let config_path = explicit.map_or_else(Config::config_path, Path::to_path_buf);
    if config_path.exists() {
        bail!("config file '{}' already exists", config_path.display());
    }

    let config = Config::default();
    let saved = match explicit {
        Some(path) => config.save_to_path(path),
        None => config.save(),
    };
    saved.with_context(|| format!("Failed to write '{}'", config_path.display()))?;

    log::info!("Wrote default config to {}", config_path.display());
    Ok(config_path)
}

/// Where a rendered file goes, or `None` for stdout.
fn output_path(config: &Config, input: &Path) -> Option<PathBuf> {
    let dir = config.output_dir.as_ref()?;
    let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
    name.push(".");
    name.push(&config.extension);
    Some(dir.join(name))
}

fn render(config: &Config, markup: &str) -> String {
    if config.substitutions.is_empty() {
        return textile_syntax::render(markup, None);
    }
    let substitute = |run: &str| config.substitute(run);
    textile_syntax::render(markup, Some(&substitute))
}

fn render_file(config: &Config, input: &Path) -> Result<()> {
    let markup = fs::read_to_string(input)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    let html = render(config, &markup);

    match output_path(config, input) {
        Some(target) => {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create '{}'", parent.display()))?;
            }
            fs::write(&target, html)
                .with_context(|| format!("Failed to write '{}'", target.display()))?;
            log::info!("{} -> {}", input.display(), target.display());
        }
        None => writeln!(io::stdout(), "{html}").context("Failed to write to stdout")?,
    }
    Ok(())
}

fn run(options: Options) -> Result<()> {
    if options.init {
        init_config(options.config.as_deref())?;
        return Ok(());
    }

    let config = load_config(options.config.as_deref())?;

    if options.files.is_empty() {
        let mut markup = String::new();
        io::stdin()
            .read_to_string(&mut markup)
            .context("Failed to read standard input")?;
        writeln!(io::stdout(), "{}", render(&config, &markup))
            .context("Failed to write to stdout")?;
        return Ok(());
    }

    for file in &options.files {
        render_file(&config, file)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let options = match parse_args(env::args().skip(1)) {
        Ok(Command::Help) => {
            println!("{USAGE}");
            return Ok(());
        }
        Ok(Command::Render(options)) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    run(options)
}
