use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use jarshim::LaunchConfig;
use log::{LevelFilter, Record};
use std::io::Write;
use std::path::PathBuf;

/// Launch a Java program on an embedded virtual machine
#[derive(Parser, Debug)]
#[command(name = "jarshim", version)]
struct Cli {
    /// Jar to run; its manifest supplies Main-Class and it becomes the class path
    #[arg(long, value_name = "JAR")]
    jar: Option<String>,

    /// Entry class, e.g. com.example.Main
    #[arg(short = 'm', long = "main-class", value_name = "CLASS")]
    main_class: Option<String>,

    /// Class path used when no jar is given
    #[arg(long = "class-path", visible_alias = "cp", value_name = "PATH")]
    class_path: Option<String>,

    /// Extra VM option, repeatable: -J-Xmx64m -J-Dfoo=bar
    #[arg(short = 'J', value_name = "OPTION", allow_hyphen_values = true, action = ArgAction::Append)]
    vm_options: Vec<String>,

    /// JSON launch file; flags given here override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Arguments passed to the program's main
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    args: Vec<String>,
}

impl Cli {
    fn into_config(self) -> Result<LaunchConfig> {
        let mut config = match &self.config {
            Some(path) => LaunchConfig::from_json_file(path)
                .with_context(|| format!("Failed to load launch file: {}", path.display()))?,
            None => LaunchConfig::new(),
        };

        if let Some(jar) = self.jar {
            config.jar_path = Some(jar);
        }
        if let Some(class) = self.main_class {
            config.main_class = Some(class);
        }
        if let Some(class_path) = self.class_path {
            config.class_path = Some(class_path);
        }
        if !self.args.is_empty() {
            config.args = self.args;
        }
        config.vm_options.extend(self.vm_options);

        Ok(config)
    }
}

/// Map a `-v` count to a level: warnings by default, then info, debug, trace
fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Last path segment of a log target, `jarshim::launch` becomes `launch`
fn log_tag(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

fn write_record<W: Write + ?Sized>(out: &mut W, record: &Record) -> std::io::Result<()> {
    writeln!(
        out,
        "[{}] {} {}",
        log_tag(record.target()),
        record.level(),
        record.args()
    )
}

/// `-v` sets the level; `RUST_LOG`, when set, overrides it
fn init_logging(verbose: u8) -> Result<()> {
    env_logger::Builder::new()
        .filter_level(level_for_verbosity(verbose))
        .parse_default_env()
        .format(|buf, record| write_record(buf, record))
        .try_init()
        .context("Failed to install logger")
}

#[cfg(feature = "jni")]
fn launch(config: &LaunchConfig) -> Result<i32> {
    Ok(jarshim::run(&jarshim::JniProvider, config))
}

#[cfg(not(feature = "jni"))]
fn launch(_config: &LaunchConfig) -> Result<i32> {
    anyhow::bail!("No virtual machine backend: rebuild with --features jni")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = cli.into_config()?;
    let code = launch(&config)?;

    std::process::exit(code);
}
