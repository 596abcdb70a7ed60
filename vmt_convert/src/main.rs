use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;

use material_helper::foundation::logging;
use material_helper::prelude::*;

const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;

#[derive(Debug)]
struct ConvertOptions {
    source: PathBuf,
    assets: PathBuf,
    config: Option<PathBuf>,
    log_file: Option<PathBuf>,
}

fn convert_command() -> Command {
    Command::new("convert")
        .about("Convert every .vmt file under SOURCE_FOLDER into a material record")
        .arg(
            Arg::new("source")
                .value_name("SOURCE_FOLDER")
                .help("Folder searched recursively for .vmt files")
                .required(true),
        )
        .arg(
            Arg::new("assets")
                .short('a')
                .long("assets")
                .value_name("DIR")
                .help("Asset tree holding converted images and material records (defaults to SOURCE_FOLDER)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Converter configuration (.toml or .ron)"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .help("Write the retained conversion log to FILE"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Show debug output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only show warnings and errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
}

fn cli() -> Command {
    Command::new("vmt_convert")
        .about("Converts Source engine VMT materials into engine material records")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(convert_command())
}

fn options_from(matches: &ArgMatches) -> ConvertOptions {
    let source = matches
        .get_one::<String>("source")
        .map(PathBuf::from)
        .unwrap_or_default();
    ConvertOptions {
        assets: matches
            .get_one::<String>("assets")
            .map_or_else(|| source.clone(), PathBuf::from),
        source,
        config: matches.get_one::<String>("config").map(PathBuf::from),
        log_file: matches.get_one::<String>("log-file").map(PathBuf::from),
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    let Some(("convert", matches)) = matches.subcommand() else {
        eprintln!("Error: unknown command");
        return ExitCode::FAILURE;
    };

    let level = if matches.get_flag("verbose") {
        log::LevelFilter::Debug
    } else if matches.get_flag("quiet") {
        log::LevelFilter::Warn
    } else {
        DEFAULT_LOG_LEVEL
    };
    logging::init_with_level(level);

    match convert(&options_from(matches)) {
        Ok(summary) if summary.is_success() => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Ok(summary) => {
            println!("{summary}");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn convert(options: &ConvertOptions) -> Result<BatchSummary> {
    let config = match &options.config {
        Some(path) => ConverterConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {path:?}"))?,
        None => ConverterConfig::default(),
    };
    config.validate().context("Invalid converter configuration")?;

    log::info!("Converting {:?} into asset tree {:?}", options.source, options.assets);

    let mut index = FileAssetIndex::scan(&options.assets, &config)
        .with_context(|| format!("Failed to index asset tree {:?}", options.assets))?;
    log::debug!("Asset index holds {} image(s)", index.image_count());

    let mut report = BoundedLog::new(config.max_log_length);
    let converter = BatchConverter::new(config);
    let result = converter.run_with_progress(&options.source, &mut index, &mut report, |progress| {
        log::debug!(
            "Progress: {}/{} ({:.0}%)",
            progress.completed,
            progress.total,
            progress.fraction() * 100.0
        );
    });

    if let Some(log_file) = &options.log_file {
        std::fs::write(log_file, report.text())
            .with_context(|| format!("Failed to write log file {log_file:?}"))?;
    }

    Ok(result?)
}
