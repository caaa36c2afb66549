use anyhow::{anyhow, Result};
use clap::{arg, Arg, ArgAction, ArgMatches, Command};
use serde_json::{Map, Value};
use slideshow_algorithms::{solve, Hyperparameters};
use slideshow_challenges::slideshow::{Challenge, Track};
use slideshow_utils::{calc_seed, load_json_object, load_text, logging};
use std::{fs, path::PathBuf};
use tracing::info;

fn logging_args(command: Command) -> Command {
    command
        .arg(arg!(--verbose "Log at debug level").action(ArgAction::SetTrue))
        .arg(
            Arg::new("json_logs")
                .long("json-logs")
                .help("Write logs to stderr as JSON lines")
                .action(ArgAction::SetTrue),
        )
}

fn cli() -> Command {
    Command::new("slideshow-runtime")
        .about("Computes slideshows or generates photo sets")
        .arg_required_else_help(true)
        .subcommand(logging_args(
            Command::new("compute_solution")
                .about("Computes a slideshow for a photo set")
                .arg(
                    arg!(<INPUT> "Path to a photo set file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--settings [SETTINGS] "Hyperparameters json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the slideshow will be saved to this file path")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        ))
        .subcommand(logging_args(
            Command::new("generate_instance")
                .about("Generates a photo set from a seed")
                .arg(
                    arg!(<RAND_HASH> "A string used in seed generation")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(arg!(<NONCE> "Nonce value").value_parser(clap::value_parser!(u64)))
                .arg(
                    arg!(--photos [PHOTOS] "Number of photos")
                        .default_value("100")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("vertical_percent")
                        .long("vertical-percent")
                        .help("Chance in percent that a photo is vertical")
                        .default_value("50")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(--vocabulary [VOCABULARY] "Number of distinct tags")
                        .default_value("40")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("max_tags")
                        .long("max-tags")
                        .help("Maximum number of tags per photo")
                        .default_value("8")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the photo set will be saved to this file path")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        ))
}

fn init_logging(sub_m: &ArgMatches) {
    logging::init(sub_m.get_flag("verbose"), sub_m.get_flag("json_logs"));
}

fn main() {
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("compute_solution", sub_m)) => {
            init_logging(sub_m);
            compute_solution(
                sub_m.get_one::<String>("INPUT").unwrap().clone(),
                sub_m.get_one::<String>("settings").cloned(),
                sub_m.get_one::<PathBuf>("output").cloned(),
            )
        }
        Some(("generate_instance", sub_m)) => {
            init_logging(sub_m);
            generate_instance(
                sub_m.get_one::<String>("RAND_HASH").unwrap().clone(),
                *sub_m.get_one::<u64>("NONCE").unwrap(),
                Track {
                    num_photos: *sub_m.get_one::<usize>("photos").unwrap(),
                    vertical_percent: *sub_m.get_one::<u32>("vertical_percent").unwrap(),
                    vocabulary_size: *sub_m.get_one::<usize>("vocabulary").unwrap(),
                    max_tags: *sub_m.get_one::<usize>("max_tags").unwrap(),
                },
                sub_m.get_one::<PathBuf>("output").cloned(),
            )
        }
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

pub fn compute_solution(
    input: String,
    settings: Option<String>,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let hyperparameters: Option<Map<String, Value>> =
        settings.as_deref().map(load_json_object).transpose()?;
    let hyperparameters = Hyperparameters::from_map(&hyperparameters)?;
    let challenge = load_text(&input)?
        .parse::<Challenge>()
        .map_err(|e| anyhow!("Failed to parse photo set {}: {}", input, e))?;

    let report = solve(&challenge, &hyperparameters)?;
    info!(
        score = report.score,
        slides = report.slideshow.len(),
        proven_optimal = report.proven_optimal,
        "computed slideshow"
    );

    write_output(output_file, &report.slideshow.to_solution().to_string())
}

pub fn generate_instance(
    rand_hash: String,
    nonce: u64,
    track: Track,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let seed = calc_seed(&rand_hash, nonce);
    let challenge = Challenge::generate_instance(&seed, &track)?;
    info!(
        photos = challenge.num_photos(),
        vertical = challenge.photos.iter().filter(|p| p.is_vertical()).count(),
        "generated photo set"
    );
    write_output(output_file, &challenge.to_string())
}

fn write_output(output_file: Option<PathBuf>, text: &str) -> Result<()> {
    match output_file {
        Some(path) => {
            fs::write(&path, text)
                .map_err(|e| anyhow!("Failed to write {}: {}", path.display(), e))?;
            info!("output written to: {:?}", path);
        }
        None => print!("{}", text),
    }
    Ok(())
}
