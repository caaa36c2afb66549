use anyhow::{anyhow, Result};
use clap::{arg, Command};
use slideshow_challenges::slideshow::{Challenge, Solution};
use slideshow_utils::{load_json_object, load_text};

fn cli() -> Command {
    Command::new("slideshow-verifier")
        .about("Verifies a slideshow against a photo set")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("verify_solution")
                .about("Verifies a slideshow and prints its score")
                .arg(
                    arg!(<INPUT> "Path to a photo set file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(<SOLUTION> "Slideshow file, solution json string, path to json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--quality "Also print quality relative to the input-order baseline")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("verify_solution", sub_m)) => verify_solution(
            sub_m.get_one::<String>("INPUT").unwrap().clone(),
            sub_m.get_one::<String>("SOLUTION").unwrap().clone(),
            sub_m.get_flag("quality"),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

pub fn verify_solution(input: String, solution_path: String, quality: bool) -> Result<()> {
    if input == "-" && solution_path == "-" {
        return Err(anyhow!("Only one of INPUT and SOLUTION can be read from stdin"));
    }
    let challenge = load_text(&input)?
        .parse::<Challenge>()
        .map_err(|e| anyhow!("Failed to parse photo set {}: {}", input, e))?;
    let solution = load_solution(&solution_path)?;

    match challenge.evaluate_score(&solution) {
        Ok(score) => {
            println!("Solution is valid, score: {}", score);
            if quality {
                println!("Quality: {}", challenge.evaluate_solution(&solution)?);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Invalid solution: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_solution(source: &str) -> Result<Solution> {
    if source.ends_with(".json") || source.trim_start().starts_with('{') {
        let map = load_json_object(source)?;
        return Solution::try_from(map)
            .map_err(|_| anyhow!("Invalid solution. Cannot convert to Solution"));
    }
    load_text(source)?
        .parse::<Solution>()
        .map_err(|e| anyhow!("Failed to parse slideshow {}: {}", source, e))
}
