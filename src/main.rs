use clap::Parser;
use std::io::Write;

mod commands;
mod output;

use commands::fix;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "casefix")]
#[command(version = VERSION)]
#[command(about = "Rewrite relative import paths to match on-disk file and directory casing")]
struct Cli {
    #[command(flatten)]
    args: fix::FixArgs,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let json = cli.args.json;

    // Text mode prints each line as it happens; JSON mode prints only the
    // final envelope.
    let mut print_line = |line: &str| {
        if !json {
            let _ = writeln!(std::io::stdout(), "{}", line);
        }
    };
    let result = fix::run(&cli.args, &mut print_line);

    let exit_code = if json {
        let (json_result, exit_code) = output::map_cmd_result_to_json(result);
        match output::print_json_result(json_result) {
            Ok(()) => exit_code,
            Err(err) => {
                output::print_text_error(&err);
                output::exit_code_for_error(err.code)
            }
        }
    } else {
        match result {
            Ok((_, exit_code)) => exit_code,
            Err(err) => {
                output::print_text_error(&err);
                output::exit_code_for_error(err.code)
            }
        }
    };

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
