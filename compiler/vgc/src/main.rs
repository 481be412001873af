//! VisionGen CLI

use std::path::PathBuf;

use vg_codegen::{parse_build_options, BuildOptions};
use vgc::commands::{env_options, exit_status, generate, list_languages};

fn main() {
    vgc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "generate" | "gen" => {
            let mut options = match env_options() {
                Ok(options) => options,
                Err(e) => {
                    eprintln!("error: {}: {e}", vgc::commands::OPTIONS_ENV);
                    std::process::exit(1);
                }
            };

            // Parse options, handling -o specially (needs lookahead)
            let mut output = None;
            let mut i = 2;
            while i < args.len() {
                if args[i] == "-o" && i + 1 < args.len() {
                    output = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                    continue;
                }

                match parse_build_options(&args[i..=i]) {
                    Ok(parsed) if parsed == BuildOptions::default() => {
                        eprintln!("warning: ignoring unknown option '{}'", args[i]);
                    }
                    Ok(parsed) => options.merge(&parsed),
                    Err(e) => {
                        eprintln!("error: {e}");
                        std::process::exit(1);
                    }
                }
                i += 1;
            }

            let result = generate(&options, output.as_deref());
            if let Err(e) = &result {
                eprintln!("error: {e}");
            }
            std::process::exit(exit_status(&result));
        }
        "languages" | "--list-languages" => list_languages(),
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => {
            println!("vgc {}", env!("CARGO_PKG_VERSION"));
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("VisionGen pipeline generator");
    println!();
    println!("Usage: vgc <command> [options]");
    println!();
    println!("Commands:");
    println!("  generate             Generate the demonstration pipeline");
    println!("  languages            List supported target languages");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Generate options:");
    println!("  --lang=<language>    java, kotlin, lua or python (default: java)");
    println!("  --class=<Name>       Name of the generated class");
    println!("  --previz             Generate for live preview");
    println!("  -o <path>            Write to a file instead of stdout");
    println!();
    println!("Defaults can be set in the VGC_OPTIONS environment variable.");
    println!("Exit status is 2 when placeholders were left unresolved.");
}
