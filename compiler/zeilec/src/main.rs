//! Zeile command-line tool.
//!
//! Inspects story containers and the compiler's naming and diagnostic
//! catalogs.

use zeile_ir::Locale;
use zeilec::commands::{
    build_sample, demangle_symbol, explain_diagnostic, inspect_container, list_diagnostics,
    list_symbols, InspectFormat,
};
use zeilec::tracing_setup::init_tracing;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "inspect" => {
            let mut path = None;
            let mut format = InspectFormat::Listing;
            for arg in &args[2..] {
                if arg == "--sirius" {
                    format = InspectFormat::Sirius;
                } else if path.is_none() && !arg.starts_with('-') {
                    path = Some(arg.as_str());
                } else {
                    eprintln!("error: unexpected argument '{arg}'");
                    path = None;
                    break;
                }
            }
            let Some(path) = path else {
                eprintln!("Usage: zeile inspect <story.zir> [--sirius]");
                std::process::exit(1);
            };
            inspect_container(path, format);
        }
        "demangle" => {
            if args.len() < 3 {
                eprintln!("Usage: zeile demangle <symbol>...");
                std::process::exit(1);
            }
            for symbol in &args[2..] {
                demangle_symbol(symbol);
            }
        }
        "symbols" => {
            let demangled = args.iter().skip(2).any(|arg| arg == "--demangle" || arg == "-d");
            list_symbols(demangled);
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: zeile explain <diagnostic-id>");
                eprintln!("       zeile explain --list");
                std::process::exit(1);
            }
            if args[2] == "--list" {
                list_diagnostics();
            } else {
                explain_diagnostic(&args[2]);
            }
        }
        "sample" => {
            let mut output = None;
            let mut locale = None;
            let mut i = 2;
            while i < args.len() {
                if args[i] == "-o" && i + 1 < args.len() {
                    output = Some(args[i + 1].as_str());
                    i += 2;
                } else if let Some(value) = args[i].strip_prefix("--locale=") {
                    let Ok(parsed) = value.parse::<Locale>() else {
                        eprintln!("error: unknown locale '{value}' (expected jp, en, tw, cn or kr)");
                        std::process::exit(1);
                    };
                    locale = Some(parsed);
                    i += 1;
                } else {
                    eprintln!("error: unexpected argument '{}'", args[i]);
                    eprintln!("Usage: zeile sample [-o <story.zir>] [--locale=<locale>]");
                    std::process::exit(1);
                }
            }
            build_sample(output, locale);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("zeile {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Zeile story-script compiler");
    println!();
    println!("Usage: zeile <command> [options]");
    println!();
    println!("Commands:");
    println!("  inspect <story.zir>        Decode a story container and list its actions");
    println!("          [--sirius]         Print the indented outline instead");
    println!("  demangle <symbol>...       Decode mangled function names");
    println!("  symbols [--demangle]       List the standard library's mangled names");
    println!("  explain <id>               Describe a diagnostic (--list for all ids)");
    println!("  sample [-o <story.zir>]    Compile the built-in demo scene");
    println!("         [--locale=<loc>]    Override the scene's locale");
    println!("  help                       Show this help message");
    println!("  version                    Show version information");
    println!();
    println!("Environment:");
    println!("  ZEILE_LOG=<filter>         Enable debug output, e.g. ZEILE_LOG=zeile_eval=trace");
    println!("  ZEILE_LOG_TREE=1           Show debug output as an indented span tree");
}
