use pylex::config::runtime::RuntimeConfig;
use pylex::lexical::{format_symbol_table, format_token_table};
use pylex::utils::SourceMap;
use pylex::{logging, pipeline};
use std::env;
use std::path::Path;

/// Options collected from the command line
#[derive(Debug, Default, PartialEq, Eq)]
struct CliOptions {
    file: Option<String>,
    show_tokens: bool,
    show_symbols: bool,
    json: bool,
    tab_width: Option<usize>,
    max_line_length: Option<usize>,
    config_path: Option<String>,
    help: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("pylex");

    let options = match parse_options(&args[1.min(args.len())..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} <file.py> [options]", program);
            eprintln!("       {} --help", program);
            std::process::exit(1);
        }
    };

    if options.help {
        print_help(program);
        return Ok(());
    }
    let Some(file) = options.file.as_deref() else {
        eprintln!("Usage: {} <file.py> [options]", program);
        eprintln!("       {} --help", program);
        std::process::exit(1);
    };

    let config = match build_config(&options) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("FAILED: {}", error);
            std::process::exit(1);
        }
    };

    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;
    pipeline::validate_pipeline()?;

    let clean = process_single_file(file, &options, &config)?;
    if !clean {
        std::process::exit(1);
    }
    Ok(())
}

fn print_help(program_name: &str) {
    println!("pylex v{}", env!("CARGO_PKG_VERSION"));
    println!("Lexical analyzer for indentation-sensitive, Python-like source");
    println!();
    println!("USAGE:");
    println!("    {} <file.py> [options]", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help                 Show this help message");
    println!("    --tokens               Print the token table");
    println!("    --symbols              Print the symbol table");
    println!("    --json                 Print the full scan report as JSON");
    println!("    --tab-width N          Columns a tab advances to in indentation");
    println!("    --max-line-length N    Warn about lines longer than N characters");
    println!("    --config PATH          Load preferences from a TOML file");
    println!();
    println!("LIMITS:");
    println!("    {}", pylex::config::build_info::source_info());
    println!();
    println!("EXIT STATUS:");
    println!("    0 when the file has no diagnostics, 1 otherwise or on failure");
    println!();
    println!("EXAMPLES:");
    println!("    {} script.py --tokens", program_name);
    println!("    {} script.py --symbols --tab-width 8", program_name);
    println!("    {} script.py --json > report.json", program_name);
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => options.help = true,
            "--tokens" => options.show_tokens = true,
            "--symbols" => options.show_symbols = true,
            "--json" => options.json = true,
            "--tab-width" => options.tab_width = Some(parse_number(arg, iter.next())?),
            "--max-line-length" => options.max_line_length = Some(parse_number(arg, iter.next())?),
            "--config" => {
                let path = iter.next().ok_or_else(|| "--config requires a path".to_string())?;
                options.config_path = Some(path.clone());
            }
            other if other.starts_with("--") => return Err(format!("unknown option {}", other)),
            other => {
                if options.file.is_some() {
                    return Err(format!("unexpected argument {}", other));
                }
                options.file = Some(other.to_string());
            }
        }
    }

    Ok(options)
}

fn parse_number(flag: &str, value: Option<&String>) -> Result<usize, String> {
    value
        .ok_or_else(|| format!("{} requires a value", flag))?
        .parse()
        .map_err(|_| format!("{} expects a positive number", flag))
}

/// Preferences file (or environment defaults) with command-line overrides applied
fn build_config(options: &CliOptions) -> Result<RuntimeConfig, pipeline::PipelineError> {
    let mut config = match &options.config_path {
        Some(path) => RuntimeConfig::load_from_file(Path::new(path))?,
        None => RuntimeConfig::default(),
    };
    if let Some(tab_width) = options.tab_width {
        config.lexical.tab_width = tab_width;
    }
    if options.max_line_length.is_some() {
        config.lexical.max_line_length = options.max_line_length;
    }
    config.validate()?;
    Ok(config)
}

/// Returns whether the file scanned without diagnostics
fn process_single_file(
    file_path: &str,
    options: &CliOptions,
    config: &RuntimeConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let result = match pipeline::process_file_with_config(file_path, config) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("\nFAILED: {}", error);
            logging::print_cargo_style_summary();
            return Ok(false);
        }
    };
    let report = &result.report;

    if options.json {
        println!("{}", report.to_json().map_err(pipeline::PipelineError::from)?);
        return Ok(report.is_clean());
    }

    println!("Scanning file: {}", file_path);
    if options.show_tokens {
        println!("\nTOKENS:");
        print!("{}", format_token_table(&report.tokens));
    }
    if options.show_symbols {
        println!("\nSYMBOLS:");
        print!("{}", format_symbol_table(&report.symbols));
    }

    if report.is_clean() {
        println!(
            "\nSUCCESS: {} tokens, {} symbols, no diagnostics",
            report.tokens.len(),
            report.symbols.len()
        );
    } else {
        let source_map = SourceMap::new(std::fs::read_to_string(&result.file_metadata.path)?);
        println!("\nDIAGNOSTICS:");
        for diagnostic in &report.diagnostics {
            println!("{}", diagnostic);
            println!("{}", source_map.format_error(&diagnostic.span(), diagnostic.kind.as_str()));
        }
        println!("\nFAILED: {} diagnostic(s)", report.diagnostics.len());
    }

    logging::print_cargo_style_summary();
    Ok(report.is_clean())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_options() {
        let options = parse_options(&args(&[
            "script.py",
            "--tokens",
            "--tab-width",
            "8",
            "--max-line-length",
            "100",
        ]))
        .unwrap();
        assert_eq!(options.file.as_deref(), Some("script.py"));
        assert!(options.show_tokens);
        assert!(!options.show_symbols);
        assert_eq!(options.tab_width, Some(8));
        assert_eq!(options.max_line_length, Some(100));
    }

    #[test]
    fn test_parse_options_invalid() {
        assert!(parse_options(&args(&["--tab-width", "wide"])).is_err());
        assert!(parse_options(&args(&["--tab-width"])).is_err());
        assert!(parse_options(&args(&["--unknown-option"])).is_err());
        assert!(parse_options(&args(&["a.py", "b.py"])).is_err());
    }

    #[test]
    fn test_build_config_rejects_out_of_range_tab_width() {
        let options = CliOptions {
            tab_width: Some(0),
            ..CliOptions::default()
        };
        assert!(build_config(&options).is_err());
    }
}
