// build.rs - TOML-driven compile-time constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    file_processing: FileProcessingLimits,
    lexical: LexicalLimits,
    symbols: SymbolLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct FileProcessingLimits {
    max_file_size: u64,
    large_file_threshold: u64,
    max_line_count_for_analysis: usize,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    default_tab_width: usize,
    max_tab_width: usize,
    max_line_length_ceiling: usize,
    token_buffer_capacity: usize,
}

#[derive(serde::Deserialize)]
struct SymbolLimits {
    initial_scope_capacity: usize,
    initial_symbol_capacity: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    max_log_events_per_file: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PYLEX_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=PYLEX_CONFIG_DIR");

    let profile = env::var("PYLEX_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("PYLEX_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the pylex directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_constraints(&config, &profile);
    generate_constants(&config, &profile);

    println!(
        "cargo:warning=Generated constants from {}",
        config_path.display()
    );
}

fn validate_constraints(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 1_000_000_000;
    const ABSOLUTE_MAX_TAB_WIDTH: usize = 16;

    if config.file_processing.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("LIMITS: max_file_size exceeds absolute maximum");
    }

    if config.file_processing.large_file_threshold > config.file_processing.max_file_size {
        panic!("LIMITS: large_file_threshold must not exceed max_file_size");
    }

    if config.lexical.default_tab_width == 0 {
        panic!("LIMITS: default_tab_width must be at least 1");
    }

    if config.lexical.max_tab_width > ABSOLUTE_MAX_TAB_WIDTH {
        panic!("LIMITS: max_tab_width exceeds absolute maximum");
    }

    if config.lexical.default_tab_width > config.lexical.max_tab_width {
        panic!("LIMITS: default_tab_width exceeds max_tab_width");
    }

    if config.lexical.max_line_length_ceiling == 0 {
        panic!("LIMITS: max_line_length_ceiling must be at least 1");
    }

    if profile == "production" && config.file_processing.max_file_size > 50_000_000 {
        panic!("PRODUCTION: max_file_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod file_processing {{
        pub const MAX_FILE_SIZE: u64 = {};
        pub const LARGE_FILE_THRESHOLD: u64 = {};
        pub const MAX_LINE_COUNT_FOR_ANALYSIS: usize = {};
    }}

    pub mod lexical {{
        pub const DEFAULT_TAB_WIDTH: usize = {};
        pub const MAX_TAB_WIDTH: usize = {};
        pub const MAX_LINE_LENGTH_CEILING: usize = {};
        pub const TOKEN_BUFFER_CAPACITY: usize = {};
    }}

    pub mod symbols {{
        pub const INITIAL_SCOPE_CAPACITY: usize = {};
        pub const INITIAL_SYMBOL_CAPACITY: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MAX_LOG_EVENTS_PER_FILE: usize = {};
    }}
}}
"#,
        profile,
        // File Processing
        config.file_processing.max_file_size,
        config.file_processing.large_file_threshold,
        config.file_processing.max_line_count_for_analysis,
        // Lexical
        config.lexical.default_tab_width,
        config.lexical.max_tab_width,
        config.lexical.max_line_length_ceiling,
        config.lexical.token_buffer_capacity,
        // Symbols
        config.symbols.initial_scope_capacity,
        config.symbols.initial_symbol_capacity,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.max_log_events_per_file,
    );

    fs::write(output_path, constants_code).unwrap();
}
