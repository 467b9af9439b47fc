//! Configuration for pylex
//!
//! Compile-time limits are generated by build.rs from `config/<profile>.toml`; runtime
//! preferences come from `PYLEX_*` environment variables or a TOML preferences file.

include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("PYLEX_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("PYLEX_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;

    #[test]
    fn test_generated_limits_are_consistent() {
        assert!(compile_time::lexical::DEFAULT_TAB_WIDTH >= 1);
        assert!(compile_time::lexical::DEFAULT_TAB_WIDTH <= compile_time::lexical::MAX_TAB_WIDTH);
        assert!(
            compile_time::file_processing::LARGE_FILE_THRESHOLD
                <= compile_time::file_processing::MAX_FILE_SIZE
        );
    }

    #[test]
    fn test_build_info() {
        assert!(super::build_info::source_info().ends_with(".toml"));
    }
}
