#[cfg(not(target_arch = "wasm32"))]
use simplelog::{Color, ColorChoice, ConfigBuilder, Level, TermLogger, TerminalMode};

pub use log::LevelFilter;

/// Installs the terminal logger. Calling it twice is harmless, the second call is ignored.
pub fn init(level: LevelFilter) {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")]
        {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            let _ = console_log::init_with_level(level.to_level().unwrap_or(log::Level::Warn));
        }
        else
        {
            let config = ConfigBuilder::new()
                .set_level_color(Level::Trace, Some(Color::White))
                .set_level_color(Level::Info, Some(Color::Green))
                .set_level_color(Level::Warn, Some(Color::Yellow))
                .set_level_color(Level::Error, Some(Color::Red))
                .build();

            let _ = TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto);
        }
    }
}

/// Parses a level name from the configuration, falling back to `Info`.
pub fn level_from_str(level: &str) -> LevelFilter {
    match level.parse::<LevelFilter>() {
        Ok(level) => level,
        Err(_) => {
            eprintln!("Unknown log level '{}'. Defaulting to info.", level);
            LevelFilter::Info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!(level_from_str("debug"), LevelFilter::Debug);
        assert_eq!(level_from_str("WARN"), LevelFilter::Warn);
        assert_eq!(level_from_str("off"), LevelFilter::Off);
    }

    #[test]
    fn unknown_level_defaults_to_info() {
        assert_eq!(level_from_str("chatty"), LevelFilter::Info);
    }
}
