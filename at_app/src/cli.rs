/// Config file path from the first command-line argument
pub fn config_path(default: &str) -> String {
    config_path_from(std::env::args(), default)
}

pub fn config_path_from<I: IntoIterator<Item = String>>(args: I, default: &str) -> String {
    args.into_iter().nth(1).filter(|arg| !arg.trim().is_empty()).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_config_path() {
        assert_eq!(config_path_from(args(&["at_strategy"]), "config/strategy.toml"), "config/strategy.toml");
        assert_eq!(config_path_from(args(&["at_strategy", "/etc/runner.json"]), "config/strategy.toml"), "/etc/runner.json");
    }
}
