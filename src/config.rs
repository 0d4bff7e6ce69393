use std::time::Duration;

const DEFAULT_MIN_SUGGESTION_LEN: usize = 10;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    pub min_suggestion_len: usize,
    pub store_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_suggestion_len: DEFAULT_MIN_SUGGESTION_LEN,
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let mut config = Config::default();
        if let Some(n) = dotenv::var("MIN_SUGGESTION_LEN").ok().and_then(|v| v.parse().ok()) {
            config.min_suggestion_len = n;
        }
        if let Some(ms) = dotenv::var("STORE_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()) {
            config.store_timeout = Duration::from_millis(ms);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.min_suggestion_len, 10);
        assert_eq!(config.store_timeout, Duration::from_secs(5));
    }
}
