use std::str::FromStr;

const DEFAULT_CHUNKING_MULTIPLIER: usize = 1;
const DEFAULT_SCAN_MIN_LEN: usize = 1 << 15;

/// Environment variable overriding [`TraceGenOpts::chunking_multiplier`].
pub const CHUNKING_MULTIPLIER_ENV: &str = "TRACEGEN_CHUNKING_MULTIPLIER";
/// Environment variable overriding [`TraceGenOpts::scan_min_len`].
pub const SCAN_MIN_LEN_ENV: &str = "TRACEGEN_SCAN_MIN_LEN";
/// Environment variable setting [`TraceGenOpts::fixed_log2_rows`].
pub const FIXED_LOG2_ROWS_ENV: &str = "TRACEGEN_FIXED_LOG2_ROWS";

/// Knobs for trace generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceGenOpts {
    /// How many row chunks each core gets when rows are filled in parallel.
    pub chunking_multiplier: usize,
    /// The minimum number of points a thread folds sequentially in the prefix scan.
    pub scan_min_len: usize,
    /// If set, every trace is padded to exactly `2^fixed_log2_rows` rows.
    pub fixed_log2_rows: Option<usize>,
}

impl Default for TraceGenOpts {
    fn default() -> Self {
        Self {
            chunking_multiplier: DEFAULT_CHUNKING_MULTIPLIER,
            scan_min_len: DEFAULT_SCAN_MIN_LEN,
            fixed_log2_rows: None,
        }
    }
}

impl TraceGenOpts {
    /// The defaults, overridden by any of the `TRACEGEN_*` environment variables that parse.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// The defaults, overridden by the values `lookup` returns for the `TRACEGEN_*` keys. A value
    /// that does not parse is ignored with a warning.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            chunking_multiplier: parse_or(
                &lookup,
                CHUNKING_MULTIPLIER_ENV,
                defaults.chunking_multiplier,
            )
            .max(1),
            scan_min_len: parse_or(&lookup, SCAN_MIN_LEN_ENV, defaults.scan_min_len).max(1),
            fixed_log2_rows: parse(&lookup, FIXED_LOG2_ROWS_ENV),
        }
    }

    /// The number of rows handed to each parallel task for `nb_rows` rows.
    #[must_use]
    pub fn chunk_size(&self, nb_rows: usize) -> usize {
        std::cmp::max(nb_rows / (num_cpus::get() * self.chunking_multiplier.max(1)), 1)
    }
}

fn parse<T: FromStr>(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let value = lookup(key)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("ignoring {key}={value}: not a valid value");
            None
        }
    }
}

fn parse_or<T: FromStr>(lookup: impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    parse(lookup, key).unwrap_or(default)
}
