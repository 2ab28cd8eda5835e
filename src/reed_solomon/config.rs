//! Configuration for encode/decode operations

/// Shard length (bytes) at which row-level parallelism starts paying off
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64 * 1024;

/// Configuration for codec operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Number of threads for computation (0 = auto-detect)
    pub threads: usize,
    /// Whether to compute shard rows in parallel (false = single-threaded everything)
    pub parallel: bool,
    /// Minimum shard length before rows are handed to the rayon pool
    pub parallel_threshold: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            threads: 0, // Auto-detect CPU cores
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl CodecConfig {
    pub fn new(threads: usize, parallel: bool) -> Self {
        Self {
            threads,
            parallel,
            ..Self::default()
        }
    }

    /// Single-threaded configuration; pass it to [`ReedSolomon::with_config`]
    ///
    /// [`ReedSolomon::with_config`]: super::ReedSolomon::with_config
    pub fn sequential() -> Self {
        Self::new(1, false)
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn from_args(matches: &clap::ArgMatches) -> Self {
        let threads = matches
            .get_one::<String>("threads")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let parallel = !matches.get_flag("no-parallel");

        let parallel_threshold = matches
            .get_one::<String>("parallel-threshold")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PARALLEL_THRESHOLD);

        Self::new(threads, parallel).with_parallel_threshold(parallel_threshold)
    }

    /// Get effective thread count (auto-detect if 0)
    pub fn effective_threads(&self) -> usize {
        match (self.parallel, self.threads) {
            (false, _) => 1, // Sequential mode always uses single thread
            (true, 0) => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4), // Auto-detect CPU cores
            (true, n) => n,  // Use specified thread count
        }
    }

    /// Whether rows of `shard_len` bytes should be processed in parallel
    pub fn use_parallel(&self, shard_len: usize, rows: usize) -> bool {
        self.parallel && rows > 1 && shard_len >= self.parallel_threshold
    }

    /// Configure the global rayon pool; only the first call in a process wins
    pub fn configure_thread_pool(&self) {
        let threads = self.effective_threads();
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            log::warn!("Could not set thread count to {}, using default: {}", threads, e);
        }
    }
}
