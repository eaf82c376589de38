pub mod batch;

pub use batch::{
    BatchConfig, BatchError, BatchObserver, TracingObserver,
    generate_batch, run_batch, run_batch_with_rng,
    KEY_SIZES, KEYS_PER_SIZE,
};
