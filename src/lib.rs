pub mod cli;
pub mod disposer;
pub mod error;
pub mod hasher;
pub mod logging;
pub mod policy;
pub mod resolver;
pub mod scanner;
pub mod store;
pub mod summary;
pub mod utils;

pub use cli::Cli;
pub use disposer::{DeleteFailure, DisposeReport, dispose};
pub use error::{Error, Result};
pub use hasher::{Digest, files_identical, hash_file};
pub use policy::{Preference, RetentionPolicy, RetentionRule};
pub use resolver::{Duplicate, HashCollision, Resolution, ResolveOptions, resolve};
pub use scanner::{ScanOutcome, scan};
pub use store::{SizeBucket, SizeBucketStore};
pub use summary::RunSummary;
pub use utils::{StageTimer, format_human_elapsed};
