//! `swrr`: weighted item selection.
//!
//! Decides which registered item (a backend server, a queue, a worker) receives the
//! next request, in proportion to caller-assigned weights.
//!
//! Exposed modules:
//! - `smooth`: smooth weighted round-robin (deterministic, burst-free).
//! - `random`: weighted random selection.
//! - `sync`: a reader/writer-locked wrapper for sharing any balancer across threads.
//!
//! ```
//! use swrr::{Balance, SmoothWeightedRr};
//!
//! let mut lb = SmoothWeightedRr::new();
//! lb.add("server1", 5.0)?;
//! lb.add("server2", 2.0)?;
//! lb.add("server3", 3.0)?;
//! assert_eq!(lb.next(), Some("server1"));
//! # Ok::<(), swrr::BalanceError>(())
//! ```

#![forbid(unsafe_code)]

pub mod balance;
pub mod error;
pub mod random;
pub mod smooth;
pub mod sync;

pub use balance::Balance;
pub use error::BalanceError;
pub use random::WeightedRandom;
pub use smooth::SmoothWeightedRr;
pub use sync::{Locked, SyncSmoothWeightedRr};
