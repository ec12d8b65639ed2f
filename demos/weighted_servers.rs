//! Spread requests over three servers with smooth weighted round-robin.
//!
//! Run with `RUST_LOG=swrr=debug` to see registry events.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use swrr::SyncSmoothWeightedRr;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let lb = Arc::new(SyncSmoothWeightedRr::default());
    lb.add("server1", 5.0)?;
    lb.add("server2", 2.0)?;
    lb.add("server3", 3.0)?;

    let schedule: Vec<_> = (0..10).filter_map(|_| lb.next()).collect();
    println!("one period: {schedule:?}");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lb = Arc::clone(&lb);
            thread::spawn(move || (0..250).filter_map(|_| lb.next()).collect::<Vec<_>>())
        })
        .collect();

    let mut counts = BTreeMap::new();
    for h in handles {
        let picks = h.join().map_err(|_| "worker thread panicked")?;
        for key in picks {
            *counts.entry(key).or_insert(0usize) += 1;
        }
    }
    println!();
    println!("1000 picks across 4 threads:");
    for (key, n) in &counts {
        println!("  {key}  {n}");
    }

    lb.update(&"server2", 10.0)?;
    lb.reset();
    let schedule: Vec<_> = (0..18).filter_map(|_| lb.next()).collect();
    println!();
    println!("after re-weighting server2 to 10: {schedule:?}");

    Ok(())
}
