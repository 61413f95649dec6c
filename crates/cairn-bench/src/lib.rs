//! Benchmark workloads and utilities for the Cairn verification
//! framework.
//!
//! Provides deterministic synthetic workloads: scattered feature
//! extents over a square world, generated from a seed so repeated runs
//! measure the same data.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use cairn_core::Envelope;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Generate `n` feature extents scattered across a `world`-sized square.
///
/// Each extent has edge lengths in `(0, max_size]` and lies fully
/// inside `(0, 0) - (world, world)`. Ids are sequential. Deterministic
/// for a given seed.
pub fn scattered_extents(n: usize, seed: u64, world: f64, max_size: f64) -> Vec<(u64, Envelope)> {
    assert!(world > max_size, "world must exceed max feature size");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let w = rng.random::<f64>() * max_size;
            let h = rng.random::<f64>() * max_size;
            let x = rng.random::<f64>() * (world - w);
            let y = rng.random::<f64>() * (world - h);
            let extent = Envelope::new(x, y, x + w, y + h)
                .expect("generated extent is always well-formed");
            (i as u64, extent)
        })
        .collect()
}

/// Column-sweep tile envelopes: `steps` cumulative extents growing
/// west-to-east across a `world`-sized square, the last covering it
/// entirely.
pub fn column_sweep(steps: usize, world: f64) -> Vec<Envelope> {
    assert!(steps > 0);
    (1..=steps)
        .map(|i| {
            let x = world * (i as f64) / (steps as f64);
            Envelope::new(0.0, 0.0, x, world).expect("sweep envelope is always well-formed")
        })
        .collect()
}
