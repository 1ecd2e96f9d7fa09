//! `example <N> [output.csv] [bits_per_fp]`
//!
//! Loads `N` keys (set R) and `100*N` keys (set S) from a seeded RNG, builds
//! a pair sized for R, inserts R, then sweeps lookups over S and rehashes
//! dirty buckets until no false positive remains, writing the per-round CSV
//! spec.md §6 describes. Follows the teacher crate's `src/bin/*.rs` pattern
//! of `anyhow::Result` in `main` plus `eprintln!` progress reporting.

use std::env;
use std::fs::File;
use std::io::{self, Write};

use anyhow::{Context, Result};
use itertools::Itertools;
use rand::RngCore;
use rand_xoshiro::Xoshiro256PlusPlus;
use rand::SeedableRng;

use adaptive_cuckoo_filter_pair::{CuckooRng, FilterPair, FilterPairConfig, FingerprintBits};

const MAX_ROUNDS: usize = 10_000;

fn next_key(rng: &mut Xoshiro256PlusPlus) -> u64 {
    (u64::from(rng.next_u32()) << 32) | u64::from(rng.next_u32())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let n: usize = args
        .get(1)
        .context("usage: adaptive_bench <N> [output.csv] [bits_per_fp]")?
        .parse()
        .context("N must be a positive integer")?;
    let bits_per_fp: u32 = args
        .get(3)
        .map(|s| s.parse())
        .transpose()
        .context("bits_per_fp must be an integer")?
        .unwrap_or(12);
    let bits = FingerprintBits::try_from(bits_per_fp)
        .map_err(|e| anyhow::anyhow!("invalid bits_per_fp: {e}"))?;

    let mut gen = Xoshiro256PlusPlus::seed_from_u64(1);
    let r_keys: Vec<u64> = (0..n).map(|_| next_key(&mut gen)).collect();
    let s_keys: Vec<u64> = (0..n * 100).map(|_| next_key(&mut gen)).collect();

    let config = FilterPairConfig::new(n, bits);
    let mut pair = FilterPair::with_rng(config, CuckooRng::seed_from_u64(1));

    for &k in &r_keys {
        pair.insert(k);
    }
    eprintln!("inserted {} keys, {}", r_keys.len(), pair.info());

    let mut csv = String::new();
    csv.push_str("lookup_round,false_positives,fp_rate\n");

    let mut round = 0usize;
    loop {
        pair.start_lookup();
        for k in &s_keys {
            pair.lookup(k);
        }
        let false_positives = pair.round_false_positives();
        let fp_rate = false_positives as f64 / s_keys.len() as f64;
        csv.push_str(&format!("{round},{false_positives},{fp_rate:.6}\n"));
        eprintln!("round {round}: {false_positives} false positives ({fp_rate:.6})");

        if false_positives == 0 {
            break;
        }
        pair.rehash_buckets();
        round += 1;
        if round >= MAX_ROUNDS {
            eprintln!("warning: did not converge within {MAX_ROUNDS} rounds");
            break;
        }
    }

    csv.push_str("slot_per_bucket,bucket_count,capacity,load_factor\n");
    csv.push_str(&format!(
        "4,{},{},{:.6}\n",
        pair.bucket_count(),
        n,
        pair.load_factor()
    ));

    csv.push_str("rehashes_per_bucket,count\n");
    for (seed, count) in pair.seeds().iter().counts().into_iter().sorted() {
        csv.push_str(&format!("{seed},{count}\n"));
    }

    match args.get(2) {
        Some(path) => {
            let mut file = File::create(path).with_context(|| format!("creating {path}"))?;
            file.write_all(csv.as_bytes())?;
        }
        None => {
            io::stdout().write_all(csv.as_bytes())?;
        }
    }

    Ok(())
}
