//! Generates random inputs for the query application: a Bernoulli bit string
//! followed by uniformly random well-formed queries, in the text format the
//! application parses.

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let [seed, length, fill_ratio, num_queries, output_file] = &args[..] else {
        println!("Usage: input_generator <seed> <length> <fill_ratio> <num_queries> <output file>");
        std::process::exit(1);
    };

    if let Err(e) = run(seed, length, fill_ratio, num_queries, output_file) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(
    seed: &str,
    length: &str,
    fill_ratio: &str,
    num_queries: &str,
    output_file: &str,
) -> Result<(), Box<dyn Error>> {
    let seed: u64 = seed.parse()?;
    let length: usize = length.parse()?;
    let fill_ratio: f64 = fill_ratio.parse()?;
    let num_queries: usize = num_queries.parse()?;

    if !(0.0..=1.0).contains(&fill_ratio) {
        return Err("fill ratio must be between 0 and 1".into());
    }

    let mut out = BufWriter::new(File::create(output_file)?);
    let mut rng = StdRng::seed_from_u64(seed);

    writeln!(out, "{num_queries}")?;

    let mut bits = String::with_capacity(length);
    let mut num_ones = 0;
    for _ in 0..length {
        let is_set = rng.gen_bool(fill_ratio);
        num_ones += usize::from(is_set);
        bits.push(if is_set { '1' } else { '0' });
    }
    writeln!(out, "{bits}")?;

    if length == 0 {
        out.flush()?;
        return Ok(());
    }

    let num_zeros = length - num_ones;
    for _ in 0..num_queries {
        // fall back to an access query when a select query has no valid rank
        match rng.gen_range(0..5) {
            1 => writeln!(out, "rank 0 {}", rng.gen_range(0..length))?,
            2 => writeln!(out, "rank 1 {}", rng.gen_range(0..length))?,
            3 if num_zeros > 0 => writeln!(out, "select 0 {}", rng.gen_range(1..=num_zeros))?,
            4 if num_ones > 0 => writeln!(out, "select 1 {}", rng.gen_range(1..=num_ones))?,
            _ => writeln!(out, "access {}", rng.gen_range(0..length))?,
        }
    }

    out.flush()?;
    Ok(())
}
