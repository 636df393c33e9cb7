//! Answers a text file of access/rank/select queries over a bit string.
//!
//! The input format is one query count line, one line holding the bit vector
//! as a `0`/`1` string, and one query per remaining line: `access <pos>`,
//! `rank <0|1> <pos>` or `select <0|1> <rank>`. The answers are written to
//! the output file, one per line, and a `RESULT` summary with the time spent
//! building the structures and answering the queries is printed to stdout.

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::time::Instant;

use ibits::{InterleavedBitVec, SampledSelect};

enum Query {
    Access(usize),
    Rank0(usize),
    Rank1(usize),
    Select0(usize),
    Select1(usize),
}

fn main() {
    let mut args = env::args().skip(1);
    let (Some(input_file), Some(output_file), None) = (args.next(), args.next(), args.next())
    else {
        print_usage()
    };

    match run(&input_file, &output_file) {
        Ok((time, space)) => println!("RESULT time={time} space={space}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(input_file: &str, output_file: &str) -> Result<(u128, usize), Box<dyn Error>> {
    let (bits, queries) = read_input(input_file)?;

    let mut num_ones = 0;
    let mut bitvector = InterleavedBitVec::<512, 14>::new(bits.len())?;
    for (pos, &byte) in bits.iter().enumerate() {
        let is_set = byte == b'1';
        num_ones += usize::from(is_set);
        bitvector.set_to(pos, is_set);
    }

    let mut answers = Vec::with_capacity(queries.len());
    let mut memory_space = bitvector.memory_space();

    let start = Instant::now();

    bitvector.finalize();
    let select: SampledSelect = SampledSelect::new(&bitvector, num_ones)?;
    memory_space += select.memory_space();

    for query in &queries {
        answers.push(match *query {
            Query::Access(pos) => bitvector.is_set(pos) as usize,
            Query::Rank0(pos) => bitvector.rank0(pos),
            Query::Rank1(pos) => bitvector.rank1(pos),
            Query::Select0(rank) => select.select0(rank),
            Query::Select1(rank) => select.select1(rank),
        });
    }

    let time = start.elapsed().as_millis();

    write_answers(output_file, &answers)?;

    Ok((time, memory_space))
}

/// Reads the bit string and the queries from the input file.
fn read_input(filename: &str) -> Result<(Vec<u8>, Vec<Query>), Box<dyn Error>> {
    let mut reader = BufReader::new(File::open(filename)?);

    let mut line = String::new();
    reader.read_line(&mut line)?;
    let num_queries = line.trim().parse::<usize>()?;

    line.clear();
    reader.read_line(&mut line)?;
    let bits = line.trim().as_bytes().to_vec();

    let mut queries = Vec::with_capacity(num_queries);
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        queries.push(parse_query(line.trim())?);
    }

    Ok((bits, queries))
}

fn parse_query(line: &str) -> Result<Query, Box<dyn Error>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        ["access", pos] => Ok(Query::Access(pos.parse()?)),
        ["rank", "0", pos] => Ok(Query::Rank0(pos.parse()?)),
        ["rank", "1", pos] => Ok(Query::Rank1(pos.parse()?)),
        ["select", "0", rank] => Ok(Query::Select0(rank.parse()?)),
        ["select", "1", rank] => Ok(Query::Select1(rank.parse()?)),
        _ => Err(format!("malformed query: {line}").into()),
    }
}

/// Writes one answer per line to the output file.
fn write_answers(filename: &str, answers: &[usize]) -> Result<(), Box<dyn Error>> {
    let mut writer = BufWriter::new(File::create(filename)?);
    for answer in answers {
        writeln!(writer, "{answer}")?;
    }
    writer.flush()?;
    Ok(())
}

fn print_usage() -> ! {
    println!("Usage: query_app <input file> <output file>");
    std::process::exit(1);
}
