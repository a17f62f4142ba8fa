#![forbid(unsafe_code)]
use std::io::{Read as _, Write as _};
use std::path::PathBuf;
use std::{env, ffi, fs, io, process};

use tagzw::{Decoder, Encoder, LzwError, MAX_ENTRIES};

fn main() -> CodingResult {
    init_tracing();
    CodingResult::catch_panic(|| {
        let flags = Flags::from_args(env::args_os()).unwrap_or_else(|ParamError| explain());
        run_coding(flags)
    })
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
}

fn run_coding(flags: Flags) -> Result<(), io::Error> {
    let operation = flags.operation.unwrap_or_else(explain);
    let capacity = flags.capacity;

    let mut data = vec![];
    match flags.input {
        Input::File(file) => io::BufReader::new(fs::File::open(file)?).read_to_end(&mut data)?,
        Input::Stdin => io::stdin().lock().read_to_end(&mut data)?,
    };

    // Code completely before touching the output, which may well be the input file.
    let coded = match operation {
        Operation::Encode => Encoder::with_capacity(capacity).encode(&data),
        Operation::Decode => Decoder::with_capacity(capacity).decode(&data),
    }
    .map_err(|err| {
        let kind = match err {
            LzwError::OutOfMemory => io::ErrorKind::OutOfMemory,
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, err)
    })?;

    match flags.output {
        Some(file) => fs::write(file, &coded)?,
        None => {
            let mut out = io::stdout().lock();
            out.write_all(&coded)?;
            out.flush()?;
        }
    }

    tracing::info!(
        read = data.len(),
        written = coded.len(),
        ?operation,
        "done"
    );
    Ok(())
}

struct Flags {
    input: Input,
    output: Option<PathBuf>,
    operation: Option<Operation>,
    capacity: usize,
}

struct ParamError;

#[derive(Debug)]
enum Input {
    File(PathBuf),
    Stdin,
}

#[derive(Debug)]
enum Operation {
    Encode,
    Decode,
}

fn explain<T>() -> T {
    println!(
        "Usage: lzw [-e|-d] [-c <capacity>] [-o <output>] <file>\n\
        Arguments:\n\
        -e\t operation encode\n\
        -d\t operation decode\n\
        -c\t dictionary capacity, at most {}\n\
        -o\t output file, stdout if omitted\n\
        <file>\tfilepath or '-' for stdin",
        MAX_ENTRIES
    );
    process::exit(1);
}

impl Default for Flags {
    fn default() -> Flags {
        Flags {
            input: Input::Stdin,
            output: None,
            operation: None,
            capacity: MAX_ENTRIES,
        }
    }
}

fn command() -> clap::Command {
    clap::Command::new("tagzw")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interact with tagged lzw data")
        .arg(
            clap::Arg::new("decode")
                .short('d')
                .long("decode")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("encode")
                .short('e')
                .long("encode")
                .action(clap::ArgAction::SetTrue),
        )
        .group(
            clap::ArgGroup::new("operation")
                .args(["decode", "encode"])
                .multiple(false)
                .required(true),
        )
        .arg(
            clap::Arg::new("capacity")
                .short('c')
                .long("capacity")
                .value_parser(clap::value_parser!(u64).range(0..=MAX_ENTRIES as u64)),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(clap::builder::ValueParser::path_buf()),
        )
        .arg(
            clap::Arg::new("file")
                .default_value("-")
                .value_parser(clap::builder::ValueParser::path_buf()),
        )
}

impl Flags {
    fn from_args(mut args: impl Iterator<Item = ffi::OsString>) -> Result<Self, ParamError> {
        let mut flags = Flags::default();
        let matches = command()
            .try_get_matches_from(args.by_ref())
            .map_err(|_| ParamError)?;

        if matches.get_flag("decode") {
            flags.operation = Some(Operation::Decode);
        } else if matches.get_flag("encode") {
            flags.operation = Some(Operation::Encode);
        }

        if let Some(&capacity) = matches.get_one::<u64>("capacity") {
            flags.capacity = usize::try_from(capacity).map_err(|_| ParamError)?;
        }

        flags.output = matches.get_one::<PathBuf>("output").cloned();

        match matches.get_one::<PathBuf>("file") {
            None => flags.input = Input::Stdin,
            Some(p) if *p == PathBuf::from("-") => flags.input = Input::Stdin,
            Some(p) => flags.input = Input::File(p.clone()),
        }

        Ok(flags)
    }
}

enum CodingResult {
    Ok,
    Err(io::Error),
    Panic,
}

impl CodingResult {
    fn catch_panic(op: fn() -> Result<(), io::Error>) -> Self {
        std::panic::catch_unwind(|| match op() {
            Ok(()) => CodingResult::Ok,
            Err(err) => CodingResult::Err(err),
        })
        .unwrap_or(CodingResult::Panic)
    }
}

impl std::process::Termination for CodingResult {
    fn report(self) -> std::process::ExitCode {
        match self {
            CodingResult::Ok => std::process::ExitCode::SUCCESS,
            CodingResult::Err(err) => {
                eprintln!("{}", err);
                std::process::ExitCode::FAILURE
            }
            CodingResult::Panic => {
                eprintln!(
                    "The process failed irrecoverably! This should never happen and is a bug."
                );
                std::process::ExitCode::from(128)
            }
        }
    }
}
