use clap::{Parser, Subcommand};
use fgk_codec::stats::EncodeReport;
use std::io::Write;
use std::path::PathBuf;
use std::{error, fs, io};
use tracing_subscriber::EnvFilter;

/// Command line argument parser
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct MyArgs {
    #[clap(subcommand)]
    pub(crate) mode: Mode,

    /// Print the encoding report as JSON
    #[clap(long, action)]
    pub(crate) json: bool,

    /// Log at debug level
    #[clap(short, long, action)]
    pub(crate) verbose: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Mode {
    /// Compress INPUT into OUTPUT and print the compression statistics
    Encode {
        /// File to compress
        input: PathBuf,
        /// Where to write the compressed stream
        output: PathBuf,
    },

    /// Decompress INPUT into OUTPUT
    Decode {
        /// Compressed stream
        input: PathBuf,
        /// Where to write the recovered bytes
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn error::Error>> {
    let args: MyArgs = MyArgs::parse();
    init_logging(args.verbose)?;

    match args.mode {
        Mode::Encode { input, output } => {
            let data = fs::read(&input)?;
            let encoded = fgk_codec::encode(&data)?;
            fs::write(&output, &encoded)?;
            tracing::info!(
                input = %input.display(),
                output = %output.display(),
                bytes = encoded.len(),
                "encoded"
            );

            let report = EncodeReport::new(&data, &encoded);
            let stdout = io::stdout();
            let mut handle = io::BufWriter::new(stdout.lock());
            if args.json {
                writeln!(handle, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                write!(handle, "{report}")?;
            }
            handle.flush()?;
        }
        Mode::Decode { input, output } => {
            let data = fs::read(&input)?;
            let decoded = fgk_codec::decode(&data)?;
            fs::write(&output, &decoded)?;
            tracing::info!(
                input = %input.display(),
                output = %output.display(),
                bytes = decoded.len(),
                "decoded"
            );
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<(), Box<dyn error::Error>> {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("fgk={level}").parse()?)
                .add_directive(format!("fgk_codec={level}").parse()?),
        )
        .init();
    Ok(())
}
