//! aggregate-metadata - Collapse attribute,value,unit metadata into one record
//!
//! ```bash
//! aggregate-metadata --input meta.csv                  # metadata.csv / metadata.json
//! aggregate-metadata --input meta.csv --id sample1 --dup-sep ";"
//! ```

use clap::Parser;
use tabkit::cli::AggregateArgs;

fn main() {
    let args = AggregateArgs::parse();
    args.verbosity.init_logging();

    if let Err(e) = args.run() {
        eprintln!("❌ Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
