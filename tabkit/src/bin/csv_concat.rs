//! csv-concat - Concatenate .csv files into .csv and .json
//!
//! ```bash
//! csv-concat --input a.csv b.csv                      # rows, outer join
//! csv-concat --input a.csv b.csv --axis columns --join inner --prefix merged
//! ```

use clap::Parser;
use tabkit::cli::ConcatArgs;

fn main() {
    let args = ConcatArgs::parse();
    args.verbosity.init_logging();

    if let Err(e) = args.run() {
        eprintln!("❌ Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
