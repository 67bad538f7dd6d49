//! pullrun - pull a program from an OCI registry and run or install it

use clap::Parser;
use pullrun_cli::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(i32::from(e.use_stderr()));
        }
    };

    let verbose = cli.verbose;
    pullrun_cli::logging::init(verbose);

    match cli.run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            if verbose {
                eprintln!("Error: {e:?}");
            } else {
                eprintln!("Error: {e:#}");
            }
            std::process::exit(1);
        }
    }
}
