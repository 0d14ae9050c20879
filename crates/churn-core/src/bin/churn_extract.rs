use churn_core::cli::{run_extract, ExtractCli};
use clap::Parser;

fn main() {
    let code = run_extract(ExtractCli::parse());
    std::process::exit(code.as_i32());
}
