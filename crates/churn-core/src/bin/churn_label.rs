use churn_core::cli::{run_label, LabelCli};
use clap::Parser;

fn main() {
    let code = run_label(LabelCli::parse());
    std::process::exit(code.as_i32());
}
