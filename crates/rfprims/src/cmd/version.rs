use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("rfprims {}", env!("CARGO_PKG_VERSION"));
    if args.extended {
        println!("license: {}", env!("CARGO_PKG_LICENSE"));
        println!("repository: {}", env!("CARGO_PKG_REPOSITORY"));
        println!("rust-version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }
    Ok(SUCCESS)
}
