use std::io::{self, Read};
use std::process::ExitCode;

const USAGE: &str = "usage: convert <to-json|to-markdown> < input";

fn main() -> ExitCode {
    let Some(direction) = std::env::args().nth(1) else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    let mut input = String::new();
    if let Err(error) = io::stdin().read_to_string(&mut input) {
        eprintln!("convert: reading stdin: {error}");
        return ExitCode::FAILURE;
    }

    let output = match direction.as_str() {
        "to-json" => mdxdoc::parse(&input).to_json(),
        "to-markdown" => mdxdoc::Node::from_json(&input).map(|doc| mdxdoc::serialize(&doc)),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match output {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("convert: {error}");
            ExitCode::FAILURE
        }
    }
}
