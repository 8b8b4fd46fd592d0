use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use rust_jvm::logging::{self, SimpleLogger};
use rust_jvm::model::class_file::ClassFile;
use rust_jvm::vm::{self, NativeBridge};
use rust_jvm::{parse_class_file, Result};

/// Runs the `main` method of a Java class file.
#[derive(Debug, Parser)]
#[command(name = "rust-jvm", version)]
struct Cli {
    /// The class file to run. Read from standard input when omitted.
    path: Option<PathBuf>,
    /// Log more detail to standard error; repeat for more.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Print the decoded constant pool and methods instead of running.
    #[arg(long)]
    dump: bool,
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    let bytes = match path {
        Some(path) => fs::read(path)?,
        None => {
            let mut bytes = vec![];
            io::stdin().read_to_end(&mut bytes)?;
            bytes
        }
    };
    Ok(bytes)
}

fn dump(class: &ClassFile) -> Result<()> {
    println!("class {} (version {}.{})", class.name()?, class.major_version,
             class.minor_version);
    println!("constant pool:");
    for (index, entry) in class.constant_pool.iter() {
        println!("  #{:<4} {}", index, entry);
    }
    println!("methods:");
    for method in &class.methods {
        let descriptor = class.constant_pool.utf8_string(method.descriptor_index)?;
        println!("  {}{}", class.method_name(method)?, descriptor);
        for code in &method.code {
            println!("    max_stack={} max_locals={} code={:02x?}", code.max_stack,
                     code.max_locals, code.code);
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let bytes = read_input(cli.path.as_ref())?;
    let class = parse_class_file(&bytes)?;
    if cli.dump {
        return dump(&class);
    }
    vm::run_main(&class, &NativeBridge::with_stdout())?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = SimpleLogger::init(logging::level_for_verbosity(cli.verbose)) {
        eprintln!("could not install logger: {}", e);
    }

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
