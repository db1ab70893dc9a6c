use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use emulator::program::Program;
use emulator::vm::{Status, Vm};

/// LS-8 virtual machine.
#[derive(Parser)]
#[command(version, about)]
struct Args {
  /// Program to execute, one binary-literal byte per line.
  program: PathBuf,

  /// Abort if the program has not halted after this many instructions.
  #[arg(long)]
  max_cycles: Option<u64>,

  /// Dump machine state to stderr before every instruction.
  #[arg(long)]
  trace: bool,
}

fn main() -> Result<()> {
  env_logger::init();
  let args = Args::parse();

  let program = Program::from_file(&args.program)
    .with_context(|| format!("could not read program {}", args.program.display()))?;
  if program.is_empty() {
    bail!("{} contains no instructions", args.program.display());
  }

  let mut vm = Vm::new();
  vm.load(&program)?;

  let stdout = io::stdout();
  let mut out = stdout.lock();

  if args.trace {
    let mut cycles: u64 = 0;
    loop {
      eprintln!("{}", vm.trace_line());
      if vm.step(&mut out)? == Status::Halted {
        break;
      }
      cycles += 1;
      if args.max_cycles.is_some_and(|limit| cycles >= limit) {
        bail!("program did not halt within {cycles} cycles");
      }
    }
  } else {
    match args.max_cycles {
      Some(limit) => {
        if vm.run_bounded(&mut out, limit)? == Status::Running {
          bail!("program did not halt within {limit} cycles");
        }
      }
      None => vm.run(&mut out)?,
    }
  }

  Ok(())
}
