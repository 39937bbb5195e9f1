use colored::*;
use mmvii::batch::process;
use mmvii::debug::DebugSwitch;
use mmvii::repl::{debug_message, Command};
use mmvii::{Environment, Outcome};
use rustyline::{error::ReadlineError, Config, DefaultEditor};

struct RGBValues {
    value: (u8, u8, u8),
    message: (u8, u8, u8),
    error: (u8, u8, u8),
}

fn main() -> rustyline::Result<()> {
    let config = Config::builder().build();
    let mut rl = DefaultEditor::with_config(config)?;
    let debug = DebugSwitch::install().ok();

    let colours = RGBValues {
        value: (0xB4, 0xB4, 0xB4),   // Light gray
        message: (0x78, 0xB4, 0x78), // Soft green
        error: (0xDC, 0x64, 0x5A),   // Soft red
    };

    let mut env = Environment::new();

    println!("mmvii CLI Calculator");
    println!("enter 'q' to quit.");
    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let line = match Command::parse(&line) {
                    Command::Quit => break,
                    Command::ToggleDebug => {
                        let message = debug_message(debug.as_ref().map(DebugSwitch::toggle));
                        let (r, g, b) = colours.message;
                        println!("{}", message.truecolor(r, g, b));
                        continue;
                    }
                    Command::Evaluate(line) => line,
                };
                if !line.is_empty() {
                    rl.add_history_entry(line)?;
                }

                for outcome in process(line, &mut env) {
                    let (r, g, b) = match outcome {
                        Outcome::Value(_) => colours.value,
                        Outcome::Assigned { .. } | Outcome::Defined { .. } => colours.message,
                        Outcome::Error(_) => colours.error,
                    };
                    println!("{}", outcome.to_string().truecolor(r, g, b));
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\nquitting");
                break;
            }
            Err(err) => {
                println!("{:?}", err);
                break;
            }
        }
    }

    Ok(())
}
