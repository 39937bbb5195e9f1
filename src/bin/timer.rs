use colored::*;
use mmvii::countdown::{deadline_after, run, LineInput, TimeSource};
use mmvii::terminal::{SystemClock, TerminalInput, TerminalPrinter};
use mmvii::timer;

const CLOCK_FORMAT: &str = "%H:%M:%S";

fn main() -> rustyline::Result<()> {
    let mut input = TerminalInput::new()?;

    println!("mmvii");
    let Some(line) = input.read_line() else {
        return Ok(());
    };
    let expr = line.trim();
    let shown = if expr.starts_with('{') && expr.ends_with('}') {
        expr.to_owned()
    } else {
        format!("{{ {} }}", expr)
    };

    let timers = match timer::parse(expr) {
        Ok(timers) => timers,
        Err(err) => {
            println!("{}", format!("Error: {}", err).truecolor(0xDC, 0x64, 0x5A));
            return Ok(());
        }
    };

    let mut clock = SystemClock;
    let now = clock.now();
    let total = timers.iter().fold(0i64, |sum, &minutes| sum.saturating_add(minutes));
    println!("sys    {}", now.format(CLOCK_FORMAT));
    println!("start  {}", clock.now().format(CLOCK_FORMAT));
    println!("end    {}", deadline_after(now, total).format(CLOCK_FORMAT));
    println!("      {}", shown);

    let mut screen = TerminalPrinter::new()?;
    run(&timers, &mut clock, &mut input, &mut screen)?;
    Ok(())
}
