//! Runs a list of timers one after another, one tick per second.
//!
//! The clock, the keyboard and the screen are reached only through the
//! [`TimeSource`], [`LineInput`] and [`Printer`] traits so the loop can be
//! driven by a fake clock in tests.

use std::io;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Local};
use tracing::debug;

use crate::format::format_time;

/// Sent by Ctrl-R: restart the whole run from the first timer.
pub const RESTART_ALL: &str = "\x12";

pub const TICK: StdDuration = StdDuration::from_secs(1);

pub trait TimeSource {
    fn now(&self) -> DateTime<Local>;
    fn sleep(&mut self, duration: StdDuration);
}

pub trait LineInput {
    /// Blocks for a full line; `None` at end of input.
    fn read_line(&mut self) -> Option<String>;
    /// Returns a line only if one is already waiting.
    fn poll_line(&mut self) -> Option<String>;
    /// Keys typed towards the next line, echoed after the status.
    fn pending(&self) -> &str {
        ""
    }
}

pub trait Printer {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
    /// Overwrites the status line in place.
    fn write_status(&mut self, status: &str) -> io::Result<()>;
    fn clear_status(&mut self) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Quit,
}

enum Control {
    Quit,
    RestartCurrent,
    RestartAll,
}

impl Control {
    fn parse(line: &str) -> Option<Control> {
        match line.trim_matches(|c| c == '\r' || c == '\n' || c == ' ') {
            "q" => Some(Control::Quit),
            "r" => Some(Control::RestartCurrent),
            RESTART_ALL => Some(Control::RestartAll),
            _ => None,
        }
    }
}

/// `now + minutes`. A span too large to represent is treated as already over.
pub fn deadline_after(now: DateTime<Local>, minutes: i64) -> DateTime<Local> {
    Duration::try_minutes(minutes)
        .and_then(|span| now.checked_add_signed(span))
        .unwrap_or(now)
}

/// Counts down every entry of `timers` in order. Returns early with
/// [`RunOutcome::Quit`] if the user asks to quit. Screen errors end the run.
pub fn run<T, I, P>(
    timers: &[i64],
    clock: &mut T,
    input: &mut I,
    out: &mut P,
) -> io::Result<RunOutcome>
where
    T: TimeSource,
    I: LineInput,
    P: Printer,
{
    'run: loop {
        for (idx, &minutes) in timers.iter().enumerate() {
            out.write_line(&format!("timer {}/{}: {} minutes", idx + 1, timers.len(), minutes))?;
            let mut deadline = deadline_after(clock.now(), minutes);

            loop {
                let remaining = deadline - clock.now();
                if remaining.num_milliseconds() <= 0 {
                    out.clear_status()?;
                    out.write_line("time's up!")?;
                    break;
                }
                let mut status = format!("timer {}", format_time(remaining.num_seconds() as u64));
                if !input.pending().is_empty() {
                    status.push_str("  ");
                    status.push_str(input.pending());
                }
                out.write_status(&status)?;
                clock.sleep(TICK);

                let Some(line) = input.poll_line() else {
                    continue;
                };
                match Control::parse(&line) {
                    Some(Control::Quit) => {
                        out.clear_status()?;
                        out.write_line("quitting.")?;
                        return Ok(RunOutcome::Quit);
                    }
                    Some(Control::RestartCurrent) => {
                        out.clear_status()?;
                        out.write_line("restarting current timer")?;
                        deadline = deadline_after(clock.now(), minutes);
                    }
                    Some(Control::RestartAll) => {
                        out.clear_status()?;
                        out.write_line("restarting all timers")?;
                        debug!("restarting run of {} timers", timers.len());
                        continue 'run;
                    }
                    None => debug!("ignoring input {:?}", line),
                }
            }
            out.write_line("")?;
        }
        return Ok(RunOutcome::Completed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    struct FakeClock {
        now: DateTime<Local>,
    }

    impl FakeClock {
        fn new() -> Self {
            FakeClock {
                now: Local.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            }
        }
    }

    impl TimeSource for FakeClock {
        fn now(&self) -> DateTime<Local> {
            self.now
        }
        fn sleep(&mut self, duration: StdDuration) {
            self.now += Duration::from_std(duration).unwrap();
        }
    }

    /// Hands out a scripted line on the n-th poll.
    #[derive(Default)]
    struct Script {
        polls: usize,
        lines: HashMap<usize, &'static str>,
    }

    impl Script {
        fn on(mut self, poll: usize, line: &'static str) -> Self {
            self.lines.insert(poll, line);
            self
        }
    }

    impl LineInput for Script {
        fn read_line(&mut self) -> Option<String> {
            None
        }
        fn poll_line(&mut self) -> Option<String> {
            self.polls += 1;
            self.lines.get(&self.polls).map(|line| line.to_string())
        }
    }

    #[derive(Default)]
    struct Screen {
        lines: Vec<String>,
        statuses: Vec<String>,
    }

    impl Printer for Screen {
        fn write_line(&mut self, line: &str) -> io::Result<()> {
            self.lines.push(line.to_owned());
            Ok(())
        }
        fn write_status(&mut self, status: &str) -> io::Result<()> {
            self.statuses.push(status.to_owned());
            Ok(())
        }
        fn clear_status(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn runs_every_timer_to_completion() {
        let mut clock = FakeClock::new();
        let start = clock.now;
        let mut screen = Screen::default();
        let outcome = run(&[1, 2], &mut clock, &mut Script::default(), &mut screen).unwrap();

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(clock.now - start, Duration::minutes(3));
        assert_eq!(
            screen.lines,
            vec!["timer 1/2: 1 minutes", "time's up!", "", "timer 2/2: 2 minutes", "time's up!", ""]
        );
        assert_eq!(screen.statuses.first().map(String::as_str), Some("timer 01:00"));
        assert_eq!(screen.statuses.len(), 180);
        assert_eq!(screen.statuses[60], "timer 02:00");
    }

    #[test]
    fn quit_stops_the_run() {
        let mut clock = FakeClock::new();
        let mut screen = Screen::default();
        let mut input = Script::default().on(5, "q\n");
        let outcome = run(&[1, 1], &mut clock, &mut input, &mut screen).unwrap();

        assert_eq!(outcome, RunOutcome::Quit);
        assert_eq!(screen.lines, vec!["timer 1/2: 1 minutes", "quitting."]);
        assert_eq!(screen.statuses.len(), 5);
    }

    #[test]
    fn restart_current_resets_the_deadline() {
        let mut clock = FakeClock::new();
        let start = clock.now;
        let mut screen = Screen::default();
        let mut input = Script::default().on(30, "r");
        run(&[1], &mut clock, &mut input, &mut screen).unwrap();

        assert_eq!(clock.now - start, Duration::seconds(90));
        assert_eq!(
            screen.lines,
            vec!["timer 1/1: 1 minutes", "restarting current timer", "time's up!", ""]
        );
        assert_eq!(screen.statuses[30], "timer 01:00");
    }

    #[test]
    fn restart_all_starts_over() {
        let mut clock = FakeClock::new();
        let mut screen = Screen::default();
        // second timer, ten seconds in
        let mut input = Script::default().on(70, RESTART_ALL);
        let outcome = run(&[1, 1], &mut clock, &mut input, &mut screen).unwrap();

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(
            screen.lines,
            vec![
                "timer 1/2: 1 minutes",
                "time's up!",
                "",
                "timer 2/2: 1 minutes",
                "restarting all timers",
                "timer 1/2: 1 minutes",
                "time's up!",
                "",
                "timer 2/2: 1 minutes",
                "time's up!",
                "",
            ]
        );
    }

    #[test]
    fn unknown_input_and_non_positive_timers() {
        let mut clock = FakeClock::new();
        let start = clock.now;
        let mut screen = Screen::default();
        let mut input = Script::default().on(1, "hello");
        let outcome = run(&[0, -5], &mut clock, &mut input, &mut screen).unwrap();

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(clock.now, start);
        assert!(screen.statuses.is_empty());
        assert_eq!(
            screen.lines,
            vec![
                "timer 1/2: 0 minutes",
                "time's up!",
                "",
                "timer 2/2: -5 minutes",
                "time's up!",
                "",
            ]
        );
    }

    /// Half a line typed but never finished.
    struct Typing(&'static str);

    impl LineInput for Typing {
        fn read_line(&mut self) -> Option<String> {
            None
        }
        fn poll_line(&mut self) -> Option<String> {
            None
        }
        fn pending(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn pending_keys_follow_the_status() {
        let mut clock = FakeClock::new();
        let mut screen = Screen::default();
        run(&[1], &mut clock, &mut Typing("r"), &mut screen).unwrap();

        assert_eq!(screen.statuses[0], "timer 01:00  r");
        assert_eq!(screen.statuses[59], "timer 00:01  r");
    }

    #[test]
    fn unrepresentable_deadline_is_already_over() {
        let now = FakeClock::new().now;
        assert_eq!(deadline_after(now, i64::MAX), now);
        assert_eq!(deadline_after(now, 25), now + Duration::minutes(25));
    }
}
