//! Interactive dashboard loop.
//!
//! Owns one `Dashboard` for the lifetime of the run: completion marks and
//! the burnout timer live here and are gone when the loop exits. Every
//! command runs the burnout check first, so a session that crossed the
//! two-hour threshold is stopped and reported before anything else happens.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::NaiveDate;

use services::Dashboard;

const HELP: &str = "\
commands:
  day [YYYY-MM-DD]   show (and switch to) a day's tasks
  done <n>           mark task n of the current day done
  undo <n>           clear the done mark on task n
  progress           completion percentages, overall and per subject
  start              start the study timer
  stop               stop the study timer
  status             subjects, tasks, studied time, timer state
  help               this text
  quit               exit";

pub fn run(mut dash: Dashboard) -> Result<()> {
    let mut current = dash.today();
    println!("{} subjects, {} tasks scheduled. `help` lists commands.",
        dash.summary().subject_count,
        dash.summary().task_count,
    );
    print_day(&dash, current);

    let stdin = io::stdin();
    loop {
        print!("planner> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        if let Some(warning) = dash.burnout_check() {
            println!("{warning}");
        }

        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let arg = words.next();

        match command {
            "day" => {
                match arg.map(|a| a.parse::<NaiveDate>()) {
                    None => print_day(&dash, current),
                    Some(Ok(date)) => {
                        current = date;
                        print_day(&dash, current);
                    }
                    Some(Err(_)) => println!("expected a date like 2026-09-01"),
                }
            }
            "done" | "undo" => {
                let want_done = command == "done";
                match arg.and_then(|n| n.parse::<usize>().ok()) {
                    Some(n) => mark(&mut dash, current, n, want_done),
                    None => println!("usage: {command} <task number>"),
                }
            }
            "progress" => print_progress(&dash),
            "start" => match dash.start_studying() {
                Ok(()) => println!("study timer started"),
                Err(err) => println!("{err}"),
            },
            "stop" => match dash.stop_studying() {
                Ok(secs) => println!("studied for {}", format_secs(secs)),
                Err(err) => println!("{err}"),
            },
            "status" => print_status(&dash),
            "help" => println!("{HELP}"),
            "quit" | "exit" => break,
            other => println!("unknown command `{other}`, try `help`"),
        }
    }

    Ok(())
}

fn print_day(dash: &Dashboard, date: NaiveDate) {
    let view = dash.day_view(date);
    if view.is_empty() {
        println!("{date}: no tasks");
        return;
    }
    println!("{date}");
    for (index, entry) in view.entries.iter().enumerate() {
        let mut badges = String::new();
        if entry.done {
            badges.push_str(" [done]");
        }
        if entry.flags.warn {
            badges.push_str(" [exam tomorrow]");
        }
        if entry.flags.missed {
            badges.push_str(" [missed]");
        }
        println!(
            "  {}. {:<20} {:>5.2}h{}",
            index + 1,
            entry.subject,
            entry.hours,
            badges
        );
    }
}

fn mark(dash: &mut Dashboard, date: NaiveDate, number: usize, want_done: bool) {
    let view = dash.day_view(date);
    let Some(entry) = number.checked_sub(1).and_then(|i| view.entries.get(i)) else {
        println!("no task {number} on {date}");
        return;
    };
    if entry.done == want_done {
        let state = if want_done { "already done" } else { "not done" };
        println!("{} is {state}", entry.subject);
        return;
    }
    dash.toggle_task(entry.key.clone());
    let verb = if want_done { "done" } else { "not done" };
    println!("{} on {date} marked {verb}", entry.subject);
}

fn print_progress(dash: &Dashboard) {
    let report = dash.progress();
    println!(
        "overall: {}% ({}/{} tasks)",
        report.overall_percent, report.done, report.total
    );
    for subject in &report.per_subject {
        println!(
            "  {:<20} {:>3}% ({}/{})",
            subject.name, subject.percent, subject.done, subject.total
        );
    }
}

fn print_status(dash: &Dashboard) {
    let summary = dash.summary();
    println!(
        "{} subjects, {} tasks, studied {}",
        summary.subject_count,
        summary.task_count,
        format_secs(summary.studied_secs)
    );
    if dash.is_studying() {
        println!("study timer running");
    } else {
        println!("study timer stopped");
    }
}

fn format_secs(secs: u64) -> String {
    format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
}
