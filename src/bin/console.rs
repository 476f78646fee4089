//! Terminal console for a running taskhub server.
//!
//! Maintains a local mirror of the task collection and re-renders it after
//! every command. Point it at a server with `TASKHUB_URL` (defaults to
//! `http://127.0.0.1:8000`).
//!
//! Commands:
//! - `list` - re-render the current view
//! - `add <title>` - create a task
//! - `done <n>` / `undo <n>` - toggle the n-th visible task
//! - `edit <n> <title>` - rename the n-th visible task
//! - `rm <n>` - delete the n-th visible task
//! - `filter all|active|completed` - switch the view
//! - `clear` - delete all completed tasks
//! - `quit` - exit

use std::io::Write;
use std::sync::Arc;

use taskhub::client::{EmptyState, Filter, HttpTaskApi, TaskMirror};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url =
        std::env::var("TASKHUB_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());

    let api = Arc::new(HttpTaskApi::new(base_url.clone()));
    let mut mirror = TaskMirror::new(api);

    mirror
        .refresh()
        .await
        .map_err(|e| anyhow::anyhow!("Cannot reach {}: {}", base_url, e))?;

    println!("Connected to {}", base_url);
    render(&mirror);

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "quit" | "exit" => break,
            "list" => render(&mirror),
            "add" => {
                match mirror.add(rest).await {
                    Ok(task) => println!("Added \"{}\"", task.title),
                    Err(e) => eprintln!("{}", e),
                }
                render(&mirror);
            }
            "done" | "undo" => {
                if let Some(id) = nth_visible(&mirror, rest) {
                    if let Err(e) = mirror.set_completed(id, command == "done").await {
                        eprintln!("{}", e);
                    }
                }
                render(&mirror);
            }
            "edit" => {
                let (index, title) = match rest.split_once(' ') {
                    Some((i, t)) => (i, t.trim()),
                    None => {
                        eprintln!("Usage: edit <n> <title>");
                        continue;
                    }
                };
                if let Some(id) = nth_visible(&mirror, index) {
                    if let Err(e) = mirror.rename(id, title).await {
                        eprintln!("{}", e);
                    }
                }
                render(&mirror);
            }
            "rm" => {
                if let Some(id) = nth_visible(&mirror, rest) {
                    if let Err(e) = mirror.remove(id).await {
                        eprintln!("{}", e);
                    }
                }
                render(&mirror);
            }
            "filter" => {
                match rest.parse::<Filter>() {
                    Ok(filter) => mirror.set_filter(filter),
                    Err(e) => eprintln!("{}", e),
                }
                render(&mirror);
            }
            "clear" => {
                let removed = mirror.clear_completed().await;
                println!("Cleared {} completed task(s)", removed);
                render(&mirror);
            }
            other => eprintln!("Unknown command: {}", other),
        }
    }

    Ok(())
}

/// Resolve a 1-based index into the currently visible tasks.
fn nth_visible(mirror: &TaskMirror, arg: &str) -> Option<Uuid> {
    let index: usize = match arg.parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("Expected a task number, got \"{}\"", arg);
            return None;
        }
    };

    match mirror.visible().get(index.wrapping_sub(1)) {
        Some(task) => Some(task.id),
        None => {
            eprintln!("No visible task #{}", index);
            None
        }
    }
}

fn render(mirror: &TaskMirror) {
    println!();
    match mirror.empty_state() {
        Some(EmptyState::NoTasks) => println!("  No tasks yet. Add one!"),
        Some(EmptyState::NoneMatchFilter) => {
            println!("  No {} tasks.", mirror.filter().as_str())
        }
        None => {
            for (i, task) in mirror.visible().iter().enumerate() {
                let mark = if task.completed { "x" } else { " " };
                println!("  {:>2}. [{}] {}", i + 1, mark, task.title);
            }
        }
    }

    let counts = mirror.counts();
    println!(
        "  -- {} of {} remaining, showing {}\n",
        counts.remaining,
        counts.total,
        mirror.filter().as_str()
    );
}
