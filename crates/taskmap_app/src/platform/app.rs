use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use taskmap_core::{
    update, AggregationPolicy, BoardConfig, BoardState, FilterMode, Msg, NodeId,
};
use taskmap_engine::{MindMapDocument, ServerConfig, Theme};
use taskmap_logging::{taskmap_info, taskmap_warn};

use super::effects::EffectRunner;
use super::persistence::{load_preferences, Preferences};
use super::render::render;

const TICK_INTERVAL: Duration = Duration::from_millis(50);

const SESSION_HELP: &str = "\
commands:
  toggle ID        toggle a task or a whole branch
  check ID         mark a task (or branch) done
  uncheck ID       mark a task (or branch) open
  filter MODE      all | uncompleted | completed
  cycle            next filter mode
  show             print the current view
  reload           re-read the document from disk
  save             write the document
  help             this text
  quit             save if needed and leave";

pub fn serve(port: u16, root: PathBuf, index: String) -> anyhow::Result<()> {
    let config = ServerConfig { port, root, index };
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(taskmap_engine::serve(config))?;
    Ok(())
}

pub fn print_theme(file: Option<&Path>) -> anyhow::Result<()> {
    let theme = match file {
        Some(path) => Theme::load(path).with_context(|| format!("failed to load theme {path:?}"))?,
        None => Theme::default(),
    };
    println!("{}", theme.to_json()?);
    Ok(())
}

fn preferences(policy: Option<AggregationPolicy>) -> anyhow::Result<(PathBuf, Preferences)> {
    let cwd = std::env::current_dir().context("no current directory")?;
    let mut prefs = load_preferences(&cwd);
    if let Some(policy) = policy {
        prefs.policy = policy;
    }
    Ok((cwd, prefs))
}

fn open_board(path: &Path, policy: AggregationPolicy) -> anyhow::Result<(MindMapDocument, BoardState)> {
    let document = MindMapDocument::load(path).with_context(|| format!("failed to load {path:?}"))?;
    let config = BoardConfig {
        policy,
        ..BoardConfig::default()
    };
    let state = BoardState::new(document.root().clone(), config)?;
    Ok((document, state))
}

pub fn show(
    path: &Path,
    filter: Option<FilterMode>,
    policy: Option<AggregationPolicy>,
) -> anyhow::Result<()> {
    let (_, prefs) = preferences(policy)?;
    let (_, mut state) = open_board(path, prefs.policy)?;
    let filter = filter.unwrap_or(prefs.filter);
    if filter != FilterMode::All {
        let (next, _) = update(state, Msg::FilterSelected(filter));
        state = next;
    }
    print!("{}", render(&state.view()));
    Ok(())
}

pub fn toggle(path: &Path, id: &str, policy: Option<AggregationPolicy>) -> anyhow::Result<()> {
    let (_, prefs) = preferences(policy)?;
    let (document, state) = open_board(path, prefs.policy)?;
    let id = NodeId::new(id);
    // Unknown ids are reported before anything is written.
    state.completion(&id)?;

    let (state, effects) = update(state, Msg::ToggleClicked(id));
    let mut runner = EffectRunner::new(document, None, prefs);
    runner.run(effects);
    if runner.has_unsaved_changes() {
        runner.document.save(path)?;
    }
    print!("{}", render(&state.view()));
    Ok(())
}

enum SessionCommand {
    Board(Msg),
    Show,
    Reload,
    Save,
    Help,
    Quit,
}

fn parse_line(line: &str) -> Result<Option<SessionCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    let need_id = |arg: Option<&str>| {
        arg.map(NodeId::new)
            .ok_or_else(|| format!("{verb} needs a node id"))
    };
    let command = match verb {
        "toggle" => SessionCommand::Board(Msg::ToggleClicked(need_id(arg)?)),
        "check" | "uncheck" => SessionCommand::Board(Msg::SetChecked {
            id: need_id(arg)?,
            checked: verb == "check",
        }),
        "filter" => {
            let mode = arg
                .ok_or_else(|| "filter needs a mode".to_string())?
                .parse::<FilterMode>()
                .map_err(|err| err.to_string())?;
            SessionCommand::Board(Msg::FilterSelected(mode))
        }
        "cycle" => SessionCommand::Board(Msg::CycleFilter),
        "show" => SessionCommand::Show,
        "reload" => SessionCommand::Reload,
        "save" => SessionCommand::Save,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => return Err(format!("unknown command {other:?} (try help)")),
    };
    Ok(Some(command))
}

struct Session {
    path: PathBuf,
    state: BoardState,
    runner: EffectRunner,
    started: Instant,
}

impl Session {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);

        let requested = self.runner.take_render_request();
        let dirty = self.state.consume_dirty();
        if requested || dirty {
            self.print_view();
        }
    }

    fn print_view(&mut self) {
        print!("{}", render(&self.state.render()));
    }

    fn reload(&mut self) -> anyhow::Result<()> {
        let document = MindMapDocument::load(&self.path)?;
        let root = document.root().clone();
        self.runner.document = document;
        self.runner.mark_saved();
        let at_ms = self.now_ms();
        self.dispatch(Msg::DocumentReplaced { root, at_ms });
        Ok(())
    }

    fn save(&mut self) -> anyhow::Result<()> {
        self.runner.document.save(&self.path)?;
        self.runner.mark_saved();
        println!(">> saved {}", self.path.display());
        Ok(())
    }
}

pub fn run_session(path: &Path, policy: Option<AggregationPolicy>) -> anyhow::Result<()> {
    let (cwd, prefs) = preferences(policy)?;
    let (document, state) = open_board(path, prefs.policy)?;
    let mut session = Session {
        path: path.to_path_buf(),
        state,
        runner: EffectRunner::new(document, Some(cwd), prefs),
        started: Instant::now(),
    };
    taskmap_info!(
        "Session started on {:?} with policy {}",
        path,
        prefs.policy.as_str()
    );

    if prefs.filter == FilterMode::All {
        session.print_view();
    } else {
        session.dispatch(Msg::FilterSelected(prefs.filter));
    }
    println!("{SESSION_HELP}");

    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        let line = match line_rx.recv_timeout(TICK_INTERVAL) {
            Ok(line) => line,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let now_ms = session.now_ms();
                session.dispatch(Msg::Tick { now_ms });
                continue;
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!(">> {message}");
                continue;
            }
        };
        match command {
            SessionCommand::Board(msg) => session.dispatch(msg),
            SessionCommand::Show => session.print_view(),
            SessionCommand::Reload => {
                if let Err(err) = session.reload() {
                    taskmap_warn!("Reload failed: {:#}", err);
                    println!(">> reload failed: {err:#}");
                }
            }
            SessionCommand::Save => session.save()?,
            SessionCommand::Help => println!("{SESSION_HELP}"),
            SessionCommand::Quit => break,
        }
    }

    if session.runner.has_unsaved_changes() {
        session.save()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_commands() {
        assert!(matches!(
            parse_line("toggle a1"),
            Ok(Some(SessionCommand::Board(Msg::ToggleClicked(ref id)))) if id.as_str() == "a1"
        ));
        assert!(matches!(
            parse_line("uncheck b"),
            Ok(Some(SessionCommand::Board(Msg::SetChecked { checked: false, .. })))
        ));
        assert!(matches!(
            parse_line("filter Completed"),
            Ok(Some(SessionCommand::Board(Msg::FilterSelected(FilterMode::Completed))))
        ));
        assert!(matches!(parse_line("   "), Ok(None)));
        assert!(parse_line("toggle").is_err());
        assert!(parse_line("filter someday").is_err());
        assert!(parse_line("dance").is_err());
    }
}
