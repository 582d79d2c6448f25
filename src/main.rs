/*!
 * Partition Simulator - Main Entry Point
 *
 * Line-oriented driver for the allocation engine:
 * - Reads one command per line from stdin
 * - Prints one JSON object per command on stdout
 * - Restores from and saves to PARTSIM_STATE_PATH when set
 */

use miette::IntoDiagnostic;
use partition_sim::monitoring::span_command;
use partition_sim::process::validation::{parse_priority, parse_sizes};
use partition_sim::{
    init_tracing, AllocationEngine, DefragStrategy, EngineConfig, Kb, Placement, Priority,
    ProcessId, SerializableError, SimError, StateStore,
};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

const HELP: &str = "alloc <size>... <priority> [first|best|worst] | free <id> | suspend <id> | \
resume <id> | terminate <id> | rename <id> <name> | age | defrag [coalesce|shift] | \
search <query> | stats | blocks | ps | save | quit";

/// Parsed input line
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Alloc {
        sizes: Vec<Kb>,
        priority: Priority,
        placement: Option<Placement>,
    },
    Free(ProcessId),
    Suspend(ProcessId),
    Resume(ProcessId),
    Terminate(ProcessId),
    Rename(ProcessId, String),
    Age,
    Defrag(Option<DefragStrategy>),
    Search(String),
    Stats,
    Blocks,
    Ps,
    Save,
    Help,
    Quit,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Alloc { .. } => "alloc",
            Command::Free(_) => "free",
            Command::Suspend(_) => "suspend",
            Command::Resume(_) => "resume",
            Command::Terminate(_) => "terminate",
            Command::Rename(..) => "rename",
            Command::Age => "age",
            Command::Defrag(_) => "defrag",
            Command::Search(_) => "search",
            Command::Stats => "stats",
            Command::Blocks => "blocks",
            Command::Ps => "ps",
            Command::Save => "save",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }
}

fn parse_pid(raw: Option<&str>) -> Result<ProcessId, SimError> {
    let raw = raw.ok_or("missing process id")?;
    raw.trim_start_matches(['P', 'p'])
        .parse()
        .map_err(|_| SimError::from(format!("'{}' is not a process id", raw)))
}

fn parse_command(line: &str) -> Result<Command, SimError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("empty command".into());
    };
    let rest: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "alloc" | "allocate" => {
            let mut args = rest.as_slice();
            let placement = match args.last() {
                Some(last) if last.parse::<i64>().is_err() => {
                    let placement = last.parse::<Placement>()?;
                    args = &args[..args.len() - 1];
                    Some(placement)
                }
                _ => None,
            };
            let Some((priority, sizes)) = args.split_last().filter(|(_, sizes)| !sizes.is_empty())
            else {
                return Err("usage: alloc <size>... <priority> [first|best|worst]".into());
            };
            Command::Alloc {
                sizes: parse_sizes(&sizes.join(" "))?,
                priority: parse_priority(priority)?,
                placement,
            }
        }
        "free" | "dealloc" => Command::Free(parse_pid(rest.first().copied())?),
        "suspend" => Command::Suspend(parse_pid(rest.first().copied())?),
        "resume" => Command::Resume(parse_pid(rest.first().copied())?),
        "terminate" | "kill" => Command::Terminate(parse_pid(rest.first().copied())?),
        "rename" => {
            let pid = parse_pid(rest.first().copied())?;
            Command::Rename(pid, rest.get(1..).unwrap_or_default().join(" "))
        }
        "age" => Command::Age,
        "defrag" => Command::Defrag(rest.first().map(|s| s.parse()).transpose()?),
        "search" => Command::Search(rest.join(" ")),
        "stats" => Command::Stats,
        "blocks" => Command::Blocks,
        "ps" => Command::Ps,
        "save" => Command::Save,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}'", other).into()),
    };
    Ok(command)
}

fn execute(
    engine: &mut AllocationEngine,
    store: Option<&StateStore>,
    command: &Command,
) -> Result<Value, SimError> {
    let value = match command {
        Command::Alloc {
            sizes,
            priority,
            placement,
        } => {
            let placement = placement.unwrap_or(engine.config().placement);
            if let [size] = sizes.as_slice() {
                json!({ "pid": engine.allocate_with(placement, *size, *priority)? })
            } else {
                let results: Vec<Value> = engine
                    .allocate_batch(placement, sizes, *priority)
                    .into_iter()
                    .map(|result| match result {
                        Ok(pid) => json!({ "pid": pid }),
                        Err(err) => json!({ "error": SerializableError::from(SimError::from(err)) }),
                    })
                    .collect();
                json!({ "results": results })
            }
        }
        Command::Free(pid) => {
            engine.deallocate(*pid)?;
            json!({ "freed": pid })
        }
        Command::Suspend(pid) => {
            engine.suspend(*pid)?;
            json!({ "suspended": pid })
        }
        Command::Resume(pid) => {
            engine.resume(*pid)?;
            json!({ "resumed": pid })
        }
        Command::Terminate(pid) => {
            let elapsed = engine.terminate(*pid)?;
            json!({ "terminated": pid, "elapsed_ms": elapsed.as_millis() as u64 })
        }
        Command::Rename(pid, name) => {
            engine.rename(*pid, name)?;
            json!({ "renamed": pid, "name": name.trim() })
        }
        Command::Age => json!({ "changed": engine.apply_aging() }),
        Command::Defrag(strategy) => {
            let report = match strategy {
                Some(strategy) => engine.defragment(*strategy),
                None => engine.defragment_default(),
            };
            json!(report)
        }
        Command::Search(query) => json!(engine.search(query)),
        Command::Stats => {
            let stats = engine.stats();
            json!({
                "stats": stats,
                "pressure": stats.memory_pressure(),
                "fragmentation": engine.fragmentation(),
            })
        }
        Command::Blocks => json!(engine.block_usage()),
        Command::Ps => json!({
            "active": engine.processes(),
            "terminated": engine.terminated(),
        }),
        Command::Save => {
            let store = store.ok_or("no state path configured (set PARTSIM_STATE_PATH)")?;
            store.save(&engine.snapshot())?;
            json!({ "saved": store.path().display().to_string() })
        }
        Command::Help => json!({ "commands": HELP }),
        Command::Quit => json!({ "bye": true }),
    };
    Ok(value)
}

fn open_engine(config: EngineConfig, store: Option<&StateStore>) -> Result<AllocationEngine, SimError> {
    if let Some(snapshot) = store.map(StateStore::load).transpose()?.flatten() {
        return Ok(AllocationEngine::restore(config, snapshot)?);
    }
    Ok(AllocationEngine::new(config)?)
}

fn main() -> miette::Result<()> {
    init_tracing();

    let config = EngineConfig::from_env().map_err(SimError::from)?;
    let store = config.state_path.clone().map(StateStore::new);
    let mut engine = open_engine(config, store.as_ref())?;
    info!(
        blocks = engine.blocks().len(),
        processes = engine.processes().len(),
        "Simulator ready"
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.into_diagnostic()?;
        if line.trim().is_empty() {
            continue;
        }

        let (name, outcome) = match parse_command(&line) {
            Ok(command) => {
                let span = span_command(command.name());
                let outcome = span.in_scope(|| execute(&mut engine, store.as_ref(), &command));
                match &outcome {
                    Ok(_) => span.success(),
                    Err(err) => span.error(&err.to_string()),
                }
                (command.name(), outcome.map(|value| (value, command == Command::Quit)))
            }
            Err(err) => ("invalid", Err(err)),
        };

        let (output, quit) = match outcome {
            Ok((value, quit)) => (json!({ "ok": true, "command": name, "result": value }), quit),
            Err(err) => {
                warn!(command = name, "{}", err);
                (
                    json!({ "ok": false, "command": name, "error": SerializableError::from(&err) }),
                    false,
                )
            }
        };
        writeln!(stdout, "{}", output).into_diagnostic()?;
        stdout.flush().into_diagnostic()?;

        if quit {
            break;
        }
    }

    if let Some(store) = &store {
        store.save(&engine.snapshot()).map_err(SimError::from)?;
    }
    info!("Simulator stopped");
    Ok(())
}
