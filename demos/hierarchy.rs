//! Hierarchy Walkthrough
//!
//! Drives the classic six-state hierarchy (Top, S0, S1, S11, S2, S21,
//! S211) from the keyboard and prints every entry, exit and init action.
//!
//! Key concepts:
//! - Handlers inherited from enclosing states
//! - Exit and entry sequences derived from the tree
//! - Init cascades into default children
//! - A guarded self transition (event `h`)
//!
//! Run with: cargo run --example hierarchy
//! Type letters `a` to `h`, one per line. `q` quits.

use statetree::builder::StateBuilder;
use statetree::core::{Event, EventId, StateGraph, StateId};
use statetree::machine::{HandlerResult, Machine, Transit};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

const TOP: StateId = StateId(0);
const S0: StateId = StateId(1);
const S1: StateId = StateId(2);
const S11: StateId = StateId(3);
const S2: StateId = StateId(4);
const S21: StateId = StateId(5);
const S211: StateId = StateId(6);

/// A key press, `a` through `h`.
#[derive(Debug, Clone, Copy)]
struct Key(u8);

impl Event for Key {
    fn id(&self) -> EventId {
        EventId::from(self.0 - b'a')
    }
}

#[derive(Default)]
struct Console {
    foo: bool,
}

fn state(
    id: StateId,
    name: &'static str,
    parent: Option<StateId>,
    default_child: Option<StateId>,
) -> StateBuilder<Console, Key> {
    let mut builder = match default_child {
        Some(child) => StateBuilder::composite(id, name)
            .default_child(child)
            .on_init(move |_: &mut Console| print!("{name}-INIT;")),
        None => StateBuilder::leaf(id, name),
    };
    if let Some(parent) = parent {
        builder = builder.parent(parent);
    }
    builder
        .on_entry(move |_: &mut Console| print!("{name}-ENTRY;"))
        .on_exit(move |_: &mut Console| print!("{name}-EXIT;"))
}

fn go(
    target: StateId,
) -> impl Fn(&mut Transit<'_, Console, Key>, &Key) -> HandlerResult + Send + Sync + 'static {
    move |transit: &mut Transit<'_, Console, Key>, key: &Key| {
        let from = transit.graph().name(transit.source()).to_string();
        let key = char::from(key.0).to_ascii_uppercase();
        transit.transition_with(target, |_| print!("{from}-{key};"))
    }
}

fn key(letter: char) -> EventId {
    Key(letter as u8).id()
}

fn graph() -> StateGraph<Console, Key> {
    StateGraph::builder()
        .state(StateBuilder::composite(TOP, "TOP").default_child(S0))
        .state(state(S0, "S0", Some(TOP), Some(S1)).on_event(key('e'), go(S211)))
        .state(
            state(S1, "S1", Some(S0), Some(S11))
                .on_event(key('a'), go(S1))
                .on_event(key('b'), go(S11))
                .on_event(key('c'), go(S2))
                .on_event(key('d'), go(S0))
                .on_event(key('f'), go(S211)),
        )
        .state(state(S11, "S11", Some(S1), None).on_event(key('g'), go(S211)))
        .state(
            state(S2, "S2", Some(S0), Some(S21))
                .on_event(key('c'), go(S1))
                .on_event(key('f'), go(S11)),
        )
        .state(
            state(S21, "S21", Some(S2), Some(S211))
                .on_event(key('b'), go(S211))
                .on_event(key('h'), |transit, _| {
                    if transit.data().foo {
                        return Ok(());
                    }
                    transit.transition_with(S21, |console| {
                        print!("S21-H;");
                        console.foo = true;
                    })
                }),
        )
        .state(
            state(S211, "S211", Some(S21), None)
                .on_event(key('d'), go(S21))
                .on_event(key('g'), go(S0)),
        )
        .build()
        .expect("demo hierarchy is well formed")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut machine = Machine::builder(graph())
        .data(Console::default())
        .on_unhandled(|_: &mut Console, key: &Key| print!("({} ignored)", char::from(key.0)))
        .build()?;

    machine.start()?;
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("[{}] event<-", machine.graph().name(machine.current_state_id().unwrap_or(TOP)));
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let Some(letter) = line.trim().chars().next() else {
            continue;
        };
        match letter {
            'q' => break,
            'a'..='h' => {
                machine.dispatch(&Key(letter as u8))?;
                println!();
            }
            other => println!("no event for {other:?}"),
        }
    }
    Ok(())
}
