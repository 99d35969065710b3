//! The canonical six-state test hierarchy:
//!
//! ```text
//! Top
//! └── S0            E -> S211
//!     ├── S1        A -> S1, B -> S11, C -> S2, D -> S0, F -> S211
//!     │   └── S11   G -> S211
//!     └── S2        C -> S1, F -> S11
//!         └── S21   B -> S211, H -> S21 (only while !foo)
//!             └── S211  D -> S21, G -> S0
//! ```
//!
//! This is the hierarchy of the interactive walkthrough, where S11 declares
//! only G. The unit-test variant of the same tree additionally has S11
//! handle H (`h[foo]/foo=0`); that handler is left out here, so H is
//! unaccepted from S11.

#![allow(dead_code)]

use statetree::builder::StateBuilder;
use statetree::core::{Event, EventId, StateGraph, StateId};
use statetree::machine::{HandlerResult, Machine, Transit};
use std::collections::HashMap;

pub const TOP: StateId = StateId(0);
pub const S0: StateId = StateId(1);
pub const S1: StateId = StateId(2);
pub const S11: StateId = StateId(3);
pub const S2: StateId = StateId(4);
pub const S21: StateId = StateId(5);
pub const S211: StateId = StateId(6);

pub const ALL_STATES: [StateId; 7] = [TOP, S0, S1, S11, S2, S21, S211];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Msg {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    /// Declared by nobody.
    Z,
}

impl Msg {
    pub const ALL: [Msg; 9] = [
        Msg::A,
        Msg::B,
        Msg::C,
        Msg::D,
        Msg::E,
        Msg::F,
        Msg::G,
        Msg::H,
        Msg::Z,
    ];
}

impl Event for Msg {
    fn id(&self) -> EventId {
        *self as EventId
    }
}

#[derive(Debug, Default)]
pub struct Trace {
    pub log: Vec<String>,
    pub foo: bool,
    pub balance: HashMap<StateId, i32>,
    pub handled: u32,
}

impl Trace {
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log)
    }
}

fn traced(
    builder: StateBuilder<Trace, Msg>,
    id: StateId,
    name: &'static str,
) -> StateBuilder<Trace, Msg> {
    builder
        .on_entry(move |t: &mut Trace| {
            t.log.push(format!("entry({name})"));
            *t.balance.entry(id).or_default() += 1;
        })
        .on_exit(move |t: &mut Trace| {
            t.log.push(format!("exit({name})"));
            *t.balance.entry(id).or_default() -= 1;
        })
}

fn with_init(builder: StateBuilder<Trace, Msg>, name: &'static str) -> StateBuilder<Trace, Msg> {
    builder.on_init(move |t: &mut Trace| t.log.push(format!("init({name})")))
}

/// Handler transitioning to `target` and logging `tran(source,target)`
/// between the exit and entry phase.
fn tran(
    source: &'static str,
    target: StateId,
    target_name: &'static str,
) -> impl Fn(&mut Transit<'_, Trace, Msg>, &Msg) -> HandlerResult + Send + Sync + 'static {
    move |transit: &mut Transit<'_, Trace, Msg>, _: &Msg| {
        transit.data_mut().handled += 1;
        transit.transition_with(target, |t| {
            t.log.push(format!("tran({source},{target_name})"));
        })
    }
}

pub fn graph() -> StateGraph<Trace, Msg> {
    StateGraph::builder()
        .state(traced(
            StateBuilder::composite(TOP, "Top").default_child(S0),
            TOP,
            "Top",
        ))
        .state(with_init(
            traced(
                StateBuilder::composite(S0, "S0")
                    .parent(TOP)
                    .default_child(S1)
                    .on_event(Msg::E.id(), tran("S0", S211, "S211")),
                S0,
                "S0",
            ),
            "S0",
        ))
        .state(with_init(
            traced(
                StateBuilder::composite(S1, "S1")
                    .parent(S0)
                    .default_child(S11)
                    .on_event(Msg::A.id(), tran("S1", S1, "S1"))
                    .on_event(Msg::B.id(), tran("S1", S11, "S11"))
                    .on_event(Msg::C.id(), tran("S1", S2, "S2"))
                    .on_event(Msg::D.id(), tran("S1", S0, "S0"))
                    .on_event(Msg::F.id(), tran("S1", S211, "S211")),
                S1,
                "S1",
            ),
            "S1",
        ))
        .state(traced(
            StateBuilder::leaf(S11, "S11")
                .parent(S1)
                .on_event(Msg::G.id(), tran("S11", S211, "S211")),
            S11,
            "S11",
        ))
        .state(with_init(
            traced(
                StateBuilder::composite(S2, "S2")
                    .parent(S0)
                    .default_child(S21)
                    .on_event(Msg::C.id(), tran("S2", S1, "S1"))
                    .on_event(Msg::F.id(), tran("S2", S11, "S11")),
                S2,
                "S2",
            ),
            "S2",
        ))
        .state(with_init(
            traced(
                StateBuilder::composite(S21, "S21")
                    .parent(S2)
                    .default_child(S211)
                    .on_event(Msg::B.id(), tran("S21", S211, "S211"))
                    .on_event(Msg::H.id(), |transit, _| {
                        transit.data_mut().handled += 1;
                        if transit.data().foo {
                            return Ok(());
                        }
                        transit.transition_with(S21, |t| {
                            t.log.push("tran(S21,S21)".to_string());
                        })?;
                        transit.data_mut().foo = true;
                        Ok(())
                    }),
                S21,
                "S21",
            ),
            "S21",
        ))
        .state(traced(
            StateBuilder::leaf(S211, "S211")
                .parent(S21)
                .on_event(Msg::D.id(), tran("S211", S21, "S21"))
                .on_event(Msg::G.id(), tran("S211", S0, "S0")),
            S211,
            "S211",
        ))
        .build()
        .expect("reference hierarchy is well formed")
}

/// Started machine over the reference hierarchy with the start-up trace
/// already drained.
pub fn started() -> Machine<Trace, Msg> {
    let mut machine = Machine::new(graph(), Trace::default());
    machine.start().expect("reference hierarchy starts");
    machine.data_mut().take();
    machine
}
