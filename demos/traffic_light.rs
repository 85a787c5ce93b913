//! Traffic Light State Machine
//!
//! This example drives the classic traffic light through a chaining state
//! and a fallback, then prints the machine as Graphviz DOT and as a JSON
//! blueprint.
//!
//! Key concepts:
//! - Keyed transitions between named states
//! - An on-event hook that fires a follow-up event
//! - A state fallback catching unmapped events
//! - Transition history through a listener
//!
//! Run with: RUST_LOG=statewise=debug cargo run --example traffic_light

use statewise::blueprint::Blueprint;
use statewise::{event_keys, State, StateMachine, TransitionLog};
use tracing_subscriber::EnvFilter;

event_keys! {
    enum Signal {
        Tick,
        Continue,
        Honk,
    }
}

fn main() -> statewise::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let mut machine: StateMachine<Signal> = StateMachine::new("traffic");
    let green = machine.add_state(State::new("GREEN"));
    let yellow = machine.add_state(State::new("YELLOW"));
    let bounce = machine.add_state(State::new("BOUNCE").on_event(|ctx| {
        ctx.fire(Signal::Continue)?;
        Ok(())
    }));
    let red = machine.add_state(State::new("RED").on_enter(|ctx| {
        println!("  (stop: left {} on {})", ctx.from_state(), ctx.key());
        Ok(())
    }));
    let exit = machine.add_state(State::new("EXIT"));

    machine.state_mut(green).add_transition(Signal::Tick, yellow);
    machine
        .state_mut(yellow)
        .add_transition(Signal::Tick, bounce)
        .set_fallback_transition(exit);
    machine.state_mut(bounce).add_transition(Signal::Continue, red);
    machine.state_mut(red).add_transition(Signal::Tick, green);

    let log = TransitionLog::new();
    log.attach(&machine);

    let mut light = machine.instance(green);
    println!("Initial state: {}\n", light.current_state());

    println!("Firing TICK x3:");
    for _ in 0..3 {
        light.fire(Signal::Tick)?;
        println!("  now {}", light.current_state());
    }

    match light.fire(Signal::Honk) {
        Ok(()) => println!("  HONK moved to {}", light.current_state()),
        Err(err) => println!("  HONK rejected: {err}"),
    }

    light.fire(Signal::Tick)?;
    light.fire(Signal::Honk)?;
    println!("  HONK from YELLOW fell back to {}\n", light.current_state());

    println!("Path: {}\n", log.path().join(" -> "));

    println!("DOT:\n{}", machine.render_with_current(light.current_state_id()));

    println!("Blueprint:\n{}", Blueprint::from_machine(&machine).to_json_pretty()?);

    println!("\n=== Example Complete ===");
    Ok(())
}
