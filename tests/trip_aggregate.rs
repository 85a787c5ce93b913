//! A trip-booking aggregate wrapping a machine with command events.
//!
//! The aggregate keeps its state as a name and rebuilds an instance for every
//! command, committing the new name only when the whole fire succeeds.

use parking_lot::Mutex;
use statewise::{event_keys, Eventer, FsmError, Hook, State, StateMachine};
use std::error::Error as _;
use std::sync::Arc;
use thiserror::Error;

event_keys! {
    enum TripEvent {
        Book,
        Complete,
        Cancel,
        Pay,
    }
}

#[derive(Debug, Error)]
#[error("Invalid amount {0}, it needs to be an even amount")]
struct PaymentDeclined(u32);

trait PayService: Send + Sync {
    fn pay(&self, amount: u32) -> Result<(), PaymentDeclined>;
}

struct HealthyPayService;

impl PayService for HealthyPayService {
    fn pay(&self, _amount: u32) -> Result<(), PaymentDeclined> {
        Ok(())
    }
}

struct FaultyPayService;

impl PayService for FaultyPayService {
    fn pay(&self, amount: u32) -> Result<(), PaymentDeclined> {
        Err(PaymentDeclined(amount))
    }
}

#[derive(Clone)]
enum Command {
    Book { id: String },
    Complete,
    Cancel { payments: Arc<dyn PayService> },
    Pay { amount: u32, payments: Arc<dyn PayService> },
}

impl Eventer<TripEvent> for Command {
    fn kind(&self) -> TripEvent {
        match self {
            Self::Book { .. } => TripEvent::Book,
            Self::Complete => TripEvent::Complete,
            Self::Cancel { .. } => TripEvent::Cancel,
            Self::Pay { .. } => TripEvent::Pay,
        }
    }
}

#[derive(Default)]
struct Ledger {
    book_id: String,
    cancelled: bool,
    fare: u32,
}

type TripState = State<TripEvent, Command>;

struct Trip {
    machine: StateMachine<TripEvent, Command>,
    ledger: Arc<Mutex<Ledger>>,
    state: String,
}

impl Trip {
    fn new() -> Self {
        let ledger = Arc::new(Mutex::new(Ledger::default()));
        let mut machine = StateMachine::new("trip");

        let created = machine.add_state(TripState::new("created"));
        let booked = machine.add_state(TripState::new("booked").on_enter({
            let ledger = ledger.clone();
            move |ctx| {
                let mut ledger = ledger.lock();
                if !ledger.book_id.is_empty() {
                    return Ok(());
                }
                let Some(Command::Book { id }) = ctx.data() else {
                    return Err("booked entered without a book command".into());
                };
                ledger.book_id = id.clone();
                Ok(())
            }
        }));
        let completed = machine.add_state(TripState::new("completed"));
        let cancelled = machine.add_state(TripState::new("cancelled").on_event({
            let ledger = ledger.clone();
            move |ctx| {
                ledger.lock().cancelled = true;
                let Some(Command::Cancel { payments }) = ctx.data() else {
                    return Err("cancelled reached without a cancel command".into());
                };
                let payments = Arc::clone(payments);
                ctx.fire_with(TripEvent::Pay, Command::Pay { amount: 2, payments })?;
                Ok(())
            }
        }));
        let paid = machine.add_state(TripState::new("paid").on_enter({
            let ledger = ledger.clone();
            move |ctx| {
                if ledger.lock().fare != 0 {
                    return Ok(());
                }
                let Some(Command::Pay { amount, payments }) = ctx.data() else {
                    return Err("paid entered without a pay command".into());
                };
                payments.pay(*amount)?;
                ledger.lock().fare = *amount;
                Ok(())
            }
        }));

        machine.state_mut(created).add_transition(TripEvent::Book, booked);
        machine
            .state_mut(booked)
            .add_transition(TripEvent::Complete, completed)
            .add_transition(TripEvent::Cancel, cancelled);
        machine.state_mut(completed).add_transition(TripEvent::Pay, paid);
        machine.state_mut(cancelled).add_transition(TripEvent::Pay, paid);

        Self {
            machine,
            ledger,
            state: "created".to_string(),
        }
    }

    fn book(&mut self, id: &str) -> statewise::Result<()> {
        self.fire(Command::Book { id: id.to_string() })
    }

    fn complete(&mut self) -> statewise::Result<()> {
        self.fire(Command::Complete)
    }

    fn cancel(&mut self, payments: Arc<dyn PayService>) -> statewise::Result<()> {
        self.fire(Command::Cancel { payments })
    }

    fn pay(&mut self, amount: u32, payments: Arc<dyn PayService>) -> statewise::Result<()> {
        self.fire(Command::Pay { amount, payments })
    }

    fn fire(&mut self, command: Command) -> statewise::Result<()> {
        let mut instance = self.machine.instance_from_name(&self.state)?;
        instance.fire_command(command)?;
        self.state = instance.current_state().name().to_string();
        Ok(())
    }
}

fn assert_declined(err: &FsmError, amount: u32) {
    match err {
        FsmError::Callback { state, hook, .. } => {
            assert_eq!(state, "paid");
            assert_eq!(*hook, Hook::Enter);
        }
        other => panic!("Expected Callback error, got {other:?}"),
    }
    let declined = err
        .source()
        .and_then(|source| source.downcast_ref::<PaymentDeclined>())
        .expect("payment error is the source");
    assert_eq!(declined.0, amount);
}

#[test]
fn complete_trip_success() {
    let mut trip = Trip::new();

    trip.book("abc123").unwrap();
    trip.complete().unwrap();
    trip.pay(124, Arc::new(HealthyPayService)).unwrap();

    let ledger = trip.ledger.lock();
    assert_eq!(ledger.book_id, "abc123");
    assert_eq!(ledger.fare, 124);
    assert_eq!(trip.state, "paid");
}

#[test]
fn complete_trip_failure() {
    let mut trip = Trip::new();

    trip.book("abc123").unwrap();
    trip.complete().unwrap();
    let err = trip.pay(123, Arc::new(FaultyPayService)).unwrap_err();

    assert_declined(&err, 123);
    let ledger = trip.ledger.lock();
    assert_eq!(ledger.book_id, "abc123");
    assert_eq!(ledger.fare, 0);
    assert_eq!(trip.state, "completed");
}

#[test]
fn cancel_trip_success() {
    let mut trip = Trip::new();

    trip.book("abc123").unwrap();
    trip.cancel(Arc::new(HealthyPayService)).unwrap();

    let ledger = trip.ledger.lock();
    assert_eq!(ledger.book_id, "abc123");
    assert!(ledger.cancelled);
    assert_eq!(ledger.fare, 2);
    assert_eq!(trip.state, "paid");
}

#[test]
fn cancel_trip_failure() {
    let mut trip = Trip::new();

    trip.book("abc123").unwrap();
    let err = trip.cancel(Arc::new(FaultyPayService)).unwrap_err();

    assert_declined(&err, 2);
    let ledger = trip.ledger.lock();
    assert_eq!(ledger.book_id, "abc123");
    assert!(ledger.cancelled);
    assert_eq!(ledger.fare, 0);
    assert_eq!(trip.state, "booked");
}

#[test]
fn commands_out_of_order_are_rejected() {
    let mut trip = Trip::new();

    let err = trip.complete().unwrap_err();

    assert!(matches!(
        err,
        FsmError::TransitionNotFound { ref state, ref event } if state == "created" && event == "Complete"
    ));
    assert_eq!(trip.state, "created");
}
