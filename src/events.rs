use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::RateType;

/// notable moments in a balance simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    SimulationStarted {
        principal: Money,
        rate: Rate,
        rate_type: RateType,
        date: NaiveDate,
    },
    RateChanged {
        old_rate: Rate,
        new_rate: Rate,
        rate_type: RateType,
        date: NaiveDate,
    },
    PaymentApplied {
        amount: Money,
        balance_after: Money,
        date: NaiveDate,
    },
    /// payment larger than the outstanding balance
    OverpaymentAbsorbed {
        excess: Money,
        date: NaiveDate,
    },
    LoanPaidOff {
        total_interest: Money,
        date: NaiveDate,
    },
    TenureEnded {
        outstanding_balance: Money,
        date: NaiveDate,
    },
    /// payment dated after payoff or past the tenure horizon
    PaymentIgnored {
        amount: Money,
        date: NaiveDate,
    },
}

impl Event {
    pub fn date(&self) -> NaiveDate {
        match self {
            Event::SimulationStarted { date, .. }
            | Event::RateChanged { date, .. }
            | Event::PaymentApplied { date, .. }
            | Event::OverpaymentAbsorbed { date, .. }
            | Event::LoanPaidOff { date, .. }
            | Event::TenureEnded { date, .. }
            | Event::PaymentIgnored { date, .. } => *date,
        }
    }
}

/// event store for collecting events during a run
#[derive(Debug, Default, Clone)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        log::debug!("{:?}", event);
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
