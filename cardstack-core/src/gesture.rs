//! Swipe gesture interpreter for the two-card stack.
//!
//! The interpreter is a pure transition function over [`GestureState`]:
//! touch and pointer handlers feed it [`GestureEvent`]s and a separate
//! [`render`] step maps the resulting state to presentation.
//!
//! Only the position at gesture end matters. The stack does not follow the
//! finger while dragging.
//!
//! ```
//! use cardstack_core::{CardSide, CardStack};
//!
//! let mut stack = CardStack::new();
//! stack.on_gesture_start(200.0);
//! stack.on_gesture_move(120.0);
//! stack.on_gesture_end();
//! assert_eq!(stack.current(), CardSide::Back);
//! ```

use crate::models::CardSide;

/// Horizontal distance a drag must exceed to flip the stack.
pub const SWIPE_THRESHOLD: f64 = 50.0;

/// Tracking state for a single horizontal drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureState {
    pub start_x: f64,
    pub current_x: f64,
    pub is_dragging: bool,
    pub current: CardSide,
}

/// Input events understood by the interpreter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Touch start or pointer down at `x`.
    Start(f64),
    /// Touch or pointer move to `x`.
    Move(f64),
    /// Touch end or pointer up.
    End,
    /// Pointer left the stack mid-drag. Treated exactly like `End`.
    Cancel,
    /// Direct activation of an index indicator.
    Select(CardSide),
}

/// Applies one event and returns the next state.
pub fn apply(state: GestureState, event: GestureEvent) -> GestureState {
    match event {
        GestureEvent::Start(x) => GestureState {
            start_x: x,
            current_x: x,
            is_dragging: true,
            ..state
        },
        GestureEvent::Move(x) if state.is_dragging => GestureState {
            current_x: x,
            ..state
        },
        GestureEvent::Move(_) => state,
        GestureEvent::End | GestureEvent::Cancel => end_gesture(state),
        GestureEvent::Select(side) => go_to_card(state, side),
    }
}

fn end_gesture(state: GestureState) -> GestureState {
    if !state.is_dragging {
        return state;
    }

    let released = GestureState {
        is_dragging: false,
        ..state
    };
    let diff = state.current_x - state.start_x;

    if diff > SWIPE_THRESHOLD && state.current.index() > 0 {
        go_to_card(released, CardSide::Front)
    } else if diff < -SWIPE_THRESHOLD && state.current.index() < 1 {
        go_to_card(released, CardSide::Back)
    } else {
        released
    }
}

fn go_to_card(state: GestureState, side: CardSide) -> GestureState {
    GestureState {
        current: side,
        ..state
    }
}

/// Whether a card is shown in the foreground or stacked below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPlacement {
    Active,
    Behind,
}

/// Presentation of the stack for a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackView {
    pub front: CardPlacement,
    pub back: CardPlacement,
    /// One slot per card; exactly one is lit.
    pub indicators: [bool; 2],
}

impl StackView {
    pub fn placement(&self, side: CardSide) -> CardPlacement {
        match side {
            CardSide::Front => self.front,
            CardSide::Back => self.back,
        }
    }

    pub fn active(&self) -> CardSide {
        if self.front == CardPlacement::Active {
            CardSide::Front
        } else {
            CardSide::Back
        }
    }
}

pub fn render(state: &GestureState) -> StackView {
    let (front, back) = match state.current {
        CardSide::Front => (CardPlacement::Active, CardPlacement::Behind),
        CardSide::Back => (CardPlacement::Behind, CardPlacement::Active),
    };

    let mut indicators = [false; 2];
    indicators[state.current.index()] = true;

    StackView {
        front,
        back,
        indicators,
    }
}

/// A card stack instance owning its gesture state.
#[derive(Debug, Clone, Default)]
pub struct CardStack {
    state: GestureState,
}

impl CardStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stack showing `side`.
    pub fn showing(side: CardSide) -> Self {
        Self {
            state: GestureState {
                current: side,
                ..GestureState::default()
            },
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn current(&self) -> CardSide {
        self.state.current
    }

    pub fn handle(&mut self, event: GestureEvent) {
        self.state = apply(self.state, event);
    }

    pub fn on_gesture_start(&mut self, x: f64) {
        self.handle(GestureEvent::Start(x));
    }

    pub fn on_gesture_move(&mut self, x: f64) {
        self.handle(GestureEvent::Move(x));
    }

    pub fn on_gesture_end(&mut self) {
        self.handle(GestureEvent::End);
    }

    pub fn go_to_card(&mut self, side: CardSide) {
        self.handle(GestureEvent::Select(side));
    }

    /// Runs a complete drag of `dx` starting at x = 0.
    pub fn swipe(&mut self, dx: f64) {
        self.on_gesture_start(0.0);
        self.on_gesture_move(dx);
        self.on_gesture_end();
    }

    pub fn view(&self) -> StackView {
        render(&self.state)
    }
}
