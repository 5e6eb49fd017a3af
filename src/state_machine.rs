//! Send-cycle state machine
//!
//! Pure state transitions: events go in, a new state and a list of effects
//! come out. The runtime executes the effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::Event;
pub use state::{ConvState, PendingId};
pub use transition::{transition, TransitionError};
