//! Authorization: a declarative capability table plus an ownership guard
//! consulted by every handler before it touches a row.

pub mod guard;
pub mod lookup;
pub mod policy;

pub use guard::{Guard, OwnerLookup, Target};
pub use lookup::SeaOrmOwnerLookup;
pub use policy::{rule_for, Action, Resource, Rule};
