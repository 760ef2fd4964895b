// Entity Models - the canonical Card/Benefit schema
//
// Cards are identified by their canonical English name, benefits by
// (owning card, canonical English title). Generated ids exist only inside
// the store, so the model keeps benefits nested under their card.

pub mod benefit;
pub mod card;

pub use benefit::{Benefit, Frequency};
pub use card::{Card, CardBundle, Region};
