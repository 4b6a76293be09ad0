//! Chaos game representation.
//!
//! [`CgrPoint`] is the forward map from a sequence to an exact point in
//! `[-1, 1]²`; [`decode`] and [`CodewordTable`] go back from a grid cell to
//! the unique sequence living in it.

mod inverse;
mod point;

pub use inverse::{
    decode,
    CodewordTable,
};
pub(crate) use point::check_cell;
pub use point::{
    to_cell,
    CgrPoint,
};
