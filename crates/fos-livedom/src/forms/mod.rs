//! Form Elements Module
//!
//! `<select>` state stored on the tree and the live options collection
//! bound to a select element.

mod options;
mod select;

pub use options::{OptionsBefore, OptionsCollection};
