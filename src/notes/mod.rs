//! Notes are captured as free text with a small tag markup. [grammar] pulls the tags out,
//! [expand] turns them into [entities::NormalizedRecord]s that reports work with.

pub mod entities;
pub mod expand;
pub mod grammar;
