//! Core for the itemsink project.
//!
//! Holds everything that does not talk to AWS: the [`record::Record`] model and
//! its decoding rules, the [`storage::RecordRepository`] seam, and the batch
//! processing contract in [`processing`].

pub mod processing;
pub mod record;
pub mod storage;
