//! # Neurograph Runtime
//!
//! Persistence, learning and the threads that share them.
//!
//! The runtime holds the SQLite [`store::GraphStore`], the engines that
//! operate on it ([`plasticity`], [`activation`]), response composition
//! ([`weaver`]), the background [`musing`] loop and [`voice`] queue, and the
//! foreground [`mind::Mind`] that drives one interaction at a time.
//!
//! Every thread that touches the graph opens its own connection. SQLite's
//! WAL journal and busy timeout are the only synchronization on the store.

pub mod activation;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod mind;
pub mod musing;
pub mod plasticity;
pub mod prelude;
pub mod state;
pub mod store;
pub mod voice;
pub mod weaver;
