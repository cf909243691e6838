//! End-to-end run scenarios against a scripted command runner

mod helpers;

mod env_propagation;
mod failure_handling;
mod success_chain;
mod trigger_filtering;
