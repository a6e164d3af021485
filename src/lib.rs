//! Command-line tool to manage Ethereum wallet files.
//!
//! `ethw` creates new wallet files, re-encrypts existing ones with a new password and imports raw private keys, all of
//! them stored following the [Web3 Secret Storage](https://ethereum.org/en/developers/docs/data-structures-and-encoding/web3-secret-storage/)
//! definition.
//!
//! On every run it checks whether a newer release has been published, displaying update instructions when it does.

#![forbid(unsafe_code)]

// Macros must be declared first
pub mod utils;

pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod model;
pub mod process;
pub mod service;
