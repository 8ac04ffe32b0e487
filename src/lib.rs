//! Deployment and integration-test harness for the charitable endowment
//! [Cosmwasm] contracts.
//!
//! Stores the compiled contracts on a [Cosmos] based chain, instantiates and
//! wires them together, drives them with signed transactions and checks the
//! results through contract queries. The same code runs against a local
//! devnet, testnet and mainnet; only the config differs.
//!
//! * [config]: per network YAML config, environment overrides and signers.
//! * [client]: the chain client and helpers to read tx event logs.
//! * [orchestrator]: contract bookkeeping, batching, strict step ordering
//!   and gas profiling.
//! * [protocol]: message types of the endowment and HALO contracts.
//! * [processes]: core and HALO deployments, migrations, multisig proposals.
//! * [scenarios]: integration test scenarios against a live chain.
//! * [airdrop]: merkle roots and proofs for airdrop claim lists.
//!
//! [cosmwasm]: https://github.com/CosmWasm/cosmwasm
//! [Cosmos]: https://github.com/cosmos/cosmos-sdk
//!
//! # Quick Start
//!
//! ```no_run
//! use endowment_harness::{
//!     config::{cfg::Config, network::Network, wallets::Wallets},
//!     orchestrator::orc::Orchestrator,
//!     processes::setup::setup_core,
//! };
//!
//! # async fn run() -> anyhow::Result<()> {
//! let cfg = Config::for_network("config", Network::Local)?;
//! let wallets = Wallets::from_config(&cfg)?;
//! let mut orc = Orchestrator::new(&cfg, true)?;
//!
//! let core = setup_core(&mut orc, &cfg, &wallets).await?;
//! println!("registrar deployed at {}", core.registrar);
//! # Ok(())
//! # }
//! ```

pub mod airdrop;

pub mod client;

pub mod config;

pub mod orchestrator;

pub mod processes;

pub mod protocol;

pub mod scenarios;
