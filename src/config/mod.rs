pub mod cfg;

pub mod error;

pub mod key;

pub mod network;

pub mod wallets;
