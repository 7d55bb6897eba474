#![no_std]

pub mod dex;
pub mod farm;
pub mod market;
