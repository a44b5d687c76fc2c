//! Historical price adapters implementing `vigil_core::market::port::PriceSource`.

pub mod yahoo;

pub use yahoo::YahooProvider;
