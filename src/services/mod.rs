pub mod analysis;
pub mod market_data;
pub mod twelvedata;
