//! Market data retrieval

pub mod provider;
pub mod stub;

pub use provider::{DataError, DataSource, FetchStatus, MarketData, MarketDataProvider, RawBar};
pub use stub::StubProvider;
