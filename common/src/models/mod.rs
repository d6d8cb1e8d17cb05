mod chart;

pub use chart::{ChartRequest, FetchState, FetchStatus, PricePoint};
