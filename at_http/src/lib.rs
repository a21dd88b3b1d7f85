pub mod client;
pub mod errors;
pub mod freqtrade;
pub mod models;
pub mod reload;

pub use client::HttpClient;
pub use client::HttpClientConfig;
pub use errors::ApiError;
pub use errors::Result;
pub use freqtrade::ApiCredentials;
pub use freqtrade::FreqtradeClient;
pub use freqtrade::FreqtradeClientBuilder;
pub use reload::ReloadNotifier;
pub use reload::RetryPolicy;
