pub mod config;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod import;
pub mod session;
pub mod store;
pub mod token;
pub mod voice;

pub use config::Config;
pub use dashboard::{summarize, summarize_now, DashboardSummary};
pub use error::{CallError, StoreError};
pub use http::{create_router, AppState};
pub use import::{import_file, parse_phone_list, CallTarget};
pub use session::{CallController, CallState, SessionSnapshot};
pub use store::{CallRecord, ResponseStore};
pub use token::{HumeTokenIssuer, TokenIssuer};
pub use voice::{ConnectionStatus, SimulatedTransport, VoiceMessage, VoiceTransport};
